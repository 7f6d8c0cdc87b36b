//! Public entry point.

use crate::auth::AuthenticationState;
use crate::endpoints::Endpoints;
use crate::reports::ReportWorkflow;
use crate::subjects::{CatalogChange, SubjectCatalog};
use crate::transport::{ReqwestSessionFactory, SessionFactory};
use crate::week::WeekResolver;
use azubi_core::{
    BatchOutcome, ClientConfig, DeleteSelection, NewReportEntry, ReportEntry, Result, Subject,
    TimeSpent, WeekId,
};
use chrono::NaiveDate;
use std::sync::Arc;

/// Automates one account's session with the report site.
///
/// An instance holds a single logical session and performs its round trips
/// sequentially. Operations that submit forms take `&mut self` so two of them
/// can never interleave on the same session and mix up form tokens; use one
/// instance per concurrent session.
///
/// No timeouts or retries are applied here.
///
/// # Example
///
/// ```ignore
/// use azubi_client::AzubiClient;
/// use azubi_core::{ClientConfig, DeleteSelection, TimeSpent};
///
/// let mut client = AzubiClient::new(&ClientConfig::load()?);
/// client.login("user", "secret").await?;
/// client
///     .write_report(date, "Wrote tests", TimeSpent::parse("02:00")?, "1")
///     .await?;
/// let entries = client.read_report(date, true).await?;
/// client.delete_report(date, DeleteSelection::All).await?;
/// client.logout().await?;
/// ```
pub struct AzubiClient {
    auth: AuthenticationState,
}

impl AzubiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_session_factory(
            Arc::new(ReqwestSessionFactory::new(config)),
            Endpoints::from_config(config),
        )
    }

    /// Uses a custom transport, e.g. an in-memory site in tests.
    pub fn with_session_factory(factory: Arc<dyn SessionFactory>, endpoints: Endpoints) -> Self {
        Self {
            auth: AuthenticationState::new(factory, endpoints),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        self.auth.endpoints()
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.auth.login(username, password).await
    }

    pub async fn logout(&mut self) -> Result<()> {
        self.auth.logout().await
    }

    /// Probes the site; never answers from a cached flag.
    pub async fn is_authenticated(&self) -> Result<bool> {
        self.auth.is_authenticated().await
    }

    pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
        let session = self.auth.authenticated_session().await?;
        SubjectCatalog::new(session.as_ref(), self.auth.endpoints())
            .list()
            .await
    }

    /// Id of the first subject whose name contains `needle`.
    pub async fn subject_id_by_name(&self, needle: &str) -> Result<Option<String>> {
        let session = self.auth.authenticated_session().await?;
        SubjectCatalog::new(session.as_ref(), self.auth.endpoints())
            .resolve_id_by_name(needle)
            .await
    }

    pub async fn add_subject(&mut self, name: &str) -> Result<()> {
        let change = CatalogChange::add(name)?;
        let session = self.auth.authenticated_session().await?;
        SubjectCatalog::new(session.as_ref(), self.auth.endpoints())
            .replace_catalog(change)
            .await
    }

    pub async fn delete_subject(&mut self, id: &str) -> Result<()> {
        let change = CatalogChange::delete(id)?;
        let session = self.auth.authenticated_session().await?;
        SubjectCatalog::new(session.as_ref(), self.auth.endpoints())
            .replace_catalog(change)
            .await
    }

    pub async fn resolve_week_id(&self, date: NaiveDate) -> Result<WeekId> {
        let session = self.auth.authenticated_session().await?;
        WeekResolver::new(session.as_ref(), self.auth.endpoints())
            .resolve(date)
            .await
    }

    pub async fn write_report(
        &mut self,
        date: NaiveDate,
        text: &str,
        time_spent: TimeSpent,
        subject_id: &str,
    ) -> Result<BatchOutcome> {
        let entry = NewReportEntry::new(date, text, time_spent, subject_id);
        self.write_reports(std::slice::from_ref(&entry)).await
    }

    pub async fn write_reports(&mut self, entries: &[NewReportEntry]) -> Result<BatchOutcome> {
        ReportWorkflow::new(&self.auth).write(entries).await
    }

    pub async fn read_report(&self, date: NaiveDate, with_formatting: bool) -> Result<Vec<ReportEntry>> {
        ReportWorkflow::new(&self.auth).read(date, with_formatting).await
    }

    pub async fn delete_report(
        &mut self,
        date: NaiveDate,
        selection: DeleteSelection,
    ) -> Result<BatchOutcome> {
        ReportWorkflow::new(&self.auth).delete(date, selection).await
    }
}

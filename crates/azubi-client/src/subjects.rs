//! Subject catalog.
//!
//! The setup form has no partial updates: every save must carry the whole
//! catalog, and a subject missing from the payload is deleted. Adding and
//! deleting are both a [`CatalogChange`] applied by
//! [`SubjectCatalog::replace_catalog`].

use crate::endpoints::Endpoints;
use crate::pages::parse_custom_subjects;
use crate::tokens::FormTokens;
use crate::transport::{FormFields, HttpSession};
use azubi_core::{AzubiError, Result, Subject, builtin_subjects, current_timestamp, find_id_by_name};

const FIELD_SUBJECT_PREFIX: &str = "ctl00$ContentPlaceHolder1$txt";
const FIELD_DELETED_IDS: &str = "ctl00$ContentPlaceHolder1$HiddenLöschIDs";
const FIELD_SAVE: &str = "ctl00$ContentPlaceHolder1$cmd_Save";

/// A change applied on top of the current catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogChange {
    Add { name: String },
    Delete { id: String },
}

impl CatalogChange {
    /// The site assigns the new id; list the catalog afterwards to see it.
    pub fn add(name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(AzubiError::validation("subject name must not be empty"));
        }
        Ok(Self::Add {
            name: name.to_string(),
        })
    }

    pub fn delete(id: &str) -> Result<Self> {
        if id.trim().is_empty() {
            return Err(AzubiError::validation("subject id must not be empty"));
        }
        Ok(Self::Delete { id: id.to_string() })
    }
}

pub struct SubjectCatalog<'a> {
    session: &'a dyn HttpSession,
    endpoints: &'a Endpoints,
}

impl<'a> SubjectCatalog<'a> {
    pub fn new(session: &'a dyn HttpSession, endpoints: &'a Endpoints) -> Self {
        Self { session, endpoints }
    }

    /// Built-in subjects first, then the account's custom subjects.
    pub async fn list(&self) -> Result<Vec<Subject>> {
        let page = self.session.get(&self.endpoints.subject_setup()).await?;
        let mut subjects = builtin_subjects();
        subjects.extend(parse_custom_subjects(&page.body)?);
        Ok(subjects)
    }

    pub async fn resolve_id_by_name(&self, needle: &str) -> Result<Option<String>> {
        let subjects = self.list().await?;
        Ok(find_id_by_name(&subjects, needle).map(str::to_string))
    }

    /// Resubmits the full catalog with `change` applied.
    ///
    /// Tokens and the current catalog come from the same fetch of the setup
    /// page, immediately before the post.
    pub async fn replace_catalog(&self, change: CatalogChange) -> Result<()> {
        let url = self.endpoints.subject_setup();
        let page = self.session.get(&url).await?;
        let tokens = FormTokens::extract(&page.body)?;

        let mut current = builtin_subjects();
        current.extend(parse_custom_subjects(&page.body)?);

        let form = build_catalog_form(&tokens, &current, &change, &current_timestamp());
        let response = self.session.post_form(&url, &form, &[]).await?;
        if !response.is_success() {
            return Err(AzubiError::unexpected_status(
                response.status,
                format!("saving subject catalog ({:?})", change),
            ));
        }
        tracing::info!("Subject catalog saved ({:?})", change);
        Ok(())
    }
}

/// Form body for a catalog save; `unique_key` names the new-subject field.
pub fn build_catalog_form(
    tokens: &FormTokens,
    current: &[Subject],
    change: &CatalogChange,
    unique_key: &str,
) -> FormFields {
    let mut form = tokens.to_fields();

    match change {
        CatalogChange::Add { name } => {
            form.push((format!("txt{unique_key}"), name.clone()));
        }
        CatalogChange::Delete { id } => {
            form.push((FIELD_DELETED_IDS.to_string(), format!(",{id}")));
        }
    }

    let removed = match change {
        CatalogChange::Delete { id } => Some(id.as_str()),
        CatalogChange::Add { .. } => None,
    };
    form.extend(
        current
            .iter()
            .filter(|subject| Some(subject.id.as_str()) != removed)
            .map(|subject| (format!("{}{}", FIELD_SUBJECT_PREFIX, subject.id), subject.name.clone())),
    );

    form.push((FIELD_SAVE.to_string(), "Speichern".to_string()));
    form
}

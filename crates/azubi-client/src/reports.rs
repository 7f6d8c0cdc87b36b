//! Writing, reading and deleting report entries.
//!
//! Batch writes and deletes are not atomic. Each item is submitted on its own
//! and its outcome recorded; one failed item never stops the rest.

use crate::auth::AuthenticationState;
use crate::endpoints::Endpoints;
use crate::pages::parse_daily_entries;
use crate::subjects::SubjectCatalog;
use crate::text::encode_report_text;
use crate::transport::{FormFields, HttpSession};
use crate::week::WeekResolver;
use azubi_core::{
    AzubiError, BatchOutcome, DeleteSelection, ItemStatus, NewReportEntry, ReportEntry, Result,
    TimeSpent, WeekId, current_timestamp, find_id_by_name,
};
use chrono::NaiveDate;

/// Headers the site's own editor sends with background entry requests.
fn entry_headers(endpoints: &Endpoints) -> Vec<(&'static str, String)> {
    vec![
        ("x-my-ajax-request", "ajax".to_string()),
        ("Origin", endpoints.base_url().to_string()),
        ("Referer", format!("{}/", endpoints.base_url())),
        ("Sec-Fetch-Dest", "empty".to_string()),
        ("Sec-Fetch-Mode", "cors".to_string()),
        ("Sec-Fetch-Site", "same-origin".to_string()),
        ("Pragma", "no-cache".to_string()),
        ("Cache-Control", "no-cache".to_string()),
    ]
}

/// One submission to the entry endpoint.
///
/// `sequence` is `0` to append, or the negated sequence of an existing entry
/// to delete it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySubmission {
    pub sequence: String,
    pub subject_id: String,
    pub time_spent: TimeSpent,
    pub text: String,
}

impl EntrySubmission {
    pub fn append(entry: &NewReportEntry) -> Self {
        Self {
            sequence: "0".to_string(),
            subject_id: entry.subject_id.clone(),
            time_spent: entry.time_spent,
            text: entry.text.clone(),
        }
    }

    /// Deletion of a persisted entry; the magnitude must match its sequence.
    pub fn removal(entry: &ReportEntry, subject_id: &str) -> Result<Self> {
        let sequence = entry
            .sequence
            .as_deref()
            .map(str::trim)
            .filter(|seq| !seq.is_empty())
            .ok_or_else(|| AzubiError::validation("entry has no sequence number"))?;
        Ok(Self {
            sequence: format!("-{}", sequence.trim_start_matches('-')),
            subject_id: subject_id.to_string(),
            time_spent: entry.time_spent,
            text: entry.text.clone(),
        })
    }

    pub fn to_form(&self) -> FormFields {
        vec![
            ("disablePaste".to_string(), "0".to_string()),
            ("Seq".to_string(), self.sequence.clone()),
            ("Art_ID".to_string(), self.subject_id.clone()),
            ("Abt_ID".to_string(), "0".to_string()),
            ("Dauer".to_string(), self.time_spent.to_string()),
            ("Inhalt".to_string(), encode_report_text(&self.text)),
            ("jsVer".to_string(), "12".to_string()),
        ]
    }
}

fn describe(text: &str) -> String {
    const MAX_CHARS: usize = 40;
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() > MAX_CHARS {
        format!("{}...", first_line.chars().take(MAX_CHARS).collect::<String>())
    } else {
        first_line.to_string()
    }
}

/// Composes authentication, week resolution and the subject catalog into
/// the report operations.
pub struct ReportWorkflow<'a> {
    auth: &'a AuthenticationState,
}

impl<'a> ReportWorkflow<'a> {
    pub fn new(auth: &'a AuthenticationState) -> Self {
        Self { auth }
    }

    fn endpoints(&self) -> &'a Endpoints {
        self.auth.endpoints()
    }

    /// Appends every entry, each to the week of its own date.
    ///
    /// The whole batch is validated before the first request; a zero duration
    /// anywhere rejects the batch.
    pub async fn write(&self, entries: &[NewReportEntry]) -> Result<BatchOutcome> {
        for entry in entries {
            entry.validate()?;
        }
        let session = self.auth.authenticated_session().await?;
        let weeks = WeekResolver::new(session.as_ref(), self.endpoints());

        let mut outcome = BatchOutcome::default();
        for entry in entries {
            let status = match weeks.resolve(entry.date).await {
                Ok(week_id) => {
                    let submission = EntrySubmission::append(entry);
                    self.submit(session.as_ref(), entry.date, &week_id, &submission, "writing entry")
                        .await
                }
                Err(err) => ItemStatus::Failed(err),
            };
            if let ItemStatus::Failed(err) = &status {
                tracing::warn!("Failed to add entry for {}: {}", entry.date, err);
            }
            outcome.push(entry.date, describe(&entry.text), status);
        }
        Ok(outcome)
    }

    /// Non-empty entries of `date`, with subject ids resolved from labels.
    pub async fn read(&self, date: NaiveDate, with_formatting: bool) -> Result<Vec<ReportEntry>> {
        let session = self.auth.authenticated_session().await?;
        self.read_with(session.as_ref(), date, with_formatting).await
    }

    async fn read_with(
        &self,
        session: &dyn HttpSession,
        date: NaiveDate,
        with_formatting: bool,
    ) -> Result<Vec<ReportEntry>> {
        let page = session.get(&self.endpoints().daily_report(date)).await?;
        let mut entries = parse_daily_entries(&page.body, with_formatting)?;
        if entries.is_empty() {
            return Ok(entries);
        }

        let subjects = SubjectCatalog::new(session, self.endpoints()).list().await?;
        for entry in &mut entries {
            entry.subject_id = find_id_by_name(&subjects, &entry.subject_label).map(str::to_string);
        }
        Ok(entries)
    }

    /// Deletes one entry (1-based, against a fresh read) or all entries of
    /// `date`.
    ///
    /// An out-of-range selection is rejected before any deletion request.
    pub async fn delete(&self, date: NaiveDate, selection: DeleteSelection) -> Result<BatchOutcome> {
        if selection == DeleteSelection::One(0) {
            return Err(AzubiError::validation("entry numbers start at 1"));
        }
        let session = self.auth.authenticated_session().await?;

        let entries = self.read_with(session.as_ref(), date, true).await?;
        let selected: Vec<(usize, &ReportEntry)> = match selection {
            DeleteSelection::All => entries.iter().enumerate().map(|(i, e)| (i + 1, e)).collect(),
            DeleteSelection::One(number) => match entries.get(number - 1) {
                Some(entry) => vec![(number, entry)],
                None => {
                    return Err(AzubiError::validation(format!(
                        "entry {} does not exist, {} has {} entries",
                        number,
                        date,
                        entries.len()
                    )));
                }
            },
        };

        let mut outcome = BatchOutcome::default();
        if selected.is_empty() {
            tracing::info!("No report entries on {}, nothing to delete", date);
            return Ok(outcome);
        }

        let week_id = WeekResolver::new(session.as_ref(), self.endpoints())
            .resolve(date)
            .await?;

        for (number, entry) in selected {
            let status = match entry.subject_id.as_deref() {
                None => ItemStatus::Failed(AzubiError::validation(format!(
                    "subject '{}' is not in the catalog",
                    entry.subject_label
                ))),
                Some(subject_id) => match EntrySubmission::removal(entry, subject_id) {
                    Ok(submission) => {
                        self.submit(session.as_ref(), date, &week_id, &submission, "deleting entry")
                            .await
                    }
                    Err(err) => ItemStatus::Failed(err),
                },
            };
            if let ItemStatus::Failed(err) = &status {
                tracing::warn!("Failed to delete entry {} on {}: {}", number, date, err);
            }
            outcome.push(date, format!("#{} {}", number, describe(&entry.text)), status);
        }
        Ok(outcome)
    }

    async fn submit(
        &self,
        session: &dyn HttpSession,
        date: NaiveDate,
        week_id: &WeekId,
        submission: &EntrySubmission,
        context: &str,
    ) -> ItemStatus {
        let url = self
            .endpoints()
            .entry_request(date, week_id, &current_timestamp());
        let owned = entry_headers(self.endpoints());
        let headers: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
        match session.post_form(&url, &submission.to_form(), &headers).await {
            Ok(response) if response.is_success() => ItemStatus::Submitted,
            Ok(response) => ItemStatus::Failed(AzubiError::unexpected_status(
                response.status,
                format!("{} for {}", context, date),
            )),
            Err(err) => ItemStatus::Failed(err),
        }
    }
}

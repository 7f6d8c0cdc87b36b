//! Report entry model and batch outcomes.

use crate::error::{AzubiError, Result};
use crate::time_spent::TimeSpent;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of a weekly report container on the site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekId(pub String);

impl WeekId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entry as read back from a daily report page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Server-assigned ordinal within the day, used to address deletion.
    pub sequence: Option<String>,
    /// Subject id resolved from the rendered label, if the catalog knows it.
    pub subject_id: Option<String>,
    /// Subject label as rendered by the site.
    pub subject_label: String,
    pub time_spent: TimeSpent,
    pub text: String,
}

/// An entry to be appended to the report of `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReportEntry {
    pub date: NaiveDate,
    pub text: String,
    pub time_spent: TimeSpent,
    pub subject_id: String,
}

impl NewReportEntry {
    pub fn new(
        date: NaiveDate,
        text: impl Into<String>,
        time_spent: TimeSpent,
        subject_id: impl Into<String>,
    ) -> Self {
        Self {
            date,
            text: text.into(),
            time_spent,
            subject_id: subject_id.into(),
        }
    }

    /// Rejects entries the site would treat as empty or cannot attribute.
    pub fn validate(&self) -> Result<()> {
        if self.time_spent.is_zero() {
            return Err(AzubiError::validation(format!(
                "entry for {} has a zero duration",
                self.date
            )));
        }
        if self.subject_id.trim().is_empty() {
            return Err(AzubiError::validation(format!(
                "entry for {} has no subject id",
                self.date
            )));
        }
        Ok(())
    }
}

/// Which entries of a day a delete targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteSelection {
    /// One entry by its 1-based position in a fresh read of the day.
    One(usize),
    All,
}

impl FromStr for DeleteSelection {
    type Err = AzubiError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Self::One(n)),
            _ => Err(AzubiError::validation(format!(
                "invalid selection '{}', expected a positive entry number or 'all'",
                s
            ))),
        }
    }
}

/// Result of one item in a batch submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    Submitted,
    Failed(AzubiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub date: NaiveDate,
    /// Short human-readable label of the item (entry text or position).
    pub description: String,
    pub status: ItemStatus,
}

/// Per-item report of a non-atomic batch operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub items: Vec<ItemOutcome>,
}

impl BatchOutcome {
    pub fn push(&mut self, date: NaiveDate, description: impl Into<String>, status: ItemStatus) {
        self.items.push(ItemOutcome {
            date,
            description: description.into(),
            status,
        });
    }

    pub fn submitted(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.status == ItemStatus::Submitted)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&ItemOutcome, &AzubiError)> {
        self.items.iter().filter_map(|item| match &item.status {
            ItemStatus::Failed(err) => Some((item, err)),
            ItemStatus::Submitted => None,
        })
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Formats a date the way the site addresses days (`YYYYMMDD`).
pub fn date_to_string(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Unix seconds, used as one-time request identifier and unique field key.
pub fn current_timestamp() -> String {
    Utc::now().timestamp().to_string()
}

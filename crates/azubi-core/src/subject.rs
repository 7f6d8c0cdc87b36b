//! Subject (category) taxonomy.

use serde::{Deserialize, Serialize};

/// A category a report entry is logged under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    /// Site-assigned identifier, sent as `Art_ID`.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Subject {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The seven subjects every account has, in the order the site lists them.
pub const BUILTIN_SUBJECTS: [(&str, &str); 7] = [
    ("1", "Betrieb"),
    ("2", "Schule"),
    ("3", "ÜBA"),
    ("4", "Urlaub"),
    ("5", "Feiertag"),
    ("6", "Arbeitsunfähig"),
    ("7", "Frei"),
];

pub fn builtin_subjects() -> Vec<Subject> {
    BUILTIN_SUBJECTS
        .iter()
        .map(|(id, name)| Subject::new(*id, *name))
        .collect()
}

/// Returns the id of the first subject whose name contains `needle`.
///
/// Matching is by containment because the daily page decorates the names
/// it echoes back. A blank needle matches nothing.
pub fn find_id_by_name<'a>(subjects: &'a [Subject], needle: &str) -> Option<&'a str> {
    let needle = needle.trim();
    if needle.is_empty() {
        return None;
    }
    subjects
        .iter()
        .find(|subject| subject.name.contains(needle))
        .map(|subject| subject.id.as_str())
}

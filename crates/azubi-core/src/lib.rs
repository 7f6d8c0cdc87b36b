//! Domain types shared by the azubiheft crates.

pub mod config;
pub mod error;
pub mod report;
pub mod subject;
pub mod time_spent;

pub use config::ClientConfig;
pub use error::{AzubiError, Result};
pub use report::{
    BatchOutcome, DeleteSelection, ItemOutcome, ItemStatus, NewReportEntry, ReportEntry, WeekId,
    current_timestamp, date_to_string,
};
pub use subject::{BUILTIN_SUBJECTS, Subject, builtin_subjects, find_id_by_name};
pub use time_spent::{MAX_TIME_SPENT_MINUTES, TimeSpent, time_spent_to_string};

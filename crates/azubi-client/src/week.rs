//! Date to weekly-container resolution.
//!
//! Known limitation: the overview page lists only the containers the site
//! chooses to render and is not paginated. Dates in weeks the overview omits
//! (very old weeks, or weeks not created yet) fail with `WeekNotFound`.

use crate::endpoints::Endpoints;
use crate::pages::parse_week_containers;
use crate::transport::HttpSession;
use azubi_core::{AzubiError, Result, WeekId};
use chrono::{Datelike, NaiveDate};

pub struct WeekResolver<'a> {
    session: &'a dyn HttpSession,
    endpoints: &'a Endpoints,
}

impl<'a> WeekResolver<'a> {
    pub fn new(session: &'a dyn HttpSession, endpoints: &'a Endpoints) -> Self {
        Self { session, endpoints }
    }

    /// Fetches the overview and resolves `date` against it.
    pub async fn resolve(&self, date: NaiveDate) -> Result<WeekId> {
        let page = self.session.get(&self.endpoints.week_overview()).await?;
        resolve_in_overview(&page.body, date)
    }
}

/// Finds the first container whose ISO week number and ISO week-year both
/// match `date`.
pub fn resolve_in_overview(html: &str, date: NaiveDate) -> Result<WeekId> {
    let iso = date.iso_week();
    let (week, year) = (iso.week(), iso.year());

    let containers = parse_week_containers(html)?;
    let matching = containers
        .iter()
        .find(|container| container.week == week && container.year == year);

    match matching {
        Some(container) => container.week_id().ok_or(AzubiError::MissingMarkup {
            page: "week overview",
            element: "onclick week reference",
        }),
        None => Err(AzubiError::WeekNotFound { date, week, year }),
    }
}

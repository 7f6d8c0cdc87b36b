//! URLs of the pages the client drives.

use azubi_core::{ClientConfig, WeekId, date_to_string};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login(&self) -> String {
        format!("{}/Login.aspx", self.base_url)
    }

    /// Protected start page used as the authentication probe.
    pub fn start_page(&self) -> String {
        format!("{}/Azubi/Default.aspx", self.base_url)
    }

    pub fn logout(&self) -> String {
        format!("{}/Azubi/Abmelden.aspx", self.base_url)
    }

    pub fn week_overview(&self) -> String {
        format!("{}/Azubi/Ausbildungsnachweise.aspx", self.base_url)
    }

    pub fn subject_setup(&self) -> String {
        format!("{}/Azubi/SetupSchulfach.aspx", self.base_url)
    }

    pub fn daily_report(&self, date: NaiveDate) -> String {
        format!(
            "{}/Azubi/Tagesbericht.aspx?Datum={}",
            self.base_url,
            date_to_string(date)
        )
    }

    /// Background entry endpoint; `nonce` must differ per request.
    pub fn entry_request(&self, date: NaiveDate, week_id: &WeekId, nonce: &str) -> String {
        format!(
            "{}/Azubi/XMLHttpRequest.ashx?Datum={}&BrNr={}&BrSt=1&BrVorh=Yes&T={}",
            self.base_url,
            date_to_string(date),
            week_id,
            nonce
        )
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

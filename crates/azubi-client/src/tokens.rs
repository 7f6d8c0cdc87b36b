//! Anti-forgery form tokens.
//!
//! Every ASP.NET form on the site carries three hidden fields that must be
//! echoed back on the next post. They are valid for one render only, so they
//! are extracted from the page fetched immediately before each submission.

use crate::html::selector;
use crate::transport::FormFields;
use azubi_core::{AzubiError, Result};
use scraper::Html;

pub const VIEW_STATE: &str = "__VIEWSTATE";
pub const VIEW_STATE_GENERATOR: &str = "__VIEWSTATEGENERATOR";
pub const EVENT_VALIDATION: &str = "__EVENTVALIDATION";

#[derive(Clone, PartialEq, Eq)]
pub struct FormTokens {
    pub view_state: String,
    pub view_state_generator: String,
    pub event_validation: String,
}

impl FormTokens {
    /// Extracts the three hidden fields from a page containing a form.
    ///
    /// Fails with [`AzubiError::MissingToken`] naming the first absent field.
    pub fn extract(html: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let value_of = |field: &'static str, css: &'static str| -> Result<String> {
            let by_id = selector(css)?;
            document
                .select(&by_id)
                .next()
                .and_then(|element| element.value().attr("value"))
                .map(str::to_string)
                .ok_or(AzubiError::MissingToken { field })
        };

        Ok(Self {
            view_state: value_of(VIEW_STATE, "#__VIEWSTATE")?,
            view_state_generator: value_of(VIEW_STATE_GENERATOR, "#__VIEWSTATEGENERATOR")?,
            event_validation: value_of(EVENT_VALIDATION, "#__EVENTVALIDATION")?,
        })
    }

    /// Form fields to prepend to a submission.
    pub fn to_fields(&self) -> FormFields {
        vec![
            (VIEW_STATE.to_string(), self.view_state.clone()),
            (VIEW_STATE_GENERATOR.to_string(), self.view_state_generator.clone()),
            (EVENT_VALIDATION.to_string(), self.event_validation.clone()),
        ]
    }
}

// Token values are session secrets.
impl std::fmt::Debug for FormTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormTokens")
            .field("view_state", &format_args!("<{} bytes>", self.view_state.len()))
            .field("view_state_generator", &self.view_state_generator)
            .field(
                "event_validation",
                &format_args!("<{} bytes>", self.event_validation.len()),
            )
            .finish()
    }
}

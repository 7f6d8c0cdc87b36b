//! Small helpers over `scraper`.
//!
//! Documents are parsed and dropped inside synchronous functions; `Html` is
//! not `Send` and must never live across an `.await`.

use azubi_core::{AzubiError, Result};
use scraper::{ElementRef, Selector};

pub(crate) fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|err| AzubiError::internal(format!("invalid selector '{css}': {err:?}")))
}

/// Concatenated text of an element, trimmed.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

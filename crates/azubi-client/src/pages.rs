//! Pure parsers for the pages the client scrapes.
//!
//! No network access here; each function takes a page body and returns owned
//! data, so the whole scraping layer is testable with static HTML.

use crate::html::{selector, text_of};
use crate::text::fragment_to_text;
use azubi_core::{AzubiError, ReportEntry, Result, Subject, TimeSpent, WeekId};
use scraper::Html;

/// True when the page contains the logout control, which the site renders
/// only for logged-in users.
pub fn has_logout_marker(html: &str) -> Result<bool> {
    let document = Html::parse_document(html);
    let marker = selector("#Abmelden")?;
    let found = document.select(&marker).next().is_some();
    Ok(found)
}

/// One weekly container on the overview page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekContainer {
    pub week: u32,
    pub year: i32,
    /// Inline navigation script, e.g. `location.href='Wochenansicht.aspx?NachweisNr=4711'`.
    pub action: String,
}

impl WeekContainer {
    pub fn week_id(&self) -> Option<WeekId> {
        week_id_from_action(&self.action)
    }
}

/// Lists week containers in document order.
///
/// Containers lacking a readable week or year marker are skipped.
pub fn parse_week_containers(html: &str) -> Result<Vec<WeekContainer>> {
    let document = Html::parse_document(html);
    let container_sel = selector("div.mo.NBox")?;
    let week_sel = selector("div.sKW")?;
    let year_box_sel = selector("div.KW")?;
    let div_sel = selector("div")?;

    let mut containers = Vec::new();
    for container in document.select(&container_sel) {
        let week = container
            .select(&week_sel)
            .next()
            .and_then(|el| text_of(el).parse::<u32>().ok());
        // The year is the third div inside the KW box.
        let year = container
            .select(&year_box_sel)
            .next()
            .and_then(|kw| kw.select(&div_sel).nth(2))
            .and_then(|el| text_of(el).parse::<i32>().ok());

        let (Some(week), Some(year)) = (week, year) else {
            tracing::debug!("Skipping week container without week/year marker");
            continue;
        };
        let action = container.value().attr("onclick").unwrap_or_default().to_string();
        containers.push(WeekContainer { week, year, action });
    }
    Ok(containers)
}

/// Extracts the week id from `...'<path>?<key>=<id>'...`.
pub fn week_id_from_action(action: &str) -> Option<WeekId> {
    let quoted = action.split('\'').nth(1)?;
    let (_, value) = quoted.split_once('=')?;
    let value = value.split('&').next().unwrap_or_default().trim();
    if value.is_empty() {
        return None;
    }
    Some(WeekId(value.to_string()))
}

/// Custom subjects from the setup page, in input order.
///
/// Each input carries the id in `data-default` and the name in `value`.
pub fn parse_custom_subjects(html: &str) -> Result<Vec<Subject>> {
    let document = Html::parse_document(html);
    let container_sel = selector("#divSchulfach")?;
    let input_sel = selector("input")?;

    let container = document
        .select(&container_sel)
        .next()
        .ok_or(AzubiError::MissingMarkup {
            page: "subject setup",
            element: "#divSchulfach",
        })?;

    let subjects = container
        .select(&input_sel)
        .filter_map(|input| {
            let element = input.value();
            let id = element.attr("data-default")?;
            let name = element.attr("value").unwrap_or_default();
            Some(Subject::new(id, name))
        })
        .collect();
    Ok(subjects)
}

fn strip_label_decoration(label: &str) -> String {
    let label = label.trim();
    label
        .strip_prefix("Art:")
        .unwrap_or(label)
        .trim()
        .to_string()
}

/// Entries of a daily report page, skipping empty (`00:00`) slots.
///
/// Stored durations are taken as rendered; the bound for new entries does
/// not apply to what the site already holds.
///
/// `subject_id` is left unset; it is resolved against the catalog later.
pub fn parse_daily_entries(html: &str, with_formatting: bool) -> Result<Vec<ReportEntry>> {
    let document = Html::parse_document(html);
    let block_sel = selector("div.d0.mo")?;
    let label_sel = selector("div.row1")?;
    let duration_sel = selector("div.row2")?;
    let text_sel = selector("div.row7")?;

    let mut entries = Vec::new();
    for block in document.select(&block_sel) {
        let (Some(label), Some(duration), Some(text)) = (
            block.select(&label_sel).next(),
            block.select(&duration_sel).next(),
            block.select(&text_sel).next(),
        ) else {
            tracing::debug!("Skipping report block without label/duration/text");
            continue;
        };

        let duration = text_of(duration);
        let time_spent = match TimeSpent::parse_rendered(&duration) {
            Ok(time_spent) => time_spent,
            Err(err) => {
                tracing::warn!("Skipping report block with unreadable duration '{}': {}", duration, err);
                continue;
            }
        };
        if time_spent.is_zero() {
            continue;
        }

        entries.push(ReportEntry {
            sequence: block.value().attr("data-seq").map(str::to_string),
            subject_id: None,
            subject_label: strip_label_decoration(&text_of(label)),
            time_spent,
            text: fragment_to_text(text, with_formatting),
        });
    }
    Ok(entries)
}

use super::Session;
use anyhow::{Context, Result};
use azubi_core::{BatchOutcome, DeleteSelection, ItemStatus, TimeSpent};
use chrono::NaiveDate;

/// Accepts a subject id as is; anything else is looked up by name.
async fn resolve_subject(session: &Session, subject: &str) -> Result<String> {
    if !subject.is_empty() && subject.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(subject.to_string());
    }
    session
        .client()
        .subject_id_by_name(subject)
        .await?
        .with_context(|| format!("No subject matches '{}'", subject))
}

fn print_outcome(outcome: &BatchOutcome, verb: &str) -> Result<()> {
    for item in &outcome.items {
        match &item.status {
            ItemStatus::Submitted => println!("✅ {} {}: {}", verb, item.date, item.description),
            ItemStatus::Failed(err) => println!("❌ {} {}: {} ({})", verb, item.date, item.description, err),
        }
    }
    let failed = outcome.failures().count();
    if failed > 0 {
        anyhow::bail!("{} of {} items failed", failed, outcome.items.len());
    }
    Ok(())
}

pub async fn write(
    session: &mut Session,
    date: NaiveDate,
    time: TimeSpent,
    subject: &str,
    text: &str,
) -> Result<()> {
    let subject_id = resolve_subject(session, subject).await?;
    let outcome = session
        .client_mut()
        .write_report(date, text, time, &subject_id)
        .await
        .context("Failed to write report")?;
    print_outcome(&outcome, "Wrote")
}

pub async fn read(session: &Session, date: NaiveDate, formatted: bool) -> Result<()> {
    let entries = session
        .client()
        .read_report(date, formatted)
        .await
        .with_context(|| format!("Failed to read report for {}", date))?;
    if entries.is_empty() {
        println!("No entries on {}", date);
        return Ok(());
    }
    for (number, entry) in entries.iter().enumerate() {
        println!("#{} [{}] {}", number + 1, entry.subject_label, entry.time_spent);
        for line in entry.text.lines() {
            println!("    {}", line);
        }
    }
    Ok(())
}

pub async fn delete(
    session: &mut Session,
    date: NaiveDate,
    entry: Option<DeleteSelection>,
    all: bool,
) -> Result<()> {
    let selection = match (entry, all) {
        (_, true) => DeleteSelection::All,
        (Some(selection), false) => selection,
        (None, false) => anyhow::bail!("Pass --entry N or --all"),
    };
    let outcome = session
        .client_mut()
        .delete_report(date, selection)
        .await
        .with_context(|| format!("Failed to delete report entries for {}", date))?;
    if outcome.is_empty() {
        println!("No entries on {}", date);
        return Ok(());
    }
    print_outcome(&outcome, "Deleted")
}

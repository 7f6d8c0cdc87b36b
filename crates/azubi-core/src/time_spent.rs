//! The `HH:MM` duration logged against a report entry.

use crate::error::{AzubiError, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exclusive upper bound accepted by the site, in minutes (19:59).
pub const MAX_TIME_SPENT_MINUTES: u32 = 19 * 60 + 59;

/// Time spent on a report entry.
///
/// Every constructor that takes caller input enforces the 19:59 bound.
/// [`TimeSpent::parse_rendered`] skips it for durations the site already
/// stores.
///
/// Displays as zero-padded `HH:MM`, which is the format the entry endpoint
/// expects in its `Dauer` field and the format the daily page renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSpent {
    minutes: u32,
}

impl TimeSpent {
    pub const ZERO: TimeSpent = TimeSpent { minutes: 0 };

    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes >= MAX_TIME_SPENT_MINUTES {
            return Err(AzubiError::validation(format!(
                "time spent {:02}:{:02} exceeds the maximum of 19:59",
                minutes / 60,
                minutes % 60
            )));
        }
        Ok(Self { minutes })
    }

    pub fn from_hours_minutes(hours: u32, minutes: u32) -> Result<Self> {
        if minutes >= 60 {
            return Err(AzubiError::validation(format!(
                "minutes must be below 60, got {}",
                minutes
            )));
        }
        let total = hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes))
            .ok_or_else(|| AzubiError::validation("time spent is out of range"))?;
        Self::from_minutes(total)
    }

    /// Converts a duration, dropping seconds like the site does.
    pub fn from_time_delta(delta: TimeDelta) -> Result<Self> {
        if delta < TimeDelta::zero() {
            return Err(AzubiError::validation("time spent must not be negative"));
        }
        let minutes = u32::try_from(delta.num_minutes())
            .map_err(|_| AzubiError::validation("time spent is out of range"))?;
        Self::from_minutes(minutes)
    }

    /// Parses `H:MM` or `HH:MM`.
    pub fn parse(input: &str) -> Result<Self> {
        let (hours, minutes) = split_hours_minutes(input)?;
        Self::from_hours_minutes(hours, minutes)
    }

    /// Parses a duration rendered by the site, without the 19:59 bound.
    ///
    /// Entries stored by other clients may exceed what this crate accepts
    /// for new entries; they must still be listed and deletable.
    pub fn parse_rendered(input: &str) -> Result<Self> {
        let (hours, minutes) = split_hours_minutes(input)?;
        if minutes >= 60 {
            return Err(AzubiError::validation(format!(
                "minutes must be below 60, got {}",
                minutes
            )));
        }
        Ok(Self {
            minutes: hours * 60 + minutes,
        })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// A zero duration marks an empty slot on the daily page.
    pub fn is_zero(&self) -> bool {
        self.minutes == 0
    }
}

impl fmt::Display for TimeSpent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

impl FromStr for TimeSpent {
    type Err = AzubiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeSpent {
    type Error = AzubiError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TimeSpent> for String {
    fn from(value: TimeSpent) -> Self {
        value.to_string()
    }
}

fn split_hours_minutes(input: &str) -> Result<(u32, u32)> {
    let invalid = || AzubiError::validation(format!("time spent '{}' is not in HH:MM format", input));
    let (hours, minutes) = input.trim().split_once(':').ok_or_else(invalid)?;

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hours) || hours.len() > 2 || !all_digits(minutes) || minutes.len() != 2 {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    Ok((hours, minutes))
}

/// Formats a duration as `HH:MM`, rejecting anything at or above 19:59.
pub fn time_spent_to_string(delta: TimeDelta) -> Result<String> {
    TimeSpent::from_time_delta(delta).map(|t| t.to_string())
}

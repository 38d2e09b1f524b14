// NHL season identifiers ("20242025") and the September rollover rule.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Month (1-based) in which a new season starts.
const SEASON_START_MONTH: u32 = 9;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeasonError {
    #[error("invalid season `{0}` (expected YYYYYYYY)")]
    Malformed(String),
}

/// An 8-digit season identifier spanning two calendar years.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Season(String);

impl Season {
    /// Parse a season identifier. Surrounding whitespace is ignored; the rest
    /// must be exactly eight ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, SeasonError> {
        let trimmed = raw.trim();
        if trimmed.len() == 8 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Season(trimmed.to_string()))
        } else {
            Err(SeasonError::Malformed(raw.to_string()))
        }
    }

    /// Build the season that starts in calendar year `year`.
    pub fn from_start_year(year: i32) -> Self {
        Season(format!("{:04}{:04}", year, year + 1))
    }

    /// The season in progress (or about to start) on `date`.
    pub fn current_for(date: NaiveDate) -> Self {
        Self::from_start_year(current_start_year(date))
    }

    /// The season in progress today, by local time.
    pub fn current() -> Self {
        Self::current_for(chrono::Local::now().date_naive())
    }

    pub fn start_year(&self) -> i32 {
        // Always eight digits, see `parse`.
        self.0[..4].parse().unwrap_or_default()
    }

    pub fn previous(&self) -> Self {
        Self::from_start_year(self.start_year() - 1)
    }

    pub fn next(&self) -> Self {
        Self::from_start_year(self.start_year() + 1)
    }

    /// The three seasons offered by the season picker: the one before this
    /// season, this season, and the one after. Relative to `self`, not to
    /// today, so repeated navigation keeps moving the window.
    pub fn picker_choices(&self) -> [Season; 3] {
        [self.previous(), self.clone(), self.next()]
    }

    /// True when this season starts more than one year after the season in
    /// progress on `today`. Such seasons have no data yet.
    pub fn exceeds_window(&self, today: NaiveDate) -> bool {
        self.start_year() > current_start_year(today) + 1
    }

    /// Human-readable label, e.g. `2024–2025`.
    pub fn label(&self) -> String {
        format!("{}–{}", &self.0[..4], &self.0[4..])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn current_start_year(date: NaiveDate) -> i32 {
    if date.month() >= SEASON_START_MONTH {
        date.year()
    } else {
        date.year() - 1
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Season {
    type Error = SeasonError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Season::parse(&value)
    }
}

impl From<Season> for String {
    fn from(season: Season) -> Self {
        season.0
    }
}

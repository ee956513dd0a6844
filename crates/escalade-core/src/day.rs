use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Day of the week with the importer's internal numbering: 0 = Sunday
/// through 6 = Saturday, matching the roster CSV convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    pub const WEEKDAYS: [DayOfWeek; 5] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
    ];

    pub const WEEKEND: [DayOfWeek; 2] = [DayOfWeek::Saturday, DayOfWeek::Sunday];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// ISO-style weekday number used by `weekly_restriction`: Monday = 1
    /// through Saturday = 6, Sunday = 7.
    pub fn iso_number(self) -> u8 {
        match self {
            DayOfWeek::Sunday => 7,
            other => other.index() as u8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "sunday",
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
        }
    }

    /// Parses a single-day token: an English weekday name (case-insensitive)
    /// or a 0..=6 index.
    pub fn parse(token: &str) -> Result<Self, DomainError> {
        let token = token.trim();
        if let Ok(index) = token.parse::<usize>() {
            return Self::from_index(index).ok_or_else(|| DomainError::UnknownDay(token.into()));
        }
        let lower = token.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.name() == lower)
            .ok_or_else(|| DomainError::UnknownDay(token.into()))
    }

    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            DayOfWeek::Sunday => chrono::Weekday::Sun,
            DayOfWeek::Monday => chrono::Weekday::Mon,
            DayOfWeek::Tuesday => chrono::Weekday::Tue,
            DayOfWeek::Wednesday => chrono::Weekday::Wed,
            DayOfWeek::Thursday => chrono::Weekday::Thu,
            DayOfWeek::Friday => chrono::Weekday::Fri,
            DayOfWeek::Saturday => chrono::Weekday::Sat,
        }
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Expands a roster `day_of_week` token into the days it covers.
///
/// Beyond single days this accepts `weekday`/`weekdays` (Monday through
/// Friday), `weekend`/`weekends` (Saturday and Sunday) and `all`. Returns
/// `None` for tokens that match nothing; the caller decides whether that is
/// a warning or an error.
pub fn expand_day_token(token: &str) -> Option<Vec<DayOfWeek>> {
    match token.trim().to_ascii_lowercase().as_str() {
        "weekday" | "weekdays" => Some(DayOfWeek::WEEKDAYS.to_vec()),
        "weekend" | "weekends" => Some(DayOfWeek::WEEKEND.to_vec()),
        "all" => Some(DayOfWeek::ALL.to_vec()),
        _ => DayOfWeek::parse(token).ok().map(|d| vec![d]),
    }
}

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub const SECONDS_PER_DAY: u32 = 86_400;

/// A wall-clock time of day parsed from roster CSV.
///
/// Keeps both the normalized seconds-since-midnight value and the raw source
/// text. The pipeline's period collapsing intentionally compares raw text
/// (so `9:00` and `09:00` are distinct windows, matching the historical
/// importer), while all duration arithmetic uses the normalized value.
/// `24:00` is accepted as an exclusive end-of-day sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TimeOfDay {
    raw: String,
    seconds: u32,
}

impl TimeOfDay {
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let raw = input.trim();
        let invalid = || DomainError::InvalidTime(input.to_string());
        let fields: Vec<&str> = raw.split(':').collect();
        let (h, m, s) = match fields[..] {
            [h, m] => (h, m, "0"),
            [h, m, s] => (h, m, s),
            _ => return Err(invalid()),
        };
        let hours: u32 = h.parse().map_err(|_| invalid())?;
        let minutes: u32 = m.parse().map_err(|_| invalid())?;
        let secs: u32 = s.parse().map_err(|_| invalid())?;
        if hours > 24 || minutes >= 60 || secs >= 60 {
            return Err(invalid());
        }
        let total = hours * 3600 + minutes * 60 + secs;
        if total > SECONDS_PER_DAY {
            return Err(invalid());
        }
        Ok(Self {
            raw: raw.to_string(),
            seconds: total,
        })
    }

    /// Seconds since midnight; `24:00` yields 86400.
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// The text exactly as it appeared in the roster.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// `HH:MM:SS` form expected by the wire format.
    pub fn clock(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.seconds / 3600,
            self.seconds % 3600 / 60,
            self.seconds % 60
        )
    }
}

impl PartialEq for TimeOfDay {
    fn eq(&self, other: &Self) -> bool {
        self.seconds == other.seconds
    }
}

impl Eq for TimeOfDay {}

impl PartialOrd for TimeOfDay {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeOfDay {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.seconds.cmp(&other.seconds)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.raw
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!(TimeOfDay::parse("9:00").unwrap().seconds(), 32_400);
        assert_eq!(TimeOfDay::parse("09:00").unwrap().seconds(), 32_400);
        assert_eq!(TimeOfDay::parse("17:30:15").unwrap().seconds(), 63_015);
    }

    #[test]
    fn end_of_day_sentinel() {
        assert_eq!(TimeOfDay::parse("24:00").unwrap().seconds(), SECONDS_PER_DAY);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(TimeOfDay::parse("24:01").is_err());
        assert!(TimeOfDay::parse("10:60").is_err());
        assert!(TimeOfDay::parse("10").is_err());
        assert!(TimeOfDay::parse("ten:00").is_err());
        assert!(TimeOfDay::parse("25:00").is_err());
        assert!(TimeOfDay::parse("2000000:00").is_err());
    }

    #[test]
    fn equality_is_normalized_but_raw_is_kept() {
        let short = TimeOfDay::parse("9:00").unwrap();
        let long = TimeOfDay::parse("09:00").unwrap();
        assert_eq!(short, long);
        assert_ne!(short.raw(), long.raw());
    }

    #[test]
    fn clock_formats_hh_mm_ss() {
        assert_eq!(TimeOfDay::parse("9:05").unwrap().clock(), "09:05:00");
        assert_eq!(TimeOfDay::parse("23:59:59").unwrap().clock(), "23:59:59");
    }
}

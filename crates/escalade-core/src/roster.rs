use serde::{Deserialize, Serialize};

use crate::day::{expand_day_token, DayOfWeek};
use crate::error::DomainError;
use crate::time::TimeOfDay;

/// A raw row of a weekly-shifts roster CSV, header already stripped.
/// Columns in file order; everything is still text at this stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRow {
    pub escalation_level: String,
    pub user_or_team: String,
    pub kind: String,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssigneeKind {
    User,
    Team,
}

impl AssigneeKind {
    pub fn parse(token: &str) -> Result<Self, DomainError> {
        match token.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(AssigneeKind::User),
            "team" => Ok(AssigneeKind::Team),
            _ => Err(DomainError::UnknownAssigneeKind(token.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: String,
    pub kind: AssigneeKind,
}

/// One coverage assignment: who covers which escalation level during which
/// time window. The same entry is cloned into every day bucket its
/// `day_of_week` token expands to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageEntry {
    pub escalation_level: u32,
    pub assignee: String,
    pub kind: AssigneeKind,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// A row dropped because its day token matched nothing. Non-fatal; surfaced
/// so the caller can log it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub assignee: String,
    pub day_token: String,
}

/// Seven ordered day buckets (index 0 = Sunday) of coverage entries,
/// insertion order preserved. Entry order later decides which assignee
/// lands on which parallel schedule, so it must follow CSV row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRoster {
    days: [Vec<CoverageEntry>; 7],
}

impl WeekRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buckets raw CSV rows into days of the week.
    ///
    /// Malformed levels, times or assignee kinds are fatal for the file;
    /// unrecognized day tokens only skip the row.
    pub fn from_rows(rows: &[WeeklyRow]) -> Result<(Self, Vec<SkippedRow>), DomainError> {
        let mut roster = Self::new();
        let mut skipped = Vec::new();
        for row in rows {
            let level: u32 = row.escalation_level.trim().parse().map_err(|_| {
                DomainError::InvalidRow {
                    assignee: row.user_or_team.clone(),
                    reason: format!("bad escalation_level {:?}", row.escalation_level),
                }
            })?;
            if level == 0 {
                return Err(DomainError::InvalidRow {
                    assignee: row.user_or_team.clone(),
                    reason: "escalation_level must be 1 or greater".into(),
                });
            }
            let kind = AssigneeKind::parse(&row.kind)?;
            let entry = CoverageEntry {
                escalation_level: level,
                assignee: row.user_or_team.trim().to_string(),
                kind,
                start: TimeOfDay::parse(&row.start_time)?,
                end: TimeOfDay::parse(&row.end_time)?,
            };
            match expand_day_token(&row.day_of_week) {
                Some(days) => {
                    for day in days {
                        roster.push(day, entry.clone());
                    }
                }
                None => skipped.push(SkippedRow {
                    assignee: row.user_or_team.clone(),
                    day_token: row.day_of_week.clone(),
                }),
            }
        }
        Ok((roster, skipped))
    }

    pub fn push(&mut self, day: DayOfWeek, entry: CoverageEntry) {
        self.days[day.index()].push(entry);
    }

    pub fn day(&self, day: DayOfWeek) -> &[CoverageEntry] {
        &self.days[day.index()]
    }

    pub fn iter_days(&self) -> impl Iterator<Item = (DayOfWeek, &[CoverageEntry])> {
        DayOfWeek::ALL
            .into_iter()
            .map(move |d| (d, self.days[d.index()].as_slice()))
    }

    pub fn total_entries(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }
}

use crate::day::DayOfWeek;
use crate::roster::Assignee;
use crate::time::TimeOfDay;

use super::partition::LevelGroup;

/// A distinct coverage window on one day, carrying every assignee whose
/// entry named exactly that window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimePeriod {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub assignees: Vec<Assignee>,
}

/// A level's week, re-expressed as per-day time periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelPeriods {
    pub level: u32,
    pub name: String,
    pub days: [Vec<TimePeriod>; 7],
}

/// Merges a level's per-day entries into shared time periods.
///
/// Two entries share a period only when their raw start and end text match
/// exactly: `9:00` and `09:00` stay separate, and partially overlapping
/// windows are never merged. This mirrors the historical importer; callers
/// must not rely on interval semantics here.
pub fn collapse_periods(group: &LevelGroup) -> LevelPeriods {
    let mut days: [Vec<TimePeriod>; 7] = Default::default();
    for day in DayOfWeek::ALL {
        let periods = &mut days[day.index()];
        for entry in group.day(day) {
            let assignee = Assignee {
                id: entry.assignee.clone(),
                kind: entry.kind,
            };
            match periods.iter_mut().find(|p| {
                p.start.raw() == entry.start.raw() && p.end.raw() == entry.end.raw()
            }) {
                Some(period) => period.assignees.push(assignee),
                None => periods.push(TimePeriod {
                    start: entry.start.clone(),
                    end: entry.end.clone(),
                    assignees: vec![assignee],
                }),
            }
        }
    }
    LevelPeriods {
        level: group.level,
        name: group.name.clone(),
        days,
    }
}

impl LevelPeriods {
    pub fn day(&self, day: DayOfWeek) -> &[TimePeriod] {
        &self.days[day.index()]
    }

    /// Largest simultaneous-assignee count in any single period. The
    /// overlap splitter produces exactly this many parallel schedules.
    pub fn max_simultaneous(&self) -> usize {
        self.days
            .iter()
            .flatten()
            .map(|p| p.assignees.len())
            .max()
            .unwrap_or(0)
    }
}

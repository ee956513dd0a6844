use crate::day::DayOfWeek;
use crate::roster::Assignee;
use crate::time::TimeOfDay;

use super::split::LayeredSchedule;

/// A coverage window recurring on a set of days within one schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringPeriod {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub assignee: Assignee,
    pub days: Vec<DayOfWeek>,
}

impl RecurringPeriod {
    /// A window held every day of the week becomes a daily restriction;
    /// anything else becomes one weekly restriction per listed day.
    pub fn covers_whole_week(&self) -> bool {
        self.days.len() == 7
    }
}

/// A schedule with the day dimension inverted: each distinct
/// (start, end, assignee) triple carries the days it recurs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedSchedule {
    pub name: String,
    pub periods: Vec<RecurringPeriod>,
}

/// Merges identical windows recurring across days into one entry each.
///
/// Days are visited 0..=6, so `days` sets are ascending and the period
/// order reflects first appearance. The match key is (raw start, raw end,
/// assignee id), consistent with the collapser's literal matching.
pub fn consolidate(schedule: &LayeredSchedule) -> ConsolidatedSchedule {
    let mut periods: Vec<RecurringPeriod> = Vec::new();
    for day in DayOfWeek::ALL {
        for single in schedule.day(day) {
            match periods.iter_mut().find(|p| {
                p.start.raw() == single.start.raw()
                    && p.end.raw() == single.end.raw()
                    && p.assignee.id == single.assignee.id
            }) {
                Some(period) => period.days.push(day),
                None => periods.push(RecurringPeriod {
                    start: single.start.clone(),
                    end: single.end.clone(),
                    assignee: single.assignee.clone(),
                    days: vec![day],
                }),
            }
        }
    }
    ConsolidatedSchedule {
        name: schedule.name.clone(),
        periods,
    }
}

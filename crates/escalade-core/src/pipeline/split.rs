use crate::day::DayOfWeek;
use crate::roster::Assignee;
use crate::time::TimeOfDay;

use super::periods::LevelPeriods;

/// A coverage window carrying exactly one assignee, post-split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinglePeriod {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub assignee: Assignee,
}

/// One of a level's parallel schedules: seven days of single-assignee
/// periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayeredSchedule {
    pub name: String,
    pub days: [Vec<SinglePeriod>; 7],
}

impl LayeredSchedule {
    fn named(name: String) -> Self {
        Self {
            name,
            days: Default::default(),
        }
    }

    pub fn day(&self, day: DayOfWeek) -> &[SinglePeriod] {
        &self.days[day.index()]
    }
}

/// Fans a level's time periods out into parallel schedules.
///
/// Single-assignee periods stay on schedule #0, which starts out named
/// after the level group. A period with k simultaneous assignees places
/// list position l on schedule #l, creating missing schedules up to that
/// index and (re)naming every touched slot `"{level} {multi_label} {l+1}"`,
/// as the historical importer did. Assignee order inside a period follows
/// CSV row order, so the split is stable across days.
pub fn split_overlaps(periods: &LevelPeriods, multi_label: &str) -> Vec<LayeredSchedule> {
    let mut schedules = vec![LayeredSchedule::named(periods.name.clone())];
    for day in DayOfWeek::ALL {
        for period in periods.day(day) {
            if let [assignee] = &period.assignees[..] {
                schedules[0].days[day.index()].push(SinglePeriod {
                    start: period.start.clone(),
                    end: period.end.clone(),
                    assignee: assignee.clone(),
                });
                continue;
            }
            for (slot, assignee) in period.assignees.iter().enumerate() {
                ensure_schedule(&mut schedules, slot, &periods.name, multi_label);
                schedules[slot].name = multi_name(&periods.name, multi_label, slot);
                schedules[slot].days[day.index()].push(SinglePeriod {
                    start: period.start.clone(),
                    end: period.end.clone(),
                    assignee: assignee.clone(),
                });
            }
        }
    }
    schedules
}

fn multi_name(base: &str, multi_label: &str, slot: usize) -> String {
    format!("{base} {multi_label} {}", slot + 1)
}

/// Grows the schedule list so that `index` is valid, initializing each new
/// schedule with seven empty days.
fn ensure_schedule(
    schedules: &mut Vec<LayeredSchedule>,
    index: usize,
    base: &str,
    multi_label: &str,
) {
    while schedules.len() <= index {
        let slot = schedules.len();
        schedules.push(LayeredSchedule::named(multi_name(base, multi_label, slot)));
    }
}

use std::collections::BTreeMap;

use crate::day::DayOfWeek;
use crate::error::DomainError;
use crate::roster::{CoverageEntry, WeekRoster};

/// One escalation level's slice of the week: the entries of each day bucket
/// whose level matches, order preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelGroup {
    pub level: u32,
    pub name: String,
    pub days: [Vec<CoverageEntry>; 7],
}

/// Regroups a week of entries by escalation level.
///
/// Levels are 1-based and must be dense: a roster using levels {1, 3}
/// fails with [`DomainError::LevelGap`] instead of silently producing a
/// sparse policy. The result is ordered ascending, so level n sits at
/// index n - 1.
pub fn partition_by_level(
    week: &WeekRoster,
    base_name: &str,
    level_label: &str,
) -> Result<Vec<LevelGroup>, DomainError> {
    let mut by_level: BTreeMap<u32, [Vec<CoverageEntry>; 7]> = BTreeMap::new();
    for (day, entries) in week.iter_days() {
        for entry in entries {
            by_level.entry(entry.escalation_level).or_default()[day.index()].push(entry.clone());
        }
    }

    let mut groups = Vec::with_capacity(by_level.len());
    for (position, (level, days)) in by_level.into_iter().enumerate() {
        let expected = position as u32 + 1;
        if level != expected {
            return Err(DomainError::LevelGap(expected));
        }
        groups.push(LevelGroup {
            level,
            name: format!("{base_name} {level_label} {level}"),
            days,
        });
    }
    Ok(groups)
}

impl LevelGroup {
    pub fn day(&self, day: DayOfWeek) -> &[CoverageEntry] {
        &self.days[day.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::AssigneeKind;
    use crate::time::TimeOfDay;

    fn entry(level: u32, who: &str) -> CoverageEntry {
        CoverageEntry {
            escalation_level: level,
            assignee: who.into(),
            kind: AssigneeKind::User,
            start: TimeOfDay::parse("09:00").unwrap(),
            end: TimeOfDay::parse("17:00").unwrap(),
        }
    }

    fn week(entries: &[(DayOfWeek, CoverageEntry)]) -> WeekRoster {
        let mut week = WeekRoster::new();
        for (day, e) in entries {
            week.push(*day, e.clone());
        }
        week
    }

    #[test]
    fn partitions_without_loss_or_duplication() {
        let week = week(&[
            (DayOfWeek::Monday, entry(1, "alice")),
            (DayOfWeek::Monday, entry(2, "bob")),
            (DayOfWeek::Friday, entry(1, "carol")),
        ]);
        let groups = partition_by_level(&week, "Ops", "Level").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(groups.len(), 2);
        let total: usize = groups
            .iter()
            .flat_map(|g| g.days.iter())
            .map(Vec::len)
            .sum();
        assert_eq!(total, week.total_entries());
        assert_eq!(groups[0].day(DayOfWeek::Monday)[0].assignee, "alice");
        assert_eq!(groups[0].day(DayOfWeek::Friday)[0].assignee, "carol");
        assert_eq!(groups[1].day(DayOfWeek::Monday)[0].assignee, "bob");
    }

    #[test]
    fn group_names_carry_the_level() {
        let week = week(&[(DayOfWeek::Monday, entry(1, "alice"))]);
        let groups = partition_by_level(&week, "Ops", "Level").unwrap();
        assert_eq!(groups[0].name, "Ops Level 1");
    }

    #[test]
    fn level_gaps_are_rejected() {
        let week = week(&[
            (DayOfWeek::Monday, entry(1, "alice")),
            (DayOfWeek::Monday, entry(3, "bob")),
        ]);
        assert_eq!(
            partition_by_level(&week, "Ops", "Level").unwrap_err(),
            DomainError::LevelGap(2)
        );
    }

    #[test]
    fn empty_week_partitions_to_nothing() {
        let groups = partition_by_level(&WeekRoster::new(), "Ops", "Level").unwrap();
        assert!(groups.is_empty());
    }
}

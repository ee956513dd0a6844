//! The schedule-layering pipeline for the weekly-shifts path.
//!
//! A flat week of coverage entries flows through four stages:
//! partition by escalation level, collapse identical windows into shared
//! time periods, split simultaneous assignees into parallel schedules,
//! then consolidate identical periods recurring across days.

pub mod consolidate;
pub mod partition;
pub mod periods;
pub mod split;

pub use consolidate::{consolidate, ConsolidatedSchedule, RecurringPeriod};
pub use partition::{partition_by_level, LevelGroup};
pub use periods::{collapse_periods, LevelPeriods, TimePeriod};
pub use split::{split_overlaps, LayeredSchedule, SinglePeriod};

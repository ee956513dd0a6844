use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::day::DayOfWeek;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid time {0:?}: must be H:MM, HH:MM or HH:MM:SS")]
    InvalidTime(String),
    #[error("invalid date {0:?}: must be YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid row for {assignee:?}: {reason}")]
    InvalidRow { assignee: String, reason: String },
    #[error("type must be user or team, got {0:?}")]
    UnknownAssigneeKind(String),
    #[error("unknown day of week {0:?}")]
    UnknownDay(String),
    #[error("escalation levels must be dense starting at 1, missing level {0}")]
    LevelGap(u32),
    #[error("level {level} has more than 25 targets on {day}")]
    CapacityExceeded { level: u32, day: DayOfWeek },
    #[error("all rows of rotation layer {0} must match")]
    MismatchedRotationLayer(u32),
    #[error("unknown rotation type {0:?}")]
    UnknownRotationType(String),
    #[error("unknown shift type {0:?}")]
    UnknownShiftUnit(String),
    #[error("rotation layer {layer} is missing {field}")]
    MissingField { layer: u32, field: &'static str },
    #[error("handoff day {handoff} precedes start date {start}")]
    HandoffBeforeStart { handoff: NaiveDate, start: NaiveDate },
    #[error("restriction start and end are identical")]
    EmptyRestriction,
    #[error("{0} does not exist in the configured time zone")]
    UnrepresentableLocalTime(NaiveDateTime),
}

//! The standard-rotation path: CSV rows already grouped by rotation layer
//! are turned directly into schedule-layer parameters (turn length, virtual
//! start, restriction) without the weekly collapsing pipeline.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::day::DayOfWeek;
use crate::error::DomainError;
use crate::time::{TimeOfDay, SECONDS_PER_DAY};

const SECONDS_PER_WEEK: u64 = 604_800;

/// A raw row of a standard-rotation roster CSV, header already stripped.
/// Empty strings mean "not provided".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationRow {
    pub user: String,
    pub layer: String,
    pub layer_name: String,
    pub rotation_type: String,
    pub shift_length: String,
    pub shift_type: String,
    pub handoff_day: String,
    pub handoff_time: String,
    pub restriction_start_day: String,
    pub restriction_start_time: String,
    pub restriction_end_day: String,
    pub restriction_end_time: String,
}

impl RotationRow {
    /// True when every non-user column matches. Rows of one layer must
    /// agree on all of them.
    fn shape_matches(&self, other: &Self) -> bool {
        self.layer_name == other.layer_name
            && self.rotation_type == other.rotation_type
            && self.shift_length == other.shift_length
            && self.shift_type == other.shift_type
            && self.handoff_day == other.handoff_day
            && self.handoff_time == other.handoff_time
            && self.restriction_start_day == other.restriction_start_day
            && self.restriction_start_time == other.restriction_start_time
            && self.restriction_end_day == other.restriction_end_day
            && self.restriction_end_time == other.restriction_end_time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationType {
    Daily,
    Weekly,
    Custom,
}

impl RotationType {
    pub fn parse(token: &str) -> Result<Self, DomainError> {
        match token.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(RotationType::Daily),
            "weekly" => Ok(RotationType::Weekly),
            "custom" => Ok(RotationType::Custom),
            _ => Err(DomainError::UnknownRotationType(token.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftUnit {
    Hours,
    Days,
    Weeks,
}

impl ShiftUnit {
    pub fn parse(token: &str) -> Result<Self, DomainError> {
        match token.trim().to_ascii_lowercase().as_str() {
            "hours" => Ok(ShiftUnit::Hours),
            "days" => Ok(ShiftUnit::Days),
            "weeks" => Ok(ShiftUnit::Weeks),
            _ => Err(DomainError::UnknownShiftUnit(token.to_string())),
        }
    }

    pub fn seconds(self) -> u64 {
        match self {
            ShiftUnit::Hours => 3600,
            ShiftUnit::Days => SECONDS_PER_DAY as u64,
            ShiftUnit::Weeks => SECONDS_PER_WEEK,
        }
    }
}

/// The on-call window of a rotation layer. `days` is present only when the
/// CSV named both a start and an end day; absent (or equal) days mean the
/// window recurs daily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionWindow {
    pub days: Option<(DayOfWeek, DayOfWeek)>,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// One rotation layer with its users in CSV order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationLayer {
    pub number: u32,
    pub name: String,
    pub rotation_type: RotationType,
    pub shift_length: Option<u32>,
    pub shift_unit: Option<ShiftUnit>,
    pub handoff_day: Option<String>,
    pub handoff_time: Option<TimeOfDay>,
    pub restriction: Option<RestrictionWindow>,
    pub users: Vec<String>,
}

/// Groups rotation rows by layer number, validating that every row of a
/// layer agrees on all non-user fields.
pub fn group_rotation_rows(rows: &[RotationRow]) -> Result<Vec<RotationLayer>, DomainError> {
    let mut by_layer: BTreeMap<u32, (&RotationRow, Vec<String>)> = BTreeMap::new();
    for row in rows {
        let number: u32 = row.layer.trim().parse().map_err(|_| DomainError::InvalidRow {
            assignee: row.user.clone(),
            reason: format!("bad layer {:?}", row.layer),
        })?;
        match by_layer.get_mut(&number) {
            Some((prototype, users)) => {
                if !prototype.shape_matches(row) {
                    return Err(DomainError::MismatchedRotationLayer(number));
                }
                users.push(row.user.trim().to_string());
            }
            None => {
                by_layer.insert(number, (row, vec![row.user.trim().to_string()]));
            }
        }
    }

    by_layer
        .into_iter()
        .map(|(number, (row, users))| parse_layer(number, row, users))
        .collect()
}

fn parse_layer(
    number: u32,
    row: &RotationRow,
    users: Vec<String>,
) -> Result<RotationLayer, DomainError> {
    let optional = |s: &str| {
        let t = s.trim();
        (!t.is_empty()).then(|| t.to_string())
    };

    let shift_length = match optional(&row.shift_length) {
        Some(raw) => Some(raw.parse::<u32>().map_err(|_| DomainError::InvalidRow {
            assignee: row.user.clone(),
            reason: format!("bad shift_length {raw:?}"),
        })?),
        None => None,
    };
    let shift_unit = match optional(&row.shift_type) {
        Some(raw) => Some(ShiftUnit::parse(&raw)?),
        None => None,
    };
    let handoff_time = match optional(&row.handoff_time) {
        Some(raw) => Some(TimeOfDay::parse(&raw)?),
        None => None,
    };

    let restriction = match (
        optional(&row.restriction_start_time),
        optional(&row.restriction_end_time),
    ) {
        (Some(start), Some(end)) => {
            let days = match (
                optional(&row.restriction_start_day),
                optional(&row.restriction_end_day),
            ) {
                (Some(s), Some(e)) => Some((DayOfWeek::parse(&s)?, DayOfWeek::parse(&e)?)),
                (None, None) => None,
                _ => {
                    return Err(DomainError::MissingField {
                        layer: number,
                        field: "restriction start/end day",
                    })
                }
            };
            Some(RestrictionWindow {
                days,
                start: TimeOfDay::parse(&start)?,
                end: TimeOfDay::parse(&end)?,
            })
        }
        (None, None) => None,
        _ => {
            return Err(DomainError::MissingField {
                layer: number,
                field: "restriction start/end time",
            })
        }
    };

    Ok(RotationLayer {
        number,
        name: row.layer_name.trim().to_string(),
        rotation_type: RotationType::parse(&row.rotation_type)?,
        shift_length,
        shift_unit,
        handoff_day: optional(&row.handoff_day),
        handoff_time,
        restriction,
        users,
    })
}

/// Seconds each rotation turn lasts: a day, a week, or the custom shift
/// length in its unit.
pub fn rotation_turn_length(layer: &RotationLayer) -> Result<u64, DomainError> {
    match layer.rotation_type {
        RotationType::Daily => Ok(SECONDS_PER_DAY as u64),
        RotationType::Weekly => Ok(SECONDS_PER_WEEK),
        RotationType::Custom => {
            let length = layer.shift_length.ok_or(DomainError::MissingField {
                layer: layer.number,
                field: "shift_length",
            })?;
            let unit = layer.shift_unit.ok_or(DomainError::MissingField {
                layer: layer.number,
                field: "shift_type",
            })?;
            Ok(u64::from(length) * unit.seconds())
        }
    }
}

/// The reference timestamp rotation turns are counted from.
///
/// Daily rotations hand off at the handoff time on the start date; weekly
/// rotations on the first occurrence of the handoff day on or after the
/// start date. Custom rotations may name an explicit handoff date, which
/// must not precede the start date.
pub fn virtual_start(
    layer: &RotationLayer,
    start_date: NaiveDate,
    tz: Tz,
) -> Result<DateTime<Tz>, DomainError> {
    let time = handoff_clock(layer.handoff_time.as_ref());
    match layer.rotation_type {
        RotationType::Daily => localize(start_date, time, tz),
        RotationType::Weekly => {
            let token = layer
                .handoff_day
                .as_deref()
                .ok_or(DomainError::MissingField {
                    layer: layer.number,
                    field: "handoff_day",
                })?;
            let target = DayOfWeek::parse(token)?;
            let mut date = start_date;
            while date.weekday() != target.to_chrono() {
                date = date
                    .succ_opt()
                    .ok_or_else(|| DomainError::InvalidDate(date.to_string()))?;
            }
            localize(date, time, tz)
        }
        RotationType::Custom => match layer.handoff_day.as_deref() {
            None => localize(start_date, time, tz),
            Some(raw) => {
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| DomainError::InvalidDate(raw.to_string()))?;
                if date < start_date {
                    return Err(DomainError::HandoffBeforeStart {
                        handoff: date,
                        start: start_date,
                    });
                }
                localize(date, time, tz)
            }
        },
    }
}

fn handoff_clock(time: Option<&TimeOfDay>) -> NaiveTime {
    let seconds = time.map(TimeOfDay::seconds).unwrap_or(0) % SECONDS_PER_DAY;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or(NaiveTime::MIN)
}

/// Interprets a naive local date and time in `tz`, taking the earliest
/// instant on DST-fold ambiguity.
pub fn localize(
    date: NaiveDate,
    time: NaiveTime,
    tz: Tz,
) -> Result<DateTime<Tz>, DomainError> {
    let naive = date.and_time(time);
    match naive.and_local_timezone(tz) {
        chrono::LocalResult::Single(dt) => Ok(dt),
        chrono::LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        chrono::LocalResult::None => Err(DomainError::UnrepresentableLocalTime(naive)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionKind {
    Daily,
    Weekly,
}

/// A restriction ready for the wire: kind, clock start, duration, and the
/// ISO start day for weekly restrictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionPlan {
    pub kind: RestrictionKind,
    pub start_time_of_day: String,
    pub duration_seconds: u64,
    pub start_day_of_week: Option<u8>,
}

/// Computes the restriction for a rotation layer's window.
///
/// Absent or equal start/end days yield a daily restriction; distinct days
/// a weekly one. Durations wrap across midnight and the week boundary and
/// are always positive; an identical start and end is a fatal input error.
pub fn plan_restriction(window: &RestrictionWindow) -> Result<RestrictionPlan, DomainError> {
    let start_secs = u64::from(window.start.seconds());
    let end_secs = u64::from(window.end.seconds());
    match window.days {
        None => daily_plan(window, start_secs, end_secs),
        Some((s, e)) if s == e => daily_plan(window, start_secs, end_secs),
        Some((start_day, end_day)) => {
            let day = i64::from(SECONDS_PER_DAY);
            let from = start_day.index() as i64 * day + start_secs as i64;
            let to = end_day.index() as i64 * day + end_secs as i64;
            let duration = (to - from).rem_euclid(SECONDS_PER_WEEK as i64) as u64;
            if duration == 0 {
                return Err(DomainError::EmptyRestriction);
            }
            Ok(RestrictionPlan {
                kind: RestrictionKind::Weekly,
                start_time_of_day: window.start.clock(),
                duration_seconds: duration,
                start_day_of_week: Some(start_day.iso_number()),
            })
        }
    }
}

fn daily_plan(
    window: &RestrictionWindow,
    start_secs: u64,
    end_secs: u64,
) -> Result<RestrictionPlan, DomainError> {
    if start_secs == end_secs {
        return Err(DomainError::EmptyRestriction);
    }
    let day = u64::from(SECONDS_PER_DAY);
    let duration = if end_secs > start_secs {
        end_secs - start_secs
    } else {
        end_secs + day - start_secs
    };
    Ok(RestrictionPlan {
        kind: RestrictionKind::Daily,
        start_time_of_day: window.start.clock(),
        duration_seconds: duration,
        start_day_of_week: None,
    })
}

use chrono::NaiveDate;
use chrono_tz::Tz;

/// Read-only import configuration shared by every file of a run.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Escalation policy name and prefix of every schedule name.
    pub base_name: String,
    /// Label inserted before the level number in schedule group names.
    pub level_label: String,
    /// Label inserted before the slot number when overlapping coverage
    /// splits a level into several parallel schedules.
    pub multi_label: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub time_zone: Tz,
    /// 0 disables repetition of the escalation policy.
    pub num_loops: u32,
    pub escalation_delay_minutes: u32,
}

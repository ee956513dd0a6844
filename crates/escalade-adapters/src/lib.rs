pub mod csvfile;
pub mod pagerduty;

pub use csvfile::CsvRoster;
pub use pagerduty::PagerDutyClient;

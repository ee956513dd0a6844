pub mod day;
pub mod error;
pub mod pipeline;
pub mod roster;
pub mod rotation;
pub mod time;

pub use day::DayOfWeek;
pub use error::DomainError;
pub use time::TimeOfDay;

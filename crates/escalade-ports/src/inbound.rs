use escalade_core::roster::WeeklyRow;
use escalade_core::rotation::RotationRow;

use crate::error::PortError;

/// A source of roster rows, one file's worth, header already stripped.
pub trait RosterSource {
    fn weekly_rows(&self) -> Result<Vec<WeeklyRow>, PortError>;
    fn rotation_rows(&self) -> Result<Vec<RotationRow>, PortError>;
}

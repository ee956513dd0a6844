pub mod config;
pub mod error;
pub mod payload;
pub mod rotation;
pub mod weekly;

pub use config::ImportConfig;
pub use error::AppError;
pub use rotation::StandardRotationImporter;
pub use weekly::WeeklyShiftImporter;

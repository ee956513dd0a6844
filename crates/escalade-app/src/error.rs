use escalade_core::error::DomainError;
use escalade_ports::error::PortError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("input error: {0}")]
    Domain(#[from] DomainError),
    #[error("remote error: {0}")]
    Port(#[from] PortError),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("no match for {0:?}")]
    NotFound(String),
    #[error("more than one match for {0:?}, use a unique identifier")]
    Ambiguous(String),
    #[error("remote call failed with status {status}: {body}")]
    Remote { status: u16, body: String },
    #[error("connection error: {0}")]
    Connection(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("malformed input: {0}")]
    Malformed(String),
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Scan error: {0}")]
    ScanError(String),

    #[error("Lifecycle coordinator is not running")]
    CoordinatorClosed,
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("display concurrency {requested} is invalid for {available} registered item(s)")]
    InvalidConcurrency { requested: usize, available: usize },

    #[error("no items registered")]
    EmptyRegistry,

    #[error("snapshot io error: {0}")]
    SnapshotIo(#[from] std::io::Error),

    #[error("snapshot parse error: {0}")]
    SnapshotParse(#[from] serde_json::Error),
}

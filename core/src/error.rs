use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Voter index {index} out of range for pool of {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("Voter pool is empty")]
    EmptyPool,

    #[error("Voter pool already initialized")]
    AlreadyInitialized,

    #[error("Relative sample requested before any seed draw")]
    CursorNotSet,

    #[error("Voter pool exhausted: {requested} voters requested, {remaining} remaining")]
    PoolExhausted { requested: u64, remaining: u64 },

    #[error("Run '{run_id}' has already been started on this engine")]
    RunAlreadyStarted { run_id: String },

    #[error("Invalid election config: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    /// Raised when a secondary-phase swap changed the tier-1 distribution that
    /// was frozen after the primary phase. Never recoverable.
    #[error(
        "Frozen invariant violated in class '{class}': tier-1 count was {expected}, now {actual}"
    )]
    FrozenInvariantViolated {
        class: String,
        expected: usize,
        actual: usize,
    },
}

pub type CfResult<T> = Result<T, ClassForgeError>;

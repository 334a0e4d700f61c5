use thiserror::Error;

#[derive(Error, Debug)]
pub enum FraudError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed {field}: '{value}'")]
    MalformedInput { field: &'static str, value: String },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("Feedback for transaction {transaction_id} repeats its original result {result}")]
    Unprocessable { transaction_id: i64, result: String },

    #[error("Conflict: {what}")]
    Conflict { what: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FraudError {
    pub fn malformed(field: &'static str, value: impl Into<String>) -> Self {
        FraudError::MalformedInput { field, value: value.into() }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        FraudError::NotFound { what: what.into() }
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        FraudError::Conflict { what: what.into() }
    }

    /// Stable token naming the error class, used on the runner's wire.
    pub fn kind(&self) -> &'static str {
        match self {
            FraudError::MalformedInput { .. } => "malformed_input",
            FraudError::NotFound { .. }       => "not_found",
            FraudError::Unprocessable { .. }  => "unprocessable",
            FraudError::Conflict { .. }       => "conflict",
            FraudError::Database(_)
            | FraudError::Serialization(_)
            | FraudError::Other(_)            => "internal",
        }
    }
}

pub type FraudResult<T> = Result<T, FraudError>;

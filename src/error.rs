use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoreError {
    /// A categorical value that has no entry in the scoring tables.
    #[error("invalid input for {field}: {value:?}")]
    InvalidInput { field: &'static str, value: String },

    #[error("invalid scoring policy: {0}")]
    InvalidPolicy(String),
}

impl ScoreError {
    pub fn invalid_input(field: &'static str, value: impl Into<String>) -> Self {
        ScoreError::InvalidInput { field, value: value.into() }
    }
}

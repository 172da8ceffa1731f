use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to read source file '{path}': {source}")]
    SourceReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode comments in '{path}': {source}")]
    DecodeError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Output,
}

impl TallyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TallyError::ConfigError { .. } | TallyError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            TallyError::SourceReadError { .. } | TallyError::DecodeError { .. } => {
                ErrorCategory::Input
            }
            TallyError::IoError(_)
            | TallyError::SerializationError(_)
            | TallyError::CsvError(_) => ErrorCategory::Output,
        }
    }

    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 1,
            ErrorCategory::Input | ErrorCategory::Output => 2,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TallyError::SourceReadError { path, .. } => {
                format!("Could not read '{}'. Check --base-dir and the file list.", path)
            }
            TallyError::DecodeError { path, .. } => format!(
                "'{}' is not a JSON array of comments. Drop --comments to scan it as raw text.",
                path
            ),
            TallyError::ConfigError { message } => format!("Configuration problem: {}", message),
            TallyError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;

//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for smacross.
#[derive(Debug, thiserror::Error)]
pub enum SmaCrossError {
    #[error("invalid {name} window: {value} (must be at least 1)")]
    InvalidWindow { name: &'static str, value: i64 },

    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("price series is empty")]
    EmptySeries,

    #[error("non-positive close {price} at bar {index}")]
    NonPositivePrice { index: usize, price: f64 },

    #[error("duplicate bar for {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SmaCrossError {
    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            SmaCrossError::Io(_) => 1,
            SmaCrossError::ConfigParse { .. }
            | SmaCrossError::ConfigMissing { .. }
            | SmaCrossError::ConfigInvalid { .. } => 2,
            SmaCrossError::EmptySeries
            | SmaCrossError::NonPositivePrice { .. }
            | SmaCrossError::DuplicateDate { .. }
            | SmaCrossError::Data { .. } => 3,
            SmaCrossError::InvalidWindow { .. } | SmaCrossError::InvalidArgument { .. } => 4,
        }
    }
}

impl From<&SmaCrossError> for std::process::ExitCode {
    fn from(err: &SmaCrossError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}

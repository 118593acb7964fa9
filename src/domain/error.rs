//! Domain error types.

/// Top-level error type for cryptochart.
#[derive(Debug, thiserror::Error)]
pub enum CryptochartError {
    #[error("unknown ticker: {ticker}")]
    UnknownTicker { ticker: String },

    #[error("no cache entry for {ticker}")]
    UnknownAsset { ticker: String },

    #[error("acquisition failed for {ticker}: {reason}")]
    AcquisitionFailed { ticker: String, reason: String },

    #[error("malformed export: {reason}")]
    MalformedExport { reason: String },

    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

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

    #[error("chart error: {reason}")]
    Chart { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CryptochartError> for std::process::ExitCode {
    fn from(err: &CryptochartError) -> Self {
        let code: u8 = match err {
            CryptochartError::Io(_) => 1,
            CryptochartError::ConfigParse { .. }
            | CryptochartError::ConfigMissing { .. }
            | CryptochartError::ConfigInvalid { .. } => 2,
            CryptochartError::Database { .. } | CryptochartError::DatabaseQuery { .. } => 3,
            CryptochartError::AcquisitionFailed { .. }
            | CryptochartError::MalformedExport { .. } => 4,
            CryptochartError::UnknownTicker { .. }
            | CryptochartError::UnknownAsset { .. }
            | CryptochartError::InvalidDateRange { .. } => 5,
            CryptochartError::Chart { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

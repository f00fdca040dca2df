use thiserror::Error;

/// Errors raised when loading or validating scan settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An environment variable holds a value of the wrong shape.
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// A setting that must be strictly positive was zero.
    #[error("{0} must be at least 1")]
    ZeroNotAllowed(&'static str),

    /// A required setting is empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// The env file could not be read or parsed.
    #[error("Env file error: {0}")]
    EnvFile(String),
}

// ============================================================================
// Configuration Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration key `{0}`")]
    MissingKey(&'static str),

    #[error("Invalid value for `{key}`: {value} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid timestamp for `{key}`: {value}")]
    InvalidTimestamp {
        key: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

use thiserror::Error;

/// Errors when loading or validating the assistant configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load assistant config: {0}")]
    Load(String),

    #[error("Failed to parse assistant config: {0}")]
    Parse(String),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

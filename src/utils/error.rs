use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmsError {
    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },
}

impl CmsError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CmsError>;

use thiserror::Error;

use crate::api::TransportError;

#[derive(Debug, Error)]
pub enum SmolchatError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("config error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SmolchatError {
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn logging_error(message: impl Into<String>) -> Self {
        Self::Logging(message.into())
    }
}

pub type SmolchatResult<T> = std::result::Result<T, SmolchatError>;

use derive_more::Display;
use kudos_config::ConfigError;
use kudos_core::{ModelError, SynthesisError};
use kudos_frontend::FrontendError;
use kudos_runtime::RuntimeError;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type: the stage that failed plus its message.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{kind}: {message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Config, err.to_string())
    }
}

impl From<FrontendError> for Error {
    fn from(err: FrontendError) -> Self {
        Self::new(ErrorKind::Frontend, err.to_string())
    }
}

impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        Self::new(ErrorKind::Model, err.to_string())
    }
}

impl From<SynthesisError> for Error {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::Model(err) => err.into(),
            err => Self::new(ErrorKind::Synthesis, err.to_string()),
        }
    }
}

impl From<RuntimeError> for Error {
    fn from(err: RuntimeError) -> Self {
        Self::new(ErrorKind::Runtime, err.to_string())
    }
}

///
/// ErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[display("config")]
    Config,
    #[display("frontend")]
    Frontend,
    #[display("model")]
    Model,
    #[display("runtime")]
    Runtime,
    #[display("synthesis")]
    Synthesis,
}

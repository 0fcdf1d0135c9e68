use serde::Serialize;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in this crate.
///
/// Service calls collapse into [`Error::CallFailed`] whatever the cause; `kind`
/// only says which layer produced the payload and is never branched on.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[serde(tag = "error")]
pub enum Error {
    #[error("call failed ({kind}): {message}")]
    CallFailed { kind: &'static str, message: String },
    #[error("invalid payload: {message}")]
    InvalidPayload { message: String },
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl Error {
    pub fn call_failed<S: Into<String>>(kind: &'static str, msg: S) -> Error {
        Error::CallFailed {
            kind,
            message: msg.into(),
        }
    }

    pub fn invalid_payload<S: Into<String>>(msg: S) -> Error {
        Error::InvalidPayload {
            message: msg.into(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::CallFailed {
            kind: "TransportError",
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::CallFailed {
            kind: "SerializationError",
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(io: std::io::Error) -> Self {
        Self::Config {
            message: io.to_string(),
        }
    }
}

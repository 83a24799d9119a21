//! Error type for the client calls

use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FbError {
    /// Reported by the fbclient, through the status vector
    #[error("sql error {code}: {msg}")]
    Sql { msg: String, code: i32 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("error: {0}")]
    Other(String),
}

impl FbError {
    /// Message without the error kind prefix
    pub fn message(&self) -> String {
        match self {
            FbError::Sql { msg, .. } => msg.clone(),
            FbError::Io(e) => e.to_string(),
            FbError::Other(msg) => msg.clone(),
        }
    }

    /// `true` if the error was reported by the fbclient
    pub fn is_sql(&self) -> bool {
        matches!(self, FbError::Sql { .. })
    }
}

impl From<String> for FbError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}

impl From<&str> for FbError {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_string())
    }
}

impl From<FromUtf8Error> for FbError {
    fn from(e: FromUtf8Error) -> Self {
        Self::Other(format!("Found an invalid utf-8 string: {}", e))
    }
}

pub fn err_not_connected<T>() -> Result<T, FbError> {
    Err(FbError::from("Not connected to a database."))
}

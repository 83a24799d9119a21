//! Errors rethrown to the JVM

use firebird_samples::FbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Fb(#[from] FbError),

    #[error("JNI error: {0}")]
    Jni(#[from] jni::errors::Error),

    #[error("Unrecognized Rust panic")]
    Panic,
}

impl BridgeError {
    /// Message of the `java.lang.Exception` thrown for this error.
    /// The status text for errors reported by the fbclient
    pub fn message(&self) -> String {
        match self {
            BridgeError::Fb(e) => e.message(),
            e => e.to_string(),
        }
    }
}

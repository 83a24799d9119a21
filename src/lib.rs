//!
//! Firebird samples
//!
//! Attach to (or create) a database through the official fbclient,
//! read the server timestamp, then drop the database or detach and
//! shut the client down
//!

mod connection;
mod transaction;

pub use crate::{
    connection::{Connection, CURRENT_TIMESTAMP_LEN, CURRENT_TIMESTAMP_SQL},
    transaction::Transaction,
};
pub use firebird_samples_core::{
    charset, charset::Charset, err_not_connected, Dialect, FbError, FirebirdClient,
    TransactionConfiguration,
};

pub use crate::connection::{
    builder_native, ConnTypeNotConfigured, Embedded, LinkageNotConfigured, NativeConnectionBuilder,
    Remote, DEFAULT_FBCLIENT,
};
pub use firebird_samples_native::{
    DynLink, DynLoad, NativeFbAttachmentConfig, NativeFbClient, RemoteConfig,
};

#[cfg(test)]
mod tests;

//! `FirebirdClient` implementation for the native fbclient

mod connection;
pub(crate) mod ibase;
pub(crate) mod status;
pub(crate) mod varchar;
pub(crate) mod xsqlda;

pub use connection::{
    DynLink, DynLoad, LinkageMarker, NativeFbAttachmentConfig, NativeFbClient, RemoteConfig,
};

//! Types, traits and constants shared by the firebird samples
//! and the client implementation they run on

pub mod charset;
mod connection;
pub(crate) mod error;
pub mod ibase;
mod params;
mod transaction;

pub use charset::Charset;
pub use connection::*;
pub use error::{err_not_connected, FbError};
pub use params::*;
pub use transaction::*;

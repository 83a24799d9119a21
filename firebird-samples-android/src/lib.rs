//! Native side of the firebird samples android app.
//!
//! The `MainActivity` of `com.example.firebirdandroidcpp` calls `connect`,
//! `getCurrentTimestamp` and `disconnect`, all backed by a single,
//! process wide, connection to an embedded database.

mod error;
mod jni_bindings;
mod session;

pub use error::BridgeError;
pub use session::{Session, LIB_FBCLIENT};

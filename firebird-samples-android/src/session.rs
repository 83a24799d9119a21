//! The connection shared by every JNI call

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard};

use firebird_samples::{
    builder_native, err_not_connected, Connection, DynLoad, FbError, NativeFbClient,
};
use log::debug;

use crate::BridgeError;

/// Client library, from the `jniLibs` of the apk
pub const LIB_FBCLIENT: &str = "libfbclient.so";

static SESSION: Mutex<Session> = Mutex::new(Session::new());

/// Lock the process wide session. The JVM may call from any thread
pub fn session() -> MutexGuard<'static, Session> {
    // A panic caught while locked leaves the session usable
    SESSION.lock().unwrap_or_else(|e| e.into_inner())
}

/// Run `f`, turning a panic into `BridgeError::Panic`
pub fn guarded<T>(f: impl FnOnce() -> Result<T, BridgeError>) -> Result<T, BridgeError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(res) => res,
        Err(_) => Err(BridgeError::Panic),
    }
}

/// The current connection, if any. The client library stays
/// loaded while connected
#[derive(Default)]
pub struct Session {
    conn: Option<Connection<NativeFbClient<DynLoad>>>,
}

impl Session {
    pub const fn new() -> Self {
        Session { conn: None }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Attach to the embedded database, creating it when the attach
    /// fails. A previous connection is shut down first
    pub fn connect(&mut self, lib_path: &str, db_name: &str) -> Result<(), FbError> {
        self.disconnect()?;

        let mut cb = builder_native().with_dyn_load(lib_path).with_embedded();
        // No credentials, the embedded engine uses the os user
        cb.user("").db_name(db_name);

        self.conn = Some(cb.connect_or_create()?);
        debug!("Connected to {}", db_name);

        Ok(())
    }

    pub fn current_timestamp(&mut self) -> Result<String, FbError> {
        match self.conn.as_mut() {
            Some(conn) => conn.current_timestamp(),
            None => err_not_connected(),
        }
    }

    /// Detach, shut the client down and unload it. Nothing to do when not connected
    pub fn disconnect(&mut self) -> Result<(), FbError> {
        if let Some(conn) = self.conn.take() {
            conn.shutdown()?;
            debug!("Disconnected");
        }

        Ok(())
    }
}

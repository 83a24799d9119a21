//!
//! Firebird samples
//!
//! Connection lifecycle: attach or create, operate, detach, shutdown
//!

use firebird_samples_core::*;
use log::{debug, warn};

use crate::transaction::Transaction;

pub mod builder_native;

pub use builder_native::*;

/// Query run by `Connection::current_timestamp`
pub const CURRENT_TIMESTAMP_SQL: &str = "select current_timestamp from rdb$database";

/// Size of the varchar that receives the current timestamp
pub const CURRENT_TIMESTAMP_LEN: u16 = 64;

/// Milliseconds `Connection::shutdown` waits for the client to close everything
pub const SHUTDOWN_TIMEOUT_MS: u32 = 0;

/// A connection to a firebird database
pub struct Connection<C: FirebirdClient> {
    /// Database handler. `None` once detached or dropped
    pub(crate) handle: Option<<C as FirebirdClientDbOps>::DbHandle>,

    /// Firebird dialect for the statements
    pub(crate) dialect: Dialect,

    /// Firebird client
    pub(crate) cli: C,
}

impl<C: FirebirdClient> Connection<C> {
    /// Attach to an existing database
    pub fn open(
        mut cli: C,
        conf: &ConnectionConfiguration<C::AttachmentConfig>,
    ) -> Result<Connection<C>, FbError> {
        let handle = cli.attach_database(&conf.attachment_conf)?;

        Ok(Self::with_handle(cli, handle, conf.dialect))
    }

    /// Create the database, staying attached to it
    pub fn create_database(
        mut cli: C,
        conf: &ConnectionConfiguration<C::AttachmentConfig>,
    ) -> Result<Connection<C>, FbError> {
        let handle =
            cli.create_database(&conf.attachment_conf, conf.page_size, conf.dialect)?;

        Ok(Self::with_handle(cli, handle, conf.dialect))
    }

    /// Attach to the database, creating it if the attach
    /// was refused by the firebird client
    pub fn open_or_create(
        mut cli: C,
        conf: &ConnectionConfiguration<C::AttachmentConfig>,
    ) -> Result<Connection<C>, FbError> {
        let handle = match cli.attach_database(&conf.attachment_conf) {
            Ok(handle) => handle,
            Err(e) if e.is_sql() => {
                warn!("Could not attach ({}), creating the database", e.message());

                cli.create_database(&conf.attachment_conf, conf.page_size, conf.dialect)?
            }
            Err(e) => return Err(e),
        };

        Ok(Self::with_handle(cli, handle, conf.dialect))
    }

    fn with_handle(
        cli: C,
        handle: <C as FirebirdClientDbOps>::DbHandle,
        dialect: Dialect,
    ) -> Connection<C> {
        debug!("Attached, using the dialect {:?}", dialect);

        Connection {
            handle: Some(handle),
            dialect,
            cli,
        }
    }

    /// `false` once the connection was closed
    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Starts a new transaction, with the default configuration
    pub fn transaction(&mut self) -> Result<Transaction<C>, FbError> {
        Transaction::new(self, TransactionConfiguration::default())
    }

    /// Starts a new transaction, with a custom configuration
    pub fn transaction_with(
        &mut self,
        confs: TransactionConfiguration,
    ) -> Result<Transaction<C>, FbError> {
        Transaction::new(self, confs)
    }

    /// Run a closure with a transaction, if the closure returns an error
    /// the transaction will rollback, else it will be committed
    pub fn with_transaction<T>(
        &mut self,
        closure: impl FnOnce(&mut Transaction<C>) -> Result<T, FbError>,
    ) -> Result<T, FbError> {
        let mut tr = self.transaction()?;

        let res = closure(&mut tr);

        if res.is_ok() {
            tr.commit()?;
        } else {
            tr.rollback()?;
        };

        res
    }

    /// Current timestamp of the server, as text. Runs on its own transaction
    pub fn current_timestamp(&mut self) -> Result<String, FbError> {
        let mut tr = self.transaction()?;

        // On error the transaction is dropped, and rolled back
        let ts = tr.query_text(CURRENT_TIMESTAMP_SQL, CURRENT_TIMESTAMP_LEN)?;

        tr.commit()?;

        ts.ok_or_else(|| FbError::from("The server returned a null current_timestamp"))
    }

    /// Drop the current database
    pub fn drop_database(mut self) -> Result<(), FbError> {
        let mut handle = match self.handle.take() {
            Some(handle) => handle,
            None => return err_not_connected(),
        };

        if let Err(e) = self.cli.drop_database(&mut handle) {
            // Still attached
            self.handle = Some(handle);
            return Err(e);
        }

        debug!("Database dropped");

        Ok(())
    }

    /// Close the current connection
    pub fn close(mut self) -> Result<(), FbError> {
        self.__close()
    }

    /// Close the connection and shut the firebird client down.
    ///
    /// With a dynamically loaded client, the library is unloaded
    /// when this returns
    pub fn shutdown(mut self) -> Result<(), FbError> {
        self.__close()?;

        self.cli.shutdown(SHUTDOWN_TIMEOUT_MS)
    }

    /// Close the current connection. With an `&mut self` to be used in the drop code too
    pub(crate) fn __close(&mut self) -> Result<(), FbError> {
        if let Some(mut handle) = self.handle.take() {
            if let Err(e) = self.cli.detach_database(&mut handle) {
                self.handle = Some(handle);
                return Err(e);
            }

            debug!("Detached");
        }

        Ok(())
    }
}

impl<C: FirebirdClient> Drop for Connection<C> {
    fn drop(&mut self) {
        if let Err(e) = self.__close() {
            warn!("Error detaching on drop: {}", e);
        }
    }
}

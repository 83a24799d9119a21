//!
//! Firebird samples
//!
//! Transaction functions
//!

use firebird_samples_core::*;
use log::warn;

use crate::Connection;

/// A transaction on a connection. Rolled back when dropped
/// without a commit or rollback
pub struct Transaction<'c, C: FirebirdClient> {
    pub(crate) conn: &'c mut Connection<C>,
    pub(crate) handle: Option<<C as FirebirdClientSqlOps>::TrHandle>,
}

impl<'c, C: FirebirdClient> Transaction<'c, C> {
    /// Start a new transaction
    pub fn new(
        conn: &'c mut Connection<C>,
        confs: TransactionConfiguration,
    ) -> Result<Self, FbError> {
        let db_handle = match conn.handle.as_mut() {
            Some(handle) => handle,
            None => return err_not_connected(),
        };
        let handle = conn.cli.begin_transaction(db_handle, confs)?;

        Ok(Transaction {
            conn,
            handle: Some(handle),
        })
    }

    /// Execute the statement without returning any row
    pub fn execute_immediate(&mut self, sql: &str) -> Result<(), FbError> {
        let conn = &mut *self.conn;
        let tr_handle = tr_handle(&mut self.handle)?;
        let db_handle = match conn.handle.as_mut() {
            Some(handle) => handle,
            None => return err_not_connected(),
        };

        conn.cli
            .exec_immediate(db_handle, tr_handle, conn.dialect, sql)
    }

    /// Execute a select returning a single row and column, received
    /// as a `VARCHAR(max_len)`. `None` for a null value
    pub fn query_text(&mut self, sql: &str, max_len: u16) -> Result<Option<String>, FbError> {
        let conn = &mut *self.conn;
        let tr_handle = tr_handle(&mut self.handle)?;
        let db_handle = match conn.handle.as_mut() {
            Some(handle) => handle,
            None => return err_not_connected(),
        };

        conn.cli
            .exec_immediate_text(db_handle, tr_handle, conn.dialect, sql, max_len)
    }

    /// Commit the current transaction changes
    pub fn commit(mut self) -> Result<(), FbError> {
        self.finish(TrOp::Commit)
    }

    /// Commit the current transaction changes, but allowing to reuse the transaction
    pub fn commit_retaining(&mut self) -> Result<(), FbError> {
        let tr_handle = tr_handle(&mut self.handle)?;
        self.conn
            .cli
            .transaction_operation(tr_handle, TrOp::CommitRetaining)
    }

    /// Rollback the current transaction changes
    pub fn rollback(mut self) -> Result<(), FbError> {
        self.finish(TrOp::Rollback)
    }

    fn finish(&mut self, op: TrOp) -> Result<(), FbError> {
        if let Some(mut handle) = self.handle.take() {
            if let Err(e) = self.conn.cli.transaction_operation(&mut handle, op) {
                // Left for the drop to rollback
                self.handle = Some(handle);
                return Err(e);
            }
        }

        Ok(())
    }
}

fn tr_handle<H>(handle: &mut Option<H>) -> Result<&mut H, FbError> {
    handle
        .as_mut()
        .ok_or_else(|| FbError::from("The transaction was already finished"))
}

impl<'c, C: FirebirdClient> Drop for Transaction<'c, C> {
    fn drop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            if let Err(e) = self
                .conn
                .cli
                .transaction_operation(&mut handle, TrOp::Rollback)
            {
                warn!("Error on the rollback of a dropped transaction: {}", e);
            }
        }
    }
}

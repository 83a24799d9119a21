//! Connection traits to abstract over the client implementations

use std::str::FromStr;

use crate::*;

/// Responsible for database administration and attachment/detachment
pub trait FirebirdClientDbOps: Send {
    /// A database handle
    type DbHandle: Send;

    /// Configuration details for attaching to the database.
    /// A user of an implementation of this trait can configure attachment details
    /// (database name, user name, etcetera) and then pass this configuration
    /// to the implementation via this type when a new attachment is requested
    type AttachmentConfig: Send + Clone;

    /// Attach to an existing database
    fn attach_database(
        &mut self,
        config: &Self::AttachmentConfig,
    ) -> Result<Self::DbHandle, FbError>;

    /// Create the database and attach to it
    fn create_database(
        &mut self,
        config: &Self::AttachmentConfig,
        page_size: Option<u32>,
        dialect: Dialect,
    ) -> Result<Self::DbHandle, FbError>;

    /// Disconnect from the database
    fn detach_database(&mut self, db_handle: &mut Self::DbHandle) -> Result<(), FbError>;

    /// Drop the database
    fn drop_database(&mut self, db_handle: &mut Self::DbHandle) -> Result<(), FbError>;

    /// Close every attachment and service of the client, waiting
    /// at most `timeout_ms` milliseconds
    fn shutdown(&mut self, timeout_ms: u32) -> Result<(), FbError>;
}

/// Responsible for transactions and statement execution
pub trait FirebirdClientSqlOps: Send {
    /// A database handle
    type DbHandle: Send;
    /// A transaction handle
    type TrHandle: Send;

    /// Start a new transaction, with the specified transaction parameters
    fn begin_transaction(
        &mut self,
        db_handle: &mut Self::DbHandle,
        confs: TransactionConfiguration,
    ) -> Result<Self::TrHandle, FbError>;

    /// Commit / Rollback a transaction
    fn transaction_operation(
        &mut self,
        tr_handle: &mut Self::TrHandle,
        op: TrOp,
    ) -> Result<(), FbError>;

    /// Execute a sql immediately, without returning rows
    fn exec_immediate(
        &mut self,
        db_handle: &mut Self::DbHandle,
        tr_handle: &mut Self::TrHandle,
        dialect: Dialect,
        sql: &str,
    ) -> Result<(), FbError>;

    /// Execute a singleton select immediately, with the only column
    /// coerced to a `VARCHAR(max_len)`.
    ///
    /// Returns `None` for a `NULL` value
    fn exec_immediate_text(
        &mut self,
        db_handle: &mut Self::DbHandle,
        tr_handle: &mut Self::TrHandle,
        dialect: Dialect,
        sql: &str,
        max_len: u16,
    ) -> Result<Option<String>, FbError>;
}

/// Complete client, with a single database handle type for every operation
pub trait FirebirdClient:
    FirebirdClientDbOps<DbHandle = <Self as FirebirdClientSqlOps>::DbHandle> + FirebirdClientSqlOps
{
}

impl<Hdl, A: FirebirdClientDbOps<DbHandle = Hdl> + FirebirdClientSqlOps<DbHandle = Hdl>>
    FirebirdClient for A
where
    Hdl: Send,
{
}

/// Generates new clients, keeping the configuration used to attach with them
pub trait FirebirdClientFactory {
    type C: FirebirdClient;

    /// Construct a new instance of a client
    fn new_instance(&self) -> Result<Self::C, FbError>;

    /// Pull the connection configuration details out as a borrow
    fn get_conn_conf(
        &self,
    ) -> &ConnectionConfiguration<<Self::C as FirebirdClientDbOps>::AttachmentConfig>;
}

/// Generic configuration for a connection
#[derive(Debug, Clone, Default)]
pub struct ConnectionConfiguration<A> {
    pub attachment_conf: A,
    pub dialect: Dialect,
    /// Only used when the database is created
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
#[repr(u16)]
/// Firebird sql dialect
pub enum Dialect {
    D1 = 1,
    D2 = 2,
    #[default]
    D3 = 3,
}

impl FromStr for Dialect {
    type Err = FbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Dialect::D1),
            "2" => Ok(Dialect::D2),
            "3" => Ok(Dialect::D3),
            _ => Err(FbError::from(format!(
                "'{}' doesn't represent any dialect",
                s
            ))),
        }
    }
}

//! Firebird transaction types
//!
//! More info about transactions in firebird:
//! https://firebirdsql.org/file/documentation/html/en/refdocs/fblangref30/firebird-30-language-reference.html#fblangref30-transacs

use crate::ibase;

/// Transaction isolation level
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum TrIsolationLevel {
    /// Snapshot. Transactions can't see alterations commited after they started
    Concurrency,
    /// Table locking
    Consistency,
    /// Transactions can see alterations commited after they started
    ReadCommited(TrRecordVersion),
}

/// Same as the server uses when it gets an empty tpb
impl Default for TrIsolationLevel {
    fn default() -> Self {
        Self::Concurrency
    }
}

impl From<TrIsolationLevel> for u8 {
    fn from(tp: TrIsolationLevel) -> Self {
        match tp {
            TrIsolationLevel::Concurrency => ibase::isc_tpb_concurrency as u8,
            TrIsolationLevel::Consistency => ibase::isc_tpb_consistency as u8,
            TrIsolationLevel::ReadCommited(_) => ibase::isc_tpb_read_committed as u8,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
/// Commit / Rollback operations
pub enum TrOp {
    Commit,
    CommitRetaining,
    Rollback,
    RollbackRetaining,
}

/// Lock resolution modes
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum TrLockResolution {
    /// Fail right away on a conflict
    NoWait,
    /// Wait for the other transaction to finish, up to the optional timeout in seconds
    Wait(Option<u32>),
}

impl Default for TrLockResolution {
    fn default() -> Self {
        Self::Wait(None)
    }
}

impl From<TrLockResolution> for u8 {
    fn from(tp: TrLockResolution) -> Self {
        match tp {
            TrLockResolution::NoWait => ibase::isc_tpb_nowait as u8,
            TrLockResolution::Wait(_) => ibase::isc_tpb_wait as u8,
        }
    }
}

/// Data access mode
#[repr(u8)]
#[derive(Debug, Eq, PartialEq, Copy, Clone, Default)]
pub enum TrDataAccessMode {
    #[default]
    ReadWrite = ibase::isc_tpb_write as u8,
    ReadOnly = ibase::isc_tpb_read as u8,
}

/// Record version isolation, only meaningful for read commited transactions
#[repr(u8)]
#[derive(Debug, Eq, PartialEq, Copy, Clone, Default)]
pub enum TrRecordVersion {
    RecordVersion = ibase::isc_tpb_rec_version as u8,
    #[default]
    NoRecordVersion = ibase::isc_tpb_no_rec_version as u8,
}

/// Parameters of a new transaction
#[derive(Debug, Eq, PartialEq, Copy, Clone, Default)]
pub struct TransactionConfiguration {
    pub data_access: TrDataAccessMode,
    pub isolation: TrIsolationLevel,
    pub lock_resolution: TrLockResolution,
}

impl TransactionConfiguration {
    /// Build the transaction parameter buffer
    pub fn to_tpb(&self) -> Vec<u8> {
        let mut tpb = vec![
            ibase::isc_tpb_version3 as u8,
            self.isolation.into(),
            self.data_access as u8,
            self.lock_resolution.into(),
        ];

        if let TrLockResolution::Wait(Some(time)) = self.lock_resolution {
            tpb.push(ibase::isc_tpb_lock_timeout as u8);
            tpb.push(4);
            tpb.extend_from_slice(&time.to_le_bytes());
        }

        if let TrIsolationLevel::ReadCommited(rec) = self.isolation {
            tpb.push(rec as u8);
        }

        tpb
    }
}

//! Constants from the fbclient headers (`ibase.h`, `consts_pub.h`)

#![allow(non_upper_case_globals)]

pub const isc_dpb_version1: u32 = 1;
pub const isc_dpb_page_size: u32 = 4;
pub const isc_dpb_user_name: u32 = 28;
pub const isc_dpb_password: u32 = 29;
pub const isc_dpb_lc_ctype: u32 = 48;
pub const isc_dpb_sql_role_name: u32 = 60;
pub const isc_dpb_sql_dialect: u32 = 63;

pub const isc_tpb_version3: u32 = 3;
pub const isc_tpb_consistency: u32 = 1;
pub const isc_tpb_concurrency: u32 = 2;
pub const isc_tpb_wait: u32 = 6;
pub const isc_tpb_nowait: u32 = 7;
pub const isc_tpb_read: u32 = 8;
pub const isc_tpb_write: u32 = 9;
pub const isc_tpb_read_committed: u32 = 15;
pub const isc_tpb_rec_version: u32 = 17;
pub const isc_tpb_no_rec_version: u32 = 18;
pub const isc_tpb_lock_timeout: u32 = 21;

pub const SQL_VARYING: u32 = 448;

pub const SQLDA_VERSION1: u32 = 1;
pub const SQL_DIALECT_CURRENT: u32 = 3;

/// Maximum length of a VARCHAR column, in bytes
pub const MAX_VARCHAR_LENGTH: u16 = 32765;

/// Reason sent to `fb_shutdown` when the application is going away
pub const fb_shutrsn_app_stopped: i32 = -3;

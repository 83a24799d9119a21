//! fbclient entry points, types and structs
//!
//! Only the functions the samples need. Each one is reachable from
//! the [`IBase`] trait, so the client code is the same for a
//! linked (`linking`) or a runtime loaded (`dynamic_loading`) fbclient.

#![allow(non_upper_case_globals, non_camel_case_types, clippy::upper_case_acronyms)]

use std::os::raw::{c_char, c_int, c_short, c_uint, c_ushort, c_void};

pub use firebird_samples_core::ibase::*;

pub type ISC_SHORT = c_short;
pub type ISC_LONG = c_int;
pub type ISC_STATUS = isize;
pub type ISC_STATUS_ARRAY = [ISC_STATUS; 20];
pub type FB_API_HANDLE = c_uint;
pub type isc_db_handle = FB_API_HANDLE;
pub type isc_tr_handle = FB_API_HANDLE;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct XSQLVAR {
    pub sqltype: ISC_SHORT,
    pub sqlscale: ISC_SHORT,
    pub sqlsubtype: ISC_SHORT,
    pub sqllen: ISC_SHORT,
    pub sqldata: *mut c_char,
    pub sqlind: *mut ISC_SHORT,
    pub sqlname_length: ISC_SHORT,
    pub sqlname: [c_char; 32],
    pub relname_length: ISC_SHORT,
    pub relname: [c_char; 32],
    pub ownname_length: ISC_SHORT,
    pub ownname: [c_char; 32],
    pub aliasname_length: ISC_SHORT,
    pub aliasname: [c_char; 32],
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct XSQLDA {
    pub version: ISC_SHORT,
    pub sqldaid: [c_char; 8],
    pub sqldabc: ISC_LONG,
    pub sqln: ISC_SHORT,
    pub sqld: ISC_SHORT,
    pub sqlvar: [XSQLVAR; 1],
}

/// Transaction existence block, one per database of `isc_start_multiple`
#[repr(C)]
pub struct ISC_TEB {
    pub db_handle: *mut isc_db_handle,
    pub tpb_len: ISC_LONG,
    pub tpb_ptr: *const c_char,
}

/// Declares the functions once, generating the `IBase` trait and both implementations
macro_rules! ibase_functions {
    ( $(
        fn $name:ident( $( $arg:ident: $ty:ty ),* ) -> $ret:ty;
    )* ) => {
        /// Access to the fbclient functions
        pub trait IBase {
            $(
                fn $name(&self) -> unsafe extern "C" fn( $( $ty ),* ) -> $ret;
            )*
        }

        #[cfg(feature = "linking")]
        mod linked {
            use super::*;

            extern "C" {
                $(
                    pub fn $name( $( $arg: $ty ),* ) -> $ret;
                )*
            }
        }

        /// Functions resolved by the linker
        #[cfg(feature = "linking")]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct IBaseLinking;

        #[cfg(feature = "linking")]
        impl IBase for IBaseLinking {
            $(
                fn $name(&self) -> unsafe extern "C" fn( $( $ty ),* ) -> $ret {
                    linked::$name
                }
            )*
        }

        /// Functions resolved at runtime, from a fbclient path
        #[cfg(feature = "dynamic_loading")]
        pub struct IBaseDynLoading {
            $(
                $name: unsafe extern "C" fn( $( $ty ),* ) -> $ret,
            )*
            // Must outlive the function pointers above
            _lib: libloading::Library,
        }

        #[cfg(feature = "dynamic_loading")]
        impl IBaseDynLoading {
            /// Load the library and every function the client uses
            pub fn with_client(lib_path: &std::path::Path) -> Result<Self, FbError> {
                let lib = unsafe { libloading::Library::new(lib_path) }.map_err(|e| {
                    FbError::from(format!(
                        "Error loading Firebird client library. {} ({})",
                        lib_path.display(),
                        e
                    ))
                })?;

                // Firebird 3 or newer client. Checked first to report it properly
                let get_master = unsafe {
                    *lib.get::<unsafe extern "C" fn() -> *mut c_void>(b"fb_get_master_interface\0")
                        .map_err(|_| FbError::from(MASTER_INTERFACE_ERROR))?
                };

                if unsafe { get_master() }.is_null() {
                    return Err(FbError::from(MASTER_INTERFACE_ERROR));
                }

                $(
                    let $name = unsafe {
                        *lib.get::<unsafe extern "C" fn( $( $ty ),* ) -> $ret>(
                            concat!(stringify!($name), "\0").as_bytes(),
                        )
                        .map_err(|e| {
                            FbError::from(format!(
                                "Error getting the {} function: {}",
                                stringify!($name),
                                e
                            ))
                        })?
                    };
                )*

                Ok(Self {
                    $( $name, )*
                    _lib: lib,
                })
            }
        }

        #[cfg(feature = "dynamic_loading")]
        impl IBase for IBaseDynLoading {
            $(
                fn $name(&self) -> unsafe extern "C" fn( $( $ty ),* ) -> $ret {
                    self.$name
                }
            )*
        }
    };
}

#[cfg(feature = "dynamic_loading")]
use firebird_samples_core::FbError;

#[cfg(feature = "dynamic_loading")]
const MASTER_INTERFACE_ERROR: &str = "Error getting Firebird master interface.";

ibase_functions! {
    fn isc_attach_database(
        status: *mut ISC_STATUS,
        db_name_len: c_short,
        db_name: *const c_char,
        db_handle: *mut isc_db_handle,
        dpb_len: c_short,
        dpb: *const c_char
    ) -> ISC_STATUS;

    fn isc_create_database(
        status: *mut ISC_STATUS,
        db_name_len: c_ushort,
        db_name: *const c_char,
        db_handle: *mut isc_db_handle,
        dpb_len: c_ushort,
        dpb: *const c_char,
        db_type: c_ushort
    ) -> ISC_STATUS;

    fn isc_detach_database(status: *mut ISC_STATUS, db_handle: *mut isc_db_handle) -> ISC_STATUS;

    fn isc_drop_database(status: *mut ISC_STATUS, db_handle: *mut isc_db_handle) -> ISC_STATUS;

    fn isc_start_multiple(
        status: *mut ISC_STATUS,
        tr_handle: *mut isc_tr_handle,
        count: c_short,
        teb: *mut c_void
    ) -> ISC_STATUS;

    fn isc_commit_transaction(status: *mut ISC_STATUS, tr_handle: *mut isc_tr_handle) -> ISC_STATUS;

    fn isc_commit_retaining(status: *mut ISC_STATUS, tr_handle: *mut isc_tr_handle) -> ISC_STATUS;

    fn isc_rollback_transaction(status: *mut ISC_STATUS, tr_handle: *mut isc_tr_handle) -> ISC_STATUS;

    fn isc_rollback_retaining(status: *mut ISC_STATUS, tr_handle: *mut isc_tr_handle) -> ISC_STATUS;

    fn isc_dsql_execute_immediate(
        status: *mut ISC_STATUS,
        db_handle: *mut isc_db_handle,
        tr_handle: *mut isc_tr_handle,
        sql_len: c_ushort,
        sql: *const c_char,
        dialect: c_ushort,
        xsqlda: *const XSQLDA
    ) -> ISC_STATUS;

    fn isc_dsql_exec_immed2(
        status: *mut ISC_STATUS,
        db_handle: *mut isc_db_handle,
        tr_handle: *mut isc_tr_handle,
        sql_len: c_ushort,
        sql: *const c_char,
        dialect: c_ushort,
        in_xsqlda: *const XSQLDA,
        out_xsqlda: *const XSQLDA
    ) -> ISC_STATUS;

    fn isc_sqlcode(status: *const ISC_STATUS) -> ISC_LONG;

    fn fb_interpret(
        buffer: *mut c_char,
        buffer_len: c_uint,
        status: *mut *const ISC_STATUS
    ) -> ISC_LONG;

    fn fb_shutdown(timeout: c_uint, reason: c_int) -> c_int;

    fn fb_get_master_interface() -> *mut c_void;
}

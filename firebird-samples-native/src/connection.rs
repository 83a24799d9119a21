//! `FirebirdClient` implementation for the native fbclient

use crate::{
    ibase::{self, IBase},
    status::Status,
    xsqlda::TextColumn,
};
use firebird_samples_core::*;
use log::{debug, warn};
use std::ptr;

type NativeDbHandle = ibase::isc_db_handle;
type NativeTrHandle = ibase::isc_tr_handle;

/// Client that wraps the native fbclient library
pub struct NativeFbClient<T: LinkageMarker> {
    ibase: T::L,
    status: Status,
    charset: Charset,
    /// `fb_shutdown` was already called
    shut_down: bool,
}

/// The remote part of native client configuration
#[derive(Debug, Clone, Default)]
pub struct RemoteConfig {
    pub host: String,
    pub port: u16,
}

/// The common part of native client configuration (for both embedded/remote)
#[derive(Debug, Clone, Default)]
pub struct NativeFbAttachmentConfig {
    pub db_name: String,
    /// Not sent when empty
    pub user: String,
    pub pass: Option<String>,
    pub role_name: Option<String>,
    pub remote: Option<RemoteConfig>,
}

/// A marker trait which can be used to
/// obtain the associated client instance
pub trait LinkageMarker: Send + Sync {
    type L: IBase + Send;

    /// The library goes away with the client, so the client must be
    /// shut down before it is dropped
    const OWNS_LIBRARY: bool;
}

/// Configuration details for dynamic linking
#[derive(Debug, Clone)]
pub struct DynLink(pub Charset);

#[cfg(feature = "linking")]
impl LinkageMarker for DynLink {
    type L = ibase::IBaseLinking;

    const OWNS_LIBRARY: bool = false;
}

#[cfg(feature = "linking")]
impl DynLink {
    pub fn to_client(&self) -> NativeFbClient<DynLink> {
        NativeFbClient {
            ibase: ibase::IBaseLinking,
            status: Default::default(),
            charset: self.0.clone(),
            shut_down: false,
        }
    }
}

/// Configuration details for dynamic loading
#[derive(Debug, Clone)]
pub struct DynLoad {
    pub charset: Charset,
    pub lib_path: String,
}

#[cfg(feature = "dynamic_loading")]
impl LinkageMarker for DynLoad {
    type L = ibase::IBaseDynLoading;

    const OWNS_LIBRARY: bool = true;
}

#[cfg(feature = "dynamic_loading")]
impl DynLoad {
    /// Load the fbclient. Dropping the client unloads it
    pub fn try_to_client(&self) -> Result<NativeFbClient<Self>, FbError> {
        let ibase = ibase::IBaseDynLoading::with_client(self.lib_path.as_ref())?;
        debug!("Firebird client loaded from {}", self.lib_path);

        Ok(NativeFbClient {
            ibase,
            status: Default::default(),
            charset: self.charset.clone(),
            shut_down: false,
        })
    }
}

impl<T: LinkageMarker> FirebirdClientDbOps for NativeFbClient<T> {
    type DbHandle = NativeDbHandle;
    type AttachmentConfig = NativeFbAttachmentConfig;

    fn attach_database(
        &mut self,
        config: &Self::AttachmentConfig,
    ) -> Result<NativeDbHandle, FbError> {
        let (dpb, conn_string) = self.build_dpb(config)?;
        let conn_string = self.charset.encode(conn_string)?;
        let conn_string_len: i16 = checked_len(conn_string.len(), "database name")?;
        let dpb_len: i16 = checked_len(dpb.len(), "database parameter buffer")?;
        let mut handle = 0;

        debug!("Attaching to {}", config.db_name);

        unsafe {
            if self.ibase.isc_attach_database()(
                &mut self.status[0],
                conn_string_len,
                conn_string.as_ptr() as *const _,
                &mut handle,
                dpb_len,
                dpb.as_bytes().as_ptr() as *const _,
            ) != 0
            {
                return Err(self.status.as_error(&self.ibase));
            }
        }

        // Assert that the handle is valid
        debug_assert_ne!(handle, 0);

        Ok(handle)
    }

    fn create_database(
        &mut self,
        config: &Self::AttachmentConfig,
        page_size: Option<u32>,
        dialect: Dialect,
    ) -> Result<NativeDbHandle, FbError> {
        let (mut dpb, conn_string) = self.build_dpb(config)?;
        let conn_string = self.charset.encode(conn_string)?;
        let mut handle = 0;

        if let Some(ps) = page_size {
            dpb.insert_int(ibase::isc_dpb_page_size, ps);
        }
        dpb.insert_int(ibase::isc_dpb_sql_dialect, dialect as u32);

        let conn_string_len: u16 = checked_len(conn_string.len(), "database name")?;
        let dpb_len: u16 = checked_len(dpb.len(), "database parameter buffer")?;

        debug!("Creating the database {}", config.db_name);

        unsafe {
            if self.ibase.isc_create_database()(
                &mut self.status[0],
                conn_string_len,
                conn_string.as_ptr() as *const _,
                &mut handle,
                dpb_len,
                dpb.as_bytes().as_ptr() as *const _,
                0,
            ) != 0
            {
                return Err(self.status.as_error(&self.ibase));
            }
        }

        // Assert that the handle is valid
        debug_assert_ne!(handle, 0);

        Ok(handle)
    }

    fn detach_database(&mut self, db_handle: &mut NativeDbHandle) -> Result<(), FbError> {
        unsafe {
            // Close the connection, if the handle is valid
            if *db_handle != 0
                && self.ibase.isc_detach_database()(&mut self.status[0], db_handle) != 0
            {
                return Err(self.status.as_error(&self.ibase));
            }
        }
        Ok(())
    }

    fn drop_database(&mut self, db_handle: &mut NativeDbHandle) -> Result<(), FbError> {
        unsafe {
            if self.ibase.isc_drop_database()(&mut self.status[0], db_handle) != 0 {
                return Err(self.status.as_error(&self.ibase));
            }
        }
        Ok(())
    }

    fn shutdown(&mut self, timeout_ms: u32) -> Result<(), FbError> {
        debug!("Shutting down the Firebird client");

        self.shut_down = true;
        let res = unsafe { self.ibase.fb_shutdown()(timeout_ms, ibase::fb_shutrsn_app_stopped) };

        if res != 0 {
            return Err(FbError::from(format!(
                "Error shutting down the Firebird client ({})",
                res
            )));
        }

        Ok(())
    }
}

impl<T: LinkageMarker> FirebirdClientSqlOps for NativeFbClient<T> {
    type DbHandle = NativeDbHandle;
    type TrHandle = NativeTrHandle;

    fn begin_transaction(
        &mut self,
        db_handle: &mut Self::DbHandle,
        confs: TransactionConfiguration,
    ) -> Result<Self::TrHandle, FbError> {
        let mut handle = 0;
        let tpb = confs.to_tpb();

        let mut teb = ibase::ISC_TEB {
            db_handle,
            tpb_len: tpb.len() as ibase::ISC_LONG,
            tpb_ptr: tpb.as_ptr() as *const _,
        };

        unsafe {
            if self.ibase.isc_start_multiple()(
                &mut self.status[0],
                &mut handle,
                1,
                &mut teb as *mut _ as _,
            ) != 0
            {
                return Err(self.status.as_error(&self.ibase));
            }
        }

        // Assert that the handle is valid
        debug_assert_ne!(handle, 0);

        Ok(handle)
    }

    fn transaction_operation(
        &mut self,
        tr_handle: &mut Self::TrHandle,
        op: TrOp,
    ) -> Result<(), FbError> {
        let handle = tr_handle;
        unsafe {
            if match op {
                TrOp::Commit => self.ibase.isc_commit_transaction()(&mut self.status[0], handle),
                TrOp::CommitRetaining => {
                    self.ibase.isc_commit_retaining()(&mut self.status[0], handle)
                }
                TrOp::Rollback => {
                    self.ibase.isc_rollback_transaction()(&mut self.status[0], handle)
                }
                TrOp::RollbackRetaining => {
                    self.ibase.isc_rollback_retaining()(&mut self.status[0], handle)
                }
            } != 0
            {
                return Err(self.status.as_error(&self.ibase));
            }
        }
        Ok(())
    }

    fn exec_immediate(
        &mut self,
        db_handle: &mut Self::DbHandle,
        tr_handle: &mut Self::TrHandle,
        dialect: Dialect,
        sql: &str,
    ) -> Result<(), FbError> {
        let sql = self.charset.encode(sql)?;
        let sql_len: u16 = checked_len(sql.len(), "sql statement")?;

        unsafe {
            if self.ibase.isc_dsql_execute_immediate()(
                &mut self.status[0],
                db_handle,
                tr_handle,
                sql_len,
                sql.as_ptr() as *const _,
                dialect as u16,
                ptr::null(),
            ) != 0
            {
                return Err(self.status.as_error(&self.ibase));
            }
        }
        Ok(())
    }

    fn exec_immediate_text(
        &mut self,
        db_handle: &mut Self::DbHandle,
        tr_handle: &mut Self::TrHandle,
        dialect: Dialect,
        sql: &str,
        max_len: u16,
    ) -> Result<Option<String>, FbError> {
        let sql = self.charset.encode(sql)?;
        let sql_len: u16 = checked_len(sql.len(), "sql statement")?;
        let column = TextColumn::new(max_len)?;

        unsafe {
            if self.ibase.isc_dsql_exec_immed2()(
                &mut self.status[0],
                db_handle,
                tr_handle,
                sql_len,
                sql.as_ptr() as *const _,
                dialect as u16,
                ptr::null(),
                column.as_ptr(),
            ) != 0
            {
                return Err(self.status.as_error(&self.ibase));
            }
        }

        column.value(&self.charset)
    }
}

impl<T: LinkageMarker> NativeFbClient<T> {
    /// Build the dpb and the connection string
    ///
    /// Used by attach and create database operations
    fn build_dpb(
        &self,
        config: &NativeFbAttachmentConfig,
    ) -> Result<(DpbBuilder, String), FbError> {
        build_dpb(config, &self.charset)
    }
}

impl<T: LinkageMarker> Drop for NativeFbClient<T> {
    fn drop(&mut self) {
        if T::OWNS_LIBRARY && !self.shut_down {
            if let Err(e) = self.shutdown(0) {
                warn!("Error shutting down the client before unloading it: {}", e);
            }
        }
    }
}

/// Length argument of a fbclient call. Anything bigger than the
/// argument type is an error, never a shorter buffer
fn checked_len<N: TryFrom<usize>>(len: usize, what: &str) -> Result<N, FbError> {
    N::try_from(len).map_err(|_| FbError::from(format!("The {} is too long ({} bytes)", what, len)))
}

fn build_dpb(
    config: &NativeFbAttachmentConfig,
    charset: &Charset,
) -> Result<(DpbBuilder, String), FbError> {
    let conn_string = match &config.remote {
        None => config.db_name.clone(),
        Some(remote_conf) => format!(
            "{}/{}:{}",
            remote_conf.host.as_str(),
            remote_conf.port,
            config.db_name.as_str()
        ),
    };

    let mut dpb = DpbBuilder::new();

    if !config.user.is_empty() {
        dpb.insert_string(ibase::isc_dpb_user_name, &config.user)?;
    }

    if let Some(pass) = &config.pass {
        dpb.insert_string(ibase::isc_dpb_password, pass)?;
    }

    dpb.insert_string(ibase::isc_dpb_lc_ctype, charset.on_firebird)?;

    if let Some(role) = &config.role_name {
        dpb.insert_string(ibase::isc_dpb_sql_role_name, role)?;
    }

    Ok((dpb, conn_string))
}

#[cfg(test)]
mod test {
    use super::*;
    use firebird_samples_core::charset;

    #[test]
    fn embedded_dpb() -> Result<(), FbError> {
        let config = NativeFbAttachmentConfig {
            db_name: "/data/user/0/com.example.firebirdandroidcpp/files/test.fdb".to_string(),
            ..Default::default()
        };

        let (dpb, conn_string) = build_dpb(&config, &charset::UTF_8)?;

        assert_eq!(
            "/data/user/0/com.example.firebirdandroidcpp/files/test.fdb",
            conn_string
        );

        let mut expected = vec![1, 48, 4];
        expected.extend(b"UTF8");
        assert_eq!(expected, dpb.as_bytes());

        Ok(())
    }

    #[test]
    fn remote_dpb() -> Result<(), FbError> {
        let config = NativeFbAttachmentConfig {
            db_name: "firebird-example-test.fdb".to_string(),
            user: "sysdba".to_string(),
            pass: Some("masterkey".to_string()),
            role_name: Some("admin".to_string()),
            remote: Some(RemoteConfig {
                host: "localhost".to_string(),
                port: 3050,
            }),
        };

        let (dpb, conn_string) = build_dpb(&config, &charset::WIN_1252)?;

        assert_eq!("localhost/3050:firebird-example-test.fdb", conn_string);

        let mut expected = vec![1, 28, 6];
        expected.extend(b"sysdba");
        expected.extend(&[29, 9]);
        expected.extend(b"masterkey");
        expected.extend(&[48, 7]);
        expected.extend(b"WIN1252");
        expected.extend(&[60, 5]);
        expected.extend(b"admin");
        assert_eq!(expected, dpb.as_bytes());

        Ok(())
    }

    /// Function table that records the calls instead of reaching a fbclient
    mod fake {
        use crate::ibase::*;
        use std::cell::RefCell;
        use std::os::raw::{c_char, c_int, c_short, c_uint, c_ushort, c_void};
        use std::ptr;

        thread_local! {
            static CALLS: RefCell<Vec<String>> = RefCell::new(Vec::new());
        }

        fn record(call: String) {
            CALLS.with(|c| c.borrow_mut().push(call));
        }

        /// Calls made on this thread since the last `take_calls`
        pub fn take_calls() -> Vec<String> {
            CALLS.with(|c| c.borrow_mut().drain(..).collect())
        }

        pub struct FakeIBase;

        unsafe extern "C" fn attach(
            _: *mut ISC_STATUS,
            name_len: c_short,
            _: *const c_char,
            handle: *mut isc_db_handle,
            dpb_len: c_short,
            _: *const c_char,
        ) -> ISC_STATUS {
            record(format!("attach {} {}", name_len, dpb_len));
            *handle = 1;
            0
        }

        unsafe extern "C" fn create(
            _: *mut ISC_STATUS,
            name_len: c_ushort,
            _: *const c_char,
            handle: *mut isc_db_handle,
            dpb_len: c_ushort,
            _: *const c_char,
            _: c_ushort,
        ) -> ISC_STATUS {
            record(format!("create {} {}", name_len, dpb_len));
            *handle = 1;
            0
        }

        unsafe extern "C" fn db_op(_: *mut ISC_STATUS, _: *mut isc_db_handle) -> ISC_STATUS {
            0
        }

        unsafe extern "C" fn start(
            _: *mut ISC_STATUS,
            handle: *mut isc_tr_handle,
            _: c_short,
            _: *mut c_void,
        ) -> ISC_STATUS {
            *handle = 2;
            0
        }

        unsafe extern "C" fn tr_op(_: *mut ISC_STATUS, _: *mut isc_tr_handle) -> ISC_STATUS {
            0
        }

        unsafe extern "C" fn execute(
            _: *mut ISC_STATUS,
            _: *mut isc_db_handle,
            _: *mut isc_tr_handle,
            sql_len: c_ushort,
            _: *const c_char,
            _: c_ushort,
            _: *const XSQLDA,
        ) -> ISC_STATUS {
            record(format!("execute {}", sql_len));
            0
        }

        unsafe extern "C" fn execute2(
            _: *mut ISC_STATUS,
            _: *mut isc_db_handle,
            _: *mut isc_tr_handle,
            sql_len: c_ushort,
            _: *const c_char,
            _: c_ushort,
            _: *const XSQLDA,
            _: *const XSQLDA,
        ) -> ISC_STATUS {
            record(format!("execute2 {}", sql_len));
            0
        }

        unsafe extern "C" fn sqlcode(_: *const ISC_STATUS) -> ISC_LONG {
            0
        }

        unsafe extern "C" fn interpret(
            _: *mut c_char,
            _: c_uint,
            _: *mut *const ISC_STATUS,
        ) -> ISC_LONG {
            0
        }

        unsafe extern "C" fn shutdown(timeout: c_uint, reason: c_int) -> c_int {
            record(format!("fb_shutdown {} {}", timeout, reason));
            0
        }

        unsafe extern "C" fn master() -> *mut c_void {
            ptr::null_mut()
        }

        impl IBase for FakeIBase {
            fn isc_attach_database(
                &self,
            ) -> unsafe extern "C" fn(
                *mut ISC_STATUS,
                c_short,
                *const c_char,
                *mut isc_db_handle,
                c_short,
                *const c_char,
            ) -> ISC_STATUS {
                attach
            }

            fn isc_create_database(
                &self,
            ) -> unsafe extern "C" fn(
                *mut ISC_STATUS,
                c_ushort,
                *const c_char,
                *mut isc_db_handle,
                c_ushort,
                *const c_char,
                c_ushort,
            ) -> ISC_STATUS {
                create
            }

            fn isc_detach_database(
                &self,
            ) -> unsafe extern "C" fn(*mut ISC_STATUS, *mut isc_db_handle) -> ISC_STATUS {
                db_op
            }

            fn isc_drop_database(
                &self,
            ) -> unsafe extern "C" fn(*mut ISC_STATUS, *mut isc_db_handle) -> ISC_STATUS {
                db_op
            }

            fn isc_start_multiple(
                &self,
            ) -> unsafe extern "C" fn(
                *mut ISC_STATUS,
                *mut isc_tr_handle,
                c_short,
                *mut c_void,
            ) -> ISC_STATUS {
                start
            }

            fn isc_commit_transaction(
                &self,
            ) -> unsafe extern "C" fn(*mut ISC_STATUS, *mut isc_tr_handle) -> ISC_STATUS {
                tr_op
            }

            fn isc_commit_retaining(
                &self,
            ) -> unsafe extern "C" fn(*mut ISC_STATUS, *mut isc_tr_handle) -> ISC_STATUS {
                tr_op
            }

            fn isc_rollback_transaction(
                &self,
            ) -> unsafe extern "C" fn(*mut ISC_STATUS, *mut isc_tr_handle) -> ISC_STATUS {
                tr_op
            }

            fn isc_rollback_retaining(
                &self,
            ) -> unsafe extern "C" fn(*mut ISC_STATUS, *mut isc_tr_handle) -> ISC_STATUS {
                tr_op
            }

            fn isc_dsql_execute_immediate(
                &self,
            ) -> unsafe extern "C" fn(
                *mut ISC_STATUS,
                *mut isc_db_handle,
                *mut isc_tr_handle,
                c_ushort,
                *const c_char,
                c_ushort,
                *const XSQLDA,
            ) -> ISC_STATUS {
                execute
            }

            fn isc_dsql_exec_immed2(
                &self,
            ) -> unsafe extern "C" fn(
                *mut ISC_STATUS,
                *mut isc_db_handle,
                *mut isc_tr_handle,
                c_ushort,
                *const c_char,
                c_ushort,
                *const XSQLDA,
                *const XSQLDA,
            ) -> ISC_STATUS {
                execute2
            }

            fn isc_sqlcode(&self) -> unsafe extern "C" fn(*const ISC_STATUS) -> ISC_LONG {
                sqlcode
            }

            fn fb_interpret(
                &self,
            ) -> unsafe extern "C" fn(*mut c_char, c_uint, *mut *const ISC_STATUS) -> ISC_LONG {
                interpret
            }

            fn fb_shutdown(&self) -> unsafe extern "C" fn(c_uint, c_int) -> c_int {
                shutdown
            }

            fn fb_get_master_interface(&self) -> unsafe extern "C" fn() -> *mut c_void {
                master
            }
        }
    }

    use fake::{take_calls, FakeIBase};

    /// Unloaded with the client, like `DynLoad`
    struct FakeLoaded;

    impl LinkageMarker for FakeLoaded {
        type L = FakeIBase;

        const OWNS_LIBRARY: bool = true;
    }

    /// Stays loaded, like `DynLink`
    struct FakeLinked;

    impl LinkageMarker for FakeLinked {
        type L = FakeIBase;

        const OWNS_LIBRARY: bool = false;
    }

    fn fake_client<T: LinkageMarker<L = FakeIBase>>() -> NativeFbClient<T> {
        take_calls();

        NativeFbClient {
            ibase: FakeIBase,
            status: Default::default(),
            charset: charset::UTF_8,
            shut_down: false,
        }
    }

    #[test]
    fn sql_length() -> Result<(), FbError> {
        let mut cli = fake_client::<FakeLinked>();

        cli.exec_immediate(&mut 1, &mut 2, Dialect::D3, "delete from t")?;
        assert_eq!(vec!["execute 13"], take_calls());

        let sql = format!("select '{}' from rdb$database", "x".repeat(70_000));

        let res = cli.exec_immediate(&mut 1, &mut 2, Dialect::D3, &sql);
        match res {
            Err(e) => assert!(e.message().starts_with("The sql statement is too long")),
            Ok(()) => panic!("A statement longer than 65535 bytes must be refused"),
        }

        assert!(cli
            .exec_immediate_text(&mut 1, &mut 2, Dialect::D3, &sql, 64)
            .is_err());

        // Nothing reached the fbclient
        assert!(take_calls().is_empty());

        Ok(())
    }

    #[test]
    fn database_name_length() -> Result<(), FbError> {
        let mut cli = fake_client::<FakeLinked>();

        let mut config = NativeFbAttachmentConfig {
            db_name: "test.fdb".to_string(),
            ..Default::default()
        };
        cli.attach_database(&config)?;
        assert_eq!(vec!["attach 8 7"], take_calls());

        config.db_name = "d".repeat(40_000);
        assert!(cli.attach_database(&config).is_err());
        assert!(cli.create_database(&config, None, Dialect::D3).is_ok());

        config.db_name = "d".repeat(70_000);
        assert!(cli.create_database(&config, None, Dialect::D3).is_err());

        assert_eq!(vec!["create 40000 13"], take_calls());

        Ok(())
    }

    #[test]
    fn drop_shuts_down_loaded_client() {
        let cli = fake_client::<FakeLoaded>();
        drop(cli);

        assert_eq!(vec!["fb_shutdown 0 -3"], take_calls());
    }

    #[test]
    fn shutdown_runs_once() -> Result<(), FbError> {
        let mut cli = fake_client::<FakeLoaded>();
        cli.shutdown(0)?;
        drop(cli);

        assert_eq!(vec!["fb_shutdown 0 -3"], take_calls());

        Ok(())
    }

    #[test]
    fn drop_keeps_linked_client() {
        let cli = fake_client::<FakeLinked>();
        drop(cli);

        assert!(take_calls().is_empty());
    }

    #[cfg(feature = "dynamic_loading")]
    #[test]
    fn missing_client() {
        let res = DynLoad {
            charset: charset::UTF_8,
            lib_path: "/nonexistent/libfbclient.so".to_string(),
        }
        .try_to_client();

        assert!(res.is_err());
    }
}

use super::*;
use std::marker::PhantomData;

use firebird_samples_native::{
    DynLink, DynLoad, LinkageMarker, NativeFbAttachmentConfig, NativeFbClient, RemoteConfig,
};

/// Usual file name of the fbclient on the current platform
#[cfg(target_os = "windows")]
pub const DEFAULT_FBCLIENT: &str = "fbclient.dll";
#[cfg(target_os = "macos")]
pub const DEFAULT_FBCLIENT: &str = "libfbclient.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const DEFAULT_FBCLIENT: &str = "libfbclient.so";

#[doc(hidden)]
#[derive(Clone)]
pub struct LinkageNotConfigured;
#[doc(hidden)]
#[derive(Clone)]
pub struct ConnTypeNotConfigured;
/// Database opened by the client library itself
#[derive(Clone)]
pub struct Embedded;
/// Database reached through a server
#[derive(Clone)]
pub struct Remote;

/// Implemented by `Embedded` and `Remote` only
#[doc(hidden)]
pub trait ChosenConnType {}
impl ChosenConnType for Embedded {}
impl ChosenConnType for Remote {}

/// Implemented by `DynLink` and `DynLoad` only
#[doc(hidden)]
pub trait ChosenLinkage {}
impl ChosenLinkage for DynLink {}
impl ChosenLinkage for DynLoad {}

/// Configuration of a connection through the fbclient.
///
/// Starts from `builder_native()`. The way the fbclient is found
/// (`with_dyn_link` or `with_dyn_load`) and the kind of database
/// (`with_embedded` or `with_remote`) are part of the type, and both
/// must be picked before anything else can be set.
#[derive(Clone)]
pub struct NativeConnectionBuilder<Linkage, ConnType> {
    _linkage: PhantomData<Linkage>,
    _conn_type: PhantomData<ConnType>,
    conn_conf: ConnectionConfiguration<NativeFbAttachmentConfig>,
    charset: Charset,
    lib_path: String,
}

/// A builder with the defaults: user `SYSDBA`, database `test.fdb`,
/// dialect 3 and utf-8
pub fn builder_native() -> NativeConnectionBuilder<LinkageNotConfigured, ConnTypeNotConfigured> {
    let mut conn_conf = ConnectionConfiguration::<NativeFbAttachmentConfig>::default();
    conn_conf.dialect = Dialect::D3;
    conn_conf.attachment_conf.user = "SYSDBA".to_string();
    conn_conf.attachment_conf.db_name = "test.fdb".to_string();

    NativeConnectionBuilder {
        _linkage: PhantomData,
        _conn_type: PhantomData,
        conn_conf,
        charset: charset::UTF_8,
        lib_path: DEFAULT_FBCLIENT.to_string(),
    }
}

impl<L, T> NativeConnectionBuilder<L, T> {
    // Private: the markers must only change through the `with_*` methods
    fn retype<L2, T2>(self) -> NativeConnectionBuilder<L2, T2> {
        NativeConnectionBuilder {
            _linkage: PhantomData,
            _conn_type: PhantomData,
            conn_conf: self.conn_conf,
            charset: self.charset,
            lib_path: self.lib_path,
        }
    }

    /// What will be sent on the attach or create
    pub fn conn_conf(&self) -> &ConnectionConfiguration<NativeFbAttachmentConfig> {
        &self.conn_conf
    }
}

impl<T> NativeConnectionBuilder<LinkageNotConfigured, T> {
    /// Call the fbclient found by the linker. Requires feature `linking`
    #[cfg(feature = "linking")]
    pub fn with_dyn_link(self) -> NativeConnectionBuilder<DynLink, T> {
        self.retype()
    }

    /// Load the fbclient from `lib_path` on every `connect`/`create_database`.
    /// The library is shut down and unloaded with the connection.
    ///
    /// ```no_run
    /// // android, from the jniLibs of the apk
    /// firebird_samples::builder_native()
    ///     .with_dyn_load("libfbclient.so")
    ///     .with_embedded();
    /// ```
    ///
    /// Requires feature `dynamic_loading`
    #[cfg(feature = "dynamic_loading")]
    pub fn with_dyn_load<S: Into<String>>(mut self, lib_path: S) -> NativeConnectionBuilder<DynLoad, T> {
        self.lib_path = lib_path.into();
        self.retype()
    }
}

impl<L> NativeConnectionBuilder<L, ConnTypeNotConfigured> {
    /// The database name is handed to the fbclient as is. The
    /// `Providers` of the `firebird.conf` decide how it is opened
    pub fn with_embedded(self) -> NativeConnectionBuilder<L, Embedded> {
        self.retype()
    }

    /// Connect through a server, `localhost:3050` with the
    /// `masterkey` password unless changed
    pub fn with_remote(mut self) -> NativeConnectionBuilder<L, Remote> {
        self.conn_conf.attachment_conf.remote = Some(RemoteConfig {
            host: "localhost".to_string(),
            port: 3050,
        });
        self.conn_conf.attachment_conf.pass = Some("masterkey".to_string());
        self.retype()
    }
}

impl<L: ChosenLinkage, T: ChosenConnType> NativeConnectionBuilder<L, T> {
    /// Sent as `isc_dpb_user_name`, unless empty
    pub fn user<S: Into<String>>(&mut self, user: S) -> &mut Self {
        self.conn_conf.attachment_conf.user = user.into();
        self
    }

    pub fn pass<S: Into<String>>(&mut self, pass: S) -> &mut Self {
        self.conn_conf.attachment_conf.pass = Some(pass.into());
        self
    }

    /// Path or alias of the database
    pub fn db_name<S: Into<String>>(&mut self, db_name: S) -> &mut Self {
        self.conn_conf.attachment_conf.db_name = db_name.into();
        self
    }

    pub fn role<S: Into<String>>(&mut self, role: S) -> &mut Self {
        self.conn_conf.attachment_conf.role_name = Some(role.into());
        self
    }

    pub fn dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.conn_conf.dialect = dialect;
        self
    }

    /// Charset of the attachment and of the text sent and received
    pub fn charset(&mut self, charset: Charset) -> &mut Self {
        self.charset = charset;
        self
    }

    /// Only used when the database is created. The server picks one otherwise
    pub fn page_size(&mut self, page_size: u32) -> &mut Self {
        self.conn_conf.page_size = Some(page_size);
        self
    }
}

impl<L> NativeConnectionBuilder<L, Remote> {
    fn remote(&mut self) -> &mut RemoteConfig {
        self.conn_conf
            .attachment_conf
            .remote
            .get_or_insert_with(Default::default)
    }

    pub fn host<S: Into<String>>(&mut self, host: S) -> &mut Self {
        self.remote().host = host.into();
        self
    }

    pub fn port(&mut self, port: u16) -> &mut Self {
        self.remote().port = port;
        self
    }
}

#[cfg(feature = "dynamic_loading")]
impl<T: ChosenConnType> FirebirdClientFactory for NativeConnectionBuilder<DynLoad, T> {
    type C = NativeFbClient<DynLoad>;

    fn new_instance(&self) -> Result<Self::C, FbError> {
        DynLoad {
            charset: self.charset.clone(),
            lib_path: self.lib_path.clone(),
        }
        .try_to_client()
    }

    fn get_conn_conf(&self) -> &ConnectionConfiguration<NativeFbAttachmentConfig> {
        &self.conn_conf
    }
}

#[cfg(feature = "linking")]
impl<T: ChosenConnType> FirebirdClientFactory for NativeConnectionBuilder<DynLink, T> {
    type C = NativeFbClient<DynLink>;

    fn new_instance(&self) -> Result<Self::C, FbError> {
        Ok(DynLink(self.charset.clone()).to_client())
    }

    fn get_conn_conf(&self) -> &ConnectionConfiguration<NativeFbAttachmentConfig> {
        &self.conn_conf
    }
}

impl<L, T> NativeConnectionBuilder<L, T>
where
    L: ChosenLinkage + LinkageMarker,
    T: ChosenConnType,
    Self: FirebirdClientFactory<C = NativeFbClient<L>>,
{
    /// Attach to an existing database
    pub fn connect(&self) -> Result<Connection<NativeFbClient<L>>, FbError> {
        Connection::open(self.new_instance()?, &self.conn_conf)
    }

    /// Create the database, staying attached to it
    pub fn create_database(&self) -> Result<Connection<NativeFbClient<L>>, FbError> {
        Connection::create_database(self.new_instance()?, &self.conn_conf)
    }

    /// Attach, or create the database when the fbclient refuses the attach
    pub fn connect_or_create(&self) -> Result<Connection<NativeFbClient<L>>, FbError> {
        Connection::open_or_create(self.new_instance()?, &self.conn_conf)
    }
}

//!
//! Firebird samples
//!
//! Create a database with the user credentials, then drop it
//!
//! Example of use:
//!   create-drop --database /tmp/firebird-example-test.fdb
//!   create-drop --host localhost --port 3050 --database firebird-example-test.fdb
//!

use std::process::ExitCode;

use clap::Parser;
use firebird_samples::{
    builder_native, Connection, DynLoad, FbError, NativeFbClient, DEFAULT_FBCLIENT,
};
use log::info;

#[derive(Parser, Debug)]
#[command(name = "create-drop")]
#[command(about = "Create a firebird database and drop it again")]
struct Args {
    /// Database name or path
    #[arg(short, long, default_value = "firebird-example-test.fdb")]
    database: String,

    #[arg(short, long, default_value = "sysdba")]
    user: String,

    #[arg(short, long, default_value = "masterkey")]
    password: String,

    /// Server to connect to. Without it the database is opened by the client library
    #[arg(long)]
    host: Option<String>,

    #[arg(long, requires = "host")]
    port: Option<u16>,

    /// Path of the fbclient library
    #[arg(long, default_value = DEFAULT_FBCLIENT)]
    lib: String,

    /// Page size of the created database
    #[arg(long)]
    page_size: Option<u32>,
}

fn create_database(args: &Args) -> Result<Connection<NativeFbClient<DynLoad>>, FbError> {
    match &args.host {
        Some(host) => {
            let mut cb = builder_native()
                .with_dyn_load(args.lib.as_str())
                .with_remote();
            cb.host(host.as_str())
                .db_name(args.database.as_str())
                .user(args.user.as_str())
                .pass(args.password.as_str());

            if let Some(port) = args.port {
                cb.port(port);
            }
            if let Some(page_size) = args.page_size {
                cb.page_size(page_size);
            }

            cb.create_database()
        }
        None => {
            let mut cb = builder_native()
                .with_dyn_load(args.lib.as_str())
                .with_embedded();
            cb.db_name(args.database.as_str())
                .user(args.user.as_str())
                .pass(args.password.as_str());

            if let Some(page_size) = args.page_size {
                cb.page_size(page_size);
            }

            cb.create_database()
        }
    }
}

fn run(args: &Args) -> Result<(), FbError> {
    let conn = create_database(args)?;
    println!("Database created");

    conn.drop_database()?;
    println!("Database dropped");

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    info!("Creating {}", args.database);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_sql() {
                eprintln!("Firebird error: {}", e.message());
            } else {
                eprintln!("Generic error: {}", e.message());
            }

            ExitCode::FAILURE
        }
    }
}

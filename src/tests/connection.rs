//!
//! Firebird samples
//!
//! Connection lifecycle tests
//!

use super::fake::{conf, FakeClient};
use crate::*;

#[test]
fn open_existing() -> Result<(), FbError> {
    let cli = FakeClient::with_database("test.fdb");

    let conn = Connection::open(cli.clone(), &conf("test.fdb"))?;
    assert!(conn.is_attached());
    assert_eq!(Dialect::D3, conn.dialect());

    assert_eq!(vec!["attach test.fdb"], cli.calls());

    Ok(())
}

#[test]
fn open_missing_fails() {
    let cli = FakeClient::new();

    let res = Connection::open(cli.clone(), &conf("missing.fdb"));

    assert!(matches!(res, Err(FbError::Sql { code: -902, .. })));
    assert_eq!(vec!["attach missing.fdb"], cli.calls());
}

#[test]
fn open_or_create_attaches_first() -> Result<(), FbError> {
    let cli = FakeClient::with_database("test.fdb");

    let _conn = Connection::open_or_create(cli.clone(), &conf("test.fdb"))?;

    assert_eq!(vec!["attach test.fdb"], cli.calls());

    Ok(())
}

#[test]
fn open_or_create_creates() -> Result<(), FbError> {
    let cli = FakeClient::new();
    let mut conf = conf("new.fdb");
    conf.page_size = Some(16 * 1024);

    let conn = Connection::open_or_create(cli.clone(), &conf)?;
    assert!(conn.is_attached());

    assert_eq!(
        vec![
            "attach new.fdb",
            "create new.fdb page_size=Some(16384) dialect=3"
        ],
        cli.calls()
    );

    Ok(())
}

#[test]
fn open_or_create_keeps_other_errors() {
    let cli = FakeClient::new();
    cli.state().fail_io = true;

    let res = Connection::open_or_create(cli.clone(), &conf("new.fdb"));

    match res {
        Err(e) => assert_eq!("Error loading Firebird client library.", e.message()),
        Ok(_) => panic!("A non sql error must not create the database"),
    }
    assert_eq!(vec!["attach new.fdb"], cli.calls());
}

#[test]
fn create_existing_fails() {
    let cli = FakeClient::with_database("test.fdb");

    let res = Connection::create_database(cli.clone(), &conf("test.fdb"));

    assert!(matches!(res, Err(FbError::Sql { .. })));
}

#[test]
fn current_timestamp() -> Result<(), FbError> {
    let cli = FakeClient::with_database("test.fdb");
    let mut conn = Connection::open(cli.clone(), &conf("test.fdb"))?;

    let ts = conn.current_timestamp()?;
    assert_eq!("2024-05-01 10:20:30.1230 America/Sao_Paulo", ts);

    assert_eq!(
        vec![
            "attach test.fdb".to_string(),
            "begin 1 [3, 2, 9, 6]".to_string(),
            format!(
                "query 2 {} dialect=3 len={}",
                CURRENT_TIMESTAMP_SQL, CURRENT_TIMESTAMP_LEN
            ),
            "Commit 2".to_string(),
        ],
        cli.calls()
    );

    Ok(())
}

#[test]
fn current_timestamp_error_rollback() -> Result<(), FbError> {
    let cli = FakeClient::with_database("test.fdb");
    cli.state().fail_query = true;
    let mut conn = Connection::open(cli.clone(), &conf("test.fdb"))?;

    let res = conn.current_timestamp();
    assert!(matches!(res, Err(FbError::Sql { code: -104, .. })));

    let calls = cli.calls();
    assert_eq!(Some(&"Rollback 2".to_string()), calls.last());
    assert!(!calls.contains(&"Commit 2".to_string()));

    // Still usable
    assert!(conn.is_attached());

    Ok(())
}

#[test]
fn current_timestamp_null() -> Result<(), FbError> {
    let cli = FakeClient::with_database("test.fdb");
    cli.state().timestamp = None;
    let mut conn = Connection::open(cli.clone(), &conf("test.fdb"))?;

    assert!(conn.current_timestamp().is_err());

    Ok(())
}

#[test]
fn close_detaches() -> Result<(), FbError> {
    let cli = FakeClient::with_database("test.fdb");
    let conn = Connection::open(cli.clone(), &conf("test.fdb"))?;

    conn.close()?;

    assert_eq!(vec!["attach test.fdb", "detach 1"], cli.calls());

    Ok(())
}

#[test]
fn drop_detaches() -> Result<(), FbError> {
    let cli = FakeClient::with_database("test.fdb");
    let conn = Connection::open(cli.clone(), &conf("test.fdb"))?;

    drop(conn);

    assert_eq!(vec!["attach test.fdb", "detach 1"], cli.calls());

    Ok(())
}

#[test]
fn close_error_detaches_on_drop() -> Result<(), FbError> {
    let cli = FakeClient::with_database("test.fdb");
    cli.state().fail_detach = true;
    let conn = Connection::open(cli.clone(), &conf("test.fdb"))?;

    assert!(conn.close().is_err());

    // The failed detach was retried by the drop
    assert_eq!(vec!["attach test.fdb", "detach 1", "detach 1"], cli.calls());

    Ok(())
}

#[test]
fn shutdown_after_detach() -> Result<(), FbError> {
    let cli = FakeClient::with_database("test.fdb");
    let conn = Connection::open(cli.clone(), &conf("test.fdb"))?;

    conn.shutdown()?;

    assert_eq!(
        vec![
            "attach test.fdb".to_string(),
            "detach 1".to_string(),
            format!("shutdown {}", crate::connection::SHUTDOWN_TIMEOUT_MS),
        ],
        cli.calls()
    );

    Ok(())
}

#[test]
fn drop_database() -> Result<(), FbError> {
    let cli = FakeClient::new();
    let conn = Connection::create_database(cli.clone(), &conf("firebird-example-test.fdb"))?;

    conn.drop_database()?;

    // No detach after the drop
    assert_eq!(
        vec![
            "create firebird-example-test.fdb page_size=None dialect=3",
            "drop 1"
        ],
        cli.calls()
    );
    assert!(cli.state().databases.is_empty());

    Ok(())
}

#[test]
fn dialect_is_used() -> Result<(), FbError> {
    let cli = FakeClient::with_database("test.fdb");
    let mut conf = conf("test.fdb");
    conf.dialect = Dialect::D1;
    let mut conn = Connection::open(cli.clone(), &conf)?;

    assert_eq!(Dialect::D1, conn.dialect());
    conn.current_timestamp()?;

    assert!(cli
        .calls()
        .iter()
        .any(|c| c.starts_with("query") && c.contains("dialect=1")));

    Ok(())
}

//! Integer widths a PostgreSQL-wire backend may pick for `test_column`.
//!
//! Requires a reachable server in `DATABASE_URL`; skipped otherwise.

use queryprobe::{ConnectionFactory, PgConnectionFactory, ProbeError, QueryConnection};
use std::io::Write;

/// Config file pointing at `DATABASE_URL`, or `None` when no server is available.
fn database_config() -> Option<tempfile::NamedTempFile> {
    dotenvy::dotenv().ok();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        println!("Skipping integer width test - no DATABASE_URL provided");
        return None;
    };

    let mut file = tempfile::NamedTempFile::new().unwrap();
    let body = serde_json::json!({ "url": url }).to_string();
    file.write_all(body.as_bytes()).unwrap();
    Some(file)
}

#[tokio::test]
async fn test_int2_int4_int8_columns_widen_to_i64() {
    let Some(config) = database_config() else {
        return;
    };
    let (mut connection, _schema) = PgConnectionFactory.connect(config.path()).await.unwrap();

    for sql in [
        "SELECT 1::int2 AS test_column",
        "SELECT 1::int4 AS test_column",
        "SELECT 1::int8 AS test_column",
    ] {
        let rows = connection.fetch_all(sql).await;
        assert_eq!(rows, Ok(vec![(1,)]), "{sql}");
    }

    let rows = connection
        .fetch_all("SELECT 9000000000::int8 AS test_column")
        .await;
    assert_eq!(rows, Ok(vec![(9_000_000_000,)]));

    connection.close().await.unwrap();
}

#[tokio::test]
async fn test_non_integer_column_is_query_error() {
    let Some(config) = database_config() else {
        return;
    };
    let (mut connection, _schema) = PgConnectionFactory.connect(config.path()).await.unwrap();

    let rows = connection.fetch_all("SELECT 'one'::text AS test_column").await;
    assert!(matches!(rows, Err(ProbeError::Query(_))), "{rows:?}");

    connection.close().await.unwrap();
}

#[tokio::test]
async fn test_empty_int8_result_is_empty() {
    let Some(config) = database_config() else {
        return;
    };
    let (mut connection, _schema) = PgConnectionFactory.connect(config.path()).await.unwrap();

    let rows = connection
        .fetch_all("SELECT 1::int8 AS test_column WHERE false")
        .await;
    assert_eq!(rows, Ok(vec![]));

    connection.close().await.unwrap();
}

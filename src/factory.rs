//! Connection factory seam and its PostgreSQL-wire implementation.

use crate::config::ConnectionConfig;
use crate::error::ProbeError;
use crate::probe::ProbeRow;
use crate::utils::{fmt_duration, log_if_slow};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Column, Connection, PgConnection, Row, TypeInfo};
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

const SLOW_CONNECT_THRESHOLD: Duration = Duration::from_secs(2);

/// Schema the factory associated with a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaName(String);

impl SchemaName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opens a live session to the query service from a configuration source.
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    type Connection: QueryConnection;

    async fn connect(&self, source: &Path) -> Result<(Self::Connection, SchemaName), ProbeError>;
}

/// A live session that can run a query and must be closed when done.
#[async_trait]
pub trait QueryConnection: Send {
    /// Execute `sql` without parameters and collect every row.
    async fn fetch_all(&mut self, sql: &str) -> Result<Vec<ProbeRow>, ProbeError>;

    /// Gracefully terminate the session.
    async fn close(self) -> Result<(), ProbeError>;
}

/// Opens one unpooled [`PgConnection`] per call from a JSON config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnectionFactory;

#[async_trait]
impl ConnectionFactory for PgConnectionFactory {
    type Connection = PgQueryConnection;

    async fn connect(&self, source: &Path) -> Result<(Self::Connection, SchemaName), ProbeError> {
        let config = ConnectionConfig::load(source)?;
        debug!(config = ?config, "connection config loaded");

        let options = config.connect_options()?;
        let start = Instant::now();
        let connecting = PgConnection::connect_with(&options);
        let connection = match config.connect_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, connecting)
                .await
                .map_err(|_| {
                    ProbeError::Connect(format!("timed out after {}", fmt_duration(timeout)))
                })?,
            None => connecting.await,
        }
        .map_err(ProbeError::from_connect)?;

        log_if_slow(start, SLOW_CONNECT_THRESHOLD, "connection acquisition");
        debug!(
            host = options.get_host(),
            port = options.get_port(),
            duration = fmt_duration(start.elapsed()),
            "connection established"
        );

        Ok((
            PgQueryConnection { inner: connection },
            SchemaName::new(config.schema),
        ))
    }
}

/// Read column 0 as an i64, whatever integer width the backend chose.
///
/// Non-integer columns fail with the driver's type-mismatch error.
fn widen_first_column(row: &PgRow) -> Result<i64, sqlx::Error> {
    match row.try_column(0)?.type_info().name() {
        "INT2" => row.try_get::<i16, _>(0).map(i64::from),
        "INT4" => row.try_get::<i32, _>(0).map(i64::from),
        _ => row.try_get::<i64, _>(0),
    }
}

pub struct PgQueryConnection {
    inner: PgConnection,
}

#[async_trait]
impl QueryConnection for PgQueryConnection {
    async fn fetch_all(&mut self, sql: &str) -> Result<Vec<ProbeRow>, ProbeError> {
        let rows = sqlx::query(sql)
            .fetch_all(&mut self.inner)
            .await
            .map_err(ProbeError::from_query)?;
        rows.iter()
            .map(|row| widen_first_column(row).map(|value| (value,)))
            .collect::<Result<Vec<ProbeRow>, sqlx::Error>>()
            .map_err(ProbeError::from_query)
    }

    async fn close(self) -> Result<(), ProbeError> {
        self.inner
            .close()
            .await
            .map_err(|e| ProbeError::Connect(format!("failed to close connection: {e}")))
    }
}

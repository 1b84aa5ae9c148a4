//! Scripted connection factory for exercising the probe without a server.

use async_trait::async_trait;
use queryprobe::{ConnectionFactory, ProbeError, ProbeRow, QueryConnection, SchemaName};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// What the fake backend does when probed.
#[derive(Debug, Clone)]
pub enum Backend {
    /// Connects and returns these rows.
    Rows(Vec<ProbeRow>),
    /// Refuses the connection with this error.
    ConnectFails(ProbeError),
    /// Connects, then fails the query with this error.
    QueryFails(ProbeError),
}

/// Counts acquisitions and releases so tests can check the connection lifecycle.
#[derive(Debug, Default)]
pub struct Counters {
    pub connects: AtomicUsize,
    pub queries: AtomicUsize,
    pub closes: AtomicUsize,
}

impl Counters {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

pub struct FakeFactory {
    backend: Backend,
    fail_close: bool,
    pub counters: Arc<Counters>,
}

impl FakeFactory {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            fail_close: false,
            counters: Arc::default(),
        }
    }

    /// Make every `close()` report an error.
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }
}

pub struct FakeConnection {
    backend: Backend,
    fail_close: bool,
    counters: Arc<Counters>,
}

#[async_trait]
impl ConnectionFactory for FakeFactory {
    type Connection = FakeConnection;

    async fn connect(&self, _source: &Path) -> Result<(Self::Connection, SchemaName), ProbeError> {
        self.counters.connects.fetch_add(1, Ordering::SeqCst);
        if let Backend::ConnectFails(err) = &self.backend {
            return Err(err.clone());
        }
        Ok((
            FakeConnection {
                backend: self.backend.clone(),
                fail_close: self.fail_close,
                counters: Arc::clone(&self.counters),
            },
            SchemaName::new("analytics"),
        ))
    }
}

#[async_trait]
impl QueryConnection for FakeConnection {
    async fn fetch_all(&mut self, sql: &str) -> Result<Vec<ProbeRow>, ProbeError> {
        assert_eq!(sql, queryprobe::PROBE_QUERY);
        self.counters.queries.fetch_add(1, Ordering::SeqCst);
        match &self.backend {
            Backend::Rows(rows) => Ok(rows.clone()),
            Backend::QueryFails(err) => Err(err.clone()),
            Backend::ConnectFails(_) => unreachable!("connection was never handed out"),
        }
    }

    async fn close(self) -> Result<(), ProbeError> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(ProbeError::Connect("socket already closed".into()));
        }
        Ok(())
    }
}

/// Run the probe against `factory` and capture what it printed.
pub async fn run_captured(
    factory: FakeFactory,
) -> (queryprobe::ProbeOutcome, String, Arc<Counters>) {
    let counters = Arc::clone(&factory.counters);
    let probe = queryprobe::Probe::new(factory, "config.json");
    let mut out = Vec::new();
    let outcome = probe.run(&mut out).await.unwrap();
    (outcome, String::from_utf8(out).unwrap(), counters)
}

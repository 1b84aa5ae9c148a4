//! Connectivity probe for SQL query services spoken to over the PostgreSQL wire protocol.

pub mod cli;
pub mod config;
pub mod error;
pub mod factory;
pub mod fmt;
pub mod json;
pub mod logging;
pub mod probe;
pub mod report;
pub mod utils;

pub use error::ProbeError;
pub use factory::{ConnectionFactory, PgConnectionFactory, QueryConnection, SchemaName};
pub use probe::{PROBE_QUERY, Probe, ProbeOutcome, ProbeRow};

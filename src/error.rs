//! Error types for the connectivity probe.

/// Everything that can go wrong between reading the config and fetching rows.
///
/// All variants are reported to the operator as a single failure line; the
/// variant only decides the prefix of the description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("connection error: {0}")]
    Connect(String),
    #[error("query error: {0}")]
    Query(String),
}

impl ProbeError {
    /// Classify a driver error raised while opening a connection.
    pub fn from_connect(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(source) => Self::Config(source.to_string()),
            other => Self::Connect(other.to_string()),
        }
    }

    /// Classify a driver error raised while executing or fetching.
    pub fn from_query(err: sqlx::Error) -> Self {
        Self::Query(err.to_string())
    }

    /// Short machine-friendly name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Connect(_) => "connect",
            Self::Query(_) => "query",
        }
    }
}

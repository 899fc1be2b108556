//! Adapter error taxonomy
//!
//! Every external call returns one of these at its boundary. The boundary
//! logs it and converts it into a benign default, so none of them reach
//! the presentation layer.

/// Failure raised by a data source, classifier, notifier or storage adapter
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Data source or remote storage unreachable, unauthorized or erroring
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// Sentiment backend failed or answered with something unusable
    #[error("classification error: {0}")]
    Classification(String),

    /// Notification transport rejected or dropped a message
    #[error("send error: {0}")]
    Send(String),

    /// Sheet data could not be read as a table
    #[error("parse error: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type AdapterResult<T> = std::result::Result<T, DashboardError>;

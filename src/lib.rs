//! Social Seller lead dashboard
//!
//! Loads lead rows from a spreadsheet, classifies the sentiment of each
//! interaction note, filters and summarizes the table, and renders it as a
//! terminal view, an HTML page or a PDF summary. Actions send one message per
//! lead and back up exported files to remote storage.

pub mod backup;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod metrics;
pub mod notify;
pub mod render;
pub mod report;
pub mod sentiment;
pub mod session;
pub mod source;
pub mod storage;
pub mod types;

#[cfg(test)]
mod test_support;

pub use error::DashboardError;
pub use session::Session;
pub use types::*;

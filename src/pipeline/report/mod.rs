pub mod processor;
pub mod sanitize;
pub mod source;
pub mod store;
pub mod traits;

pub use processor::*;
pub use sanitize::sanitize_report_text;
pub use source::PlainTextSource;
pub use store::{InMemoryMarkerStore, SqliteMarkerStore};
pub use traits::{MarkerStore, TextSource};

use thiserror::Error;

use crate::db::DatabaseError;
use crate::pipeline::bloodwork::ExtractionError;

/// Errors that can occur while turning an uploaded report into a marker record.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Text acquisition failed: {0}")]
    TextAcquisition(String),

    #[error("Report contains no readable text")]
    EmptyText,

    #[error("Invalid report date: {0}")]
    InvalidReportDate(String),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Marker store error: {0}")]
    Store(#[from] DatabaseError),
}

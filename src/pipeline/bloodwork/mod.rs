pub mod catalog;
pub mod classify;
pub mod confidence;
pub mod orchestrator;
pub mod scanner;
pub mod value;

pub use catalog::{catalog, lookup, AnalyteDefinition};
pub use classify::{classify, reference_range, ReferenceRange};
pub use confidence::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Expected report text as a string, got {found}")]
    InputType { found: String },
}

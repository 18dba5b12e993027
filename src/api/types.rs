//! Shared types for the HTTP API layer.

use std::sync::Arc;

use crate::pipeline::report::ReportProcessor;

/// Shared context for all API routes. Owns the processor and, through it,
/// the marker store.
#[derive(Clone)]
pub struct ApiContext {
    pub processor: Arc<ReportProcessor>,
}

impl ApiContext {
    pub fn new(processor: ReportProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }
}

//! Analyte catalog listing.

use axum::Json;
use serde::Serialize;

use crate::pipeline::bloodwork::{catalog, AnalyteDefinition, ReferenceRange};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub definition: &'static AnalyteDefinition,
    pub numeric_range: Option<ReferenceRange>,
}

/// `GET /api/catalog`: every known analyte, in catalog order.
pub async fn list() -> Json<Vec<CatalogEntry>> {
    Json(
        catalog()
            .iter()
            .map(|definition| CatalogEntry {
                definition,
                numeric_range: definition.numeric_range(),
            })
            .collect(),
    )
}

//! Presentation of resolved records as JSON data or HTML fragments

pub mod document;
pub mod structured;
pub mod urls;

use std::str::FromStr;

use crate::error::ServiceError;
use crate::search::QueryResult;
pub use structured::PlantsPayload;

/// Response representation requested by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
  /// Field-name to text mappings, serialized as JSON
  Structured,
  /// HTML fragments for the browser UI
  #[default]
  Document,
}

impl FromStr for OutputFormat {
  type Err = ServiceError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.trim().to_ascii_lowercase().as_str() {
      "structured" | "json" => Ok(OutputFormat::Structured),
      "document" | "html" => Ok(OutputFormat::Document),
      other => Err(ServiceError::InvalidRequest(format!(
        "Invalid format '{other}'. Must be 'structured' or 'document'."
      ))),
    }
  }
}

/// A rendered query result
#[derive(Debug, Clone)]
pub enum Rendered {
  Structured(PlantsPayload),
  Document(String),
}

/// Render a query result in the requested format. Empty results render as
/// an empty payload or the "no plants found" fragment.
pub fn render(result: &QueryResult, format: OutputFormat) -> Rendered {
  match format {
    OutputFormat::Structured => Rendered::Structured(PlantsPayload::from_result(result)),
    OutputFormat::Document if result.is_empty() => Rendered::Document(document::render_no_results(&result.query)),
    OutputFormat::Document => Rendered::Document(document::render_search(&result.query, &result.records)),
  }
}

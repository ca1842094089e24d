//! Report generation error type.

use thiserror::Error;

/// Errors raised while rendering or writing a report file.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Template registration failed
    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),
    /// Template rendering failed
    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),
    /// Report file could not be written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Report payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// JUnit XML emission failed
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

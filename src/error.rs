//! Error types for scenario lookup and catalog loading
//!
//! Simulation itself never fails: unknown block ids are skipped during replay
//! and a runaway concurrency run is stopped by the time ceiling. [`SimError`]
//! covers the places where the caller asked for something that does not exist
//! or handed in catalog data that cannot be used.

use std::fmt;
use std::path::PathBuf;

/// Errors surfaced by the scenario catalog and the selection layer
#[derive(Debug)]
pub enum SimError {
    /// No scenario with this id exists in the catalog
    UnknownScenario { id: String },

    /// The language name is not one of the supported languages
    UnknownLanguage { name: String },

    /// The scenario exists but has no program for the requested language
    LanguageNotAvailable { scenario: String, language: String },

    /// Reading a catalog file failed
    CatalogIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A catalog file is not valid catalog JSON
    CatalogParse {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },

    /// The catalog could not be written out as JSON
    CatalogSerialize { source: serde_json::Error },

    /// A catalog parsed but its content is inconsistent
    InvalidCatalog { problems: Vec<String> },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnknownScenario { id } => write!(f, "Unknown scenario '{}'", id),
            SimError::UnknownLanguage { name } => write!(f, "Unknown language '{}'", name),
            SimError::LanguageNotAvailable { scenario, language } => {
                write!(
                    f,
                    "Scenario '{}' has no program for language '{}'",
                    scenario, language
                )
            }
            SimError::CatalogIo { path, source } => {
                write!(f, "Failed to read catalog {}: {}", path.display(), source)
            }
            SimError::CatalogParse { path, source } => match path {
                Some(path) => write!(f, "Invalid catalog {}: {}", path.display(), source),
                None => write!(f, "Invalid catalog: {}", source),
            },
            SimError::CatalogSerialize { source } => {
                write!(f, "Failed to serialize catalog: {}", source)
            }
            SimError::InvalidCatalog { problems } => {
                write!(f, "Catalog has {} problem(s): {}", problems.len(), problems.join("; "))
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::CatalogIo { source, .. } => Some(source),
            SimError::CatalogParse { source, .. } => Some(source),
            SimError::CatalogSerialize { source } => Some(source),
            _ => None,
        }
    }
}

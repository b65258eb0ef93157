//! Error type shared by all report operations.

use plotters::drawing::DrawingAreaErrorKind;
use std::{error::Error, path::PathBuf, process::ExitStatus};
use thiserror::Error;

/// Error returned by normalization, rendering, and artifact-generation operations.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The input does not have the expected shape, e.g. a scale-factor key that is not an integer.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The document lacks the requested benchmark (or key path segment).
    #[error("missing key `{key}` in {context}")]
    MissingKey { key: String, context: String },

    /// A rate was requested for a row whose scale factor or timing is zero.
    #[error("division by zero computing {field} rate for {query}/{variant} at scale factor {scale_factor}")]
    DivisionByZero {
        query: String,
        variant: String,
        scale_factor: u64,
        field: &'static str,
    },

    /// An external tool (drawio, cargo, pdf converter, viewer) could not be run or exited non-zero.
    #[error("`{command}` failed ({status}): {stderr}")]
    ExternalTool {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("unknown graph `{0}`")]
    UnknownGraph(String),

    /// A batch job panicked or could not be scheduled.
    #[error("worker failed: {0}")]
    Worker(String),
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn missing_key(key: &str, context: impl Into<String>) -> Self {
        Self::MissingKey {
            key: key.to_owned(),
            context: context.into(),
        }
    }

    pub(crate) fn external_tool(command: &str, status: Option<ExitStatus>, stderr: &[u8]) -> Self {
        Self::ExternalTool {
            command: command.to_owned(),
            status: status.map_or_else(|| "not started".to_owned(), |s| s.to_string()),
            stderr: String::from_utf8_lossy(stderr).trim().to_owned(),
        }
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for ReportError
where
    E: Error + Send + Sync,
{
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Self::Render(e.to_string())
    }
}

//! Error types for the `sysconf` command-line tool.

use camino::Utf8PathBuf;
use sysconf::SysconfError;
use thiserror::Error;

/// Errors reported by the `sysconf` tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The database layer failed.
    #[error(transparent)]
    Database(#[from] SysconfError),

    /// No database path was given and the platform data directory is unknown.
    #[error("cannot determine where the {store} database lives; pass --{store}-db")]
    NoDefaultPath {
        /// Which store lacks a path (`templates` or `config`).
        store: &'static str,
    },

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// The requested template does not exist.
    #[error("template {name} does not exist in {path}")]
    TemplateNotFound {
        /// Requested template name.
        name: String,
        /// Templates database searched.
        path: Utf8PathBuf,
    },

    /// Writing results failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// Serialising JSON output failed.
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::templates("templates", "--templates-db")]
    #[case::config("config", "--config-db")]
    fn missing_default_path_names_the_flag(#[case] store: &'static str, #[case] flag: &str) {
        let err = ToolError::NoDefaultPath { store };

        assert!(err.to_string().contains(flag));
    }

    #[rstest]
    fn database_errors_pass_through() {
        let inner = SysconfError::MissingTemplateName {
            stanza: 4,
            source_name: "demo.templates".to_owned(),
        };
        let expected = inner.to_string();

        let err = ToolError::from(inner);

        assert_eq!(err.to_string(), expected);
    }

    #[rstest]
    fn json_errors_convert_with_context() {
        let inner = serde_json::from_str::<serde_json::Value>("{")
            .expect_err("truncated JSON should not parse");

        let err = ToolError::from(inner);

        assert!(matches!(err, ToolError::Json(_)));
        assert!(err.to_string().starts_with("failed to render JSON: "));
    }
}

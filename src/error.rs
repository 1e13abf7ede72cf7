//! Error types for the sysconf core.
//!
//! Absence is never an error here: missing items, templates, questions, and
//! fields are reported as `None` or an empty string by the accessors. The
//! variants below cover malformed template input, backends refusing a
//! mutation, persistence failures, and configuration problems.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised by the sysconf core.
#[derive(Debug, Error)]
pub enum SysconfError {
    /// A line in a template file does not match any known line shape.
    #[error("template parse error near `{line}', in stanza {stanza} of {source_name}")]
    Parse {
        /// One-based stanza number.
        stanza: usize,
        /// The offending line.
        line: String,
        /// Name of the template source (usually a file path).
        source_name: String,
    },

    /// A field appears twice in the same stanza.
    #[error(
        "template {stanza} in {source_name} has a duplicate field \"{field}\" with new value \"{value}\"; \
         probably two templates are not separated by a blank line"
    )]
    DuplicateField {
        /// One-based stanza number.
        stanza: usize,
        /// The repeated field name.
        field: String,
        /// The value carried by the repeated field.
        value: String,
        /// Name of the template source.
        source_name: String,
    },

    /// A stanza has no `Template:` line.
    #[error("template {stanza} in {source_name} does not contain a 'Template:' line")]
    MissingTemplateName {
        /// One-based stanza number.
        stanza: usize,
        /// Name of the template source.
        source_name: String,
    },

    /// A template file could not be read.
    #[error("cannot read templates file {path}: {source}")]
    Read {
        /// Path of the unreadable file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A backend refused to create or extend an item.
    #[error("{store} database refused to add owner {owner} to {item}")]
    StoreRejected {
        /// Name of the store that refused the mutation.
        store: String,
        /// Item being created or extended.
        item: String,
        /// Owner that could not be added.
        owner: String,
    },

    /// A file-backed store could not be loaded.
    #[error("cannot load database {path}: {reason}")]
    StoreLoad {
        /// Path of the database file.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// A file-backed store could not be written.
    #[error("cannot save database {path}")]
    StoreSave {
        /// Path of the database file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be read.
    #[error("cannot read configuration {path}")]
    ConfigRead {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or contains unknown keys.
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result type alias using [`SysconfError`].
pub type Result<T> = std::result::Result<T, SysconfError>;

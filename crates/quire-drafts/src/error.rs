//! Error types for draft persistence.

use std::path::PathBuf;

use miette::Diagnostic;

/// Failures of the draft store.
///
/// Reading or parsing a single draft during a scan is not an error: that
/// draft is logged and skipped.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum DraftError {
    /// Couldn't create the drafts directory
    #[error("failed to create drafts directory {}", path.display())]
    #[diagnostic(
        code(quire::drafts::create_dir),
        help("check that the parent directory exists and is writable, or pass --drafts-dir")
    )]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Couldn't list the drafts directory
    #[error("failed to read drafts directory {}", path.display())]
    #[diagnostic(code(quire::drafts::read_dir))]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read draft {}", path.display())]
    #[diagnostic(code(quire::drafts::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("draft {} is not valid JSON", path.display())]
    #[diagnostic(code(quire::drafts::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write draft {}", path.display())]
    #[diagnostic(code(quire::drafts::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete draft {}", path.display())]
    #[diagnostic(code(quire::drafts::delete))]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Draft ids become part of a file name.
    #[error("invalid draft id {0:?}")]
    #[diagnostic(
        code(quire::drafts::invalid_id),
        help("ids may not be empty or contain path separators")
    )]
    InvalidId(String),

    #[error(transparent)]
    #[diagnostic(code(quire::drafts::serialize))]
    Serialize(#[from] serde_json::Error),
}

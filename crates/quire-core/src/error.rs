//! Error types for quire-core.
//!
//! Computing decorations can't fail: unrecognized markdown is plain text.
//! Errors only come from applying host effects to a document.

use miette::Diagnostic;

use crate::platform::PlatformError;

#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum PreviewError {
    /// An edit or selection referred to offsets past the end of the document.
    #[error("range {start}..{end} is outside the document (length {len})")]
    #[diagnostic(code(quire::preview::out_of_bounds))]
    OutOfBounds { start: usize, end: usize, len: usize },

    /// The host could not perform a requested side effect.
    #[error("host error: {0}")]
    #[diagnostic(code(quire::preview::platform))]
    Platform(#[from] PlatformError),
}

//! quire-drafts: crash-safe drafts for open documents.
//!
//! Every open document is saved as its own `draft-<id>.json` file, so a
//! corrupt or half-written draft only ever loses that one document.

pub mod draft;
pub mod error;
pub mod store;

pub use draft::{Draft, DraftSelection, OpenDocument};
pub use error::DraftError;
pub use store::{DraftStore, default_drafts_dir, parse_draft_id};

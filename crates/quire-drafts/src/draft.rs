//! On-disk draft record.

use chrono::{DateTime, Utc};
use quire_core::Selection;
use serde::{Deserialize, Serialize};

/// Selection as stored in a draft file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DraftSelection {
    pub anchor: usize,
    pub head: usize,
}

impl From<Selection> for DraftSelection {
    fn from(sel: Selection) -> Self {
        Self {
            anchor: sel.anchor,
            head: sel.head,
        }
    }
}

impl From<DraftSelection> for Selection {
    fn from(sel: DraftSelection) -> Self {
        Selection::new(sel.anchor, sel.head)
    }
}

/// An open document as the host hands it over for saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDocument {
    pub id: String,
    pub title: String,
    pub content: String,
    pub selection: Selection,
}

/// One saved draft. Serialized as `draft-<id>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    /// Older drafts were written with a `tabId` field.
    #[serde(alias = "tabId")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub selection: DraftSelection,
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    /// Stamp `doc` with the given save time.
    pub fn from_document(doc: &OpenDocument, updated_at: DateTime<Utc>) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.title.clone(),
            content: doc.content.clone(),
            selection: doc.selection.into(),
            updated_at,
        }
    }

    /// Back to an open document; the selection is clamped to the content.
    pub fn into_document(self) -> OpenDocument {
        let len = self.content.chars().count();
        let selection = Selection::new(self.selection.anchor.min(len), self.selection.head.min(len));
        OpenDocument {
            id: self.id,
            title: self.title,
            content: self.content,
            selection,
        }
    }
}

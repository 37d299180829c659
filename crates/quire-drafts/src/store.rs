//! JSON file store for drafts: one `draft-<id>.json` per open document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::draft::{Draft, OpenDocument};
use crate::error::DraftError;

const DRAFT_PREFIX: &str = "draft-";
const DRAFT_SUFFIX: &str = ".json";

/// Directory drafts go in when none is configured.
pub fn default_drafts_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("./"))
        .join("quire/drafts")
}

/// The id encoded in a draft file name, e.g. `draft-7.json` -> `7`.
pub fn parse_draft_id(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(DRAFT_PREFIX)?
        .strip_suffix(DRAFT_SUFFIX)
        .filter(|id| !id.is_empty())
}

fn validate_id(id: &str) -> Result<(), DraftError> {
    if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
        return Err(DraftError::InvalidId(id.to_string()));
    }
    Ok(())
}

pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn draft_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{DRAFT_PREFIX}{id}{DRAFT_SUFFIX}"))
    }

    /// Create the drafts directory if it doesn't exist yet.
    pub async fn ensure_dir(&self) -> Result<(), DraftError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| DraftError::CreateDir {
                path: self.dir.clone(),
                source,
            })
    }

    /// Write `doc` as a draft stamped with the current time.
    pub async fn save(&self, doc: &OpenDocument) -> Result<Draft, DraftError> {
        validate_id(&doc.id)?;
        self.ensure_dir().await?;

        let draft = Draft::from_document(doc, Utc::now());
        let path = self.draft_path(&draft.id);
        let json = serde_json::to_string_pretty(&draft)?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|source| DraftError::Write {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(target: "quire::drafts", id = %draft.id, path = %path.display(), "saved draft");
        Ok(draft)
    }

    /// Load one draft. A missing file is `Ok(None)`.
    pub async fn load(&self, id: &str) -> Result<Option<Draft>, DraftError> {
        validate_id(id)?;
        let path = self.draft_path(id);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(DraftError::Read { path, source }),
        };
        let draft = serde_json::from_str(&text).map_err(|source| DraftError::Parse {
            path: path.clone(),
            source,
        })?;
        Ok(Some(draft))
    }

    /// Delete a draft. Deleting one that isn't there is fine.
    pub async fn delete(&self, id: &str) -> Result<(), DraftError> {
        validate_id(id)?;
        let path = self.draft_path(id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(target: "quire::drafts", id, "deleted draft");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(DraftError::Delete { path, source }),
        }
    }

    /// Load every draft in the directory, sorted by id.
    ///
    /// Each file is read and parsed on its own; one that fails is logged and
    /// skipped so the rest still load.
    pub async fn load_all(&self) -> Result<Vec<Draft>, DraftError> {
        self.ensure_dir().await?;

        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|source| DraftError::ReadDir {
                path: self.dir.clone(),
                source,
            })?;

        let mut drafts = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| DraftError::ReadDir {
                path: self.dir.clone(),
                source,
            })?
        {
            let file_name = entry.file_name();
            let Some(id) = file_name.to_str().and_then(parse_draft_id) else {
                continue;
            };
            match self.load(id).await {
                Ok(Some(draft)) => drafts.push(draft),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(target: "quire::drafts", file = ?file_name, error = %e, "skipping unreadable draft");
                }
            }
        }

        drafts.sort_by(|a, b| a.id.cmp(&b.id));
        tracing::debug!(target: "quire::drafts", count = drafts.len(), dir = %self.dir.display(), "loaded drafts");
        Ok(drafts)
    }
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new(default_drafts_dir())
    }
}

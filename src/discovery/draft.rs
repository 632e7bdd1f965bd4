//! Saved progress for an unfinished questionnaire

use std::fs;
use std::path::{Path, PathBuf};

use crate::discovery::form::DiscoveryForm;
use crate::error::{Result, VitalPathError};

/// File name of the draft inside the data directory.
pub const DRAFT_FILE_NAME: &str = "discovery-draft.json";

/// Reads and writes the in-progress form as JSON.
///
/// The draft is kept apart from the session tokens so logging out does not
/// discard it.
#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for [`DRAFT_FILE_NAME`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DRAFT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the saved form, marked as resumed, or `None` if there is no
    /// usable draft.
    ///
    /// A draft that no longer parses is logged and ignored.
    pub fn load(&self) -> Result<Option<DiscoveryForm>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            VitalPathError::Draft(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        match serde_json::from_str::<DiscoveryForm>(&contents) {
            Ok(mut form) => {
                form.mark_resumed();
                tracing::debug!(
                    path = %self.path.display(),
                    section = %form.section(),
                    "Restored discovery draft"
                );
                Ok(Some(form))
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable discovery draft"
                );
                Ok(None)
            }
        }
    }

    /// Overwrites the draft with `form`.
    pub fn save(&self, form: &DiscoveryForm) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                VitalPathError::Draft(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let contents = serde_json::to_string_pretty(&form.to_draft())?;
        fs::write(&self.path, contents).map_err(|e| {
            VitalPathError::Draft(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        tracing::trace!(path = %self.path.display(), "Saved discovery draft");
        Ok(())
    }

    /// Deletes the draft. Missing drafts are not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VitalPathError::Draft(format!(
                "Failed to delete {}: {}",
                self.path.display(),
                e
            ))
            .into()),
        }
    }
}

//! Shared types for both backend and frontend (WASM-compatible).
//!
//! These types must not depend on backend-only dependencies like `tokio` or
//! `reqwest`.

use serde::{Deserialize, Serialize};
use stockroom_inventory::{ProductDraft, SupplierOption};

/// A file the user attached to the add-product form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub name: String,
    /// MIME type reported by the file picker, if any.
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: None,
            bytes,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Reported MIME type, or one guessed from the file extension.
    pub fn mime_type(&self) -> &str {
        match self.mime.as_deref() {
            Some(m) if !m.trim().is_empty() => m,
            _ => crate::preview::guess_mime(&self.name),
        }
    }
}

impl core::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// What to do with in-flight work when the user attaches another file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReselectPolicy {
    /// Let the previous encode finish; its result is discarded.
    #[default]
    Supersede,
    /// Abort the previous preview encode.
    AbortPreview,
    /// Abort the previous preview encode and any pending submission.
    AbortAll,
}

impl ReselectPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "supersede" => Some(Self::Supersede),
            "abort-preview" => Some(Self::AbortPreview),
            "abort-all" => Some(Self::AbortAll),
            _ => None,
        }
    }

    pub fn aborts_preview(&self) -> bool {
        matches!(self, Self::AbortPreview | Self::AbortAll)
    }

    pub fn aborts_submission(&self) -> bool {
        matches!(self, Self::AbortAll)
    }
}

/// Everything the frontend needs to render the list header and the modal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    /// Number of state changes applied so far; never decreases.
    pub revision: u64,
    pub mounted: bool,
    pub modal_open: bool,
    pub draft: ProductDraft,
    pub supplier_options: Vec<SupplierOption>,
    /// Name shown in the read-only "No file selected" box.
    pub file_name: Option<String>,
    pub preview_url: Option<String>,
    pub submitting: bool,
    pub error: Option<String>,
}

impl ViewSnapshot {
    /// Whether this snapshot may replace `current` in the UI.
    ///
    /// Replies and pushed updates can arrive out of order; an older revision
    /// must never overwrite a newer one.
    pub fn supersedes(&self, current: Option<&ViewSnapshot>) -> bool {
        current.is_none_or(|current| self.revision >= current.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(revision: u64) -> ViewSnapshot {
        ViewSnapshot {
            revision,
            mounted: true,
            modal_open: true,
            draft: ProductDraft::default(),
            supplier_options: vec![SupplierOption::placeholder()],
            file_name: None,
            preview_url: None,
            submitting: false,
            error: None,
        }
    }

    #[test]
    fn older_snapshot_never_replaces_newer_one() {
        assert!(at(0).supersedes(None));
        assert!(at(5).supersedes(Some(&at(4))));
        assert!(at(5).supersedes(Some(&at(5))));
        assert!(!at(3).supersedes(Some(&at(4))));
    }

    #[test]
    fn reselect_policy_parses_kebab_case_names() {
        assert_eq!(ReselectPolicy::parse(" Abort-Preview "), Some(ReselectPolicy::AbortPreview));
        assert!(ReselectPolicy::AbortPreview.aborts_preview());
        assert!(!ReselectPolicy::AbortPreview.aborts_submission());
        assert_eq!(ReselectPolicy::parse("cancel"), None);
    }
}

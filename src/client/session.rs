//! Session state for the multi-file upload workflow.
//!
//! Each selected file becomes a [`FilePreview`] the moment it is chosen:
//! registered optimistically as uploading, then uploaded concurrently and
//! independently. Only successful uploads reach the session's file list.
//! Local preview payloads are released on every exit path: superseded by
//! the remote URL, removed, or dropped with the session.

use bytes::Bytes;
use futures_util::future::join_all;
use uuid::Uuid;

use super::classify::{classify, FileKind, TEXT_PREVIEW_CEILING};
use super::Uploader;
use crate::models::FileEntry;

/// Upload state of a single selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Uploading,
    Done { url: String },
    Failed { error: String },
}

/// Locally-held preview payload for a file that has not (yet) got a
/// remote URL to point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalPreview {
    Image(Bytes),
    Text(String),
    None,
}

/// One selected file, tracked from selection through upload.
#[derive(Debug, Clone)]
pub struct FilePreview {
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    pub status: UploadStatus,
    pub local: LocalPreview,
}

/// Mutable state for one create/update session.
#[derive(Debug, Default)]
pub struct UploadSession {
    previews: Vec<FilePreview>,
    files: Vec<FileEntry>,
    selected: Option<usize>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previews(&self) -> &[FilePreview] {
        &self.previews
    }

    /// Descriptors of every successfully uploaded file, in completion order.
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn into_files(self) -> Vec<FileEntry> {
        self.files
    }

    pub fn selected(&self) -> Option<&FilePreview> {
        self.selected.and_then(|index| self.previews.get(index))
    }

    /// Register a selected file ahead of its upload. Images keep their
    /// bytes for local display; recognized text files under the size
    /// ceiling keep a decoded snippet.
    pub fn register(&mut self, name: &str, data: &Bytes) -> Uuid {
        let local = match classify(name) {
            FileKind::Image => LocalPreview::Image(data.clone()),
            FileKind::Text if (data.len() as u64) < TEXT_PREVIEW_CEILING => {
                match std::str::from_utf8(data) {
                    Ok(text) => LocalPreview::Text(text.to_owned()),
                    Err(_) => LocalPreview::None,
                }
            }
            _ => LocalPreview::None,
        };

        let preview = FilePreview {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            size: data.len() as u64,
            status: UploadStatus::Uploading,
            local,
        };
        let id = preview.id;

        if self.previews.is_empty() {
            self.selected = Some(0);
        }
        self.previews.push(preview);

        id
    }

    /// Record a finished upload. The remote descriptor joins the file
    /// list and supersedes a locally-held image payload.
    pub fn complete(&mut self, id: Uuid, entry: FileEntry) {
        let Some(index) = self.index_of(id) else {
            // removed while the upload was in flight
            return;
        };

        let preview = &mut self.previews[index];
        preview.status = UploadStatus::Done {
            url: entry.url.clone(),
        };
        if matches!(preview.local, LocalPreview::Image(_)) {
            preview.local = LocalPreview::None;
        }

        self.files.push(entry);
    }

    /// Record a failed upload. The entry never reaches the file list and
    /// the failure does not affect any other upload.
    pub fn fail(&mut self, id: Uuid, error: impl Into<String>) {
        if let Some(index) = self.index_of(id) {
            self.previews[index].status = UploadStatus::Failed {
                error: error.into(),
            };
        }
    }

    /// Remove an entry. An already-uploaded descriptor leaves the file
    /// list too; the stored object itself is not deleted.
    pub fn remove(&mut self, id: Uuid) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let preview = self.previews.remove(index);

        if let UploadStatus::Done { url } = &preview.status {
            self.files.retain(|file| &file.url != url);
        }

        self.selected = match self.selected {
            Some(selected) if index < selected => Some(selected - 1),
            Some(selected) if index == selected => None,
            other => other,
        };
    }

    pub fn select(&mut self, index: usize) {
        if index < self.previews.len() {
            self.selected = Some(index);
        }
    }

    fn index_of(&self, id: Uuid) -> Option<usize> {
        self.previews.iter().position(|preview| preview.id == id)
    }
}

/// Upload every file through `uploader`, concurrently and independently;
/// one failure neither blocks nor rolls back the others.
pub async fn upload_all<U: Uploader>(
    session: &mut UploadSession,
    uploader: &U,
    files: Vec<(String, Bytes)>,
) {
    let pending: Vec<(Uuid, String, Bytes)> = files
        .into_iter()
        .map(|(name, data)| {
            let id = session.register(&name, &data);
            (id, name, data)
        })
        .collect();

    let results = join_all(pending.into_iter().map(|(id, name, data)| async move {
        (id, uploader.upload(&name, data).await)
    }))
    .await;

    for (id, result) in results {
        match result {
            Ok(entry) => session.complete(id, entry),
            Err(err) => session.fail(id, err.to_string()),
        }
    }
}

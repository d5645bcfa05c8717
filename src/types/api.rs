use serde::{Deserialize, Serialize};

use crate::models::FileEntry;

/// Body of `POST /api/create`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreatePage {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// Response of `POST /api/create`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageCreated {
    pub id: String,
    pub url: String,
}

/// Response of `GET /api/page/:id`: content plus an always-present,
/// possibly empty file list.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageData {
    pub content: String,
    pub files: Vec<FileEntry>,
}

/// Body of `PUT /api/page/:id`. Replaces content and files wholesale.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdatePage {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// Response of `PUT /api/page/:id`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResult {
    pub success: bool,
}

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use bytes::Bytes;
use tokio::fs;

use crate::client::session::{UploadSession, UploadStatus};

pub mod create;
pub mod purge_expired;
pub mod serve;
pub mod show;
pub mod update;

/// Resolve the page text for a create/update command: the `--text` flag,
/// or stdin when neither text nor files were given.
fn resolve_content(text: Option<String>, has_files: bool) -> anyhow::Result<String> {
    match text {
        Some(text) => Ok(text),
        None if !has_files => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Ok(String::new()),
    }
}

/// Read the selected files into memory, keyed by their file names.
async fn read_selection(paths: &[PathBuf]) -> anyhow::Result<Vec<(String, Bytes)>> {
    let mut selection = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("bad file name: {}", path.display()))?
            .to_owned();
        let data = fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        selection.push((name, Bytes::from(data)));
    }
    Ok(selection)
}

/// Print the per-file outcome of an upload session.
fn report_outcomes(session: &UploadSession) {
    for preview in session.previews() {
        match &preview.status {
            UploadStatus::Done { url } => {
                println!("uploaded {} ({} bytes): {url}", preview.name, preview.size);
            }
            UploadStatus::Failed { error } => {
                eprintln!("failed {}: {error}", preview.name);
            }
            UploadStatus::Uploading => {}
        }
    }
}

use axum::body::Bytes;
use chrono::{Duration, Utc};
use tracing::{info, warn};
use urlencoding::encode;

use crate::error::{ApiError, ApiResult};
use crate::ids::generate_id;
use crate::models::{FileEntry, Page};
use crate::storage::{object_key, Storage};
use crate::App;

const ID_INSERT_ATTEMPTS: usize = 3;

/// Create a page. Rejects an entirely empty submission; retries the
/// generated identifier on a primary key collision.
pub async fn create(app: &mut App, content: String, files: Vec<FileEntry>) -> ApiResult<Page> {
    if content.is_empty() && files.is_empty() {
        return Err(ApiError::EmptyPage);
    }

    let expires_at = Utc::now() + Duration::days(app.config.limits.expiration_days);

    for _ in 0..ID_INSERT_ATTEMPTS {
        let page = Page {
            id: generate_id(),
            content: content.clone(),
            files: files.clone(),
            expires_at,
        };

        match app.database.insert_page(&page).await {
            Ok(()) => {
                info!(
                    "new page: id='{id}', files={count}, content_len={len}",
                    id = page.id,
                    count = page.files.len(),
                    len = page.content.len()
                );
                return Ok(page);
            }
            Err(ApiError::IdCollision) => {
                warn!("page id '{}' already taken, regenerating", page.id);
            }
            Err(err) => return Err(err),
        }
    }

    Err(ApiError::IdCollision)
}

/// Fetch a page by id; an expired page is absent.
pub async fn fetch(app: &mut App, id: &str) -> ApiResult<Page> {
    app.database.get_page(id, Utc::now()).await
}

/// Replace a page's content and files wholesale.
pub async fn update(app: &mut App, id: &str, content: &str, files: &[FileEntry]) -> ApiResult<()> {
    app.database.update_page(id, content, files, Utc::now()).await
}

/// Store an uploaded file and describe it with a public URL on this
/// service's `/files/` route.
pub async fn store_file(app: &mut App, file_name: &str, data: Bytes) -> ApiResult<FileEntry> {
    let key = object_key(file_name);
    let size = data.len() as u64;

    info!("storing file: key='{key}', name='{file_name}', size={size}");

    app.storage.put_object(&key, data).await?;

    let url = format!("{}/files/{}", app.config.base_url, encode(&key));
    Ok(FileEntry {
        name: file_name.to_owned(),
        url,
        size,
    })
}

/// Fetch a stored object's bytes by key.
pub async fn fetch_blob(app: &mut App, key: &str) -> ApiResult<Bytes> {
    app.storage.get_object(key).await
}

/// Delete expired pages along with the objects this service stored for
/// them. Objects already gone are logged and skipped.
pub async fn purge_expired(app: &mut App) -> ApiResult<usize> {
    let pages = app.database.get_all_pages().await?;
    let now = Utc::now();

    let mut count = 0;
    for page in pages {
        if page.expires_at > now {
            continue;
        }

        for file in &page.files {
            let Some(key) = owned_object_key(&app.config.base_url, &file.url) else {
                continue;
            };
            match app.storage.delete_object(&key).await {
                Ok(()) => {}
                Err(ApiError::NotFound) => warn!("object '{key}' already gone"),
                Err(err) => return Err(err),
            }
        }

        info!("deleting expired page: {}", page.id);
        app.database.delete_page(&page.id).await?;
        count += 1;
    }

    Ok(count)
}

/// Extract the object key from a file URL, if it points back at this
/// service's `/files/` route. Foreign URLs are not ours to delete.
fn owned_object_key(base_url: &str, url: &str) -> Option<String> {
    let path = url.strip_prefix(base_url)?;
    let key = path.strip_prefix("/files/")?;
    urlencoding::decode(key).ok().map(|key| key.into_owned())
}

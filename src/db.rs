use chrono::{DateTime, Utc};
use sqlx::{AnyPool, FromRow};

use crate::error::{ApiError, ApiResult};
use crate::models::{FileEntry, Page};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS pages (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    files TEXT NOT NULL,
    expires_at BIGINT NOT NULL
)";

#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

/// Raw row shape; `files` is a JSON list and `expires_at` epoch seconds,
/// types every backend behind the Any driver can carry.
#[derive(FromRow)]
struct PageRow {
    id: String,
    content: String,
    files: String,
    expires_at: i64,
}

impl PageRow {
    fn into_page(self) -> ApiResult<Page> {
        let files: Vec<FileEntry> = serde_json::from_str(&self.files)?;
        Ok(Page {
            id: self.id,
            content: self.content,
            files,
            expires_at: DateTime::from_timestamp(self.expires_at, 0).unwrap_or_default(),
        })
    }
}

impl Database {
    /// Connect to a database by URL.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            pool: AnyPool::connect(url).await?,
        })
    }

    /// Create the schema if it does not exist yet.
    pub async fn migrate(&mut self) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(SCHEMA).execute(&mut conn).await?;
        Ok(())
    }

    /// Get a page by id. An expired page is absent.
    pub async fn get_page(&mut self, id: &str, now: DateTime<Utc>) -> ApiResult<Page> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, PageRow>(
            "SELECT id, content, files, expires_at FROM pages WHERE id = ? AND expires_at > ?",
        )
        .bind(id)
        .bind(now.timestamp())
        .fetch_one(&mut conn)
        .await?;
        row.into_page()
    }

    /// Insert a page. A primary key conflict surfaces as `IdCollision`.
    pub async fn insert_page(&mut self, page: &Page) -> ApiResult<()> {
        let mut conn = self.pool.acquire().await?;
        let result =
            sqlx::query("INSERT INTO pages (id, content, files, expires_at) VALUES (?, ?, ?, ?)")
                .bind(&page.id)
                .bind(&page.content)
                .bind(serde_json::to_string(&page.files)?)
                .bind(page.expires_at.timestamp())
                .execute(&mut conn)
                .await;
        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(ApiError::IdCollision),
            Err(err) => Err(err.into()),
        }
    }

    /// Replace a page's content and files wholesale. The expiry predicate
    /// matches the read path: updating an expired page is `NotFound`.
    pub async fn update_page(
        &mut self,
        id: &str,
        content: &str,
        files: &[FileEntry],
        now: DateTime<Utc>,
    ) -> ApiResult<()> {
        let mut conn = self.pool.acquire().await?;
        let result =
            sqlx::query("UPDATE pages SET content = ?, files = ? WHERE id = ? AND expires_at > ?")
                .bind(content)
                .bind(serde_json::to_string(files)?)
                .bind(id)
                .bind(now.timestamp())
                .execute(&mut conn)
                .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    /// Get all pages, expired ones included. Used by the purge command.
    pub async fn get_all_pages(&mut self) -> ApiResult<Vec<Page>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, PageRow>(
            "SELECT id, content, files, expires_at FROM pages",
        )
        .fetch_all(&mut conn)
        .await?;
        rows.into_iter().map(PageRow::into_page).collect()
    }

    /// Delete a page by id.
    pub async fn delete_page(&mut self, id: &str) -> ApiResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("DELETE FROM pages WHERE id = ?")
            .bind(id)
            .execute(&mut conn)
            .await?;
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        // 23505 postgres, 1555/2067 sqlite
        sqlx::Error::Database(err) => {
            matches!(err.code().as_deref(), Some("23505" | "1555" | "2067"))
        }
        _ => false,
    }
}

//! Client-side workflow for talking to a pagebin server.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::FileEntry;
use crate::types::api::{CreatePage, PageCreated, PageData, UpdatePage, UpdateResult};

pub mod classify;
pub mod session;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed")]
    Http {
        #[from]
        source: reqwest::Error,
    },
    #[error("server responded {status}: {message}")]
    Api { status: u16, message: String },
}

/// Seam for the upload transport, so session logic tests offline.
pub trait Uploader {
    async fn upload(&self, file_name: &str, data: Bytes) -> ClientResult<FileEntry>;
}

/// HTTP client for the pagebin API.
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        HttpClient {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn create_page(
        &self,
        content: String,
        files: Vec<FileEntry>,
    ) -> ClientResult<PageCreated> {
        let response = self
            .http
            .post(format!("{}/api/create", self.base_url))
            .json(&CreatePage { content, files })
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn fetch_page(&self, id: &str) -> ClientResult<PageData> {
        let response = self
            .http
            .get(format!("{}/api/page/{id}", self.base_url))
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn update_page(
        &self,
        id: &str,
        content: String,
        files: Vec<FileEntry>,
    ) -> ClientResult<UpdateResult> {
        let response = self
            .http
            .put(format!("{}/api/page/{id}", self.base_url))
            .json(&UpdatePage { content, files })
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Fetch a stored file as text, for inline previews.
    pub async fn fetch_text(&self, url: &str) -> ClientResult<String> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Api {
                status: response.status().as_u16(),
                message: "could not load file".to_owned(),
            });
        }
        Ok(response.text().await?)
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        // error bodies are {"error": message}
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("error")
                    .and_then(|error| error.as_str())
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| status.to_string());
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl Uploader for HttpClient {
    async fn upload(&self, file_name: &str, data: Bytes) -> ClientResult<FileEntry> {
        let part = reqwest::multipart::Part::bytes(data.to_vec()).file_name(file_name.to_owned());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/api/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;
        Self::parse(response).await
    }
}

/// Accept either a bare page id or a full share URL.
pub fn parse_page_ref(page: &str) -> &str {
    page.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_refs_accept_bare_ids_and_urls() {
        assert_eq!(parse_page_ref("abc123"), "abc123");
        assert_eq!(parse_page_ref("http://localhost:3000/abc123"), "abc123");
        assert_eq!(parse_page_ref("http://localhost:3000/abc123/"), "abc123");
        assert_eq!(
            parse_page_ref("https://paste.example.com/api/page/abc123"),
            "abc123"
        );
    }

    #[test]
    fn client_trims_trailing_slashes() {
        let client = HttpClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}

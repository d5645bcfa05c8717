use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{body, Json, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::controllers::page;
use crate::error::ApiError;
use crate::models::FileEntry;
use crate::types::api::{CreatePage, PageCreated, PageData, UpdatePage, UpdateResult};
use crate::App;

/// Plain-text usage page served at the root.
const USAGE_PAGE: &str = include_str!("../../assets/usage.txt");

pub async fn run(app: App) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], app.config.port));
    info!("listening on {addr}");

    axum::Server::bind(&addr)
        .serve(router(app).into_make_service())
        .await?;

    Ok(())
}

/// Build the application router. Exposed so tests can drive it directly.
pub fn router(app: App) -> Router {
    let max_upload_size = app.config.limits.max_upload_size;

    Router::new()
        .route("/", get(index))
        .route("/api/create", post(create_page))
        .route("/api/page/:id", get(get_page).put(update_page))
        .route("/api/upload", post(upload_file))
        .route("/files/:key", get(get_file))
        .route("/:id", get(get_page))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_size))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

async fn index() -> &'static str {
    USAGE_PAGE
}

async fn create_page(
    State(mut app): State<App>,
    Json(request): Json<CreatePage>,
) -> crate::ApiResult<impl IntoResponse> {
    let page = page::create(&mut app, request.content, request.files).await?;

    let path = format!("/{}", page.id);
    let url = format!("{}{}", app.config.base_url, path);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, path)],
        Json(PageCreated { id: page.id, url }),
    ))
}

async fn get_page(
    State(mut app): State<App>,
    Path(id): Path<String>,
) -> crate::ApiResult<Json<PageData>> {
    let page = page::fetch(&mut app, &id).await?;
    Ok(Json(PageData {
        content: page.content,
        files: page.files,
    }))
}

async fn update_page(
    State(mut app): State<App>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePage>,
) -> crate::ApiResult<Json<UpdateResult>> {
    page::update(&mut app, &id, &request.content, &request.files).await?;
    Ok(Json(UpdateResult { success: true }))
}

async fn upload_file(
    State(mut app): State<App>,
    mut multipart: Multipart,
) -> crate::ApiResult<impl IntoResponse> {
    // just take the first multipart field
    let Some(field) = multipart.next_field().await? else {
        return Err(ApiError::MissingFile);
    };

    let file_name = field
        .file_name()
        .ok_or(ApiError::MissingFileName)?
        .to_owned();
    let data = field.bytes().await?;

    let entry: FileEntry = page::store_file(&mut app, &file_name, data).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, entry.url.clone())],
        Json(entry),
    ))
}

async fn get_file(
    State(mut app): State<App>,
    Path(key): Path<String>,
) -> crate::ApiResult<Response<body::Full<Bytes>>> {
    let data = page::fetch_blob(&mut app, &key).await?;
    let response = Response::builder().body(body::Full::new(data))?;
    Ok(response)
}

//! HTTP route handlers for the contacts API.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::Router;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, put};
use contacts::{ContactFields, ContactId, ContactResponseWrapper};
use tower_http::services::ServeDir;

use crate::error::ApiError;
use crate::state::{AppState, Service};

/// Build the contacts router. Stored photos under `photo_dir` are served
/// at `/contacts/image/<file>`.
pub fn contacts_router(photo_dir: &FsPath, max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/contacts", get(list_contacts).post(create_contact))
        .route(
            "/contacts/photo",
            put(upload_photo).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/contacts/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .nest_service("/contacts/image", ServeDir::new(photo_dir))
}

async fn health() -> &'static str {
    "ok"
}

/// POST /contacts - create a contact from the JSON fields.
async fn create_contact(
    State(state): State<AppState>,
    Json(fields): Json<ContactFields>,
) -> Result<(StatusCode, Json<ContactResponseWrapper>), ApiError> {
    let created = blocking(&state, move |service| service.create(fields)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /contacts - list every contact.
async fn list_contacts(
    State(state): State<AppState>,
) -> Result<Json<ContactResponseWrapper>, ApiError> {
    blocking(&state, |service| service.get_all()).await.map(Json)
}

/// GET /contacts/{id}
async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ContactResponseWrapper>, ApiError> {
    blocking(&state, move |service| service.get(ContactId(id)))
        .await
        .map(Json)
}

/// PUT /contacts/{id} - overwrite the editable fields.
async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(fields): Json<ContactFields>,
) -> Result<Json<ContactResponseWrapper>, ApiError> {
    blocking(&state, move |service| service.update(ContactId(id), fields))
        .await
        .map(Json)
}

/// DELETE /contacts/{id}
async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<&'static str, ApiError> {
    blocking(&state, move |service| service.delete(ContactId(id))).await
}

/// PUT /contacts/photo - multipart form with `id` and `file`; returns the photo URL.
async fn upload_photo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<String, ApiError> {
    let mut id = None;
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| multipart_rejection("invalid multipart body", err))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| multipart_rejection("read field `id`", err))?;
                let parsed = text.trim().parse::<i64>().map_err(|_| {
                    ApiError::BadRequest(format!("invalid contact id {text:?}"))
                })?;
                id = Some(ContactId(parsed));
            }
            Some("file") => {
                let file_name = field.file_name().map(str::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| multipart_rejection("read field `file`", err))?;
                upload = Some((file_name, bytes));
            }
            _ => {}
        }
    }

    let id = id.ok_or_else(|| ApiError::BadRequest("missing multipart field `id`".to_string()))?;
    let (file_name, bytes) = upload
        .ok_or_else(|| ApiError::BadRequest("missing multipart field `file`".to_string()))?;

    blocking(&state, move |service| {
        service.upload_photo(id, &bytes, file_name.as_deref())
    })
    .await
}

/// Keep the status axum assigns to a multipart failure; a body over the
/// upload limit is 413, malformed input is 400.
fn multipart_rejection(context: &str, err: MultipartError) -> ApiError {
    ApiError::Rejected(err.status(), format!("{context}: {}", err.body_text()))
}

/// Run a service call on the blocking pool; store and photo I/O are synchronous.
async fn blocking<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&Service) -> contacts::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(&state.service);
    tokio::task::spawn_blocking(move || op(&service))
        .await
        .map_err(|err| ApiError::Internal(format!("blocking task failed: {err}")))?
        .map_err(ApiError::from)
}

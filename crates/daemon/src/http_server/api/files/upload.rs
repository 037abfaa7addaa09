use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use uuid::Uuid;

use common::prelude::Node;

use super::error::{parse_id, FilesError};
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

/// Multipart field carrying the file body
pub const FILE_FIELD: &str = "file";

/// `POST /upload/{parent}` creates a file, `PUT /upload/{id}` replaces the
///  bytes of an existing one.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub target: UploadTarget,
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
pub enum UploadTarget {
    /// Parent folder, or the root id for the top level
    Create(Uuid),
    Replace(Uuid),
}

struct UploadedFile {
    name: String,
    data: Bytes,
}

async fn read_file_field(mut multipart: Multipart) -> Result<UploadedFile, FilesError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("multipart parsing error: {}", e);
        FilesError::BadRequest(e.body_text())
    })? {
        if field.name() != Some(FILE_FIELD) {
            tracing::debug!(field = ?field.name(), "ignoring multipart field");
            continue;
        }
        let name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| FilesError::BadRequest("file field needs a filename".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| FilesError::BadRequest(e.body_text()))?;
        return Ok(UploadedFile { name, data });
    }
    Err(FilesError::BadRequest(format!(
        "multipart field '{}' is required",
        FILE_FIELD
    )))
}

#[tracing::instrument(skip(state, multipart))]
pub async fn create_handler(
    State(state): State<ServiceState>,
    Path(parent): Path<String>,
    multipart: Multipart,
) -> Result<Response, FilesError> {
    let parent_id = parse_id(&parent)?;
    let file = read_file_field(multipart).await?;

    let node = state
        .files()
        .upload_bytes(Some(parent_id), &file.name, file.data)
        .await?;
    tracing::info!(id = %node.id, size = node.size, "uploaded file");
    Ok((http::StatusCode::CREATED, Json(node)).into_response())
}

#[tracing::instrument(skip(state, multipart))]
pub async fn replace_handler(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response, FilesError> {
    let id = parse_id(&id)?;
    let file = read_file_field(multipart).await?;

    let node = state.files().replace_upload(id, file.data).await?;
    Ok(Json(node).into_response())
}

impl ApiRequest for UploadRequest {
    type Response = Node;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let part = Part::bytes(self.data).file_name(self.name);
        let form = Form::new().part(FILE_FIELD, part);
        let request = match self.target {
            UploadTarget::Create(parent_id) => {
                client.post(base_url.join(&format!("/upload/{}", parent_id))?)
            }
            UploadTarget::Replace(id) => client.put(base_url.join(&format!("/upload/{}", id))?),
        };
        Ok(request.multipart(form))
    }
}

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{parse_id, FilesError};
use super::item::{items, FileItem};
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct ListChildrenRequest {
    /// Folder to list; the root id lists the top level
    pub id: Uuid,
}

#[tracing::instrument(skip(state))]
pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<Response, FilesError> {
    let id = parse_id(&id)?;
    let children = state.files().list_children(id).await?;
    Ok(Json(items(children)).into_response())
}

impl ApiRequest for ListChildrenRequest {
    type Response = Vec<FileItem>;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        Ok(client.get(base_url.join(&format!("/files/{}", self.id))?))
    }
}

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::FilesError;
use super::item::{items, FileItem};
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RootRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootResponse {
    pub root_id: Uuid,
    pub root_files: Vec<FileItem>,
}

/// Same listing as `GET /files`, with the root container id alongside
#[tracing::instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> Result<Response, FilesError> {
    let listing = state.files().list_root().await?;
    Ok(Json(RootResponse {
        root_id: listing.root_id,
        root_files: items(listing.nodes),
    })
    .into_response())
}

impl ApiRequest for RootRequest {
    type Response = RootResponse;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        Ok(client.get(base_url.join("/root")?))
    }
}

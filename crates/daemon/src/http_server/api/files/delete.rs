use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::FilesError;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub ids: Vec<String>,
}

impl DeleteRequest {
    pub fn new(ids: &[Uuid]) -> Self {
        Self {
            ids: ids.iter().map(Uuid::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    /// Requested nodes that were removed
    pub deleted_count: usize,
    /// Length of the request's id list
    pub total_requested: usize,
    /// Nodes removed because an ancestor was
    pub descendants_deleted: usize,
}

/// Batch delete with partial success: unknown ids are skipped
#[tracing::instrument(skip(state, body))]
pub async fn handler(
    State(state): State<ServiceState>,
    body: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Response, FilesError> {
    let Json(req) = body?;

    // Strings that are not uuids cannot name a node, they just miss
    let ids: Vec<Uuid> = req
        .ids
        .iter()
        .filter_map(|raw| Uuid::parse_str(raw).ok())
        .collect();
    let summary = state.files().delete(&ids).await?;

    Ok(Json(DeleteResponse {
        deleted_count: summary.deleted,
        total_requested: req.ids.len(),
        descendants_deleted: summary.descendants_deleted,
    })
    .into_response())
}

impl ApiRequest for DeleteRequest {
    type Response = DeleteResponse;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        Ok(client.delete(base_url.join("/files")?).json(&self))
    }
}

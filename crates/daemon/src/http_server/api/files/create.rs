use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::{Node, NodeKind};

use super::error::{parse_id, FilesError};
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

/// Body of `POST /files/{parent}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Inline text for files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateRequest {
    /// Parent folder, or the root id for the top level
    pub parent_id: Uuid,
    pub node: NewNode,
}

#[tracing::instrument(skip(state, body))]
pub async fn handler(
    State(state): State<ServiceState>,
    Path(parent): Path<String>,
    body: Result<Json<NewNode>, JsonRejection>,
) -> Result<Response, FilesError> {
    let parent_id = parse_id(&parent)?;
    let Json(node) = body?;

    let created = match node.kind {
        NodeKind::Folder if node.text.is_some() => {
            return Err(FilesError::BadRequest(
                "folders do not carry content".to_string(),
            ))
        }
        NodeKind::Folder => {
            state
                .files()
                .create(Some(parent_id), &node.name, NodeKind::Folder)
                .await?
        }
        NodeKind::File => {
            state
                .files()
                .create_file(Some(parent_id), &node.name, node.text)
                .await?
        }
    };

    tracing::info!(id = %created.id, kind = %created.kind, "created node");
    Ok((http::StatusCode::CREATED, Json(created)).into_response())
}

impl ApiRequest for CreateRequest {
    type Response = Node;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join(&format!("/files/{}", self.parent_id))?;
        Ok(client.post(full_url).json(&self.node))
    }
}

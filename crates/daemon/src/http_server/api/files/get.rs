use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::Node;

use super::error::{parse_id, FilesError};
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct GetRequest {
    /// Node to fetch
    pub id: Uuid,
}

#[tracing::instrument(skip(state))]
pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<Response, FilesError> {
    let node = state.files().get_node(parse_id(&id)?).await?;
    Ok(Json(node).into_response())
}

impl ApiRequest for GetRequest {
    type Response = Node;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        Ok(client.get(base_url.join(&format!("/nodes/{}", self.id))?))
    }
}

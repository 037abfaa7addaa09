use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::SubtreeStats;

use super::error::{parse_id, FilesError};
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct InfoRequest {
    /// Folder, file or root id to aggregate
    pub id: Uuid,
}

/// Descendant count and total file size below a node
#[tracing::instrument(skip(state))]
pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<Response, FilesError> {
    let stats = state.files().get_info(parse_id(&id)?).await?;
    Ok(Json(stats).into_response())
}

impl ApiRequest for InfoRequest {
    type Response = SubtreeStats;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        Ok(client.get(base_url.join(&format!("/info/{}", self.id))?))
    }
}

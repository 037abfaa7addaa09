use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use super::error::FilesError;
use super::item::{items, FileItem};
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

/// Everything directly under the root container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRootRequest;

#[tracing::instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> Result<Response, FilesError> {
    let listing = state.files().list_root().await?;
    Ok(Json(items(listing.nodes)).into_response())
}

impl ApiRequest for ListRootRequest {
    type Response = Vec<FileItem>;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        Ok(client.get(base_url.join("/files")?))
    }
}

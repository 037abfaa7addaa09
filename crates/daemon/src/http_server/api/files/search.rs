use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use super::error::FilesError;
use super::item::{items, FileItem};
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct SearchRequest {
    /// Case-sensitive substring of the name
    pub q: String,
}

#[tracing::instrument(skip(state, query))]
pub async fn handler(
    State(state): State<ServiceState>,
    query: Result<Query<SearchRequest>, QueryRejection>,
) -> Result<Response, FilesError> {
    let Query(SearchRequest { q }) = query?;

    if q.chars().count() < state.search_min_len() {
        return Ok(Json(Vec::<FileItem>::new()).into_response());
    }

    let hits = state.files().search(&q).await?;
    tracing::debug!(query = %q, hits = hits.len(), "search");
    Ok(Json(items(hits)).into_response())
}

impl ApiRequest for SearchRequest {
    type Response = Vec<FileItem>;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        Ok(client.get(base_url.join("/search")?).query(&self))
    }
}

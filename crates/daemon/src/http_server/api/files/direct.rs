use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use http::header;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::DirectContent;

use super::error::{parse_id, FilesError};
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

/// Marker body for files that have no content yet
pub const EMPTY_CONTENT: &str = "empty";

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct DirectRequest {
    /// File whose content to fetch
    pub id: String,
}

/// Raw file content. Text is served as utf-8, stored bytes get a type
///  guessed from the file name.
#[tracing::instrument(skip(state, query))]
pub async fn handler(
    State(state): State<ServiceState>,
    query: Result<Query<DirectRequest>, QueryRejection>,
) -> Result<Response, FilesError> {
    let Query(DirectRequest { id }) = query?;
    let id = parse_id(&id)?;

    let response = match state.files().read_content(id).await? {
        DirectContent::Text(text) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            text,
        )
            .into_response(),
        DirectContent::Bytes { name, data } => {
            let mime = mime_guess::from_path(&name).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], data).into_response()
        }
        DirectContent::Empty => Json(EMPTY_CONTENT).into_response(),
    };
    Ok(response)
}

impl ApiRequest for DirectRequest {
    type Response = Bytes;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        Ok(client.get(base_url.join("/direct")?).query(&self))
    }
}

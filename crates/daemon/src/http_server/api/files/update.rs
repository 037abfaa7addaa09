use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::Node;

use super::error::{parse_id, FilesError};
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

/// Body of `PUT /files/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum UpdateOperation {
    Rename { name: String },
    /// Replace the inline text of a file
    Text { text: String },
}

#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub id: Uuid,
    pub operation: UpdateOperation,
}

#[tracing::instrument(skip(state, body))]
pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateOperation>, JsonRejection>,
) -> Result<Response, FilesError> {
    let id = parse_id(&id)?;
    let Json(operation) = body?;

    let node = match operation {
        UpdateOperation::Rename { name } => state.files().rename(id, &name).await?,
        UpdateOperation::Text { text } => state.files().replace_text(id, text).await?,
    };
    Ok(Json(node).into_response())
}

impl ApiRequest for UpdateRequest {
    type Response = Node;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join(&format!("/files/{}", self.id))?;
        Ok(client.put(full_url).json(&self.operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_wire_format() {
        let op: UpdateOperation =
            serde_json::from_str(r#"{"operation":"rename","name":"b.txt"}"#).unwrap();
        assert_eq!(
            op,
            UpdateOperation::Rename {
                name: "b.txt".into()
            }
        );

        let op: UpdateOperation =
            serde_json::from_str(r#"{"operation":"text","text":""}"#).unwrap();
        assert_eq!(op, UpdateOperation::Text { text: "".into() });

        assert!(serde_json::from_str::<UpdateOperation>(r#"{"operation":"move"}"#).is_err());
    }
}

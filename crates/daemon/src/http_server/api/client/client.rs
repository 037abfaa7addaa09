use bytes::Bytes;
use reqwest::{header::HeaderMap, header::HeaderValue, Client};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::ApiError;
use super::ApiRequest;

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    /// Send a request and decode its json response
    pub async fn call<T>(&mut self, request: T) -> Result<T::Response, ApiError>
    where
        T: ApiRequest,
        T::Response: DeserializeOwned,
    {
        let response = self.send(request).await?;
        Ok(response.json::<T::Response>().await?)
    }

    /// Send a request and hand back the raw body along with its content type
    pub async fn call_raw<T: ApiRequest>(
        &mut self,
        request: T,
    ) -> Result<(Option<String>, Bytes), ApiError> {
        let response = self.send(request).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok((content_type, response.bytes().await?))
    }

    async fn send<T: ApiRequest>(&self, request: T) -> Result<reqwest::Response, ApiError> {
        let request_builder = request.build_request(&self.remote, &self.client)?;
        let response = request_builder.send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_status(status, response.text().await?))
        }
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}

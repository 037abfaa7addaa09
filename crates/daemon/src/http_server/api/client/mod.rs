//! Typed HTTP client used by the CLI to talk to a running daemon.
//!
//! Every route module implements [`ApiRequest`] for its request type, so the
//! server handler and the client call live side by side.

use reqwest::{Client, RequestBuilder};
use url::Url;

#[allow(clippy::module_inception)]
mod client;
mod error;

pub use client::ApiClient;
pub use error::ApiError;

pub trait ApiRequest {
    type Response;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError>;
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method};
use tracing::debug;

use crate::error::Result;

pub const ACCEPT_JSON: &str = "application/json";

/// A fully built, authenticated request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub bearer_token: String,
    pub accept: &'static str,
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one request and returns the whole response.
///
/// Implementations must not retry, and must release the connection before
/// returning on every path.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("scanjob/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = self
            .client
            .request(request.method, &request.url)
            .bearer_auth(&request.bearer_token)
            .header(ACCEPT, request.accept)
            .send()
            .await?;

        let status = response.status().as_u16();
        // Reading the body to the end hands the connection back to the pool
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "Response received");

        Ok(ApiResponse { status, body })
    }
}

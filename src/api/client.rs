use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use super::transport::{ACCEPT_JSON, ApiRequest, HttpTransport, Transport};
use crate::config::ServiceConfig;
use crate::core::LoginToken;
use crate::error::{Result, ScanError};

/// Authenticated access to the per-process actions of the scan service.
pub struct ApiClient {
    config: ServiceConfig,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Client backed by a pooled reqwest transport.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let transport = HttpTransport::new(Duration::from_secs(config.request_timeout_secs))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ServiceConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Run `action` against process `id` and return the raw body of a 200 answer.
    ///
    /// The token is checked first; an expired token never reaches the transport.
    pub async fn execute(
        &self,
        token: &LoginToken,
        method: Method,
        id: &Uuid,
        action: &str,
    ) -> Result<String> {
        token.validate()?;

        let request = ApiRequest {
            method,
            url: self.config.endpoint(id, action),
            bearer_token: token.access_token.clone(),
            accept: ACCEPT_JSON,
        };
        debug!(method = %request.method, url = %request.url, "Sending request");

        let response = self.transport.send(request).await?;
        if response.status != 200 {
            warn!(process_id = %id, action, status = response.status, "Remote command failed");
            return Err(ScanError::RemoteCommandFailed {
                status: response.status,
                body: response.body,
            });
        }

        Ok(response.body)
    }

    /// Like `execute`, decoding the body as JSON.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        token: &LoginToken,
        id: &Uuid,
        action: &str,
    ) -> Result<T> {
        let body = self.execute(token, Method::GET, id, action).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

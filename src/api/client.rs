use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::Token;
use crate::domain::SynchronousJobInfo;
use crate::error::{Result, SyncLensError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";

/// HTTP client for the platform's JSON API.
///
/// Every endpoint is a `POST` with a JSON body; requests are sent once.
pub struct ApiClient {
    client: Client,
    api_url: Url,
    token: Option<Token>,
}

/// Error body shape returned by the API.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ErrorBody {
    message: Option<String>,
    job_info: Option<SynchronousJobInfo>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<Token>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("synclens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        // Url::join drops the last path segment unless it ends with '/'
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let api_url = Url::parse(&base)
            .map_err(|e| SyncLensError::Config(format!("Invalid base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    #[cfg(test)]
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            request.bearer_auth(token.as_str())
        } else {
            request
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .map_err(|e| SyncLensError::Config(format!("Invalid endpoint {path}: {e}")))
    }

    async fn send(&self, path: &str, body: &impl Serialize) -> Result<Response> {
        let url = self.endpoint(path)?;
        debug!("POST {url}");

        let response = self
            .auth_request(self.client.post(url).json(body))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        Err(api_error(status, &text))
    }

    /// Posts `body` to `path` and decodes the JSON response.
    pub async fn post<T>(&self, path: &str, body: &impl Serialize) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(path, body).await?;
        let status = response.status().as_u16();

        response.json().await.map_err(|e| {
            if e.is_decode() {
                SyncLensError::InvalidResponse {
                    status,
                    message: e.to_string(),
                }
            } else {
                SyncLensError::Network(e)
            }
        })
    }

    /// Posts `body` to `path`, ignoring any response body.
    pub async fn post_empty(&self, path: &str, body: &impl Serialize) -> Result<()> {
        self.send(path, body).await?;
        Ok(())
    }
}

fn api_error(status: StatusCode, text: &str) -> SyncLensError {
    let body: ErrorBody = serde_json::from_str(text).unwrap_or_default();

    let message = body.message.unwrap_or_else(|| {
        if text.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        } else {
            text.to_string()
        }
    });

    SyncLensError::Api {
        status: status.as_u16(),
        message,
        job_info: body.job_info.map(Box::new),
    }
}

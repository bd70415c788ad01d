pub mod error;

use async_trait::async_trait;
use error::{ApiError, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// How the body of a response should be interpreted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResponseFormat {
    Json,
    Xml,
}

/// A successfully settled response body.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Json(Value),
    /// Well-formed XML document text.
    Xml(String),
}

/// One GET that settles exactly once.
#[async_trait]
pub trait Fetch: Sync {
    async fn fetch(&self, url: &str, format: ResponseFormat) -> Result<Payload>;
}

#[derive(Clone, Debug)]
pub enum AuthMethod {
    Basic { username: String, token: String },
    Bearer { token: String },
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    auth: Option<AuthMethod>,
}

impl ApiClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref())?;

        let client = Client::builder()
            .user_agent(format!("jira-activity/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            base_url: url,
            auth: None,
        })
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.auth = Some(AuthMethod::Basic {
            username: username.into(),
            token: token.into(),
        });
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(AuthMethod::Bearer {
            token: token.into(),
        });
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `url` against the base URL. Absolute URLs pass through.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        Ok(self.base_url.join(url.strip_prefix('/').unwrap_or(url))?)
    }

    pub async fn get(&self, url: &str, format: ResponseFormat) -> Result<Payload> {
        let joined = self.resolve(url)?;

        debug!(url = %joined, ?format, "Sending request");

        let req = self.apply_auth(self.client.get(joined.clone()));
        let response = req.send().await.map_err(ApiError::Network)?;
        let status = response.status();

        // 401 wins over anything the body says.
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::not_logged_in());
        }

        let body = response.text().await.map_err(ApiError::Network)?;
        debug!(status = status.as_u16(), bytes = body.len(), "Received response");

        match format {
            ResponseFormat::Json => parse_json(status, &body).map(Payload::Json),
            ResponseFormat::Xml => parse_xml(status, body).map(Payload::Xml),
        }
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Some(AuthMethod::Basic { username, token }) => {
                request.basic_auth(username, Some(token))
            }
            Some(AuthMethod::Bearer { token }) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl Fetch for ApiClient {
    async fn fetch(&self, url: &str, format: ResponseFormat) -> Result<Payload> {
        self.get(url, format).await
    }
}

fn parse_json(status: StatusCode, body: &str) -> Result<Value> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) if status.is_success() => {
            error!("Failed to parse JSON response: {}", e);
            return Err(ApiError::InvalidResponse(e.to_string()));
        }
        Err(_) => return Err(status_error(status, body)),
    };

    if let Some(message) = first_error_message(&value) {
        return Err(ApiError::Api(message));
    }

    if status.is_success() {
        Ok(value)
    } else {
        Err(status_error(status, body))
    }
}

fn parse_xml(status: StatusCode, body: String) -> Result<String> {
    if !status.is_success() {
        return Err(status_error(status, &body));
    }

    // Well-formedness only; the feed renderer parses the body again.
    if let Err(e) = roxmltree::Document::parse(&body) {
        error!("Failed to parse XML response: {}", e);
        return Err(ApiError::InvalidResponse(e.to_string()));
    }

    Ok(body)
}

fn first_error_message(value: &Value) -> Option<String> {
    value
        .get("errorMessages")
        .and_then(Value::as_array)?
        .first()
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = if body.trim().is_empty() {
        format!("Unexpected status: {}", status)
    } else {
        body.to_string()
    };
    ApiError::ServerError {
        status: status.as_u16(),
        message,
    }
}

//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use url::Url;

use crate::appliance::{Appliance, skipped};
use crate::error::{Error, ErrorResponse, Result};
use crate::types::{ApplianceFacts, Requirements, ReturnObject};

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// REST client for a single appliance's management interface.
///
/// # Example
///
/// ```no_run
/// use isam_client::{ApplianceClient, ApplianceFacts, dsc};
///
/// # async fn example() -> isam_client::Result<()> {
/// let appliance = ApplianceClient::builder()
///     .hostname("https://isam.example.com")
///     .credentials("admin@local", "secret")
///     .facts(ApplianceFacts::new("Docker"))
///     .build()?;
///
/// let policy = dsc::get(&appliance).await?;
/// println!("{}", policy.data);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApplianceClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<(String, String)>,
    timeout: Duration,
    facts: ApplianceFacts,
}

impl ApplianceClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(Error::from)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let request = self
            .inner
            .http
            .request(method, url)
            .timeout(self.inner.timeout);
        match &self.inner.credentials {
            Some((user, password)) => request.basic_auth(user, Some(password)),
            None => request,
        }
    }

    /// Read a response body as JSON. An empty body reads as an empty object.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value> {
        if !response.status().is_success() {
            return Err(self.extract_error(response).await);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();

        let message = match response.json::<ErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => format!("HTTP {}", status),
        };

        match status {
            401 => Error::Auth(message),
            404 => Error::NotFound(message),
            _ => Error::Api { status, message },
        }
    }
}

#[async_trait]
impl Appliance for ApplianceClient {
    fn facts(&self) -> &ApplianceFacts {
        &self.inner.facts
    }

    async fn invoke_get(
        &self,
        description: &str,
        path: &str,
        requires: &Requirements,
    ) -> Result<ReturnObject> {
        if let Some(warning) = requires.unmet(&self.inner.facts) {
            tracing::warn!(path, %warning, "Skipping GET");
            return Ok(skipped(warning, Vec::new()));
        }

        tracing::debug!(path, description, "GET");
        let response = self
            .request(reqwest::Method::GET, self.url(path)?)
            .send()
            .await?;
        let data = self.handle_response(response).await?;

        Ok(ReturnObject::new(false, Vec::new()).with_data(data))
    }

    async fn invoke_put(
        &self,
        description: &str,
        path: &str,
        body: &Value,
        requires: &Requirements,
        warnings: Vec<String>,
    ) -> Result<ReturnObject> {
        if let Some(warning) = requires.unmet(&self.inner.facts) {
            tracing::warn!(path, %warning, "Skipping PUT");
            return Ok(skipped(warning, warnings));
        }

        tracing::debug!(path, description, %body, "PUT");
        let response = self
            .request(reqwest::Method::PUT, self.url(path)?)
            .json(body)
            .send()
            .await?;
        let data = self.handle_response(response).await?;

        Ok(ReturnObject::new(true, warnings).with_data(data))
    }
}

/// Builder for creating an ApplianceClient.
#[derive(Debug)]
pub struct ClientBuilder {
    hostname: Option<String>,
    port: Option<u16>,
    credentials: Option<(String, String)>,
    facts: Option<ApplianceFacts>,
    timeout: Duration,
    accept_invalid_certs: bool,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            hostname: None,
            port: None,
            credentials: None,
            facts: None,
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
            user_agent: None,
        }
    }

    /// Set the appliance hostname. A bare host gets an `https://` scheme.
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Set the management port, overriding any port in the hostname.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set basic-auth credentials.
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((user.into(), password.into()));
        self
    }

    /// Set the appliance facts.
    pub fn facts(mut self, facts: ApplianceFacts) -> Self {
        self.facts = Some(facts);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept self-signed certificates.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ApplianceClient> {
        let hostname = self
            .hostname
            .ok_or_else(|| Error::Config("hostname is required".to_string()))?;
        let facts = self
            .facts
            .ok_or_else(|| Error::Config("appliance facts are required".to_string()))?;

        let hostname = if hostname.contains("://") {
            hostname
        } else {
            format!("https://{}", hostname)
        };

        let mut base_url = Url::parse(&hostname)?;
        if let Some(port) = self.port {
            base_url
                .set_port(Some(port))
                .map_err(|_| Error::Config(format!("cannot set port on {}", hostname)))?;
        }
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("isam-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()?;

        Ok(ApplianceClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                credentials: self.credentials,
                timeout: self.timeout,
                facts,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

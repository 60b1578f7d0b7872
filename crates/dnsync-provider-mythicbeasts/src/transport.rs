// # Transport
//
// Every call to the Mythic Beasts primary DNS API is a single form POST to
// one endpoint, authenticated with the zone's password:
//
// ```http
// POST https://dnsapi.mythic-beasts.com/
// domain=unit.tests&password=...&showall=0&command=LIST
//
// POST https://dnsapi.mythic-beasts.com/
// domain=unit.tests&origin=.&password=...&command=ADD www.unit.tests 300 A 1.2.3.4
// ```
//
// `origin=.` makes the API read command host names as absolute, which is
// why commands carry full names.
//
// The transport does not interpret status codes; the provider does.

use async_trait::async_trait;
use dnsync_core::{Error, Result};
use std::fmt;
use std::time::Duration;

/// Mythic Beasts primary DNS API endpoint
pub const API_BASE: &str = "https://dnsapi.mythic-beasts.com/";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// What a request asks the API to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCommand<'a> {
    /// List every record in the zone
    List,
    /// Run one ADD/DELETE command line
    Action(&'a str),
}

/// One API request
#[derive(Clone, Copy)]
pub struct ApiRequest<'a> {
    /// Zone name without trailing dot
    pub domain: &'a str,
    /// ⚠️ NEVER log this value
    pub password: &'a str,
    pub command: ApiCommand<'a>,
}

impl<'a> ApiRequest<'a> {
    pub fn list(domain: &'a str, password: &'a str) -> Self {
        Self {
            domain,
            password,
            command: ApiCommand::List,
        }
    }

    pub fn action(domain: &'a str, password: &'a str, command: &'a str) -> Self {
        Self {
            domain,
            password,
            command: ApiCommand::Action(command),
        }
    }

    /// Form fields in the order the API documents them
    pub fn form(&self) -> Vec<(&'static str, &'a str)> {
        match self.command {
            ApiCommand::List => vec![
                ("domain", self.domain),
                ("password", self.password),
                ("showall", "0"),
                ("command", "LIST"),
            ],
            ApiCommand::Action(command) => vec![
                ("domain", self.domain),
                ("origin", "."),
                ("password", self.password),
                ("command", command),
            ],
        }
    }
}

// Custom Debug implementation that hides the password
impl fmt::Debug for ApiRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("domain", &self.domain)
            .field("password", &"<REDACTED>")
            .field("command", &self.command)
            .finish()
    }
}

/// Status and body of an API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends API requests
///
/// Implementations make exactly one HTTP call per `send` and never retry.
#[async_trait]
pub trait ZoneTransport: Send + Sync {
    async fn send(&self, request: &ApiRequest<'_>) -> Result<ApiResponse>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Transport for the public API endpoint
    pub fn new() -> Result<Self> {
        Self::with_base_url(API_BASE)
    }

    /// Transport for another endpoint (staging, local proxies)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl ZoneTransport for HttpTransport {
    async fn send(&self, request: &ApiRequest<'_>) -> Result<ApiResponse> {
        let response = self
            .client
            .post(&self.base_url)
            .form(&request.form())
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        Ok(ApiResponse { status, body })
    }
}

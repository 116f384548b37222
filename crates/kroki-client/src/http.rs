//! HTTP transport for the Kroki service.
//!
//! The pipeline never talks to `ureq` directly; it goes through the
//! [`HttpClient`] trait so the dedup cache and artifact store can be exercised
//! with in-memory fakes. [`UreqClient`] is the production implementation,
//! built on a pooled [`ureq::Agent`].

use std::time::Duration;

use ureq::Agent;

/// Default HTTP timeout for Kroki requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch failure for a single diagram resolution.
///
/// `Clone` so a single failure can be handed to every caller waiting on the
/// same dedup key.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FetchError {
    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The request never completed (DNS, connect, timeout, read error).
    #[error("transport error: {0}")]
    Transport(String),
}

/// Blocking HTTP client used to fetch rendered diagram artifacts.
///
/// Implementations must be thread-safe; one client is shared across all
/// resolutions of a conversion run.
pub trait HttpClient: Send + Sync {
    /// Perform a GET and return the response body on a 2xx status.
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    /// POST a raw diagram source and return the rendered body on a 2xx
    /// status. Used when the encoded GET URL exceeds the configured length.
    fn post(&self, url: &str, body: &[u8]) -> Result<Vec<u8>, FetchError>;
}

/// Create an HTTP agent with the specified timeout.
///
/// Status errors are disabled so non-2xx responses can be read for their
/// error body instead of surfacing as transport failures.
#[must_use]
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// [`HttpClient`] backed by a pooled [`ureq::Agent`].
#[derive(Clone)]
pub struct UreqClient {
    agent: Agent,
}

impl UreqClient {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: create_agent(timeout),
        }
    }

    /// Wrap an existing agent (shared connection pool).
    #[must_use]
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        read_body(response)
    }

    fn post(&self, url: &str, body: &[u8]) -> Result<Vec<u8>, FetchError> {
        let response = self
            .agent
            .post(url)
            .header("Content-Type", "text/plain")
            .send(body)
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        read_body(response)
    }
}

/// Read a response body, mapping non-2xx statuses to [`FetchError::Status`]
/// with the error body for diagnostics.
fn read_body(response: ureq::http::Response<ureq::Body>) -> Result<Vec<u8>, FetchError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| String::from("(unable to read error body)"));
        return Err(FetchError::Status {
            status,
            body: error_body,
        });
    }

    body.read_to_vec()
        .map_err(|e| FetchError::Transport(e.to_string()))
}

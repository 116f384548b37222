//! Kroki request building and fetch method policy.

use std::sync::Arc;

use crate::http::{FetchError, HttpClient, UreqClient};
use crate::language::KrokiDiagram;

/// Maximum GET URL length before `Adaptive` switches to POST.
///
/// Matches the common proxy/server line limit the Kroki ecosystem assumes.
pub const DEFAULT_MAX_URI_LENGTH: usize = 4000;

/// HTTP method policy for diagram fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    /// Always GET with the encoded payload in the URL.
    Get,
    /// Always POST the raw diagram source.
    Post,
    /// GET unless the URL exceeds the length limit, then POST.
    #[default]
    Adaptive,
}

impl HttpMethod {
    /// Parse a method from an attribute value (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "adaptive" => Some(Self::Adaptive),
            _ => None,
        }
    }
}

/// Client for one Kroki server.
///
/// Owns the server URL, the method policy, and the injected [`HttpClient`].
/// URL building is pure; only [`fetch`](Self::fetch) touches the network.
pub struct KrokiClient {
    server_url: String,
    method: HttpMethod,
    max_uri_length: usize,
    http: Arc<dyn HttpClient>,
}

impl KrokiClient {
    /// Create a client with the default transport and method policy.
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_http(server_url, Arc::new(UreqClient::default()))
    }

    /// Create a client with an injected transport (used by tests and hosts
    /// that share a connection pool).
    #[must_use]
    pub fn with_http(server_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let server_url = server_url.into();
        Self {
            server_url: server_url.trim_end_matches('/').to_owned(),
            method: HttpMethod::default(),
            max_uri_length: DEFAULT_MAX_URI_LENGTH,
            http,
        }
    }

    /// Set the HTTP method policy.
    #[must_use]
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the URL length limit used by [`HttpMethod::Adaptive`].
    #[must_use]
    pub fn max_uri_length(mut self, limit: usize) -> Self {
        self.max_uri_length = limit;
        self
    }

    /// The GET URL identifying this diagram artifact:
    /// `{server}/{language}/{format}/{payload}`.
    ///
    /// Pure function of the server URL and the diagram's language, format,
    /// and source; unrelated options never change it. It remains the
    /// artifact's identity even when the fetch itself goes over POST.
    #[must_use]
    pub fn image_url(&self, diagram: &KrokiDiagram) -> String {
        format!(
            "{}/{}/{}/{}",
            self.server_url,
            diagram.language.endpoint(),
            diagram.format.as_str(),
            diagram.payload(),
        )
    }

    /// Fetch the rendered artifact bytes, one attempt, no retry.
    pub fn fetch(&self, diagram: &KrokiDiagram) -> Result<Vec<u8>, FetchError> {
        let url = self.image_url(diagram);
        let use_post = match self.method {
            HttpMethod::Get => false,
            HttpMethod::Post => true,
            HttpMethod::Adaptive => url.len() > self.max_uri_length,
        };

        if use_post {
            let endpoint = format!(
                "{}/{}/{}",
                self.server_url,
                diagram.language.endpoint(),
                diagram.format.as_str(),
            );
            tracing::debug!(url = %endpoint, "fetching diagram via POST");
            self.http.post(&endpoint, diagram.source().as_bytes())
        } else {
            tracing::debug!(%url, "fetching diagram via GET");
            self.http.get(&url)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::language::{DiagramFormat, DiagramLanguage};

    /// Records every request instead of hitting the network.
    struct RecordingClient {
        requests: Mutex<Vec<String>>,
    }

    impl RecordingClient {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl HttpClient for RecordingClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.requests.lock().unwrap().push(format!("GET {url}"));
            Ok(b"<svg/>".to_vec())
        }

        fn post(&self, url: &str, _body: &[u8]) -> Result<Vec<u8>, FetchError> {
            self.requests.lock().unwrap().push(format!("POST {url}"));
            Ok(b"<svg/>".to_vec())
        }
    }

    fn alice() -> KrokiDiagram {
        KrokiDiagram::new(
            DiagramLanguage::PlantUml,
            DiagramFormat::Svg,
            "alice -> bob",
        )
        .unwrap()
    }

    #[test]
    fn test_image_url_reference_value() {
        let client = KrokiClient::new("https://kroki.io");
        assert_eq!(
            client.image_url(&alice()),
            "https://kroki.io/plantuml/svg/eNpLzMlMTlXQtVNIyk8CABoDA90=",
        );
    }

    #[test]
    fn test_image_url_trims_trailing_slash() {
        let with_slash = KrokiClient::new("https://kroki.io/");
        let without = KrokiClient::new("https://kroki.io");
        assert_eq!(with_slash.image_url(&alice()), without.image_url(&alice()));
    }

    #[test]
    fn test_image_url_is_pure() {
        // Method policy and URI limits are unrelated to the URL.
        let a = KrokiClient::new("https://kroki.io").method(HttpMethod::Post);
        let b = KrokiClient::new("https://kroki.io").max_uri_length(16);
        assert_eq!(a.image_url(&alice()), b.image_url(&alice()));
    }

    #[test]
    fn test_adaptive_uses_get_for_short_urls() {
        let http = Arc::new(RecordingClient::new());
        let client = KrokiClient::with_http("https://kroki.io", Arc::clone(&http) as _);
        client.fetch(&alice()).unwrap();

        let requests = http.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("GET https://kroki.io/plantuml/svg/"));
    }

    #[test]
    fn test_adaptive_switches_to_post_past_limit() {
        let http = Arc::new(RecordingClient::new());
        let client =
            KrokiClient::with_http("https://kroki.io", Arc::clone(&http) as _).max_uri_length(16);
        client.fetch(&alice()).unwrap();

        let requests = http.requests.lock().unwrap();
        assert_eq!(
            requests.as_slice(),
            ["POST https://kroki.io/plantuml/svg".to_owned()]
        );
    }

    #[test]
    fn test_forced_post() {
        let http = Arc::new(RecordingClient::new());
        let client =
            KrokiClient::with_http("https://kroki.io", Arc::clone(&http) as _).method(HttpMethod::Post);
        client.fetch(&alice()).unwrap();

        let requests = http.requests.lock().unwrap();
        assert_eq!(
            requests.as_slice(),
            ["POST https://kroki.io/plantuml/svg".to_owned()]
        );
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("POST"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::parse("adaptive"), Some(HttpMethod::Adaptive));
        assert_eq!(HttpMethod::parse("put"), None);
    }
}

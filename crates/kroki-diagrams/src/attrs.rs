//! Host attribute surface.
//!
//! The document processor exposes configuration as flat string attributes.
//! [`DocumentSettings`] reads the document-wide ones; [`EmbedOptions`] merges
//! them with the per-occurrence values (explicit target name and `opts=`
//! flags) into the inputs the resolver consumes.

use std::path::PathBuf;

use kroki_client::{DEFAULT_MAX_URI_LENGTH, HttpMethod};

/// Default Kroki server.
pub const DEFAULT_SERVER_URL: &str = "https://kroki.io";

/// Document-wide diagram settings read from host attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSettings {
    /// Kroki server URL (`kroki-server-url`).
    pub server_url: String,
    /// Fetch artifacts and embed local files (`kroki-fetch-diagram`).
    pub fetch_diagram: bool,
    /// HTTP method policy (`kroki-http-method`).
    pub http_method: HttpMethod,
    /// GET URL length limit for the adaptive policy (`kroki-max-uri-length`).
    pub max_uri_length: usize,
    /// Base directory for fetched artifacts (`imagesdir`).
    pub images_dir: PathBuf,
    /// Embed artifacts as data URIs. Requires both `data-uri` and
    /// `allow-uri-read` on the host document.
    pub data_uri: bool,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            fetch_diagram: false,
            http_method: HttpMethod::default(),
            max_uri_length: DEFAULT_MAX_URI_LENGTH,
            images_dir: PathBuf::from("."),
            data_uri: false,
        }
    }
}

impl DocumentSettings {
    /// Build settings from a host attribute lookup.
    ///
    /// Boolean attributes follow the host convention: present (any value)
    /// means set. Malformed numeric or method values fall back to defaults.
    pub fn from_attributes<'a>(get: impl Fn(&str) -> Option<&'a str>) -> Self {
        let defaults = Self::default();
        Self {
            server_url: get("kroki-server-url")
                .map_or(defaults.server_url, |s| s.trim_end_matches('/').to_owned()),
            fetch_diagram: get("kroki-fetch-diagram").is_some(),
            http_method: get("kroki-http-method")
                .and_then(HttpMethod::parse)
                .unwrap_or(defaults.http_method),
            max_uri_length: get("kroki-max-uri-length")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_uri_length),
            images_dir: get("imagesdir").map_or(defaults.images_dir, PathBuf::from),
            data_uri: get("data-uri").is_some() && get("allow-uri-read").is_some(),
        }
    }
}

/// Per-occurrence embedding options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedOptions {
    /// Fetch and persist to the images directory instead of linking remotely.
    pub fetch_diagram: bool,
    /// Embed the artifact markup verbatim (`opts=inline`).
    pub inline: bool,
    /// Wrap the artifact in an interactivity-preserving container
    /// (`opts=interactive`).
    pub interactive: bool,
    /// Explicit artifact name (third positional attribute); empty means
    /// content-derived naming.
    pub target_name: Option<String>,
    /// Directory fetched artifacts are written under.
    pub images_dir: PathBuf,
    /// Embed as a data URI when no stronger option applies.
    pub data_uri: bool,
}

impl EmbedOptions {
    /// Merge document settings with one occurrence's attributes.
    ///
    /// `target_name` is the positional name (empty collapses to `None`);
    /// `opts` is the comma-separated `opts=` value.
    #[must_use]
    pub fn for_occurrence(
        settings: &DocumentSettings,
        target_name: Option<&str>,
        opts: Option<&str>,
    ) -> Self {
        let flags: Vec<&str> = opts
            .map(|o| o.split(',').map(str::trim).collect())
            .unwrap_or_default();

        Self {
            fetch_diagram: settings.fetch_diagram,
            inline: flags.contains(&"inline"),
            interactive: flags.contains(&"interactive"),
            target_name: target_name
                .filter(|n| !n.is_empty())
                .map(ToOwned::to_owned),
            images_dir: settings.images_dir.clone(),
            data_uri: settings.data_uri,
        }
    }
}

//! Kroki client primitives: request encoding, HTTP transport, and fetch
//! deduplication.
//!
//! The Kroki service renders a diagram from its source text, which travels in
//! the URL path as a deflate-compressed, base64url-encoded payload:
//!
//! ```text
//! GET {server}/{language}/{format}/{payload}
//! ```
//!
//! # Architecture
//!
//! - [`encode`]: deterministic source-to-payload codec
//! - [`language`]: diagram language and output format enums, [`KrokiDiagram`]
//! - [`client`]: [`KrokiClient`] URL building and GET/POST method policy
//! - [`http`]: [`HttpClient`] trait with a `ureq`-backed implementation
//! - [`dedup`]: [`FetchDedupCache`] guaranteeing one network round trip per key
//!
//! # Example
//!
//! ```
//! use kroki_client::{DiagramFormat, DiagramLanguage, KrokiClient, KrokiDiagram};
//!
//! let diagram = KrokiDiagram::new(
//!     DiagramLanguage::PlantUml,
//!     DiagramFormat::Svg,
//!     "alice -> bob",
//! ).unwrap();
//!
//! let client = KrokiClient::new("https://kroki.io");
//! assert_eq!(
//!     client.image_url(&diagram),
//!     "https://kroki.io/plantuml/svg/eNpLzMlMTlXQtVNIyk8CABoDA90=",
//! );
//! ```

mod client;
mod dedup;
mod encode;
mod http;
mod language;

pub use client::{HttpMethod, KrokiClient, DEFAULT_MAX_URI_LENGTH};
pub use dedup::{CacheKey, FetchDedupCache};
pub use encode::{encode_diagram_source, EncodeError};
pub use http::{create_agent, FetchError, HttpClient, UreqClient, DEFAULT_TIMEOUT};
pub use language::{DiagramFormat, DiagramLanguage, KrokiDiagram};

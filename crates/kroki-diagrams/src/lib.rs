//! Diagram resolution and caching via the Kroki service.
//!
//! Given a diagram occurrence (language, source text, output format) and the
//! host document's options, this crate decides how the rendered artifact is
//! referenced in the output: a remote URL, inline markup, a data URI, literal
//! text, or a locally cached file. When local caching is requested, the
//! artifact is fetched at most once per unique diagram and persisted to a
//! predictable path under the images directory.
//!
//! # Architecture
//!
//! - [`attrs`]: host attribute surface (`kroki-server-url`,
//!   `kroki-fetch-diagram`, `imagesdir`, `data-uri`, per-occurrence `opts`)
//! - [`store`]: [`ArtifactStore`] — on-disk, name- or hash-addressed cache of
//!   fetched artifacts, backed by the fetch-dedup cache
//! - [`embed`]: [`DiagramResolver`] — the embedding strategy selector
//!
//! # Example
//!
//! ```no_run
//! use kroki_client::{DiagramFormat, DiagramLanguage, KrokiDiagram};
//! use kroki_diagrams::{DiagramEmbed, DiagramResolver, EmbedOptions, ImageSource};
//!
//! let resolver = DiagramResolver::new("https://kroki.io");
//! let diagram = KrokiDiagram::new(
//!     DiagramLanguage::PlantUml,
//!     DiagramFormat::Svg,
//!     "alice -> bob",
//! )?;
//!
//! // Default options: no network, the embed is the remote URL.
//! let embed = resolver.resolve(&diagram, &EmbedOptions::default())?;
//! assert!(matches!(embed, DiagramEmbed::Image(ImageSource::Remote(_))));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod attrs;
mod embed;
mod store;

pub use attrs::{DocumentSettings, EmbedOptions};
pub use embed::{DiagramEmbed, DiagramResolver, ImageSource, ResolveError};
pub use store::ArtifactStore;

//! Embedding strategy selection.
//!
//! Maps one diagram occurrence and its options to the way the host should
//! reference the result. Priority order: `txt` format short-circuits
//! everything, then `inline`, then `interactive`, then fetch-and-cache, then
//! data-URI mode, and finally the zero-network default of linking the remote
//! URL directly. Only the fetch-and-cache path goes through the dedup cache
//! and disk; every other fetching branch is a one-shot GET.

use std::path::PathBuf;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use kroki_client::{DiagramFormat, EncodeError, FetchError, KrokiClient, KrokiDiagram};

use crate::attrs::{DocumentSettings, EmbedOptions};
use crate::store::ArtifactStore;

/// Resolution error for a single diagram occurrence.
///
/// Failures are local to the occurrence; the host continues converting the
/// rest of the document.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to write diagram artifact {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("diagram response is not valid UTF-8: {0}")]
    InvalidText(#[from] std::string::FromUtf8Error),
}

/// Where an embedded image points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Direct remote URL; no fetch was performed.
    Remote(String),
    /// Locally cached artifact path.
    Local(PathBuf),
    /// Fetched bytes embedded as a `data:` URI.
    DataUri(String),
}

/// How the host should reference a resolved diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramEmbed {
    /// Plain image reference.
    Image(ImageSource),
    /// Interactivity-preserving container (object/embed) around the source.
    Interactive(ImageSource),
    /// Raw artifact markup to splice into the output verbatim.
    Inline(String),
    /// Literal preformatted text (the `txt` format).
    Literal(String),
}

/// Embedding strategy selector for one conversion run.
///
/// Owns the [`KrokiClient`] and the [`ArtifactStore`] (and through it the
/// fetch-dedup cache), so separate conversions resolve in isolation.
pub struct DiagramResolver {
    client: KrokiClient,
    store: ArtifactStore,
}

impl DiagramResolver {
    /// Resolver against `server_url` with the default transport.
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_client(KrokiClient::new(server_url))
    }

    /// Resolver configured from document-wide settings.
    #[must_use]
    pub fn from_settings(settings: &DocumentSettings) -> Self {
        Self::with_client(
            KrokiClient::new(&settings.server_url)
                .method(settings.http_method)
                .max_uri_length(settings.max_uri_length),
        )
    }

    /// Resolver around an explicit client (injected transport in tests).
    #[must_use]
    pub fn with_client(client: KrokiClient) -> Self {
        Self {
            client,
            store: ArtifactStore::new(),
        }
    }

    /// The remote GET URL for a diagram, without any network activity.
    #[must_use]
    pub fn image_url(&self, diagram: &KrokiDiagram) -> String {
        self.client.image_url(diagram)
    }

    /// Resolve one diagram occurrence to its embedding.
    pub fn resolve(
        &self,
        diagram: &KrokiDiagram,
        options: &EmbedOptions,
    ) -> Result<DiagramEmbed, ResolveError> {
        // txt renders as preformatted text no matter what else is set.
        if diagram.format == DiagramFormat::Txt {
            let bytes = self.client.fetch(diagram)?;
            return Ok(DiagramEmbed::Literal(String::from_utf8(bytes)?));
        }

        if options.inline {
            let bytes = self.client.fetch(diagram)?;
            return Ok(DiagramEmbed::Inline(String::from_utf8(bytes)?));
        }

        if options.interactive {
            return Ok(DiagramEmbed::Interactive(self.image_source(diagram, options)?));
        }

        Ok(DiagramEmbed::Image(self.image_source(diagram, options)?))
    }

    /// Pick the image source an `Image` or `Interactive` embed points at.
    fn image_source(
        &self,
        diagram: &KrokiDiagram,
        options: &EmbedOptions,
    ) -> Result<ImageSource, ResolveError> {
        if options.fetch_diagram {
            let path = self.store.materialize(
                &self.client,
                diagram,
                &options.images_dir,
                options.target_name.as_deref(),
            )?;
            return Ok(ImageSource::Local(path));
        }

        if options.data_uri {
            let bytes = self.client.fetch(diagram)?;
            let uri = format!(
                "data:{};base64,{}",
                diagram.format.media_type(),
                BASE64_STANDARD.encode(&bytes),
            );
            return Ok(ImageSource::DataUri(uri));
        }

        Ok(ImageSource::Remote(self.client.image_url(diagram)))
    }
}

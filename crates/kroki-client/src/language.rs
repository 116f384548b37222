//! Diagram language and output format types.
//!
//! Kroki dispatches on the first URL path segment, so the supported languages
//! form a closed set. Unknown names are rejected at the boundary by
//! [`DiagramLanguage::parse`] rather than forwarded to the service.

use crate::encode::{EncodeError, encode_diagram_source};

/// Supported diagram languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramLanguage {
    PlantUml,
    C4PlantUml,
    ActDiag,
    BlockDiag,
    Bpmn,
    Bytefield,
    D2,
    Dbml,
    Ditaa,
    Erd,
    Excalidraw,
    GraphViz,
    Mermaid,
    Nomnoml,
    NwDiag,
    PacketDiag,
    Pikchr,
    RackDiag,
    SeqDiag,
    Structurizr,
    Svgbob,
    Umlet,
    Vega,
    VegaLite,
    WaveDrom,
}

impl DiagramLanguage {
    /// Parse a language from a macro or block name.
    ///
    /// Returns `None` for names that do not map to a supported dialect;
    /// callers surface that as a configuration error before any network
    /// activity.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "plantuml" => Some(Self::PlantUml),
            "c4plantuml" => Some(Self::C4PlantUml),
            "actdiag" => Some(Self::ActDiag),
            "blockdiag" => Some(Self::BlockDiag),
            "bpmn" => Some(Self::Bpmn),
            "bytefield" => Some(Self::Bytefield),
            "d2" => Some(Self::D2),
            "dbml" => Some(Self::Dbml),
            "ditaa" => Some(Self::Ditaa),
            "erd" => Some(Self::Erd),
            "excalidraw" => Some(Self::Excalidraw),
            "graphviz" | "dot" => Some(Self::GraphViz),
            "mermaid" => Some(Self::Mermaid),
            "nomnoml" => Some(Self::Nomnoml),
            "nwdiag" => Some(Self::NwDiag),
            "packetdiag" => Some(Self::PacketDiag),
            "pikchr" => Some(Self::Pikchr),
            "rackdiag" => Some(Self::RackDiag),
            "seqdiag" => Some(Self::SeqDiag),
            "structurizr" => Some(Self::Structurizr),
            "svgbob" => Some(Self::Svgbob),
            "umlet" => Some(Self::Umlet),
            "vega" => Some(Self::Vega),
            "vegalite" => Some(Self::VegaLite),
            "wavedrom" => Some(Self::WaveDrom),
            _ => None,
        }
    }

    /// Kroki endpoint path segment for this language.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::PlantUml => "plantuml",
            Self::C4PlantUml => "c4plantuml",
            Self::ActDiag => "actdiag",
            Self::BlockDiag => "blockdiag",
            Self::Bpmn => "bpmn",
            Self::Bytefield => "bytefield",
            Self::D2 => "d2",
            Self::Dbml => "dbml",
            Self::Ditaa => "ditaa",
            Self::Erd => "erd",
            Self::Excalidraw => "excalidraw",
            Self::GraphViz => "graphviz",
            Self::Mermaid => "mermaid",
            Self::Nomnoml => "nomnoml",
            Self::NwDiag => "nwdiag",
            Self::PacketDiag => "packetdiag",
            Self::Pikchr => "pikchr",
            Self::RackDiag => "rackdiag",
            Self::SeqDiag => "seqdiag",
            Self::Structurizr => "structurizr",
            Self::Svgbob => "svgbob",
            Self::Umlet => "umlet",
            Self::Vega => "vega",
            Self::VegaLite => "vegalite",
            Self::WaveDrom => "wavedrom",
        }
    }
}

/// Output format for rendered diagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramFormat {
    /// SVG (default, supports links and interactivity).
    #[default]
    Svg,
    Png,
    /// Plain-text rendering (ASCII art); short-circuits image embedding.
    Txt,
    Jpeg,
    Pdf,
}

impl DiagramFormat {
    /// Parse a format from an attribute value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            "txt" | "utxt" => Some(Self::Txt),
            "jpeg" => Some(Self::Jpeg),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Format as the Kroki URL path segment and file extension.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Txt => "txt",
            Self::Jpeg => "jpeg",
            Self::Pdf => "pdf",
        }
    }

    /// Media type for data-URI embedding of this format.
    #[must_use]
    pub fn media_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
            Self::Txt => "text/plain",
            Self::Jpeg => "image/jpeg",
            Self::Pdf => "application/pdf",
        }
    }
}

/// One diagram occurrence: language, output format, and source text.
///
/// The URL payload is computed once at construction so downstream URL
/// building is pure and infallible. The source is kept for POST fallback when
/// the encoded URL would exceed the configured length limit.
#[derive(Debug, Clone)]
pub struct KrokiDiagram {
    pub language: DiagramLanguage,
    pub format: DiagramFormat,
    source: String,
    payload: String,
}

impl KrokiDiagram {
    /// Create a diagram occurrence, encoding the source into its URL payload.
    pub fn new(
        language: DiagramLanguage,
        format: DiagramFormat,
        source: impl Into<String>,
    ) -> Result<Self, EncodeError> {
        let source = source.into();
        let payload = encode_diagram_source(source.as_bytes())?;
        Ok(Self {
            language,
            format,
            source,
            payload,
        })
    }

    /// Raw diagram source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Deflate+base64url payload for the GET URL.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

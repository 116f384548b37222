//! End-to-end pipeline tests: host attributes in, embeds out, with an
//! injected transport standing in for the Kroki service.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kroki_client::{
    DiagramFormat, DiagramLanguage, FetchError, HttpClient, KrokiClient, KrokiDiagram,
};
use kroki_diagrams::{DiagramEmbed, DiagramResolver, DocumentSettings, EmbedOptions, ImageSource};
use pretty_assertions::assert_eq;

struct FakeKroki {
    gets: AtomicUsize,
}

impl FakeKroki {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            gets: AtomicUsize::new(0),
        })
    }
}

impl HttpClient for FakeKroki {
    fn get(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(b"<svg>rendered</svg>".to_vec())
    }

    fn post(&self, _url: &str, _body: &[u8]) -> Result<Vec<u8>, FetchError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(b"<svg>rendered</svg>".to_vec())
    }
}

fn settings(attrs: &[(&str, &str)]) -> DocumentSettings {
    let map: HashMap<&str, &str> = attrs.iter().copied().collect();
    DocumentSettings::from_attributes(|name| map.get(name).copied())
}

fn resolver_for(settings: &DocumentSettings, http: Arc<FakeKroki>) -> DiagramResolver {
    DiagramResolver::with_client(
        KrokiClient::with_http(&settings.server_url, http)
            .method(settings.http_method)
            .max_uri_length(settings.max_uri_length),
    )
}

#[test]
fn default_document_links_remote_urls() {
    let settings = settings(&[]);
    let http = FakeKroki::new();
    let resolver = resolver_for(&settings, Arc::clone(&http));

    let diagram = KrokiDiagram::new(
        DiagramLanguage::PlantUml,
        DiagramFormat::Svg,
        "alice -> bob",
    )
    .unwrap();
    let options = EmbedOptions::for_occurrence(&settings, None, None);

    let embed = resolver.resolve(&diagram, &options).unwrap();
    assert_eq!(
        embed,
        DiagramEmbed::Image(ImageSource::Remote(
            "https://kroki.io/plantuml/svg/eNpLzMlMTlXQtVNIyk8CABoDA90=".into()
        )),
    );
    assert_eq!(http.gets.load(Ordering::SeqCst), 0);
}

#[test]
fn fetch_document_writes_once_per_unique_diagram() {
    let dir = tempfile::tempdir().unwrap();
    let images_dir = dir.path().to_str().unwrap().to_owned();
    let doc = settings(&[("kroki-fetch-diagram", ""), ("imagesdir", &images_dir)]);
    let http = FakeKroki::new();
    let resolver = resolver_for(&doc, Arc::clone(&http));

    let repeated = KrokiDiagram::new(
        DiagramLanguage::PlantUml,
        DiagramFormat::Svg,
        "alice -> bob",
    )
    .unwrap();
    let named = KrokiDiagram::new(
        DiagramLanguage::PlantUml,
        DiagramFormat::Svg,
        "Hello -> World",
    )
    .unwrap();

    let anon_opts = EmbedOptions::for_occurrence(&doc, None, None);
    let named_opts = EmbedOptions::for_occurrence(&doc, Some("hello-world"), None);

    // Three occurrences, two unique diagrams.
    let first = resolver.resolve(&repeated, &anon_opts).unwrap();
    let second = resolver.resolve(&repeated, &anon_opts).unwrap();
    let third = resolver.resolve(&named, &named_opts).unwrap();

    assert_eq!(first, second);
    assert_eq!(http.gets.load(Ordering::SeqCst), 2);

    let DiagramEmbed::Image(ImageSource::Local(anon_path)) = first else {
        panic!("expected local image");
    };
    assert!(
        anon_path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("diag-")
    );
    assert_eq!(
        third,
        DiagramEmbed::Image(ImageSource::Local(dir.path().join("hello-world.svg"))),
    );
    assert_eq!(
        std::fs::read(dir.path().join("hello-world.svg")).unwrap(),
        b"<svg>rendered</svg>",
    );
}

#[test]
fn rerun_reuses_files_from_previous_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let images_dir = dir.path().to_str().unwrap().to_owned();
    let doc = settings(&[("kroki-fetch-diagram", ""), ("imagesdir", &images_dir)]);
    let diagram = KrokiDiagram::new(
        DiagramLanguage::PlantUml,
        DiagramFormat::Svg,
        "alice -> bob",
    )
    .unwrap();
    let options = EmbedOptions::for_occurrence(&doc, None, None);

    // First conversion run fetches and persists.
    let first_http = FakeKroki::new();
    let first_run = resolver_for(&doc, Arc::clone(&first_http));
    first_run.resolve(&diagram, &options).unwrap();
    assert_eq!(first_http.gets.load(Ordering::SeqCst), 1);

    // A fresh resolver (new process, empty dedup cache) finds the file on
    // disk and never touches the network.
    let second_http = FakeKroki::new();
    let second_run = resolver_for(&doc, Arc::clone(&second_http));
    let embed = second_run.resolve(&diagram, &options).unwrap();

    assert!(matches!(embed, DiagramEmbed::Image(ImageSource::Local(_))));
    assert_eq!(second_http.gets.load(Ordering::SeqCst), 0);
}

#[test]
fn txt_format_yields_literal_text_even_when_fetching() {
    let doc = settings(&[("kroki-fetch-diagram", "")]);
    let http = FakeKroki::new();
    let resolver = resolver_for(&doc, Arc::clone(&http));

    let diagram = KrokiDiagram::new(
        DiagramLanguage::PlantUml,
        DiagramFormat::Txt,
        "alice -> bob",
    )
    .unwrap();
    let options = EmbedOptions::for_occurrence(&doc, Some("alice"), None);

    let embed = resolver.resolve(&diagram, &options).unwrap();
    assert_eq!(embed, DiagramEmbed::Literal("<svg>rendered</svg>".into()));
}

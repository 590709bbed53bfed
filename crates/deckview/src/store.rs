use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::deck::{Deck, Slide, Theme};

/// Extensions recognized as slide files in a slide directory.
const SLIDE_EXTENSIONS: &[&str] = &["txt", "md"];

/// Extensions that classify a bare file reference as an image slide.
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Everything that can go wrong between asking for a slide document and
/// holding a committed deck. Surfaced to the operator, never silently
/// recovered.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed slide document: {0}")]
    Malformed(String),

    #[error("slide document is missing the `{0}` field")]
    MissingField(&'static str),

    #[error("unknown slide type `{0}`")]
    UnknownSlideType(String),

    #[error("slide document contains no slides")]
    EmptyDeck,
}

/// Where slide documents come from. Implementations fetch and fully parse a
/// document; partial results never escape.
pub trait DocumentSource {
    fn fetch(&self) -> Result<Deck, LoadError>;

    /// Human-readable location, for window titles and error messages.
    fn describe(&self) -> String;
}

/// Holds the immutable, session-scoped deck once loaded. The only mutation
/// is a wholesale replacement via [`load`](Self::load) or
/// [`commit`](Self::commit).
#[derive(Debug, Default)]
pub struct PresentationStore {
    deck: Option<Deck>,
}

impl PresentationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch from `source` and replace the deck. All-or-nothing: any
    /// failure leaves the prior deck untouched.
    pub fn load(&mut self, source: &dyn DocumentSource) -> Result<(), LoadError> {
        let deck = source.fetch()?;
        self.commit(deck);
        Ok(())
    }

    /// Replace the deck with an already-parsed document.
    pub fn commit(&mut self, deck: Deck) {
        self.deck = Some(deck);
    }

    pub fn deck(&self) -> Option<&Deck> {
        self.deck.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.deck.is_some()
    }

    /// Number of slides, zero while unloaded.
    pub fn len(&self) -> usize {
        self.deck.as_ref().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn slides(&self) -> &[Slide] {
        self.deck.as_ref().map(|d| d.slides.as_slice()).unwrap_or(&[])
    }

    pub fn theme(&self) -> Option<&Theme> {
        self.deck.as_ref().map(|d| &d.theme)
    }
}

/// Wire shape of the slide document. Both top-level fields are required;
/// their absence is reported as a distinct error rather than a generic
/// parse failure.
#[derive(Deserialize)]
struct RawDocument {
    slides: Option<Vec<SlideRecord>>,
    template: Option<Theme>,
}

#[derive(Deserialize)]
struct SlideRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    title: Option<String>,
    content: String,
    #[serde(default)]
    is_remote_image: bool,
}

impl SlideRecord {
    fn into_slide(self) -> Result<Slide, LoadError> {
        match self.kind.as_str() {
            "section" => Ok(Slide::Section {
                heading: self.content,
            }),
            "content" => Ok(Slide::Content {
                title: self.title,
                body: self.content,
            }),
            "image" => Ok(Slide::Image {
                reference: self.content,
                remote: self.is_remote_image,
            }),
            other => Err(LoadError::UnknownSlideType(other.to_string())),
        }
    }
}

/// Parse a JSON slide document into a deck. Commits nothing; callers hand
/// the result to the store only when fully parsed.
pub fn parse_document(text: &str, asset_root: String) -> Result<Deck, LoadError> {
    let raw: RawDocument =
        serde_json::from_str(text).map_err(|e| LoadError::Malformed(e.to_string()))?;
    let records = raw.slides.ok_or(LoadError::MissingField("slides"))?;
    let theme = raw.template.ok_or(LoadError::MissingField("template"))?;

    let slides: Vec<Slide> = records
        .into_iter()
        .map(SlideRecord::into_slide)
        .collect::<Result<_, _>>()?;
    if slides.is_empty() {
        return Err(LoadError::EmptyDeck);
    }

    Ok(Deck {
        slides,
        theme,
        asset_root,
    })
}

/// Fetches the slide document over HTTP (conceptually `GET /api/slides`).
/// Local image references resolve to `<origin>/slides/<name>`.
pub struct HttpSource {
    url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    fn asset_root(&self) -> String {
        format!("{}/slides", url_origin(&self.url))
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self) -> Result<Deck, LoadError> {
        let mut response = self.agent.get(&self.url).call().map_err(|e| match e {
            ureq::Error::StatusCode(code) => LoadError::Status(code),
            other => LoadError::Transport(other.to_string()),
        })?;
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| LoadError::Transport(e.to_string()))?;
        parse_document(&text, self.asset_root())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Scheme and authority of a URL, without any trailing path.
fn url_origin(url: &str) -> &str {
    match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            match rest.find('/') {
                Some(path_start) => &url[..scheme_end + 3 + path_start],
                None => url,
            }
        }
        None => url,
    }
}

/// Builds the slide document from a local directory, the way the original
/// server side does: `template.json` for the theme, plus one slide per
/// `.txt`/`.md` file in filename order. Files that fit no classification
/// are skipped.
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DocumentSource for DirSource {
    fn fetch(&self) -> Result<Deck, LoadError> {
        let template_path = self.dir.join("template.json");
        let template_text = std::fs::read_to_string(&template_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::MissingField("template")
            } else {
                LoadError::Io {
                    path: template_path.clone(),
                    source: e,
                }
            }
        })?;
        let theme: Theme = serde_json::from_str(&template_text)
            .map_err(|e| LoadError::Malformed(format!("template.json: {e}")))?;

        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.dir)
            .map_err(|e| LoadError::Io {
                path: self.dir.clone(),
                source: e,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| is_slide_file(p))
            .collect();
        files.sort();

        let mut slides = Vec::new();
        for path in files {
            let text = std::fs::read_to_string(&path).map_err(|e| LoadError::Io {
                path: path.clone(),
                source: e,
            })?;
            if let Some(slide) = classify_slide_text(&text) {
                slides.push(slide);
            }
        }
        if slides.is_empty() {
            return Err(LoadError::EmptyDeck);
        }

        Ok(Deck {
            slides,
            theme,
            asset_root: self.dir.display().to_string(),
        })
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

fn is_slide_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SLIDE_EXTENSIONS.contains(&ext))
}

/// Classify one slide file's text. The first line decides the slide type:
/// a literal `SECTION` marker, an image reference (URL or image filename),
/// or a `# Title` heading for a markdown content slide. Anything else is
/// unrecognized and yields no slide.
pub fn classify_slide_text(text: &str) -> Option<Slide> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let first = *lines.first()?;

    if first == "SECTION" {
        return Some(Slide::Section {
            heading: lines.get(1).copied().unwrap_or("").to_string(),
        });
    }

    let remote = first.starts_with("http://") || first.starts_with("https://");
    if remote || IMAGE_EXTENSIONS.iter().any(|ext| first.ends_with(ext)) {
        return Some(Slide::Image {
            reference: first.to_string(),
            remote,
        });
    }

    if first.starts_with('#') {
        // Leading `#` and spaces may interleave, so strip them as a set.
        let title = first.trim_start_matches(['#', ' ']).trim().to_string();
        return Some(Slide::Content {
            title: Some(title),
            body: lines[1..].join("\n"),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_DOC: &str = r##"{
        "slides": [
            { "type": "section", "content": "Part One" },
            { "type": "content", "title": "Agenda", "content": "- a\n- b" },
            { "type": "image", "content": "cat.png", "is_remote_image": false }
        ],
        "template": {
            "bg-color": "#ffffff",
            "text-color": "#111111",
            "font-main": "sans-serif",
            "footer-font-size": "14px",
            "footer-text-color": "#666666",
            "footer-text": "demo"
        }
    }"##;

    #[test]
    fn test_parse_valid_document() {
        let deck = parse_document(VALID_DOC, "/slides".to_string()).unwrap();
        assert_eq!(deck.len(), 3);
        assert_eq!(
            deck.slides[0],
            Slide::Section {
                heading: "Part One".to_string()
            }
        );
        assert_eq!(deck.theme.footer_text, "demo");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse_document("not json", "/slides".to_string()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)), "got {err:?}");
    }

    #[test]
    fn test_parse_rejects_missing_slides_field() {
        let err = parse_document(r#"{"template": {}}"#, "/slides".to_string()).unwrap_err();
        assert!(matches!(err, LoadError::MissingField("slides")), "got {err:?}");
    }

    #[test]
    fn test_parse_rejects_missing_template_field() {
        let err = parse_document(r#"{"slides": []}"#, "/slides".to_string()).unwrap_err();
        assert!(
            matches!(err, LoadError::MissingField("template")),
            "got {err:?}"
        );
    }

    #[test]
    fn test_parse_rejects_empty_slide_list() {
        let err =
            parse_document(r#"{"slides": [], "template": {}}"#, "/slides".to_string()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyDeck), "got {err:?}");
    }

    #[test]
    fn test_parse_rejects_unknown_slide_type() {
        let doc = r#"{"slides": [{"type": "video", "content": "x"}], "template": {}}"#;
        let err = parse_document(doc, "/slides".to_string()).unwrap_err();
        match err {
            LoadError::UnknownSlideType(kind) => assert_eq!(kind, "video"),
            other => panic!("expected UnknownSlideType, got {other:?}"),
        }
    }

    #[test]
    fn test_store_load_is_all_or_nothing() {
        struct Fixed(&'static str);
        impl DocumentSource for Fixed {
            fn fetch(&self) -> Result<Deck, LoadError> {
                parse_document(self.0, "/slides".to_string())
            }
            fn describe(&self) -> String {
                "fixed".to_string()
            }
        }

        let mut store = PresentationStore::new();
        store.load(&Fixed(VALID_DOC)).unwrap();
        assert_eq!(store.len(), 3);

        // A failing reload must leave the prior deck in place.
        let err = store.load(&Fixed("{broken")).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
        assert_eq!(store.len(), 3);
        assert!(store.is_loaded());
    }

    #[test]
    fn test_store_starts_unloaded() {
        let store = PresentationStore::new();
        assert!(!store.is_loaded());
        assert_eq!(store.len(), 0);
        assert!(store.slides().is_empty());
        assert!(store.theme().is_none());
    }

    #[test]
    fn test_url_origin() {
        assert_eq!(url_origin("http://localhost:5000/api/slides"), "http://localhost:5000");
        assert_eq!(url_origin("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_classify_section_file() {
        let slide = classify_slide_text("SECTION\nThe Big Reveal\n").unwrap();
        assert_eq!(
            slide,
            Slide::Section {
                heading: "The Big Reveal".to_string()
            }
        );
    }

    #[test]
    fn test_classify_section_without_heading_line() {
        let slide = classify_slide_text("SECTION").unwrap();
        assert_eq!(
            slide,
            Slide::Section {
                heading: String::new()
            }
        );
    }

    #[test]
    fn test_classify_local_image_file() {
        let slide = classify_slide_text("cat.png\n").unwrap();
        assert_eq!(
            slide,
            Slide::Image {
                reference: "cat.png".to_string(),
                remote: false
            }
        );
    }

    #[test]
    fn test_classify_remote_image_file() {
        let slide = classify_slide_text("https://x/y.png").unwrap();
        assert_eq!(
            slide,
            Slide::Image {
                reference: "https://x/y.png".to_string(),
                remote: true
            }
        );
    }

    #[test]
    fn test_classify_content_file_strips_heading_markers() {
        let slide = classify_slide_text("## Agenda\nFirst point\nSecond point").unwrap();
        assert_eq!(
            slide,
            Slide::Content {
                title: Some("Agenda".to_string()),
                body: "First point\nSecond point".to_string()
            }
        );
    }

    #[test]
    fn test_classify_title_strips_interleaved_markers_and_spaces() {
        let slide = classify_slide_text("# #Title\nbody").unwrap();
        assert_eq!(
            slide,
            Slide::Content {
                title: Some("Title".to_string()),
                body: "body".to_string()
            }
        );
    }

    #[test]
    fn test_classify_unrecognized_file_yields_nothing() {
        assert_eq!(classify_slide_text("just some prose"), None);
        assert_eq!(classify_slide_text(""), None);
    }
}

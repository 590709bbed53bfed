/// One positional entry in the presentation sequence.
///
/// The wire format tags each slide with a `type` string; unrecognized tags
/// are rejected at load time so rendering can match exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Slide {
    /// A divider rendered as a single large heading. Footer hidden.
    Section { heading: String },
    /// A markdown body with an optional title heading. Footer visible.
    Content { title: Option<String>, body: String },
    /// A full-viewport background image. Footer hidden.
    ///
    /// `reference` is used verbatim when `remote`, otherwise it is resolved
    /// against the deck's asset root.
    Image { reference: String, remote: bool },
}

/// The presentation-wide visual style values, as sent by the document
/// source. Values are opaque strings; nothing validates them here. The
/// rendering layer parses them leniently and falls back on defaults, so an
/// illegal value degrades silently instead of failing the load.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Theme {
    #[serde(rename = "bg-color", default)]
    pub bg_color: String,

    #[serde(rename = "text-color", default)]
    pub text_color: String,

    #[serde(rename = "font-main", default)]
    pub font_main: String,

    #[serde(rename = "footer-font-size", default)]
    pub footer_font_size: String,

    #[serde(rename = "footer-text-color", default)]
    pub footer_text_color: String,

    #[serde(rename = "footer-text", default)]
    pub footer_text: String,
}

/// The full ordered slide sequence for one loaded session, replaced
/// wholesale on every (re)load. Guaranteed non-empty by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub slides: Vec<Slide>,
    pub theme: Theme,
    /// Prefix that local image references resolve against: `/slides` for
    /// HTTP decks (relative to the server origin), the slide directory for
    /// local decks.
    pub asset_root: String,
}

impl Deck {
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Resolve an image slide's reference to something the rendering
    /// surface can fetch: remote references pass through verbatim, local
    /// ones are joined onto the asset root.
    pub fn resolve_image(&self, reference: &str, remote: bool) -> String {
        if remote {
            reference.to_string()
        } else {
            format!(
                "{}/{}",
                self.asset_root.trim_end_matches('/'),
                reference.trim_start_matches('/')
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck_with_root(root: &str) -> Deck {
        Deck {
            slides: vec![Slide::Section {
                heading: "x".to_string(),
            }],
            theme: Theme::default(),
            asset_root: root.to_string(),
        }
    }

    #[test]
    fn test_local_image_resolves_against_asset_root() {
        let deck = deck_with_root("/slides");
        assert_eq!(deck.resolve_image("cat.png", false), "/slides/cat.png");
    }

    #[test]
    fn test_remote_image_used_verbatim() {
        let deck = deck_with_root("/slides");
        assert_eq!(
            deck.resolve_image("https://x/y.png", true),
            "https://x/y.png"
        );
    }

    #[test]
    fn test_resolve_tolerates_stray_slashes() {
        let deck = deck_with_root("/decks/demo/");
        assert_eq!(deck.resolve_image("/cat.png", false), "/decks/demo/cat.png");
    }

    #[test]
    fn test_theme_deserializes_kebab_case_keys() {
        let json = r##"{
            "bg-color": "#1e1e1e",
            "text-color": "white",
            "font-main": "Georgia, serif",
            "footer-font-size": "14px",
            "footer-text-color": "#888888",
            "footer-text": "deckview demo"
        }"##;
        let theme: Theme = serde_json::from_str(json).unwrap();
        assert_eq!(theme.bg_color, "#1e1e1e");
        assert_eq!(theme.footer_text, "deckview demo");
    }

    #[test]
    fn test_theme_missing_keys_default_to_empty() {
        let theme: Theme = serde_json::from_str("{}").unwrap();
        assert_eq!(theme, Theme::default());
    }
}

use std::sync::OnceLock;

use eframe::egui::{Color32, FontFamily};
use regex::Regex;

use crate::deck::Theme;

/// The document theme resolved into egui terms. The wire values are opaque
/// strings; anything that fails to parse falls back to the default below,
/// so a bad value degrades silently instead of failing the load.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTheme {
    pub background: Color32,
    pub foreground: Color32,
    pub accent: Color32,
    pub code_background: Color32,
    pub body_family: FontFamily,
    pub footer_size: f32,
    pub footer_color: Color32,
    pub footer_text: String,
    pub h1_size: f32,
    pub h2_size: f32,
    pub h3_size: f32,
    pub body_size: f32,
    pub code_size: f32,
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(0x1E, 0x1E, 0x1E),
            foreground: Color32::from_rgb(0xC8, 0xC8, 0xC8),
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            code_background: Color32::from_rgb(0x2D, 0x2D, 0x2D),
            body_family: FontFamily::Proportional,
            footer_size: 14.0,
            footer_color: Color32::from_rgb(0x88, 0x88, 0x88),
            footer_text: String::new(),
            h1_size: 96.0,
            h2_size: 72.0,
            h3_size: 52.0,
            body_size: 44.0,
            code_size: 30.0,
        }
    }
}

impl ResolvedTheme {
    /// Resolve all six template properties, overwriting everything.
    pub fn from_template(theme: &Theme) -> Self {
        let defaults = Self::default();
        let background = parse_css_color(&theme.bg_color).unwrap_or(defaults.background);
        Self {
            background,
            foreground: parse_css_color(&theme.text_color).unwrap_or(defaults.foreground),
            code_background: code_background_for(background),
            body_family: family_for(&theme.font_main),
            footer_size: parse_px(&theme.footer_font_size).unwrap_or(defaults.footer_size),
            footer_color: parse_css_color(&theme.footer_text_color).unwrap_or(defaults.footer_color),
            footer_text: theme.footer_text.clone(),
            ..defaults
        }
    }

    pub fn heading_size(&self, level: u8) -> f32 {
        match level {
            1 => self.h1_size,
            2 => self.h2_size,
            3 => self.h3_size,
            _ => self.body_size,
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }
}

/// Code spans need a background that stands out slightly from the slide.
fn code_background_for(background: Color32) -> Color32 {
    let luminance =
        0.299 * background.r() as f32 + 0.587 * background.g() as f32 + 0.114 * background.b() as f32;
    if luminance < 128.0 {
        Color32::from_rgba_unmultiplied(255, 255, 255, 20)
    } else {
        Color32::from_rgba_unmultiplied(0, 0, 0, 16)
    }
}

/// Map a CSS font-family stack onto egui's two families. Anything that
/// names a monospace face gets the monospace family; everything else is
/// proportional.
fn family_for(font_main: &str) -> FontFamily {
    if font_main.to_ascii_lowercase().contains("mono") {
        FontFamily::Monospace
    } else {
        FontFamily::Proportional
    }
}

/// Lenient CSS-style color parsing: `#rgb`, `#rrggbb`, `rgb(r, g, b)` and a
/// handful of named colors. Returns `None` for anything else.
pub fn parse_css_color(value: &str) -> Option<Color32> {
    let value = value.trim();

    if let Some(hex) = value.strip_prefix('#') {
        // Byte-indexed slicing below is only safe on pure ASCII hex.
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                Some(Color32::from_rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color32::from_rgb(r, g, b))
            }
            _ => None,
        };
    }

    static RGB: OnceLock<Regex> = OnceLock::new();
    let rgb = RGB.get_or_init(|| {
        Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})").unwrap()
    });
    if let Some(caps) = rgb.captures(value) {
        let r: u8 = caps[1].parse().ok()?;
        let g: u8 = caps[2].parse().ok()?;
        let b: u8 = caps[3].parse().ok()?;
        return Some(Color32::from_rgb(r, g, b));
    }

    match value.to_ascii_lowercase().as_str() {
        "white" => Some(Color32::from_rgb(0xFF, 0xFF, 0xFF)),
        "black" => Some(Color32::from_rgb(0x00, 0x00, 0x00)),
        "red" => Some(Color32::from_rgb(0xFF, 0x00, 0x00)),
        "green" => Some(Color32::from_rgb(0x00, 0x80, 0x00)),
        "blue" => Some(Color32::from_rgb(0x00, 0x00, 0xFF)),
        "yellow" => Some(Color32::from_rgb(0xFF, 0xFF, 0x00)),
        "orange" => Some(Color32::from_rgb(0xFF, 0xA5, 0x00)),
        "purple" => Some(Color32::from_rgb(0x80, 0x00, 0x80)),
        "gray" | "grey" => Some(Color32::from_rgb(0x80, 0x80, 0x80)),
        "silver" => Some(Color32::from_rgb(0xC0, 0xC0, 0xC0)),
        "navy" => Some(Color32::from_rgb(0x00, 0x00, 0x80)),
        "teal" => Some(Color32::from_rgb(0x00, 0x80, 0x80)),
        "cyan" | "aqua" => Some(Color32::from_rgb(0x00, 0xFF, 0xFF)),
        "magenta" | "fuchsia" => Some(Color32::from_rgb(0xFF, 0x00, 0xFF)),
        _ => None,
    }
}

/// Parse a CSS pixel length: `14px` or a bare number.
pub fn parse_px(value: &str) -> Option<f32> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    let size: f32 = number.parse().ok()?;
    (size.is_finite() && size > 0.0).then_some(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_css_color("#ff0000"), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(parse_css_color("#fff"), Some(Color32::from_rgb(255, 255, 255)));
        assert_eq!(parse_css_color(" #1e1e1e "), Some(Color32::from_rgb(0x1E, 0x1E, 0x1E)));
    }

    #[test]
    fn test_parse_rgb_function() {
        assert_eq!(
            parse_css_color("rgb(10, 20, 30)"),
            Some(Color32::from_rgb(10, 20, 30))
        );
        assert_eq!(
            parse_css_color("rgba(10,20,30,0.5)"),
            Some(Color32::from_rgb(10, 20, 30))
        );
    }

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_css_color("White"), Some(Color32::from_rgb(255, 255, 255)));
        assert_eq!(parse_css_color("teal"), Some(Color32::from_rgb(0, 128, 128)));
    }

    #[test]
    fn test_invalid_colors_yield_none() {
        assert_eq!(parse_css_color(""), None);
        assert_eq!(parse_css_color("#12"), None);
        assert_eq!(parse_css_color("blurple"), None);
        assert_eq!(parse_css_color("rgb(300,)"), None);
    }

    #[test]
    fn test_non_hex_and_multibyte_hex_yield_none() {
        assert_eq!(parse_css_color("#zzz"), None);
        // Multibyte characters after `#` must not panic the slicer.
        assert_eq!(parse_css_color("#a\u{e9}"), None);
        assert_eq!(parse_css_color("#\u{1f600}\u{1f600}"), None);
    }

    #[test]
    fn test_parse_px_sizes() {
        assert_eq!(parse_px("14px"), Some(14.0));
        assert_eq!(parse_px(" 18.5px "), Some(18.5));
        assert_eq!(parse_px("20"), Some(20.0));
        assert_eq!(parse_px("1.2em"), None);
        assert_eq!(parse_px("-3px"), None);
        assert_eq!(parse_px(""), None);
    }

    #[test]
    fn test_non_finite_px_sizes_are_rejected() {
        assert_eq!(parse_px("inf"), None);
        assert_eq!(parse_px("-inf"), None);
        assert_eq!(parse_px("NaN"), None);
    }

    #[test]
    fn test_invalid_values_degrade_to_defaults() {
        let theme = Theme {
            bg_color: "not-a-color".to_string(),
            text_color: "#00ff00".to_string(),
            font_main: "sans-serif".to_string(),
            footer_font_size: "huge".to_string(),
            footer_text_color: String::new(),
            footer_text: "footer".to_string(),
        };
        let resolved = ResolvedTheme::from_template(&theme);
        let defaults = ResolvedTheme::default();
        assert_eq!(resolved.background, defaults.background);
        assert_eq!(resolved.foreground, Color32::from_rgb(0, 255, 0));
        assert_eq!(resolved.footer_size, defaults.footer_size);
        assert_eq!(resolved.footer_text, "footer");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let theme = Theme {
            bg_color: "#101010".to_string(),
            text_color: "white".to_string(),
            font_main: "Menlo, monospace".to_string(),
            footer_font_size: "12px".to_string(),
            footer_text_color: "gray".to_string(),
            footer_text: "demo".to_string(),
        };
        let first = ResolvedTheme::from_template(&theme);
        let second = ResolvedTheme::from_template(&theme);
        assert_eq!(first, second);
        assert_eq!(first.body_family, FontFamily::Monospace);
    }
}

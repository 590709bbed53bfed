pub mod image_cache;
pub mod text;

use crate::deck::Theme;
use crate::parser::Block;

/// The engine's view of the display. One implementation paints with egui
/// ([`crate::app`]); tests substitute a recording surface so navigation and
/// dispatch run headless.
///
/// Every call is a plain side effect on the visible output; none of them
/// touch the engine's own state.
pub trait RenderSurface {
    /// Drop whatever the previous slide left behind, including any
    /// background image.
    fn clear(&mut self);

    /// Show a section divider as a single large heading.
    fn show_section(&mut self, heading: &str);

    /// Show a content slide: optional title heading followed by the parsed
    /// markdown body.
    fn show_content(&mut self, title: Option<&str>, body: &[Block]);

    /// Show a full-viewport background image. `reference` is already
    /// resolved to a URL or local path.
    fn show_image(&mut self, reference: &str);

    fn set_footer_visible(&mut self, visible: bool);

    fn set_help_visible(&mut self, visible: bool);

    /// Apply all theme properties unconditionally, overwriting prior
    /// values. Idempotent; no diffing.
    fn apply_theme(&mut self, theme: &Theme);

    /// Replace the slide area with an inline error message.
    fn show_error(&mut self, message: &str);
}

use crate::deck::{Deck, Slide};
use crate::parser;
use crate::render::RenderSurface;
use crate::store::{DocumentSource, LoadError, PresentationStore};

/// Solicits a jump target from the operator and reports invalid input.
/// The frontend backs this with its jump dialog; tests script it.
pub trait Prompter {
    /// Ask for a 1-based slide number. `None` means the operator cancelled.
    fn request_slide_number(&mut self) -> Option<String>;

    /// Tell the operator the jump target was invalid. The cursor has not
    /// moved.
    fn notify_invalid(&mut self);
}

/// Owns the session state: the store, the cursor, the help-overlay flag and
/// the reload generation counter. All navigation goes through here; the
/// cursor stays in `[0, len)` whenever a deck is loaded.
pub struct Engine {
    store: PresentationStore,
    cursor: usize,
    help_visible: bool,
    load_gen: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            store: PresentationStore::new(),
            cursor: 0,
            help_visible: false,
            load_gen: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn slide_count(&self) -> usize {
        self.store.len()
    }

    /// Move the cursor to `index` and render. Rejected without error when
    /// no deck is loaded or `index` is out of range, so rapid key presses
    /// at the boundaries are harmless.
    pub fn goto(&mut self, index: usize, surface: &mut dyn RenderSurface) {
        if index >= self.store.len() {
            return;
        }
        self.cursor = index;
        self.render(surface);
    }

    /// Step the cursor by `delta` (-1 or +1). No wraparound: stepping past
    /// either end is a no-op.
    pub fn step(&mut self, delta: isize, surface: &mut dyn RenderSurface) {
        let Some(target) = self.cursor.checked_add_signed(delta) else {
            return;
        };
        self.goto(target, surface);
    }

    /// Solicit a 1-based slide number and jump to it. Non-numeric, zero,
    /// out-of-range or cancelled input leaves the cursor untouched and
    /// notifies the operator.
    pub fn jump(&mut self, prompter: &mut dyn Prompter, surface: &mut dyn RenderSurface) {
        let len = self.store.len();
        let target = prompter
            .request_slide_number()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|&n| n >= 1 && n <= len);
        match target {
            Some(n) => self.goto(n - 1, surface),
            None => prompter.notify_invalid(),
        }
    }

    pub fn toggle_help(&mut self, show: bool, surface: &mut dyn RenderSurface) {
        self.help_visible = show;
        surface.set_help_visible(show);
    }

    /// Fetch from `source` and apply the outcome. Success replaces the deck,
    /// resets the cursor to 0, reapplies the theme and re-renders; failure
    /// shows an error placeholder and leaves the stored deck untouched.
    pub fn reload(&mut self, source: &dyn DocumentSource, surface: &mut dyn RenderSurface) {
        let generation = self.begin_reload();
        let outcome = source.fetch();
        self.finish_reload(generation, outcome, surface);
    }

    /// Issue a new reload generation. Each call invalidates all previously
    /// issued generations, so a response from a superseded request can
    /// never overwrite a newer one.
    pub fn begin_reload(&mut self) -> u64 {
        self.load_gen += 1;
        self.load_gen
    }

    /// Apply the outcome of the reload identified by `generation`. Stale
    /// generations are discarded outright.
    pub fn finish_reload(
        &mut self,
        generation: u64,
        outcome: Result<Deck, LoadError>,
        surface: &mut dyn RenderSurface,
    ) {
        if generation != self.load_gen {
            return;
        }
        match outcome {
            Ok(deck) => {
                self.store.commit(deck);
                self.cursor = 0;
                if let Some(theme) = self.store.theme() {
                    surface.apply_theme(theme);
                }
                self.render(surface);
            }
            Err(err) => {
                surface.clear();
                surface.show_error(&err.to_string());
            }
        }
    }

    /// Render the slide under the cursor: clear the prior output, then
    /// dispatch on the slide variant. Does nothing while unloaded.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        let Some(deck) = self.store.deck() else {
            return;
        };
        let Some(slide) = deck.slides.get(self.cursor) else {
            return;
        };

        surface.clear();
        match slide {
            Slide::Section { heading } => {
                surface.show_section(heading);
                surface.set_footer_visible(false);
            }
            Slide::Content { title, body } => {
                let blocks = parser::parse(body);
                surface.show_content(title.as_deref(), &blocks);
                surface.set_footer_visible(true);
            }
            Slide::Image { reference, remote } => {
                let resolved = deck.resolve_image(reference, *remote);
                surface.show_image(&resolved);
                surface.set_footer_visible(false);
            }
        }
    }
}

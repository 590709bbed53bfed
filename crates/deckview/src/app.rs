use std::time::Instant;

use eframe::egui;

use crate::deck::Theme;
use crate::engine::{Engine, Prompter};
use crate::parser::Block;
use crate::render::image_cache::ImageCache;
use crate::render::{text, RenderSurface};
use crate::store::DocumentSource;
use crate::theme::ResolvedTheme;

/// What the slide area currently shows.
enum Stage {
    Empty,
    Section(String),
    Content {
        title: Option<String>,
        blocks: Vec<Block>,
    },
    Image(String),
    Error(String),
}

/// The engine's render surface: a retained description of the visible
/// output, painted every frame.
struct ViewState {
    stage: Stage,
    footer_visible: bool,
    help_visible: bool,
    theme: ResolvedTheme,
}

impl ViewState {
    fn new() -> Self {
        Self {
            stage: Stage::Empty,
            footer_visible: true,
            help_visible: false,
            theme: ResolvedTheme::default(),
        }
    }
}

impl RenderSurface for ViewState {
    fn clear(&mut self) {
        self.stage = Stage::Empty;
    }

    fn show_section(&mut self, heading: &str) {
        self.stage = Stage::Section(heading.to_string());
    }

    fn show_content(&mut self, title: Option<&str>, body: &[Block]) {
        self.stage = Stage::Content {
            title: title.map(str::to_string),
            blocks: body.to_vec(),
        };
    }

    fn show_image(&mut self, reference: &str) {
        self.stage = Stage::Image(reference.to_string());
    }

    fn set_footer_visible(&mut self, visible: bool) {
        self.footer_visible = visible;
    }

    fn set_help_visible(&mut self, visible: bool) {
        self.help_visible = visible;
    }

    fn apply_theme(&mut self, theme: &Theme) {
        self.theme = ResolvedTheme::from_template(theme);
    }

    fn show_error(&mut self, message: &str) {
        self.stage = Stage::Error(message.to_string());
    }
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let duration = 1.5;
        let fade_start = 1.0;
        if elapsed < fade_start {
            1.0
        } else if elapsed < duration {
            1.0 - (elapsed - fade_start) / (duration - fade_start)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= 1.5
    }
}

#[derive(Default)]
struct JumpDialog {
    input: String,
}

/// The jump dialog's side of the [`Prompter`] seam: holds the response the
/// operator already gave, so the engine can consume it synchronously.
struct ResolvedPrompt {
    response: Option<String>,
    invalid: bool,
}

impl Prompter for ResolvedPrompt {
    fn request_slide_number(&mut self) -> Option<String> {
        self.response.take()
    }

    fn notify_invalid(&mut self) {
        self.invalid = true;
    }
}

#[derive(Clone, Copy)]
enum InputAction {
    Next,
    Prev,
    OpenJump,
    Reload,
    ShowHelp,
    HideHelp,
}

struct PresenterApp {
    engine: Engine,
    source: Box<dyn DocumentSource>,
    view: ViewState,
    image_cache: ImageCache,
    jump: Option<JumpDialog>,
    toast: Option<Toast>,
    /// Help overlay rect from the last frame, used to ignore clicks inside it
    last_help_rect: Option<egui::Rect>,
}

impl PresenterApp {
    fn new(source: Box<dyn DocumentSource>, start_slide: Option<usize>) -> Self {
        let mut engine = Engine::new();
        let mut view = ViewState::new();

        // Initial load; a failure shows the error placeholder instead of
        // aborting, and `r` retries.
        engine.reload(source.as_ref(), &mut view);
        if let Some(n) = start_slide {
            engine.goto(n.saturating_sub(1), &mut view);
        }

        Self {
            engine,
            source,
            view,
            image_cache: ImageCache::new(),
            jump: None,
            toast: None,
            last_help_rect: None,
        }
    }

    fn compute_scale(rect: egui::Rect) -> f32 {
        let ref_w = 1920.0;
        let ref_h = 1080.0;
        (rect.width() / ref_w).min(rect.height() / ref_h)
    }

    fn collect_input(&mut self, ctx: &egui::Context) -> Option<InputAction> {
        let help_rect = self.last_help_rect;
        ctx.input(|i| {
            if i.key_pressed(egui::Key::ArrowRight) || i.key_pressed(egui::Key::D) {
                return Some(InputAction::Next);
            }
            if i.key_pressed(egui::Key::ArrowLeft) || i.key_pressed(egui::Key::A) {
                return Some(InputAction::Prev);
            }
            if i.key_pressed(egui::Key::G) {
                return Some(InputAction::OpenJump);
            }
            if i.key_pressed(egui::Key::R) {
                return Some(InputAction::Reload);
            }
            if i.key_pressed(egui::Key::H) {
                return Some(InputAction::ShowHelp);
            }
            if i.key_pressed(egui::Key::Escape) {
                return Some(InputAction::HideHelp);
            }

            // Secondary click opens the jump dialog, primary advances
            // unless it lands inside the help overlay
            if i.pointer.button_pressed(egui::PointerButton::Secondary) {
                return Some(InputAction::OpenJump);
            }
            if i.pointer.button_pressed(egui::PointerButton::Primary) {
                let inside_help = match (help_rect, i.pointer.interact_pos()) {
                    (Some(rect), Some(pos)) => rect.contains(pos),
                    _ => false,
                };
                if !inside_help {
                    return Some(InputAction::Next);
                }
            }
            None
        })
    }

    fn apply_action(&mut self, action: InputAction) {
        match action {
            InputAction::Next => self.engine.step(1, &mut self.view),
            InputAction::Prev => self.engine.step(-1, &mut self.view),
            InputAction::OpenJump => self.jump = Some(JumpDialog::default()),
            InputAction::Reload => self.engine.reload(self.source.as_ref(), &mut self.view),
            InputAction::ShowHelp => self.engine.toggle_help(true, &mut self.view),
            InputAction::HideHelp => self.engine.toggle_help(false, &mut self.view),
        }
    }

    /// Show the jump dialog and, once the operator resolves it, feed the
    /// response through the engine's prompter seam.
    fn show_jump_dialog(&mut self, ctx: &egui::Context) {
        let Some(mut dialog) = self.jump.take() else {
            return;
        };

        // None = still open, Some(response) = resolved (response None = cancelled)
        let mut resolution: Option<Option<String>> = None;

        egui::Window::new("Go to slide")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                let response = ui.text_edit_singleline(&mut dialog.input);
                response.request_focus();
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    resolution = Some(Some(dialog.input.clone()));
                }
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    resolution = Some(None);
                }
                ui.horizontal(|ui| {
                    if ui.button("Go").clicked() {
                        resolution = Some(Some(dialog.input.clone()));
                    }
                    if ui.button("Cancel").clicked() {
                        resolution = Some(None);
                    }
                });
            });

        match resolution {
            Some(response) => {
                let mut prompt = ResolvedPrompt {
                    response,
                    invalid: false,
                };
                self.engine.jump(&mut prompt, &mut self.view);
                if prompt.invalid {
                    self.toast = Some(Toast::new("Invalid slide number".to_string()));
                }
            }
            None => self.jump = Some(dialog),
        }
    }

    fn draw_stage(&mut self, ui: &egui::Ui, ctx: &egui::Context, rect: egui::Rect, scale: f32) {
        let theme = &self.view.theme;
        let padding = 80.0 * scale;
        let content_rect = rect.shrink(padding);

        match &self.view.stage {
            Stage::Empty => {}
            Stage::Section(heading) => {
                let galley = ui.painter().layout(
                    heading.clone(),
                    egui::FontId::new(theme.h1_size * scale, theme.body_family.clone()),
                    theme.foreground,
                    content_rect.width(),
                );
                let pos = egui::pos2(
                    rect.center().x - galley.rect.width() / 2.0,
                    rect.center().y - galley.rect.height() / 2.0,
                );
                ui.painter().galley(pos, galley, theme.foreground);
            }
            Stage::Content { title, blocks } => {
                let mut y = content_rect.top();
                if let Some(title) = title {
                    let galley = ui.painter().layout(
                        title.clone(),
                        egui::FontId::new(theme.h2_size * scale, theme.body_family.clone()),
                        theme.foreground,
                        content_rect.width(),
                    );
                    let height = galley.rect.height();
                    ui.painter()
                        .galley(egui::pos2(content_rect.left(), y), galley, theme.foreground);
                    y += height + 40.0 * scale;
                }
                let body_rect = egui::Rect::from_min_max(
                    egui::pos2(content_rect.left(), y),
                    content_rect.max,
                );
                text::draw_blocks(ui, blocks, theme, body_rect, scale);
            }
            Stage::Image(reference) => {
                draw_background_image(ui, ctx, &mut self.image_cache, reference, rect, theme);
            }
            Stage::Error(message) => {
                let heading_galley = ui.painter().layout(
                    "Error loading presentation".to_string(),
                    egui::FontId::proportional(theme.h3_size * scale),
                    theme.foreground,
                    content_rect.width(),
                );
                let heading_height = heading_galley.rect.height();
                ui.painter().galley(
                    content_rect.left_top(),
                    heading_galley,
                    theme.foreground,
                );
                let detail_galley = ui.painter().layout(
                    message.clone(),
                    egui::FontId::proportional(theme.body_size * 0.6 * scale),
                    theme.footer_color,
                    content_rect.width(),
                );
                ui.painter().galley(
                    egui::pos2(
                        content_rect.left(),
                        content_rect.top() + heading_height + 24.0 * scale,
                    ),
                    detail_galley,
                    theme.footer_color,
                );
            }
        }
    }

    fn draw_chrome(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) {
        let theme = &self.view.theme;

        if self.view.footer_visible && !theme.footer_text.is_empty() {
            let galley = ui.painter().layout_no_wrap(
                theme.footer_text.clone(),
                egui::FontId::new(theme.footer_size * scale.max(0.5), theme.body_family.clone()),
                theme.footer_color,
            );
            let pos = egui::pos2(
                rect.center().x - galley.rect.width() / 2.0,
                rect.bottom() - 30.0 * scale - galley.rect.height() / 2.0,
            );
            ui.painter().galley(pos, galley, theme.footer_color);
        }

        // Slide counter, always on
        if self.engine.slide_count() > 0 {
            let counter = format!("{} / {}", self.engine.cursor() + 1, self.engine.slide_count());
            let color = ResolvedTheme::with_opacity(theme.foreground, 0.3);
            let galley =
                ui.painter()
                    .layout_no_wrap(counter, egui::FontId::monospace(14.0 * scale.max(0.5)), color);
            let pos = egui::pos2(
                rect.right() - galley.rect.width() - 16.0 * scale,
                rect.bottom() - 30.0 * scale,
            );
            ui.painter().galley(pos, galley, color);
        }
    }

    fn draw_help_overlay(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) -> egui::Rect {
        let theme = &self.view.theme;
        let shortcuts = [
            ("\u{2192} / D", "Next slide"),
            ("\u{2190} / A", "Previous slide"),
            ("Click", "Next slide"),
            ("Right click", "Go to slide\u{2026}"),
            ("G", "Go to slide\u{2026}"),
            ("R", "Reload presentation"),
            ("H", "Show this help"),
            ("Esc", "Hide this help"),
        ];

        let bg = ResolvedTheme::with_opacity(theme.code_background, 0.95);
        let text_color = theme.foreground;
        let key_color = theme.accent;

        let padding = 24.0 * scale;
        let line_height = 32.0 * scale;
        let height = shortcuts.len() as f32 * line_height + padding * 2.0 + 40.0 * scale;
        let width = 360.0 * scale;
        let overlay_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(width, height));

        ui.painter().rect_filled(overlay_rect, 12.0 * scale, bg);

        let title_galley = ui.painter().layout_no_wrap(
            "Keyboard Shortcuts".to_string(),
            egui::FontId::proportional(20.0 * scale),
            text_color,
        );
        ui.painter().galley(
            egui::pos2(overlay_rect.left() + padding, overlay_rect.top() + padding),
            title_galley,
            text_color,
        );

        let mut y = overlay_rect.top() + padding + 40.0 * scale;
        for (key, desc) in &shortcuts {
            let key_galley = ui.painter().layout_no_wrap(
                key.to_string(),
                egui::FontId::monospace(15.0 * scale),
                key_color,
            );
            ui.painter().galley(
                egui::pos2(overlay_rect.left() + padding, y),
                key_galley,
                key_color,
            );

            let desc_galley = ui.painter().layout_no_wrap(
                desc.to_string(),
                egui::FontId::proportional(15.0 * scale),
                text_color,
            );
            ui.painter().galley(
                egui::pos2(overlay_rect.left() + padding + 140.0 * scale, y),
                desc_galley,
                text_color,
            );
            y += line_height;
        }

        overlay_rect
    }

    fn draw_toast(&mut self, ui: &egui::Ui, ctx: &egui::Context, rect: egui::Rect, scale: f32) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
        let Some(ref toast) = self.toast else { return };

        let opacity = toast.opacity();
        if opacity <= 0.0 {
            return;
        }
        let theme = &self.view.theme;
        let toast_color = ResolvedTheme::with_opacity(theme.foreground, opacity * 0.9);
        let toast_bg = ResolvedTheme::with_opacity(theme.code_background, opacity * 0.9);
        let galley = ui.painter().layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional(20.0 * scale),
            toast_color,
        );
        let padding = 16.0 * scale;
        let toast_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - galley.rect.width() / 2.0 - padding,
                rect.bottom() - 80.0 * scale,
            ),
            egui::vec2(
                galley.rect.width() + padding * 2.0,
                galley.rect.height() + padding * 2.0,
            ),
        );
        ui.painter().rect_filled(toast_rect, 8.0 * scale, toast_bg);
        ui.painter().galley(
            egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding),
            galley,
            toast_color,
        );
        ctx.request_repaint();
    }
}

/// Scale the texture to cover the whole viewport, cropping the overflow.
fn draw_background_image(
    ui: &egui::Ui,
    ctx: &egui::Context,
    cache: &mut ImageCache,
    reference: &str,
    rect: egui::Rect,
    theme: &ResolvedTheme,
) {
    match cache.get(ctx, reference) {
        Some(texture) => {
            let size = texture.size_vec2();
            let cover = (rect.width() / size.x).max(rect.height() / size.y);
            let image_rect = egui::Rect::from_center_size(rect.center(), size * cover);
            let painter = ui.painter().with_clip_rect(rect);
            painter.image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        None => {
            let galley = ui.painter().layout_no_wrap(
                format!("Could not load image: {reference}"),
                egui::FontId::proportional(20.0),
                theme.footer_color,
            );
            let pos = egui::pos2(
                rect.center().x - galley.rect.width() / 2.0,
                rect.center().y - galley.rect.height() / 2.0,
            );
            ui.painter().galley(pos, galley, theme.footer_color);
        }
    }
}

impl eframe::App for PresenterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Global keys stay out of the way while the jump dialog's text
        // field is open; the dialog handles its own keys.
        if self.jump.is_none() {
            if let Some(action) = self.collect_input(ctx) {
                self.apply_action(action);
            }
        }

        let bg = self.view.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                let scale = Self::compute_scale(rect).max(0.2);

                self.draw_stage(ui, ctx, rect, scale);
                self.draw_chrome(ui, rect, scale);

                if self.view.help_visible {
                    self.last_help_rect = Some(self.draw_help_overlay(ui, rect, scale));
                } else {
                    self.last_help_rect = None;
                }

                self.draw_toast(ui, ctx, rect, scale);
            });

        self.show_jump_dialog(ctx);
    }
}

pub fn run(
    source: Box<dyn DocumentSource>,
    windowed: bool,
    start_slide: Option<usize>,
) -> anyhow::Result<()> {
    let title = format!("deckview \u{2014} {}", source.describe());

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(PresenterApp::new(source, start_slide)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

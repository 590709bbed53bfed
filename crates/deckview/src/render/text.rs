use eframe::egui::{self, Color32, FontFamily, FontId, Pos2, Rect};

use crate::parser::{Block, Inline};
use crate::theme::ResolvedTheme;

/// Create a LayoutJob from inline elements.
pub fn inlines_to_job(
    inlines: &[Inline],
    font_size: f32,
    family: FontFamily,
    color: Color32,
    accent: Color32,
    code_background: Color32,
    max_width: f32,
) -> egui::text::LayoutJob {
    let mut job = egui::text::LayoutJob::default();
    job.wrap.max_width = max_width;
    append_inlines(
        &mut job,
        inlines,
        font_size,
        family,
        color,
        accent,
        code_background,
        false,
        false,
    );
    job
}

#[allow(clippy::too_many_arguments)]
fn append_inlines(
    job: &mut egui::text::LayoutJob,
    inlines: &[Inline],
    font_size: f32,
    family: FontFamily,
    color: Color32,
    accent: Color32,
    code_background: Color32,
    bold: bool,
    italic: bool,
) {
    for inline in inlines {
        match inline {
            Inline::Text(s) => {
                let size = if bold { font_size + 1.0 } else { font_size };
                let format = egui::text::TextFormat {
                    font_id: FontId::new(size, family.clone()),
                    color,
                    italics: italic,
                    ..Default::default()
                };
                job.append(s, 0.0, format);
            }
            Inline::Bold(children) => {
                append_inlines(
                    job,
                    children,
                    font_size,
                    family.clone(),
                    color,
                    accent,
                    code_background,
                    true,
                    italic,
                );
            }
            Inline::Italic(children) => {
                append_inlines(
                    job,
                    children,
                    font_size,
                    family.clone(),
                    color,
                    accent,
                    code_background,
                    bold,
                    true,
                );
            }
            Inline::Code(s) => {
                let format = egui::text::TextFormat {
                    font_id: FontId::new(font_size * 0.85, FontFamily::Monospace),
                    color,
                    background: code_background,
                    ..Default::default()
                };
                job.append(s, 0.0, format);
            }
            Inline::Link { text, .. } => {
                // Link text in accent color; the URL itself is not shown
                append_inlines(
                    job,
                    text,
                    font_size,
                    family.clone(),
                    accent,
                    accent,
                    code_background,
                    bold,
                    italic,
                );
            }
        }
    }
}

/// Layout and paint inlines, returning the height used.
#[allow(clippy::too_many_arguments)]
pub fn draw_inlines(
    ui: &egui::Ui,
    inlines: &[Inline],
    pos: Pos2,
    font_size: f32,
    family: FontFamily,
    color: Color32,
    theme: &ResolvedTheme,
    max_width: f32,
) -> f32 {
    let job = inlines_to_job(
        inlines,
        font_size,
        family,
        color,
        theme.accent,
        theme.code_background,
        max_width,
    );
    let galley = ui.painter().layout_job(job);
    let height = galley.rect.height();
    ui.painter().galley(pos, galley, color);
    height
}

/// Paint a sequence of blocks top-down inside `rect`, returning the total
/// height used. No scrolling: content past the bottom is clipped by the
/// caller's rect.
pub fn draw_blocks(
    ui: &egui::Ui,
    blocks: &[Block],
    theme: &ResolvedTheme,
    rect: Rect,
    scale: f32,
) -> f32 {
    let block_gap = 24.0 * scale;
    let max_width = rect.width();
    let mut y = rect.top();

    for block in blocks {
        let pos = Pos2::new(rect.left(), y);
        let height = match block {
            Block::Heading { level, inlines } => draw_inlines(
                ui,
                inlines,
                pos,
                theme.heading_size(*level) * scale,
                theme.body_family.clone(),
                theme.foreground,
                theme,
                max_width,
            ),
            Block::Paragraph { inlines } => draw_inlines(
                ui,
                inlines,
                pos,
                theme.body_size * scale,
                theme.body_family.clone(),
                theme.foreground,
                theme,
                max_width,
            ),
            Block::List { ordered, items } => {
                draw_list(ui, items, *ordered, theme, pos, max_width, scale)
            }
            Block::CodeBlock { code, .. } => draw_code_block(ui, code, theme, pos, max_width, scale),
        };
        y += height + block_gap;
    }

    y - rect.top()
}

fn draw_list(
    ui: &egui::Ui,
    items: &[Vec<Inline>],
    ordered: bool,
    theme: &ResolvedTheme,
    pos: Pos2,
    max_width: f32,
    scale: f32,
) -> f32 {
    let marker_width = 45.0 * scale;
    let item_spacing = 8.0 * scale;
    let font_size = theme.body_size * scale;
    let mut y_offset = 0.0;

    for (idx, item) in items.iter().enumerate() {
        let marker_text = if ordered {
            format!("{}.", idx + 1)
        } else {
            "\u{2022}".to_string()
        };
        let marker_galley = ui.painter().layout_no_wrap(
            marker_text,
            FontId::new(font_size, theme.body_family.clone()),
            theme.foreground,
        );
        ui.painter().galley(
            Pos2::new(pos.x, pos.y + y_offset),
            marker_galley,
            theme.foreground,
        );

        let item_height = draw_inlines(
            ui,
            item,
            Pos2::new(pos.x + marker_width, pos.y + y_offset),
            font_size,
            theme.body_family.clone(),
            theme.foreground,
            theme,
            max_width - marker_width,
        );
        y_offset += item_height + item_spacing;
    }

    (y_offset - item_spacing).max(0.0)
}

fn draw_code_block(
    ui: &egui::Ui,
    code: &str,
    theme: &ResolvedTheme,
    pos: Pos2,
    max_width: f32,
    scale: f32,
) -> f32 {
    let padding = 16.0 * scale;
    let font = FontId::monospace(theme.code_size * scale);
    let galley = ui
        .painter()
        .layout(code.to_string(), font, theme.foreground, max_width - padding * 2.0);
    let height = galley.rect.height() + padding * 2.0;

    let block_rect = Rect::from_min_size(pos, egui::vec2(max_width, height));
    ui.painter()
        .rect_filled(block_rect, 6.0 * scale, theme.code_background);
    ui.painter().galley(
        Pos2::new(pos.x + padding, pos.y + padding),
        galley,
        theme.foreground,
    );
    height
}

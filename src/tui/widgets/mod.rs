mod header;
mod renderable;

pub use header::{HeaderData, HeaderWidget};
pub use renderable::Renderable;

use crate::palette;
use crate::tui::app::App;
use crate::tui::projection::project;
use crate::tui::transcript::{LayoutOptions, layout_transcript, typing_indicator};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    prelude::Stylize,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Widget},
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const COMPOSER_PLACEHOLDER: &str = "필요한 자재를 말씀해주세요...";
pub const COMPOSER_WAITING: &str = "답변을 기다리는 중...";
pub const SIDEBAR_TITLE: &str = "Context Info";
pub const SIDEBAR_WIDTH: u16 = 30;

pub struct ChatWidget {
    content_area: Rect,
    lines: Vec<Line<'static>>,
}

impl ChatWidget {
    pub fn new(app: &mut App, area: Rect) -> Self {
        let content_area = area;
        let visible_lines = content_area.height as usize;

        let layout = {
            let view = project(&app.session);
            let options = LayoutOptions {
                width: content_area.width.max(1),
                assistant_name: &app.assistant_name,
                focus: app.focus,
                typing_frame: typing_indicator(app.session.pending_since()),
                selection_bg: app.ui_theme.selection_bg,
            };
            layout_transcript(&view, &options)
        };
        let total_lines = layout.lines.len();

        if app.pending_scroll_delta != 0 {
            app.transcript_scroll = app.transcript_scroll.scrolled_by(
                app.pending_scroll_delta,
                total_lines,
                visible_lines,
            );
            app.pending_scroll_delta = 0;
        }

        let max_start = total_lines.saturating_sub(visible_lines);
        let top = app.transcript_scroll.resolve_top(max_start);

        app.last_transcript_area = Some(content_area);
        app.last_transcript_top = top;
        app.last_transcript_visible = visible_lines;
        app.last_transcript_total = total_lines;
        app.last_transcript_padding_top = 0;
        app.last_hits = layout.hits;

        let end = (top + visible_lines).min(total_lines);
        let mut lines = if total_lines == 0 {
            vec![Line::from("")]
        } else {
            layout.lines[top..end].to_vec()
        };

        if app.transcript_scroll.is_following() {
            app.last_transcript_padding_top = visible_lines.saturating_sub(lines.len());
            pad_lines_to_bottom(&mut lines, visible_lines);
        }

        Self {
            content_area,
            lines,
        }
    }
}

impl Renderable for ChatWidget {
    fn render(&self, _area: Rect, buf: &mut Buffer) {
        let paragraph = Paragraph::new(self.lines.clone());
        paragraph.render(self.content_area, buf);
    }

    fn desired_height(&self, _width: u16) -> u16 {
        1
    }
}

pub struct ComposerWidget<'a> {
    app: &'a App,
    prompt: &'a str,
    max_height: u16,
}

impl<'a> ComposerWidget<'a> {
    pub fn new(app: &'a App, prompt: &'a str, max_height: u16) -> Self {
        Self {
            app,
            prompt,
            max_height,
        }
    }

    fn prompt_style(&self) -> Style {
        if self.app.session.can_submit() {
            Style::default().fg(palette::BRAND_SKY).bold()
        } else {
            Style::default().fg(palette::TEXT_MUTED)
        }
    }
}

impl Renderable for ComposerWidget<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let input = self.app.session.draft();
        let prompt_width = self.prompt.width();
        let prompt_width_u16 = u16::try_from(prompt_width).unwrap_or(u16::MAX);
        let content_width = usize::from(area.width.saturating_sub(prompt_width_u16).max(1));
        let max_height = usize::from(area.height).max(1);
        let continuation = " ".repeat(prompt_width);

        let (visible_lines, _cursor_row, _cursor_col) =
            layout_input(input, self.app.cursor_position, content_width, max_height);

        let background = Style::default().bg(self.app.ui_theme.composer_bg);
        let block = Block::default().style(background);
        block.render(area, buf);

        let mut lines = Vec::new();
        if input.is_empty() {
            let placeholder = if self.app.session.is_pending() {
                COMPOSER_WAITING
            } else {
                COMPOSER_PLACEHOLDER
            };
            lines.push(Line::from(vec![
                Span::styled(self.prompt, self.prompt_style()),
                Span::styled(
                    placeholder,
                    Style::default().fg(palette::TEXT_MUTED).italic(),
                ),
            ]));
        } else {
            for (idx, line) in visible_lines.iter().enumerate() {
                let prefix = if idx == 0 {
                    self.prompt
                } else {
                    continuation.as_str()
                };
                lines.push(Line::from(vec![
                    Span::styled(prefix, self.prompt_style()),
                    Span::styled(line.clone(), Style::default().fg(palette::TEXT_PRIMARY)),
                ]));
            }
        }

        let paragraph = Paragraph::new(lines).style(background);
        paragraph.render(area, buf);
    }

    fn desired_height(&self, width: u16) -> u16 {
        composer_height(
            self.app.session.draft(),
            width,
            self.max_height,
            self.prompt,
            0,
        )
    }

    fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        // The transcript owns keyboard focus while a target is selected.
        if self.app.focus.is_some() {
            return None;
        }
        let prompt_width = self.prompt.width();
        let prompt_width_u16 = u16::try_from(prompt_width).unwrap_or(u16::MAX);
        let content_width = usize::from(area.width.saturating_sub(prompt_width_u16).max(1));
        let max_height = usize::from(area.height).max(1);

        let (_visible_lines, cursor_row, cursor_col) = layout_input(
            self.app.session.draft(),
            self.app.cursor_position,
            content_width,
            max_height,
        );

        let cursor_x = area
            .x
            .saturating_add(prompt_width_u16)
            .saturating_add(u16::try_from(cursor_col).unwrap_or(u16::MAX));
        let cursor_y = area
            .y
            .saturating_add(u16::try_from(cursor_row).unwrap_or(u16::MAX));
        if cursor_x < area.x + area.width && cursor_y < area.y + area.height {
            Some((cursor_x, cursor_y))
        } else {
            None
        }
    }
}

/// Static context panel listing the featured products.
pub struct SidebarWidget<'a> {
    items: &'a [String],
}

impl<'a> SidebarWidget<'a> {
    pub fn new(items: &'a [String]) -> Self {
        Self { items }
    }
}

impl Renderable for SidebarWidget<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let inner_width = usize::from(area.width.saturating_sub(4)).max(1);
        let lines: Vec<Line<'static>> = self
            .items
            .iter()
            .map(|item| {
                Line::from(vec![
                    Span::styled("• ", Style::default().fg(palette::BRAND_SKY)),
                    Span::styled(
                        truncate_line_to_width(item, inner_width.saturating_sub(2).max(1)),
                        Style::default().fg(palette::TEXT_SECONDARY),
                    ),
                ])
            })
            .collect();

        let block = Block::default()
            .title(Line::from(Span::styled(
                format!(" {SIDEBAR_TITLE} "),
                Style::default().fg(palette::BRAND_BLUE).bold(),
            )))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette::BORDER_COLOR))
            .padding(Padding::horizontal(1));

        Paragraph::new(lines).block(block).render(area, buf);
    }

    fn desired_height(&self, _width: u16) -> u16 {
        u16::try_from(self.items.len() + 2).unwrap_or(u16::MAX)
    }
}

pub(crate) fn pad_lines_to_bottom(lines: &mut Vec<Line<'static>>, height: usize) {
    if lines.len() >= height {
        return;
    }
    let padding = height.saturating_sub(lines.len());
    if padding == 0 {
        return;
    }

    let mut padded = Vec::with_capacity(height);
    padded.extend(std::iter::repeat_n(Line::from(""), padding));
    padded.append(lines);
    *lines = padded;
}

pub(crate) fn truncate_line_to_width(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return text.chars().take(max_width).collect();
    }

    let mut out = String::new();
    let mut width = 0usize;
    let limit = max_width.saturating_sub(3);
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > limit {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out.push_str("...");
    out
}

fn composer_height(
    input: &str,
    width: u16,
    available_height: u16,
    prompt: &str,
    extra_lines: usize,
) -> u16 {
    let prompt_width = prompt.width();
    let prompt_width_u16 = u16::try_from(prompt_width).unwrap_or(u16::MAX);
    let content_width = usize::from(width.saturating_sub(prompt_width_u16).max(1));
    let (end_row, _) = cursor_row_col(input, input.chars().count(), content_width);
    let mut line_count = wrap_input_lines(input, content_width)
        .len()
        .max(end_row + 1);
    line_count = line_count.saturating_add(extra_lines);
    let max_height = usize::from(available_height.clamp(1, 8));
    line_count.clamp(1, max_height).try_into().unwrap_or(1)
}

fn layout_input(
    input: &str,
    cursor: usize,
    width: usize,
    max_height: usize,
) -> (Vec<String>, usize, usize) {
    let mut lines = wrap_input_lines(input, width);
    let (cursor_row, cursor_col) = cursor_row_col(input, cursor, width.max(1));
    // A cursor just past a full row sits on a row of its own.
    while lines.len() <= cursor_row {
        lines.push(String::new());
    }

    let max_height = max_height.max(1);
    let mut start = 0usize;
    if cursor_row >= max_height {
        start = cursor_row + 1 - max_height;
    }
    if start + max_height > lines.len() {
        start = lines.len().saturating_sub(max_height);
    }
    let visible = lines
        .into_iter()
        .skip(start)
        .take(max_height)
        .collect::<Vec<_>>();
    let visible_cursor_row = cursor_row.saturating_sub(start);

    (
        visible,
        visible_cursor_row,
        cursor_col.min(width.saturating_sub(1)),
    )
}

fn cursor_row_col(input: &str, cursor: usize, width: usize) -> (usize, usize) {
    let mut row = 0usize;
    let mut col = 0usize;
    let mut char_idx = 0usize;

    for grapheme in input.graphemes(true) {
        if char_idx >= cursor {
            break;
        }
        let grapheme_chars = grapheme.chars().count();
        let next_char_idx = char_idx.saturating_add(grapheme_chars);
        let cursor_inside = cursor < next_char_idx;

        if grapheme == "\n" {
            row += 1;
            col = 0;
            char_idx = next_char_idx;
            if cursor_inside {
                break;
            }
            continue;
        }

        let grapheme_width = grapheme.width();
        if col + grapheme_width > width && col != 0 {
            row += 1;
            col = 0;
        }
        col += grapheme_width;
        if col >= width {
            row += 1;
            col = 0;
        }
        if cursor_inside {
            break;
        }
        char_idx = next_char_idx;
    }

    (row, col)
}

/// Wrap multi-line text to `width` display columns, keeping blank lines.
pub(crate) fn wrap_input_lines(input: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if input.is_empty() {
        return lines;
    }

    // split('\n') already yields the trailing empty line for "a\n".
    for raw in input.split('\n') {
        let wrapped = wrap_text(raw, width);
        if wrapped.is_empty() {
            lines.push(String::new());
        } else {
            lines.extend(wrapped);
        }
    }

    lines
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for grapheme in text.graphemes(true) {
        let grapheme_width = grapheme.width();
        if current_width + grapheme_width > width && current_width != 0 {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        current.push_str(grapheme);
        current_width += grapheme_width;
    }

    lines.push(current);
    lines
}

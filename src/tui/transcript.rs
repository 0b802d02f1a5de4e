//! Lays a [`TranscriptView`] out as styled terminal lines, recording where
//! each activatable target landed so mouse clicks can be mapped back.

use std::time::Instant;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

use crate::core::store::{MessageId, Role};
use crate::palette;

use super::projection::{Target, ThoughtView, TranscriptRow, TranscriptView};
use super::widgets::{truncate_line_to_width, wrap_input_lines};

const INDENT: &str = "  ";
const THOUGHT_GUTTER: &str = "  │ ";
pub const THOUGHT_SHOW_LABEL: &str = "AI 사고 과정 보기";
pub const THOUGHT_HIDE_LABEL: &str = "AI 사고 과정 숨기기";

/// Braille frames for the typing indicator.
const TYPING_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Returns the typing indicator frame based on elapsed time.
#[must_use]
pub fn typing_indicator(start: Option<Instant>) -> &'static str {
    let elapsed_ms = start.map_or(0, |t| t.elapsed().as_millis());
    let idx = ((elapsed_ms / 80) as usize) % TYPING_FRAMES.len();
    TYPING_FRAMES[idx]
}

/// Screen span of one activatable target, in transcript line coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRegion {
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
    pub target: Target,
}

impl HitRegion {
    #[must_use]
    pub fn contains(&self, line: usize, col: usize) -> bool {
        self.line == line && col >= self.start_col && col < self.end_col
    }
}

#[derive(Debug, Clone, Default)]
pub struct TranscriptLayout {
    pub lines: Vec<Line<'static>>,
    pub hits: Vec<HitRegion>,
}

pub struct LayoutOptions<'a> {
    pub width: u16,
    pub assistant_name: &'a str,
    pub focus: Option<Target>,
    pub typing_frame: &'a str,
    pub selection_bg: Color,
}

#[must_use]
pub fn layout_transcript(view: &TranscriptView<'_>, options: &LayoutOptions<'_>) -> TranscriptLayout {
    let mut out = TranscriptLayout::default();
    let width = usize::from(options.width.max(1));

    for (idx, row) in view.rows.iter().enumerate() {
        if idx > 0 {
            out.lines.push(Line::from(""));
        }
        match row {
            TranscriptRow::Message {
                id,
                message,
                thought,
                tags,
            } => {
                push_author(&mut out, message.role(), options.assistant_name);
                push_body(&mut out, message.content(), width);
                if let Some(thought) = thought {
                    push_thought(&mut out, *thought, Target::Disclosure(*id), options, width);
                }
                if !tags.is_empty() {
                    push_tags(&mut out, *id, tags, options, width);
                }
            }
            TranscriptRow::Typing => {
                out.lines.push(Line::from(vec![
                    Span::styled(
                        options.assistant_name.to_string(),
                        Style::default()
                            .fg(palette::BRAND_BLUE)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::styled(
                        options.typing_frame.to_string(),
                        Style::default().fg(palette::BRAND_SKY),
                    ),
                    Span::styled(" typing...", Style::default().fg(palette::TEXT_MUTED)),
                ]));
            }
        }
    }

    out
}

fn push_author(out: &mut TranscriptLayout, role: Role, assistant_name: &str) {
    let span = match role {
        Role::User => Span::styled(
            "You",
            Style::default()
                .fg(palette::BRAND_SKY)
                .add_modifier(Modifier::BOLD),
        ),
        Role::Assistant => Span::styled(
            assistant_name.to_string(),
            Style::default()
                .fg(palette::BRAND_BLUE)
                .add_modifier(Modifier::BOLD),
        ),
    };
    out.lines.push(Line::from(span));
}

fn push_body(out: &mut TranscriptLayout, content: &str, width: usize) {
    let content_width = width.saturating_sub(INDENT.width()).max(1);
    for line in wrap_input_lines(content, content_width) {
        out.lines.push(Line::from(vec![
            Span::raw(INDENT),
            Span::styled(line, Style::default().fg(palette::TEXT_PRIMARY)),
        ]));
    }
}

fn push_thought(
    out: &mut TranscriptLayout,
    thought: ThoughtView<'_>,
    target: Target,
    options: &LayoutOptions<'_>,
    width: usize,
) {
    let (marker, label) = if thought.open {
        ("▾ ", THOUGHT_HIDE_LABEL)
    } else {
        ("▸ ", THOUGHT_SHOW_LABEL)
    };
    let text = truncate_line_to_width(
        &format!("{marker}{label}"),
        width.saturating_sub(INDENT.width()).max(1),
    );
    let mut style = Style::default().fg(palette::TEXT_HINT);
    if options.focus == Some(target) {
        style = style
            .fg(palette::SELECTION_TEXT)
            .bg(options.selection_bg);
    }
    let start_col = INDENT.width();
    out.hits.push(HitRegion {
        line: out.lines.len(),
        start_col,
        end_col: start_col + text.width(),
        target,
    });
    out.lines
        .push(Line::from(vec![Span::raw(INDENT), Span::styled(text, style)]));

    if thought.open {
        let thought_width = width.saturating_sub(THOUGHT_GUTTER.width()).max(1);
        for line in wrap_input_lines(thought.text, thought_width) {
            out.lines.push(Line::from(vec![
                Span::styled(THOUGHT_GUTTER, Style::default().fg(palette::TEXT_MUTED)),
                Span::styled(
                    line,
                    Style::default()
                        .fg(palette::TEXT_DIM)
                        .add_modifier(Modifier::ITALIC),
                ),
            ]));
        }
    }
}

fn push_tags(
    out: &mut TranscriptLayout,
    message: MessageId,
    tags: &[String],
    options: &LayoutOptions<'_>,
    width: usize,
) {
    let indent_width = INDENT.width();
    let max_chip = width.saturating_sub(indent_width).max(1);
    let mut spans: Vec<Span<'static>> = vec![Span::raw(INDENT)];
    let mut col = indent_width;

    for (index, tag) in tags.iter().enumerate() {
        let target = Target::Tag { message, index };
        let chip = truncate_line_to_width(&format!("[#{tag}]"), max_chip);
        let chip_width = chip.width();
        let gap = usize::from(col > indent_width);

        if col > indent_width && col + gap + chip_width > width {
            out.lines.push(Line::from(std::mem::take(&mut spans)));
            spans.push(Span::raw(INDENT));
            col = indent_width;
        } else if gap == 1 {
            spans.push(Span::raw(" "));
            col += 1;
        }

        let style = if options.focus == Some(target) {
            Style::default()
                .fg(palette::SELECTION_TEXT)
                .bg(options.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette::BRAND_SKY)
        };
        out.hits.push(HitRegion {
            line: out.lines.len(),
            start_col: col,
            end_col: col + chip_width,
            target,
        });
        spans.push(Span::styled(chip, style));
        col += chip_width;
    }

    out.lines.push(Line::from(spans));
}

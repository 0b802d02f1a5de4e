use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, layout::Rect};
use std::fmt;

use crate::palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    None,
    Close,
}

pub trait ModalView {
    fn kind(&self) -> ModalKind;
    fn handle_key(&mut self, key: KeyEvent) -> ViewAction;
    fn render(&self, area: Rect, buf: &mut Buffer);
}

#[derive(Default)]
pub struct ViewStack {
    views: Vec<Box<dyn ModalView>>,
}

impl ViewStack {
    pub fn new() -> Self {
        Self { views: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn top_kind(&self) -> Option<ModalKind> {
        self.views.last().map(|view| view.kind())
    }

    pub fn push<V: ModalView + 'static>(&mut self, view: V) {
        self.views.push(Box::new(view));
    }

    pub fn pop(&mut self) -> Option<Box<dyn ModalView>> {
        self.views.pop()
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        for view in &self.views {
            view.render(area, buf);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let action = self
            .views
            .last_mut()
            .map_or(ViewAction::None, |view| view.handle_key(key));
        if action == ViewAction::Close {
            self.views.pop();
        }
    }
}

impl fmt::Debug for ViewStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewStack")
            .field("len", &self.views.len())
            .field("top", &self.top_kind())
            .finish()
    }
}

pub struct HelpView {
    scroll: usize,
}

impl HelpView {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }
}

impl ModalView for HelpView {
    fn kind(&self) -> ModalKind {
        ModalKind::Help
    }

    fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
        use crossterm::event::KeyCode;

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => ViewAction::Close,
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                ViewAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                ViewAction::None
            }
            _ => ViewAction::None,
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        use ratatui::{
            prelude::Stylize,
            style::Style,
            text::{Line, Span},
            widgets::{Block, Borders, Clear, Paragraph, Widget},
        };

        let popup_width = 64.min(area.width.saturating_sub(4));
        let popup_height = 26.min(area.height.saturating_sub(4));

        let popup_area = Rect {
            x: area.width.saturating_sub(popup_width) / 2,
            y: area.height.saturating_sub(popup_height) / 2,
            width: popup_width,
            height: popup_height,
        };

        Clear.render(popup_area, buf);

        let section = |title: &'static str| {
            Line::from(vec![Span::styled(
                title,
                Style::default().fg(palette::BRAND_SKY).bold(),
            )])
        };

        let help_lines: Vec<Line> = vec![
            section("=== Conversation ==="),
            Line::from("  Enter             - Send message"),
            Line::from("  Shift/Alt+Enter   - Insert newline (also Ctrl+J)"),
            Line::from("  Ctrl+U            - Clear the message draft"),
            Line::from("  Left / Right      - Move cursor"),
            Line::from("  Ctrl+A / Ctrl+E   - Jump to start / end of draft"),
            Line::from(""),
            section("=== Suggestions ==="),
            Line::from("  Tab / Shift+Tab   - Select next / previous tag or toggle"),
            Line::from("  Enter / Space     - Activate the selection"),
            Line::from("  Esc               - Return to the composer"),
            Line::from("  Click             - Activate a tag or reasoning toggle"),
            Line::from(""),
            section("=== Navigation ==="),
            Line::from("  Alt+Up / Alt+Down - Scroll transcript"),
            Line::from("  PageUp / PageDown - Scroll transcript by page"),
            Line::from("  Home              - Jump to the first message"),
            Line::from("  End               - Follow newest message"),
            Line::from("  Scroll wheel      - Scroll transcript"),
            Line::from(""),
            section("=== Window ==="),
            Line::from("  F1                - Toggle this help view"),
            Line::from("  F2                - Toggle the context panel"),
            Line::from("  Ctrl+C            - Exit"),
            Line::from("  Ctrl+D            - Exit when the draft is empty"),
        ];

        let total_lines = help_lines.len();
        let visible_lines = (popup_height as usize).saturating_sub(2);
        let max_scroll = total_lines.saturating_sub(visible_lines);
        let scroll = self.scroll.min(max_scroll);

        let scroll_indicator = if total_lines > visible_lines {
            format!(" [{}/{} ↑↓] ", scroll + 1, max_scroll + 1)
        } else {
            String::new()
        };

        let help = Paragraph::new(help_lines)
            .block(
                Block::default()
                    .title(Line::from(vec![Span::styled(
                        " Help ",
                        Style::default().fg(palette::BRAND_BLUE).bold(),
                    )]))
                    .title_bottom(Line::from(vec![
                        Span::styled(" Esc to close ", Style::default().fg(palette::TEXT_MUTED)),
                        Span::styled(scroll_indicator, Style::default().fg(palette::BRAND_SKY)),
                    ]))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette::BORDER_COLOR))
                    .style(Style::default().bg(palette::BRAND_INK)),
            )
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));

        help.render(popup_area, buf);
    }
}

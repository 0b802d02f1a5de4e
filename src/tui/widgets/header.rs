//! Header bar widget displaying the assistant name, endpoint and turn state.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::palette;

use super::{Renderable, truncate_line_to_width};

const ENDPOINT_MAX_WIDTH: usize = 40;

/// Data required to render the header bar.
pub struct HeaderData<'a> {
    pub assistant_name: &'a str,
    pub endpoint: &'a str,
    pub is_pending: bool,
    pub background: Color,
}

impl<'a> HeaderData<'a> {
    #[must_use]
    pub fn new(
        assistant_name: &'a str,
        endpoint: &'a str,
        is_pending: bool,
        background: Color,
    ) -> Self {
        Self {
            assistant_name,
            endpoint,
            is_pending,
            background,
        }
    }
}

/// Header bar widget (1 line height).
///
/// Layout: `assistant-name  endpoint | [state]`
pub struct HeaderWidget<'a> {
    data: HeaderData<'a>,
}

impl<'a> HeaderWidget<'a> {
    #[must_use]
    pub fn new(data: HeaderData<'a>) -> Self {
        Self { data }
    }

    fn name_span(&self) -> Span<'static> {
        Span::styled(
            format!(" {} ", self.data.assistant_name),
            Style::default()
                .fg(palette::BRAND_BLUE)
                .add_modifier(Modifier::BOLD),
        )
    }

    fn endpoint_span(&self) -> Span<'static> {
        Span::styled(
            truncate_line_to_width(self.data.endpoint, ENDPOINT_MAX_WIDTH),
            Style::default().fg(palette::TEXT_MUTED),
        )
    }

    fn state_span(&self) -> Span<'static> {
        if self.data.is_pending {
            Span::styled(
                " answering... ",
                Style::default()
                    .fg(palette::BRAND_SKY)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(" ready ", Style::default().fg(palette::STATUS_SUCCESS))
        }
    }
}

impl Renderable for HeaderWidget<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let name = self.name_span();
        let endpoint = self.endpoint_span();
        let state = self.state_span();

        let name_width = name.content.width();
        let endpoint_width = endpoint.content.width();
        let state_width = state.content.width();
        let available = usize::from(area.width);

        let mut spans = Vec::new();
        if available >= name_width + endpoint_width + state_width {
            let padding = available - name_width - endpoint_width - state_width;
            spans.push(name);
            spans.push(endpoint);
            spans.push(Span::raw(" ".repeat(padding)));
            spans.push(state);
        } else if available >= name_width + state_width {
            let padding = available - name_width - state_width;
            spans.push(name);
            spans.push(Span::raw(" ".repeat(padding)));
            spans.push(state);
        } else {
            spans.push(Span::styled(
                truncate_line_to_width(self.data.assistant_name, available),
                Style::default()
                    .fg(palette::BRAND_BLUE)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let paragraph =
            Paragraph::new(Line::from(spans)).style(Style::default().bg(self.data.background));
        paragraph.render(area, buf);
    }

    fn desired_height(&self, _width: u16) -> u16 {
        1
    }
}

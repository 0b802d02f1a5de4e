//! Application state for the sales-assistant TUI.

use ratatui::layout::Rect;

use crate::client::ClientError;
use crate::core::events::Event;
use crate::core::session::Session;
use crate::core::turn::{TurnResolution, TurnTicket};
use crate::palette::{self, UiTheme};
use crate::tui::projection::{Target, project};
use crate::tui::scrolling::TranscriptScroll;
use crate::tui::transcript::HitRegion;
use crate::tui::views::ViewStack;

fn char_count(text: &str) -> usize {
    text.chars().count()
}

fn byte_index_at_char(text: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(idx, _)| idx)
}

fn remove_char_at(text: &mut String, char_index: usize) -> bool {
    let start = byte_index_at_char(text, char_index);
    let Some(ch) = text[start..].chars().next() else {
        return false;
    };
    let end = start + ch.len_utf8();
    text.replace_range(start..end, "");
    true
}

fn normalize_paste_text(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "")
    } else {
        text.to_string()
    }
}

/// Configuration required to bootstrap the TUI.
#[derive(Debug, Clone)]
pub struct TuiOptions {
    pub assistant_name: String,
    pub endpoint: String,
    pub sidebar_items: Vec<String>,
    pub theme: String,
    /// Use the alternate screen buffer (fullscreen TUI).
    pub use_alt_screen: bool,
}

/// Global UI state for the TUI.
pub struct App {
    pub session: Session,
    /// Cursor position in the draft, in chars.
    pub cursor_position: usize,
    pub assistant_name: String,
    pub endpoint: String,
    pub sidebar_items: Vec<String>,
    pub show_sidebar: bool,
    pub ui_theme: UiTheme,
    /// Transcript target holding keyboard focus; `None` means the composer.
    pub focus: Option<Target>,
    pub status_message: Option<String>,
    pub needs_redraw: bool,
    pub transcript_scroll: TranscriptScroll,
    pub pending_scroll_delta: i32,
    pub last_transcript_area: Option<Rect>,
    pub last_transcript_top: usize,
    pub last_transcript_visible: usize,
    pub last_transcript_total: usize,
    pub last_transcript_padding_top: usize,
    pub last_hits: Vec<HitRegion>,
    pub view_stack: ViewStack,
    seen_entries: usize,
}

impl App {
    pub fn new(options: TuiOptions) -> Self {
        let session = Session::new();
        let seen_entries = session.entries().len();
        Self {
            session,
            cursor_position: 0,
            assistant_name: options.assistant_name,
            endpoint: options.endpoint,
            sidebar_items: options.sidebar_items,
            show_sidebar: true,
            ui_theme: palette::ui_theme(&options.theme),
            focus: None,
            status_message: None,
            needs_redraw: true,
            transcript_scroll: TranscriptScroll::ToBottom,
            pending_scroll_delta: 0,
            last_transcript_area: None,
            last_transcript_top: 0,
            last_transcript_visible: 0,
            last_transcript_total: 0,
            last_transcript_padding_top: 0,
            last_hits: Vec::new(),
            view_stack: ViewStack::new(),
            seen_entries,
        }
    }

    /// Drop cached layout after the terminal dimensions change.
    pub fn handle_resize(&mut self, _width: u16, _height: u16) {
        self.transcript_scroll = TranscriptScroll::ToBottom;
        self.pending_scroll_delta = 0;
        self.last_transcript_area = None;
        self.last_transcript_top = 0;
        self.last_transcript_visible = 0;
        self.last_transcript_total = 0;
        self.last_transcript_padding_top = 0;
        self.last_hits.clear();
        self.needs_redraw = true;
    }

    // === Draft editing ===

    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let draft = self.session.draft_mut();
        let cursor = self.cursor_position.min(char_count(draft));
        let byte_index = byte_index_at_char(draft, cursor);
        draft.insert_str(byte_index, text);
        self.cursor_position = cursor + char_count(text);
        self.needs_redraw = true;
    }

    pub fn insert_paste_text(&mut self, text: &str) {
        let normalized = normalize_paste_text(text);
        if !normalized.is_empty() {
            self.focus = None;
            self.insert_str(&normalized);
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let draft = self.session.draft_mut();
        let cursor = self.cursor_position.min(char_count(draft));
        let byte_index = byte_index_at_char(draft, cursor);
        draft.insert(byte_index, c);
        self.cursor_position = cursor + 1;
        self.needs_redraw = true;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let target = self.cursor_position.saturating_sub(1);
        if remove_char_at(self.session.draft_mut(), target) {
            self.cursor_position = target;
            self.needs_redraw = true;
        }
    }

    pub fn delete_char_forward(&mut self) {
        let target = self.cursor_position;
        let draft = self.session.draft_mut();
        if draft.is_empty() {
            return;
        }
        if !remove_char_at(draft, target) {
            self.cursor_position = char_count(draft);
        }
        self.needs_redraw = true;
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
        self.needs_redraw = true;
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < char_count(self.session.draft()) {
            self.cursor_position += 1;
            self.needs_redraw = true;
        }
    }

    pub fn move_cursor_start(&mut self) {
        self.cursor_position = 0;
        self.needs_redraw = true;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = char_count(self.session.draft());
        self.needs_redraw = true;
    }

    pub fn clear_input(&mut self) {
        self.session.draft_mut().clear();
        self.cursor_position = 0;
        self.needs_redraw = true;
    }

    // === Scrolling ===

    pub fn scroll_up(&mut self, amount: usize) {
        let delta = i32::try_from(amount).unwrap_or(i32::MAX);
        self.pending_scroll_delta = self.pending_scroll_delta.saturating_sub(delta);
        self.needs_redraw = true;
    }

    pub fn scroll_down(&mut self, amount: usize) {
        let delta = i32::try_from(amount).unwrap_or(i32::MAX);
        self.pending_scroll_delta = self.pending_scroll_delta.saturating_add(delta);
        self.needs_redraw = true;
    }

    pub fn scroll_to_top(&mut self) {
        self.transcript_scroll = TranscriptScroll::Pinned { top: 0 };
        self.pending_scroll_delta = 0;
        self.needs_redraw = true;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.transcript_scroll = TranscriptScroll::ToBottom;
        self.pending_scroll_delta = 0;
        self.needs_redraw = true;
    }

    /// Follow the newest line whenever the store has grown since last seen.
    fn sync_after_store_change(&mut self) {
        let len = self.session.entries().len();
        if len > self.seen_entries {
            self.seen_entries = len;
            self.scroll_to_bottom();
        }
    }

    // === Turns ===

    /// Submit the composer draft. The draft is kept when not admitted.
    pub fn submit_draft(&mut self) -> Option<TurnTicket> {
        let text = self.session.draft().to_string();
        let ticket = self.session.begin_turn(&text)?;
        self.cursor_position = 0;
        self.focus = None;
        self.status_message = None;
        self.sync_after_store_change();
        Some(ticket)
    }

    /// Activate a transcript target. Tags may start a turn.
    pub fn activate(&mut self, target: Target) -> Option<TurnTicket> {
        match target {
            Target::Disclosure(id) => {
                // Expanding a trace must not move the viewport. A transcript
                // that fits stays bottom-anchored, so only pin when it overflows.
                if self.transcript_scroll.is_following()
                    && self.last_transcript_area.is_some()
                    && self.last_transcript_total > self.last_transcript_visible
                {
                    self.transcript_scroll = TranscriptScroll::Pinned {
                        top: self.last_transcript_top,
                    };
                }
                self.session.toggle_disclosure(id);
                self.needs_redraw = true;
                None
            }
            Target::Tag { message, index } => {
                let ticket = self.session.begin_tag_turn(message, index)?;
                self.cursor_position = 0;
                self.focus = None;
                self.status_message = None;
                self.sync_after_store_change();
                Some(ticket)
            }
        }
    }

    pub fn apply_engine_event(&mut self, event: Event) -> TurnResolution {
        let Event::TurnComplete { turn_id, result } = event;
        let failure_kind = result.as_ref().err().map(ClientError::kind);
        let resolution = self.session.finish_turn(turn_id, result);
        if resolution == TurnResolution::Fallback
            && let Some(kind) = failure_kind
        {
            self.status_message = Some(format!("Request failed ({kind})"));
        }
        if !self.focus.is_some_and(|focus| self.targets().contains(&focus)) {
            self.focus = None;
        }
        self.sync_after_store_change();
        self.needs_redraw = true;
        resolution
    }

    // === Focus ===

    #[must_use]
    pub fn targets(&self) -> Vec<Target> {
        project(&self.session).targets()
    }

    pub fn focus_next(&mut self) {
        self.focus = step_focus(&self.targets(), self.focus, true);
        self.needs_redraw = true;
    }

    pub fn focus_prev(&mut self) {
        self.focus = step_focus(&self.targets(), self.focus, false);
        self.needs_redraw = true;
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
        self.needs_redraw = true;
    }

    /// Map a terminal cell to the transcript target drawn there.
    #[must_use]
    pub fn hit_at(&self, column: u16, row: u16) -> Option<Target> {
        let area = self.last_transcript_area?;
        if column < area.x
            || column >= area.x + area.width
            || row < area.y
            || row >= area.y + area.height
        {
            return None;
        }
        let row = usize::from(row - area.y);
        if row < self.last_transcript_padding_top {
            return None;
        }
        let line = self.last_transcript_top + row - self.last_transcript_padding_top;
        let col = usize::from(column - area.x);
        self.last_hits
            .iter()
            .find(|hit| hit.contains(line, col))
            .map(|hit| hit.target)
    }

    pub fn toggle_sidebar(&mut self) {
        self.show_sidebar = !self.show_sidebar;
        self.needs_redraw = true;
    }
}

fn step_focus(targets: &[Target], current: Option<Target>, forward: bool) -> Option<Target> {
    if targets.is_empty() {
        return None;
    }
    let position = current.and_then(|focus| targets.iter().position(|t| *t == focus));
    let next = match (position, forward) {
        (None, true) => 0,
        (None, false) => targets.len() - 1,
        (Some(idx), true) => (idx + 1) % targets.len(),
        (Some(idx), false) => (idx + targets.len() - 1) % targets.len(),
    };
    Some(targets[next])
}

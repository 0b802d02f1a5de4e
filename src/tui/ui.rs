//! TUI event loop and rendering logic for the sales-assistant client.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::client::{ClientError, HttpAssistantClient};
use crate::config::Config;
use crate::core::engine::{EngineHandle, spawn_engine};
use crate::core::events::Event as EngineEvent;
use crate::core::ops::Op;
use crate::core::turn::TurnTicket;
use crate::logging;
use crate::palette;

use super::app::{App, TuiOptions};
use super::transcript::typing_indicator;
use super::views::{HelpView, ModalKind};
use super::widgets::{
    ChatWidget, ComposerWidget, HeaderData, HeaderWidget, Renderable, SIDEBAR_WIDTH,
    SidebarWidget, truncate_line_to_width,
};

// === Constants ===

const PROMPT: &str = "> ";
const MOUSE_SCROLL_LINES: usize = 3;
/// Narrowest terminal that still shows the context panel.
const SIDEBAR_MIN_TERMINAL_WIDTH: u16 = 80;

/// What the loop should do after a key or mouse event.
#[derive(Debug, PartialEq, Eq)]
enum LoopAction {
    Continue,
    Dispatch(TurnTicket),
    Quit,
}

/// Run the interactive TUI event loop.
pub async fn run_tui(config: &Config, options: TuiOptions) -> Result<()> {
    let client = HttpAssistantClient::new(config)?;
    let engine_handle = spawn_engine(Arc::new(client));

    let use_alt_screen = options.use_alt_screen;
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if use_alt_screen {
        execute!(stdout, EnterAlternateScreen)?;
    }
    execute!(stdout, EnableBracketedPaste, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(options);
    logging::info(format!("TUI started against {}", app.endpoint));

    let result = run_event_loop(&mut terminal, &mut app, engine_handle).await;

    disable_raw_mode()?;
    if use_alt_screen {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    engine_handle: EngineHandle,
) -> Result<()> {
    loop {
        {
            let mut rx = engine_handle.rx_event.write().await;
            while let Ok(event) = rx.try_recv() {
                app.apply_engine_event(event);
            }
        }

        terminal.draw(|f| render(f, app))?;
        app.needs_redraw = false;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }

        let action = match event::read()? {
            Event::Paste(text) => {
                app.insert_paste_text(&text);
                LoopAction::Continue
            }
            Event::Resize(width, height) => {
                terminal.clear()?;
                app.handle_resize(width, height);
                LoopAction::Continue
            }
            Event::Mouse(mouse) => handle_mouse_event(app, mouse),
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
            _ => LoopAction::Continue,
        };

        match action {
            LoopAction::Continue => {}
            LoopAction::Dispatch(ticket) => dispatch_turn(app, &engine_handle, ticket).await,
            LoopAction::Quit => {
                let _ = engine_handle.send(Op::Shutdown).await;
                return Ok(());
            }
        }
    }
}

/// Hand an admitted turn to the engine.
///
/// If the engine is gone the turn resolves immediately with the fallback.
async fn dispatch_turn(app: &mut App, engine_handle: &EngineHandle, ticket: TurnTicket) {
    let turn_id = ticket.turn_id;
    let op = Op::SendMessage {
        turn_id,
        content: ticket.content,
    };
    if let Err(err) = engine_handle.send(op).await {
        logging::warn(format!("{turn_id}: engine unavailable: {err}"));
        app.apply_engine_event(EngineEvent::TurnComplete {
            turn_id,
            result: Err(ClientError::Network(err.to_string())),
        });
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) -> LoopAction {
    if key.code == KeyCode::F(1) {
        if app.view_stack.top_kind() == Some(ModalKind::Help) {
            app.view_stack.pop();
        } else {
            app.view_stack.push(HelpView::new());
        }
        return LoopAction::Continue;
    }

    if !app.view_stack.is_empty() {
        app.view_stack.handle_key(key);
        return LoopAction::Continue;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char('c') if ctrl => return LoopAction::Quit,
        KeyCode::Char('d') if ctrl => {
            if app.session.draft().is_empty() {
                return LoopAction::Quit;
            }
        }
        KeyCode::F(2) => app.toggle_sidebar(),
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Esc => {
            if app.focus.is_some() {
                app.clear_focus();
            } else {
                app.clear_input();
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') if app.focus.is_some() && !ctrl && !alt => {
            if let Some(target) = app.focus
                && let Some(ticket) = app.activate(target)
            {
                return LoopAction::Dispatch(ticket);
            }
        }
        KeyCode::Up if alt => app.scroll_up(MOUSE_SCROLL_LINES),
        KeyCode::Down if alt => app.scroll_down(MOUSE_SCROLL_LINES),
        KeyCode::PageUp => {
            let page = app.last_transcript_visible.max(1);
            app.scroll_up(page);
        }
        KeyCode::PageDown => {
            let page = app.last_transcript_visible.max(1);
            app.scroll_down(page);
        }
        // Input handling
        KeyCode::Char('j') if ctrl => app.insert_char('\n'),
        KeyCode::Enter if shift || alt || ctrl => app.insert_char('\n'),
        KeyCode::Enter => {
            if let Some(ticket) = app.submit_draft() {
                return LoopAction::Dispatch(ticket);
            }
        }
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Delete => app.delete_char_forward(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home if key.modifiers.is_empty() => app.scroll_to_top(),
        KeyCode::End if key.modifiers.is_empty() => app.scroll_to_bottom(),
        KeyCode::Home | KeyCode::Char('a') if ctrl => app.move_cursor_start(),
        KeyCode::End | KeyCode::Char('e') if ctrl => app.move_cursor_end(),
        KeyCode::Char('u') if ctrl => app.clear_input(),
        KeyCode::Char(c) if !ctrl && !alt => {
            app.focus = None;
            app.insert_char(c);
        }
        _ => {}
    }

    LoopAction::Continue
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> LoopAction {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll_up(MOUSE_SCROLL_LINES),
        MouseEventKind::ScrollDown => app.scroll_down(MOUSE_SCROLL_LINES),
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(target) = app.hit_at(mouse.column, mouse.row) {
                app.focus = Some(target);
                if let Some(ticket) = app.activate(target) {
                    return LoopAction::Dispatch(ticket);
                }
            }
        }
        _ => {}
    }
    LoopAction::Continue
}

fn render(f: &mut Frame, app: &mut App) {
    let size = f.area();

    // Clear entire area with background color
    let background = Block::default().style(Style::default().bg(app.ui_theme.header_bg));
    f.render_widget(background, size);

    let header_height = 1;
    let footer_height = 1;
    let status_height = u16::from(app.session.is_pending());
    let available_height = size
        .height
        .saturating_sub(header_height + footer_height + status_height);
    let composer_height = {
        let composer_widget = ComposerWidget::new(app, PROMPT, available_height);
        composer_widget.desired_height(size.width)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),   // Header
            Constraint::Min(1),                  // Body
            Constraint::Length(status_height),   // Status indicator
            Constraint::Length(composer_height), // Composer
            Constraint::Length(footer_height),   // Footer
        ])
        .split(size);

    {
        let header_data = HeaderData::new(
            &app.assistant_name,
            &app.endpoint,
            app.session.is_pending(),
            app.ui_theme.header_bg,
        );
        let header_widget = HeaderWidget::new(header_data);
        header_widget.render(chunks[0], f.buffer_mut());
    }

    let (chat_area, sidebar_area) = split_body(chunks[1], sidebar_visible(app, size.width));

    {
        let chat_widget = ChatWidget::new(app, chat_area);
        chat_widget.render(chat_area, f.buffer_mut());
    }

    if let Some(sidebar_area) = sidebar_area {
        let sidebar = SidebarWidget::new(&app.sidebar_items);
        sidebar.render(sidebar_area, f.buffer_mut());
    }

    if status_height > 0 {
        render_status_indicator(f, chunks[2], app);
    }

    let cursor_pos = {
        let composer_widget = ComposerWidget::new(app, PROMPT, available_height);
        composer_widget.render(chunks[3], f.buffer_mut());
        composer_widget.cursor_pos(chunks[3])
    };
    if let Some(cursor_pos) = cursor_pos
        && app.view_stack.is_empty()
    {
        f.set_cursor_position(cursor_pos);
    }

    render_footer(f, chunks[4], app);

    if !app.view_stack.is_empty() {
        app.view_stack.render(size, f.buffer_mut());
    }
}

fn sidebar_visible(app: &App, terminal_width: u16) -> bool {
    app.show_sidebar
        && !app.sidebar_items.is_empty()
        && terminal_width >= SIDEBAR_MIN_TERMINAL_WIDTH
}

fn split_body(area: Rect, with_sidebar: bool) -> (Rect, Option<Rect>) {
    if !with_sidebar {
        return (area, None);
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(SIDEBAR_WIDTH)])
        .split(area);
    (columns[0], Some(columns[1]))
}

fn render_status_indicator(f: &mut Frame, area: Rect, app: &App) {
    let started = app.session.pending_since();
    let mut spans = vec![
        Span::styled(
            typing_indicator(started),
            Style::default().fg(palette::BRAND_SKY).bold(),
        ),
        Span::raw(" "),
        Span::styled(
            "Waiting for reply",
            Style::default().fg(palette::STATUS_WARNING).bold(),
        ),
    ];
    if let Some(started) = started {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format_elapsed(started),
            Style::default().fg(palette::TEXT_MUTED),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let available_width = usize::from(area.width);

    let mut right_spans = Vec::new();
    let can_scroll = app.last_transcript_total > app.last_transcript_visible;
    if can_scroll && !app.transcript_scroll.is_following() {
        right_spans.push(Span::styled(
            format!(
                " line {}/{} (End to follow) ",
                app.last_transcript_top + 1,
                app.last_transcript_total
            ),
            Style::default().fg(palette::TEXT_DIM),
        ));
    }
    right_spans.push(Span::styled(
        "F1 help",
        Style::default().fg(palette::FOOTER_HINT),
    ));
    let right_width: usize = right_spans.iter().map(|s| s.content.width()).sum();

    let max_left = available_width
        .saturating_sub(right_width)
        .saturating_sub(1)
        .max(1);
    let left = match app.status_message.as_ref() {
        Some(msg) => Span::styled(
            truncate_line_to_width(msg, max_left),
            Style::default().fg(palette::STATUS_ERROR),
        ),
        None => Span::styled(
            truncate_line_to_width(footer_hint(app), max_left),
            Style::default().fg(palette::FOOTER_HINT),
        ),
    };

    let spacer_width = available_width.saturating_sub(left.content.width() + right_width);
    let mut spans = vec![left];
    if spacer_width > 0 {
        spans.push(Span::raw(" ".repeat(spacer_width)));
        spans.extend(right_spans);
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Keyboard hint matching what Enter would currently do.
fn footer_hint(app: &App) -> &'static str {
    if app.focus.is_some() {
        "Enter/Space activate · Tab next · Esc back to input"
    } else if app.session.is_pending() {
        "Waiting for the assistant · Tab to browse suggestions"
    } else if app.session.can_submit() {
        "Enter send · Shift+Enter newline"
    } else {
        "Type a question · Tab to browse suggestions"
    }
}

fn format_elapsed(start: Instant) -> String {
    let elapsed = start.elapsed().as_secs();
    if elapsed >= 60 {
        format!("{}m{:02}s", elapsed / 60, elapsed % 60)
    } else {
        format!("{elapsed}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssistantReply;
    use crate::tui::projection::Target;
    use ratatui::backend::TestBackend;

    fn test_app() -> App {
        App::new(TuiOptions {
            assistant_name: "Agent".to_string(),
            endpoint: "http://localhost:8000/api/chat".to_string(),
            sidebar_items: vec!["콘크리트 믹서".to_string(), "안전모".to_string()],
            theme: "default".to_string(),
            use_alt_screen: false,
        })
    }

    fn press(app: &mut App, code: KeyCode) -> LoopAction {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn press_with(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> LoopAction {
        handle_key_event(app, KeyEvent::new(code, modifiers))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn answer_pending(app: &mut App, reply: AssistantReply) {
        let turn_id = app.session.pending_turn().expect("pending");
        app.apply_engine_event(EngineEvent::TurnComplete {
            turn_id,
            result: Ok(reply),
        });
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn plain_enter_submits_and_modified_enter_inserts_newline() {
        let mut app = test_app();
        type_text(&mut app, "a");
        assert_eq!(
            press_with(&mut app, KeyCode::Enter, KeyModifiers::SHIFT),
            LoopAction::Continue
        );
        press_with(&mut app, KeyCode::Enter, KeyModifiers::ALT);
        press_with(&mut app, KeyCode::Char('j'), KeyModifiers::CONTROL);
        type_text(&mut app, "b");
        assert_eq!(app.session.draft(), "a\n\n\nb");

        let LoopAction::Dispatch(ticket) = press(&mut app, KeyCode::Enter) else {
            panic!("expected dispatch");
        };
        assert_eq!(ticket.content, "a\n\n\nb");
    }

    #[test]
    fn enter_on_blank_or_pending_does_nothing() {
        let mut app = test_app();
        assert_eq!(press(&mut app, KeyCode::Enter), LoopAction::Continue);

        type_text(&mut app, "hi");
        assert!(matches!(
            press(&mut app, KeyCode::Enter),
            LoopAction::Dispatch(_)
        ));
        type_text(&mut app, "more");
        assert_eq!(press(&mut app, KeyCode::Enter), LoopAction::Continue);
        assert_eq!(app.session.draft(), "more");
    }

    #[test]
    fn ctrl_c_quits_and_ctrl_d_needs_empty_draft() {
        let mut app = test_app();
        type_text(&mut app, "x");
        assert_eq!(
            press_with(&mut app, KeyCode::Char('d'), KeyModifiers::CONTROL),
            LoopAction::Continue
        );
        assert_eq!(
            press_with(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL),
            LoopAction::Quit
        );
    }

    #[test]
    fn tab_focus_and_enter_activates_tag() {
        let mut app = test_app();
        type_text(&mut app, "hi");
        press(&mut app, KeyCode::Enter);
        answer_pending(
            &mut app,
            AssistantReply {
                answer: "a".to_string(),
                thought: None,
                related_tags: vec!["흙손".to_string()],
            },
        );

        press(&mut app, KeyCode::Tab);
        assert!(matches!(app.focus, Some(Target::Tag { index: 0, .. })));
        let LoopAction::Dispatch(ticket) = press(&mut app, KeyCode::Enter) else {
            panic!("expected dispatch");
        };
        assert_eq!(ticket.content, "흙손");
        assert_eq!(app.focus, None);
    }

    #[test]
    fn space_toggles_focused_disclosure_and_esc_returns_to_input() {
        let mut app = test_app();
        type_text(&mut app, "hi");
        press(&mut app, KeyCode::Enter);
        answer_pending(
            &mut app,
            AssistantReply {
                answer: "a".to_string(),
                thought: Some("why".to_string()),
                related_tags: Vec::new(),
            },
        );

        press(&mut app, KeyCode::Tab);
        let Some(Target::Disclosure(id)) = app.focus else {
            panic!("expected disclosure focus");
        };
        assert_eq!(press(&mut app, KeyCode::Char(' ')), LoopAction::Continue);
        assert!(app.session.is_disclosure_open(id));
        assert_eq!(app.session.draft(), "");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, None);
        type_text(&mut app, " x");
        assert_eq!(app.session.draft(), " x");
    }

    #[test]
    fn help_view_swallows_keys_until_closed() {
        let mut app = test_app();
        press(&mut app, KeyCode::F(1));
        type_text(&mut app, "abc");
        assert_eq!(app.session.draft(), "");
        press(&mut app, KeyCode::Esc);
        type_text(&mut app, "abc");
        assert_eq!(app.session.draft(), "abc");
    }

    #[test]
    fn render_shows_greeting_sidebar_and_placeholder() {
        let mut app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).expect("terminal");
        terminal.draw(|f| render(f, &mut app)).expect("draw");

        let text = screen_text(&terminal);
        assert!(text.contains("AccessNine AI"));
        assert!(text.contains("Context Info"));
        assert!(text.contains("F1 help"));
        assert!(app.last_transcript_area.is_some());
    }

    fn row_of(terminal: &Terminal<TestBackend>, needle: &str) -> Option<usize> {
        screen_text(terminal)
            .lines()
            .position(|line| line.contains(needle))
    }

    #[test]
    fn toggling_trace_in_short_transcript_keeps_bottom_anchor() {
        let mut app = test_app();
        type_text(&mut app, "hello");
        press(&mut app, KeyCode::Enter);
        answer_pending(
            &mut app,
            AssistantReply {
                answer: "stock is ready".to_string(),
                thought: Some("checked warehouse".to_string()),
                related_tags: vec!["cement".to_string()],
            },
        );

        let mut terminal = Terminal::new(TestBackend::new(60, 30)).expect("terminal");
        terminal.draw(|f| render(f, &mut app)).expect("draw");
        let answer_before = row_of(&terminal, "stock is ready").expect("answer row");
        let chips_before = row_of(&terminal, "[#cement]").expect("chip row");
        assert!(app.last_transcript_total < app.last_transcript_visible);

        let disclosure = app.targets()[0];
        assert!(matches!(disclosure, Target::Disclosure(_)));
        assert!(app.activate(disclosure).is_none());
        terminal.draw(|f| render(f, &mut app)).expect("draw");

        assert!(app.transcript_scroll.is_following());
        assert_eq!(row_of(&terminal, "[#cement]"), Some(chips_before));
        // The one trace line grows the bottom-anchored block upward.
        assert_eq!(row_of(&terminal, "stock is ready"), Some(answer_before - 1));
        assert!(row_of(&terminal, "checked warehouse").is_some());
    }

    #[test]
    fn narrow_terminal_hides_sidebar() {
        let mut app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).expect("terminal");
        terminal.draw(|f| render(f, &mut app)).expect("draw");
        assert!(!screen_text(&terminal).contains("Context Info"));
    }

    #[test]
    fn clicking_a_rendered_tag_dispatches_it() {
        let mut app = test_app();
        type_text(&mut app, "hi");
        press(&mut app, KeyCode::Enter);
        answer_pending(
            &mut app,
            AssistantReply {
                answer: "a".to_string(),
                thought: None,
                related_tags: vec!["안전모".to_string()],
            },
        );

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).expect("terminal");
        terminal.draw(|f| render(f, &mut app)).expect("draw");

        let hit = app.last_hits[0];
        let area = app.last_transcript_area.expect("area");
        let row = area.y as usize + app.last_transcript_padding_top + hit.line
            - app.last_transcript_top;
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: area.x + u16::try_from(hit.start_col).expect("col"),
            row: u16::try_from(row).expect("row"),
            modifiers: KeyModifiers::NONE,
        };
        let LoopAction::Dispatch(ticket) = handle_mouse_event(&mut app, mouse) else {
            panic!("expected dispatch");
        };
        assert_eq!(ticket.content, "안전모");
    }

    #[test]
    fn footer_hint_follows_submit_state() {
        let mut app = test_app();
        assert!(footer_hint(&app).starts_with("Type a question"));
        type_text(&mut app, "x");
        assert!(footer_hint(&app).starts_with("Enter send"));
        press(&mut app, KeyCode::Enter);
        assert!(footer_hint(&app).starts_with("Waiting"));
    }

    #[tokio::test]
    async fn dispatch_forwards_ticket_to_engine() {
        let mut harness = crate::core::engine::mock_engine_handle();
        let mut app = test_app();
        type_text(&mut app, "단가 문의");
        let LoopAction::Dispatch(ticket) = press(&mut app, KeyCode::Enter) else {
            panic!("expected dispatch");
        };
        let expected_turn = ticket.turn_id;

        dispatch_turn(&mut app, &harness.handle, ticket).await;

        let Some(Op::SendMessage { turn_id, content }) = harness.rx_op.recv().await else {
            panic!("expected send op");
        };
        assert_eq!(turn_id, expected_turn);
        assert_eq!(content, "단가 문의");
        assert!(app.session.is_pending());

        harness
            .tx_event
            .send(EngineEvent::TurnComplete {
                turn_id,
                result: Ok(AssistantReply::answer_only("시멘트는 포대당 6,000원입니다.")),
            })
            .await
            .expect("send event");
        let event = harness.handle.rx_event.write().await.recv().await.expect("event");
        app.apply_engine_event(event);
        assert!(!app.session.is_pending());
    }

    #[tokio::test]
    async fn dispatch_to_dead_engine_falls_back() {
        let harness = crate::core::engine::mock_engine_handle();
        let handle = harness.handle.clone();
        drop(harness);

        let mut app = test_app();
        type_text(&mut app, "hello");
        let LoopAction::Dispatch(ticket) = press(&mut app, KeyCode::Enter) else {
            panic!("expected dispatch");
        };
        dispatch_turn(&mut app, &handle, ticket).await;

        assert!(!app.session.is_pending());
        assert_eq!(
            app.session.entries().last().map(|m| m.content()),
            Some(crate::core::session::FALLBACK_MESSAGE)
        );
    }

    #[test]
    fn format_elapsed_under_a_minute() {
        assert_eq!(format_elapsed(Instant::now()), "0s");
    }
}

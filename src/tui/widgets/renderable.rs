use ratatui::{buffer::Buffer, layout::Rect};

/// A component that draws into a buffer region and reports its height.
pub trait Renderable {
    fn render(&self, area: Rect, buf: &mut Buffer);

    fn desired_height(&self, width: u16) -> u16;

    /// Terminal cursor position, when the component owns the cursor.
    fn cursor_pos(&self, _area: Rect) -> Option<(u16, u16)> {
        None
    }
}

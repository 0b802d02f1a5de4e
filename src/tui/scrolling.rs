//! Transcript scroll state.

/// Either following the newest line or pinned to a top line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranscriptScroll {
    #[default]
    ToBottom,
    Pinned {
        top: usize,
    },
}

impl TranscriptScroll {
    /// Apply a line delta (negative = up) given the current layout.
    #[must_use]
    pub fn scrolled_by(self, delta: i32, total_lines: usize, visible_lines: usize) -> Self {
        let max_start = total_lines.saturating_sub(visible_lines);
        let current = self.resolve_top(max_start);
        let magnitude = usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX);
        let next = if delta < 0 {
            current.saturating_sub(magnitude)
        } else {
            current.saturating_add(magnitude)
        };
        if next >= max_start {
            TranscriptScroll::ToBottom
        } else {
            TranscriptScroll::Pinned { top: next }
        }
    }

    /// First visible line for a transcript whose last start line is `max_start`.
    #[must_use]
    pub fn resolve_top(self, max_start: usize) -> usize {
        match self {
            TranscriptScroll::ToBottom => max_start,
            TranscriptScroll::Pinned { top } => top.min(max_start),
        }
    }

    #[must_use]
    pub fn is_following(self) -> bool {
        matches!(self, TranscriptScroll::ToBottom)
    }
}

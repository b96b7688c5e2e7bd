#[cfg(test)]
#[path = "scroll_test.rs"]
mod tests;

use ratatui::widgets::ScrollbarState;

use crate::domain::models::ScrollMove;

/// Scroll offset of the chat history, counted in rendered lines.
///
/// The view sticks to the newest message until the user scrolls up. It
/// follows again once the user scrolls back to the bottom or jumps there.
#[derive(Default)]
pub struct Scroll {
    content_height: u16,
    viewport_height: u16,
    detached: bool,
    pub position: u16,
    pub scrollbar_state: ScrollbarState,
}

impl Scroll {
    pub fn resize(&mut self, content_height: u16, viewport_height: u16) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;

        if self.detached {
            self.position = self.position.min(self.max_position());
            self.detached = self.position < self.max_position();
        } else {
            self.position = self.max_position();
        }

        self.sync_scrollbar();
    }

    pub fn apply(&mut self, scroll_move: ScrollMove) {
        let max = self.max_position();
        match scroll_move {
            ScrollMove::LineUp => self.position = self.position.saturating_sub(1),
            ScrollMove::LineDown => self.position = self.position.saturating_add(1).min(max),
            ScrollMove::PageUp => self.position = self.position.saturating_sub(self.page_size()),
            ScrollMove::PageDown => {
                self.position = self.position.saturating_add(self.page_size()).min(max);
            }
            ScrollMove::Latest => self.position = max,
        }

        self.detached = self.position < max;
        self.sync_scrollbar();
    }

    pub fn to_latest(&mut self) {
        self.apply(ScrollMove::Latest);
    }

    pub fn is_following(&self) -> bool {
        return !self.detached;
    }

    pub fn max_position(&self) -> u16 {
        return self.content_height.saturating_sub(self.viewport_height);
    }

    /// A page keeps two lines of the previous screen in view.
    fn page_size(&self) -> u16 {
        return self.viewport_height.saturating_sub(2).max(1);
    }

    fn sync_scrollbar(&mut self) {
        self.scrollbar_state = ScrollbarState::default()
            .content_length(self.max_position())
            .viewport_content_length(self.viewport_height)
            .position(self.position);
    }
}

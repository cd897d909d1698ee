use crate::actions::Panel;

#[derive(Debug, Clone)]
pub struct UiState {
    pub focused_panel: Panel,
    pub page_scroll: usize,
    pub status_message: String,
    pub error_message: Option<String>,
    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            focused_panel: Panel::Page,
            page_scroll: 0,
            status_message: "🐹 Ready - open a PDF to start".to_string(),
            error_message: None,
            should_quit: false,
        }
    }
}

impl UiState {
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error_message = Some(error.into());
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn scroll_page(&mut self, delta: i32, line_count: usize) {
        let max_scroll = line_count.saturating_sub(1);
        let next = if delta < 0 {
            self.page_scroll.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.page_scroll.saturating_add(delta as usize)
        };
        self.page_scroll = next.min(max_scroll);
    }
}

pub mod document_state;
pub mod page_state;
pub mod ui_state;

pub use document_state::DocumentState;
pub use page_state::{PageState, PageText};
pub use ui_state::UiState;

use crate::chat::ChatSession;
use crate::selection::SelectionRouter;

/// Everything the viewer shows, owned in one place and changed only by actions
#[derive(Debug, Default)]
pub struct ViewerState {
    pub document: DocumentState,
    pub page: PageState,
    pub selection: SelectionRouter,
    pub chat: ChatSession,
    pub ui: UiState,
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }
}

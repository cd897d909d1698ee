use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::extractor::TextExtractor;
use crate::reconstruct::ReconstructedPage;
use crate::request::RequestToken;
use crate::selection::{ActionKind, Bounds};

/// All possible state mutations of the viewer
#[derive(Debug, Clone)]
pub enum Action {
    // Document actions
    OpenDocument(PathBuf),
    ReloadDocument,
    DocumentOpened {
        token: RequestToken,
        document: OpenedDocument,
    },
    DocumentFailed {
        token: RequestToken,
        message: String,
    },
    NavigatePage(PageDirection),
    PageExtracted {
        token: RequestToken,
        page: usize,
        result: Result<ReconstructedPage, String>,
    },

    // Selection actions
    BeginSelection,
    FinishSelection {
        text: String,
        selection: Bounds,
        region: Bounds,
    },
    DismissMenu,
    TriggerAction(ActionKind),

    // Chat actions
    ChatInput(char),
    ChatBackspace,
    SetChatInput(String),
    SendChat,
    ChatReplied {
        token: RequestToken,
        content: String,
    },

    // UI actions
    SwitchPanel(Panel),
    ScrollPage(i32),

    // System
    Quit,
}

/// Extractor of a freshly opened document
#[derive(Clone)]
pub struct OpenedDocument(pub Arc<dyn TextExtractor>);

impl fmt::Debug for OpenedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpenedDocument")
            .field(&self.0.document().file_name)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Next,
    Previous,
    First,
    Last,
    Jump(usize),
}

impl PageDirection {
    /// Target 1-based page, clamped to the document
    pub fn resolve(self, current: usize, page_count: usize) -> usize {
        if page_count == 0 {
            return 1;
        }
        let target = match self {
            PageDirection::Next => current.saturating_add(1),
            PageDirection::Previous => current.saturating_sub(1),
            PageDirection::First => 1,
            PageDirection::Last => page_count,
            PageDirection::Jump(page) => page,
        };
        target.clamp(1, page_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Page,
    Chat,
}

impl Panel {
    pub fn toggle(self) -> Self {
        match self {
            Panel::Page => Panel::Chat,
            Panel::Chat => Panel::Page,
        }
    }
}

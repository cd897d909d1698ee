//! Text selection → action menu → handler.
//!
//! A mouse-up inside the content region with some selected text opens a small menu
//! anchored above the selection. Picking an entry hands the selected text to exactly
//! one [`ActionHandler`] method and closes the menu.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Semantic actions offered for a text selection, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Explain,
    Chat,
    Quiz,
    Flashcards,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Explain,
        ActionKind::Chat,
        ActionKind::Quiz,
        ActionKind::Flashcards,
    ];

    /// Stable identifier
    pub fn id(self) -> &'static str {
        match self {
            ActionKind::Explain => "explain",
            ActionKind::Chat => "chat",
            ActionKind::Quiz => "quiz",
            ActionKind::Flashcards => "flashcards",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Explain => "Explain",
            ActionKind::Chat => "Chat",
            ActionKind::Quiz => "Quiz",
            ActionKind::Flashcards => "Flashcards",
        }
    }

    /// Menu key: `1`..`4` in menu order
    pub fn shortcut(self) -> char {
        match self {
            ActionKind::Explain => '1',
            ActionKind::Chat => '2',
            ActionKind::Quiz => '3',
            ActionKind::Flashcards => '4',
        }
    }

    pub fn from_shortcut(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.shortcut() == key)
    }
}

/// One method per action. Implementors must decide what every action does,
/// even if that is nothing yet.
pub trait ActionHandler {
    fn explain(&mut self, text: &str);
    fn chat(&mut self, text: &str);
    fn quiz(&mut self, text: &str);
    fn flashcards(&mut self, text: &str);
}

pub fn dispatch_action<H: ActionHandler + ?Sized>(handler: &mut H, action: ActionKind, text: &str) {
    match action {
        ActionKind::Explain => handler.explain(text),
        ActionKind::Chat => handler.chat(text),
        ActionKind::Quiz => handler.quiz(text),
        ActionKind::Flashcards => handler.flashcards(text),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned box in screen units (pixels or terminal cells)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }
}

/// Menu anchor: horizontal centre and top edge of the selection, relative to the
/// content region rather than the viewport.
pub fn anchor_for(selection: &Bounds, region: &Bounds) -> Point {
    Point {
        x: selection.left + selection.width / 2.0 - region.left,
        y: selection.top - region.top,
    }
}

/// Trimmed selected text plus where its menu is anchored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    text: String,
    anchor: Point,
}

impl Selection {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Top-left corner of a menu centred on the anchor and raised by `offset`
    pub fn menu_origin(&self, menu_width: f64, offset: f64) -> Point {
        Point {
            x: self.anchor.x - menu_width / 2.0,
            y: self.anchor.y - offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    /// Pointer is down and dragging, nothing captured yet
    Selecting,
    MenuOpen(Selection),
}

#[derive(Debug, Default)]
pub struct SelectionRouter {
    state: SelectionState,
}

impl SelectionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selection(&self) -> Option<&Selection> {
        match &self.state {
            SelectionState::MenuOpen(selection) => Some(selection),
            _ => None,
        }
    }

    pub fn is_menu_open(&self) -> bool {
        matches!(self.state, SelectionState::MenuOpen(_))
    }

    /// Entries of the open menu, empty while no menu is shown
    pub fn menu_actions(&self) -> &'static [ActionKind] {
        if self.is_menu_open() {
            &ActionKind::ALL
        } else {
            &[]
        }
    }

    /// Pointer went down in the content region. An open menu stays up until the
    /// pointer is released so it can be re-anchored in place.
    pub fn begin_selection(&mut self) {
        if self.state == SelectionState::Idle {
            self.state = SelectionState::Selecting;
        }
    }

    /// Pointer released. Returns whether a menu is now open.
    pub fn finish_selection(&mut self, raw_text: &str, selection: Bounds, region: Bounds) -> bool {
        let text = raw_text.trim();
        if text.is_empty() {
            if self.state != SelectionState::Idle {
                debug!("Empty selection, closing action menu");
            }
            self.state = SelectionState::Idle;
            return false;
        }

        let anchor = anchor_for(&selection, &region);
        debug!(
            "Selected {} chars, menu anchored at ({:.1}, {:.1})",
            text.chars().count(),
            anchor.x,
            anchor.y
        );
        self.state = SelectionState::MenuOpen(Selection {
            text: text.to_string(),
            anchor,
        });
        true
    }

    pub fn dismiss(&mut self) {
        self.state = SelectionState::Idle;
    }

    /// Hands the pending selection to the handler and closes the menu.
    /// Does nothing when no menu is open.
    pub fn trigger<H: ActionHandler + ?Sized>(&mut self, action: ActionKind, handler: &mut H) -> bool {
        if !self.is_menu_open() {
            return false;
        }
        let SelectionState::MenuOpen(selection) = std::mem::take(&mut self.state) else {
            return false;
        };
        debug!("Action '{}' on selection", action.id());
        dispatch_action(handler, action, &selection.text);
        true
    }
}

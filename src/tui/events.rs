// Event Handling for the reader
// Maps terminal input onto viewer actions

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

use crate::actions::{Action, PageDirection, Panel};
use crate::selection::ActionKind;
use crate::state::ViewerState;

use super::layout::{menu_item_at, menu_rect, to_bounds, ReaderLayout};
use super::text_selection::{cell_at, contains, selected_text, selection_bounds, CellPos};

const WHEEL_LINES: i32 = 3;

#[derive(Debug, Clone, Copy)]
struct Drag {
    start: CellPos,
    current: CellPos,
}

#[derive(Debug, Default)]
pub struct EventHandler {
    drag: Option<Drag>,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blocking event polling with small timeout
    pub fn poll(&self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout)? {
            return Ok(Some(event::read()?));
        }
        Ok(None)
    }

    /// Range being dragged, for highlighting
    pub fn drag_range(&self) -> Option<(CellPos, CellPos)> {
        self.drag.map(|drag| (drag.start, drag.current))
    }

    pub fn handle_event(
        &mut self,
        event: Event,
        state: &ViewerState,
        layout: &ReaderLayout,
    ) -> Vec<Action> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.handle_key(key, state).into_iter().collect()
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse, state, layout),
            _ => Vec::new(),
        }
    }

    fn handle_key(&self, key: KeyEvent, state: &ViewerState) -> Option<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Action::Quit);
        }

        let focused = state.ui.focused_panel;
        if state.selection.is_menu_open() {
            match key.code {
                KeyCode::Esc => return Some(Action::DismissMenu),
                // digits typed into the chat box stay chat input
                KeyCode::Char(c) if focused == Panel::Page => {
                    if let Some(kind) = ActionKind::from_shortcut(c) {
                        return Some(Action::TriggerAction(kind));
                    }
                }
                _ => {}
            }
        }

        if key.code == KeyCode::Tab {
            return Some(Action::SwitchPanel(focused.toggle()));
        }

        match focused {
            Panel::Chat => match key.code {
                KeyCode::Enter => Some(Action::SendChat),
                KeyCode::Backspace => Some(Action::ChatBackspace),
                KeyCode::Esc => Some(Action::SwitchPanel(Panel::Page)),
                KeyCode::Char(c) => Some(Action::ChatInput(c)),
                _ => None,
            },
            Panel::Page => match key.code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Right | KeyCode::PageDown | KeyCode::Char('n') => {
                    Some(Action::NavigatePage(PageDirection::Next))
                }
                KeyCode::Left | KeyCode::PageUp | KeyCode::Char('p') => {
                    Some(Action::NavigatePage(PageDirection::Previous))
                }
                KeyCode::Home | KeyCode::Char('g') => {
                    Some(Action::NavigatePage(PageDirection::First))
                }
                KeyCode::End | KeyCode::Char('G') => {
                    Some(Action::NavigatePage(PageDirection::Last))
                }
                KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollPage(1)),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollPage(-1)),
                KeyCode::Char('r') => Some(Action::ReloadDocument),
                KeyCode::Char('c') => Some(Action::SwitchPanel(Panel::Chat)),
                _ => None,
            },
        }
    }

    fn handle_mouse(
        &mut self,
        mouse: MouseEvent,
        state: &ViewerState,
        layout: &ReaderLayout,
    ) -> Vec<Action> {
        let region = layout.page_region();
        let scroll = state.ui.page_scroll;
        let (column, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(selection) = state.selection.selection() {
                    let menu = menu_rect(selection, region);
                    if contains(menu, column, row) {
                        return menu_item_at(menu, column, row)
                            .map(Action::TriggerAction)
                            .into_iter()
                            .collect();
                    }
                }

                if contains(region, column, row) {
                    let cell = cell_at(region, scroll, column, row);
                    self.drag = Some(Drag {
                        start: cell,
                        current: cell,
                    });
                    let mut actions = vec![Action::BeginSelection];
                    if state.ui.focused_panel != Panel::Page {
                        actions.push(Action::SwitchPanel(Panel::Page));
                    }
                    return actions;
                }

                if layout.in_chat(column, row) && state.ui.focused_panel != Panel::Chat {
                    return vec![Action::SwitchPanel(Panel::Chat)];
                }
                Vec::new()
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(drag) = self.drag.as_mut() {
                    drag.current = cell_at(region, scroll, column, row);
                }
                Vec::new()
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(drag) = self.drag.take() else {
                    return Vec::new();
                };
                let end = cell_at(region, scroll, column, row);
                let text = selected_text(state.page.lines(), drag.start, end);
                let region = to_bounds(region);
                vec![Action::FinishSelection {
                    text,
                    selection: selection_bounds(drag.start, end, region, scroll),
                    region,
                }]
            }
            MouseEventKind::ScrollDown if contains(region, column, row) => {
                vec![Action::ScrollPage(WHEEL_LINES)]
            }
            MouseEventKind::ScrollUp if contains(region, column, row) => {
                vec![Action::ScrollPage(-WHEEL_LINES)]
            }
            _ => Vec::new(),
        }
    }
}

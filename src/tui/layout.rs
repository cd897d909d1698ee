// Reader Layout System
// Page view, extracted text and chat side by side

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
};

use crate::actions::Panel;
use crate::config::ViewerConfig;
use crate::selection::{ActionKind, Bounds, Selection};

use super::text_selection::contains;

/// Warp Terminal color scheme
pub struct WarpColors;

impl WarpColors {
    pub const SURFACE: Color = Color::Rgb(32, 32, 32);
    pub const BORDER: Color = Color::Rgb(64, 64, 64);
    pub const BORDER_FOCUSED: Color = Color::Rgb(58, 128, 200);
    pub const TEXT_PRIMARY: Color = Color::Rgb(240, 240, 240);
    pub const TEXT_SECONDARY: Color = Color::Rgb(180, 180, 180);
    pub const TEXT_MUTED: Color = Color::Rgb(120, 120, 120);
    pub const ACCENT_BLUE: Color = Color::Rgb(58, 128, 200);
    pub const ACCENT_GREEN: Color = Color::Rgb(120, 180, 120);
    pub const ACCENT_YELLOW: Color = Color::Rgb(200, 160, 58);
    pub const STATUS_ERROR: Color = Color::Rgb(200, 100, 100);
}

/// Rows between the menu's top edge and the selection anchor
pub const MENU_VERTICAL_OFFSET: u16 = 3;
pub const MENU_HEIGHT: u16 = 3;

/// Reader layout areas
#[derive(Debug, Clone, Copy)]
pub struct ReaderLayout {
    pub header: Rect,
    pub page: Rect,
    pub text_panel: Rect,
    pub chat_log: Rect,
    pub chat_input: Rect,
    pub status_bar: Rect,
}

impl ReaderLayout {
    pub fn new(area: Rect, viewer: &ViewerConfig) -> Self {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Main content area
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        let page_percent = 100u16
            .saturating_sub(viewer.text_panel_percent)
            .saturating_sub(viewer.chat_panel_percent);
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(page_percent),
                Constraint::Percentage(viewer.text_panel_percent),
                Constraint::Percentage(viewer.chat_panel_percent),
            ])
            .split(main_chunks[1]);

        let chat_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Messages
                Constraint::Length(3), // Input line
            ])
            .split(content_chunks[2]);

        Self {
            header: main_chunks[0],
            page: content_chunks[0],
            text_panel: content_chunks[1],
            chat_log: chat_chunks[0],
            chat_input: chat_chunks[1],
            status_bar: main_chunks[2],
        }
    }

    /// Inside of the page block: where page text is drawn and selected
    pub fn page_region(&self) -> Rect {
        inner(self.page)
    }

    pub fn in_chat(&self, column: u16, row: u16) -> bool {
        contains(self.chat_log, column, row) || contains(self.chat_input, column, row)
    }

    /// Get border style for a panel based on focus
    pub fn border_style(&self, panel: Panel, focused: Panel) -> Style {
        if panel == focused {
            Style::default().fg(WarpColors::BORDER_FOCUSED)
        } else {
            Style::default().fg(WarpColors::BORDER)
        }
    }
}

/// Area inside a one-cell border
pub fn inner(rect: Rect) -> Rect {
    Rect {
        x: rect.x.saturating_add(1),
        y: rect.y.saturating_add(1),
        width: rect.width.saturating_sub(2),
        height: rect.height.saturating_sub(2),
    }
}

pub fn to_bounds(rect: Rect) -> Bounds {
    Bounds::new(
        rect.x as f64,
        rect.y as f64,
        rect.width as f64,
        rect.height as f64,
    )
}

/// Text of one menu entry, e.g. ` 2 Chat `
pub fn menu_entry(action: ActionKind) -> String {
    format!(" {} {} ", action.shortcut(), action.label())
}

/// Menu width including its border and the separators between entries
pub fn menu_width() -> u16 {
    let entries: usize = ActionKind::ALL
        .iter()
        .map(|action| menu_entry(*action).chars().count())
        .sum();
    let separators = ActionKind::ALL.len() - 1;
    (entries + separators + 2) as u16
}

/// Where the action menu is drawn: centred above the selection, kept inside the
/// region. Falls below the selection when there is no room above it.
pub fn menu_rect(selection: &Selection, region: Rect) -> Rect {
    let width = menu_width().min(region.width);
    let height = MENU_HEIGHT.min(region.height);
    let origin = selection.menu_origin(width as f64, MENU_VERTICAL_OFFSET as f64);

    let max_x = region.width.saturating_sub(width) as i32;
    let max_y = region.height.saturating_sub(height) as i32;
    let x = (origin.x.round() as i32).clamp(0, max_x);
    let mut y = origin.y.round() as i32;
    if y < 0 {
        y = selection.anchor().y.round() as i32 + 1;
    }
    let y = y.clamp(0, max_y);

    Rect {
        x: region.x + x as u16,
        y: region.y + y as u16,
        width,
        height,
    }
}

/// Menu entry under a click, `None` on borders and separators
pub fn menu_item_at(menu: Rect, column: u16, row: u16) -> Option<ActionKind> {
    if !contains(inner(menu), column, row) {
        return None;
    }

    let mut offset = (column - menu.x - 1) as usize;
    for (i, action) in ActionKind::ALL.iter().enumerate() {
        let width = menu_entry(*action).chars().count();
        if offset < width {
            return Some(*action);
        }
        offset -= width;
        if i + 1 < ActionKind::ALL.len() {
            if offset == 0 {
                return None;
            }
            offset -= 1;
        }
    }
    None
}

// Frame rendering for the reader

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::actions::Panel;
use crate::chat::ChatRole;
use crate::config::ViewerConfig;
use crate::selection::ActionKind;
use crate::state::{PageText, ViewerState};

use super::layout::{menu_entry, menu_rect, ReaderLayout, WarpColors};
use super::text_selection::{selected_span, CellPos};

/// Draws one frame and returns the layout it was drawn with, for hit testing
pub fn draw(
    frame: &mut Frame,
    state: &ViewerState,
    viewer: &ViewerConfig,
    drag: Option<(CellPos, CellPos)>,
) -> ReaderLayout {
    let layout = ReaderLayout::new(frame.size(), viewer);

    draw_header(frame, state, layout.header);
    draw_page(frame, state, &layout, drag);
    draw_text_panel(frame, state, &layout);
    draw_chat(frame, state, &layout);
    draw_status_bar(frame, state, layout.status_bar);

    if let Some(selection) = state.selection.selection() {
        let menu = menu_rect(selection, layout.page_region());
        draw_action_menu(frame, menu);
    }

    layout
}

fn draw_header(frame: &mut Frame, state: &ViewerState, area: Rect) {
    let title = Span::styled(
        " 🐹 CHONKER Reader ",
        Style::default()
            .fg(WarpColors::ACCENT_BLUE)
            .add_modifier(Modifier::BOLD),
    );

    let document = match state.document.info() {
        Some(info) => Span::styled(
            format!(
                " {} │ page {}/{} ",
                info.file_name, state.document.page_number, info.page_count
            ),
            Style::default().fg(WarpColors::TEXT_PRIMARY),
        ),
        None if state.document.is_opening() => Span::styled(
            " Opening... ",
            Style::default().fg(WarpColors::ACCENT_YELLOW),
        ),
        None => Span::styled(
            " No file selected ",
            Style::default().fg(WarpColors::TEXT_MUTED),
        ),
    };

    let header = Paragraph::new(Line::from(vec![title, Span::raw("│"), document])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(WarpColors::BORDER)),
    );
    frame.render_widget(header, area);
}

fn draw_page(
    frame: &mut Frame,
    state: &ViewerState,
    layout: &ReaderLayout,
    drag: Option<(CellPos, CellPos)>,
) {
    let focused = state.ui.focused_panel;
    let title = match state.document.info() {
        Some(_) => format!(" Page {} ", state.document.page_number),
        None => " Page ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(layout.border_style(Panel::Page, focused));

    let muted = Style::default().fg(WarpColors::TEXT_MUTED);
    let lines: Vec<Line> = match &state.page.text {
        PageText::NoDocument => vec![Line::styled("No PDF loaded", muted)],
        PageText::Loading { page } => {
            vec![Line::styled(format!("Loading page {}...", page), muted)]
        }
        PageText::Failed { message, .. } => vec![Line::styled(
            message.clone(),
            Style::default().fg(WarpColors::STATUS_ERROR),
        )],
        PageText::Ready { text, .. } if text.is_empty() => {
            vec![Line::styled("(no text on this page)", muted)]
        }
        PageText::Ready { text, .. } => text
            .lines()
            .iter()
            .enumerate()
            .skip(state.ui.page_scroll)
            .map(|(row, line)| page_line(row, line, drag))
            .collect(),
    };

    frame.render_widget(Paragraph::new(lines).block(block), layout.page);
}

/// One page line, with the dragged range highlighted
fn page_line(row: usize, line: &str, drag: Option<(CellPos, CellPos)>) -> Line<'static> {
    let normal = Style::default().fg(WarpColors::TEXT_PRIMARY);
    let Some(span) = drag.and_then(|range| selected_span(line, row, range)) else {
        return Line::styled(line.to_string(), normal);
    };

    let highlight = normal.add_modifier(Modifier::REVERSED);
    let before: String = line.chars().take(span.start).collect();
    let selected: String = line.chars().skip(span.start).take(span.len()).collect();
    let after: String = line.chars().skip(span.end).collect();
    let spans: Vec<Span> = [(before, normal), (selected, highlight), (after, normal)]
        .into_iter()
        .filter(|(text, _)| !text.is_empty())
        .map(|(text, style)| Span::styled(text, style))
        .collect();
    Line::from(spans)
}

fn draw_text_panel(frame: &mut Frame, state: &ViewerState, layout: &ReaderLayout) {
    let info_style = match state.page.text {
        PageText::Failed { .. } => Style::default().fg(WarpColors::STATUS_ERROR),
        _ => Style::default().fg(WarpColors::TEXT_SECONDARY),
    };

    let mut lines = vec![
        Line::styled(state.page.extraction_info(), info_style),
        Line::raw(""),
    ];
    lines.extend(
        state
            .page
            .panel_text()
            .lines()
            .map(|line| Line::styled(line.to_string(), Style::default().fg(WarpColors::TEXT_PRIMARY))),
    );

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Extracted Text ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(WarpColors::BORDER)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(panel, layout.text_panel);
}

fn draw_chat(frame: &mut Frame, state: &ViewerState, layout: &ReaderLayout) {
    let focused = state.ui.focused_panel;
    let area = layout.chat_log;
    let width = area.width.saturating_sub(2).max(1) as usize;

    let mut lines: Vec<Line> = Vec::new();
    for message in state.chat.log().messages() {
        let (prefix, style) = match message.role {
            ChatRole::User => ("You", Style::default().fg(WarpColors::ACCENT_BLUE)),
            ChatRole::Assistant => ("Assistant", Style::default().fg(WarpColors::ACCENT_GREEN)),
        };
        lines.push(Line::styled(
            format!("{} · {}", prefix, message.sent_at.format("%H:%M")),
            style.add_modifier(Modifier::BOLD),
        ));
        for wrapped in textwrap::wrap(&message.content, width) {
            lines.push(Line::styled(
                wrapped.into_owned(),
                Style::default().fg(WarpColors::TEXT_PRIMARY),
            ));
        }
        lines.push(Line::raw(""));
    }
    if state.chat.pending_replies() > 0 {
        lines.push(Line::styled(
            "Assistant is typing...",
            Style::default()
                .fg(WarpColors::TEXT_MUTED)
                .add_modifier(Modifier::ITALIC),
        ));
    }

    // keep the newest messages in view
    let visible = area.height.saturating_sub(2) as usize;
    let skip = lines.len().saturating_sub(visible);
    let lines: Vec<Line> = lines.into_iter().skip(skip).collect();

    let log = Paragraph::new(lines).block(
        Block::default()
            .title(" Chat ")
            .borders(Borders::ALL)
            .border_style(layout.border_style(Panel::Chat, focused)),
    );
    frame.render_widget(log, area);

    let cursor = if focused == Panel::Chat { "▏" } else { "" };
    let input_width = layout.chat_input.width.saturating_sub(2) as usize;
    let input_text = format!("{}{}", state.chat.input(), cursor);
    let input = Paragraph::new(input_tail(&input_text, input_width))
        .style(Style::default().fg(WarpColors::TEXT_PRIMARY))
        .block(
            Block::default()
                .title(" Ask about this PDF ")
                .borders(Borders::ALL)
                .border_style(layout.border_style(Panel::Chat, focused)),
        );
    frame.render_widget(input, layout.chat_input);
}

/// End of the input that fits in `width` columns, so the cursor stays visible
fn input_tail(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut start = text.len();
    for (index, c) in text.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > width {
            break;
        }
        start = index;
    }
    text[start..].to_string()
}

fn draw_status_bar(frame: &mut Frame, state: &ViewerState, area: Rect) {
    let mut spans = Vec::new();
    if let Some(error) = &state.ui.error_message {
        spans.push(Span::styled(
            format!(" ❌ {} ", error),
            Style::default().fg(WarpColors::STATUS_ERROR),
        ));
    } else {
        spans.push(Span::styled(
            format!(" {} ", state.ui.status_message),
            Style::default().fg(WarpColors::TEXT_SECONDARY),
        ));
    }

    let help = match state.ui.focused_panel {
        _ if state.selection.is_menu_open() => "1-4 pick action │ Esc close",
        Panel::Page => "←/→ page │ ↑/↓ scroll │ drag to select │ Tab chat │ q quit",
        Panel::Chat => "Enter send │ Esc/Tab back to page",
    };
    spans.push(Span::styled(
        format!("│ {}", help),
        Style::default().fg(WarpColors::TEXT_MUTED),
    ));

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(WarpColors::BORDER)),
    );
    frame.render_widget(bar, area);
}

fn draw_action_menu(frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for (i, action) in ActionKind::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("│", Style::default().fg(WarpColors::BORDER)));
        }
        let style = match action {
            ActionKind::Chat => Style::default()
                .fg(WarpColors::ACCENT_GREEN)
                .add_modifier(Modifier::BOLD),
            _ => Style::default().fg(WarpColors::TEXT_PRIMARY),
        };
        spans.push(Span::styled(menu_entry(*action), style));
    }

    let menu = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(WarpColors::BORDER_FOCUSED))
            .style(Style::default().bg(WarpColors::SURFACE)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(menu, area);
}

//! Diagnostics pane rendering

use super::{border_style, clamp_scroll};
use crate::interpreter::{Diagnostic, DiagnosticKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

fn kind_style(kind: DiagnosticKind) -> Style {
    match kind {
        DiagnosticKind::Warning => Style::default().fg(DEFAULT_THEME.warning),
        DiagnosticKind::Runtime => Style::default().fg(DEFAULT_THEME.error),
        DiagnosticKind::Syntax | DiagnosticKind::ResourceLimit => Style::default()
            .fg(DEFAULT_THEME.error)
            .add_modifier(Modifier::BOLD),
    }
}

pub fn render_diagnostics_pane(
    frame: &mut Frame,
    area: Rect,
    diagnostics: &[Diagnostic],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(format!(" 诊断 ({}) ", diagnostics.len()))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    if diagnostics.is_empty() {
        let paragraph = Paragraph::new("(无)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, diagnostics.len(), visible_height);

    let items: Vec<ListItem> = diagnostics
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|d| {
            let location = match d.line {
                Some(line) => format!("{:>4} ", line),
                None => "     ".to_string(),
            };
            ListItem::new(Line::from(vec![
                Span::styled(location, Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(d.to_string(), kind_style(d.kind)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

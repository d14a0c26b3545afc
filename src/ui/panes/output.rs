//! Program output pane rendering

use super::{border_style, clamp_scroll};
use crate::io::{Console, OutputKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

fn kind_style(kind: OutputKind) -> Style {
    match kind {
        OutputKind::Program => Style::default().fg(DEFAULT_THEME.fg),
        OutputKind::InputEcho => Style::default().fg(DEFAULT_THEME.input_echo),
        OutputKind::Note => Style::default()
            .fg(DEFAULT_THEME.error)
            .add_modifier(Modifier::ITALIC),
    }
}

/// Render the output pane. `trailer` is the statistics block shown after the
/// program's own output.
pub fn render_output_pane(
    frame: &mut Frame,
    area: Rect,
    console: Option<&Console>,
    trailer: &str,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" 运行结果 ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let Some(console) = console else {
        let paragraph = Paragraph::new("(按 r 编译运行)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let mut items: Vec<ListItem> = console
        .lines()
        .into_iter()
        .map(|(text, kind)| ListItem::new(Line::from(text)).style(kind_style(kind)))
        .collect();
    if console.is_empty() {
        items.push(
            ListItem::new(crate::runner::stats::NO_OUTPUT_MESSAGE)
                .style(Style::default().fg(DEFAULT_THEME.comment)),
        );
    }
    items.extend(trailer.lines().map(|line| {
        ListItem::new(line.to_string()).style(Style::default().fg(DEFAULT_THEME.success))
    }));

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, items.len(), visible_height);

    let visible: Vec<ListItem> = items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();
    frame.render_widget(List::new(visible).block(block), area);
}

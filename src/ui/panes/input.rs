//! The stdin line

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the `scanf` input line. While `editing` holds a buffer, that
/// buffer is shown with a cursor instead of the committed input.
pub fn render_input_line(frame: &mut Frame, area: Rect, stdin: &str, editing: Option<&str>) {
    let (label_bg, text, text_style) = match editing {
        Some(buffer) => (
            DEFAULT_THEME.secondary,
            format!(" {}▏", buffer),
            Style::default().fg(DEFAULT_THEME.fg),
        ),
        None if stdin.is_empty() => (
            DEFAULT_THEME.comment,
            " 例如：42,hello (按 i 编辑)".to_string(),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        None => (
            DEFAULT_THEME.comment,
            format!(" {}", stdin),
            Style::default().fg(DEFAULT_THEME.fg),
        ),
    };

    let spans = vec![
        Span::styled(
            " 输入 ",
            Style::default()
                .bg(label_bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(text, text_style),
    ];
    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg));
    frame.render_widget(paragraph, area);
}

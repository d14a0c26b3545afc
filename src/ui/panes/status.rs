//! Status bar rendering with keybindings and run state indicators

use crate::ui::app::RunPhase;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn phase_badge(phase: RunPhase) -> (&'static str, Color) {
    match phase {
        RunPhase::NotRun => (" 未运行 ", DEFAULT_THEME.primary),
        RunPhase::Compiling => (" 编译中… ", DEFAULT_THEME.secondary),
        RunPhase::Succeeded => (" 完成 ", DEFAULT_THEME.success),
        RunPhase::Failed => (" 失败 ", DEFAULT_THEME.error),
    }
}

/// Render the status bar at the bottom.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    phase: RunPhase,
    is_editing_input: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (badge, badge_bg) = phase_badge(phase);
    let left_spans = vec![
        Span::styled(
            badge,
            Style::default()
                .bg(badge_bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(if phase == RunPhase::Failed {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.fg
                }),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let bindings: Vec<(&str, &str)> = if is_editing_input {
        vec![(" ↵ ", " 确认 "), (" Esc ", " 取消 ")]
    } else {
        vec![
            (" r ", " 运行 "),
            (" i ", " 输入 "),
            (" Tab ", " 切换 "),
            (" ↑/↓ ", " 滚动 "),
            (" n/p ", " 示例 "),
            (" q ", " 退出 "),
        ]
    };

    let mut right_spans = Vec::new();
    for (idx, (key, desc)) in bindings.into_iter().enumerate() {
        if idx > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(key, key_style));
        right_spans.push(Span::styled(desc, desc_style));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}

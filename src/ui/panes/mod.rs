//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code display with syntax highlighting and diagnostic line markers
//! - [`output`]: Program output, `scanf` echoes and inline notes
//! - [`diagnostics`]: Syntax errors, warnings and runtime errors of the last run
//! - [`input`]: The stdin line fed to `scanf`
//! - [`status`]: Status bar with keybindings and run state
//!
//! Each pane module exports a primary `render_*` function that draws from
//! borrowed state and only mutates its own scroll offset.

pub mod diagnostics;
pub mod input;
pub mod output;
pub mod source;
pub mod status;

pub use diagnostics::render_diagnostics_pane;
pub use input::render_input_line;
pub use output::render_output_pane;
pub use source::render_source_pane;
pub use status::render_status_bar;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

pub(crate) fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp `offset` so that a list of `total` rows still fills `visible` rows.
pub(crate) fn clamp_scroll(offset: &mut usize, total: usize, visible: usize) {
    if total > visible {
        *offset = (*offset).min(total - visible);
    } else {
        *offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scroll() {
        let mut offset = usize::MAX;
        clamp_scroll(&mut offset, 30, 10);
        assert_eq!(offset, 20);

        let mut offset = 5;
        clamp_scroll(&mut offset, 3, 10);
        assert_eq!(offset, 0);
    }
}

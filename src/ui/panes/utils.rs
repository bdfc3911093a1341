//! Helpers shared by the panes

use crate::evaluation::HighlightKind;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered block with the focus colour applied
pub(crate) fn block_for(title: &str, is_focused: bool) -> Block<'static> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style)
}

pub(crate) fn highlight_color(highlight: HighlightKind) -> Color {
    match highlight {
        HighlightKind::Success => DEFAULT_THEME.success,
        HighlightKind::Fail => DEFAULT_THEME.error,
        HighlightKind::DirtyStack => DEFAULT_THEME.warning,
    }
}

/// Black on the outcome colour, for badges
pub(crate) fn highlight_style(highlight: HighlightKind) -> Style {
    Style::default()
        .bg(highlight_color(highlight))
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

/// Clamp a list scroll offset so the last page stays full
pub(crate) fn clamp_scroll(offset: &mut usize, total_items: usize, visible_height: usize) {
    if total_items > visible_height {
        *offset = (*offset).min(total_items - visible_height);
    } else {
        *offset = 0;
    }
}

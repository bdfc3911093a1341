//! Script frames pane rendering

use super::utils::{block_for, clamp_scroll, highlight_color};
use crate::editor::{ComputedEditorState, FrameOutcome, ScriptEditorFrame, ScriptEditorPane};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

fn outcome_span(frame: &ScriptEditorFrame) -> Span<'static> {
    match frame.outcome() {
        FrameOutcome::NoEvaluation => Span::styled(
            "compile error",
            Style::default().fg(DEFAULT_THEME.error),
        ),
        FrameOutcome::EmptyEvaluation => {
            Span::styled("no states", Style::default().fg(DEFAULT_THEME.comment))
        }
        FrameOutcome::Finished(highlight) => Span::styled(
            highlight.label(),
            Style::default().fg(highlight_color(highlight)),
        ),
    }
}

pub(crate) fn frame_rows(
    index: usize,
    frame: &ScriptEditorFrame,
    is_active: bool,
) -> Vec<ListItem<'static>> {
    let column = ScriptEditorPane::from_index(index).map_or("   ", ScriptEditorPane::label);
    let marker = if is_active { "▶ " } else { "  " };
    let name_style = if is_active {
        Style::default()
            .fg(DEFAULT_THEME.secondary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    };

    let mut rows = vec![ListItem::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(DEFAULT_THEME.secondary)),
        Span::styled(
            format!("{} ", column),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(frame.name.clone(), name_style),
        Span::styled(
            format!(" ({}) ", frame.script_type),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        outcome_span(frame),
    ]))];

    for error in frame.compilation.errors() {
        let location = error
            .line
            .map(|line| format!("line {}: ", line))
            .unwrap_or_default();
        rows.push(ListItem::new(Line::from(vec![
            Span::raw("      "),
            Span::styled(location, Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(error.message.clone(), Style::default().fg(DEFAULT_THEME.error)),
        ])));
    }
    rows
}

/// Render the list of frames for the current editor state
pub fn render_frames_pane(
    frame: &mut Frame,
    area: Rect,
    state: &ComputedEditorState,
    active_frame: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let Some(script_mode) = state.script_mode() else {
        let block = block_for("Scripts", is_focused);
        let paragraph = Paragraph::new(format!(
            "Nothing to evaluate in the {} view",
            state.editor_mode().title()
        ))
        .block(block)
        .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let mut title = format!("Scripts · {}", script_mode.editor_mode.title());
    if script_mode.is_p2sh {
        title.push_str(" · P2SH");
    }
    let block = block_for(&title, is_focused).padding(Padding::new(1, 0, 0, 0));

    let all_items: Vec<ListItem> = script_mode
        .frames
        .iter()
        .enumerate()
        .flat_map(|(index, editor_frame)| {
            frame_rows(index, editor_frame, index == active_frame)
        })
        .collect();

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, all_items.len(), visible_height);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{Compilation, CompilationError, TemplateScript};
    use ratatui::{backend::TestBackend, Terminal};

    fn frame(compilation: Compilation) -> ScriptEditorFrame {
        ScriptEditorFrame::from_script(&TemplateScript {
            internal_id: "l".to_string(),
            id: "lock".to_string(),
            name: "Lock".to_string(),
            script_type: crate::editor::ScriptType::Locking,
            parent_internal_id: None,
            p2sh: false,
            script: String::new(),
            compilation: Some(compilation),
        })
    }

    fn rendered(rows: Vec<ListItem<'static>>) -> String {
        let height = rows.len() as u16;
        let mut terminal = Terminal::new(TestBackend::new(60, height)).unwrap();
        terminal
            .draw(|f| f.render_widget(List::new(rows), f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(60)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_rows_labelled_by_editor_column() {
        let failed = frame(Compilation::Failure {
            errors: vec![CompilationError {
                message: "Unknown identifier".to_string(),
                line: Some(2),
            }],
        });

        let text = rendered(frame_rows(1, &failed, true));
        assert!(text.starts_with("▶ 2nd Lock (locking) compile error"));
        assert!(text.contains("line 2: Unknown identifier"));
    }
}

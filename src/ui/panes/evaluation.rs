//! Evaluation pane rendering
//!
//! Shows the annotated lines of the active frame's evaluation:
//!
//! - a gutter of spacers, one column per open conditional or sub-evaluation
//! - the instruction that produced each state
//! - the outcome badge on the final line
//!
//! The current line is kept at a fixed visual row while stepping, the same
//! way a debugger keeps the current source line in place. When the script did
//! not compile, the compiler's errors are listed instead.

use super::utils::{block_for, highlight_style};
use crate::evaluation::{EvaluationLine, HighlightKind, SpacerKind};
use crate::trace::CompilationError;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Scroll state for the evaluation pane
#[derive(Debug, Default)]
pub struct EvaluationScrollState {
    pub offset: usize,
    /// Visual row the current line is pinned to (None = centre on first render)
    pub target_line_row: Option<usize>,
}

/// Data needed to render the evaluation pane
pub struct EvaluationRenderData<'a> {
    pub title: &'a str,
    /// `None` when the script did not compile
    pub evaluation: Option<&'a [EvaluationLine]>,
    pub errors: &'a [CompilationError],
    pub current: usize,
}

fn spacer_span(spacer: SpacerKind) -> Span<'static> {
    match spacer {
        SpacerKind::ExecutedConditional => {
            Span::styled("│ ", Style::default().fg(DEFAULT_THEME.success))
        }
        SpacerKind::SkippedConditional => {
            Span::styled("┆ ", Style::default().fg(DEFAULT_THEME.comment))
        }
        SpacerKind::Evaluation => Span::styled("┃ ", Style::default().fg(DEFAULT_THEME.primary)),
    }
}

fn badge(highlight: HighlightKind) -> &'static str {
    match highlight {
        HighlightKind::Success => " ✔ success ",
        HighlightKind::Fail => " ✖ fail ",
        HighlightKind::DirtyStack => " ⚠ dirty stack ",
    }
}

fn render_line(index: usize, line: &EvaluationLine, is_current: bool) -> Line<'static> {
    let executing = line.state.is_executing();
    let num_style = if is_current {
        Style::default()
            .fg(DEFAULT_THEME.secondary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.comment)
    };

    let mut spans = vec![Span::styled(format!("{:4} ", index), num_style)];
    spans.extend(line.spacers.iter().map(|&spacer| spacer_span(spacer)));

    let instruction = match &line.state.instruction {
        Some(instruction) => instruction.to_string(),
        None => "(initial state)".to_string(),
    };
    let is_flow_control = line
        .state
        .instruction
        .as_ref()
        .is_some_and(|instruction| instruction.opcode.is_flow_control());
    // Conditionals stand out even inside a skipped branch, where they still run
    let instruction_style = if is_flow_control {
        Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD)
    } else if executing {
        Style::default().fg(DEFAULT_THEME.opcode)
    } else {
        Style::default()
            .fg(DEFAULT_THEME.comment)
            .add_modifier(Modifier::DIM)
    };
    spans.push(Span::styled(instruction, instruction_style));

    if let Some(top) = line.state.top() {
        spans.push(Span::styled(
            format!("  ⟶ {}", top),
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }

    if let Some(error) = &line.state.error {
        spans.push(Span::styled(
            format!("  {}", error),
            Style::default().fg(DEFAULT_THEME.error),
        ));
    }

    if let Some(highlight) = line.highlight {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(badge(highlight), highlight_style(highlight)));
    }

    if is_current {
        for span in &mut spans {
            span.style = span.style.bg(DEFAULT_THEME.current_line_bg);
        }
    }

    Line::from(spans)
}

fn render_errors(errors: &[CompilationError]) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "Compilation failed, nothing to evaluate:",
        Style::default()
            .fg(DEFAULT_THEME.error)
            .add_modifier(Modifier::BOLD),
    ))];
    for error in errors {
        let location = match error.line {
            Some(line) => format!("  line {}: ", line),
            None => "  ".to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(location, Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(error.message.clone(), Style::default().fg(DEFAULT_THEME.fg)),
        ]));
    }
    lines
}

/// Render the evaluation pane
pub fn render_evaluation_pane(
    frame: &mut Frame,
    area: Rect,
    data: EvaluationRenderData,
    is_focused: bool,
    scroll_state: &mut EvaluationScrollState,
) {
    let block = block_for(data.title, is_focused);

    let Some(evaluation) = data.evaluation else {
        frame.render_widget(Paragraph::new(render_errors(data.errors)).block(block), area);
        return;
    };

    if evaluation.is_empty() {
        let paragraph = Paragraph::new("(the evaluator recorded no states)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let total_lines = evaluation.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Keep the current line at the target visual row
    scroll_state.offset = data.current.saturating_sub(target_row);
    if total_lines > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let visible_lines: Vec<Line> = evaluation
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(index, line)| render_line(index, line, index == data.current))
        .collect();

    frame.render_widget(Paragraph::new(visible_lines).block(block), area);
}

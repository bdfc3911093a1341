//! Stack pane rendering
//!
//! Displays the current program state's stacks, top item first:
//!
//! - data stack items with their script-number reading and, when the bytes
//!   match a binding, the identifier name
//! - the alternate stack
//! - the execution stack (one row per open conditional)
//! - the VM error, if this state failed

use super::utils::{block_for, clamp_scroll};
use crate::evaluation::StackItemIdentifier;
use crate::ui::theme::DEFAULT_THEME;
use crate::vm::{ItemFormat, ProgramState, StackItem};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Scroll state for the stack pane
#[derive(Debug, Default)]
pub struct StackScrollState {
    pub offset: usize,
    pub prev_item_count: usize,
}

/// Data needed to render the stack pane
pub struct StackRenderData<'a> {
    pub state: Option<&'a ProgramState>,
    pub identifier: Option<&'a StackItemIdentifier>,
}

fn section_header(title: &str, count: usize) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
        Span::styled(
            title.to_string(),
            Style::default()
                .fg(DEFAULT_THEME.fg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({})", count),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ]))
}

fn empty_row() -> ListItem<'static> {
    ListItem::new("  (empty)").style(Style::default().fg(DEFAULT_THEME.comment))
}

/// One stack item: `[depth] value  hex  ← identifier`
pub(crate) fn item_spans(
    depth: usize,
    item: &StackItem,
    identifier: Option<&StackItemIdentifier>,
) -> Vec<Span<'static>> {
    let mut spans = vec![
        Span::styled(
            format!("  [{}] ", depth),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            item.format(ItemFormat::Auto),
            Style::default().fg(DEFAULT_THEME.number),
        ),
    ];

    if item.len() <= 4 && !item.is_empty() {
        spans.push(Span::styled(
            format!("  {}", item.format(ItemFormat::Hex)),
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }

    if let Some(name) = identifier.and_then(|identifier| identifier.identify_item(item)) {
        spans.push(Span::styled(
            format!("  ← {}", name),
            Style::default()
                .fg(DEFAULT_THEME.identifier)
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans
}

fn stack_rows(
    items: &[StackItem],
    identifier: Option<&StackItemIdentifier>,
) -> Vec<ListItem<'static>> {
    if items.is_empty() {
        return vec![empty_row()];
    }
    items
        .iter()
        .rev()
        .enumerate()
        .map(|(depth, item)| ListItem::new(Line::from(item_spans(depth, item, identifier))))
        .collect()
}

/// Render the stack pane
pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    data: StackRenderData,
    is_focused: bool,
    scroll_state: &mut StackScrollState,
) {
    let block = block_for("Stacks", is_focused);

    let Some(state) = data.state else {
        let list = List::new(vec![empty_row()]).block(block);
        frame.render_widget(list, area);
        return;
    };

    let mut all_items = vec![section_header("Data Stack", state.stack.len())];
    all_items.extend(stack_rows(&state.stack, data.identifier));

    all_items.push(ListItem::new(""));
    all_items.push(section_header("Alternate Stack", state.alternate_stack.len()));
    all_items.extend(stack_rows(&state.alternate_stack, data.identifier));

    all_items.push(ListItem::new(""));
    all_items.push(section_header("Execution Stack", state.execution_stack.len()));
    if state.execution_stack.is_empty() {
        all_items.push(empty_row());
    }
    for (depth, &executing) in state.execution_stack.iter().enumerate().rev() {
        let (label, color) = if executing {
            ("executing", DEFAULT_THEME.success)
        } else {
            ("skipped", DEFAULT_THEME.comment)
        };
        all_items.push(ListItem::new(Line::from(vec![
            Span::styled(
                format!("  [{}] ", depth),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
            Span::styled(label, Style::default().fg(color)),
        ])));
    }

    if state.evaluation_depth > 0 {
        all_items.push(ListItem::new(Line::from(Span::styled(
            format!("  inside {} sub-evaluation(s)", state.evaluation_depth),
            Style::default().fg(DEFAULT_THEME.primary),
        ))));
    }

    if let Some(error) = &state.error {
        all_items.push(ListItem::new(""));
        all_items.push(ListItem::new(Line::from(vec![
            Span::styled(
                "✖ ",
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(error.clone(), Style::default().fg(DEFAULT_THEME.error)),
        ])));
    }

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Follow the top of the stack when it grows past the visible area
    if total_items != scroll_state.prev_item_count {
        scroll_state.offset = 0;
        scroll_state.prev_item_count = total_items;
    }
    clamp_scroll(&mut scroll_state.offset, total_items, visible_height);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(scroll_state.offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

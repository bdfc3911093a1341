//! Main TUI application state and logic

use super::panes::{
    render_evaluation_pane, render_frames_pane, render_stack_pane, render_status_bar,
    EvaluationRenderData, EvaluationScrollState, StackRenderData, StackScrollState,
    StatusRenderData,
};
use crate::editor::{
    ComputedEditorState, EditorSession, FrameOutcome, ScriptEditorFrame, ScriptEditorPane,
};
use crate::trace::EvaluationCursor;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Viewer settings taken from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Delay between steps while playing
    pub play_interval: Duration,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            play_interval: Duration::from_secs(1),
        }
    }
}

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Evaluation,
    Stack,
    Frames,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: evaluation -> frames -> stack)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Evaluation => FocusedPane::Frames,
            FocusedPane::Frames => FocusedPane::Stack,
            FocusedPane::Stack => FocusedPane::Evaluation,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Evaluation => FocusedPane::Stack,
            FocusedPane::Frames => FocusedPane::Evaluation,
            FocusedPane::Stack => FocusedPane::Frames,
        }
    }
}

/// One cursor per frame, sized to the frame's evaluation
fn cursors_for(state: &ComputedEditorState) -> Vec<EvaluationCursor> {
    state
        .frames()
        .iter()
        .map(|frame| EvaluationCursor::new(frame.evaluation.as_ref().map_or(0, Vec::len)))
        .collect()
}

/// The main application state
pub struct App {
    /// The open template and its computed editor state
    pub session: EditorSession,

    pub config: ViewerConfig,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Index of the frame shown in the evaluation and stack panes
    pub active_frame: usize,

    /// Position within each frame's evaluation
    pub cursors: Vec<EvaluationCursor>,

    /// Per-pane scroll state
    pub evaluation_scroll: EvaluationScrollState,
    pub stack_scroll: StackScrollState,
    pub frames_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(session: EditorSession, config: ViewerConfig) -> Self {
        let cursors = cursors_for(session.state());
        App {
            session,
            config,
            focused_pane: FocusedPane::Evaluation,
            active_frame: 0,
            cursors,
            evaluation_scroll: EvaluationScrollState::default(),
            stack_scroll: StackScrollState::default(),
            frames_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= self.config.play_interval {
                let stepped = self
                    .active_cursor_mut()
                    .is_some_and(|cursor| cursor.step_forward().is_ok());
                if stepped {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// The frame shown in the evaluation and stack panes
    pub fn active(&self) -> Option<&ScriptEditorFrame> {
        self.session.state().frames().get(self.active_frame)
    }

    fn active_cursor_mut(&mut self) -> Option<&mut EvaluationCursor> {
        self.cursors.get_mut(self.active_frame)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(pane_area);

        // Left column: Evaluation (top) | Frames (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let state = self.session.state();
        let active = state.frames().get(self.active_frame);
        let position = self
            .cursors
            .get(self.active_frame)
            .map_or(0, EvaluationCursor::position);
        let evaluation = active.and_then(|frame| frame.evaluation.as_deref());

        let viewer = ScriptEditorPane::from_index(self.active_frame)
            .map_or("Evaluation", |pane| pane.viewer().title());
        let title = match active {
            Some(editor_frame) => {
                format!("{} · {} ({})", viewer, editor_frame.name, editor_frame.script_type)
            }
            None => viewer.to_string(),
        };

        render_evaluation_pane(
            frame,
            left_rows[0],
            EvaluationRenderData {
                title: &title,
                evaluation,
                errors: active
                    .map(|frame| frame.compilation.errors())
                    .unwrap_or_default(),
                current: position,
            },
            self.focused_pane == FocusedPane::Evaluation,
            &mut self.evaluation_scroll,
        );

        render_frames_pane(
            frame,
            left_rows[1],
            state,
            self.active_frame,
            self.focused_pane == FocusedPane::Frames,
            &mut self.frames_scroll,
        );

        let identifier = self.session.identifier();
        render_stack_pane(
            frame,
            columns[1],
            StackRenderData {
                state: evaluation
                    .and_then(|lines| lines.get(position))
                    .map(|line| &line.state),
                identifier: identifier.as_deref(),
            },
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );

        let highlight = match active.map(ScriptEditorFrame::outcome) {
            Some(FrameOutcome::Finished(highlight)) => Some(highlight),
            _ => None,
        };
        render_status_bar(
            frame,
            status_area,
            StatusRenderData {
                message: &self.status_message,
                current_step: position,
                total_steps: evaluation.map(<[_]>::len),
                highlight,
                is_playing: self.is_playing,
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = (c as u8 - b'0') as usize;
                let stepped = self
                    .active_cursor_mut()
                    .map_or(0, |cursor| cursor.step_forward_by(n));
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Char('[') => {
                self.is_playing = false;
                self.switch_frame(false);
            }
            KeyCode::Char(']') => {
                self.is_playing = false;
                self.switch_frame(true);
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Evaluation => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.evaluation_scroll.target_line_row {
                        self.evaluation_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Stack => {
                    self.stack_scroll.offset = self.stack_scroll.offset.saturating_sub(1);
                }
                FocusedPane::Frames => {
                    self.frames_scroll = self.frames_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Evaluation => {
                    // Scrolling down makes the current line move up visually
                    if let Some(row) = self.evaluation_scroll.target_line_row {
                        self.evaluation_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Stack => {
                    self.stack_scroll.offset = self.stack_scroll.offset.saturating_add(1);
                }
                FocusedPane::Frames => {
                    self.frames_scroll = self.frames_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(self.config.play_interval)
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                if let Some(cursor) = self.active_cursor_mut() {
                    cursor.jump_to_end();
                }
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                if let Some(cursor) = self.active_cursor_mut() {
                    cursor.rewind_to_start();
                }
                self.status_message = "Jumped to start".to_string();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.is_playing = false;
                self.reload();
            }
            _ => {}
        }
    }

    /// Step forward in the active evaluation
    fn step_forward(&mut self) {
        self.status_message = match self.active_cursor_mut().map(EvaluationCursor::step_forward) {
            Some(Ok(())) => "Stepped forward".to_string(),
            Some(Err(e)) => format!("Cannot step forward: {}", e),
            None => "Nothing to evaluate".to_string(),
        };
    }

    /// Step backward in the active evaluation
    fn step_backward(&mut self) {
        self.status_message = match self.active_cursor_mut().map(EvaluationCursor::step_backward) {
            Some(Ok(())) => "Stepped backward".to_string(),
            Some(Err(e)) => format!("Cannot step backward: {}", e),
            None => "Nothing to evaluate".to_string(),
        };
    }

    /// Show the next (or previous) frame, wrapping around
    fn switch_frame(&mut self, forward: bool) {
        let count = self.cursors.len();
        if count == 0 {
            self.status_message = "No scripts to switch between".to_string();
            return;
        }
        self.active_frame = if forward {
            (self.active_frame + 1) % count
        } else {
            (self.active_frame + count - 1) % count
        };
        self.evaluation_scroll.target_line_row = None;
        self.stack_scroll = StackScrollState::default();

        if let Some(active) = self.active() {
            self.status_message = format!("Viewing {}", active.name);
        }
    }

    /// Re-read the template and keep each frame's position where possible
    fn reload(&mut self) {
        match self.session.reload() {
            Ok(summary) => {
                let fresh = cursors_for(self.session.state());
                self.cursors = fresh
                    .into_iter()
                    .enumerate()
                    .map(|(index, fresh)| match self.cursors.get(index) {
                        Some(previous) => {
                            let mut cursor = *previous;
                            cursor.resize(fresh.len());
                            cursor
                        }
                        None => fresh,
                    })
                    .collect();
                self.active_frame = self.active_frame.min(self.cursors.len().saturating_sub(1));

                self.status_message = format!(
                    "Reloaded {} script(s), {} compiled",
                    summary.frames, summary.compiled
                );
                if summary.frames > 0 && !summary.identifier_replaced {
                    self.status_message.push_str(", keeping previous identifiers");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "reload failed");
                self.status_message = format!("Reload failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TemplateDocument;
    use crossterm::event::KeyModifiers;

    const DOCUMENT: &str = r#"{
        "name": "Pair",
        "scripts": [
            { "internalId": "u", "id": "unlock", "name": "Unlock", "type": "unlocking",
              "parentInternalId": "l",
              "compilation": { "success": true, "states": [
                  { "stack": [] }, { "stack": ["01"] } ] } },
            { "internalId": "l", "id": "lock", "name": "Lock", "type": "locking",
              "compilation": { "success": true, "states": [
                  { "stack": ["01"] }, { "stack": ["01", "01"] }, { "stack": ["01"] } ] } }
        ]
    }"#;

    fn app() -> App {
        let document = TemplateDocument::from_json(DOCUMENT).unwrap();
        let session = EditorSession::from_document(document, None).unwrap();
        App::new(session, ViewerConfig::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_cursor_per_frame() {
        let app = app();
        let lens: Vec<usize> = app.cursors.iter().map(EvaluationCursor::len).collect();
        assert_eq!(lens, vec![2, 3]);
    }

    #[test]
    fn test_stepping_and_frame_switch() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.cursors[0].position(), 1);
        assert!(app.status_message.starts_with("Cannot step forward"));

        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.active_frame, 1);
        assert_eq!(app.active().map(|frame| frame.id.as_str()), Some("lock"));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.cursors[1].position(), 2);

        // Wraps back to the first frame, which kept its position
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.active_frame, 0);
        assert_eq!(app.cursors[0].position(), 1);

        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.active_frame, 1);
    }

    #[test]
    fn test_number_keys_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char(']'));
        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.status_message, "Stepped forward 2 step(s)");
        press(&mut app, KeyCode::Backspace);
        assert!(app.cursors[1].is_at_start());

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_reload_without_path_keeps_positions() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.cursors[0].position(), 1);
        assert_eq!(app.status_message, "Reloaded 2 script(s), 2 compiled");
    }

    #[test]
    fn test_focus_cycle() {
        let pane = FocusedPane::Evaluation;
        assert_eq!(pane.next(), FocusedPane::Frames);
        assert_eq!(pane.next().next().next(), pane);
        assert_eq!(pane.prev().next(), pane);
    }
}

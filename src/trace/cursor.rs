//! Position tracking for step-by-step viewing of an evaluation

use crate::errors::CursorError;

/// Current line within an evaluation of `len` lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluationCursor {
    position: usize,
    len: usize,
}

impl EvaluationCursor {
    pub fn new(len: usize) -> Self {
        EvaluationCursor { position: 0, len }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_at_start(&self) -> bool {
        self.position == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.len
    }

    /// Move to the next line
    pub fn step_forward(&mut self) -> Result<(), CursorError> {
        if self.is_empty() {
            return Err(CursorError::Empty);
        }
        if self.is_at_end() {
            return Err(CursorError::AtEnd);
        }
        self.position += 1;
        Ok(())
    }

    /// Move to the previous line
    pub fn step_backward(&mut self) -> Result<(), CursorError> {
        if self.is_empty() {
            return Err(CursorError::Empty);
        }
        if self.is_at_start() {
            return Err(CursorError::AtStart);
        }
        self.position -= 1;
        Ok(())
    }

    /// Step forward up to `n` times, returning how many steps were taken
    pub fn step_forward_by(&mut self, n: usize) -> usize {
        let mut stepped = 0;
        while stepped < n && self.step_forward().is_ok() {
            stepped += 1;
        }
        stepped
    }

    pub fn rewind_to_start(&mut self) {
        self.position = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.position = self.len.saturating_sub(1);
    }

    /// Adopt a new length after a reload, keeping the position when possible
    pub fn resize(&mut self, len: usize) {
        self.len = len;
        self.position = self.position.min(len.saturating_sub(1));
    }
}

//! Program states recorded by the external VM
//!
//! One [`ProgramState`] is recorded after every evaluated instruction. States
//! are read from a template document and never modified afterwards.

use super::opcode::Instruction;
use super::stack_item::StackItem;
use serde::{Deserialize, Serialize};

/// Snapshot of the VM after one instruction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramState {
    /// Instruction pointer within the active bytecode
    pub ip: usize,
    /// The instruction that produced this state (absent for the initial state)
    pub instruction: Option<Instruction>,
    /// Data stack, bottom first
    pub stack: Vec<StackItem>,
    pub alternate_stack: Vec<StackItem>,
    /// One entry per open conditional block, outermost first; `false` when the
    /// active branch is being skipped
    pub execution_stack: Vec<bool>,
    /// Number of enclosing sub-evaluations (0 at the top level)
    pub evaluation_depth: usize,
    /// Set when the VM failed on this instruction
    pub error: Option<String>,
}

impl ProgramState {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Exactly one item remains, and it is the canonical encoding of `1`
    pub fn is_clean_stack(&self) -> bool {
        matches!(self.stack.as_slice(), [only] if only.is_canonical_one())
    }

    /// Whether instructions at this point are being executed rather than skipped
    pub fn is_executing(&self) -> bool {
        self.execution_stack.iter().all(|&branch| branch)
    }

    pub fn top(&self) -> Option<&StackItem> {
        self.stack.last()
    }
}

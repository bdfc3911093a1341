//! VM data as recorded by the external evaluator
//!
//! - [`stack_item`]: raw stack values and their numeric/boolean readings
//! - [`opcode`]: opcode names and single-instruction decoding
//! - [`state`]: the per-instruction [`state::ProgramState`]
//!
//! Nothing here executes scripts. These types only describe what an evaluator
//! has already produced.

pub mod opcode;
pub mod stack_item;
pub mod state;

pub use opcode::{Instruction, Opcode};
pub use stack_item::{ItemFormat, StackItem};
pub use state::ProgramState;

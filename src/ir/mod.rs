//! Three-address intermediate representation.
//!
//! A [`ClassUnit`] holds methods whose bodies are flat lists of closed
//! [`Instruction`] variants over [`Operand`]s. Branch targets are kept out of
//! the instruction list in a per-method label map, and every method carries
//! the [`VarTable`] that assigns virtual registers to its variables.

mod display;
mod types;
mod var_table;

pub use types::*;
pub use var_table::{VarDescriptor, VarTable};

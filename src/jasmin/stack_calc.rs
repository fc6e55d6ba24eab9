use std::collections::HashMap;

use crate::error::{CompileError, CompileResult};

use super::mnemonic::Mnemonic;

/// Returns the net operand stack change for an instruction.
pub fn stack_delta(instr: &Mnemonic) -> i32 {
    match instr {
        // Constants and loads: push 1
        Mnemonic::Iconstm1
        | Mnemonic::Iconst0
        | Mnemonic::Iconst1
        | Mnemonic::Iconst2
        | Mnemonic::Iconst3
        | Mnemonic::Iconst4
        | Mnemonic::Iconst5
        | Mnemonic::Bipush(_)
        | Mnemonic::Sipush(_)
        | Mnemonic::Ldc(_)
        | Mnemonic::Iload(_)
        | Mnemonic::Iload0
        | Mnemonic::Iload1
        | Mnemonic::Iload2
        | Mnemonic::Iload3
        | Mnemonic::Aload(_)
        | Mnemonic::Aload0
        | Mnemonic::Aload1
        | Mnemonic::Aload2
        | Mnemonic::Aload3
        | Mnemonic::New(_) => 1,

        // Stores: pop 1
        Mnemonic::Istore(_)
        | Mnemonic::Istore0
        | Mnemonic::Istore1
        | Mnemonic::Istore2
        | Mnemonic::Istore3
        | Mnemonic::Astore(_)
        | Mnemonic::Astore0
        | Mnemonic::Astore1
        | Mnemonic::Astore2
        | Mnemonic::Astore3 => -1,

        Mnemonic::Iinc { .. } => 0,

        // Binary ops: pop 2, push 1
        Mnemonic::Iadd
        | Mnemonic::Isub
        | Mnemonic::Imul
        | Mnemonic::Idiv
        | Mnemonic::Iand
        | Mnemonic::Ior
        | Mnemonic::Ixor => -1,

        // Array load: pop arrayref + index, push value
        Mnemonic::Iaload | Mnemonic::Baload | Mnemonic::Aaload => -1,
        // Array store: pop arrayref + index + value
        Mnemonic::Iastore | Mnemonic::Bastore | Mnemonic::Aastore => -3,
        // Pop count, push arrayref
        Mnemonic::Newarray(_) | Mnemonic::Anewarray(_) => 0,
        Mnemonic::Arraylength => 0,

        // Conditional branches pop the tested value
        Mnemonic::Ifeq(_)
        | Mnemonic::Ifne(_)
        | Mnemonic::Iflt(_)
        | Mnemonic::Ifge(_)
        | Mnemonic::Ifgt(_)
        | Mnemonic::Ifle(_) => -1,
        Mnemonic::Goto(_) => 0,

        Mnemonic::Ireturn | Mnemonic::Areturn => -1,
        Mnemonic::Return => 0,

        // objectref -> value
        Mnemonic::Getfield(_) => 0,
        // objectref, value ->
        Mnemonic::Putfield(_) => -2,

        Mnemonic::Invokevirtual(r) | Mnemonic::Invokespecial(r) => {
            -(r.arg_count as i32) - 1 + r.returns_value as i32
        }
        Mnemonic::Invokestatic(r) => -(r.arg_count as i32) + r.returns_value as i32,

        Mnemonic::Pop => -1,
    }
}

/// Tracks operand stack depth across one method body.
///
/// Branch targets remember the depth at the jump, so code following an
/// unconditional transfer resumes at the depth recorded for its label.
#[derive(Debug, Default)]
pub struct StackTracker {
    depth: i32,
    max_depth: i32,
    reachable: bool,
    label_depths: HashMap<String, i32>,
}

impl StackTracker {
    pub fn new() -> Self {
        StackTracker {
            reachable: true,
            ..Default::default()
        }
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn max_depth(&self) -> u16 {
        self.max_depth as u16
    }

    /// Apply one instruction; fails if it would pop from an empty stack.
    pub fn apply(&mut self, instr: &Mnemonic) -> CompileResult<()> {
        self.depth += stack_delta(instr);
        if self.depth < 0 {
            return Err(CompileError::MalformedInstruction {
                message: format!("operand stack underflow at '{}'", instr),
            });
        }
        self.max_depth = self.max_depth.max(self.depth);

        if let Some(target) = instr.branch_target() {
            self.label_depths.entry(target.to_string()).or_insert(self.depth);
        }
        if instr.ends_block() {
            self.reachable = false;
            self.depth = 0;
        }
        Ok(())
    }

    /// A label is placed before the next instruction.
    pub fn bind_label(&mut self, label: &str) {
        if !self.reachable {
            self.depth = self.label_depths.get(label).copied().unwrap_or(0);
        }
        self.reachable = true;
    }
}

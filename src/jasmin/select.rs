//! Instruction selection helpers: pick the shortest encoding for a value,
//! a slot access or a comparison.

use crate::error::{CompileError, CompileResult};
use crate::ir::{BinaryOp, Instruction, Operand, Var};
use crate::types::Type;

use super::mnemonic::Mnemonic;

/// Push an int constant with the shortest instruction that encodes it.
pub fn int_const(value: i32) -> Mnemonic {
    match value {
        -1 => Mnemonic::Iconstm1,
        0 => Mnemonic::Iconst0,
        1 => Mnemonic::Iconst1,
        2 => Mnemonic::Iconst2,
        3 => Mnemonic::Iconst3,
        4 => Mnemonic::Iconst4,
        5 => Mnemonic::Iconst5,
        v if (-128..=127).contains(&v) => Mnemonic::Bipush(v as i8),
        v if (-32768..=32767).contains(&v) => Mnemonic::Sipush(v as i16),
        v => Mnemonic::Ldc(v),
    }
}

/// Load family by static type: int-like values use `iload`, everything
/// else `aload`.
pub fn load(ty: &Type, slot: u16) -> Mnemonic {
    if ty.is_int_like() {
        match slot {
            0 => Mnemonic::Iload0,
            1 => Mnemonic::Iload1,
            2 => Mnemonic::Iload2,
            3 => Mnemonic::Iload3,
            n => Mnemonic::Iload(n),
        }
    } else {
        match slot {
            0 => Mnemonic::Aload0,
            1 => Mnemonic::Aload1,
            2 => Mnemonic::Aload2,
            3 => Mnemonic::Aload3,
            n => Mnemonic::Aload(n),
        }
    }
}

pub fn store(ty: &Type, slot: u16) -> Mnemonic {
    if ty.is_int_like() {
        match slot {
            0 => Mnemonic::Istore0,
            1 => Mnemonic::Istore1,
            2 => Mnemonic::Istore2,
            3 => Mnemonic::Istore3,
            n => Mnemonic::Istore(n),
        }
    } else {
        match slot {
            0 => Mnemonic::Astore0,
            1 => Mnemonic::Astore1,
            2 => Mnemonic::Astore2,
            3 => Mnemonic::Astore3,
            n => Mnemonic::Astore(n),
        }
    }
}

pub fn array_load(element: &Type) -> Mnemonic {
    match element {
        Type::Int => Mnemonic::Iaload,
        Type::Boolean => Mnemonic::Baload,
        _ => Mnemonic::Aaload,
    }
}

pub fn array_store(element: &Type) -> Mnemonic {
    match element {
        Type::Int => Mnemonic::Iastore,
        Type::Boolean => Mnemonic::Bastore,
        _ => Mnemonic::Aastore,
    }
}

pub fn arithmetic(op: BinaryOp) -> Option<Mnemonic> {
    match op {
        BinaryOp::Add => Some(Mnemonic::Iadd),
        BinaryOp::Sub => Some(Mnemonic::Isub),
        BinaryOp::Mul => Some(Mnemonic::Imul),
        BinaryOp::Div => Some(Mnemonic::Idiv),
        BinaryOp::And => Some(Mnemonic::Iand),
        BinaryOp::Or => Some(Mnemonic::Ior),
        _ => None,
    }
}

/// Branch taken when `left - right` satisfies the relational `op`.
///
/// The comparison is done on the `isub` result, so it inherits the
/// wrap-around of 32-bit subtraction.
pub fn compare_branch(op: BinaryOp, label: String) -> CompileResult<Mnemonic> {
    match op {
        BinaryOp::Lt => Ok(Mnemonic::Iflt(label)),
        BinaryOp::Ge => Ok(Mnemonic::Ifge(label)),
        BinaryOp::Gt => Ok(Mnemonic::Ifgt(label)),
        BinaryOp::Le => Ok(Mnemonic::Ifle(label)),
        BinaryOp::Eq => Ok(Mnemonic::Ifeq(label)),
        BinaryOp::Ne => Ok(Mnemonic::Ifne(label)),
        other => Err(CompileError::UnsupportedOperator {
            op: other.symbol().to_string(),
            context: "comparison",
        }),
    }
}

/// Delta for `dest := dest + k`, `dest := dest - k` or `dest := k + dest`
/// when it fits a signed byte. `k - dest` never qualifies.
pub fn increment_delta(dest: &Var, rhs: &Instruction) -> Option<i8> {
    if !dest.ty.is_int_like() {
        return None;
    }
    let (op, left, right) = match rhs {
        Instruction::BinaryOp {
            op, left, right, ..
        } => (*op, left, right),
        _ => return None,
    };
    let same = |operand: &Operand| matches!(operand, Operand::Variable(v) if v.name == dest.name);
    let delta = match (op, left, right) {
        (BinaryOp::Add, l, Operand::Literal { value, .. }) if same(l) => i64::from(*value),
        (BinaryOp::Add, Operand::Literal { value, .. }, r) if same(r) => i64::from(*value),
        (BinaryOp::Sub, l, Operand::Literal { value, .. }) if same(l) => -i64::from(*value),
        _ => return None,
    };
    i8::try_from(delta).ok()
}

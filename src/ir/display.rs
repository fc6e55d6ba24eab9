//! Textual IR, one instruction per line.

use std::fmt;

use super::types::*;

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_this() {
            return write!(f, "this");
        }
        if let Some(pos) = self.param {
            write!(f, "${}.", pos)?;
        }
        write!(f, "{}.{}", self.name, self.ty.ir_suffix())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal { value, ty } => write!(f, "{}.{}", value, ty.ir_suffix()),
            Operand::Variable(var) => write!(f, "{}", var),
            Operand::ArrayElement { array, index, ty } => {
                if let Some(pos) = array.param {
                    write!(f, "${}.", pos)?;
                }
                write!(f, "{}[{}].{}", array.name, index, ty.ir_suffix())
            }
        }
    }
}

impl fmt::Display for CallInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind.name())?;
        match &self.caller {
            Caller::Object(object) => write!(f, "{}", object)?,
            Caller::Class(name) => write!(f, "{}", name)?,
        }
        if let Some(method) = &self.method {
            write!(f, ", \"{}\"", method)?;
        }
        for arg in &self.args {
            write!(f, ", {}", arg)?;
        }
        write!(f, ").{}", self.return_type.ir_suffix())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Assign { dest, ty, rhs } => {
                write!(f, "{} :=.{} {}", dest, ty.ir_suffix(), rhs)
            }
            Instruction::BinaryOp {
                op,
                left,
                right,
                ty,
            } => write!(f, "{} {}.{} {}", left, op.symbol(), ty.ir_suffix(), right),
            Instruction::UnaryOp {
                op: UnaryOp::Not,
                operand,
                ty,
            } => write!(f, "!.{} {}", ty.ir_suffix(), operand),
            Instruction::SingleOp(operand) => write!(f, "{}", operand),
            Instruction::Call(call) => write!(f, "{}", call),
            Instruction::GetField { object, field } => write!(
                f,
                "getfield({}, {}.{}).{}",
                object,
                field.name,
                field.ty.ir_suffix(),
                field.ty.ir_suffix()
            ),
            Instruction::PutField {
                object,
                field,
                value,
            } => write!(
                f,
                "putfield({}, {}.{}, {}).V",
                object,
                field.name,
                field.ty.ir_suffix(),
                value
            ),
            Instruction::Return { operand, ty } => match operand {
                Some(operand) => write!(f, "ret.{} {}", ty.ir_suffix(), operand),
                None => write!(f, "ret.{}", ty.ir_suffix()),
            },
            Instruction::CondBranch { condition, label } => {
                write!(f, "if ({}) goto {}", condition, label)
            }
            Instruction::Goto(label) => write!(f, "goto {}", label),
            Instruction::Label(label) => write!(f, "{}:", label),
        }
    }
}

fn access_name(public: bool, private: bool, protected: bool) -> &'static str {
    if public {
        "public "
    } else if private {
        "private "
    } else if protected {
        "protected "
    } else {
        ""
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ".method {}",
            access_name(
                self.flags.contains(MethodFlags::PUBLIC),
                self.flags.contains(MethodFlags::PRIVATE),
                self.flags.contains(MethodFlags::PROTECTED),
            )
        )?;
        if self.is_static() {
            write!(f, "static ")?;
        }
        if self.flags.contains(MethodFlags::FINAL) {
            write!(f, "final ")?;
        }
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("{}.{}", p.name, p.ty.ir_suffix()))
            .collect();
        writeln!(
            f,
            "{}({}).{} {{",
            self.name,
            params.join(", "),
            self.return_type.ir_suffix()
        )?;
        for (idx, inst) in self.instructions.iter().enumerate() {
            for label in self.labels_at(idx) {
                writeln!(f, "{}:", label)?;
            }
            writeln!(f, "    {};", inst)?;
        }
        for label in self.labels_at(self.instructions.len()) {
            writeln!(f, "{}:", label)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for ClassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for import in &self.imports {
            writeln!(f, "import {};", import)?;
        }
        if !self.imports.is_empty() {
            writeln!(f)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(superclass) = &self.superclass {
            write!(f, " extends {}", superclass)?;
        }
        writeln!(f, " {{")?;
        for field in &self.fields {
            writeln!(
                f,
                ".field {}{}.{};",
                access_name(
                    field.flags.contains(FieldFlags::PUBLIC),
                    field.flags.contains(FieldFlags::PRIVATE),
                    field.flags.contains(FieldFlags::PROTECTED),
                ),
                field.name,
                field.ty.ir_suffix()
            )?;
        }
        for method in &self.methods {
            writeln!(f)?;
            writeln!(f, "{}", method)?;
        }
        write!(f, "}}")
    }
}

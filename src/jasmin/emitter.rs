use log::trace;

use crate::descriptor::DescriptorMapper;
use crate::error::{CompileError, CompileResult};
use crate::ir::{
    CallInstruction, CallKind, Caller, ClassUnit, Field, Instruction, Method, Operand, UnaryOp, Var,
};
use crate::types::Type;

use super::mnemonic::{ArrayType, FieldRef, MethodRef, Mnemonic};
use super::select;
use super::stack_calc::StackTracker;
use super::{superclass_name, CodegenOptions};

/// One line of a method body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Label(String),
    Instr(Mnemonic),
}

/// Emitted body of one method plus its `.limit` values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodCode {
    pub lines: Vec<Line>,
    pub max_stack: u16,
    pub max_locals: u16,
}

/// Translates one IR method into Jasmin instructions.
///
/// All per-method state (stack depth, label depths, the compare-label
/// counter) lives here, so a fresh emitter is made for every method.
pub struct MethodEmitter<'a> {
    class: &'a ClassUnit,
    method: &'a Method,
    mapper: DescriptorMapper<'a>,
    options: &'a CodegenOptions,
    lines: Vec<Line>,
    stack: StackTracker,
    compare_labels: u32,
}

impl<'a> MethodEmitter<'a> {
    pub fn new(class: &'a ClassUnit, method: &'a Method, options: &'a CodegenOptions) -> Self {
        MethodEmitter {
            class,
            method,
            mapper: DescriptorMapper::new(&class.name, &class.imports),
            options,
            lines: Vec::new(),
            stack: StackTracker::new(),
            compare_labels: 0,
        }
    }

    pub fn emit(mut self) -> CompileResult<MethodCode> {
        self.check_labels()?;

        let method = self.method;
        for (idx, inst) in method.instructions.iter().enumerate() {
            for label in method.labels_at(idx) {
                self.label(label.to_string());
            }
            self.instruction(inst)?;
        }
        for label in method.labels_at(method.instructions.len()) {
            self.label(label.to_string());
        }

        let max_locals = self.max_locals();
        let max_stack = self.stack.max_depth();
        trace!(
            "method {}: .limit stack {} .limit locals {}",
            method.name,
            max_stack,
            max_locals
        );
        Ok(MethodCode {
            lines: self.lines,
            max_stack,
            max_locals,
        })
    }

    /// Distinct registers in use, plus slot 0 for an instance method whose
    /// table does not mention `this`.
    fn max_locals(&self) -> u16 {
        let table = &self.method.var_table;
        let this_slot = !self.method.is_static() && !table.contains("this");
        (table.distinct_slots() + this_slot as usize) as u16
    }

    fn check_labels(&self) -> CompileResult<()> {
        for inst in &self.method.instructions {
            let target = match inst {
                Instruction::Goto(label) | Instruction::CondBranch { label, .. } => label,
                _ => continue,
            };
            if self.method.label_index(target).is_none() {
                return Err(CompileError::UnknownLabel {
                    label: target.clone(),
                    method: self.method.name.clone(),
                });
            }
        }
        Ok(())
    }

    // --- Output ---

    fn push(&mut self, instr: Mnemonic) -> CompileResult<()> {
        self.stack.apply(&instr)?;
        self.lines.push(Line::Instr(instr));
        Ok(())
    }

    fn label(&mut self, name: String) {
        self.stack.bind_label(&name);
        self.lines.push(Line::Label(name));
    }

    fn unsupported(&self, inst: &Instruction) -> CompileError {
        CompileError::UnsupportedInstruction {
            kind: inst.kind_name(),
            method: self.method.name.clone(),
        }
    }

    // --- Statements ---

    fn instruction(&mut self, inst: &Instruction) -> CompileResult<()> {
        match inst {
            Instruction::Assign { dest, rhs, .. } => self.assign(dest, rhs),
            Instruction::Call(call) => {
                self.call(call)?;
                if call.return_type != Type::Void {
                    self.push(Mnemonic::Pop)?;
                }
                Ok(())
            }
            Instruction::PutField {
                object,
                field,
                value,
            } => {
                self.load_operand(object)?;
                self.load_operand(value)?;
                let field = self.field_ref(object, field);
                self.push(Mnemonic::Putfield(field))
            }
            Instruction::Return { operand, ty } => match operand {
                Some(operand) => {
                    self.load_operand(operand)?;
                    let ty = if *ty == Type::Void { operand.ty() } else { ty };
                    if ty.is_int_like() {
                        self.push(Mnemonic::Ireturn)
                    } else {
                        self.push(Mnemonic::Areturn)
                    }
                }
                None => self.push(Mnemonic::Return),
            },
            Instruction::CondBranch { condition, label } => self.branch(condition, label),
            Instruction::Goto(label) => self.push(Mnemonic::Goto(label.clone())),
            Instruction::Label(label) => {
                self.label(label.clone());
                Ok(())
            }
            Instruction::BinaryOp { .. }
            | Instruction::UnaryOp { .. }
            | Instruction::SingleOp(_)
            | Instruction::GetField { .. } => Err(self.unsupported(inst)),
        }
    }

    fn assign(&mut self, dest: &Operand, rhs: &Instruction) -> CompileResult<()> {
        match dest {
            Operand::Variable(var) => {
                if self.options.fuse_increments {
                    if let Some(delta) = select::increment_delta(var, rhs) {
                        let index = self.slot(var)?;
                        return self.push(Mnemonic::Iinc {
                            index,
                            value: delta,
                        });
                    }
                }
                self.value(rhs)?;
                let slot = self.slot(var)?;
                self.push(select::store(&var.ty, slot))
            }
            Operand::ArrayElement { array, index, ty } => {
                self.load_var(array)?;
                self.load_operand(index)?;
                self.value(rhs)?;
                self.push(select::array_store(ty))
            }
            Operand::Literal { value, .. } => Err(CompileError::MalformedInstruction {
                message: format!("cannot assign to literal {}", value),
            }),
        }
    }

    fn branch(&mut self, condition: &Instruction, label: &str) -> CompileResult<()> {
        match condition {
            Instruction::BinaryOp {
                op, left, right, ..
            } => {
                self.load_operand(left)?;
                self.load_operand(right)?;
                if op.is_relational() {
                    self.push(Mnemonic::Isub)?;
                    self.push(select::compare_branch(*op, label.to_string())?)
                } else if op.is_logical() {
                    let combine = select::arithmetic(*op).ok_or_else(|| {
                        CompileError::UnsupportedOperator {
                            op: op.symbol().to_string(),
                            context: "branch condition",
                        }
                    })?;
                    self.push(combine)?;
                    self.push(Mnemonic::Ifne(label.to_string()))
                } else {
                    Err(CompileError::UnsupportedOperator {
                        op: op.symbol().to_string(),
                        context: "branch condition",
                    })
                }
            }
            Instruction::UnaryOp {
                op: UnaryOp::Not,
                operand,
                ..
            } => {
                self.load_operand(operand)?;
                self.push(Mnemonic::Ifeq(label.to_string()))
            }
            Instruction::SingleOp(_) | Instruction::Call(_) | Instruction::GetField { .. } => {
                self.value(condition)?;
                self.push(Mnemonic::Ifne(label.to_string()))
            }
            other => Err(self.unsupported(other)),
        }
    }

    // --- Values ---

    /// Leave the value of `rhs` on top of the stack.
    fn value(&mut self, rhs: &Instruction) -> CompileResult<()> {
        match rhs {
            Instruction::SingleOp(operand) => self.load_operand(operand),
            Instruction::BinaryOp {
                op, left, right, ..
            } => {
                self.load_operand(left)?;
                self.load_operand(right)?;
                if let Some(instr) = select::arithmetic(*op) {
                    return self.push(instr);
                }
                let n = self.compare_labels;
                self.compare_labels += 1;
                let on_true = format!("cmp_true{}", n);
                let end = format!("cmp_end{}", n);
                self.push(Mnemonic::Isub)?;
                self.push(select::compare_branch(*op, on_true.clone())?)?;
                self.push(Mnemonic::Iconst0)?;
                self.push(Mnemonic::Goto(end.clone()))?;
                self.label(on_true);
                self.push(Mnemonic::Iconst1)?;
                self.label(end);
                Ok(())
            }
            Instruction::UnaryOp {
                op: UnaryOp::Not,
                operand,
                ..
            } => {
                self.load_operand(operand)?;
                self.push(Mnemonic::Iconst1)?;
                self.push(Mnemonic::Ixor)
            }
            Instruction::Call(call) => {
                if call.return_type == Type::Void {
                    return Err(CompileError::MalformedInstruction {
                        message: format!("void call used as a value: {}", call),
                    });
                }
                self.call(call)
            }
            Instruction::GetField { object, field } => {
                self.load_operand(object)?;
                let field = self.field_ref(object, field);
                self.push(Mnemonic::Getfield(field))
            }
            other => Err(self.unsupported(other)),
        }
    }

    fn load_operand(&mut self, operand: &Operand) -> CompileResult<()> {
        match operand {
            Operand::Literal { value, ty } => {
                if !ty.is_int_like() {
                    return Err(CompileError::MalformedInstruction {
                        message: format!("literal {} has non-integer type {}", value, ty),
                    });
                }
                self.push(select::int_const(*value))
            }
            Operand::Variable(var) => self.load_var(var),
            Operand::ArrayElement { array, index, ty } => {
                self.load_var(array)?;
                self.load_operand(index)?;
                self.push(select::array_load(ty))
            }
        }
    }

    fn load_var(&mut self, var: &Var) -> CompileResult<()> {
        let slot = self.slot(var)?;
        self.push(select::load(&var.ty, slot))
    }

    fn slot(&self, var: &Var) -> CompileResult<u16> {
        if var.is_this() && !self.method.is_static() {
            return Ok(0);
        }
        self.method
            .var_table
            .get(&var.name)
            .map(|d| d.virtual_reg)
            .ok_or_else(|| CompileError::UnknownVariable {
                name: var.name.clone(),
                method: self.method.name.clone(),
            })
    }

    // --- Calls and fields ---

    fn call(&mut self, call: &CallInstruction) -> CompileResult<()> {
        match call.kind {
            CallKind::New => self.allocate(call),
            CallKind::ArrayLength => {
                let array = receiver(call)?;
                self.load_operand(array)?;
                self.push(Mnemonic::Arraylength)
            }
            CallKind::InvokeStatic => {
                let class = match &call.caller {
                    Caller::Class(name) => self.mapper.resolve(name),
                    Caller::Object(_) => {
                        return Err(CompileError::MalformedInstruction {
                            message: format!("static call on an object: {}", call),
                        })
                    }
                };
                for arg in &call.args {
                    self.load_operand(arg)?;
                }
                let method = self.method_ref(class, call)?;
                self.push(Mnemonic::Invokestatic(method))
            }
            CallKind::InvokeVirtual | CallKind::InvokeSpecial => {
                let object = receiver(call)?;
                self.load_operand(object)?;
                for arg in &call.args {
                    self.load_operand(arg)?;
                }
                let special = call.kind == CallKind::InvokeSpecial;
                let class = match object.ty() {
                    Type::This if special => superclass_name(self.class),
                    other => self.mapper.internal_name(other),
                };
                let method = self.method_ref(class, call)?;
                if special {
                    self.push(Mnemonic::Invokespecial(method))
                } else {
                    self.push(Mnemonic::Invokevirtual(method))
                }
            }
        }
    }

    fn allocate(&mut self, call: &CallInstruction) -> CompileResult<()> {
        if let Type::Array(element) = &call.return_type {
            let size = call.args.first().ok_or_else(|| CompileError::MalformedInstruction {
                message: format!("array allocation without a size: {}", call),
            })?;
            self.load_operand(size)?;
            let instr = match element.as_ref() {
                Type::Int => Mnemonic::Newarray(ArrayType::Int),
                Type::Boolean => Mnemonic::Newarray(ArrayType::Boolean),
                other => Mnemonic::Anewarray(self.mapper.internal_name(other)),
            };
            return self.push(instr);
        }
        let class = match (&call.caller, &call.return_type) {
            (_, Type::Object(name)) | (Caller::Class(name), _) => self.mapper.resolve(name),
            _ => {
                return Err(CompileError::MalformedInstruction {
                    message: format!("cannot tell which class to instantiate: {}", call),
                })
            }
        };
        self.push(Mnemonic::New(class))
    }

    fn method_ref(&self, class: String, call: &CallInstruction) -> CompileResult<MethodRef> {
        let name = call
            .method
            .clone()
            .ok_or_else(|| CompileError::MalformedInstruction {
                message: format!("{} without a method name", call.kind.name()),
            })?;
        let descriptor = match &call.param_types {
            Some(params) => self.mapper.method_descriptor(params.iter(), &call.return_type),
            None => self
                .mapper
                .method_descriptor(call.args.iter().map(Operand::ty), &call.return_type),
        };
        Ok(MethodRef {
            class,
            name,
            descriptor,
            arg_count: call.args.len(),
            returns_value: call.return_type != Type::Void,
        })
    }

    fn field_ref(&self, object: &Operand, field: &Field) -> FieldRef {
        FieldRef {
            class: self.mapper.internal_name(object.ty()),
            name: field.name.clone(),
            descriptor: self.mapper.descriptor(&field.ty),
        }
    }
}

fn receiver(call: &CallInstruction) -> CompileResult<&Operand> {
    match &call.caller {
        Caller::Object(object) => Ok(object),
        Caller::Class(name) => Err(CompileError::MalformedInstruction {
            message: format!("{} needs an object receiver, got class {}", call.kind.name(), name),
        }),
    }
}

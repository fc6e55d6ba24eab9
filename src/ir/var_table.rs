use crate::types::Type;

use super::types::{Caller, Instruction, Operand, Var};

/// Virtual register assigned to a variable.
#[derive(Clone, Debug, PartialEq)]
pub struct VarDescriptor {
    pub virtual_reg: u16,
    pub ty: Type,
}

/// Variable name to virtual register mapping for one method.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VarTable {
    entries: Vec<(String, VarDescriptor)>,
}

impl VarTable {
    /// Allocate registers: `this` first for instance methods, then the
    /// parameters in order, then every other variable in order of first use.
    pub fn build(is_static: bool, params: &[Var], instructions: &[Instruction]) -> Self {
        let mut table = VarTable::default();
        if !is_static {
            table.insert("this", Type::This);
        }
        for param in params {
            table.insert(&param.name, param.ty.clone());
        }
        for inst in instructions {
            table.collect_instruction(inst);
        }
        table
    }

    /// Register `name` if it has no slot yet; returns its slot.
    pub fn insert(&mut self, name: &str, ty: Type) -> u16 {
        if let Some(existing) = self.get(name) {
            return existing.virtual_reg;
        }
        let reg = self.entries.len() as u16;
        self.entries.push((
            name.to_string(),
            VarDescriptor {
                virtual_reg: reg,
                ty,
            },
        ));
        reg
    }

    pub fn get(&self, name: &str) -> Option<&VarDescriptor> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct registers in use.
    pub fn distinct_slots(&self) -> usize {
        let mut regs: Vec<u16> = self.entries.iter().map(|(_, d)| d.virtual_reg).collect();
        regs.sort_unstable();
        regs.dedup();
        regs.len()
    }

    pub fn max_register(&self) -> Option<u16> {
        self.entries.iter().map(|(_, d)| d.virtual_reg).max()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VarDescriptor)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    fn collect_var(&mut self, var: &Var) {
        if !var.is_this() {
            self.insert(&var.name, var.ty.clone());
        }
    }

    fn collect_operand(&mut self, operand: &Operand) {
        match operand {
            Operand::Literal { .. } => {}
            Operand::Variable(var) => self.collect_var(var),
            Operand::ArrayElement { array, index, .. } => {
                self.collect_var(array);
                self.collect_operand(index);
            }
        }
    }

    fn collect_instruction(&mut self, inst: &Instruction) {
        match inst {
            Instruction::Assign { dest, rhs, .. } => {
                self.collect_operand(dest);
                self.collect_instruction(rhs);
            }
            Instruction::BinaryOp { left, right, .. } => {
                self.collect_operand(left);
                self.collect_operand(right);
            }
            Instruction::UnaryOp { operand, .. } | Instruction::SingleOp(operand) => {
                self.collect_operand(operand)
            }
            Instruction::Call(call) => {
                if let Caller::Object(object) = &call.caller {
                    self.collect_operand(object);
                }
                for arg in &call.args {
                    self.collect_operand(arg);
                }
            }
            Instruction::GetField { object, .. } => self.collect_operand(object),
            Instruction::PutField { object, value, .. } => {
                self.collect_operand(object);
                self.collect_operand(value);
            }
            Instruction::Return { operand, .. } => {
                if let Some(operand) = operand {
                    self.collect_operand(operand);
                }
            }
            Instruction::CondBranch { condition, .. } => self.collect_instruction(condition),
            Instruction::Goto(_) | Instruction::Label(_) => {}
        }
    }
}

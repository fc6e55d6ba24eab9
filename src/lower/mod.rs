//! AST to IR lowering.
//!
//! One [`Lowerer`] lowers one class. It owns the temporary and label counters,
//! so every `tmp{n}` and every `if{n}`/`while*{n}` label is unique across the
//! whole class and a fresh compilation always starts from zero.

mod expr;
mod stmt;

use log::{debug, trace};

use crate::ast::{MethodDecl, Program};
use crate::error::{CompileError, CompileResult};
use crate::ir::{ClassUnit, FieldDecl, FieldFlags, Instruction, Method, MethodFlags, Operand, Var};
use crate::symbol_table::SymbolTable;
use crate::types::Type;

/// Result of lowering an expression: the operand holding its value and the
/// instructions that must run first.
#[derive(Clone, Debug, PartialEq)]
pub struct Lowered {
    pub code: Operand,
    pub computation: Vec<Instruction>,
}

impl Lowered {
    pub fn operand(code: Operand) -> Self {
        Lowered {
            code,
            computation: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    temp: u32,
    if_labels: u32,
    while_labels: u32,
}

impl Counters {
    fn next_temp(&mut self) -> String {
        let name = format!("tmp{}", self.temp);
        self.temp += 1;
        name
    }

    /// `(if{n}, endif{n})`
    fn next_if(&mut self) -> (String, String) {
        let n = self.if_labels;
        self.if_labels += 1;
        (format!("if{}", n), format!("endif{}", n))
    }

    /// `(whileCond{n}, whileLoop{n}, whileEnd{n})`
    fn next_while(&mut self) -> (String, String, String) {
        let n = self.while_labels;
        self.while_labels += 1;
        (
            format!("whileCond{}", n),
            format!("whileLoop{}", n),
            format!("whileEnd{}", n),
        )
    }
}

/// The method a statement or expression is being lowered in.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MethodScope<'a> {
    pub name: &'a str,
    pub is_static: bool,
    pub return_type: &'a Type,
}

pub struct Lowerer<'t> {
    table: &'t SymbolTable,
    counters: Counters,
}

impl<'t> Lowerer<'t> {
    pub fn new(table: &'t SymbolTable) -> Self {
        Lowerer {
            table,
            counters: Counters::default(),
        }
    }

    pub fn lower_program(&mut self, program: &Program) -> CompileResult<ClassUnit> {
        let class = &program.class;
        debug!("lowering class {} ({} methods)", class.name, class.methods.len());

        // Source fields carry no modifiers.
        let fields = class
            .fields
            .iter()
            .map(|f| FieldDecl {
                name: f.name.clone(),
                ty: f.ty.clone(),
                flags: FieldFlags::PUBLIC,
            })
            .collect();

        let methods = class
            .methods
            .iter()
            .map(|m| self.lower_method(m))
            .collect::<CompileResult<Vec<_>>>()?;

        Ok(ClassUnit {
            name: class.name.clone(),
            superclass: class.superclass.clone(),
            imports: program.imports.clone(),
            fields,
            methods,
        })
    }

    pub fn lower_method(&mut self, method: &MethodDecl) -> CompileResult<Method> {
        if !self.table.has_method(&method.name) {
            return Err(CompileError::MethodNotFound {
                name: method.name.clone(),
            });
        }
        let scope = MethodScope {
            name: &method.name,
            is_static: method.is_static,
            return_type: &method.return_type,
        };

        let mut body = Vec::new();
        for stmt in &method.body {
            body.extend(self.lower_stmt(scope, stmt)?);
        }
        if method.return_type == Type::Void
            && !matches!(body.last(), Some(Instruction::Return { .. }))
        {
            body.push(Instruction::Return {
                operand: None,
                ty: Type::Void,
            });
        }

        let mut flags = MethodFlags::empty();
        if method.is_public {
            flags |= MethodFlags::PUBLIC;
        }
        if method.is_static {
            flags |= MethodFlags::STATIC;
        }
        let params = method
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| Var::param(i + 1, p.name.clone(), p.ty.clone()))
            .collect();

        let lowered = Method::new(
            method.name.clone(),
            flags,
            params,
            method.return_type.clone(),
            body,
        );
        trace!("lowered method {}:\n{}", method.name, lowered);
        Ok(lowered)
    }

    fn new_temp_var(&mut self, ty: Type) -> Var {
        Var::new(self.counters.next_temp(), ty)
    }

    fn new_temp(&mut self, ty: Type) -> Operand {
        Operand::Variable(self.new_temp_var(ty))
    }
}

/// Lower a whole program against its symbol table.
pub fn lower_program(program: &Program, table: &SymbolTable) -> CompileResult<ClassUnit> {
    Lowerer::new(table).lower_program(program)
}

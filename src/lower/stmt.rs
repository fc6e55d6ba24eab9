use crate::ast::{Expr, Stmt};
use crate::error::{CompileError, CompileResult};
use crate::ir::{Field, Instruction, Operand, UnaryOp, Var};
use crate::symbol_table::Resolved;
use crate::types::Type;

use super::expr::array_store;
use super::{Lowerer, MethodScope};

impl<'t> Lowerer<'t> {
    pub(crate) fn lower_stmt(
        &mut self,
        scope: MethodScope<'_>,
        stmt: &Stmt,
    ) -> CompileResult<Vec<Instruction>> {
        match stmt {
            Stmt::Assign { name, value } => self.lower_assign(scope, name, value),
            Stmt::ArrayAssign { name, index, value } => {
                let base = self.lower_name(scope, name)?;
                let mut code = base.computation;
                let array = match base.code {
                    Operand::Variable(var) => var,
                    other => {
                        return Err(CompileError::MalformedInstruction {
                            message: format!("array base must be a variable, found {}", other),
                        })
                    }
                };
                let element = array.ty.element_type().cloned().unwrap_or(Type::Int);
                let index = self.lower_expr(scope, index, Some(&Type::Int))?;
                let value = self.lower_expr(scope, value, Some(&element))?;
                code.extend(index.computation);
                code.extend(value.computation);
                code.push(array_store(array, index.code, value.code, element));
                Ok(code)
            }
            Stmt::Return(None) => Ok(vec![Instruction::Return {
                operand: None,
                ty: Type::Void,
            }]),
            Stmt::Return(Some(value)) => {
                let value = self.lower_expr(scope, value, Some(scope.return_type))?;
                let mut code = value.computation;
                code.push(Instruction::Return {
                    operand: Some(value.code),
                    ty: scope.return_type.clone(),
                });
                Ok(code)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let (then_label, end_label) = self.counters.next_if();
                let (cond, mut code) = self.lower_condition(scope, condition)?;
                code.push(Instruction::CondBranch {
                    condition: Box::new(cond),
                    label: then_label.clone(),
                });
                for stmt in else_branch.iter().flatten() {
                    code.extend(self.lower_stmt(scope, stmt)?);
                }
                code.push(Instruction::Goto(end_label.clone()));
                code.push(Instruction::Label(then_label));
                for stmt in then_branch {
                    code.extend(self.lower_stmt(scope, stmt)?);
                }
                code.push(Instruction::Label(end_label));
                Ok(code)
            }
            Stmt::While { condition, body } => {
                let (cond_label, loop_label, end_label) = self.counters.next_while();
                let mut code = vec![Instruction::Label(cond_label.clone())];
                let (cond, cond_code) = self.lower_condition(scope, condition)?;
                code.extend(cond_code);
                code.push(Instruction::CondBranch {
                    condition: Box::new(cond),
                    label: loop_label.clone(),
                });
                code.push(Instruction::Goto(end_label.clone()));
                code.push(Instruction::Label(loop_label));
                for stmt in body {
                    code.extend(self.lower_stmt(scope, stmt)?);
                }
                code.push(Instruction::Goto(cond_label));
                code.push(Instruction::Label(end_label));
                Ok(code)
            }
            Stmt::Expr(Expr::Call {
                receiver,
                method,
                args,
            }) => {
                let (call, mut code) = self.lower_call(scope, receiver, method, args, None, true)?;
                code.push(Instruction::Call(call));
                Ok(code)
            }
            Stmt::Expr(expr) => Ok(self.lower_expr(scope, expr, None)?.computation),
            Stmt::Block(stmts) => {
                let mut code = Vec::new();
                for stmt in stmts {
                    code.extend(self.lower_stmt(scope, stmt)?);
                }
                Ok(code)
            }
        }
    }

    fn lower_assign(
        &mut self,
        scope: MethodScope<'_>,
        name: &str,
        value: &Expr,
    ) -> CompileResult<Vec<Instruction>> {
        let dest = match self.resolve(scope, name) {
            Some(Resolved::Param(pos, decl)) => Var::param(pos, name, decl.ty.clone()),
            Some(Resolved::Local(decl)) => Var::new(name, decl.ty.clone()),
            Some(Resolved::Field(decl)) => {
                let value = self.lower_expr(scope, value, Some(&decl.ty))?;
                let mut code = value.computation;
                code.push(Instruction::PutField {
                    object: Operand::this(),
                    field: Field {
                        name: name.to_string(),
                        ty: decl.ty.clone(),
                    },
                    value: value.code,
                });
                return Ok(code);
            }
            None => {
                return Err(CompileError::UnresolvedSymbol {
                    name: name.to_string(),
                    method: scope.name.to_string(),
                })
            }
        };

        // A binary right-hand side stays inside the assignment so the
        // emitter can see `x := x + k` whole.
        let (rhs, mut code) = match value {
            Expr::Binary { op, left, right } => self.lower_binary(scope, op, left, right)?,
            other => {
                let value = self.lower_expr(scope, other, Some(&dest.ty))?;
                (Instruction::SingleOp(value.code), value.computation)
            }
        };
        code.push(Instruction::assign(Operand::Variable(dest), rhs));
        Ok(code)
    }

    /// Lower a branch condition to the instruction a `CondBranch` tests.
    fn lower_condition(
        &mut self,
        scope: MethodScope<'_>,
        condition: &Expr,
    ) -> CompileResult<(Instruction, Vec<Instruction>)> {
        match condition {
            Expr::Binary { op, left, right } if !op.is_arithmetic() => {
                self.lower_binary(scope, op, left, right)
            }
            Expr::Not(inner) => {
                let inner = self.lower_expr(scope, inner, Some(&Type::Boolean))?;
                Ok((
                    Instruction::UnaryOp {
                        op: UnaryOp::Not,
                        operand: inner.code,
                        ty: Type::Boolean,
                    },
                    inner.computation,
                ))
            }
            other => {
                let value = self.lower_expr(scope, other, Some(&Type::Boolean))?;
                Ok((Instruction::SingleOp(value.code), value.computation))
            }
        }
    }
}

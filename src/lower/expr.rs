use crate::ast::{BinOp, Expr};
use crate::error::{CompileError, CompileResult};
use crate::ir::{
    CallInstruction, CallKind, Caller, Field, Instruction, Operand, UnaryOp, Var,
};
use crate::symbol_table::{MethodSymbol, Resolved};
use crate::types::Type;

use super::{Lowered, Lowerer, MethodScope};

impl<'t> Lowerer<'t> {
    /// Lower `expr` so that its value ends up in a single operand.
    ///
    /// `expected` is the type the use site wants; it types calls whose
    /// signature is not known from the symbol table.
    pub(crate) fn lower_expr(
        &mut self,
        scope: MethodScope<'_>,
        expr: &Expr,
        expected: Option<&Type>,
    ) -> CompileResult<Lowered> {
        match expr {
            Expr::IntLiteral(value) => Ok(Lowered::operand(Operand::int(*value))),
            Expr::BoolLiteral(value) => Ok(Lowered::operand(Operand::boolean(*value))),
            Expr::This => {
                if scope.is_static {
                    return Err(CompileError::UnresolvedSymbol {
                        name: "this".into(),
                        method: scope.name.to_string(),
                    });
                }
                Ok(Lowered::operand(Operand::this()))
            }
            Expr::Var(name) => self.lower_name(scope, name),
            Expr::Binary { op, left, right } => {
                let (inst, mut computation) = self.lower_binary(scope, op, left, right)?;
                let temp = self.new_temp(op.result_type());
                computation.push(Instruction::assign(temp.clone(), inst));
                Ok(Lowered {
                    code: temp,
                    computation,
                })
            }
            Expr::Not(inner) => {
                let inner = self.lower_expr(scope, inner, Some(&Type::Boolean))?;
                let mut computation = inner.computation;
                let temp = self.new_temp(Type::Boolean);
                computation.push(Instruction::assign(
                    temp.clone(),
                    Instruction::UnaryOp {
                        op: UnaryOp::Not,
                        operand: inner.code,
                        ty: Type::Boolean,
                    },
                ));
                Ok(Lowered {
                    code: temp,
                    computation,
                })
            }
            Expr::NewObject(class) => {
                let ty = Type::object(class.clone());
                let temp = self.new_temp(ty.clone());
                let new = Instruction::Call(CallInstruction {
                    kind: CallKind::New,
                    caller: Caller::Class(class.clone()),
                    method: None,
                    args: Vec::new(),
                    return_type: ty,
                    param_types: None,
                });
                let init = Instruction::Call(CallInstruction {
                    kind: CallKind::InvokeSpecial,
                    caller: Caller::Object(temp.clone()),
                    method: Some("<init>".into()),
                    args: Vec::new(),
                    return_type: Type::Void,
                    param_types: None,
                });
                Ok(Lowered {
                    code: temp.clone(),
                    computation: vec![Instruction::assign(temp, new), init],
                })
            }
            Expr::NewArray { element, size } => {
                let size = self.lower_expr(scope, size, Some(&Type::Int))?;
                let mut computation = size.computation;
                let (temp, alloc) = self.new_array(element, size.code);
                computation.push(alloc);
                Ok(Lowered {
                    code: Operand::Variable(temp),
                    computation,
                })
            }
            Expr::ArrayLiteral(elements) => {
                let element = expected
                    .and_then(Type::element_type)
                    .cloned()
                    .or_else(|| elements.first().and_then(|e| self.type_of(scope, e)))
                    .unwrap_or(Type::Int);
                self.pack_array(scope, &element, elements)
            }
            Expr::ArrayAccess { array, index } => {
                let base = self.lower_expr(scope, array, None)?;
                let (array, mut computation) = into_var(base)?;
                let element = array.ty.element_type().cloned().unwrap_or(Type::Int);
                let index = self.lower_expr(scope, index, Some(&Type::Int))?;
                computation.extend(index.computation);
                let temp = self.new_temp(element.clone());
                computation.push(Instruction::assign(
                    temp.clone(),
                    Instruction::SingleOp(Operand::ArrayElement {
                        array,
                        index: Box::new(index.code),
                        ty: element,
                    }),
                ));
                Ok(Lowered {
                    code: temp,
                    computation,
                })
            }
            Expr::Length(array) => {
                let base = self.lower_expr(scope, array, None)?;
                let (array, mut computation) = into_var(base)?;
                let temp = self.new_temp(Type::Int);
                computation.push(Instruction::assign(
                    temp.clone(),
                    Instruction::Call(CallInstruction {
                        kind: CallKind::ArrayLength,
                        caller: Caller::Object(Operand::Variable(array)),
                        method: None,
                        args: Vec::new(),
                        return_type: Type::Int,
                        param_types: None,
                    }),
                ));
                Ok(Lowered {
                    code: temp,
                    computation,
                })
            }
            Expr::Call {
                receiver,
                method,
                args,
            } => {
                let (call, mut computation) =
                    self.lower_call(scope, receiver, method, args, expected, false)?;
                let temp = self.new_temp(call.return_type.clone());
                computation.push(Instruction::assign(temp.clone(), Instruction::Call(call)));
                Ok(Lowered {
                    code: temp,
                    computation,
                })
            }
        }
    }

    /// Lower both operands of a binary expression and return the bare
    /// operation, leaving it to the caller to assign or branch on it.
    pub(crate) fn lower_binary(
        &mut self,
        scope: MethodScope<'_>,
        op: &BinOp,
        left: &Expr,
        right: &Expr,
    ) -> CompileResult<(Instruction, Vec<Instruction>)> {
        let operand_type = op.operand_type();
        let left = self.lower_expr(scope, left, Some(&operand_type))?;
        let right = self.lower_expr(scope, right, Some(&operand_type))?;
        let mut computation = left.computation;
        computation.extend(right.computation);
        Ok((
            Instruction::BinaryOp {
                op: op.into(),
                left: left.code,
                right: right.code,
                ty: op.result_type(),
            },
            computation,
        ))
    }

    /// Resolve a name the way the method body sees it. Fields are invisible
    /// from static methods.
    pub(crate) fn resolve(&self, scope: MethodScope<'_>, name: &str) -> Option<Resolved<'t>> {
        let table = self.table;
        match table.lookup(scope.name, name) {
            Some(Resolved::Field(_)) if scope.is_static => None,
            other => other,
        }
    }

    pub(crate) fn lower_name(&mut self, scope: MethodScope<'_>, name: &str) -> CompileResult<Lowered> {
        match self.resolve(scope, name) {
            Some(Resolved::Param(pos, decl)) => Ok(Lowered::operand(Operand::Variable(
                Var::param(pos, name, decl.ty.clone()),
            ))),
            Some(Resolved::Local(decl)) => Ok(Lowered::operand(Operand::var(name, decl.ty.clone()))),
            Some(Resolved::Field(decl)) => {
                let temp = self.new_temp(decl.ty.clone());
                let get = Instruction::GetField {
                    object: Operand::this(),
                    field: Field {
                        name: name.to_string(),
                        ty: decl.ty.clone(),
                    },
                };
                Ok(Lowered {
                    code: temp.clone(),
                    computation: vec![Instruction::assign(temp, get)],
                })
            }
            None => Err(CompileError::UnresolvedSymbol {
                name: name.to_string(),
                method: scope.name.to_string(),
            }),
        }
    }

    /// Lower a call. In statement position (`statement == true`) a call whose
    /// signature is unknown is typed void; otherwise it takes the type the use
    /// site expects, defaulting to int.
    pub(crate) fn lower_call(
        &mut self,
        scope: MethodScope<'_>,
        receiver: &Expr,
        method: &str,
        args: &[Expr],
        expected: Option<&Type>,
        statement: bool,
    ) -> CompileResult<(CallInstruction, Vec<Instruction>)> {
        let table = self.table;
        let untyped_return = || {
            if statement {
                Type::Void
            } else {
                expected.cloned().unwrap_or(Type::Int)
            }
        };

        // `Name.method(...)` where `Name` is not a variable: a static call.
        if let Expr::Var(name) = receiver {
            if self.resolve(scope, name).is_none() {
                if *name == table.class_name {
                    let symbol = table.method(method).ok_or_else(|| CompileError::MethodNotFound {
                        name: method.to_string(),
                    })?;
                    let (args, computation) = self.lower_declared_args(scope, symbol, args)?;
                    return Ok((
                        CallInstruction {
                            kind: CallKind::InvokeStatic,
                            caller: Caller::Class(name.clone()),
                            method: Some(method.to_string()),
                            args,
                            return_type: symbol.return_type.clone(),
                            param_types: Some(symbol.param_types()),
                        },
                        computation,
                    ));
                }
                if !table.is_imported(name) {
                    return Err(CompileError::UnresolvedSymbol {
                        name: name.clone(),
                        method: scope.name.to_string(),
                    });
                }
                let (args, computation) = self.lower_untyped_args(scope, args)?;
                return Ok((
                    CallInstruction {
                        kind: CallKind::InvokeStatic,
                        caller: Caller::Class(name.clone()),
                        method: Some(method.to_string()),
                        args,
                        return_type: untyped_return(),
                        param_types: None,
                    },
                    computation,
                ));
            }
        }

        let object = self.lower_expr(scope, receiver, None)?;
        let mut computation = object.computation;
        let on_self = match object.code.ty() {
            Type::This => true,
            Type::Object(name) => *name == table.class_name,
            _ => false,
        };

        let declared = if on_self { table.method(method) } else { None };
        if on_self && declared.is_none() && table.superclass.is_none() {
            return Err(CompileError::MethodNotFound {
                name: method.to_string(),
            });
        }

        let (args, return_type, param_types) = match declared {
            Some(symbol) => {
                let (args, arg_code) = self.lower_declared_args(scope, symbol, args)?;
                computation.extend(arg_code);
                (args, symbol.return_type.clone(), Some(symbol.param_types()))
            }
            None => {
                let (args, arg_code) = self.lower_untyped_args(scope, args)?;
                computation.extend(arg_code);
                (args, untyped_return(), None)
            }
        };

        Ok((
            CallInstruction {
                kind: CallKind::InvokeVirtual,
                caller: Caller::Object(object.code),
                method: Some(method.to_string()),
                args,
                return_type,
                param_types,
            },
            computation,
        ))
    }

    /// Lower arguments against a declared signature. Surplus arguments to a
    /// varargs method are packed into a fresh array, unless exactly one
    /// argument already has the varargs array type.
    fn lower_declared_args(
        &mut self,
        scope: MethodScope<'_>,
        symbol: &MethodSymbol,
        args: &[Expr],
    ) -> CompileResult<(Vec<Operand>, Vec<Instruction>)> {
        let varargs = symbol.varargs_param();
        let fixed = match varargs {
            Some(_) => symbol.params.len() - 1,
            None => symbol.params.len(),
        };

        let mut operands = Vec::with_capacity(symbol.params.len());
        let mut computation = Vec::new();
        let split = if varargs.is_some() {
            fixed.min(args.len())
        } else {
            args.len()
        };
        for (i, arg) in args[..split].iter().enumerate() {
            let lowered = self.lower_expr(scope, arg, symbol.params.get(i).map(|p| &p.ty))?;
            computation.extend(lowered.computation);
            operands.push(lowered.code);
        }

        if let Some(param) = varargs {
            let rest = &args[split..];
            let passes_array = rest.len() == 1
                && self.type_of(scope, &rest[0]).as_ref() == Some(&param.ty);
            if passes_array {
                let lowered = self.lower_expr(scope, &rest[0], Some(&param.ty))?;
                computation.extend(lowered.computation);
                operands.push(lowered.code);
            } else {
                let element = param.ty.element_type().cloned().unwrap_or(Type::Int);
                let packed = self.pack_array(scope, &element, rest)?;
                computation.extend(packed.computation);
                operands.push(packed.code);
            }
        }
        Ok((operands, computation))
    }

    fn lower_untyped_args(
        &mut self,
        scope: MethodScope<'_>,
        args: &[Expr],
    ) -> CompileResult<(Vec<Operand>, Vec<Instruction>)> {
        let mut operands = Vec::with_capacity(args.len());
        let mut computation = Vec::new();
        for arg in args {
            let expected = self.type_of(scope, arg);
            let lowered = self.lower_expr(scope, arg, expected.as_ref())?;
            computation.extend(lowered.computation);
            operands.push(lowered.code);
        }
        Ok((operands, computation))
    }

    /// Allocate a temporary array of `element` and store each value in order.
    fn pack_array(
        &mut self,
        scope: MethodScope<'_>,
        element: &Type,
        values: &[Expr],
    ) -> CompileResult<Lowered> {
        let (array, alloc) = self.new_array(element, Operand::int(values.len() as i32));
        let mut computation = vec![alloc];
        for (i, value) in values.iter().enumerate() {
            let lowered = self.lower_expr(scope, value, Some(element))?;
            computation.extend(lowered.computation);
            computation.push(array_store(
                array.clone(),
                Operand::int(i as i32),
                lowered.code,
                element.clone(),
            ));
        }
        Ok(Lowered {
            code: Operand::Variable(array),
            computation,
        })
    }

    fn new_array(&mut self, element: &Type, size: Operand) -> (Var, Instruction) {
        let ty = Type::array_of(element.clone());
        let temp = self.new_temp_var(ty.clone());
        let alloc = Instruction::assign(
            Operand::Variable(temp.clone()),
            Instruction::Call(CallInstruction {
                kind: CallKind::New,
                caller: Caller::Class("array".into()),
                method: None,
                args: vec![size],
                return_type: ty,
                param_types: None,
            }),
        );
        (temp, alloc)
    }

    /// Static type of `expr` where it can be known without lowering it.
    pub(crate) fn type_of(&self, scope: MethodScope<'_>, expr: &Expr) -> Option<Type> {
        let table = self.table;
        match expr {
            Expr::IntLiteral(_) | Expr::Length(_) => Some(Type::Int),
            Expr::BoolLiteral(_) | Expr::Not(_) => Some(Type::Boolean),
            Expr::Binary { op, .. } => Some(op.result_type()),
            Expr::This => Some(Type::This),
            Expr::Var(name) => self.resolve(scope, name).map(|r| r.decl().ty.clone()),
            Expr::NewObject(class) => Some(Type::object(class.clone())),
            Expr::NewArray { element, .. } => Some(Type::array_of(element.clone())),
            Expr::ArrayLiteral(elements) => Some(Type::array_of(
                elements
                    .first()
                    .and_then(|e| self.type_of(scope, e))
                    .unwrap_or(Type::Int),
            )),
            Expr::ArrayAccess { array, .. } => self
                .type_of(scope, array)
                .and_then(|t| t.element_type().cloned()),
            Expr::Call {
                receiver, method, ..
            } => {
                let on_self = match receiver.as_ref() {
                    Expr::Var(name) if self.resolve(scope, name).is_none() => {
                        *name == table.class_name
                    }
                    other => match self.type_of(scope, other) {
                        Some(Type::This) => true,
                        Some(Type::Object(name)) => name == table.class_name,
                        _ => false,
                    },
                };
                if on_self {
                    table.return_type(method).cloned()
                } else {
                    None
                }
            }
        }
    }
}

pub(crate) fn array_store(array: Var, index: Operand, value: Operand, element: Type) -> Instruction {
    Instruction::Assign {
        dest: Operand::ArrayElement {
            array,
            index: Box::new(index),
            ty: element.clone(),
        },
        ty: element,
        rhs: Box::new(Instruction::SingleOp(value)),
    }
}

fn into_var(lowered: Lowered) -> CompileResult<(Var, Vec<Instruction>)> {
    match lowered.code {
        Operand::Variable(var) => Ok((var, lowered.computation)),
        other => Err(CompileError::MalformedInstruction {
            message: format!("array base must be a variable, found {}", other),
        }),
    }
}

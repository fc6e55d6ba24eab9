//! Resolved declarations of the class being compiled.

use crate::ast::{Program, VarDecl};
use crate::error::{CompileError, CompileResult};
use crate::types::Type;

#[derive(Clone, Debug, PartialEq)]
pub struct MethodSymbol {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<VarDecl>,
    pub locals: Vec<VarDecl>,
    pub is_static: bool,
}

impl MethodSymbol {
    /// The trailing varargs parameter, if the method declares one.
    pub fn varargs_param(&self) -> Option<&VarDecl> {
        self.params.last().filter(|p| p.varargs)
    }

    /// Declared parameter types, varargs included as its array type.
    pub fn param_types(&self) -> Vec<Type> {
        self.params.iter().map(|p| p.ty.clone()).collect()
    }
}

/// Where a name used inside a method was declared.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved<'a> {
    /// 1-based position among the method's parameters.
    Param(usize, &'a VarDecl),
    Local(&'a VarDecl),
    Field(&'a VarDecl),
}

impl<'a> Resolved<'a> {
    pub fn decl(&self) -> &'a VarDecl {
        match self {
            Resolved::Param(_, d) | Resolved::Local(d) | Resolved::Field(d) => d,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SymbolTable {
    pub class_name: String,
    pub superclass: Option<String>,
    pub imports: Vec<String>,
    pub fields: Vec<VarDecl>,
    pub methods: Vec<MethodSymbol>,
}

impl SymbolTable {
    pub fn from_program(program: &Program) -> Self {
        let class = &program.class;
        let methods = class
            .methods
            .iter()
            .map(|m| MethodSymbol {
                name: m.name.clone(),
                return_type: m.return_type.clone(),
                params: m.params.clone(),
                locals: m.locals.clone(),
                is_static: m.is_static,
            })
            .collect();

        SymbolTable {
            class_name: class.name.clone(),
            superclass: class.superclass.clone(),
            imports: program.imports.clone(),
            fields: class.fields.clone(),
            methods,
        }
    }

    /// Reject tables that code generation cannot map unambiguously.
    ///
    /// Two imports whose last segments coincide would make name resolution
    /// order-dependent, and a varargs parameter anywhere but last cannot be
    /// packed at call sites.
    pub fn validate(&self) -> CompileResult<()> {
        for (i, first) in self.imports.iter().enumerate() {
            for second in &self.imports[i + 1..] {
                if last_segment(first) == last_segment(second) {
                    return Err(CompileError::DuplicateImport {
                        segment: last_segment(first).to_string(),
                        first: first.clone(),
                        second: second.clone(),
                    });
                }
            }
        }
        for method in &self.methods {
            let count = method.params.len();
            if let Some(bad) = method
                .params
                .iter()
                .take(count.saturating_sub(1))
                .find(|p| p.varargs)
            {
                return Err(CompileError::InvalidVarargs {
                    method: method.name.clone(),
                    param: bad.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn method(&self, name: &str) -> Option<&MethodSymbol> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    pub fn parameters(&self, method: &str) -> &[VarDecl] {
        self.method(method).map(|m| m.params.as_slice()).unwrap_or(&[])
    }

    pub fn local_variables(&self, method: &str) -> &[VarDecl] {
        self.method(method).map(|m| m.locals.as_slice()).unwrap_or(&[])
    }

    pub fn return_type(&self, method: &str) -> Option<&Type> {
        self.method(method).map(|m| &m.return_type)
    }

    pub fn field(&self, name: &str) -> Option<&VarDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolve `name` as seen from inside `method`: parameters, then locals, then fields.
    pub fn lookup(&self, method: &str, name: &str) -> Option<Resolved<'_>> {
        if let Some((i, p)) = self
            .parameters(method)
            .iter()
            .enumerate()
            .find(|(_, p)| p.name == name)
        {
            return Some(Resolved::Param(i + 1, p));
        }
        if let Some(l) = self.local_variables(method).iter().find(|l| l.name == name) {
            return Some(Resolved::Local(l));
        }
        self.field(name).map(Resolved::Field)
    }

    /// The import whose last segment is `name`, if any.
    pub fn find_import(&self, name: &str) -> Option<&str> {
        self.imports
            .iter()
            .map(String::as_str)
            .find(|import| last_segment(import) == name)
    }

    pub fn is_imported(&self, name: &str) -> bool {
        self.find_import(name).is_some()
    }
}

pub fn last_segment(path: &str) -> &str {
    match path.rfind('.') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

//! Code generation back end for a small Java-like teaching language.
//!
//! The pipeline takes a type-checked [`ast::Program`] and its
//! [`symbol_table::SymbolTable`], lowers every method to a three-address
//! [`ir::ClassUnit`], and emits [Jasmin](http://jasmin.sourceforge.net/)
//! assembly text that assembles into a JVM class file.
//!
//! ```rust
//! use jasmin_codegen::ast::{ClassDecl, Expr, MethodDecl, Program, Stmt, VarDecl};
//! use jasmin_codegen::types::Type;
//! use jasmin_codegen::{compile, CodegenOptions};
//!
//! let mut inc = MethodDecl::new("inc", Type::Int);
//! inc.params.push(VarDecl::new("x", Type::Int));
//! inc.body.push(Stmt::Return(Some(Expr::var("x"))));
//!
//! let program = Program {
//!     imports: vec![],
//!     class: ClassDecl {
//!         name: "Counter".into(),
//!         superclass: None,
//!         fields: vec![],
//!         methods: vec![inc],
//!     },
//! };
//! let jasmin = compile(&program, &CodegenOptions::default()).unwrap();
//! assert!(jasmin.contains(".method public inc(I)I"));
//! ```

#[macro_use]
extern crate bitflags;

pub mod ast;
pub mod descriptor;
pub mod error;
pub mod ir;
pub mod jasmin;
pub mod lower;
pub mod symbol_table;
pub mod types;

use log::debug;

pub use error::{CompileError, CompileResult};
pub use jasmin::{generate_jasmin, CodegenOptions};
pub use lower::lower_program;

use ast::Program;
use ir::ClassUnit;
use symbol_table::SymbolTable;

/// Validate the symbol table and lower `program` to IR.
pub fn lower_checked(program: &Program, table: &SymbolTable) -> CompileResult<ClassUnit> {
    table.validate()?;
    lower_program(program, table)
}

/// Run the whole back end: build the symbol table, lower, emit.
pub fn compile(program: &Program, options: &CodegenOptions) -> CompileResult<String> {
    let table = SymbolTable::from_program(program);
    compile_with_table(program, &table, options)
}

/// Like [`compile`], with a symbol table supplied by the front end.
pub fn compile_with_table(
    program: &Program,
    table: &SymbolTable,
    options: &CodegenOptions,
) -> CompileResult<String> {
    debug!("compiling class {}", program.class.name);
    let unit = lower_checked(program, table)?;
    generate_jasmin(&unit, options)
}

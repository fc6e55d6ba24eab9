//! IR to Jasmin assembly.

mod class;
mod emitter;
pub mod mnemonic;
pub mod select;
pub mod stack_calc;

use crate::descriptor::resolve_class_name;
use crate::error::CompileResult;
use crate::ir::ClassUnit;

pub use self::class::assemble_class;
pub use self::emitter::{Line, MethodCode, MethodEmitter};
pub use self::mnemonic::Mnemonic;

#[derive(Clone, Debug)]
pub struct CodegenOptions {
    /// Prefix for every instruction and `.limit` line.
    pub indent: String,
    /// Compile `x := x + k` to `iinc` when `k` fits in a byte.
    pub fuse_increments: bool,
    /// Precede the synthesized constructor with a `; default constructor` line.
    pub comment_default_constructor: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        CodegenOptions {
            indent: "   ".to_string(),
            fuse_increments: true,
            comment_default_constructor: true,
        }
    }
}

/// Emit the Jasmin text for a lowered class.
pub fn generate_jasmin(unit: &ClassUnit, options: &CodegenOptions) -> CompileResult<String> {
    assemble_class(unit, options)
}

/// Internal name of the superclass; `java/lang/Object` when none is declared.
pub(crate) fn superclass_name(unit: &ClassUnit) -> String {
    match unit.superclass.as_deref() {
        None | Some("") | Some("Object") => "java/lang/Object".to_string(),
        Some(name) => resolve_class_name(name, &unit.imports),
    }
}

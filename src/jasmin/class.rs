use log::debug;

use crate::descriptor::DescriptorMapper;
use crate::error::CompileResult;
use crate::ir::{ClassUnit, FieldFlags, Method, MethodFlags};

use super::emitter::{Line, MethodCode, MethodEmitter};
use super::{superclass_name, CodegenOptions};

/// Assemble the Jasmin text of a whole class.
///
/// Layout: `.class`, `.super`, the fields, the constructor (synthesized unless
/// the class declares one), then every other method in declaration order.
pub fn assemble_class(unit: &ClassUnit, options: &CodegenOptions) -> CompileResult<String> {
    debug!("emitting Jasmin for class {}", unit.name);
    let mapper = DescriptorMapper::new(&unit.name, &unit.imports);
    let superclass = superclass_name(unit);

    let mut out = String::new();
    out.push_str(&format!(".class public {}\n", unit.name));
    out.push_str(&format!(".super {}\n", superclass));
    if !unit.fields.is_empty() {
        out.push('\n');
    }
    for field in &unit.fields {
        out.push_str(&format!(
            ".field {}{} {}\n",
            field_modifiers(field.flags),
            field.name,
            mapper.descriptor(&field.ty)
        ));
    }
    out.push('\n');

    let constructors = unit.methods.iter().filter(|m| m.is_constructor);
    if unit.has_constructor() {
        for ctor in constructors {
            out.push_str(&assemble_method(unit, ctor, &mapper, options)?);
            out.push('\n');
        }
    } else {
        if options.comment_default_constructor {
            out.push_str("; default constructor\n");
        }
        out.push_str(".method public <init>()V\n");
        out.push_str(&format!("{}aload_0\n", options.indent));
        out.push_str(&format!(
            "{}invokespecial {}/<init>()V\n",
            options.indent, superclass
        ));
        out.push_str(&format!("{}return\n", options.indent));
        out.push_str(".end method\n\n");
    }

    for method in unit.methods.iter().filter(|m| !m.is_constructor) {
        out.push_str(&assemble_method(unit, method, &mapper, options)?);
        out.push('\n');
    }
    Ok(out)
}

fn assemble_method(
    unit: &ClassUnit,
    method: &Method,
    mapper: &DescriptorMapper<'_>,
    options: &CodegenOptions,
) -> CompileResult<String> {
    debug!("emitting method {}.{}", unit.name, method.name);
    let code: MethodCode = MethodEmitter::new(unit, method, options).emit()?;

    let descriptor = mapper.method_descriptor(method.params.iter().map(|p| &p.ty), &method.return_type);
    let mut out = format!(
        ".method {}{}{}\n",
        method_modifiers(method.flags),
        method.name,
        descriptor
    );
    out.push_str(&format!("{}.limit stack {}\n", options.indent, code.max_stack));
    out.push_str(&format!("{}.limit locals {}\n", options.indent, code.max_locals));
    for line in &code.lines {
        match line {
            Line::Label(name) => out.push_str(&format!("{}:\n", name)),
            Line::Instr(instr) => out.push_str(&format!("{}{}\n", options.indent, instr)),
        }
    }
    out.push_str(".end method\n");
    Ok(out)
}

fn access(public: bool, private: bool, protected: bool) -> &'static str {
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

fn method_modifiers(flags: MethodFlags) -> String {
    let mut s = access(
        flags.contains(MethodFlags::PUBLIC),
        flags.contains(MethodFlags::PRIVATE),
        flags.contains(MethodFlags::PROTECTED),
    )
    .to_string();
    if flags.contains(MethodFlags::STATIC) {
        s.push_str("static ");
    }
    if flags.contains(MethodFlags::FINAL) {
        s.push_str("final ");
    }
    s
}

fn field_modifiers(flags: FieldFlags) -> String {
    let mut s = access(
        flags.contains(FieldFlags::PUBLIC),
        flags.contains(FieldFlags::PRIVATE),
        flags.contains(FieldFlags::PROTECTED),
    )
    .to_string();
    if flags.contains(FieldFlags::FINAL) {
        s.push_str("final ");
    }
    if flags.contains(FieldFlags::STATIC) {
        s.push_str("static ");
    }
    s
}

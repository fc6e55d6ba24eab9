use jasmin_codegen::ast::{ClassDecl, MethodDecl, Program, VarDecl};
use jasmin_codegen::symbol_table::SymbolTable;
use jasmin_codegen::{compile, compile_with_table, CodegenOptions};

mod control_flow;
mod properties;
mod scenarios;

use vm::{Value, Vm};

// --- Test helpers ---

fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();
}

fn program(class: &str, imports: &[&str], fields: Vec<VarDecl>, methods: Vec<MethodDecl>) -> Program {
    Program {
        imports: imports.iter().map(|s| s.to_string()).collect(),
        class: ClassDecl {
            name: class.to_string(),
            superclass: None,
            fields,
            methods,
        },
    }
}

fn jasmin(program: &Program) -> String {
    init_logger();
    compile(program, &CodegenOptions::default()).unwrap()
}

/// Instruction and label lines of one method, without `.limit` lines.
fn body(text: &str, method: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut inside = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with(".method") {
            let signature = trimmed.split_whitespace().last().unwrap_or("");
            inside = signature.starts_with(&format!("{}(", method));
            continue;
        }
        if trimmed == ".end method" {
            inside = false;
            continue;
        }
        if inside && !trimmed.starts_with(".limit") && !trimmed.is_empty() {
            out.push(trimmed.to_string());
        }
    }
    out
}

fn run_int(vm: &Vm, method: &str, args: Vec<Value>) -> i32 {
    vm.run(method, args).0.expect("method returned no value").int()
}

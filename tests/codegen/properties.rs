use super::*;

use crate::control_flow::{flow_program, logic_method, max_method, squares_method, sum_method};

/// Methods of `flow_program` with arguments that reach their deepest stack.
fn sample_runs() -> Vec<(&'static str, Vec<Value>)> {
    vec![
        ("max", vec![Value::Int(3), Value::Int(8)]),
        ("sum", vec![Value::Int(3)]),
        ("squares", vec![Value::Int(3)]),
        ("logic", vec![Value::Int(1), Value::Int(2), Value::Int(0)]),
        ("evens", vec![Value::Int(4)]),
    ]
}

#[test]
fn test_stack_limit_is_exact() {
    let vm = Vm::load(&jasmin(&flow_program()));
    for (name, args) in sample_runs() {
        let (_, trace) = vm.run(name, args);
        assert_eq!(
            trace.max_depth[name],
            vm.method(name).limit_stack,
            ".limit stack of {}",
            name
        );
    }
}

#[test]
fn test_locals_cover_every_slot() {
    let vm = Vm::load(&jasmin(&flow_program()));
    for m in &vm.methods {
        if let Some(slot) = m.max_slot_used() {
            assert!(
                m.limit_locals >= slot + 1,
                "{} uses slot {} with .limit locals {}",
                m.name,
                slot,
                m.limit_locals
            );
        }
    }
}

#[test]
fn test_instance_methods_keep_this() {
    let vm = Vm::load(&jasmin(&flow_program()));
    for m in vm.methods.iter().filter(|m| !m.is_static) {
        assert!(!m.stores_to(0), "{} overwrites slot 0", m.name);
    }
}

#[test]
fn test_output_is_deterministic() {
    let first = jasmin(&flow_program());
    let second = jasmin(&flow_program());
    assert_eq!(first, second);

    // Compiling something else in between changes nothing.
    let other = program("Other", &["io"], vec![], vec![sum_method(), max_method()]);
    jasmin(&other);
    assert_eq!(jasmin(&flow_program()), first);
}

#[test]
fn test_counters_restart_per_class() {
    let a = program("A", &[], vec![], vec![logic_method()]);
    let b = program("B", &[], vec![], vec![squares_method()]);
    assert!(jasmin(&a).contains("if0:"));
    assert!(jasmin(&b).contains("whileCond0:"));
}

#[test]
fn test_compile_with_table_matches_compile() {
    let p = flow_program();
    let table = SymbolTable::from_program(&p);
    let direct = jasmin(&p);
    let with_table = compile_with_table(&p, &table, &CodegenOptions::default()).unwrap();
    assert_eq!(direct, with_table);
}

use super::*;

use jasmin_codegen::ast::{BinOp, Expr, Stmt};
use jasmin_codegen::types::Type;

// --- Program builders ---

fn method(name: &str, ret: Type, params: &[(&str, Type)], locals: &[(&str, Type)]) -> MethodDecl {
    let mut m = MethodDecl::new(name, ret);
    m.params = params.iter().map(|(n, t)| VarDecl::new(*n, t.clone())).collect();
    m.locals = locals.iter().map(|(n, t)| VarDecl::new(*n, t.clone())).collect();
    m
}

fn bin(op: BinOp, l: Expr, r: Expr) -> Expr {
    Expr::binary(op, l, r)
}

fn var(name: &str) -> Expr {
    Expr::var(name)
}

fn int(v: i32) -> Expr {
    Expr::IntLiteral(v)
}

/// `if (a < b) r = b; else r = a; return r;`
pub(crate) fn max_method() -> MethodDecl {
    let mut m = method("max", Type::Int, &[("a", Type::Int), ("b", Type::Int)], &[("r", Type::Int)]);
    m.body = vec![
        Stmt::If {
            condition: bin(BinOp::Lt, var("a"), var("b")),
            then_branch: vec![Stmt::assign("r", var("b"))],
            else_branch: Some(vec![Stmt::assign("r", var("a"))]),
        },
        Stmt::Return(Some(var("r"))),
    ];
    m
}

/// Sum of `0..n`, printing every index.
pub(crate) fn sum_method() -> MethodDecl {
    let mut m = method("sum", Type::Int, &[("n", Type::Int)], &[("i", Type::Int), ("s", Type::Int)]);
    m.body = vec![
        Stmt::assign("i", int(0)),
        Stmt::assign("s", int(0)),
        Stmt::While {
            condition: bin(BinOp::Lt, var("i"), var("n")),
            body: vec![
                Stmt::assign("s", bin(BinOp::Add, var("s"), var("i"))),
                Stmt::Expr(Expr::call(var("io"), "println", vec![var("i")])),
                Stmt::assign("i", bin(BinOp::Add, var("i"), int(1))),
            ],
        },
        Stmt::Return(Some(var("s"))),
    ];
    m
}

/// Fill `arr[i] = i * i` for `i < n`, return `arr[n - 1] + arr.length`.
pub(crate) fn squares_method() -> MethodDecl {
    let mut m = method(
        "squares",
        Type::Int,
        &[("n", Type::Int)],
        &[("arr", Type::array_of(Type::Int)), ("i", Type::Int)],
    );
    m.body = vec![
        Stmt::assign(
            "arr",
            Expr::NewArray {
                element: Type::Int,
                size: Box::new(var("n")),
            },
        ),
        Stmt::assign("i", int(0)),
        Stmt::While {
            condition: bin(BinOp::Lt, var("i"), var("n")),
            body: vec![
                Stmt::ArrayAssign {
                    name: "arr".into(),
                    index: var("i"),
                    value: bin(BinOp::Mul, var("i"), var("i")),
                },
                Stmt::assign("i", bin(BinOp::Add, var("i"), int(1))),
            ],
        },
        Stmt::Return(Some(bin(
            BinOp::Add,
            Expr::index(var("arr"), bin(BinOp::Sub, var("n"), int(1))),
            Expr::Length(Box::new(var("arr"))),
        ))),
    ];
    m
}

/// `r = (a < b && !c) ? 1 : 0`
pub(crate) fn logic_method() -> MethodDecl {
    let mut m = method(
        "logic",
        Type::Int,
        &[("a", Type::Int), ("b", Type::Int), ("c", Type::Boolean)],
        &[("r", Type::Int)],
    );
    m.body = vec![
        Stmt::If {
            condition: bin(
                BinOp::And,
                bin(BinOp::Lt, var("a"), var("b")),
                Expr::not(var("c")),
            ),
            then_branch: vec![Stmt::assign("r", int(1))],
            else_branch: Some(vec![Stmt::assign("r", int(0))]),
        },
        Stmt::Return(Some(var("r"))),
    ];
    m
}

/// Count even numbers below `n` with a nested if.
pub(crate) fn evens_method() -> MethodDecl {
    let mut m = method("evens", Type::Int, &[("n", Type::Int)], &[("i", Type::Int), ("c", Type::Int)]);
    let half_double = bin(BinOp::Mul, bin(BinOp::Div, var("i"), int(2)), int(2));
    m.body = vec![
        Stmt::assign("i", int(0)),
        Stmt::assign("c", int(0)),
        Stmt::While {
            condition: bin(BinOp::Lt, var("i"), var("n")),
            body: vec![
                Stmt::If {
                    condition: bin(BinOp::Eq, half_double, var("i")),
                    then_branch: vec![Stmt::assign("c", bin(BinOp::Add, var("c"), int(1)))],
                    else_branch: None,
                },
                Stmt::assign("i", bin(BinOp::Add, var("i"), int(1))),
            ],
        },
        Stmt::Return(Some(var("c"))),
    ];
    m
}

fn relational_method(name: &str, op: BinOp) -> MethodDecl {
    let mut m = method(name, Type::Boolean, &[("a", Type::Int), ("b", Type::Int)], &[]);
    m.body = vec![Stmt::Return(Some(bin(op, var("a"), var("b"))))];
    m
}

pub(crate) fn flow_program() -> Program {
    program(
        "Flow",
        &["io"],
        vec![],
        vec![
            max_method(),
            sum_method(),
            squares_method(),
            logic_method(),
            evens_method(),
        ],
    )
}

// --- Branch and loop equivalence ---

#[test]
fn test_if_else_matches_reference() {
    let vm = Vm::load(&jasmin(&flow_program()));
    for (a, b) in [(1, 2), (2, 1), (3, 3), (-5, 4), (7, -7), (0, 0)] {
        assert_eq!(
            run_int(&vm, "max", vec![Value::Int(a), Value::Int(b)]),
            a.max(b),
            "max({}, {})",
            a,
            b
        );
    }
}

#[test]
fn test_if_else_layout() {
    let text = jasmin(&flow_program());
    assert_eq!(
        body(&text, "max"),
        vec![
            "iload_1",
            "iload_2",
            "isub",
            "iflt if0",
            "iload_1",
            "istore_3",
            "goto endif0",
            "if0:",
            "iload_2",
            "istore_3",
            "endif0:",
            "iload_3",
            "ireturn",
        ]
    );
}

#[test]
fn test_while_runs_body_n_times() {
    let vm = Vm::load(&jasmin(&flow_program()));
    for n in 0..8 {
        let (result, trace) = vm.run("sum", vec![Value::Int(n)]);
        assert_eq!(result, Some(Value::Int(n * (n - 1) / 2)), "sum({})", n);
        let printed: Vec<i32> = trace.calls.iter().map(|c| c.args[0]).collect();
        assert_eq!(printed, (0..n).collect::<Vec<_>>());
        assert!(trace.calls.iter().all(|c| c.target == "io/println"));
    }
}

#[test]
fn test_while_layout() {
    let text = jasmin(&flow_program());
    let lines = body(&text, "sum");
    let cond = lines.iter().position(|l| l == "whileCond0:").unwrap();
    assert_eq!(
        lines[cond..cond + 8].to_vec(),
        vec![
            "whileCond0:",
            "iload_2",
            "iload_1",
            "isub",
            "iflt whileLoop0",
            "goto whileEnd0",
            "whileLoop0:",
            "iload_3",
        ]
    );
    assert!(lines.contains(&"iinc 2 1".to_string()));
    assert!(lines.contains(&"goto whileCond0".to_string()));
    assert!(lines.contains(&"whileEnd0:".to_string()));
}

#[test]
fn test_array_loop() {
    let vm = Vm::load(&jasmin(&flow_program()));
    assert_eq!(run_int(&vm, "squares", vec![Value::Int(4)]), 9 + 4);
    assert_eq!(run_int(&vm, "squares", vec![Value::Int(1)]), 1);
}

#[test]
fn test_and_with_negation() {
    let vm = Vm::load(&jasmin(&flow_program()));
    for a in 0..3 {
        for b in 0..3 {
            for c in [false, true] {
                let expected = (a < b && !c) as i32;
                let got = run_int(&vm, "logic", vec![Value::Int(a), Value::Int(b), Value::Int(c as i32)]);
                assert_eq!(got, expected, "logic({}, {}, {})", a, b, c);
            }
        }
    }
}

#[test]
fn test_nested_if_in_loop() {
    let vm = Vm::load(&jasmin(&flow_program()));
    assert_eq!(run_int(&vm, "evens", vec![Value::Int(7)]), 4);
    assert_eq!(run_int(&vm, "evens", vec![Value::Int(0)]), 0);
    assert_eq!(run_int(&vm, "evens", vec![Value::Int(10)]), 5);
}

#[test]
fn test_labels_unique_across_class() {
    let text = jasmin(&flow_program());
    let mut labels: Vec<&str> = text
        .lines()
        .filter(|l| l.ends_with(':') && !l.starts_with("cmp_"))
        .collect();
    let total = labels.len();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), total);
    // max and logic each hold an if; evens holds one more inside its loop.
    assert!(text.contains("if2:"));
    assert!(text.contains("whileEnd2:"));
}

// --- Values produced by conditions ---

#[test]
fn test_relational_values() {
    let ops: [(&str, BinOp, fn(i32, i32) -> bool); 6] = [
        ("lt", BinOp::Lt, |a, b| a < b),
        ("gt", BinOp::Gt, |a, b| a > b),
        ("le", BinOp::Le, |a, b| a <= b),
        ("ge", BinOp::Ge, |a, b| a >= b),
        ("eq", BinOp::Eq, |a, b| a == b),
        ("ne", BinOp::Ne, |a, b| a != b),
    ];
    let methods = ops
        .iter()
        .map(|(name, op, _)| relational_method(name, op.clone()))
        .collect();
    let vm = Vm::load(&jasmin(&program("Rel", &[], vec![], methods)));
    for (name, _, reference) in ops.iter() {
        for (a, b) in [(1, 2), (2, 1), (4, 4), (-3, 3), (0, -1)] {
            assert_eq!(
                run_int(&vm, name, vec![Value::Int(a), Value::Int(b)]),
                reference(a, b) as i32,
                "{}({}, {})",
                name,
                a,
                b
            );
        }
    }
}

#[test]
fn test_not_value_and_boolean_arrays() {
    let mut neg = method("neg", Type::Boolean, &[("b", Type::Boolean)], &[]);
    neg.body = vec![Stmt::Return(Some(Expr::not(var("b"))))];

    let mut flags = method(
        "flags",
        Type::Int,
        &[],
        &[("arr", Type::array_of(Type::Boolean)), ("r", Type::Int)],
    );
    flags.body = vec![
        Stmt::assign(
            "arr",
            Expr::NewArray {
                element: Type::Boolean,
                size: Box::new(int(2)),
            },
        ),
        Stmt::ArrayAssign {
            name: "arr".into(),
            index: int(1),
            value: Expr::BoolLiteral(true),
        },
        Stmt::If {
            condition: Expr::index(var("arr"), int(1)),
            then_branch: vec![Stmt::assign("r", int(1))],
            else_branch: Some(vec![Stmt::assign("r", int(0))]),
        },
        Stmt::Return(Some(var("r"))),
    ];

    let text = jasmin(&program("Bools", &[], vec![], vec![neg, flags]));
    assert_eq!(body(&text, "neg"), vec!["iload_1", "iconst_1", "ixor", "istore_2", "iload_2", "ireturn"]);
    let vm = Vm::load(&text);
    assert_eq!(run_int(&vm, "neg", vec![Value::Int(0)]), 1);
    assert_eq!(run_int(&vm, "neg", vec![Value::Int(1)]), 0);
    assert_eq!(run_int(&vm, "flags", vec![]), 1);
    assert!(body(&text, "flags").contains(&"newarray boolean".to_string()));
    assert!(body(&text, "flags").contains(&"bastore".to_string()));
    assert!(body(&text, "flags").contains(&"baload".to_string()));
}

#[test]
fn test_array_literal() {
    let mut pick = method("pick", Type::Int, &[("k", Type::Int)], &[("xs", Type::array_of(Type::Int))]);
    pick.body = vec![
        Stmt::assign("xs", Expr::ArrayLiteral(vec![int(10), int(20), int(30)])),
        Stmt::Return(Some(Expr::index(var("xs"), var("k")))),
    ];
    let vm = Vm::load(&jasmin(&program("Lit", &[], vec![], vec![pick])));
    assert_eq!(run_int(&vm, "pick", vec![Value::Int(0)]), 10);
    assert_eq!(run_int(&vm, "pick", vec![Value::Int(2)]), 30);
}

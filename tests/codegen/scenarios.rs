use super::*;

use jasmin_codegen::ast::{BinOp, Expr, Stmt};
use jasmin_codegen::types::Type;
use jasmin_codegen::CompileError;
use pretty_assertions::assert_eq;

fn int(v: i32) -> Expr {
    Expr::IntLiteral(v)
}

fn returning(name: &str, ret: Type, value: Expr) -> MethodDecl {
    let mut m = MethodDecl::new(name, ret);
    m.body.push(Stmt::Return(Some(value)));
    m
}

// --- Constants ---

#[test]
fn test_literals_survive_every_encoding() {
    let values = [
        i32::MIN,
        -32769,
        -32768,
        -129,
        -128,
        -2,
        -1,
        0,
        1,
        5,
        6,
        127,
        128,
        32767,
        32768,
        i32::MAX,
    ];
    let methods = values
        .iter()
        .enumerate()
        .map(|(i, v)| returning(&format!("lit{}", i), Type::Int, int(*v)))
        .collect();
    let text = jasmin(&program("Lits", &[], vec![], methods));
    let vm = Vm::load(&text);
    for (i, v) in values.iter().enumerate() {
        assert_eq!(run_int(&vm, &format!("lit{}", i), vec![]), *v);
    }

    assert_eq!(body(&text, "lit6"), vec!["iconst_m1", "ireturn"]);
    assert_eq!(body(&text, "lit7"), vec!["iconst_0", "ireturn"]);
    assert_eq!(body(&text, "lit10"), vec!["bipush 6", "ireturn"]);
    assert_eq!(body(&text, "lit12"), vec!["sipush 128", "ireturn"]);
    assert_eq!(body(&text, "lit14"), vec!["ldc 32768", "ireturn"]);
}

#[test]
fn test_boolean_literals() {
    let text = jasmin(&program(
        "Bools",
        &[],
        vec![],
        vec![
            returning("yes", Type::Boolean, Expr::BoolLiteral(true)),
            returning("no", Type::Boolean, Expr::BoolLiteral(false)),
        ],
    ));
    assert!(text.contains(".method public yes()Z"));
    assert_eq!(body(&text, "yes"), vec!["iconst_1", "ireturn"]);
    assert_eq!(body(&text, "no"), vec!["iconst_0", "ireturn"]);
}

// --- Locals and increments ---

fn bump_program() -> Program {
    let mut m = MethodDecl::new("bump", Type::Int);
    m.params.push(VarDecl::new("a", Type::Int));
    m.locals.push(VarDecl::new("x", Type::Int));
    let x = || Expr::var("x");
    m.body = vec![
        Stmt::assign("x", int(0)),
        Stmt::assign("x", Expr::binary(BinOp::Add, x(), int(5))),
        Stmt::assign("x", Expr::binary(BinOp::Add, int(200), x())),
        Stmt::assign("x", Expr::binary(BinOp::Sub, x(), int(3))),
        Stmt::Return(Some(x())),
    ];
    program("Bump", &[], vec![], vec![m])
}

#[test]
fn test_increment_fusion() {
    let text = jasmin(&bump_program());
    assert_eq!(
        body(&text, "bump"),
        vec![
            "iconst_0",
            "istore_2",
            "iinc 2 5",
            "sipush 200",
            "iload_2",
            "iadd",
            "istore_2",
            "iinc 2 -3",
            "iload_2",
            "ireturn",
        ]
    );
    let vm = Vm::load(&text);
    assert_eq!(run_int(&vm, "bump", vec![Value::Int(9)]), 202);
}

#[test]
fn test_increment_fusion_can_be_disabled() {
    let options = CodegenOptions {
        fuse_increments: false,
        ..CodegenOptions::default()
    };
    let text = compile(&bump_program(), &options).unwrap();
    assert!(!text.contains("iinc"));
    let vm = Vm::load(&text);
    assert_eq!(run_int(&vm, "bump", vec![Value::Int(9)]), 202);
}

// --- Fields ---

#[test]
fn test_field_write_and_read() {
    let mut set = MethodDecl::new("set", Type::Void);
    set.body.push(Stmt::assign("f", int(3)));
    let get = returning("get", Type::Int, Expr::var("f"));
    let text = jasmin(&program("C", &[], vec![VarDecl::new("f", Type::Int)], vec![set, get]));

    assert!(text.contains(".field public f I\n"));
    assert_eq!(body(&text, "set"), vec!["aload_0", "iconst_3", "putfield C/f I", "return"]);
    assert_eq!(
        body(&text, "get"),
        vec!["aload_0", "getfield C/f I", "istore_1", "iload_1", "ireturn"]
    );
}

// --- Calls ---

#[test]
fn test_imported_static_call() {
    let mut show = MethodDecl::new("show", Type::Void);
    show.params.push(VarDecl::new("a", Type::Int));
    show.body
        .push(Stmt::Expr(Expr::call(Expr::var("io"), "println", vec![Expr::var("a")])));

    let mut read = MethodDecl::new("read", Type::Int);
    read.locals.push(VarDecl::new("x", Type::Int));
    read.body = vec![
        Stmt::assign("x", Expr::call(Expr::var("io"), "read", vec![])),
        Stmt::Return(Some(Expr::var("x"))),
    ];

    let text = jasmin(&program("Io", &["io"], vec![], vec![show, read]));
    assert_eq!(body(&text, "show"), vec!["iload_1", "invokestatic io/println(I)V", "return"]);
    assert_eq!(
        body(&text, "read"),
        vec!["invokestatic io/read()I", "istore_1", "iload_1", "ireturn"]
    );

    let vm = Vm::load(&text);
    let (_, trace) = vm.run("show", vec![Value::Int(42)]);
    assert_eq!(trace.calls.len(), 1);
    assert_eq!(trace.calls[0].target, "io/println");
    assert_eq!(trace.calls[0].args, vec![42]);
}

#[test]
fn test_static_call_on_own_class() {
    let mut twice = MethodDecl::new("twice", Type::Int);
    twice.is_static = true;
    twice.params.push(VarDecl::new("x", Type::Int));
    twice.body.push(Stmt::Return(Some(Expr::binary(
        BinOp::Add,
        Expr::var("x"),
        Expr::var("x"),
    ))));

    let mut run = returning(
        "run",
        Type::Int,
        Expr::call(Expr::var("Calc"), "twice", vec![int(21)]),
    );
    run.is_static = true;

    let text = jasmin(&program("Calc", &[], vec![], vec![twice, run]));
    assert!(text.contains(".method public static twice(I)I"));
    assert_eq!(
        body(&text, "run"),
        vec!["bipush 21", "invokestatic Calc/twice(I)I", "istore_0", "iload_0", "ireturn"]
    );
    let vm = Vm::load(&text);
    assert_eq!(run_int(&vm, "run", vec![]), 42);
}

#[test]
fn test_static_main_signature() {
    let mut main = MethodDecl::new("main", Type::Void);
    main.is_static = true;
    main.params
        .push(VarDecl::new("args", Type::array_of(Type::String)));
    main.body
        .push(Stmt::Expr(Expr::call(Expr::var("io"), "println", vec![int(1)])));

    let text = jasmin(&program("App", &["io"], vec![], vec![main]));
    assert!(text.contains(
        ".method public static main([Ljava/lang/String;)V\n   .limit stack 1\n   .limit locals 1\n"
    ));
    assert_eq!(body(&text, "main"), vec!["iconst_1", "invokestatic io/println(I)V", "return"]);
}

#[test]
fn test_varargs_are_packed() {
    let sum = returning(
        "sum",
        Type::Int,
        Expr::Length(Box::new(Expr::var("xs"))),
    );
    let sum = MethodDecl {
        params: vec![VarDecl::varargs("xs", Type::Int)],
        ..sum
    };
    let run = returning(
        "run",
        Type::Int,
        Expr::call(Expr::This, "sum", vec![int(4), int(5), int(6)]),
    );
    let mut forward = returning(
        "forward",
        Type::Int,
        Expr::call(Expr::This, "sum", vec![Expr::var("arr")]),
    );
    forward
        .params
        .push(VarDecl::new("arr", Type::array_of(Type::Int)));

    let text = jasmin(&program("Varargs", &[], vec![], vec![sum, run, forward]));
    assert!(text.contains(".method public sum([I)I"));

    let run_body = body(&text, "run");
    assert_eq!(run_body[..2].to_vec(), vec!["iconst_3", "newarray int"]);
    assert!(run_body.contains(&"invokevirtual Varargs/sum([I)I".to_string()));
    assert!(!body(&text, "forward").contains(&"newarray int".to_string()));

    let vm = Vm::load(&text);
    assert_eq!(run_int(&vm, "run", vec![]), 3);
    assert_eq!(run_int(&vm, "forward", vec![Value::array(&[7, 8])]), 2);
}

#[test]
fn test_declared_call_uses_parameter_types() {
    let mut take = MethodDecl::new("take", Type::Void);
    take.params.push(VarDecl::new("b", Type::object("Base")));
    let mut go = MethodDecl::new("go", Type::Void);
    go.body
        .push(Stmt::Expr(Expr::call(Expr::This, "take", vec![Expr::This])));

    let mut p = program("Child", &["pkg.Base"], vec![], vec![take, go]);
    p.class.superclass = Some("Base".into());
    let text = jasmin(&p);
    assert!(text.contains(".method public take(Lpkg/Base;)V"));
    assert_eq!(
        body(&text, "go"),
        vec!["aload_0", "aload_0", "invokevirtual Child/take(Lpkg/Base;)V", "return"]
    );
}

// --- Objects ---

#[test]
fn test_object_creation() {
    let mut make = MethodDecl::new("make", Type::Void);
    make.locals.push(VarDecl::new("c", Type::object("C")));
    make.body.push(Stmt::assign("c", Expr::NewObject("C".into())));

    let text = jasmin(&program("C", &[], vec![], vec![make]));
    assert_eq!(
        body(&text, "make"),
        vec![
            "new C",
            "astore_1",
            "aload_1",
            "invokespecial C/<init>()V",
            "aload_1",
            "astore_2",
            "return",
        ]
    );
    Vm::load(&text).run("make", vec![]);
}

#[test]
fn test_imported_class_instance_call() {
    let mut demo = MethodDecl::new("demo", Type::Void);
    demo.locals
        .push(VarDecl::new("l", Type::object("ArrayList")));
    demo.body = vec![
        Stmt::assign("l", Expr::NewObject("ArrayList".into())),
        Stmt::Expr(Expr::call(Expr::var("l"), "add", vec![int(1)])),
    ];

    let text = jasmin(&program("Lists", &["java.util.ArrayList"], vec![], vec![demo]));
    assert_eq!(
        body(&text, "demo"),
        vec![
            "new java/util/ArrayList",
            "astore_1",
            "aload_1",
            "invokespecial java/util/ArrayList/<init>()V",
            "aload_1",
            "astore_2",
            "aload_2",
            "iconst_1",
            "invokevirtual java/util/ArrayList/add(I)V",
            "return",
        ]
    );
}

#[test]
fn test_default_constructor_and_header() {
    let text = jasmin(&program("Empty", &[], vec![], vec![]));
    assert_eq!(
        text,
        "\
.class public Empty
.super java/lang/Object

; default constructor
.method public <init>()V
   aload_0
   invokespecial java/lang/Object/<init>()V
   return
.end method

"
    );
}

#[test]
fn test_superclass_constructor_target() {
    let mut p = program("Child", &["pkg.Base"], vec![], vec![]);
    p.class.superclass = Some("Base".into());
    let text = jasmin(&p);
    assert!(text.starts_with(".class public Child\n.super pkg/Base\n"));
    assert!(text.contains("invokespecial pkg/Base/<init>()V"));
}

// --- Rejected programs ---

#[test]
fn test_colliding_imports_are_rejected() {
    let p = program("Dup", &["java.util.List", "other.List"], vec![], vec![]);
    match compile(&p, &CodegenOptions::default()) {
        Err(CompileError::DuplicateImport { segment, .. }) => assert_eq!(segment, "List"),
        other => panic!("expected a duplicate import error, got {:?}", other),
    }
}

#[test]
fn test_missing_method_without_superclass() {
    let mut m = MethodDecl::new("go", Type::Void);
    m.body
        .push(Stmt::Expr(Expr::call(Expr::This, "missing", vec![])));
    let p = program("Lonely", &[], vec![], vec![m.clone()]);
    assert!(matches!(
        compile(&p, &CodegenOptions::default()),
        Err(CompileError::MethodNotFound { .. })
    ));

    // With a superclass the call is assumed to be inherited.
    let mut p = program("Heir", &["pkg.Base"], vec![], vec![m]);
    p.class.superclass = Some("Base".into());
    let text = jasmin(&p);
    assert_eq!(body(&text, "go"), vec!["aload_0", "invokevirtual Heir/missing()V", "return"]);
}

#[test]
fn test_unknown_name_is_rejected() {
    let mut m = MethodDecl::new("go", Type::Int);
    m.body.push(Stmt::Return(Some(Expr::var("nowhere"))));
    let p = program("Lost", &[], vec![], vec![m]);
    assert!(matches!(
        compile(&p, &CodegenOptions::default()),
        Err(CompileError::UnresolvedSymbol { .. })
    ));
}

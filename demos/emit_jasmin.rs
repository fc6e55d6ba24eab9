//! Example: lower a small class to IR and Jasmin.
//!
//! This example:
//! 1. Builds the syntax tree of a class with a loop, an array and a call
//! 2. Lowers it to three-address IR and prints the IR text
//! 3. Emits the Jasmin assembly and prints it
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example emit_jasmin

use std::process;

use jasmin_codegen::ast::{BinOp, ClassDecl, Expr, MethodDecl, Program, Stmt, VarDecl};
use jasmin_codegen::symbol_table::SymbolTable;
use jasmin_codegen::types::Type;
use jasmin_codegen::{generate_jasmin, lower_checked, CodegenOptions};

fn main() {
    env_logger::init();

    // ── Step 1: Build the program ────────────────────────────────────────
    //
    // int total(int n) {
    //     int[] xs; int i; int s;
    //     xs = new int[n]; i = 0; s = 0;
    //     while (i < n) { xs[i] = i * i; s = s + xs[i]; i = i + 1; }
    //     io.println(s);
    //     return s;
    // }
    let var = Expr::var;
    let mut total = MethodDecl::new("total", Type::Int);
    total.params.push(VarDecl::new("n", Type::Int));
    total.locals = vec![
        VarDecl::new("xs", Type::array_of(Type::Int)),
        VarDecl::new("i", Type::Int),
        VarDecl::new("s", Type::Int),
    ];
    total.body = vec![
        Stmt::assign(
            "xs",
            Expr::NewArray {
                element: Type::Int,
                size: Box::new(var("n")),
            },
        ),
        Stmt::assign("i", Expr::IntLiteral(0)),
        Stmt::assign("s", Expr::IntLiteral(0)),
        Stmt::While {
            condition: Expr::binary(BinOp::Lt, var("i"), var("n")),
            body: vec![
                Stmt::ArrayAssign {
                    name: "xs".into(),
                    index: var("i"),
                    value: Expr::binary(BinOp::Mul, var("i"), var("i")),
                },
                Stmt::assign(
                    "s",
                    Expr::binary(BinOp::Add, var("s"), Expr::index(var("xs"), var("i"))),
                ),
                Stmt::assign("i", Expr::binary(BinOp::Add, var("i"), Expr::IntLiteral(1))),
            ],
        },
        Stmt::Expr(Expr::call(var("io"), "println", vec![var("s")])),
        Stmt::Return(Some(var("s"))),
    ];

    let program = Program {
        imports: vec!["io".into()],
        class: ClassDecl {
            name: "Squares".into(),
            superclass: None,
            fields: vec![VarDecl::new("last", Type::Int)],
            methods: vec![total],
        },
    };

    // ── Step 2: Lower to IR ──────────────────────────────────────────────
    let table = SymbolTable::from_program(&program);
    let unit = match lower_checked(&program, &table) {
        Ok(unit) => unit,
        Err(e) => {
            eprintln!("lowering failed: {}", e);
            process::exit(1);
        }
    };
    println!("── IR ──────────────────────────────────────────────────────────");
    println!("{}", unit);

    // ── Step 3: Emit Jasmin ──────────────────────────────────────────────
    match generate_jasmin(&unit, &CodegenOptions::default()) {
        Ok(text) => {
            println!("── Jasmin ──────────────────────────────────────────────────────");
            print!("{}", text);
        }
        Err(e) => {
            eprintln!("code generation failed: {}", e);
            process::exit(1);
        }
    }
}

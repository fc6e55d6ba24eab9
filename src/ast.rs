//! Type-checked syntax tree consumed by the lowering stage.
//!
//! The tree is produced by the front end; nothing here is validated again
//! beyond what code generation needs.

use crate::types::Type;

#[derive(Clone, Debug, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinOp {
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge | BinOp::Eq | BinOp::Ne
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    /// Type of the value the operator produces.
    pub fn result_type(&self) -> Type {
        if self.is_arithmetic() {
            Type::Int
        } else {
            Type::Boolean
        }
    }

    /// Type both operands are expected to have.
    pub fn operand_type(&self) -> Type {
        if self.is_logical() {
            Type::Boolean
        } else {
            Type::Int
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    IntLiteral(i32),
    BoolLiteral(bool),
    Var(String),
    This,
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    NewObject(String),
    NewArray {
        element: Type,
        size: Box<Expr>,
    },
    ArrayLiteral(Vec<Expr>),
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Length(Box<Expr>),
    /// `receiver.method(args)`; the receiver is `this`, a variable, or an imported class name.
    Call {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Expr {
        Expr::Var(name.into())
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(operand: Expr) -> Expr {
        Expr::Not(Box::new(operand))
    }

    pub fn call(receiver: Expr, method: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::Call {
            receiver: Box::new(receiver),
            method: method.into(),
            args,
        }
    }

    pub fn index(array: Expr, index: Expr) -> Expr {
        Expr::ArrayAccess {
            array: Box::new(array),
            index: Box::new(index),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Assign {
        name: String,
        value: Expr,
    },
    ArrayAssign {
        name: String,
        index: Expr,
        value: Expr,
    },
    Return(Option<Expr>),
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
    Expr(Expr),
    Block(Vec<Stmt>),
}

impl Stmt {
    pub fn assign(name: impl Into<String>, value: Expr) -> Stmt {
        Stmt::Assign {
            name: name.into(),
            value,
        }
    }
}

/// A field, parameter or local declaration.
///
/// Fields declared in source are always public instance fields.
#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: Type,
    /// Only meaningful on the last parameter; `ty` is then an array type.
    pub varargs: bool,
}

impl VarDecl {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        VarDecl {
            name: name.into(),
            ty,
            varargs: false,
        }
    }

    pub fn varargs(name: impl Into<String>, element: Type) -> Self {
        VarDecl {
            name: name.into(),
            ty: Type::array_of(element),
            varargs: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub is_public: bool,
    pub is_static: bool,
    pub return_type: Type,
    pub params: Vec<VarDecl>,
    pub locals: Vec<VarDecl>,
    pub body: Vec<Stmt>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, return_type: Type) -> Self {
        MethodDecl {
            name: name.into(),
            is_public: true,
            is_static: false,
            return_type,
            params: Vec::new(),
            locals: Vec::new(),
            body: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub superclass: Option<String>,
    pub fields: Vec<VarDecl>,
    pub methods: Vec<MethodDecl>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    /// Dotted import paths, e.g. `java.util.List`.
    pub imports: Vec<String>,
    pub class: ClassDecl,
}

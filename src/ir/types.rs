use crate::types::Type;

use super::var_table::VarTable;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MethodFlags(u16);

bitflags! {
    impl MethodFlags: u16 {
        const PUBLIC = 0x0001;     // Declared public; may be accessed from outside its package.
        const PRIVATE = 0x0002;    // Declared private; accessible only within the defining class.
        const PROTECTED = 0x0004;  // Declared protected; may be accessed within subclasses.
        const STATIC = 0x0008;     // Declared static.
        const FINAL = 0x0010;      // Declared final; must not be overridden.
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct FieldFlags(u16);

bitflags! {
    impl FieldFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
    }
}

/// A named storage location: parameter, local, temporary or `this`.
#[derive(Clone, Debug, PartialEq)]
pub struct Var {
    pub name: String,
    pub ty: Type,
    /// 1-based parameter position, rendered as `$n.` in IR text.
    pub param: Option<usize>,
}

impl Var {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Var {
            name: name.into(),
            ty,
            param: None,
        }
    }

    pub fn param(position: usize, name: impl Into<String>, ty: Type) -> Self {
        Var {
            name: name.into(),
            ty,
            param: Some(position),
        }
    }

    pub fn this() -> Self {
        Var::new("this", Type::This)
    }

    pub fn is_this(&self) -> bool {
        self.ty == Type::This || self.name == "this"
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// Integer or boolean immediate; booleans are 0/1.
    Literal { value: i32, ty: Type },
    Variable(Var),
    ArrayElement {
        array: Var,
        index: Box<Operand>,
        ty: Type,
    },
}

impl Operand {
    pub fn int(value: i32) -> Operand {
        Operand::Literal {
            value,
            ty: Type::Int,
        }
    }

    pub fn boolean(value: bool) -> Operand {
        Operand::Literal {
            value: value as i32,
            ty: Type::Boolean,
        }
    }

    pub fn var(name: impl Into<String>, ty: Type) -> Operand {
        Operand::Variable(Var::new(name, ty))
    }

    pub fn this() -> Operand {
        Operand::Variable(Var::this())
    }

    pub fn ty(&self) -> &Type {
        match self {
            Operand::Literal { ty, .. } => ty,
            Operand::Variable(var) => &var.ty,
            Operand::ArrayElement { ty, .. } => ty,
        }
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Operand::Variable(var) => Some(var),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
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

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge | BinaryOp::Eq | BinaryOp::Ne
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl From<&crate::ast::BinOp> for BinaryOp {
    fn from(op: &crate::ast::BinOp) -> Self {
        use crate::ast::BinOp;
        match op {
            BinOp::Add => BinaryOp::Add,
            BinOp::Sub => BinaryOp::Sub,
            BinOp::Mul => BinaryOp::Mul,
            BinOp::Div => BinaryOp::Div,
            BinOp::Lt => BinaryOp::Lt,
            BinOp::Gt => BinaryOp::Gt,
            BinOp::Le => BinaryOp::Le,
            BinOp::Ge => BinaryOp::Ge,
            BinOp::Eq => BinaryOp::Eq,
            BinOp::Ne => BinaryOp::Ne,
            BinOp::And => BinaryOp::And,
            BinOp::Or => BinaryOp::Or,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    New,
    InvokeSpecial,
    InvokeVirtual,
    InvokeStatic,
    ArrayLength,
}

impl CallKind {
    pub fn name(&self) -> &'static str {
        match self {
            CallKind::New => "new",
            CallKind::InvokeSpecial => "invokespecial",
            CallKind::InvokeVirtual => "invokevirtual",
            CallKind::InvokeStatic => "invokestatic",
            CallKind::ArrayLength => "arraylength",
        }
    }
}

/// What a call is made on: an object value, or a class by name (`new`, static calls).
#[derive(Clone, Debug, PartialEq)]
pub enum Caller {
    Object(Operand),
    Class(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallInstruction {
    pub kind: CallKind,
    pub caller: Caller,
    pub method: Option<String>,
    pub args: Vec<Operand>,
    pub return_type: Type,
    /// Declared parameter types when the callee's signature is known.
    /// Untyped calls take their descriptor from the argument types.
    pub param_types: Option<Vec<Type>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Assign {
        dest: Operand,
        ty: Type,
        rhs: Box<Instruction>,
    },
    BinaryOp {
        op: BinaryOp,
        left: Operand,
        right: Operand,
        ty: Type,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Operand,
        ty: Type,
    },
    SingleOp(Operand),
    Call(CallInstruction),
    GetField {
        object: Operand,
        field: Field,
    },
    PutField {
        object: Operand,
        field: Field,
        value: Operand,
    },
    Return {
        operand: Option<Operand>,
        ty: Type,
    },
    CondBranch {
        condition: Box<Instruction>,
        label: String,
    },
    Goto(String),
    Label(String),
}

impl Instruction {
    pub fn assign(dest: Operand, rhs: Instruction) -> Instruction {
        let ty = dest.ty().clone();
        Instruction::Assign {
            dest,
            ty,
            rhs: Box::new(rhs),
        }
    }

    /// Name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Instruction::Assign { .. } => "assign",
            Instruction::BinaryOp { .. } => "binary operation",
            Instruction::UnaryOp { .. } => "unary operation",
            Instruction::SingleOp(_) => "single operand",
            Instruction::Call(_) => "call",
            Instruction::GetField { .. } => "getfield",
            Instruction::PutField { .. } => "putfield",
            Instruction::Return { .. } => "return",
            Instruction::CondBranch { .. } => "conditional branch",
            Instruction::Goto(_) => "goto",
            Instruction::Label(_) => "label",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Method {
    pub name: String,
    pub flags: MethodFlags,
    pub is_constructor: bool,
    pub params: Vec<Var>,
    pub return_type: Type,
    pub instructions: Vec<Instruction>,
    /// Branch targets in definition order; the index may equal `instructions.len()`.
    pub labels: Vec<(String, usize)>,
    pub var_table: VarTable,
}

impl Method {
    /// Build a method from a lowered instruction stream.
    ///
    /// `Label` instructions are folded into the label map at the index of the
    /// instruction they precede, and virtual registers are allocated.
    pub fn new(
        name: impl Into<String>,
        flags: MethodFlags,
        params: Vec<Var>,
        return_type: Type,
        body: Vec<Instruction>,
    ) -> Self {
        let mut instructions = Vec::with_capacity(body.len());
        let mut labels = Vec::new();
        for inst in body {
            match inst {
                Instruction::Label(name) => labels.push((name, instructions.len())),
                other => instructions.push(other),
            }
        }
        let var_table = VarTable::build(flags.contains(MethodFlags::STATIC), &params, &instructions);
        Method {
            name: name.into(),
            flags,
            is_constructor: false,
            params,
            return_type,
            instructions,
            labels,
            var_table,
        }
    }

    pub fn constructor(flags: MethodFlags, params: Vec<Var>, body: Vec<Instruction>) -> Self {
        let mut method = Method::new("<init>", flags, params, Type::Void, body);
        method.is_constructor = true;
        method
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }

    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().find(|(name, _)| name == label).map(|(_, idx)| *idx)
    }

    pub fn labels_at(&self, index: usize) -> impl Iterator<Item = &str> {
        self.labels
            .iter()
            .filter(move |(_, idx)| *idx == index)
            .map(|(name, _)| name.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Type,
    pub flags: FieldFlags,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassUnit {
    pub name: String,
    pub superclass: Option<String>,
    pub imports: Vec<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<Method>,
}

impl ClassUnit {
    pub fn has_constructor(&self) -> bool {
        self.methods.iter().any(|m| m.is_constructor)
    }
}

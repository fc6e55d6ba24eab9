use std::fmt;

/// Element type operand of `newarray`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayType {
    Int,
    Boolean,
}

/// Symbolic reference to a method, as written after an `invoke*` mnemonic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodRef {
    pub class: String,
    pub name: String,
    pub descriptor: String,
    /// Number of declared arguments, not counting the receiver.
    pub arg_count: usize,
    pub returns_value: bool,
}

/// Symbolic reference to a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldRef {
    pub class: String,
    pub name: String,
    pub descriptor: String,
}

/// The JVM instructions the emitter produces, with Jasmin operands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mnemonic {
    // --- Constants ---
    Iconstm1,
    Iconst0,
    Iconst1,
    Iconst2,
    Iconst3,
    Iconst4,
    Iconst5,
    Bipush(i8),
    Sipush(i16),
    Ldc(i32),

    // --- Locals ---
    Iload(u16),
    Iload0,
    Iload1,
    Iload2,
    Iload3,
    Aload(u16),
    Aload0,
    Aload1,
    Aload2,
    Aload3,
    Istore(u16),
    Istore0,
    Istore1,
    Istore2,
    Istore3,
    Astore(u16),
    Astore0,
    Astore1,
    Astore2,
    Astore3,
    Iinc { index: u16, value: i8 },

    // --- Arithmetic and logic ---
    Iadd,
    Isub,
    Imul,
    Idiv,
    Iand,
    Ior,
    Ixor,

    // --- Arrays ---
    Iaload,
    Baload,
    Aaload,
    Iastore,
    Bastore,
    Aastore,
    Newarray(ArrayType),
    Anewarray(String),
    Arraylength,

    // --- Control flow ---
    Ifeq(String),
    Ifne(String),
    Iflt(String),
    Ifge(String),
    Ifgt(String),
    Ifle(String),
    Goto(String),
    Ireturn,
    Areturn,
    Return,

    // --- Objects and calls ---
    New(String),
    Getfield(FieldRef),
    Putfield(FieldRef),
    Invokevirtual(MethodRef),
    Invokespecial(MethodRef),
    Invokestatic(MethodRef),
    Pop,
}

impl Mnemonic {
    /// Label this instruction jumps to, if it is a branch.
    pub fn branch_target(&self) -> Option<&str> {
        match self {
            Mnemonic::Ifeq(l)
            | Mnemonic::Ifne(l)
            | Mnemonic::Iflt(l)
            | Mnemonic::Ifge(l)
            | Mnemonic::Ifgt(l)
            | Mnemonic::Ifle(l)
            | Mnemonic::Goto(l) => Some(l),
            _ => None,
        }
    }

    /// Control never falls through to the next instruction.
    pub fn ends_block(&self) -> bool {
        matches!(
            self,
            Mnemonic::Goto(_) | Mnemonic::Ireturn | Mnemonic::Areturn | Mnemonic::Return
        )
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mnemonic::Iconstm1 => write!(f, "iconst_m1"),
            Mnemonic::Iconst0 => write!(f, "iconst_0"),
            Mnemonic::Iconst1 => write!(f, "iconst_1"),
            Mnemonic::Iconst2 => write!(f, "iconst_2"),
            Mnemonic::Iconst3 => write!(f, "iconst_3"),
            Mnemonic::Iconst4 => write!(f, "iconst_4"),
            Mnemonic::Iconst5 => write!(f, "iconst_5"),
            Mnemonic::Bipush(v) => write!(f, "bipush {}", v),
            Mnemonic::Sipush(v) => write!(f, "sipush {}", v),
            Mnemonic::Ldc(v) => write!(f, "ldc {}", v),

            Mnemonic::Iload(n) => write!(f, "iload {}", n),
            Mnemonic::Iload0 => write!(f, "iload_0"),
            Mnemonic::Iload1 => write!(f, "iload_1"),
            Mnemonic::Iload2 => write!(f, "iload_2"),
            Mnemonic::Iload3 => write!(f, "iload_3"),
            Mnemonic::Aload(n) => write!(f, "aload {}", n),
            Mnemonic::Aload0 => write!(f, "aload_0"),
            Mnemonic::Aload1 => write!(f, "aload_1"),
            Mnemonic::Aload2 => write!(f, "aload_2"),
            Mnemonic::Aload3 => write!(f, "aload_3"),
            Mnemonic::Istore(n) => write!(f, "istore {}", n),
            Mnemonic::Istore0 => write!(f, "istore_0"),
            Mnemonic::Istore1 => write!(f, "istore_1"),
            Mnemonic::Istore2 => write!(f, "istore_2"),
            Mnemonic::Istore3 => write!(f, "istore_3"),
            Mnemonic::Astore(n) => write!(f, "astore {}", n),
            Mnemonic::Astore0 => write!(f, "astore_0"),
            Mnemonic::Astore1 => write!(f, "astore_1"),
            Mnemonic::Astore2 => write!(f, "astore_2"),
            Mnemonic::Astore3 => write!(f, "astore_3"),
            Mnemonic::Iinc { index, value } => write!(f, "iinc {} {}", index, value),

            Mnemonic::Iadd => write!(f, "iadd"),
            Mnemonic::Isub => write!(f, "isub"),
            Mnemonic::Imul => write!(f, "imul"),
            Mnemonic::Idiv => write!(f, "idiv"),
            Mnemonic::Iand => write!(f, "iand"),
            Mnemonic::Ior => write!(f, "ior"),
            Mnemonic::Ixor => write!(f, "ixor"),

            Mnemonic::Iaload => write!(f, "iaload"),
            Mnemonic::Baload => write!(f, "baload"),
            Mnemonic::Aaload => write!(f, "aaload"),
            Mnemonic::Iastore => write!(f, "iastore"),
            Mnemonic::Bastore => write!(f, "bastore"),
            Mnemonic::Aastore => write!(f, "aastore"),
            Mnemonic::Newarray(ArrayType::Int) => write!(f, "newarray int"),
            Mnemonic::Newarray(ArrayType::Boolean) => write!(f, "newarray boolean"),
            Mnemonic::Anewarray(class) => write!(f, "anewarray {}", class),
            Mnemonic::Arraylength => write!(f, "arraylength"),

            Mnemonic::Ifeq(l) => write!(f, "ifeq {}", l),
            Mnemonic::Ifne(l) => write!(f, "ifne {}", l),
            Mnemonic::Iflt(l) => write!(f, "iflt {}", l),
            Mnemonic::Ifge(l) => write!(f, "ifge {}", l),
            Mnemonic::Ifgt(l) => write!(f, "ifgt {}", l),
            Mnemonic::Ifle(l) => write!(f, "ifle {}", l),
            Mnemonic::Goto(l) => write!(f, "goto {}", l),
            Mnemonic::Ireturn => write!(f, "ireturn"),
            Mnemonic::Areturn => write!(f, "areturn"),
            Mnemonic::Return => write!(f, "return"),

            Mnemonic::New(class) => write!(f, "new {}", class),
            Mnemonic::Getfield(r) => write!(f, "getfield {}/{} {}", r.class, r.name, r.descriptor),
            Mnemonic::Putfield(r) => write!(f, "putfield {}/{} {}", r.class, r.name, r.descriptor),
            Mnemonic::Invokevirtual(r) => {
                write!(f, "invokevirtual {}/{}{}", r.class, r.name, r.descriptor)
            }
            Mnemonic::Invokespecial(r) => {
                write!(f, "invokespecial {}/{}{}", r.class, r.name, r.descriptor)
            }
            Mnemonic::Invokestatic(r) => {
                write!(f, "invokestatic {}/{}{}", r.class, r.name, r.descriptor)
            }
            Mnemonic::Pop => write!(f, "pop"),
        }
    }
}

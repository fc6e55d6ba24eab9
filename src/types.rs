use std::fmt;

/// Semantic type of a value in the source language.
///
/// Varargs is not a distinct kind: a varargs declaration is an `Array` with
/// the marker carried on the declaration (see [`crate::ast::VarDecl`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Boolean,
    String,
    Void,
    /// The enclosing class, as seen through `this`.
    This,
    Object(String),
    Array(Box<Type>),
}

impl Type {
    pub fn array_of(element: Type) -> Type {
        Type::Array(Box::new(element))
    }

    pub fn object(name: impl Into<String>) -> Type {
        Type::Object(name.into())
    }

    /// Int and boolean values use the `i`-prefixed opcode family.
    pub fn is_int_like(&self) -> bool {
        matches!(self, Type::Int | Type::Boolean)
    }

    pub fn is_reference(&self) -> bool {
        !self.is_int_like() && *self != Type::Void
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Array(inner) => Some(inner),
            _ => None,
        }
    }

    /// Parse a source-level type name such as `int`, `boolean`, `String` or a class name.
    pub fn from_name(name: &str) -> Type {
        match name {
            "int" => Type::Int,
            "boolean" => Type::Boolean,
            "String" => Type::String,
            "void" => Type::Void,
            other => Type::Object(other.to_string()),
        }
    }

    /// The IR suffix for this type, without the leading dot.
    pub fn ir_suffix(&self) -> String {
        match self {
            Type::Int => "i32".into(),
            Type::Boolean => "bool".into(),
            Type::String => "String".into(),
            Type::Void => "V".into(),
            Type::This => "this".into(),
            Type::Object(name) => name.clone(),
            Type::Array(inner) => format!("array.{}", inner.ir_suffix()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Boolean => write!(f, "boolean"),
            Type::String => write!(f, "String"),
            Type::Void => write!(f, "void"),
            Type::This => write!(f, "this"),
            Type::Object(name) => write!(f, "{}", name),
            Type::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum CompileError {
    /// A name used in a method resolves to no parameter, local or field.
    UnresolvedSymbol {
        name: String,
        method: String,
    },
    MethodNotFound {
        name: String,
    },
    DuplicateImport {
        segment: String,
        first: String,
        second: String,
    },
    InvalidVarargs {
        method: String,
        param: String,
    },
    /// An IR operand names a variable that has no virtual register.
    UnknownVariable {
        name: String,
        method: String,
    },
    UnknownLabel {
        label: String,
        method: String,
    },
    UnsupportedOperator {
        op: String,
        context: &'static str,
    },
    UnsupportedInstruction {
        kind: &'static str,
        method: String,
    },
    MalformedInstruction {
        message: String,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::UnresolvedSymbol { name, method } => {
                write!(f, "unresolved symbol '{}' in method '{}'", name, method)
            }
            CompileError::MethodNotFound { name } => write!(f, "method not found: {}", name),
            CompileError::DuplicateImport {
                segment,
                first,
                second,
            } => write!(
                f,
                "imports '{}' and '{}' both bind the name '{}'",
                first, second, segment
            ),
            CompileError::InvalidVarargs { method, param } => write!(
                f,
                "varargs parameter '{}' of method '{}' is not the last parameter",
                param, method
            ),
            CompileError::UnknownVariable { name, method } => write!(
                f,
                "codegen error: variable '{}' has no register in method '{}'",
                name, method
            ),
            CompileError::UnknownLabel { label, method } => write!(
                f,
                "codegen error: branch to undefined label '{}' in method '{}'",
                label, method
            ),
            CompileError::UnsupportedOperator { op, context } => {
                write!(f, "codegen error: operator '{}' not supported in {}", op, context)
            }
            CompileError::UnsupportedInstruction { kind, method } => write!(
                f,
                "codegen error: {} instruction not supported in method '{}'",
                kind, method
            ),
            CompileError::MalformedInstruction { message } => {
                write!(f, "codegen error: {}", message)
            }
        }
    }
}

impl std::error::Error for CompileError {}

pub type CompileResult<T> = Result<T, CompileError>;

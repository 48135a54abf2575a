//! Static result types of property expressions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The static type of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    /// Boolean.
    Bool,
    /// Integer.
    Int,
    /// Real number (IEEE double).
    Double,
}

impl Type {
    /// Check if this is a numeric type (Int or Double).
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Double)
    }

    /// Least common numeric type of two operands: Int only if both are Int.
    pub fn join_numeric(self, other: Type) -> Type {
        if self == Type::Int && other == Type::Int {
            Type::Int
        } else {
            Type::Double
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Double => write!(f, "double"),
        }
    }
}

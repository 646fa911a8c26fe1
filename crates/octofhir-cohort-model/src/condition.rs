//! Comparison conditions

use crate::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of operands a condition consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// No operand (`IS_NULL`, `IS_NOT_NULL`)
    Nullary,
    /// One value
    Unary,
    /// Closed range: value is the lower bound, max value the upper bound
    Range,
}

/// Comparison operator of a value constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    Equals,
    NotEquals,
    Less,
    LessOrEqualTo,
    Greater,
    GreaterOrEqualTo,
    Like,
    Between,
    IsNull,
    IsNotNull,
}

impl Condition {
    pub const ALL: [Condition; 10] = [
        Condition::Equals,
        Condition::NotEquals,
        Condition::Less,
        Condition::LessOrEqualTo,
        Condition::Greater,
        Condition::GreaterOrEqualTo,
        Condition::Like,
        Condition::Between,
        Condition::IsNull,
        Condition::IsNotNull,
    ];

    pub const fn arity(&self) -> Arity {
        match self {
            Condition::IsNull | Condition::IsNotNull => Arity::Nullary,
            Condition::Between => Arity::Range,
            Condition::Equals
            | Condition::NotEquals
            | Condition::Less
            | Condition::LessOrEqualTo
            | Condition::Greater
            | Condition::GreaterOrEqualTo
            | Condition::Like => Arity::Unary,
        }
    }

    /// Key of the atomic expression template selected for this condition
    pub const fn operator_key(&self) -> &'static str {
        match self {
            Condition::Equals => "=",
            Condition::NotEquals => "<>",
            Condition::Less => "<",
            Condition::LessOrEqualTo => "<=",
            Condition::Greater => ">",
            Condition::GreaterOrEqualTo => ">=",
            Condition::Like => "like",
            Condition::Between => "...",
            Condition::IsNull => "is null",
            Condition::IsNotNull => "is not null",
        }
    }

    /// Wire name, as used in serialized descriptors
    pub const fn as_str(&self) -> &'static str {
        match self {
            Condition::Equals => "EQUALS",
            Condition::NotEquals => "NOT_EQUALS",
            Condition::Less => "LESS",
            Condition::LessOrEqualTo => "LESS_OR_EQUAL_TO",
            Condition::Greater => "GREATER",
            Condition::GreaterOrEqualTo => "GREATER_OR_EQUAL_TO",
            Condition::Like => "LIKE",
            Condition::Between => "BETWEEN",
            Condition::IsNull => "IS_NULL",
            Condition::IsNotNull => "IS_NOT_NULL",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = ModelError;

    /// Accepts either the wire name (`LESS_OR_EQUAL_TO`) or the operator key (`<=`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Condition::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s) || c.operator_key() == s)
            .ok_or_else(|| ModelError::UnknownCondition(s.to_string()))
    }
}

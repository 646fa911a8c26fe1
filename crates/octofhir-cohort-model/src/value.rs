//! Field values and value constraints

use crate::{Arity, Condition};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Typed operand of a value constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Boolean(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Text substituted into expression templates
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s),
            FieldValue::Integer(i) => Cow::Owned(i.to_string()),
            FieldValue::Decimal(d) => Cow::Owned(d.to_string()),
            FieldValue::Date(d) => Cow::Owned(d.format("%Y-%m-%d").to_string()),
            FieldValue::DateTime(dt) => Cow::Owned(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            FieldValue::Boolean(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

/// Operands of one value constraint, independent of the DTO shape carrying it
pub trait ValueOperands {
    fn condition(&self) -> Condition;

    fn value_text(&self) -> Option<Cow<'_, str>>;

    fn max_value_text(&self) -> Option<Cow<'_, str>>;

    /// Whether the constraint is dropped before compilation.
    ///
    /// Unary conditions need a non-blank value, ranges need both bounds.
    /// Nullary conditions carry no operand and are never empty.
    fn is_empty(&self) -> bool {
        match self.condition().arity() {
            Arity::Nullary => false,
            Arity::Unary => is_blank(self.value_text()),
            Arity::Range => is_blank(self.value_text()) || is_blank(self.max_value_text()),
        }
    }
}

fn is_blank(text: Option<Cow<'_, str>>) -> bool {
    text.is_none_or(|t| t.trim().is_empty())
}

/// One comparison of a field against a value (or a range)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueConstraint {
    pub condition: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    /// Upper bound, only meaningful for `BETWEEN`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<FieldValue>,
}

impl ValueConstraint {
    pub fn new(condition: Condition, value: impl Into<FieldValue>) -> Self {
        Self {
            condition,
            value: Some(value.into()),
            max_value: None,
        }
    }

    pub fn equals(value: impl Into<FieldValue>) -> Self {
        Self::new(Condition::Equals, value)
    }

    pub fn between(min: impl Into<FieldValue>, max: impl Into<FieldValue>) -> Self {
        Self {
            condition: Condition::Between,
            value: Some(min.into()),
            max_value: Some(max.into()),
        }
    }

    /// Constraint for a condition that takes no operand
    pub fn nullary(condition: Condition) -> Self {
        Self {
            condition,
            value: None,
            max_value: None,
        }
    }
}

impl ValueOperands for ValueConstraint {
    fn condition(&self) -> Condition {
        self.condition
    }

    fn value_text(&self) -> Option<Cow<'_, str>> {
        self.value.as_ref().map(FieldValue::to_text)
    }

    fn max_value_text(&self) -> Option<Cow<'_, str>> {
        self.max_value.as_ref().map(FieldValue::to_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_value_text_rendering() {
        assert_eq!(FieldValue::text("female").to_text(), "female");
        assert_eq!(FieldValue::Integer(42).to_text(), "42");
        assert_eq!(FieldValue::Decimal(Decimal::new(455, 1)).to_text(), "45.5");
        assert_eq!(
            FieldValue::Date(NaiveDate::from_ymd_opt(2020, 1, 31).unwrap()).to_text(),
            "2020-01-31"
        );
        assert_eq!(FieldValue::Boolean(true).to_text(), "true");
    }

    #[test]
    fn test_empty_unary() {
        assert!(ValueConstraint::equals("").is_empty());
        assert!(ValueConstraint::equals("   ").is_empty());
        assert!(ValueConstraint::nullary(Condition::Equals).is_empty());
        assert!(!ValueConstraint::equals("x").is_empty());
        assert!(!ValueConstraint::equals(0i64).is_empty());
    }

    #[test]
    fn test_empty_range_needs_both_bounds() {
        assert!(!ValueConstraint::between(1i64, 5i64).is_empty());
        assert!(ValueConstraint::between("", "5").is_empty());
        assert!(ValueConstraint::between("1", " ").is_empty());

        let open = ValueConstraint::new(Condition::Between, 1i64);
        assert!(open.is_empty());
    }

    #[test]
    fn test_nullary_is_never_empty() {
        assert!(!ValueConstraint::nullary(Condition::IsNull).is_empty());
        assert!(!ValueConstraint::nullary(Condition::IsNotNull).is_empty());
    }
}

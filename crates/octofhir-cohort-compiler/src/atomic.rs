//! Atomic expressions: one boolean expression per field
//!
//! Each non-empty value constraint is resolved against its operator template.
//! Conditions without an operand need a template of their own, the `DEFAULT`
//! template never applies to them. Values without a template are skipped; the
//! survivors are or-joined in input order and parenthesized only when there is
//! more than one.

use octofhir_cohort_config::ConfigResolver;
use octofhir_cohort_model::{
    Arity, DataElementId, EntityType, EssentialField, EssentialValue, FieldConstraint,
    ValueConstraint, ValueOperands,
};

/// Resolve and or-join the values of one field
pub fn value_disjunction<V: ValueOperands>(
    resolver: &ConfigResolver,
    id: &DataElementId,
    entity_type: EntityType,
    values: &[V],
) -> Option<String> {
    let mut expressions: Vec<String> = values
        .iter()
        .filter(|value| !value.is_empty())
        .filter_map(|value| {
            let expression = atomic_expression(resolver, id, entity_type, value);
            if expression.trim().is_empty() {
                log::trace!(
                    "Dropping {} value of '{}': no template for {}",
                    value.condition(),
                    id,
                    entity_type
                );
                None
            } else {
                Some(expression)
            }
        })
        .collect();

    match expressions.len() {
        0 => None,
        1 => expressions.pop(),
        _ => Some(format!("({})", expressions.join(" or "))),
    }
}

fn atomic_expression<V: ValueOperands>(
    resolver: &ConfigResolver,
    id: &DataElementId,
    entity_type: EntityType,
    value: &V,
) -> String {
    let condition = value.condition();
    let operator_key = condition.operator_key();

    match condition.arity() {
        Arity::Nullary => resolver.operator_expression(id, entity_type, operator_key),
        Arity::Unary => {
            let text = value.value_text().unwrap_or_default();
            resolver.atomic_expression(id, entity_type, operator_key, text.trim(), "")
        }
        Arity::Range => {
            let min = value.value_text().unwrap_or_default();
            let max = value.max_value_text().unwrap_or_default();
            resolver.atomic_expression(id, entity_type, operator_key, min.trim(), max.trim())
        }
    }
}

/// Atomic expressions for fields of the richer query model
#[derive(Debug, Clone, Copy)]
pub struct AtomicExpressionBuilder<'r> {
    resolver: &'r ConfigResolver,
}

impl<'r> AtomicExpressionBuilder<'r> {
    pub fn new(resolver: &'r ConfigResolver) -> Self {
        Self { resolver }
    }

    pub fn create(&self, id: &DataElementId, entity_type: EntityType, field: &FieldConstraint) -> Option<String> {
        self.create_from_values(id, entity_type, &field.values)
    }

    pub fn create_from_values(
        &self,
        id: &DataElementId,
        entity_type: EntityType,
        values: &[ValueConstraint],
    ) -> Option<String> {
        value_disjunction(self.resolver, id, entity_type, values)
    }
}

/// Atomic expressions for fields of the essential DTO
#[derive(Debug, Clone, Copy)]
pub struct ValuesExpressionFactory<'r> {
    resolver: &'r ConfigResolver,
}

impl<'r> ValuesExpressionFactory<'r> {
    pub fn new(resolver: &'r ConfigResolver) -> Self {
        Self { resolver }
    }

    pub fn create(&self, id: &DataElementId, entity_type: EntityType, field: &EssentialField) -> Option<String> {
        self.create_from_values(id, entity_type, &field.values)
    }

    pub fn create_from_values(
        &self,
        id: &DataElementId,
        entity_type: EntityType,
        values: &[EssentialValue],
    ) -> Option<String> {
        value_disjunction(self.resolver, id, entity_type, values)
    }
}

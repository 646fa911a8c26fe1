//! Model error types

use thiserror::Error;

/// Errors raised when parsing model literals from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Unknown entity type: '{0}'. Expected Patient or Specimen")]
    UnknownEntityType(String),

    #[error("Unknown entity group: '{0}'. Expected donor, sample or event")]
    UnknownEntityGroup(String),

    #[error("Unknown condition: '{0}'")]
    UnknownCondition(String),
}

use alloc::string::String;
use alloc::vec::Vec;

use thiserror::Error;
use vc_schema::ValidationError;

// -----------------------------------------------------------------------------
// RegisterError

/// A class declaration that cannot be registered.
///
/// These are programming errors: they depend on the declaration only,
/// never on the data being converted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegisterError {
    #[error("field `{field}` of class `{class}` is static, only instance fields can be serialized")]
    StaticFieldUnsupported { class: &'static str, field: String },

    #[error("field `{field}` is declared twice on class `{class}`")]
    DuplicateField { class: &'static str, field: String },

    #[error("field `{field}` of class `{class}` references the unregistered class `{referenced}`")]
    UnregisteredClass {
        class: &'static str,
        field: String,
        referenced: &'static str,
    },

    #[error("cyclic class references: {}", .chain.join(" -> "))]
    CyclicClass { chain: Vec<&'static str> },
}

// -----------------------------------------------------------------------------
// SerialError

/// A failed conversion between an object and its plain record.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SerialError {
    #[error("class `{class}` is not registered as serializable")]
    NotSerializable { class: &'static str },

    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),

    #[error("the schema of class `{class}` did not produce an instance of it")]
    Materialize { class: &'static str },
}

impl SerialError {
    /// The validation error, if this is [`SerialError::ValidationFailed`].
    #[inline]
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::ValidationFailed(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    #[test]
    fn cyclic_chain_display() {
        let error = RegisterError::CyclicClass {
            chain: vec!["Person", "Address", "Person"],
        };
        assert_eq!(
            error.to_string(),
            "cyclic class references: Person -> Address -> Person"
        );
    }

    #[test]
    fn validation_is_transparent() {
        let error = vc_schema::string().parse(vc_schema::Value::from(1)).unwrap_err();
        let message = error.to_string();
        let error = SerialError::from(error);
        assert_eq!(error.to_string(), message);
        assert!(error.validation().is_some());
    }
}

use serde::Serialize;
use thiserror::Error;

use crate::schema::FieldType;

/// A single violated constraint on a candidate record.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("field `{field}` expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        found: String,
    },

    #[error("{fields:?} = {key} does not reference any loaded {entity}")]
    DanglingReference {
        fields: Vec<String>,
        entity: String,
        key: String,
    },

    #[error("field `{field}` value `{value}` is not one of the allowed values")]
    EnumViolation { field: String, value: String },

    #[error("field `{field}` is not declared for this entity")]
    UnknownField { field: String },

    #[error("key {key} is already loaded with different contents")]
    ConflictingKey { key: String },

    #[error("check `{check}` failed: {detail}")]
    Constraint { check: String, detail: String },

    #[error("field `{field}` value {value} outside [{min}, {max}]")]
    OutOfBounds {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl Violation {
    /// Field the violation is attached to, if it concerns a single field.
    pub fn field(&self) -> Option<&str> {
        match self {
            Violation::MissingField { field }
            | Violation::TypeMismatch { field, .. }
            | Violation::EnumViolation { field, .. }
            | Violation::UnknownField { field }
            | Violation::OutOfBounds { field, .. } => Some(field),
            Violation::DanglingReference { fields, .. } => fields.first().map(String::as_str),
            Violation::ConflictingKey { .. } | Violation::Constraint { .. } => None,
        }
    }

    pub fn is_dangling_reference(&self) -> bool {
        matches!(self, Violation::DanglingReference { .. })
    }

    pub fn is_enum_violation(&self) -> bool {
        matches!(self, Violation::EnumViolation { .. })
    }
}

/// Every constraint a record violated, collected in one pass.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{entity} record rejected with {} violation(s): {}", .violations.len(), summarize(.violations))]
pub struct ValidationError {
    pub entity: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(entity: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            entity: entity.into(),
            violations,
        }
    }

    /// True if any violation concerns `field`.
    pub fn names_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| match v {
            Violation::DanglingReference { fields, .. } => fields.iter().any(|f| f == field),
            other => other.field() == Some(field),
        })
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("entity `{name}` is already registered")]
    DuplicateEntity { name: String },

    #[error("entity `{name}` is not registered")]
    UnknownEntity { name: String },

    #[error("invalid schema for `{entity}`: {reason}")]
    InvalidSchema { entity: String, reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("position tuple needs at least two elements, got {len}")]
    UnknownPosition { len: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("stored {entity} record does not decode: {source}")]
    Decode {
        entity: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SchemaError {
    /// Violations carried by a validation failure, empty for every other kind.
    pub fn violations(&self) -> &[Violation] {
        match self {
            SchemaError::Validation(err) => &err.violations,
            _ => &[],
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;

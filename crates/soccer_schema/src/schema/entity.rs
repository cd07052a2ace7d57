use serde::{Deserialize, Serialize};

use super::field::FieldSpec;

/// Fields of one entity pointing at the primary key of another.
///
/// `fields` map positionally onto the target's primary key columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub fields: Vec<String>,
    pub entity: String,
    /// Values that stand for "no entity" and skip the lookup (single-field keys only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exempt_values: Vec<String>,
}

impl ForeignKey {
    pub fn new(field: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            fields: vec![field.into()],
            entity: entity.into(),
            exempt_values: Vec::new(),
        }
    }

    pub fn composite<S: AsRef<str>>(fields: &[S], entity: impl Into<String>) -> Self {
        Self {
            fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
            entity: entity.into(),
            exempt_values: Vec::new(),
        }
    }

    pub fn exempt(mut self, value: impl Into<String>) -> Self {
        self.exempt_values.push(value.into());
        self
    }
}

/// Record-level constraints spanning several fields or entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum RowCheck {
    /// Two fields of the same record must differ.
    Distinct { left: String, right: String },
    /// `field` must equal one of `candidates` on the record reached through
    /// the foreign key that targets `via`.
    OneOfReferenced {
        field: String,
        via: String,
        candidates: Vec<String>,
    },
}

impl RowCheck {
    pub fn name(&self) -> String {
        match self {
            RowCheck::Distinct { left, right } => format!("{left} <> {right}"),
            RowCheck::OneOfReferenced {
                field,
                via,
                candidates,
            } => format!("{field} in {via}.{{{}}}", candidates.join(", ")),
        }
    }
}

/// Canonical definition of an entity: columns, keys and constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub name: String,
    /// Relational table the validated records are destined for
    pub table: String,
    pub fields: Vec<FieldSpec>,
    pub primary_key: Vec<String>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    #[serde(default)]
    pub checks: Vec<RowCheck>,
}

impl EntitySpec {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            fields: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
            checks: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn key<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        self.primary_key = fields.iter().map(|f| f.as_ref().to_string()).collect();
        self
    }

    pub fn references(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    pub fn check(mut self, check: RowCheck) -> Self {
        self.checks.push(check);
        self
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_spec(name).is_some()
    }

    /// Foreign key whose target entity is `entity`.
    pub fn foreign_key_to(&self, entity: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| fk.entity == entity)
    }

    /// Structural problems that make the spec unusable on its own.
    ///
    /// Cross-entity problems (unknown FK targets) are checked by the registry.
    pub fn structural_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.primary_key.is_empty() {
            errors.push("primary key is empty".to_string());
        }

        let mut seen = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            if seen.contains(&field.name.as_str()) {
                errors.push(format!("field `{}` declared twice", field.name));
            }
            seen.push(field.name.as_str());
        }

        for key_field in &self.primary_key {
            match self.field_spec(key_field) {
                None => errors.push(format!("primary key field `{key_field}` is not declared")),
                Some(spec) if !spec.required => {
                    errors.push(format!("primary key field `{key_field}` must be required"))
                }
                Some(_) => {}
            }
        }

        for fk in &self.foreign_keys {
            for field in &fk.fields {
                if !self.has_field(field) {
                    errors.push(format!(
                        "foreign key field `{field}` -> {} is not declared",
                        fk.entity
                    ));
                }
            }
            if !fk.exempt_values.is_empty() && fk.fields.len() != 1 {
                errors.push(format!(
                    "exempt values on composite foreign key -> {}",
                    fk.entity
                ));
            }
        }

        for check in &self.checks {
            match check {
                RowCheck::Distinct { left, right } => {
                    for f in [left, right] {
                        if !self.has_field(f) {
                            errors.push(format!("check field `{f}` is not declared"));
                        }
                    }
                }
                RowCheck::OneOfReferenced { field, via, .. } => {
                    if !self.has_field(field) {
                        errors.push(format!("check field `{field}` is not declared"));
                    }
                    if self.foreign_key_to(via).is_none() {
                        errors.push(format!("check `{}` has no foreign key to {via}", check.name()));
                    }
                }
            }
        }

        errors
    }
}

//! Schema registry and record validator.
//!
//! The registry owns the entity definitions and the index of accepted
//! records. `validate` is read-only; `load`/`load_batch` validate and then
//! append to the index, so later records can reference earlier ones.

pub mod index;
pub mod report;

#[cfg(test)]
mod tests;

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, info};

pub use index::{EntityTable, Key, KeyIndex, KeyPart, Record};
pub use report::{BatchReport, MatchBatch, RejectedRecord};

use crate::config::ValidatorConfig;
use crate::dataset::Dataset;
use crate::error::{Result, SchemaError, ValidationError, Violation};
use crate::schema::field::{describe_value, Axis};
use crate::schema::{soccer_catalog, EntitySpec, RowCheck};

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    config: ValidatorConfig,
    entities: Vec<EntitySpec>,
    by_name: FxHashMap<String, usize>,
    index: KeyIndex,
}

impl SchemaRegistry {
    /// Empty registry; entities must be registered before use.
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Registry with the ten canonical soccer entities.
    pub fn with_catalog(config: ValidatorConfig) -> Result<Self> {
        config.validate()?;
        let catalog = soccer_catalog(&config);
        let mut registry = Self::new(config);
        for spec in catalog {
            registry.register_entity(spec)?;
        }
        Ok(registry)
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn register_entity(&mut self, spec: EntitySpec) -> Result<()> {
        if self.by_name.contains_key(&spec.name) {
            return Err(SchemaError::DuplicateEntity { name: spec.name });
        }

        let mut problems = spec.structural_errors();
        for fk in &spec.foreign_keys {
            match self.entity(&fk.entity) {
                None => problems.push(format!(
                    "foreign key {:?} references unregistered entity {}",
                    fk.fields, fk.entity
                )),
                Some(target) if target.primary_key.len() != fk.fields.len() => {
                    problems.push(format!(
                        "foreign key {:?} has {} field(s) but {} has a {}-part key",
                        fk.fields,
                        fk.fields.len(),
                        target.name,
                        target.primary_key.len()
                    ))
                }
                Some(_) => {}
            }
        }

        if !problems.is_empty() {
            return Err(SchemaError::InvalidSchema {
                entity: spec.name,
                reason: problems.join("; "),
            });
        }

        debug!(
            "registered entity {} ({} fields, {} foreign keys)",
            spec.name,
            spec.fields.len(),
            spec.foreign_keys.len()
        );
        self.by_name.insert(spec.name.clone(), self.entities.len());
        self.entities.push(spec);
        Ok(())
    }

    pub fn entity(&self, name: &str) -> Option<&EntitySpec> {
        self.by_name.get(name).map(|&i| &self.entities[i])
    }

    /// Registered entities in registration (dependency) order.
    pub fn entities(&self) -> &[EntitySpec] {
        &self.entities
    }

    /// The registered catalog as JSON, one object per entity.
    pub fn describe(&self) -> serde_json::Result<Value> {
        serde_json::to_value(&self.entities)
    }

    fn require_entity(&self, name: &str) -> Result<&EntitySpec> {
        self.entity(name).ok_or_else(|| SchemaError::UnknownEntity {
            name: name.to_string(),
        })
    }

    pub fn index(&self) -> &KeyIndex {
        &self.index
    }

    pub fn records(&self, entity: &str) -> &[Record] {
        self.index.records(entity)
    }

    pub fn get(&self, entity: &str, key: &Key) -> Option<&Record> {
        self.index.get(entity, key)
    }

    /// Typed view over the accepted records.
    pub fn dataset(&self) -> Dataset<'_> {
        Dataset::new(self)
    }

    /// Checks `record` against `entity_name` and the records loaded so far.
    ///
    /// Returns the record unchanged, or every violated constraint at once.
    pub fn validate(&self, entity_name: &str, record: Record) -> Result<Record> {
        let spec = self.require_entity(entity_name)?;
        let violations = self.check_record(spec, &record);
        if violations.is_empty() {
            Ok(record)
        } else {
            Err(ValidationError::new(entity_name, violations).into())
        }
    }

    /// Validates and appends to the index. Loading an identical record twice is a no-op.
    pub fn load(&mut self, entity_name: &str, record: Record) -> Result<Key> {
        let record = self.validate(entity_name, record)?;
        let spec = self.require_entity(entity_name)?;
        let key = Key::from_record(spec, spec.primary_key.as_slice(), &record).ok_or_else(|| {
            SchemaError::InvalidSchema {
                entity: entity_name.to_string(),
                reason: "validated record has no readable primary key".to_string(),
            }
        })?;

        self.index.insert(entity_name, key.clone(), record);
        Ok(key)
    }

    /// Loads each record independently; failures are reported, never fatal.
    ///
    /// Only an unknown entity name aborts the batch.
    pub fn load_batch<I>(&mut self, entity_name: &str, records: I) -> Result<BatchReport>
    where
        I: IntoIterator<Item = Record>,
    {
        self.require_entity(entity_name)?;
        let mut report = BatchReport::new(entity_name);

        for (row, record) in records.into_iter().enumerate() {
            match self.load(entity_name, record) {
                Ok(_) => report.accepted += 1,
                Err(SchemaError::Validation(error)) => {
                    debug!("{} row {} rejected: {}", entity_name, row, error);
                    report.rejected.push(RejectedRecord { row, error });
                }
                Err(other) => return Err(other),
            }
        }

        info!(
            "{}: {} accepted, {} rejected",
            entity_name,
            report.accepted,
            report.rejected.len()
        );
        Ok(report)
    }

    /// Loads a per-match batch entity by entity, in registration order.
    pub fn load_match_file(&mut self, mut batch: MatchBatch) -> Result<Vec<BatchReport>> {
        if let Some(unknown) = batch.entities.keys().find(|name| self.entity(name).is_none()) {
            return Err(SchemaError::UnknownEntity {
                name: unknown.clone(),
            });
        }

        let order: Vec<String> = self.entities.iter().map(|e| e.name.clone()).collect();
        let mut reports = Vec::new();
        for name in order {
            if let Some(records) = batch.entities.remove(&name) {
                reports.push(self.load_batch(&name, records)?);
            }
        }
        Ok(reports)
    }

    fn check_record(&self, spec: &EntitySpec, record: &Record) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_fields(spec, record, &mut violations);
        self.check_foreign_keys(spec, record, &mut violations);
        self.check_rows(spec, record, &mut violations);
        self.check_primary_key(spec, record, &mut violations);
        violations
    }

    fn check_fields(&self, spec: &EntitySpec, record: &Record, out: &mut Vec<Violation>) {
        for field in &spec.fields {
            let value = match record.get(&field.name) {
                Some(v) if !v.is_null() => v,
                _ => {
                    if field.required {
                        out.push(Violation::MissingField {
                            field: field.name.clone(),
                        });
                    }
                    continue;
                }
            };

            if !field.field_type.accepts(value) {
                out.push(Violation::TypeMismatch {
                    field: field.name.clone(),
                    expected: field.field_type,
                    found: describe_value(value),
                });
                continue;
            }

            if let Some(text) = value.as_str() {
                if !field.allows(text) {
                    out.push(Violation::EnumViolation {
                        field: field.name.clone(),
                        value: text.to_string(),
                    });
                }
            }

            if let (Some(axis), Some(bounds), Some(v)) =
                (field.axis, &self.config.pitch_bounds, value.as_f64())
            {
                let (min, max) = match axis {
                    Axis::X => (bounds.x_min, bounds.x_max),
                    Axis::Y => (bounds.y_min, bounds.y_max),
                };
                if v < min || v > max {
                    out.push(Violation::OutOfBounds {
                        field: field.name.clone(),
                        value: v,
                        min,
                        max,
                    });
                }
            }
        }

        if self.config.reject_unknown_fields {
            for name in record.keys() {
                if !spec.has_field(name) {
                    out.push(Violation::UnknownField {
                        field: name.clone(),
                    });
                }
            }
        }
    }

    fn check_foreign_keys(&self, spec: &EntitySpec, record: &Record, out: &mut Vec<Violation>) {
        for fk in &spec.foreign_keys {
            if let [field] = fk.fields.as_slice() {
                if let Some(Value::String(s)) = record.get(field) {
                    if fk.exempt_values.iter().any(|e| e == s) {
                        continue;
                    }
                }
            }

            // Partially null or mistyped keys are skipped; field checks report those.
            let Some(key) = Key::from_record(spec, fk.fields.as_slice(), record) else {
                continue;
            };

            if !self.index.contains(&fk.entity, &key) {
                out.push(Violation::DanglingReference {
                    fields: fk.fields.clone(),
                    entity: fk.entity.clone(),
                    key: key.to_string(),
                });
            }
        }
    }

    fn check_rows(&self, spec: &EntitySpec, record: &Record, out: &mut Vec<Violation>) {
        for check in &spec.checks {
            match check {
                RowCheck::Distinct { left, right } => {
                    let l = record.get(left).filter(|v| !v.is_null());
                    let r = record.get(right).filter(|v| !v.is_null());
                    if let (Some(l), Some(r)) = (l, r) {
                        if l == r {
                            out.push(Violation::Constraint {
                                check: check.name(),
                                detail: format!("{left} and {right} are both {l}"),
                            });
                        }
                    }
                }
                RowCheck::OneOfReferenced {
                    field,
                    via,
                    candidates,
                } => {
                    let Some(value) = record.get(field).filter(|v| !v.is_null()) else {
                        continue;
                    };
                    let Some(fk) = spec.foreign_key_to(via) else {
                        continue;
                    };
                    let Some(key) = Key::from_record(spec, fk.fields.as_slice(), record) else {
                        continue;
                    };
                    // A missing target is already reported as a dangling reference.
                    let Some(target) = self.index.get(via, &key) else {
                        continue;
                    };

                    if !candidates.iter().any(|c| target.get(c) == Some(value)) {
                        out.push(Violation::Constraint {
                            check: check.name(),
                            detail: format!(
                                "{field} {value} is not one of {} on {via} {key}",
                                candidates.join("/")
                            ),
                        });
                    }
                }
            }
        }
    }

    fn check_primary_key(&self, spec: &EntitySpec, record: &Record, out: &mut Vec<Violation>) {
        let Some(key) = Key::from_record(spec, spec.primary_key.as_slice(), record) else {
            return;
        };
        if let Some(existing) = self.index.get(&spec.name, &key) {
            if existing != record {
                out.push(Violation::ConflictingKey {
                    key: key.to_string(),
                });
            }
        }
    }
}

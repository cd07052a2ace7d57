//! In-memory key index of accepted records.
//!
//! Foreign keys are resolved against this index instead of a database's own
//! constraint engine, so validation can run before anything is persisted.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::field::{parse_date, parse_duration_value};
use crate::schema::{EntitySpec, FieldType};

/// A parsed record: column name to JSON value.
pub type Record = serde_json::Map<String, Value>;

/// One component of a key. Durations are normalized to milliseconds and
/// dates to `YYYY-MM-DD` so equal values hash equally whatever their encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyPart {
    Int(i64),
    Text(String),
}

impl KeyPart {
    pub fn from_value(field_type: FieldType, value: &Value) -> Option<Self> {
        match field_type {
            FieldType::Integer => value.as_i64().map(KeyPart::Int),
            FieldType::Text => value.as_str().map(|s| KeyPart::Text(s.to_string())),
            FieldType::Duration => parse_duration_value(value).map(KeyPart::Int),
            FieldType::Date => value
                .as_str()
                .and_then(parse_date)
                .map(|d| KeyPart::Text(d.format("%Y-%m-%d").to_string())),
            FieldType::Boolean => value.as_bool().map(|b| KeyPart::Int(b as i64)),
            // Floats never take part in keys
            FieldType::Float => None,
        }
    }
}

impl From<&str> for KeyPart {
    fn from(s: &str) -> Self {
        KeyPart::Text(s.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(s: String) -> Self {
        KeyPart::Text(s)
    }
}

impl From<i64> for KeyPart {
    fn from(n: i64) -> Self {
        KeyPart::Int(n)
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Int(n) => write!(f, "{}", n),
            KeyPart::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Primary (or foreign) key value, one part per key column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key(pub Vec<KeyPart>);

impl Key {
    pub fn single(part: impl Into<KeyPart>) -> Self {
        Key(vec![part.into()])
    }

    /// Reads `fields` from `record`, typing each part with the spec's field type.
    ///
    /// `None` if any part is absent, null, or not readable as its type.
    pub fn from_record<S: AsRef<str>>(spec: &EntitySpec, fields: &[S], record: &Record) -> Option<Self> {
        fields
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let field_type = spec.field_spec(name)?.field_type;
                let value = record.get(name).filter(|v| !v.is_null())?;
                KeyPart::from_value(field_type, value)
            })
            .collect::<Option<Vec<_>>>()
            .map(Key)
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [single] => write!(f, "{}", single),
            parts => {
                f.write_str("(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", part)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Accepted records of one entity, in load order.
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    positions: FxHashMap<Key, usize>,
    records: Vec<Record>,
}

impl EntityTable {
    pub fn get(&self, key: &Key) -> Option<&Record> {
        self.positions.get(key).map(|&i| &self.records[i])
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.positions.contains_key(key)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns false (and keeps the stored record) if the key is already present.
    fn insert(&mut self, key: Key, record: Record) -> bool {
        if self.positions.contains_key(&key) {
            return false;
        }
        self.positions.insert(key, self.records.len());
        self.records.push(record);
        true
    }
}

/// Accepted records of every entity, keyed by primary key.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    tables: FxHashMap<String, EntityTable>,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, entity: &str) -> Option<&EntityTable> {
        self.tables.get(entity)
    }

    pub fn get(&self, entity: &str, key: &Key) -> Option<&Record> {
        self.tables.get(entity).and_then(|t| t.get(key))
    }

    pub fn contains(&self, entity: &str, key: &Key) -> bool {
        self.tables.get(entity).is_some_and(|t| t.contains(key))
    }

    pub fn records(&self, entity: &str) -> &[Record] {
        self.tables.get(entity).map(EntityTable::records).unwrap_or(&[])
    }

    pub fn insert(&mut self, entity: &str, key: Key, record: Record) -> bool {
        self.tables
            .entry(entity.to_string())
            .or_default()
            .insert(key, record)
    }

    pub fn len(&self, entity: &str) -> usize {
        self.tables.get(entity).map_or(0, EntityTable::len)
    }

    pub fn total_len(&self) -> usize {
        self.tables.values().map(EntityTable::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Owned copy of every table, ordered by entity name.
    pub fn to_tables(&self) -> BTreeMap<String, Vec<Record>> {
        self.tables
            .iter()
            .filter(|(_, t)| !t.is_empty())
            .map(|(name, t)| (name.clone(), t.records().to_vec()))
            .collect()
    }
}

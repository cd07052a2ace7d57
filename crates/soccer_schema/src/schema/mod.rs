//! Entity definitions: field specs, keys, foreign keys and the canonical catalog.

pub mod catalog;
pub mod entity;
pub mod field;

pub use catalog::{default_catalog, soccer_catalog};
pub use entity::{EntitySpec, ForeignKey, RowCheck};
pub use field::{Axis, FieldSpec, FieldType};

//! # soccer_schema - Schema Registry & Validator for Soccer Data
//!
//! Declares the canonical soccer data model (teams, matches, players,
//! tracking samples, events, qualifiers, SPADL actions, positions) and
//! validates candidate records against it before they are persisted.
//!
//! ## Features
//! - Field type, enumeration and required-field checks
//! - Foreign keys resolved against an in-memory index of accepted records
//! - Every violation of a record reported at once
//! - Per-record isolation when loading batches
//! - Typed read access to accepted records

// Builders and accessors are public API even where the crate itself doesn't call them
#![allow(dead_code)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod position;
pub mod registry;
pub mod schema;
pub mod spadl;

pub use config::{PitchBounds, ValidatorConfig};
pub use dataset::Dataset;
pub use error::{ConfigError, Result, SchemaError, ValidationError, Violation};
pub use models::Entity;
pub use position::{resolve_position, PositionType};
pub use registry::{BatchReport, Key, MatchBatch, Record, SchemaRegistry};
pub use schema::{EntitySpec, FieldSpec, FieldType};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the entity catalog; bumped when a field or key changes.
pub const SCHEMA_VERSION: u32 = 1;

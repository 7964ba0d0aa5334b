//! Core model and pure helpers for pgmodel.
//!
//! This crate defines the entity model handed to renderers together with the
//! type mapper, identifier normalisation and name-collision bookkeeping used
//! to build it. It performs no I/O.

pub mod entity;
pub mod error;
pub mod graph;
pub mod name_index;
pub mod naming;
pub mod search;
pub mod types;
pub mod validation;

pub use entity::{BackReference, Column, Entity, Relation, RelationKind, TableRef};
pub use error::{Error, Result};
pub use graph::{TableSet, compare_tables, sort_tables};
pub use name_index::NameIndex;
pub use search::{FilterKind, SearchField, search_fields};
pub use types::{
    BaseType, NullStyle, NullWrapper, Nullability, ResolvedType, TypeDescriptor, TypeRequest,
    resolve_type,
};
pub use validation::{Check, FieldRule, validate_entities, validate_entity, validation_rules};

/// Schema whose tables sort first and whose entity names carry no prefix.
pub const PUBLIC_SCHEMA: &str = "public";

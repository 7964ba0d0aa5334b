//! Catalog metadata providers and the schema resolver.

pub mod mapper;
pub mod memory;
pub mod options;
pub mod pattern;
pub mod postgres;
pub mod provider;
pub mod resolver;

pub use memory::{InMemoryProvider, MetadataSnapshot};
pub use options::{DEFAULT_PATTERN, ResolveOptions};
pub use pattern::{TablePattern, TableSelection};
pub use postgres::{PostgresProvider, resolve_postgres};
pub use provider::{ColumnRow, MetadataProvider, RelationRow};
pub use resolver::{PHASE_COLUMNS, PHASE_RELATIONS, PHASE_TABLES, resolve};

pub use pgmodel_core::Entity;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pgmodel_core::{Result, TableRef};

use crate::pattern::TableSelection;

/// A foreign-key constraint as reported by the catalog.
///
/// Source and target columns are position-aligned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRow {
    pub source_schema: String,
    pub source_table: String,
    pub source_columns: Vec<String>,
    pub target_schema: String,
    pub target_table: String,
    pub target_columns: Vec<String>,
}

impl RelationRow {
    pub fn source(&self) -> TableRef {
        TableRef::new(&self.source_schema, &self.source_table)
    }

    pub fn target(&self) -> TableRef {
        TableRef::new(&self.target_schema, &self.target_table)
    }
}

/// One column of a table, joined with its key flags and enum labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRow {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub source_type: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub dimensions: u32,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
    #[serde(default)]
    pub max_length: u32,
    #[serde(default)]
    pub enum_values: Vec<String>,
}

impl ColumnRow {
    pub fn table_ref(&self) -> TableRef {
        TableRef::new(&self.schema, &self.table)
    }
}

/// Source of catalog metadata consumed by the resolver.
///
/// Each call covers every requested table at once.
#[async_trait]
pub trait MetadataProvider {
    /// Returns the engine identifier (e.g. `postgres`).
    fn engine(&self) -> &'static str;

    /// Tables matching the wildcard schemas or exact tables of `selection`.
    async fn list_tables(&self, selection: &TableSelection) -> Result<Vec<TableRef>>;

    /// Foreign keys whose source table is one of `tables`.
    async fn list_relations(&self, tables: &[TableRef]) -> Result<Vec<RelationRow>>;

    /// Columns of `tables`, in catalog order within each table.
    async fn list_columns(&self, tables: &[TableRef]) -> Result<Vec<ColumnRow>>;
}

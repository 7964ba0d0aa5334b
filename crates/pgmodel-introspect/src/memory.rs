use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pgmodel_core::{Result, TableRef};

use crate::pattern::TableSelection;
use crate::provider::{ColumnRow, MetadataProvider, RelationRow};

/// Catalog metadata captured ahead of time, e.g. loaded from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    #[serde(default)]
    pub tables: Vec<TableRef>,
    #[serde(default)]
    pub relations: Vec<RelationRow>,
    #[serde(default)]
    pub columns: Vec<ColumnRow>,
}

/// Metadata provider answering from a [`MetadataSnapshot`].
///
/// Filtering mirrors the database provider: tables come back ordered by
/// schema and name, relations and columns keep snapshot order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    snapshot: MetadataSnapshot,
}

impl InMemoryProvider {
    pub fn new(snapshot: MetadataSnapshot) -> Self {
        Self { snapshot }
    }
}

fn key_set(tables: &[TableRef]) -> BTreeSet<String> {
    tables.iter().map(TableRef::key).collect()
}

#[async_trait]
impl MetadataProvider for InMemoryProvider {
    fn engine(&self) -> &'static str {
        "memory"
    }

    async fn list_tables(&self, selection: &TableSelection) -> Result<Vec<TableRef>> {
        let mut tables: Vec<TableRef> = self
            .snapshot
            .tables
            .iter()
            .filter(|table| selection.matches(table))
            .cloned()
            .collect();
        tables.sort();
        tables.dedup();
        Ok(tables)
    }

    async fn list_relations(&self, tables: &[TableRef]) -> Result<Vec<RelationRow>> {
        let keys = key_set(tables);
        Ok(self
            .snapshot
            .relations
            .iter()
            .filter(|relation| keys.contains(&relation.source().key()))
            .cloned()
            .collect())
    }

    async fn list_columns(&self, tables: &[TableRef]) -> Result<Vec<ColumnRow>> {
        let keys = key_set(tables);
        Ok(self
            .snapshot
            .columns
            .iter()
            .filter(|column| keys.contains(&column.table_ref().key()))
            .cloned()
            .collect())
    }
}

use sqlx::PgPool;

use pgmodel_core::{Entity, Result, TableRef};

use crate::options::ResolveOptions;
use crate::pattern::TableSelection;
use crate::provider::{ColumnRow, MetadataProvider, RelationRow};

mod mapper;
mod queries;

/// Metadata provider backed by the PostgreSQL system catalog.
#[derive(Debug, Clone)]
pub struct PostgresProvider {
    pool: PgPool,
}

impl PostgresProvider {
    /// Create a new provider using a pre-configured pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn table_keys(tables: &[TableRef]) -> Vec<String> {
    tables.iter().map(TableRef::key).collect()
}

#[async_trait::async_trait]
impl MetadataProvider for PostgresProvider {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn list_tables(&self, selection: &TableSelection) -> Result<Vec<TableRef>> {
        let raw = queries::list_tables(&self.pool, &selection.schemas, &selection.table_keys())
            .await?;
        Ok(mapper::map_tables(raw))
    }

    async fn list_relations(&self, tables: &[TableRef]) -> Result<Vec<RelationRow>> {
        let raw = queries::list_relations(&self.pool, &table_keys(tables)).await?;
        Ok(mapper::map_relations(raw))
    }

    async fn list_columns(&self, tables: &[TableRef]) -> Result<Vec<ColumnRow>> {
        let raw = queries::list_columns(&self.pool, &table_keys(tables)).await?;
        Ok(mapper::map_columns(raw))
    }
}

/// Resolve entities from Postgres with caller-provided options.
pub async fn resolve_postgres(pool: &PgPool, opts: &ResolveOptions) -> Result<Vec<Entity>> {
    let provider = PostgresProvider::new(pool.clone());
    crate::resolver::resolve(&provider, opts).await
}

use std::collections::HashMap;

use pgmodel_core::naming::qualified_entity_name;
use pgmodel_core::{Entity, Error, NameIndex, Result, TableRef, TableSet, validate_entities};

use crate::mapper::{map_back_reference, map_column, map_relation};
use crate::options::ResolveOptions;
use crate::pattern::TableSelection;
use crate::provider::{MetadataProvider, RelationRow};

pub const PHASE_TABLES: &str = "getting tables info";
pub const PHASE_RELATIONS: &str = "getting relations info";
pub const PHASE_COLUMNS: &str = "getting columns info";

/// Resolve the requested tables into entities, ordered for rendering.
///
/// Provider calls are issued strictly in sequence: tables, relations (one
/// call per foreign-key expansion pass), columns. Any provider failure
/// aborts the run, wrapped with the phase it happened in.
pub async fn resolve<P>(provider: &P, opts: &ResolveOptions) -> Result<Vec<Entity>>
where
    P: MetadataProvider + ?Sized,
{
    let selection = TableSelection::from_patterns(&opts.patterns)?;

    let requested = provider
        .list_tables(&selection)
        .await
        .map_err(|err| Error::in_phase(PHASE_TABLES, err))?;
    if requested.is_empty() {
        return Err(Error::NoTablesFound);
    }
    tracing::info!(
        event = "tables_resolved",
        engine = provider.engine(),
        tables = requested.len()
    );

    let mut set: TableSet = requested.into_iter().collect();
    let mut relations = fetch_relations(provider, set.tables()).await?;

    if opts.follow_foreign_keys {
        let mut frontier = set.extend_along(edges(&relations));
        while !frontier.is_empty() {
            tracing::debug!(event = "foreign_keys_followed", added = frontier.len());
            let discovered = fetch_relations(provider, &frontier).await?;
            frontier = set.extend_along(edges(&discovered));
            relations.extend(discovered);
        }
    }

    let tables = set.into_sorted();

    let columns = provider
        .list_columns(&tables)
        .await
        .map_err(|err| Error::in_phase(PHASE_COLUMNS, err))?;

    let mut entity_names = NameIndex::new();
    let mut entities: Vec<Entity> = tables
        .iter()
        .map(|table| {
            let name = entity_names.claim(&qualified_entity_name(&table.schema, &table.name));
            Entity::new(table.clone(), name)
        })
        .collect();
    let index: HashMap<String, usize> = tables
        .iter()
        .enumerate()
        .map(|(position, table)| (table.key(), position))
        .collect();

    for row in &columns {
        let Some(&position) = index.get(&row.table_ref().key()) else {
            tracing::debug!(event = "column_skipped", table = %row.table_ref(), column = %row.name);
            continue;
        };

        let column = map_column(row, opts.null_style)?;
        if column.resolved_type.is_opaque() {
            tracing::warn!(
                event = "opaque_column_type",
                table = %row.table_ref(),
                column = %row.name,
                source_type = %row.source_type
            );
        }
        entities[position].add_column(column);
    }

    for row in &relations {
        let Some(&source) = index.get(&row.source().key()) else {
            tracing::debug!(event = "relation_skipped", table = %row.source());
            continue;
        };

        let target_entity = match index.get(&row.target().key()) {
            Some(&target) => entities[target].generated_name().to_string(),
            None => qualified_entity_name(&row.target_schema, &row.target_table),
        };

        let relation = map_relation(row, &target_entity);
        if relation.is_multi_column() {
            tracing::warn!(
                event = "multi_column_relation",
                table = %row.source(),
                target = %row.target(),
                columns = %row.source_columns.join(",")
            );
        }
        entities[source].add_relation(relation);
    }

    for row in &relations {
        let (Some(&source), Some(&target)) = (
            index.get(&row.source().key()),
            index.get(&row.target().key()),
        ) else {
            continue;
        };

        let source_entity = entities[source].generated_name().to_string();
        entities[target].add_back_reference(map_back_reference(row, &source_entity));
    }

    validate_entities(&entities)?;
    tracing::info!(event = "entities_assembled", entities = entities.len());

    Ok(entities)
}

async fn fetch_relations<P>(provider: &P, tables: &[TableRef]) -> Result<Vec<RelationRow>>
where
    P: MetadataProvider + ?Sized,
{
    provider
        .list_relations(tables)
        .await
        .map_err(|err| Error::in_phase(PHASE_RELATIONS, err))
}

fn edges(relations: &[RelationRow]) -> impl Iterator<Item = (TableRef, TableRef)> + '_ {
    relations
        .iter()
        .map(|relation| (relation.source(), relation.target()))
}

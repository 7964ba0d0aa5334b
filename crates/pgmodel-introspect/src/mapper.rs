use pgmodel_core::{BackReference, Column, NullStyle, Relation, Result, TypeRequest, resolve_type};

use crate::provider::{ColumnRow, RelationRow};

/// Resolve a column row's target type and build the model column.
pub fn map_column(row: &ColumnRow, style: NullStyle) -> Result<Column> {
    let request = TypeRequest {
        source_type: &row.source_type,
        nullable: row.nullable,
        is_array: row.is_array,
        dimensions: row.dimensions,
        is_enum: !row.enum_values.is_empty(),
    };
    let resolved = resolve_type(&request, style)?;

    Ok(Column {
        is_array: row.is_array,
        dimensions: if row.is_array { row.dimensions.max(1) } else { 0 },
        nullable: row.nullable,
        is_primary_key: row.is_primary_key,
        is_foreign_key: row.is_foreign_key,
        max_length: row.max_length,
        enum_values: row.enum_values.clone(),
        default: row.default.clone(),
        ..Column::new(&row.name, &row.source_type, resolved)
    })
}

pub fn map_relation(row: &RelationRow, target_entity: &str) -> Relation {
    Relation::has_one(
        row.source_columns.clone(),
        row.target(),
        row.target_columns.clone(),
        target_entity,
    )
}

pub fn map_back_reference(row: &RelationRow, source_entity: &str) -> BackReference {
    BackReference::new(
        row.source(),
        source_entity,
        row.source_columns.clone(),
        row.target_columns.clone(),
    )
}

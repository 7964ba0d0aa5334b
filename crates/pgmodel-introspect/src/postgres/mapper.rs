use pgmodel_core::TableRef;

use crate::provider::{ColumnRow, RelationRow};

use super::queries::{RawColumn, RawRelation, RawTable};

pub fn map_tables(raw: Vec<RawTable>) -> Vec<TableRef> {
    raw.into_iter()
        .map(|table| TableRef::new(table.schema, table.name))
        .collect()
}

pub fn map_relations(raw: Vec<RawRelation>) -> Vec<RelationRow> {
    raw.into_iter()
        .map(|rel| RelationRow {
            source_schema: rel.source_schema,
            source_table: rel.source_table,
            source_columns: rel.source_columns,
            target_schema: rel.target_schema,
            target_table: rel.target_table,
            target_columns: rel.target_columns,
        })
        .collect()
}

pub fn map_columns(raw: Vec<RawColumn>) -> Vec<ColumnRow> {
    raw.into_iter()
        .map(|col| ColumnRow {
            schema: col.schema,
            table: col.table_name,
            name: col.name,
            source_type: col.source_type,
            nullable: col.nullable,
            is_array: col.is_array,
            dimensions: non_negative(col.dimensions),
            default: col.default_value,
            is_primary_key: col.is_primary_key,
            is_foreign_key: col.is_foreign_key,
            max_length: non_negative(col.max_length),
            enum_values: col.enum_values,
        })
        .collect()
}

fn non_negative(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_negative_catalog_numbers() {
        let columns = map_columns(vec![RawColumn {
            schema: "public".to_string(),
            table_name: "users".to_string(),
            name: "email".to_string(),
            nullable: true,
            is_array: false,
            dimensions: -1,
            source_type: "varchar".to_string(),
            default_value: None,
            is_primary_key: false,
            is_foreign_key: false,
            max_length: 255,
            enum_values: Vec::new(),
        }]);

        assert_eq!(columns[0].dimensions, 0);
        assert_eq!(columns[0].max_length, 255);
        assert_eq!(columns[0].table, "users");
    }
}

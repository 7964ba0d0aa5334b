use serde::Serialize;

use crate::entity::{Column, Entity};
use crate::naming::pluralize;
use crate::types::BaseType;

/// Filter operator a search field applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Equals,
    In,
}

/// One field of a generated search struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchField {
    pub name: String,
    pub column: String,
    pub go_type: String,
    pub filter: FilterKind,
}

/// Search fields for an entity, in column order.
///
/// Scalar columns with a comparable type get an `equals` filter over the
/// pointer form of their base type; primary keys also get an `in` filter.
pub fn search_fields(entity: &Entity) -> Vec<SearchField> {
    let mut fields = Vec::new();

    for column in entity.columns() {
        let Some(base) = searchable_base(column) else {
            continue;
        };

        fields.push(SearchField {
            name: column.target_name.clone(),
            column: column.source_name.clone(),
            go_type: format!("*{}", base.go_name()),
            filter: FilterKind::Equals,
        });

        if column.is_primary_key {
            fields.push(SearchField {
                name: plural_field_name(&column.target_name),
                column: column.source_name.clone(),
                go_type: format!("[]{}", base.go_name()),
                filter: FilterKind::In,
            });
        }
    }

    fields
}

/// `ID` -> `IDs`, `Code` -> `Codes`.
fn plural_field_name(name: &str) -> String {
    if name.ends_with("ID") {
        format!("{name}s")
    } else {
        pluralize(name)
    }
}

fn searchable_base(column: &Column) -> Option<BaseType> {
    if column.is_array {
        return None;
    }

    column
        .base_type()
        .filter(|base| !base.has_natural_empty())
}

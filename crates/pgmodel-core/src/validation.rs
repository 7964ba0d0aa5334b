use std::collections::BTreeSet;

use serde::Serialize;

use crate::entity::{Column, Entity};
use crate::error::{Error, Result};
use crate::name_index::NameIndex;
use crate::types::BaseType;

/// Validate internal consistency of an assembled entity.
///
/// This checks:
/// - primary key columns are not nullable
/// - relations map the same number of source and target columns
/// - generated column, relation and back-reference names are unique
pub fn validate_entity(entity: &Entity) -> Result<()> {
    let invalid = |message: String| Error::InvalidEntity {
        entity: entity.table().key(),
        message,
    };

    for column in entity.columns() {
        if column.is_primary_key && column.nullable {
            return Err(invalid(format!(
                "primary key column is nullable: {}",
                column.source_name
            )));
        }
    }

    for relation in entity.relations() {
        let (sources, targets) = (relation.source_columns.len(), relation.target_columns.len());
        if sources > 0 && targets > 0 && sources != targets {
            return Err(invalid(format!(
                "relation {} maps {sources} source columns to {targets} target columns",
                relation.generated_name
            )));
        }
    }

    let mut names = BTreeSet::new();
    let generated = entity
        .columns()
        .iter()
        .map(|column| column.target_name.as_str())
        .chain(entity.relations().iter().map(|rel| rel.generated_name.as_str()))
        .chain(
            entity
                .back_references()
                .iter()
                .map(|back| back.generated_name.as_str()),
        );
    for name in generated {
        if !names.insert(name) {
            return Err(invalid(format!("duplicate generated name: {name}")));
        }
    }

    Ok(())
}

/// Validate every entity of a run, plus uniqueness of entity names.
pub fn validate_entities(entities: &[Entity]) -> Result<()> {
    let mut names = NameIndex::new();
    for entity in entities {
        validate_entity(entity)?;

        if !names.is_available(entity.generated_name()) {
            return Err(Error::InvalidEntity {
                entity: entity.table().key(),
                message: format!("duplicate entity name: {}", entity.generated_name()),
            });
        }
        names.reserve(entity.generated_name());
    }

    Ok(())
}

/// A field-level check emitted by the validation generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Check {
    /// Value must be non-empty (strings) or non-zero (foreign keys).
    Required,
    /// Optional foreign key must be non-zero when present.
    NonZeroIfSet,
    MaxLength { limit: u32 },
    OneOf { values: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub field: String,
    pub column: String,
    #[serde(flatten)]
    pub check: Check,
}

/// Derive validation rules for an entity, in column order.
pub fn validation_rules(entity: &Entity) -> Vec<FieldRule> {
    entity
        .columns()
        .iter()
        .filter(|column| !column.is_array)
        .flat_map(|column| {
            column_checks(column).into_iter().map(|check| FieldRule {
                field: column.target_name.clone(),
                column: column.source_name.clone(),
                check,
            })
        })
        .collect()
}

fn column_checks(column: &Column) -> Vec<Check> {
    let Some(base) = column.base_type() else {
        return Vec::new();
    };

    let mut checks = Vec::new();

    if base == BaseType::String {
        if !column.nullable && !column.is_primary_key && column.default.is_none() {
            checks.push(Check::Required);
        }
        if column.max_length > 0 {
            checks.push(Check::MaxLength {
                limit: column.max_length,
            });
        }
    }

    if column.is_foreign_key && base.is_integer() {
        checks.push(if column.nullable {
            Check::NonZeroIfSet
        } else {
            Check::Required
        });
    }

    if column.is_enum() {
        checks.push(Check::OneOf {
            values: column.enum_values.clone(),
        });
    }

    checks
}

use std::str::FromStr;

use pgmodel_core::{Error, PUBLIC_SCHEMA, Result, TableRef};

const WILDCARD: &str = "*";

/// A single `schema.table` / `schema.*` selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TablePattern {
    /// Every table of a schema.
    Schema(String),
    Table(TableRef),
}

impl FromStr for TablePattern {
    type Err = Error;

    /// A pattern without a schema part selects from the public schema.
    fn from_str(pattern: &str) -> Result<Self> {
        let pattern = pattern.trim();
        let (schema, table) = pattern.split_once('.').unwrap_or((PUBLIC_SCHEMA, pattern));

        if schema.is_empty() || table.is_empty() || table.contains('.') {
            return Err(Error::InvalidPattern(pattern.to_string()));
        }

        if table == WILDCARD {
            Ok(TablePattern::Schema(schema.to_string()))
        } else {
            Ok(TablePattern::Table(TableRef::new(schema, table)))
        }
    }
}

/// Tables requested from the metadata provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSelection {
    pub schemas: Vec<String>,
    pub tables: Vec<TableRef>,
}

impl TableSelection {
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut selection = TableSelection::default();

        for pattern in patterns {
            match pattern.as_ref().parse()? {
                TablePattern::Schema(schema) => {
                    if !selection.schemas.contains(&schema) {
                        selection.schemas.push(schema);
                    }
                }
                TablePattern::Table(table) => {
                    if !selection.tables.contains(&table) {
                        selection.tables.push(table);
                    }
                }
            }
        }

        Ok(selection)
    }

    pub fn matches(&self, table: &TableRef) -> bool {
        self.schemas.contains(&table.schema) || self.tables.contains(table)
    }

    /// Joined `schema.table` keys of the exact-table selections.
    pub fn table_keys(&self) -> Vec<String> {
        self.tables.iter().map(TableRef::key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wildcards_and_tables() {
        assert_eq!(
            "geo.*".parse::<TablePattern>().unwrap(),
            TablePattern::Schema("geo".to_string())
        );
        assert_eq!(
            "public.users".parse::<TablePattern>().unwrap(),
            TablePattern::Table(TableRef::new("public", "users"))
        );
        assert_eq!(
            "users".parse::<TablePattern>().unwrap(),
            TablePattern::Table(TableRef::new("public", "users"))
        );
    }

    #[test]
    fn rejects_malformed_patterns() {
        for pattern in ["", ".users", "public.", "a.b.c"] {
            assert!(
                matches!(pattern.parse::<TablePattern>(), Err(Error::InvalidPattern(_))),
                "pattern {pattern:?} should be rejected"
            );
        }
    }

    #[test]
    fn builds_deduplicated_selection() {
        let selection =
            TableSelection::from_patterns(&["public.*", "geo.zones", "public.*", "geo.zones"])
                .unwrap();
        assert_eq!(selection.schemas, vec!["public"]);
        assert_eq!(selection.tables, vec![TableRef::new("geo", "zones")]);
        assert_eq!(selection.table_keys(), vec!["geo.zones"]);

        assert!(selection.matches(&TableRef::new("public", "anything")));
        assert!(selection.matches(&TableRef::new("geo", "zones")));
        assert!(!selection.matches(&TableRef::new("geo", "points")));
    }
}

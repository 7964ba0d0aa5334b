use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::entity::TableRef;

/// Deterministic table order for generated output.
///
/// The public schema sorts first; tables of one schema sort by name; other
/// schemas sort by their joined `schema.table` key.
pub fn compare_tables(left: &TableRef, right: &TableRef) -> Ordering {
    match (left.is_public(), right.is_public()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ if left.schema == right.schema => left.name.cmp(&right.name),
        _ => left.key().cmp(&right.key()),
    }
}

pub fn sort_tables(tables: &mut [TableRef]) {
    tables.sort_by(compare_tables);
}

/// Insertion-ordered set of tables keyed by `schema.table`.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: Vec<TableRef>,
    keys: BTreeSet<String>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, table: &TableRef) -> bool {
        self.keys.contains(&table.key())
    }

    /// Returns `false` when the table was already present.
    pub fn insert(&mut self, table: TableRef) -> bool {
        if !self.keys.insert(table.key()) {
            return false;
        }
        self.tables.push(table);
        true
    }

    /// Add every edge target whose source is already in the set.
    ///
    /// Returns the newly added tables in edge order. Targets already present,
    /// self references included, are skipped, so repeated passes over a
    /// cyclic graph reach a fixed point.
    pub fn extend_along<I>(&mut self, edges: I) -> Vec<TableRef>
    where
        I: IntoIterator<Item = (TableRef, TableRef)>,
    {
        let mut added = Vec::new();
        for (source, target) in edges {
            if self.contains(&source) && self.insert(target.clone()) {
                added.push(target);
            }
        }
        added
    }

    pub fn tables(&self) -> &[TableRef] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn into_sorted(self) -> Vec<TableRef> {
        let mut tables = self.tables;
        sort_tables(&mut tables);
        tables
    }
}

impl FromIterator<TableRef> for TableSet {
    fn from_iter<I: IntoIterator<Item = TableRef>>(iter: I) -> Self {
        let mut set = TableSet::new();
        for table in iter {
            set.insert(table);
        }
        set
    }
}

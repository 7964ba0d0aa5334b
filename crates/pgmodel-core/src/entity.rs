use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name_index::NameIndex;
use crate::naming::{column_identifier, pluralize, qualified_entity_name, relation_name};
use crate::types::{BaseType, ResolvedType};
use crate::PUBLIC_SCHEMA;

/// Appended to a relation name that equals a column name before numeric probing.
const RELATION_SUFFIX: &str = "Rel";

/// Identifies a database relation by schema and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableRef {
    pub schema: String,
    pub name: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Joined `schema.name` form used as a map key.
    pub fn key(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    pub fn is_public(&self) -> bool {
        self.schema == PUBLIC_SCHEMA
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// A table column with its resolved target type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub source_name: String,
    /// Go field name, unique within the owning entity.
    pub target_name: String,
    pub source_type: String,
    pub target_type: String,
    pub resolved_type: ResolvedType,
    pub is_array: bool,
    pub dimensions: u32,
    pub nullable: bool,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    /// `0` means unbounded.
    pub max_length: u32,
    pub enum_values: Vec<String>,
    pub default: Option<String>,
    pub required_import: Option<String>,
    /// Index into the owning entity's relations when this column is part of one.
    pub relation: Option<usize>,
}

impl Column {
    /// Build a non-null scalar column named after `source_name`.
    pub fn new(
        source_name: impl Into<String>,
        source_type: impl Into<String>,
        resolved_type: ResolvedType,
    ) -> Self {
        let source_name = source_name.into();
        Self {
            target_name: column_identifier(&source_name),
            source_name,
            source_type: source_type.into(),
            target_type: resolved_type.go_type(),
            required_import: resolved_type.import().map(str::to_string),
            resolved_type,
            is_array: false,
            dimensions: 0,
            nullable: false,
            is_primary_key: false,
            is_foreign_key: false,
            max_length: 0,
            enum_values: Vec::new(),
            default: None,
            relation: None,
        }
    }

    pub fn is_enum(&self) -> bool {
        !self.enum_values.is_empty()
    }

    pub fn base_type(&self) -> Option<BaseType> {
        self.resolved_type.descriptor().map(|descriptor| descriptor.base)
    }
}

/// Kind of association between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    HasOne,
    HasMany,
    ManyToMany,
}

/// A foreign-key edge from the owning entity to a target table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub kind: RelationKind,
    pub source_columns: Vec<String>,
    pub target_schema: String,
    pub target_table: String,
    pub target_columns: Vec<String>,
    /// Struct name of the target table.
    pub target_entity: String,
    /// Field name, unique across the owning entity's columns and relations.
    pub generated_name: String,
}

impl Relation {
    pub fn has_one(
        source_columns: Vec<String>,
        target: TableRef,
        target_columns: Vec<String>,
        target_entity: impl Into<String>,
    ) -> Self {
        let target_entity = target_entity.into();
        Self {
            kind: RelationKind::HasOne,
            generated_name: relation_name(&source_columns, &target_entity),
            source_columns,
            target_schema: target.schema,
            target_table: target.name,
            target_columns,
            target_entity,
        }
    }

    pub fn target(&self) -> TableRef {
        TableRef::new(&self.target_schema, &self.target_table)
    }

    /// Composite keys are modelled but renderers have to comment them out.
    pub fn is_multi_column(&self) -> bool {
        self.source_columns.len() > 1
    }
}

/// Inverse side of a relation, recorded on the referenced entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackReference {
    pub source: TableRef,
    pub source_entity: String,
    pub source_columns: Vec<String>,
    pub target_columns: Vec<String>,
    pub generated_name: String,
}

impl BackReference {
    pub fn new(
        source: TableRef,
        source_entity: impl Into<String>,
        source_columns: Vec<String>,
        target_columns: Vec<String>,
    ) -> Self {
        let source_entity = source_entity.into();
        Self {
            generated_name: pluralize(&source_entity),
            source,
            source_entity,
            source_columns,
            target_columns,
        }
    }
}

/// A fully assembled table ready for rendering.
///
/// Contents only grow while the resolver joins metadata rows into it;
/// columns, relations and back-references share one name namespace.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    #[serde(flatten)]
    table: TableRef,
    generated_name: String,
    columns: Vec<Column>,
    relations: Vec<Relation>,
    back_references: Vec<BackReference>,
    imports: Vec<String>,
    #[serde(skip)]
    names: NameIndex,
}

impl Entity {
    pub fn new(table: TableRef, generated_name: impl Into<String>) -> Self {
        Self {
            table,
            generated_name: generated_name.into(),
            columns: Vec::new(),
            relations: Vec::new(),
            back_references: Vec::new(),
            imports: Vec::new(),
            names: NameIndex::new(),
        }
    }

    /// Create an entity using the default struct name for its table.
    pub fn for_table(table: TableRef) -> Self {
        let name = qualified_entity_name(&table.schema, &table.name);
        Self::new(table, name)
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn generated_name(&self) -> &str {
        &self.generated_name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn back_references(&self) -> &[BackReference] {
        &self.back_references
    }

    /// Required imports, deduplicated in first-seen order.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn column(&self, source_name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|column| column.source_name == source_name)
    }

    /// Relation a column takes part in, if any.
    pub fn relation_of(&self, column: &Column) -> Option<&Relation> {
        column.relation.and_then(|index| self.relations.get(index))
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|column| column.is_primary_key)
    }

    /// Append a column, renaming it when its generated name is taken.
    pub fn add_column(&mut self, mut column: Column) -> &Column {
        column.target_name = self.names.claim(&column.target_name);

        if let Some(import) = column.required_import.as_deref() {
            self.add_import(import);
        }

        let index = self.columns.len();
        self.columns.push(column);
        &self.columns[index]
    }

    /// Append a relation and link its source columns back to it.
    pub fn add_relation(&mut self, mut relation: Relation) -> &Relation {
        let mut name = relation.generated_name.clone();
        if self.columns.iter().any(|column| column.target_name == name) {
            name.push_str(RELATION_SUFFIX);
        }
        relation.generated_name = self.names.claim(&name);

        let index = self.relations.len();
        for column in self
            .columns
            .iter_mut()
            .filter(|column| relation.source_columns.contains(&column.source_name))
        {
            column.relation = Some(index);
        }

        self.relations.push(relation);
        &self.relations[index]
    }

    pub fn add_back_reference(&mut self, mut back_reference: BackReference) -> &BackReference {
        back_reference.generated_name = self.names.claim(&back_reference.generated_name);

        let index = self.back_references.len();
        self.back_references.push(back_reference);
        &self.back_references[index]
    }

    /// True once a second primary key column is seen.
    pub fn has_multiple_primary_keys(&self) -> bool {
        self.primary_keys().nth(1).is_some()
    }

    /// Whether `name` is still free among column, relation and
    /// back-reference names.
    pub fn is_name_available(&self, name: &str) -> bool {
        self.names.is_available(name)
    }

    fn add_import(&mut self, import: &str) {
        if !self.imports.iter().any(|existing| existing == import) {
            self.imports.push(import.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NullStyle, TypeRequest, resolve_type};

    fn column(source_name: &str, source_type: &str) -> Column {
        let request = TypeRequest {
            source_type,
            nullable: false,
            is_array: false,
            dimensions: 0,
            is_enum: false,
        };
        let resolved = resolve_type(&request, NullStyle::Pointer).unwrap();
        Column::new(source_name, source_type, resolved)
    }

    fn users() -> Entity {
        Entity::for_table(TableRef::new("public", "users"))
    }

    #[test]
    fn names_entity_after_table() {
        assert_eq!(users().generated_name(), "User");
        let geo = Entity::for_table(TableRef::new("geo", "locations"));
        assert_eq!(geo.generated_name(), "GeoLocation");
    }

    #[test]
    fn renames_colliding_columns() {
        let mut entity = users();
        entity.add_column(column("name", "text"));
        entity.add_column(column("Name", "text"));
        entity.add_column(column("name-", "text"));

        let names: Vec<&str> = entity
            .columns()
            .iter()
            .map(|column| column.target_name.as_str())
            .collect();
        assert_eq!(names, vec!["Name", "Name1", "Name2"]);
    }

    #[test]
    fn keeps_catalog_column_order() {
        let mut entity = users();
        for name in ["id", "email", "created_at"] {
            entity.add_column(column(name, "text"));
        }
        let sources: Vec<&str> = entity
            .columns()
            .iter()
            .map(|column| column.source_name.as_str())
            .collect();
        assert_eq!(sources, vec!["id", "email", "created_at"]);
    }

    #[test]
    fn deduplicates_imports_in_first_seen_order() {
        let mut entity = users();
        entity.add_column(column("created_at", "timestamptz"));
        entity.add_column(column("ip", "inet"));
        entity.add_column(column("updated_at", "timestamp"));
        assert_eq!(entity.imports(), ["time", "net"]);
    }

    #[test]
    fn links_relation_to_source_columns() {
        let mut entity = Entity::for_table(TableRef::new("public", "orders"));
        entity.add_column(column("id", "int4"));
        entity.add_column(column("user_id", "int4"));

        let relation = entity.add_relation(Relation::has_one(
            vec!["user_id".to_string()],
            TableRef::new("public", "users"),
            vec!["id".to_string()],
            "User",
        ));
        assert_eq!(relation.generated_name, "User");

        let user_id = entity.column("user_id").unwrap();
        assert_eq!(entity.relation_of(user_id).unwrap().target_table, "users");
        assert!(entity.column("id").unwrap().relation.is_none());
    }

    #[test]
    fn relation_colliding_with_column_gets_suffix() {
        let mut entity = Entity::for_table(TableRef::new("public", "orders"));
        entity.add_column(column("user", "int4"));
        entity.add_column(column("user_rel", "int4"));

        let relation = entity.add_relation(Relation::has_one(
            vec!["user".to_string()],
            TableRef::new("public", "users"),
            vec!["id".to_string()],
            "User",
        ));
        assert_eq!(relation.generated_name, "UserRel1");
    }

    #[test]
    fn relations_share_namespace_with_each_other() {
        let mut entity = Entity::for_table(TableRef::new("public", "transfers"));
        let target = TableRef::new("public", "accounts");
        for columns in [vec!["id"], vec!["id"]] {
            entity.add_relation(Relation::has_one(
                columns.into_iter().map(str::to_string).collect(),
                target.clone(),
                vec!["id".to_string()],
                "Account",
            ));
        }

        let names: Vec<&str> = entity
            .relations()
            .iter()
            .map(|relation| relation.generated_name.as_str())
            .collect();
        assert_eq!(names, vec!["Account", "Account1"]);
    }

    #[test]
    fn back_references_use_plural_source_name() {
        let mut entity = users();
        entity.add_column(column("id", "int4"));
        let back = entity.add_back_reference(BackReference::new(
            TableRef::new("public", "orders"),
            "Order",
            vec!["user_id".to_string()],
            vec!["id".to_string()],
        ));
        assert_eq!(back.generated_name, "Orders");
    }

    #[test]
    fn detects_multiple_primary_keys() {
        let mut entity = users();
        let mut id = column("id", "int4");
        id.is_primary_key = true;
        entity.add_column(id.clone());
        assert!(!entity.has_multiple_primary_keys());

        let mut tenant = column("tenant_id", "int4");
        tenant.is_primary_key = true;
        entity.add_column(tenant);
        assert!(entity.has_multiple_primary_keys());
        assert_eq!(entity.primary_keys().count(), 2);
    }

    #[test]
    fn tracks_claimed_field_names() {
        let mut entity = users();
        assert!(entity.is_name_available("ID"));
        entity.add_column(column("id", "int4"));
        assert!(!entity.is_name_available("ID"));
        assert!(entity.is_name_available("ID1"));
    }

    #[test]
    fn non_ascii_columns_get_valid_identifiers() {
        let mut entity = users();
        entity.add_column(column("名前", "text"));
        entity.add_column(column("住所", "text"));

        let names: Vec<&str> = entity
            .columns()
            .iter()
            .map(|column| column.target_name.as_str())
            .collect();
        assert_eq!(names, vec!["T", "T1"]);
    }

    #[test]
    fn multi_column_relations_are_flagged() {
        let relation = Relation::has_one(
            vec!["a_id".to_string(), "b_id".to_string()],
            TableRef::new("public", "pairs"),
            vec!["a_id".to_string(), "b_id".to_string()],
            "Pair",
        );
        assert!(relation.is_multi_column());
        assert_eq!(relation.generated_name, "Pair");
    }
}

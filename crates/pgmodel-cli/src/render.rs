use std::path::Path;

use pgmodel_core::naming::snake_case;
use pgmodel_core::{
    BaseType, Entity, FieldRule, NullStyle, SearchField, search_fields, validation_rules,
};
use serde::Serialize;

use crate::error::CliResult;
use crate::output::OutputFile;

pub const DEFAULT_PACKAGE: &str = "model";
const GENERATOR: &str = "pgmodel";
const TABLE_ALIAS: &str = "t";
const PRIMARY_KEY_FIELD: &str = "ID";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationKind {
    Model,
    Search,
    Validation,
    ModelNamed,
}

impl GenerationKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Search => "search",
            Self::Validation => "validation",
            Self::ModelNamed => "model-named",
        }
    }
}

/// Knobs forwarded to the renderer and echoed into every document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOptions {
    pub package: String,
    pub keep_pk: bool,
    pub soft_delete: Option<String>,
    pub null_style: NullStyle,
    pub no_alias: bool,
    pub no_discard: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
            keep_pk: false,
            soft_delete: None,
            null_style: NullStyle::default(),
            no_alias: false,
            no_discard: false,
        }
    }
}

#[derive(Serialize)]
struct Document<'a, T> {
    generator: &'static str,
    kind: GenerationKind,
    package: &'a str,
    options: &'a RenderOptions,
    entities: Vec<T>,
}

#[derive(Serialize)]
struct ModelView<'a> {
    #[serde(flatten)]
    entity: &'a Entity,
    alias: Option<&'static str>,
    discard_unknown_columns: bool,
    soft_delete: Option<&'a str>,
    fields: Vec<FieldView<'a>>,
}

#[derive(Serialize)]
struct FieldView<'a> {
    name: &'a str,
    column: &'a str,
    go_type: &'a str,
    opaque: bool,
}

#[derive(Serialize)]
struct SearchView<'a> {
    entity: &'a str,
    struct_name: String,
    fields: Vec<SearchField>,
}

#[derive(Serialize)]
struct ValidationView<'a> {
    entity: &'a str,
    function: String,
    rules: Vec<FieldRule>,
}

/// Render `entities` into the files `kind` produces under `output`.
///
/// `output` is a file path for every kind except `model-named`, where it is
/// the directory that receives one document per entity.
pub fn render(
    kind: GenerationKind,
    entities: &[Entity],
    options: &RenderOptions,
    output: &Path,
) -> CliResult<Vec<OutputFile>> {
    match kind {
        GenerationKind::Model => {
            report_soft_delete(entities, options);
            let views = entities
                .iter()
                .map(|entity| model_view(entity, options))
                .collect();
            Ok(vec![document(kind, options, views, output)?])
        }
        GenerationKind::ModelNamed => {
            report_soft_delete(entities, options);
            entities
                .iter()
                .map(|entity| {
                    let path = output.join(format!("{}.json", snake_case(entity.generated_name())));
                    document(kind, options, vec![model_view(entity, options)], &path)
                })
                .collect()
        }
        GenerationKind::Search => {
            let views = entities
                .iter()
                .map(|entity| SearchView {
                    entity: entity.generated_name(),
                    struct_name: format!("{}Search", entity.generated_name()),
                    fields: search_fields(entity),
                })
                .collect();
            Ok(vec![document(kind, options, views, output)?])
        }
        GenerationKind::Validation => {
            let views = entities
                .iter()
                .map(|entity| ValidationView {
                    entity: entity.generated_name(),
                    function: format!("Validate{}", entity.generated_name()),
                    rules: validation_rules(entity),
                })
                .collect();
            Ok(vec![document(kind, options, views, output)?])
        }
    }
}

fn document<T: Serialize>(
    kind: GenerationKind,
    options: &RenderOptions,
    entities: Vec<T>,
    path: &Path,
) -> CliResult<OutputFile> {
    let document = Document {
        generator: GENERATOR,
        kind,
        package: &options.package,
        options,
        entities,
    };
    let mut contents = serde_json::to_vec_pretty(&document)?;
    contents.push(b'\n');

    Ok(OutputFile {
        path: path.to_path_buf(),
        contents,
    })
}

fn model_view<'a>(entity: &'a Entity, options: &'a RenderOptions) -> ModelView<'a> {
    let rename_pk = !options.keep_pk
        && !entity.has_multiple_primary_keys()
        && entity.primary_keys().next().is_some_and(|pk| {
            pk.target_name == PRIMARY_KEY_FIELD || entity.is_name_available(PRIMARY_KEY_FIELD)
        });
    let fields = entity
        .columns()
        .iter()
        .map(|column| FieldView {
            name: if rename_pk && column.is_primary_key {
                PRIMARY_KEY_FIELD
            } else {
                column.target_name.as_str()
            },
            column: &column.source_name,
            go_type: &column.target_type,
            opaque: column.resolved_type.is_opaque(),
        })
        .collect();

    ModelView {
        entity,
        alias: (!options.no_alias).then_some(TABLE_ALIAS),
        discard_unknown_columns: !options.no_discard,
        soft_delete: soft_delete_column(entity, options),
        fields,
    }
}

fn soft_delete_column<'a>(entity: &Entity, options: &'a RenderOptions) -> Option<&'a str> {
    let name = options.soft_delete.as_deref()?;
    let column = entity.column(name)?;
    (column.base_type() == Some(BaseType::Time) && !column.is_array).then_some(name)
}

fn report_soft_delete(entities: &[Entity], options: &RenderOptions) {
    let Some(name) = options.soft_delete.as_deref() else {
        return;
    };

    for entity in entities {
        match entity.column(name) {
            None => tracing::warn!(
                event = "soft_delete_column_missing",
                entity = entity.generated_name(),
                column = name
            ),
            Some(column) if soft_delete_column(entity, options).is_none() => tracing::warn!(
                event = "soft_delete_column_not_timestamp",
                entity = entity.generated_name(),
                column = name,
                target_type = %column.target_type
            ),
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pgmodel_core::{Column, TableRef, TypeRequest, resolve_type};
    use serde_json::Value;

    use super::*;

    fn column(name: &str, source_type: &str, nullable: bool) -> Column {
        let resolved = resolve_type(
            &TypeRequest {
                source_type,
                nullable,
                is_array: false,
                dimensions: 0,
                is_enum: false,
            },
            NullStyle::Pointer,
        )
        .unwrap();
        let mut column = Column::new(name, source_type, resolved);
        column.nullable = nullable;
        column
    }

    fn user_entity() -> Entity {
        let mut entity = Entity::for_table(TableRef::new("public", "user_accounts"));
        let mut id = column("user_id", "int8", false);
        id.is_primary_key = true;
        entity.add_column(id);
        entity.add_column(column("email", "varchar", false));
        entity.add_column(column("deleted_at", "timestamptz", true));
        entity
    }

    fn parse(file: &OutputFile) -> Value {
        serde_json::from_slice(&file.contents).unwrap()
    }

    #[test]
    fn model_renders_single_document() {
        let files = render(
            GenerationKind::Model,
            &[user_entity()],
            &RenderOptions::default(),
            Path::new("out/model.json"),
        )
        .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("out/model.json"));

        let doc = parse(&files[0]);
        assert_eq!(doc["kind"], "model");
        assert_eq!(doc["package"], "model");
        let entity = &doc["entities"][0];
        assert_eq!(entity["generated_name"], "UserAccount");
        assert_eq!(entity["alias"], "t");
        assert_eq!(entity["discard_unknown_columns"], true);
        assert_eq!(entity["fields"][0]["name"], "ID");
        assert_eq!(entity["fields"][2]["go_type"], "*time.Time");
    }

    #[test]
    fn keep_pk_and_flags_are_honoured() {
        let options = RenderOptions {
            package: "db".to_string(),
            keep_pk: true,
            soft_delete: Some("deleted_at".to_string()),
            no_alias: true,
            no_discard: true,
            ..RenderOptions::default()
        };
        let files = render(
            GenerationKind::Model,
            &[user_entity()],
            &options,
            Path::new("model.json"),
        )
        .unwrap();

        let doc = parse(&files[0]);
        assert_eq!(doc["package"], "db");
        let entity = &doc["entities"][0];
        assert_eq!(entity["fields"][0]["name"], "UserID");
        assert_eq!(entity["alias"], Value::Null);
        assert_eq!(entity["discard_unknown_columns"], false);
        assert_eq!(entity["soft_delete"], "deleted_at");
    }

    #[test]
    fn primary_key_keeps_its_name_when_id_is_taken() {
        let mut entity = Entity::for_table(TableRef::new("public", "accounts"));
        let mut account_id = column("account_id", "int8", false);
        account_id.is_primary_key = true;
        entity.add_column(account_id);
        entity.add_column(column("id", "int8", false));

        let files = render(
            GenerationKind::Model,
            &[entity],
            &RenderOptions::default(),
            Path::new("model.json"),
        )
        .unwrap();

        let doc = parse(&files[0]);
        let names: Vec<&str> = doc["entities"][0]["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|field| field["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["AccountID", "ID"]);
    }

    #[test]
    fn soft_delete_requires_timestamp_column() {
        let options = RenderOptions {
            soft_delete: Some("email".to_string()),
            ..RenderOptions::default()
        };
        let entity = user_entity();
        assert_eq!(soft_delete_column(&entity, &options), None);
    }

    #[test]
    fn model_named_writes_one_file_per_entity() {
        let other = Entity::for_table(TableRef::new("geo", "regions"));
        let files = render(
            GenerationKind::ModelNamed,
            &[user_entity(), other],
            &RenderOptions::default(),
            Path::new("models"),
        )
        .unwrap();

        let paths: Vec<PathBuf> = files.iter().map(|file| file.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("models/user_account.json"),
                PathBuf::from("models/geo_region.json"),
            ]
        );
        assert_eq!(parse(&files[1])["entities"][0]["generated_name"], "GeoRegion");
    }

    #[test]
    fn search_and_validation_documents() {
        let entities = [user_entity()];

        let search = render(
            GenerationKind::Search,
            &entities,
            &RenderOptions::default(),
            Path::new("search.json"),
        )
        .unwrap();
        let doc = parse(&search[0]);
        assert_eq!(doc["kind"], "search");
        assert_eq!(doc["entities"][0]["struct_name"], "UserAccountSearch");
        assert_eq!(doc["entities"][0]["fields"][0]["column"], "user_id");

        let validation = render(
            GenerationKind::Validation,
            &entities,
            &RenderOptions::default(),
            Path::new("validation.json"),
        )
        .unwrap();
        let doc = parse(&validation[0]);
        assert_eq!(doc["kind"], "validation");
        assert_eq!(doc["entities"][0]["function"], "ValidateUserAccount");
        assert_eq!(doc["entities"][0]["rules"][0]["check"], "required");
        assert_eq!(doc["entities"][0]["rules"][0]["column"], "email");
    }

    #[test]
    fn rendering_is_deterministic() {
        let entities = [user_entity()];
        let options = RenderOptions::default();
        let first =
            render(GenerationKind::Model, &entities, &options, Path::new("m.json")).unwrap();
        let second =
            render(GenerationKind::Model, &entities, &options, Path::new("m.json")).unwrap();
        assert_eq!(first, second);
    }
}

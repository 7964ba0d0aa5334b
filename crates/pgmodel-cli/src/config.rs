use std::fmt;
use std::path::{Path, PathBuf};

use pgmodel_core::NullStyle;
use pgmodel_introspect::{DEFAULT_PATTERN, ResolveOptions};
use serde::Deserialize;

use crate::connection::ConnectionConfig;
use crate::error::CliResult;
use crate::render::{DEFAULT_PACKAGE, RenderOptions};

/// Settings read from a `--config` TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub conn: Option<String>,
    pub snapshot: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub tables: Vec<String>,
    pub follow_fk: Option<bool>,
    pub package: Option<String>,
    pub keep_pk: Option<bool>,
    pub soft_delete: Option<String>,
    pub null_style: Option<NullStyle>,
    pub no_alias: Option<bool>,
    pub no_discard: Option<bool>,
}

pub fn load_file_config(path: &Path) -> CliResult<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Settings given on the command line. Unset values and `false` flags defer
/// to the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub conn: Option<String>,
    pub snapshot: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub tables: Vec<String>,
    pub follow_fk: bool,
    pub package: Option<String>,
    pub keep_pk: bool,
    pub soft_delete: Option<String>,
    pub null_style: Option<NullStyle>,
    pub no_alias: bool,
    pub no_discard: bool,
}

/// Where catalog metadata comes from.
#[derive(Debug, Clone)]
pub enum Source {
    Database(ConnectionConfig),
    Snapshot(PathBuf),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database(conn) => write!(f, "{conn}"),
            Self::Snapshot(path) => write!(f, "snapshot:{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub source: Source,
    pub output: PathBuf,
    pub resolve: ResolveOptions,
    pub render: RenderOptions,
}

/// Combine command-line and file settings.
///
/// Returns `Ok(None)` when no metadata source or no output path was given
/// anywhere; the caller prints usage in that case.
pub fn merge(overrides: Overrides, file: FileConfig) -> CliResult<Option<Settings>> {
    let source = match (overrides.conn, overrides.snapshot) {
        (Some(conn), _) => Some(Source::Database(ConnectionConfig::parse(&conn)?)),
        (None, Some(path)) => Some(Source::Snapshot(path)),
        (None, None) => match (file.conn, file.snapshot) {
            (Some(conn), _) => Some(Source::Database(ConnectionConfig::parse(&conn)?)),
            (None, Some(path)) => Some(Source::Snapshot(path)),
            (None, None) => None,
        },
    };

    let (Some(source), Some(output)) = (source, overrides.output.or(file.output)) else {
        return Ok(None);
    };

    let patterns = if !overrides.tables.is_empty() {
        overrides.tables
    } else if !file.tables.is_empty() {
        file.tables
    } else {
        vec![DEFAULT_PATTERN.to_string()]
    };

    let null_style = overrides
        .null_style
        .or(file.null_style)
        .unwrap_or_default();

    let resolve = ResolveOptions {
        patterns,
        follow_foreign_keys: overrides.follow_fk || file.follow_fk.unwrap_or(false),
        null_style,
    };

    let render = RenderOptions {
        package: overrides
            .package
            .or(file.package)
            .unwrap_or_else(|| DEFAULT_PACKAGE.to_string()),
        keep_pk: overrides.keep_pk || file.keep_pk.unwrap_or(false),
        soft_delete: overrides.soft_delete.or(file.soft_delete),
        null_style,
        no_alias: overrides.no_alias || file.no_alias.unwrap_or(false),
        no_discard: overrides.no_discard || file.no_discard.unwrap_or(false),
    };

    Ok(Some(Settings {
        source,
        output,
        resolve,
        render,
    }))
}

/// `--null-style` value parser.
pub fn parse_null_style(value: &str) -> Result<NullStyle, String> {
    match value {
        "pointer" => Ok(NullStyle::Pointer),
        "wrapper" => Ok(NullStyle::Wrapper),
        other => Err(format!("unknown null style {other:?}, expected pointer or wrapper")),
    }
}

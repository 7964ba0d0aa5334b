mod config;
mod connection;
mod error;
mod logging;
mod output;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Args, CommandFactory, Parser, Subcommand};
use pgmodel_core::{Entity, NullStyle};
use pgmodel_introspect::{InMemoryProvider, MetadataSnapshot, resolve, resolve_postgres};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use config::{FileConfig, Overrides, Settings, Source, load_file_config, merge, parse_null_style};
use error::CliResult;
use logging::{LogFormat, init_logging};
use output::write_outputs;
use render::{GenerationKind, render};

#[derive(Parser, Debug)]
#[command(
    name = "pgmodel",
    version,
    about = "Generate go-pg model descriptions from a PostgreSQL schema"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Model structs for the selected tables.
    Model(GenerateArgs),
    /// Search filter structs.
    Search(GenerateArgs),
    /// Validation functions.
    Validation(GenerateArgs),
    /// Model structs, one output file per entity.
    ModelNamed(GenerateArgs),
}

impl Command {
    fn into_parts(self) -> (GenerationKind, GenerateArgs) {
        match self {
            Self::Model(args) => (GenerationKind::Model, args),
            Self::Search(args) => (GenerationKind::Search, args),
            Self::Validation(args) => (GenerationKind::Validation, args),
            Self::ModelNamed(args) => (GenerationKind::ModelNamed, args),
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Database connection string.
    #[arg(long, short = 'c', value_name = "CONNECTION_STRING", conflicts_with = "snapshot")]
    conn: Option<String>,
    /// JSON metadata snapshot to read instead of a live database.
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,
    /// Output file, or directory for model-named.
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,
    /// Tables to process: schema.table or schema.* (repeatable).
    #[arg(long = "tables", short = 't', value_name = "PATTERN")]
    tables: Vec<String>,
    /// Also process tables reachable through foreign keys.
    #[arg(long, short = 'f', default_value_t = false)]
    follow_fk: bool,
    /// TOML file with default settings; flags take precedence.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Package name for generated code.
    #[arg(long)]
    package: Option<String>,
    /// Keep primary key field names instead of renaming them to ID.
    #[arg(long, default_value_t = false)]
    keep_pk: bool,
    /// Timestamp column used for soft deletes.
    #[arg(long, value_name = "COLUMN")]
    soft_delete: Option<String>,
    /// Representation of nullable columns: pointer or wrapper.
    #[arg(long, value_name = "STYLE", value_parser = parse_null_style)]
    null_style: Option<NullStyle>,
    /// Do not emit a table alias.
    #[arg(long, default_value_t = false)]
    no_alias: bool,
    /// Do not discard unknown columns.
    #[arg(long, default_value_t = false)]
    no_discard: bool,
    /// Log output format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
    /// Also append JSON logs to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl GenerateArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            conn: self.conn.clone(),
            snapshot: self.snapshot.clone(),
            output: self.output.clone(),
            tables: self.tables.clone(),
            follow_fk: self.follow_fk,
            package: self.package.clone(),
            keep_pk: self.keep_pk,
            soft_delete: self.soft_delete.clone(),
            null_style: self.null_style,
            no_alias: self.no_alias,
            no_discard: self.no_discard,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let (kind, args) = cli.command.into_parts();

    if let Err(err) = init_logging(args.log_format, args.log_file.as_deref()) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    match run(kind, &args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(event = "run_failed", kind = kind.name(), error = %err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(kind: GenerationKind, args: &GenerateArgs) -> CliResult<()> {
    let file = match &args.config {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };

    let Some(settings) = merge(args.overrides(), file)? else {
        print_usage(kind)?;
        return Ok(());
    };

    let run_id = Uuid::new_v4().to_string();
    let started_at = chrono::Utc::now();
    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        started_at = %started_at.to_rfc3339(),
        kind = kind.name(),
        source = %settings.source,
        output = %settings.output.display()
    );

    let timer = Instant::now();

    let entities = resolve_entities(&settings).await?;
    let files = render(kind, &entities, &settings.render, &settings.output)?;
    write_outputs(&files)?;

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(
        event = "run_finished",
        status = "success",
        entities = entities.len(),
        files = files.len(),
        duration_ms = duration_ms
    );

    Ok(())
}

async fn resolve_entities(settings: &Settings) -> CliResult<Vec<Entity>> {
    let entities = match &settings.source {
        Source::Database(conn) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(10))
                .connect(conn.url())
                .await?;
            let entities = resolve_postgres(&pool, &settings.resolve).await;
            pool.close().await;
            entities?
        }
        Source::Snapshot(path) => {
            let content = std::fs::read_to_string(path)?;
            let snapshot: MetadataSnapshot = serde_json::from_str(&content)?;
            resolve(&InMemoryProvider::new(snapshot), &settings.resolve).await?
        }
    };

    Ok(entities)
}

fn print_usage(kind: GenerationKind) -> CliResult<()> {
    let mut command = Cli::command();
    match command.find_subcommand_mut(kind.name()) {
        Some(subcommand) => subcommand.print_help()?,
        None => command.print_help()?,
    }
    Ok(())
}

//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;

use crate::core::cli::{self, CliConfig, Commands, FilterArgs, OutputFormat, QueryArgs};
use crate::core::config::AppConfig;
use crate::core::constants::{ENV_LOG, LOG_TARGET};
use crate::data::{DataError, ListParams, RecordSource, open_source};
use crate::domain::filter::{FilterEditor, GlobalFilter, Row, parse_filter_document};
use crate::domain::schema::EntitySchema;
use crate::domain::sort::SortEditor;
use crate::domain::table::{
    BulkAction, BulkOutcome, Pagination, TableState, render_operators, render_table,
    run_bulk_action, visible_columns,
};
use crate::utils::file::expand_path;

pub struct CoreApp {
    pub config: AppConfig,
    pub source: Arc<dyn RecordSource>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config)?;
        match command {
            Commands::Query(args) => app.query(args).await,
            Commands::Operators { entity } => app.operators(&entity).await,
            Commands::Delete {
                entity,
                filter,
                yes,
            } => app.delete(&entity, &filter, yes).await,
        }
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let source = open_source(&config).context("Failed to open record source")?;
        Ok(Self { config, source })
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", LOG_TARGET);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // stdout carries command output
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    /// Schema of an entity; a source without one yields `None`
    async fn load_schema(&self, entity: &str) -> Result<Option<EntitySchema>> {
        match self.source.entity_schema(entity).await {
            Ok(schema) => Ok(Some(schema)),
            Err(DataError::NotFound(what)) => {
                tracing::warn!(entity, missing = %what, "No schema available, columns are untyped");
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to load schema of '{}'", entity)),
        }
    }

    async fn load_rows(&self, entity: &str) -> Result<Vec<Row>> {
        self.source
            .list_records(entity, &ListParams::default())
            .await
            .with_context(|| format!("Failed to load records of '{}'", entity))
    }

    /// Table state with the filter and sort given on the command line
    fn build_state(
        &self,
        filter: &FilterArgs,
        sort: SortEditor,
        schema: Option<&EntitySchema>,
    ) -> Result<TableState> {
        let mut state = TableState::new(Pagination::new(self.config.table.page_size));

        if let Some(search) = &filter.search {
            state.set_search(search);
        } else if let Some(text) = Self::filter_text(filter)? {
            let document = parse_filter_document(&text).context("Invalid filter document")?;
            state.edit_filters(|editor| {
                *editor = FilterEditor::with_conditions(document.conditions, document.logic);
            });
        }

        if let Some(schema) = schema.filter(|s| !s.fields.is_empty()) {
            let columns = schema.column_names();
            if let Some(GlobalFilter::Group(group)) = state.global_filter() {
                group.validate(&columns)?;
            }
            for key in sort.keys() {
                if !columns.contains(&key.column.as_str()) {
                    tracing::warn!(column = %key.column, "Sorting by a column missing from the schema");
                }
            }
        }

        state.edit_sort(|editor| *editor = sort);
        Ok(state)
    }

    fn filter_text(filter: &FilterArgs) -> Result<Option<String>> {
        if let Some(text) = &filter.filter {
            return Ok(Some(text.clone()));
        }
        match &filter.filter_file {
            Some(path) => {
                let path = expand_path(&path.to_string_lossy());
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read filter file: {}", path.display()))?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    async fn query(&self, args: QueryArgs) -> Result<()> {
        let schema = self.load_schema(&args.entity).await?;
        let rows = self.load_rows(&args.entity).await?;

        let mut state = self.build_state(
            &args.filter,
            SortEditor::with_keys(args.sort.clone()),
            schema.as_ref(),
        )?;
        state.pagination_mut().page_index = args.page - 1;
        let view = state.compute(&rows);

        if let Some(path) = &args.export {
            state.select_all(&rows);
            let selected = state.selected_rows(&rows);
            let outcome =
                run_bulk_action(BulkAction::Export, &args.entity, selected, self.source.as_ref())
                    .await?;
            if let BulkOutcome::Exported(exported) = outcome {
                let path = expand_path(&path.to_string_lossy());
                let content = serde_json::to_string_pretty(&exported)?;
                std::fs::write(&path, content)
                    .with_context(|| format!("Failed to write export file: {}", path.display()))?;
                eprintln!("Exported {} row(s) to {}", exported.len(), path.display());
            }
        }

        match args.format {
            OutputFormat::Json => {
                let page_rows: Vec<&Row> = view.rows.iter().map(|r| &r.row).collect();
                let output = json!({
                    "entity": args.entity,
                    "total": view.total,
                    "filtered": view.filtered,
                    "page": view.page_index + 1,
                    "page_count": view.page_count,
                    "rows": page_rows,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                let columns = visible_columns(schema.as_ref(), &view.rows);
                print!("{}", render_table(&columns, &view.rows));
                println!(
                    "\nPage {} of {} ({} matching, {} total)",
                    view.page_index + 1,
                    view.page_count.max(1),
                    view.filtered,
                    view.total
                );
            }
        }
        Ok(())
    }

    async fn operators(&self, entity: &str) -> Result<()> {
        let schema = self
            .source
            .entity_schema(entity)
            .await
            .with_context(|| format!("Failed to load schema of '{}'", entity))?;
        print!("{}", render_operators(&schema));
        Ok(())
    }

    async fn delete(&self, entity: &str, filter: &FilterArgs, skip_confirm: bool) -> Result<()> {
        if filter.is_empty() {
            anyhow::bail!("Refusing to delete without --search, --filter or --filter-file");
        }

        let schema = self.load_schema(entity).await?;
        let rows = self.load_rows(entity).await?;
        let mut state = self.build_state(filter, SortEditor::new(), schema.as_ref())?;

        if state.global_filter().is_none() {
            anyhow::bail!("Filter has no complete condition; refusing to delete every record");
        }

        state.select_all(&rows);
        let selected = state.selected_rows(&rows);
        if selected.is_empty() {
            println!("No matching records.");
            return Ok(());
        }

        println!(
            "This will permanently delete {} of {} '{}' record(s).",
            selected.len(),
            rows.len(),
            entity
        );

        if !skip_confirm {
            print!("\nContinue? [y/N] ");
            std::io::Write::flush(&mut std::io::stdout())?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;

            if !matches!(input.trim().to_lowercase().as_str(), "y" | "yes") {
                println!("Aborted.");
                return Ok(());
            }
        }

        let outcome =
            run_bulk_action(BulkAction::Delete, entity, selected, self.source.as_ref()).await?;
        if let BulkOutcome::Deleted { ids, skipped } = outcome {
            println!("Deleted {} record(s).", ids.len());
            if skipped > 0 {
                println!("Skipped {} row(s) without a record id.", skipped);
            }
        }
        Ok(())
    }
}

//! tabview CLI
//!
//! Drives a table runtime from the terminal: load rows and a table configuration, apply
//! search, filters, sort and paging, then print the page or export it as CSV. Persisted
//! filter records live in a SQLite file inside the data directory.

mod logging;
mod paths;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use tabview_core::{Row, Value};
use tabview_table::config::FILTER_KEY_PREFIX;
use tabview_table::export::format_cell;
use tabview_table::{
    AdvancedFilter, ColumnDescriptor, ExportScope, FilterPersistence, FilterStore, SortDirection,
    SortSpec, SqliteFilterStore, TableConfig, TableRuntime, ViewState,
};

#[derive(Parser)]
#[command(name = "tabview", version, about = "Filter, page and export tabular data")]
struct Cli {
    /// Directory holding persisted filters and logs
    #[arg(long, env = "TABVIEW_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write JSON logs into the data directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current page of the table
    View(ViewArgs),

    /// Write the filtered view as CSV
    Export {
        #[command(flatten)]
        view: ViewArgs,

        /// Output file (defaults to the configured export filename)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Export only the selected page instead of every filtered row
        #[arg(long)]
        page_only: bool,
    },

    /// Inspect or delete persisted filter records
    Filters {
        #[command(subcommand)]
        action: FiltersCommand,
    },
}

#[derive(Subcommand)]
enum FiltersCommand {
    /// Print the persisted record of a table
    Show(FilterKeyArgs),
    /// Delete the persisted record of a table
    Clear(FilterKeyArgs),
}

#[derive(Args)]
struct FilterKeyArgs {
    /// Table id the record was saved under
    #[arg(long)]
    table_id: Option<String>,

    /// Explicit storage key, overriding the table id
    #[arg(long)]
    key: Option<String>,
}

#[derive(Args)]
struct ViewArgs {
    /// JSON file containing an array of row objects
    #[arg(long)]
    rows: PathBuf,

    /// Table configuration (JSON or TOML)
    #[arg(long)]
    config: PathBuf,

    /// Free-text search term
    #[arg(long)]
    search: Option<String>,

    /// Quick filter value
    #[arg(long)]
    quick: Option<String>,

    /// Advanced filter as field=value, with `|` separating alternatives
    #[arg(long = "filter", value_name = "FIELD=VALUES")]
    filters: Vec<String>,

    /// Sort as field[:asc|desc]
    #[arg(long)]
    sort: Option<String>,

    /// Page number, starting at 1
    #[arg(long)]
    page: Option<usize>,

    #[arg(long)]
    page_size: Option<usize>,

    /// Neither restore nor save filters
    #[arg(long)]
    no_persist: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = paths::data_dir(cli.data_dir.as_deref())?;
    let _log_guard = logging::init(
        logging::LoggingConfig::new(paths::log_dir(&data_dir))
            .verbose(cli.verbose)
            .with_json_logs(cli.log_file),
    )?;

    match cli.command {
        Command::View(args) => {
            let runtime = build_runtime(&args, &data_dir)?;
            print_page(&runtime);
        }
        Command::Export {
            view,
            out,
            page_only,
        } => {
            let mut runtime = build_runtime(&view, &data_dir)?;
            let scope = if page_only {
                ExportScope::CurrentPage
            } else {
                ExportScope::Filtered
            };
            let Some(export) = runtime.export_csv(scope) else {
                bail!("export is disabled in {}", view.config.display());
            };
            let path = out.unwrap_or_else(|| PathBuf::from(&export.filename));
            std::fs::write(&path, export.content.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} rows to {}", export.row_count, path.display());
        }
        Command::Filters { action } => {
            paths::ensure_directories(&data_dir)?;
            let store: Arc<dyn FilterStore> =
                Arc::new(SqliteFilterStore::open(paths::filters_db(&data_dir))?);
            match action {
                FiltersCommand::Show(args) => show_filters(store, &args)?,
                FiltersCommand::Clear(args) => {
                    let persistence = FilterPersistence::new(store, storage_key(&args)?);
                    persistence.clear();
                    println!("Cleared {}", persistence.key());
                }
            }
        }
    }

    Ok(())
}

fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rows from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of objects", path.display()))
}

fn build_runtime(args: &ViewArgs, data_dir: &Path) -> Result<TableRuntime> {
    let mut config = TableConfig::load(&args.config)?;
    if args.no_persist {
        config.filtering.persist_filters = false;
    }
    let persist = config.filtering.persist_filters;
    let rows = load_rows(&args.rows)?;
    tracing::debug!(rows = rows.len(), columns = config.columns.len(), "loaded table");

    let mut runtime = TableRuntime::new(config).with_rows(rows);
    if persist {
        paths::ensure_directories(data_dir)?;
        let store = SqliteFilterStore::open(paths::filters_db(data_dir))?;
        runtime = runtime.with_filter_store(Arc::new(store));
    }

    if let Some(term) = &args.search {
        runtime.set_search_term(term.clone());
    }
    if let Some(quick) = &args.quick {
        runtime.set_quick_filter(Some(parse_value(quick)));
    }
    for filter in &args.filters {
        runtime.set_advanced_filter(parse_filter(filter)?);
    }
    if let Some(sort) = &args.sort {
        runtime.set_sort(Some(parse_sort(sort)?));
    }
    if let Some(size) = args.page_size {
        runtime.set_page_size(size);
    }
    if let Some(page) = args.page {
        runtime.set_page(page.saturating_sub(1));
    }

    for event in runtime.drain_events() {
        tracing::debug!(kind = event.kind(), "applied");
    }
    Ok(runtime)
}

/// JSON literals (numbers, booleans, lists) keep their type; anything else is a string
fn parse_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn parse_filter(text: &str) -> Result<AdvancedFilter> {
    let Some((field, values)) = text.split_once('=') else {
        bail!("filter '{}' is not of the form field=value", text);
    };
    let field = field.trim();
    if field.is_empty() {
        bail!("filter '{}' has no field", text);
    }

    let mut values: Vec<Value> = values.split('|').map(|v| parse_value(v.trim())).collect();
    let value = if values.len() == 1 {
        values.remove(0)
    } else {
        Value::Array(values)
    };
    Ok(AdvancedFilter::new(field, value))
}

fn parse_sort(text: &str) -> Result<SortSpec> {
    let (field, direction) = match text.rsplit_once(':') {
        Some((field, direction)) => {
            let direction = SortDirection::parse(direction)
                .with_context(|| format!("unknown sort direction '{}'", direction))?;
            (field, direction)
        }
        None => (text, SortDirection::Ascending),
    };
    Ok(SortSpec::new(field.trim(), direction))
}

fn storage_key(args: &FilterKeyArgs) -> Result<String> {
    match (&args.key, &args.table_id) {
        (Some(key), _) => Ok(key.clone()),
        (None, Some(table_id)) => Ok(format!("{}{}", FILTER_KEY_PREFIX, table_id)),
        (None, None) => bail!("either --table-id or --key is required"),
    }
}

fn show_filters(store: Arc<dyn FilterStore>, args: &FilterKeyArgs) -> Result<()> {
    let persistence = FilterPersistence::new(store, storage_key(args)?);
    let Some(record) = persistence.read_record()? else {
        println!("No filters persisted under {}", persistence.key());
        return Ok(());
    };

    println!("{}", serde_json::to_string_pretty(&record)?);
    if let Some(saved_at) = record.saved_at() {
        let status = if record.is_expired(Utc::now()) {
            "expired"
        } else {
            "active"
        };
        println!("Saved {} ({})", saved_at.to_rfc3339(), status);
    }
    Ok(())
}

fn header_cells(columns: &[&ColumnDescriptor]) -> Vec<String> {
    columns.iter().map(|column| column.label().to_string()).collect()
}

fn print_page(runtime: &TableRuntime) {
    let columns: Vec<_> = runtime
        .visible_columns()
        .into_iter()
        .filter(|column| column.is_exportable())
        .collect();

    match runtime.view_state() {
        ViewState::Empty => {
            println!("No rows to display.");
            return;
        }
        ViewState::NoResults => {
            println!(
                "No rows match the {} active filter(s).",
                runtime.active_filter_count()
            );
            return;
        }
        _ => {}
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header_cells(&columns));

    for (_, row) in runtime.page_rows() {
        table.add_row(columns.iter().map(|column| {
            match runtime.status_display(row) {
                Some(status)
                    if runtime
                        .config()
                        .status_column
                        .as_ref()
                        .is_some_and(|s| s.field == column.field) =>
                {
                    status.label.clone()
                }
                _ => format_cell(row.value(&column.field)),
            }
        }));
    }
    println!("{table}");

    let info = runtime.page_info();
    let range = runtime.pagination().page_range();
    println!(
        "Rows {}-{} of {} (page {}/{}), {} of {} total, {} active filter(s)",
        range.start + 1,
        range.end,
        info.length,
        info.page_index + 1,
        runtime.pagination().total_pages(),
        runtime.view_len(),
        runtime.rows().len(),
        runtime.active_filter_count()
    );
}

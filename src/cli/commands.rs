//! Command implementations for the rowbind CLI
//!
//! Both commands load a mapping declaration, build a binding engine and bind
//! the whole input. `check` reports what was bound; `convert` writes the bound
//! records back out under the regenerated header.

use anyhow::{Context, Result};
use colored::*;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::app::models::declaration::MappingDeclaration;
use crate::app::services::binding_engine::{BindStats, BindingEngine, RowFilter};
use crate::app::services::converter_registry::ConverterRegistry;
use crate::cli::args::{Args, CheckArgs, Commands, ConvertArgs};
use crate::cli::csv_source::{CsvRowSource, write_rows};
use crate::constants::LOG_TARGET;
use crate::DynamicRecord;

/// Run the selected command
pub fn run(args: Args) -> Result<BindStats> {
    match args.command {
        Some(Commands::Check(check)) => run_check(check),
        Some(Commands::Convert(convert)) => run_convert(convert),
        None => anyhow::bail!("No command given"),
    }
}

/// Skips rows whose first cell starts with a marker prefix
#[derive(Debug, Clone)]
pub struct SkipMarker {
    prefix: String,
}

impl SkipMarker {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl RowFilter for SkipMarker {
    fn allow_row(&self, row: &[String]) -> bool {
        !row
            .first()
            .is_some_and(|cell| cell.trim_start().starts_with(&self.prefix))
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init();

    debug!("Logging initialized at level: {}", log_level);
}

fn build_engine(mapping: &Path) -> Result<BindingEngine> {
    let declaration = MappingDeclaration::load(mapping)
        .with_context(|| format!("Failed to load mapping {}", mapping.display()))?;
    let map = declaration.field_map()?;
    let engine = BindingEngine::new(map, ConverterRegistry::shared(), declaration.config.clone())
        .context("Mapping declaration is not usable")?;
    Ok(engine)
}

/// Records bound from one input, with the header they were read under
struct BoundInput {
    records: Vec<DynamicRecord>,
    header: Option<Vec<String>>,
    stats: BindStats,
}

/// Bind every row of the input
fn bind_input(
    engine: &BindingEngine,
    input: &Path,
    skip_marker: Option<&str>,
) -> Result<BoundInput> {
    let mut source = CsvRowSource::from_path(input)?;
    let filter = skip_marker.map(SkipMarker::new);

    let mut session = engine.session::<DynamicRecord>();
    let records = session
        .convert_all(&mut source, filter.as_ref().map(|f| f as &dyn RowFilter))
        .with_context(|| format!("Failed to bind {}", input.display()))?;
    let header = session
        .bindings()
        .and_then(|bindings| bindings.header())
        .map(<[String]>::to_vec);
    Ok(BoundInput {
        records,
        header,
        stats: session.stats().clone(),
    })
}

/// Validate the input against the declaration and report the outcome
pub fn run_check(args: CheckArgs) -> Result<BindStats> {
    setup_logging(args.get_log_level());
    args.validate()?;
    info!("Checking {}", args.input.display());

    let engine = build_engine(&args.mapping)?;
    let bound = bind_input(&engine, &args.input, args.skip_marker.as_deref())?;
    let stats = bound.stats;

    // Formatting catches mandatory values that cannot be written back
    engine
        .format_all(&bound.records)
        .context("Bound records cannot be written back")?;

    if !args.quiet {
        print_summary(&mut io::stdout(), &args.input, &stats)?;
    }
    Ok(stats)
}

/// Bind the input and write it back out under the regenerated header
pub fn run_convert(args: ConvertArgs) -> Result<BindStats> {
    setup_logging(args.get_log_level());
    args.validate()?;
    info!("Converting {}", args.input.display());

    let engine = build_engine(&args.mapping)?;
    let bound = bind_input(&engine, &args.input, args.skip_marker.as_deref())?;
    let stats = bound.stats;
    let rows = engine.format_all_with_header(&bound.records, bound.header.as_deref())?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_rows(file, &rows)?;
            info!("Wrote {} rows to {}", rows.len(), path.display());
        }
        None => write_rows(io::stdout().lock(), &rows)?,
    }

    if !args.quiet {
        print_summary(&mut io::stderr(), &args.input, &stats)?;
    }
    Ok(stats)
}

fn print_summary(out: &mut dyn io::Write, input: &Path, stats: &BindStats) -> Result<()> {
    writeln!(out, "{}", "Binding Summary".bright_green().bold())?;
    writeln!(out, "  Input:          {}", input.display())?;
    writeln!(
        out,
        "  Rows read:      {}",
        stats.rows_read.to_string().bright_white().bold()
    )?;
    writeln!(out, "  Rows skipped:   {}", stats.rows_filtered)?;
    writeln!(
        out,
        "  Records bound:  {}",
        stats.records_bound.to_string().bright_white().bold()
    )?;
    Ok(())
}

//! `mitma` — run and inspect the MITMA mobility indicator tables.
//!
//! ```text
//! mitma --config pipeline.json init
//! mitma --sqlite mitma.db run --start-date 2020-02-21 --end-date 2020-06-01
//! mitma --sqlite mitma.db run --only qrp
//! mitma --sqlite mitma.db latest
//! mitma --sqlite mitma.db query qrp --from 2020-03-01 --to 2020-03-07 --region 2807901
//! mitma --sqlite mitma.db query flux --province 08
//! mitma --csv-dir out drop trips_matrix
//! ```
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `info`).

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mitma_core::{
    NaiveDate, OutputGroup, OutputTable, PipelineConfig, RegionId, StoreConfig, parse_date,
};
use mitma_runner::{LogObserver, RunnerBuilder};
use mitma_store::{OutputRows, RowFilter, TableRow, TableStore, open_store};

#[derive(Parser)]
#[command(name = "mitma")]
#[command(about = "MITMA mobility indicators - incremental q/r/p, flux and trip tables", long_about = None)]
struct Cli {
    /// JSON pipeline config; every field is optional
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Use this SQLite database instead of the configured store
    #[arg(long, global = true, conflicts_with = "csv_dir")]
    sqlite: Option<PathBuf>,

    /// Use one CSV file per table in this directory instead of the configured store
    #[arg(long, global = true)]
    csv_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the enabled output tables
    Init,
    /// Process every day after the stored watermark
    Run {
        /// First day to process (YYYY-MM-DD or YYYYMMDD); defaults to watermark + 1
        #[arg(long, value_parser = parse_date)]
        start_date: Option<NaiveDate>,
        /// Stop before this day
        #[arg(long, value_parser = parse_date)]
        end_date: Option<NaiveDate>,
        /// Output groups to compute: qrp, trips, matrix
        #[arg(long, value_delimiter = ',')]
        only: Vec<OutputGroup>,
        /// Directory of daily trip files
        #[arg(long)]
        trips_dir: Option<PathBuf>,
        /// Directory of daily population files
        #[arg(long)]
        population_dir: Option<PathBuf>,
    },
    /// Print the latest stored day of every table
    Latest,
    /// Dump rows of one table as CSV to stdout
    Query {
        /// Table name (qrp, flux, trips, trips_matrix, or the full mitma_* name)
        table: OutputTable,
        /// First day, inclusive
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        /// Last day, inclusive
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
        /// Region code, matched on source or target; repeat for several
        #[arg(long)]
        region: Vec<RegionId>,
        /// Province code (first two digits of a region code)
        #[arg(long, value_parser = parse_prefix::<2>)]
        province: Vec<String>,
        /// Municipality code (first five digits of a region code)
        #[arg(long, value_parser = parse_prefix::<5>)]
        municipality: Vec<String>,
    },
    /// Drop a table and all its rows
    Drop {
        table: OutputTable,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = cli.sqlite {
        config.store = StoreConfig::Sqlite { path };
    } else if let Some(dir) = cli.csv_dir {
        config.store = StoreConfig::Csv { dir };
    }

    match cli.command {
        Commands::Init => cmd_init(&config),
        Commands::Run { start_date, end_date, only, trips_dir, population_dir } => {
            if let Some(dir) = trips_dir {
                config.trips_dir = dir;
            }
            if let Some(dir) = population_dir {
                config.population_dir = dir;
            }
            cmd_run(config, start_date, end_date, only)
        }
        Commands::Latest => cmd_latest(&config),
        Commands::Query { table, from, to, region, province, municipality } => {
            let filter = RowFilter {
                from,
                to,
                regions:  region,
                prefixes: province.into_iter().chain(municipality).collect(),
            };
            cmd_query(&config, table, &filter)
        }
        Commands::Drop { table } => cmd_drop(&config, table),
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

/// A code prefix of exactly `N` ASCII digits.
fn parse_prefix<const N: usize>(s: &str) -> Result<String, String> {
    let s = s.trim();
    if s.len() == N && s.bytes().all(|b| b.is_ascii_digit()) {
        Ok(s.to_owned())
    } else {
        Err(format!("expected {N} digits, got {s:?}"))
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn cmd_init(config: &PipelineConfig) -> Result<()> {
    let mut store = open_store(&config.store)?;
    for table in config.tables() {
        store.create_schema(table)?;
        info!(%table, "table ready");
    }
    Ok(())
}

fn cmd_run(
    config:     PipelineConfig,
    start_date: Option<NaiveDate>,
    end_date:   Option<NaiveDate>,
    only:       Vec<OutputGroup>,
) -> Result<()> {
    let store = open_store(&config.store)?;
    let mut builder = RunnerBuilder::new(config, store);
    if let Some(date) = start_date {
        builder = builder.start_date(date);
    }
    if let Some(date) = end_date {
        builder = builder.end_date(date);
    }
    if !only.is_empty() {
        builder = builder.outputs(only);
    }

    let mut runner = builder.build()?;
    let summary = runner.run(&mut LogObserver)?;
    print!("{summary}");
    Ok(())
}

fn cmd_latest(config: &PipelineConfig) -> Result<()> {
    let store = open_store(&config.store)?;
    for table in OutputTable::ALL {
        match store.latest_date(table)? {
            Some(date) => println!("{table:<20} {date}"),
            None => println!("{table:<20} -"),
        }
    }
    Ok(())
}

fn cmd_query(config: &PipelineConfig, table: OutputTable, filter: &RowFilter) -> Result<()> {
    let store = open_store(&config.store)?;
    let rows = store.query(table, filter)?;

    let mut out = csv::WriterBuilder::new().has_headers(false).from_writer(io::stdout().lock());
    out.write_record(table.columns())?;
    match &rows {
        OutputRows::Trips(rows)       => write_rows(&mut out, rows)?,
        OutputRows::TripsMatrix(rows) => write_rows(&mut out, rows)?,
        OutputRows::Qrp(rows)         => write_rows(&mut out, rows)?,
        OutputRows::Flux(rows)        => write_rows(&mut out, rows)?,
    }
    out.flush()?;
    Ok(())
}

fn cmd_drop(config: &PipelineConfig, table: OutputTable) -> Result<()> {
    let mut store = open_store(&config.store)?;
    store.drop_table(table)?;
    info!(%table, "table dropped");
    Ok(())
}

fn write_rows<W: io::Write, T: TableRow>(out: &mut csv::Writer<W>, rows: &[T]) -> Result<()> {
    for row in rows {
        out.serialize(row)?;
    }
    Ok(())
}

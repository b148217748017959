//! filefind - filesystem fingerprint index
//!
//! Entry point for the CLI application.

mod cli;

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use clap::Parser;
use filefind::config::default_config_path;
use filefind::{
    list_partitions, local_machine_name, resolve_listing_id, FileRecord, FilefindConfig, FsWalker,
    IndexBuilder, PredicateEngine, QueryRunner, ReportSorter, SelectionCriteria, SnapshotDatastore,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, QueryArgs};

const FATAL_EXIT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let started = Instant::now();
    let result = run(cli);
    info!("total execution time {:.3?}", started.elapsed());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Fatal Error: {:#}", e);
            ExitCode::from(FATAL_EXIT)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let mut config = FilefindConfig::load(&config_path)
        .with_context(|| format!("Invalid configuration {}", config_path.display()))?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }

    match cli.command {
        Command::Build {
            root,
            machine,
            follow_links,
        } => {
            let machine = machine.unwrap_or_else(local_machine_name);
            run_build(&config, &root, &machine, follow_links)
        }
        Command::List { machine } => run_list(&config, machine.as_deref()),
        Command::Query(args) => run_query(&config, args),
    }
}

fn open_store(config: &FilefindConfig) -> Result<SnapshotDatastore> {
    SnapshotDatastore::open(&config.store_path)
        .with_context(|| format!("Failed to open store {}", config.store_path.display()))
}

fn run_build(
    config: &FilefindConfig,
    root: &Path,
    machine: &str,
    follow_links: bool,
) -> Result<()> {
    let mut store = open_store(config)?;
    let walker = FsWalker::new().follow_links(follow_links);
    let report = IndexBuilder::new(config, &mut store)
        .with_progress(|progress| {
            println!(
                "{} files processed ({:.0}/s)",
                progress.stats.processed,
                progress.files_per_second()
            );
        })
        .build(root, machine, &walker)?;
    store.flush().context("Failed to save store")?;

    println!(
        "Processed {} files: {} fingerprinted, {} unchanged, {} excluded, {} errors ({:.0} files/s)",
        report.stats.processed,
        report.stats.recomputed,
        report.stats.skipped,
        report.stats.excluded,
        report.stats.errors,
        report.files_per_second()
    );
    Ok(())
}

fn run_list(config: &FilefindConfig, machine: Option<&str>) -> Result<()> {
    let mut store = open_store(config)?;
    let listing = list_partitions(&mut store, &config.namespace, machine)?;
    store.flush().context("Failed to save listing")?;

    if listing.is_empty() {
        println!("No partitions indexed");
    }
    for entry in &listing {
        match entry.partition() {
            Some(key) => println!(
                "{:>4}  {:<16} {} ({} files)",
                entry.id, key.machine, key.root, entry.entries
            ),
            None => println!("{:>4}  {} ({} files)", entry.id, entry.key, entry.entries),
        }
    }
    Ok(())
}

fn run_query(config: &FilefindConfig, args: QueryArgs) -> Result<()> {
    let store = open_store(config)?;
    let partition = resolve_listing_id(&store, &args.id)?;

    let engine = PredicateEngine::new(config)?;
    let criteria = SelectionCriteria {
        name: args.name,
        path: args.path,
        any: args.any,
        ext: args.ext,
        size: args.size,
        date: args.date,
    };
    let mut predicate = engine.build(&criteria, &args.work)?;
    let sorter = ReportSorter::parse(args.sort.as_slice())?;

    let mut outcome = QueryRunner::new(config, &store).run(&partition, &mut predicate)?;
    sorter.sort(&mut outcome.matches);

    let offset = config.reference_offset()?;
    for record in &outcome.matches {
        println!("{}", format_match(record, offset));
    }
    println!(
        "{} of {} files selected in {:.3?}",
        outcome.selected, outcome.read, outcome.elapsed
    );
    Ok(())
}

fn format_match(record: &FileRecord, offset: FixedOffset) -> String {
    let date = DateTime::from_timestamp(record.modified_at, 0)
        .map(|date| date.with_timezone(&offset).format("%m/%d/%Y %H:%M").to_string())
        .unwrap_or_else(|| "??/??/???? ??:??".to_string());
    format!(
        "{date}  {:>14}  {}  {}",
        record.size, record.content_hash, record.path
    )
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("filefind=debug,warn")
        } else {
            EnvFilter::new("filefind=info,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

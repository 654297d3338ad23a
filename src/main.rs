//! Repodump CLI - export a repository object graph to a single XML document.
//!
//! This is the main entry point for the repodump command-line application.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use repodump::export::split_list;
use repodump::prelude::*;

/// Repodump - repository to XML export tool
#[derive(Parser)]
#[command(name = "repodump")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a repository snapshot to XML
    Export {
        /// Path to the JSON repository snapshot
        #[arg(short, long, env = "REPODUMP_SNAPSHOT")]
        snapshot: PathBuf,

        /// Output XML file
        #[arg(short, long, env = "REPODUMP_OUTPUT", default_value = "OpenDMA.xml")]
        output: PathBuf,

        /// Write content values to numbered files
        #[arg(long, env = "REPODUMP_EXPORT_CONTENT")]
        export_content: bool,

        /// Directory for content files
        #[arg(long, env = "REPODUMP_CONTENT_DIR", default_value = "data")]
        content_dir: PathBuf,

        /// Class name patterns never followed (regex on `namespace:name`)
        #[arg(long = "exclude-class", env = "REPODUMP_EXCLUDE_CLASSES")]
        exclude_classes: Vec<String>,

        /// Object ids never followed
        #[arg(long = "exclude-id", env = "REPODUMP_EXCLUDE_IDS")]
        exclude_ids: Vec<String>,

        /// Verbosity: 0 = warnings, 1 = progress, 2 = per object
        #[arg(short, long, env = "REPODUMP_VERBOSITY", default_value_t = 1)]
        verbosity: u8,
    },

    /// Print the class hierarchy of a repository snapshot
    Classes {
        /// Path to the JSON repository snapshot
        #[arg(short, long, env = "REPODUMP_SNAPSHOT")]
        snapshot: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            snapshot,
            output,
            export_content,
            content_dir,
            exclude_classes,
            exclude_ids,
            verbosity,
        } => {
            // Each value may itself be a blank-separated list.
            let config = ExportConfig::new()
                .with_exclude_classes(exclude_classes.iter().flat_map(|list| split_list(list)))
                .with_exclude_ids(exclude_ids.iter().flat_map(|list| split_list(list)))
                .with_export_content(export_content)
                .with_content_directory(content_dir)
                .with_verbosity(verbosity);
            cmd_export(&snapshot, &output, config)?;
        }
        Commands::Classes { snapshot } => {
            cmd_classes(&snapshot)?;
        }
    }

    Ok(())
}

fn load_snapshot(path: &PathBuf) -> Result<MemoryRepository> {
    let snapshot = Snapshot::load(path).context("Failed to read repository snapshot")?;
    snapshot
        .into_repository()
        .context("Failed to build repository from snapshot")
}

fn cmd_export(snapshot: &PathBuf, output: &PathBuf, config: ExportConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    println!("Loading snapshot: {}", snapshot.display());

    let start = Instant::now();
    let repo = load_snapshot(snapshot)?;

    println!(
        "Loaded {} in {:?}: {} classes, {} objects",
        repo.name(),
        start.elapsed(),
        repo.class_count(),
        repo.object_count()
    );
    println!("Exporting to {}...", output.display());

    let exporter = XmlExporter::new(&repo, config).context("Invalid export configuration")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    let start = Instant::now();
    let file = std::fs::File::create(output).context("Failed to create output file")?;
    let stats = exporter
        .export_with_progress(std::io::BufWriter::new(file), |progress| {
            pb.set_message(format!(
                "{} exported, {} pending",
                progress.exported, progress.pending
            ));
        })
        .context("Export failed")?;

    pb.finish_with_message("Done");
    println!(
        "Exported {} objects ({} inline) and {} content files in {:?}",
        stats.objects,
        stats.inline_objects,
        stats.content_files,
        start.elapsed()
    );

    if !stats.is_clean() {
        println!(
            "Recovered from errors: {} properties, {} missing objects, {} failed fetches, {} duplicates",
            stats.property_failures,
            stats.fetch_misses,
            stats.fetch_failures,
            stats.duplicate_dumps
        );
    }

    Ok(())
}

fn cmd_classes(snapshot: &PathBuf) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let repo = load_snapshot(snapshot)?;
    let root = repo.root_class().context("Failed to read root class")?;

    let mut count = 0;
    let mut stack = vec![(root, 0usize)];
    while let Some((class, depth)) = stack.pop() {
        let declared = class.declared_properties().map(|p| p.len()).unwrap_or(0);
        println!(
            "{:indent$}{} {}({} properties)",
            "",
            class.qname(),
            if class.is_retrievable() { "" } else { "[inline] " },
            declared,
            indent = depth * 2
        );
        count += 1;

        match class.sub_classes() {
            Ok(children) => {
                stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
            }
            Err(e) => warn!(class = %class.qname(), error = %e, "failed to list subclasses"),
        }
    }

    println!("\nTotal: {} classes", count);

    Ok(())
}

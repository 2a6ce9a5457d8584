//! unify - Schema merge and transform CLI tool
//!
//! Merges vendor API specification documents and prepares the result for SDK
//! generation. Also compares datacenter and campus documents field by field
//! and merges partial test fixtures.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use schema_unify::compare::{Comparator, EndpointListing, LookupTable, Scope};
use schema_unify::config::Config;
use schema_unify::document::{Document, Format};
use schema_unify::fixture::{merge_resources, render_resources};
use schema_unify::merge::merge_all;
use schema_unify::pipeline::Pipeline;
use schema_unify::transform::{convert_single_property_objects, normalize_nullability, prune_endpoints};
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "unify", version, about = "Merge and transform API specification documents")]
struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct OutputArg {
    /// Output location. Use '-' for stdout
    #[arg(short, long, default_value = "-")]
    output: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge, prune, normalize and transform in one run
    Process {
        base: PathBuf,
        #[arg(required = true)]
        overlays: Vec<PathBuf>,
        #[arg(short, long, default_value = "merged_transformed.json")]
        output: String,
        /// Also write the merged, pruned and nullable intermediate documents
        #[arg(long)]
        keep_intermediate: bool,
    },
    /// Deep merge overlays into a base document
    Merge {
        base: PathBuf,
        #[arg(required = true)]
        overlays: Vec<PathBuf>,
        #[command(flatten)]
        out: OutputArg,
    },
    /// Remove endpoints; defaults to the configured exclusion list
    Prune {
        input: PathBuf,
        #[arg(short, long = "endpoint")]
        endpoints: Vec<String>,
        #[command(flatten)]
        out: OutputArg,
    },
    /// Make integer and number fields nullable
    Nullable {
        input: PathBuf,
        #[command(flatten)]
        out: OutputArg,
    },
    /// Turn single-property request objects into dynamic maps
    Transform {
        input: PathBuf,
        #[command(flatten)]
        out: OutputArg,
    },
    /// Classify request-body fields as common, datacenter-only or campus-only
    Compare {
        #[arg(long)]
        datacenter: PathBuf,
        #[arg(long)]
        campus: PathBuf,
        /// Compare a single endpoint
        #[arg(short, long, conflicts_with = "common_only")]
        endpoint: Option<String>,
        /// Compare only endpoints present in both documents
        #[arg(long)]
        common_only: bool,
        /// Print the endpoint sets and exit
        #[arg(long)]
        list_endpoints: bool,
        /// Emit the per-resource lookup table instead of the full report
        #[arg(long)]
        lookup: bool,
        #[command(flatten)]
        out: OutputArg,
    },
    /// Apply a partial fixture over a complete one (.tf, JSON or YAML)
    FixtureMerge {
        base: PathBuf,
        overlay: PathBuf,
        #[command(flatten)]
        out: OutputArg,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => Config::load_file(path)?,
        None => Config::default(),
    };
    let load = |path: &Path| Document::load_file(path, config.max_depth);

    match cli.command {
        Command::Process {
            base,
            overlays,
            output,
            keep_intermediate,
        } => {
            let overlays = overlays.iter().map(|p| load(p.as_path())).collect::<Result<Vec<_>, _>>()?;
            let (doc, report) = Pipeline::new(config.clone())
                .keep_intermediate(keep_intermediate)
                .run(load(base.as_path())?, &overlays)?;

            for (stage, snapshot) in &report.snapshots {
                let path = intermediate_path(&output, stage.file_suffix());
                write_document(snapshot, &path)?;
                eprintln!("Intermediate file saved: {}", path);
            }
            write_document(&doc, &output)?;

            eprintln!("Total paths: {}", report.path_count);
            eprintln!("Endpoints removed: {}", report.pruned.removed.len());
            eprintln!("Numeric fields made nullable: {}", report.nullable_count);
            eprintln!("Schema transformations: {}", report.conversions.len());
        }
        Command::Merge { base, overlays, out } => {
            let overlays = overlays.iter().map(|p| load(p.as_path())).collect::<Result<Vec<_>, _>>()?;
            let doc = merge_all(load(base.as_path())?, &overlays);
            write_document(&doc, &out.output)?;
        }
        Command::Prune { input, endpoints, out } => {
            let mut doc = load(input.as_path())?;
            let report = if endpoints.is_empty() {
                prune_endpoints(&mut doc, &config.exclusions.excluded_endpoints)
            } else {
                prune_endpoints(&mut doc, &endpoints)
            };
            write_document(&doc, &out.output)?;
            eprintln!("Removed {} endpoints", report.removed.len());
        }
        Command::Nullable { input, out } => {
            let mut doc = load(input.as_path())?;
            let count = normalize_nullability(&mut doc);
            write_document(&doc, &out.output)?;
            eprintln!("Made {} numeric fields nullable", count);
        }
        Command::Transform { input, out } => {
            let mut doc = load(input.as_path())?;
            let conversions = convert_single_property_objects(&mut doc, &config.exclusions)?;
            write_document(&doc, &out.output)?;
            eprintln!("Applied {} schema transformations", conversions.len());
        }
        Command::Compare {
            datacenter,
            campus,
            endpoint,
            common_only,
            list_endpoints,
            lookup,
            out,
        } => {
            let dc = load(datacenter.as_path())?;
            let campus = load(campus.as_path())?;
            let comparator = Comparator::new(&dc, &campus, &config.exclusions);

            if list_endpoints {
                let mut output = open_output(&out.output)?;
                print_listing(&comparator.listing(), &mut output)?;
                return Ok(());
            }

            let scope = match endpoint {
                Some(endpoint) => Scope::Endpoint(endpoint),
                None if common_only => Scope::CommonOnly,
                None => Scope::All,
            };
            let report = comparator.compare(&scope)?;

            let text = if lookup {
                serde_json::to_string_pretty(&LookupTable::from_report(&report))?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            let mut output = open_output(&out.output)?;
            writeln!(output, "{}", text)?;
        }
        Command::FixtureMerge { base, overlay, out } => {
            let merged = merge_resources(&load(base.as_path())?, &load(overlay.as_path())?)?;
            let mut output = open_output(&out.output)?;
            write!(output, "{}", render_resources(&merged)?)?;
        }
    }

    Ok(())
}

fn open_output(output: &str) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
    if output == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        let file = fs::File::create(output)
            .map_err(|e| format!("Failed to create output file {:?}: {}", output, e))?;
        Ok(Box::new(file))
    }
}

fn write_document(doc: &Document, output: &str) -> Result<(), Box<dyn std::error::Error>> {
    let text = doc.to_text(Format::from_path(Path::new(output)))?;
    let mut out = open_output(output)?;
    write!(out, "{}", text)?;
    Ok(())
}

/// `out.json` with suffix `merged_only` becomes `out_merged_only.json`.
fn intermediate_path(output: &str, suffix: &str) -> String {
    let path = Path::new(output);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(output);
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext),
        None => format!("{}_{}", stem, suffix),
    };
    path.with_file_name(name).to_string_lossy().into_owned()
}

fn print_listing(listing: &EndpointListing, output: &mut dyn Write) -> io::Result<()> {
    writeln!(output, "Datacenter-only endpoints:")?;
    for endpoint in &listing.datacenter_only {
        writeln!(output, "  {}", endpoint)?;
    }
    writeln!(output, "\nCampus-only endpoints:")?;
    for endpoint in &listing.campus_only {
        writeln!(output, "  {}", endpoint)?;
    }
    writeln!(output, "\nCommon endpoints:")?;
    for endpoint in &listing.common {
        writeln!(output, "  {}", endpoint)?;
    }
    writeln!(
        output,
        "\nTotal: {} datacenter, {} campus, {} common",
        listing.datacenter_total,
        listing.campus_total,
        listing.common.len()
    )
}

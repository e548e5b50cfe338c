use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jsonschema_arena_core::{
    normalize_document, NodeKey, NormalizeOptions, SchemaArena, SchemaNode, Transform,
};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "jsonschema-arena")]
#[command(about = "Normalize a JSON Schema node arena into single-concern form")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the transform pipeline to a fixed point
    Normalize {
        /// Input node document (array of nodes, or object of location → node)
        input: PathBuf,

        /// Output arena file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output pass statistics file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Options file (JSON, kebab-case keys); flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Maximum number of passes before giving up
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Run only these transforms, in the order given (repeatable)
        #[arg(long = "transform", value_name = "NAME")]
        transforms: Vec<Transform>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Follow alias links from a key in the input document
    Resolve {
        /// Input node document
        input: PathBuf,

        /// Key to resolve
        key: NodeKey,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

#[derive(Serialize)]
struct Resolved<'a> {
    key: NodeKey,
    node: &'a SchemaNode,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Normalize {
            input,
            output,
            report,
            config,
            max_iterations,
            transforms,
            format,
        } => {
            let document = read_json(&input, "document")?;

            let mut options = match config {
                Some(path) => serde_json::from_value::<NormalizeOptions>(read_json(&path, "options")?)
                    .with_context(|| format!("Invalid options in: {}", path.display()))?,
                None => NormalizeOptions::default(),
            };
            if let Some(max_iterations) = max_iterations {
                options.max_iterations = max_iterations;
            }
            if !transforms.is_empty() {
                options.transforms = transforms;
            }

            let result = normalize_document(&document, &options).map_err(|e| {
                let code = e.error_code();
                anyhow::Error::from(e).context(format!("Normalization failed [{:?}]", code))
            })?;
            tracing::info!(
                iterations = result.report.iterations,
                changes = result.report.changes,
                size = result.report.size,
                "normalized {}",
                input.display()
            );

            write_json(&result.arena, output.as_ref(), format)?;

            if let Some(path) = report {
                write_json(&result.report, Some(&path), format)?;
            }
        }
        Commands::Resolve { input, key, format } => {
            let document = read_json(&input, "document")?;
            let (arena, _) = SchemaArena::load_document(&document)
                .map_err(|e| anyhow::Error::from(e).context("Failed to load document"))?;

            let (key, node) = arena
                .resolve_item(key)
                .map_err(|e| anyhow::Error::from(e).context("Resolution failed"))?;

            write_json(&Resolved { key, node }, None, format)?;
        }
    }

    Ok(())
}

fn read_json(path: &Path, what: &str) -> Result<Value> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {} from: {}", what, path.display()))
}

fn write_json<T: Serialize>(val: &T, path: Option<&PathBuf>, format: OutputFormat) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}

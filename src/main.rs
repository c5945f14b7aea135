//! h2retrofit CLI - parametric hydrogen retrofit model

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use h2retrofit::error::{FixSuggestion, RetrofitError};
use h2retrofit::graph::NodeKind;
use h2retrofit::output::{OutputFormat, Summary};
use h2retrofit::persist::{self, ModelFile};
use h2retrofit::report;
use h2retrofit::{AircraftModel, ModelConfig, SeatingConfig};

#[derive(Parser)]
#[command(name = "h2retrofit")]
#[command(about = "Parametric model of a hydrogen-retrofitted single-aisle aircraft")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every output and print a summary
    Evaluate {
        #[command(flatten)]
        model: ModelArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Write the design report
    Report {
        #[command(flatten)]
        model: ModelArgs,

        /// Report file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Baseline aircraft named in the header
        #[arg(long, default_value = "A320")]
        baseline: String,
    },

    /// Save the current inputs to a model file
    Save {
        #[command(flatten)]
        model: ModelArgs,

        /// Destination .json file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Validate a model file (schema, ids and value kinds)
    Validate {
        /// Path to model .json file
        file: PathBuf,
    },

    /// List node ids with their kind and dependencies
    Nodes,
}

/// Where the model's inputs come from
#[derive(Args)]
struct ModelArgs {
    /// Start from a saved model file instead of the baseline
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Seating configuration in the text format
    #[arg(short, long)]
    seating: Option<PathBuf>,

    /// YAML file overriding model constants
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Set an input, e.g. --set fuselage.length=30 (repeatable)
    #[arg(long = "set", value_name = "ID=VALUE")]
    set: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate { model, format } => evaluate(&model, format),
        Commands::Report {
            model,
            output,
            baseline,
        } => write_report(&model, output, &baseline),
        Commands::Save { model, output } => save(&model, &output),
        Commands::Validate { file } => validate(&file),
        Commands::Nodes => list_nodes(),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn build_model(args: &ModelArgs) -> Result<AircraftModel, RetrofitError> {
    let config = match &args.config {
        Some(path) => ModelConfig::load(path)?,
        None => ModelConfig::default(),
    };

    let mut model = match &args.model {
        Some(path) => persist::load(path, config)?,
        None => AircraftModel::new(config)?,
    };

    if let Some(path) = &args.seating {
        let text = fs::read_to_string(path)?;
        model.set_seating(SeatingConfig::parse(&text)?)?;
    }

    for assignment in &args.set {
        let (id, raw) = assignment
            .split_once('=')
            .ok_or_else(|| RetrofitError::InvalidInput {
                id: assignment.clone(),
                details: "expected ID=VALUE".to_string(),
            })?;
        let id = id.trim();
        let node = model.engine().node(id)?;
        if node.kind() != NodeKind::Input {
            return Err(RetrofitError::NotAnInput { id: id.to_string() });
        }
        let value = node
            .cached()
            .ok_or_else(|| RetrofitError::UnknownNode { id: id.to_string() })?
            .parse_like(raw)
            .map_err(|details| RetrofitError::InvalidInput {
                id: id.to_string(),
                details,
            })?;
        model.set_input(id, value)?;
    }

    Ok(model)
}

fn evaluate(args: &ModelArgs, format: OutputFormat) -> Result<(), RetrofitError> {
    let mut model = build_model(args)?;
    let summary = Summary::collect(&mut model);
    print!("{}", summary.render(format)?);
    if format == OutputFormat::Text {
        println!();
    }

    if summary.is_complete() {
        return Ok(());
    }
    // surface the first failing node as the exit error
    let ids: Vec<String> = model.engine().node_ids().map(str::to_string).collect();
    for id in ids {
        model.get(&id)?;
    }
    Ok(())
}

fn write_report(args: &ModelArgs, output: Option<PathBuf>, baseline: &str) -> Result<(), RetrofitError> {
    let mut model = build_model(args)?;
    match output {
        Some(path) => {
            report::write_report(&mut model, baseline, &path)?;
            println!("{} Report written to {}", "✓".green(), path.display());
        }
        None => print!("{}", report::design_report(&mut model, baseline)),
    }
    Ok(())
}

fn save(args: &ModelArgs, output: &Path) -> Result<(), RetrofitError> {
    let model = build_model(args)?;
    persist::save(&model, output)?;
    println!("{} Model saved to {}", "✓".green(), output.display());
    Ok(())
}

fn validate(file: &Path) -> Result<(), RetrofitError> {
    let json = fs::read_to_string(file)?;
    let model_file = ModelFile::from_json(&json)?;
    let count = model_file.inputs.len();
    let mut model = AircraftModel::baseline()?;
    model_file.apply(&mut model)?;

    println!("{} Model '{}' is valid", "✓".green(), file.display());
    println!("  Inputs: {}", count);
    Ok(())
}

fn list_nodes() -> Result<(), RetrofitError> {
    let model = AircraftModel::baseline()?;
    let engine = model.engine();
    for id in engine.node_ids() {
        let kind = match engine.kind(id)? {
            NodeKind::Input => "input".cyan(),
            NodeKind::Derived => "derived".normal(),
        };
        let deps = engine.dependencies(id)?;
        if deps.is_empty() {
            println!("{:<24} {}", id, kind);
        } else {
            println!("{:<24} {:<8} <- {}", id, kind, deps.join(", "));
        }
    }
    Ok(())
}

//! Command-line interface for the smc state model checker.

mod job;

use clap::{Parser, Subcommand};
use job::Job;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Serialize;
use smc_check::{CheckOutcome, Checker, CheckerConfig, ModelCheckingInfo};
use smc_eval::Tolerance;
use smc_expr::Expr;
use smc_model::{ExplicitModel, Model, StateSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// CLI error with source context for pretty printing.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("failed to read {path}: {message}")]
    #[diagnostic(code(smc::io_error))]
    IoError { path: String, message: String },

    #[error("invalid job file: {message}")]
    #[diagnostic(code(smc::job_syntax))]
    JobSyntax {
        message: String,
        #[source_code]
        src: NamedSource<Arc<String>>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("invalid model: {message}")]
    #[diagnostic(code(smc::model_error))]
    ModelError { message: String },

    #[error("unknown property \"{name}\"")]
    #[diagnostic(
        code(smc::unknown_property),
        help("available properties: {available}")
    )]
    UnknownProperty { name: String, available: String },

    #[error("{failed} of {total} properties could not be checked")]
    #[diagnostic(code(smc::check_failed))]
    CheckFailed { failed: usize, total: usize },

    #[error("{message}")]
    #[diagnostic(code(smc::check_error))]
    CheckError { message: String },

    #[error("{message}")]
    Other { message: String },
}

impl CliError {
    fn from_json_error(e: serde_json::Error, source: Arc<String>, filename: &str) -> Self {
        let offset = job::offset_of(&source, e.line(), e.column());
        CliError::JobSyntax {
            message: e.to_string(),
            src: NamedSource::new(filename, source),
            span: (offset, 0).into(),
        }
    }
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "smc", version, long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SMC_GIT_HASH"), ")"))]
#[command(about = "State-expression model checker for explicit models", long_about = None)]
struct Cli {
    /// Log filter results and matching states (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check properties of a job file
    Check {
        /// Job file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Property to check (repeatable; default: all)
        #[arg(short, long, value_name = "NAME")]
        property: Vec<String>,

        /// Constant assignments (name=value)
        #[arg(short, long, value_name = "CONST=VALUE")]
        constant: Vec<String>,

        /// Keep the full result vector and print its nonzero entries
        #[arg(long)]
        store_vector: bool,

        /// Include zero/false entries when printing the vector
        #[arg(long, requires = "store_vector")]
        include_zeros: bool,

        /// Leave explanations out of results
        #[arg(long)]
        no_explanations: bool,

        /// Relative tolerance for "states with this value" reports
        #[arg(long, default_value = "1e-5")]
        epsilon: f64,

        /// Treat the tolerance as absolute
        #[arg(long)]
        absolute: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the satisfying states of labels
    Labels {
        /// Job file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Labels to evaluate (default: all defined labels)
        #[arg(value_name = "LABEL")]
        names: Vec<String>,
    },

    /// Print the properties of a job file
    Show {
        /// Job file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Show each property with the filter checking would add
        #[arg(long)]
        default_filter: bool,
    },

    /// Replace the maximal state formulas of a property by labels
    Extract {
        /// Job file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Property to rewrite
        #[arg(short, long, value_name = "NAME")]
        property: String,
    },
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check {
            file,
            property,
            constant,
            store_vector,
            include_zeros,
            no_explanations,
            epsilon,
            absolute,
            json,
        } => {
            let config = CheckerConfig {
                verbose: cli.verbose,
                store_vector,
                explanations: !no_explanations,
                close_tolerance: Tolerance { epsilon, absolute },
                ..Default::default()
            };
            cmd_check(&file, &property, &constant, config, include_zeros, json)
        }
        Commands::Labels { file, names } => cmd_labels(&file, &names),
        Commands::Show {
            file,
            default_filter,
        } => cmd_show(&file, default_filter),
        Commands::Extract { file, property } => cmd_extract(&file, &property),
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}

fn load_job(file: &Path) -> CliResult<(ExplicitModel, ModelCheckingInfo)> {
    let filename = file.display().to_string();
    let source = Arc::new(fs::read_to_string(file).map_err(|e| CliError::IoError {
        path: filename.clone(),
        message: e.to_string(),
    })?);

    let job: Job = serde_json::from_str(&source)
        .map_err(|e| CliError::from_json_error(e, source.clone(), &filename))?;
    job.load().map_err(|e| CliError::ModelError {
        message: e.to_string(),
    })
}

fn apply_constants(info: &mut ModelCheckingInfo, constants: &[String]) -> CliResult<()> {
    for constant in constants {
        let (name, value) = constant.split_once('=').ok_or_else(|| CliError::Other {
            message: format!("invalid constant format '{}', expected NAME=VALUE", constant),
        })?;
        let value = job::parse_value(value.trim()).ok_or_else(|| CliError::Other {
            message: format!("cannot parse value '{}'", value.trim()),
        })?;
        info.constants.insert(name.trim().to_string(), value);
    }
    Ok(())
}

fn selected_properties(info: &ModelCheckingInfo, names: &[String]) -> CliResult<Vec<(String, Expr)>> {
    if names.is_empty() {
        return Ok(info
            .properties
            .iter()
            .map(|p| (p.name.clone(), p.expr.clone()))
            .collect());
    }
    names
        .iter()
        .map(|name| {
            let expr = info
                .property(name)
                .ok_or_else(|| CliError::UnknownProperty {
                    name: name.clone(),
                    available: info
                        .properties
                        .iter()
                        .map(|p| p.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                })?;
            Ok((name.clone(), expr.clone()))
        })
        .collect()
}

/// One property's outcome, as printed with `--json`.
#[derive(Debug, Serialize)]
struct PropertyReport {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vector: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl PropertyReport {
    fn from_outcome(
        name: String,
        outcome: &CheckOutcome,
        model: &ExplicitModel,
        include_zeros: bool,
    ) -> CliResult<Self> {
        let vector = match &outcome.result.vector {
            Some(vector) => Some(
                vector
                    .format_filtered(&StateSet::full(model.num_states()), include_zeros, |s| {
                        model.describe_state(s)
                    })
                    .map_err(|e| CliError::CheckError {
                        message: e.to_string(),
                    })?,
            ),
            None => None,
        };
        Ok(Self {
            name,
            value: outcome.result.value_string(),
            explanation: outcome.result.explanation.clone(),
            vector,
            error: None,
        })
    }
}

fn cmd_check(
    file: &Path,
    properties: &[String],
    constants: &[String],
    config: CheckerConfig,
    include_zeros: bool,
    json: bool,
) -> CliResult<()> {
    let (model, mut info) = load_job(file)?;
    apply_constants(&mut info, constants)?;
    let selected = selected_properties(&info, properties)?;
    if selected.is_empty() {
        warn!("no properties to check");
        return Ok(());
    }

    info!(
        states = model.num_states(),
        initial = model.num_initial_states(),
        properties = selected.len(),
        "model checking..."
    );
    let checker = Checker::new(info, config);
    let start = Instant::now();

    let mut reports = Vec::with_capacity(selected.len());
    for (name, expr) in selected {
        let report = match checker.check(&model, &expr) {
            Ok(outcome) => PropertyReport::from_outcome(name, &outcome, &model, include_zeros)?,
            Err(e) => PropertyReport {
                name,
                value: None,
                explanation: None,
                vector: None,
                error: Some(e.to_string()),
            },
        };
        reports.push(report);
    }
    let elapsed = start.elapsed();

    if json {
        let out = serde_json::to_string_pretty(&reports).map_err(|e| CliError::Other {
            message: e.to_string(),
        })?;
        println!("{}", out);
    } else {
        for report in &reports {
            print_report(report);
        }
        println!();
        println!("Time: {:.3}s", elapsed.as_secs_f64());
    }

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        return Err(CliError::CheckFailed {
            failed,
            total: reports.len(),
        });
    }
    Ok(())
}

fn print_report(report: &PropertyReport) {
    println!();
    println!("Property: {}", report.name);
    if let Some(error) = &report.error {
        println!("  Error: {}", error);
        return;
    }
    if let Some(value) = &report.value {
        println!("  Result: {}", value);
    }
    if let Some(explanation) = &report.explanation {
        println!("  ({})", explanation);
    }
    if let Some(vector) = &report.vector {
        println!("  Vector ({} entries):", vector.len());
        for line in vector {
            println!("    {}", line);
        }
    }
}

fn cmd_labels(file: &Path, names: &[String]) -> CliResult<()> {
    let (model, info) = load_job(file)?;
    let checker = Checker::new(info, CheckerConfig::default());
    let names: Vec<String> = if names.is_empty() {
        checker.defined_label_names().into_iter().collect()
    } else {
        names.to_vec()
    };

    let sets = checker
        .check_labels(&model, &names)
        .map_err(|e| CliError::CheckError {
            message: e.to_string(),
        })?;
    for (name, set) in names.iter().zip(&sets) {
        let states: Vec<String> = set.iter().map(|s| model.describe_state(s)).collect();
        println!("{} ({} states): {}", name, set.len(), states.join(" "));
    }
    Ok(())
}

fn cmd_show(file: &Path, default_filter: bool) -> CliResult<()> {
    let (model, info) = load_job(file)?;
    println!(
        "{} model: {} states, {} initial",
        model.model_type(),
        model.num_states(),
        model.num_initial_states()
    );

    if !info.constants.is_empty() {
        println!("constants:");
        for (name, value) in &info.constants {
            println!("  {} = {}", name, value);
        }
    }
    if !info.labels.is_empty() {
        println!("labels:");
        for label in &info.labels {
            println!("  \"{}\" = {}", label.name, label.expr);
        }
    }
    if info.properties.is_empty() {
        return Ok(());
    }

    let checker = Checker::new(info, CheckerConfig::default());
    println!("properties:");
    for p in &checker.info().properties {
        if default_filter {
            let wrapped = checker.add_default_filter_if_needed(&model, p.expr.clone());
            println!("  {}: {}", p.name, wrapped);
        } else {
            println!("  {}: {}", p.name, p.expr);
        }
    }
    Ok(())
}

fn cmd_extract(file: &Path, property: &str) -> CliResult<()> {
    let (model, info) = load_job(file)?;
    let selected = selected_properties(&info, &[property.to_string()])?;
    let checker = Checker::new(info, CheckerConfig::default());

    for (name, expr) in selected {
        let extracted = checker
            .extract_state_formulas(&model, &expr)
            .map_err(|e| CliError::CheckError {
                message: e.to_string(),
            })?;
        println!("{}: {}", name, extracted.expr);
        for (label, set) in &extracted.labels {
            let states: Vec<String> = set.iter().map(|s| s.to_string()).collect();
            println!("  \"{}\" = {{{}}}", label, states.join(", "));
        }
    }
    Ok(())
}

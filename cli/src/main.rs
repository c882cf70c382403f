use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_template_dispatch::{into_handler, Handler, Registry, TemplateSet};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit code for command lines that do not match the definitions.
const USAGE_EXIT_CODE: i32 = 2;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "cmdtpl", version, disable_help_subcommand = true)]
#[command(about = "Check, summarize and dry-run command-line template definitions")]
struct Cli {
    /// Log registration and dispatch details to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile every template in a definition file and report all errors.
    Check(CheckArgs),
    /// Print the help form and help text of every command and option.
    Summary(SummaryArgs),
    /// Render the help listing, or help for a single command.
    Help(HelpArgs),
    /// Dispatch arguments against a definition file, printing bound values.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Definition file (.yaml, .yml or .json).
    definitions: PathBuf,
}

#[derive(Debug, Args)]
struct SummaryArgs {
    /// Definition file (.yaml, .yml or .json).
    definitions: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Definition file (.yaml, .yml or .json).
    definitions: PathBuf,
    /// Only list commands whose keys or help text contain this text.
    filter: Option<String>,
    /// Leave global options out of the listing.
    #[arg(long)]
    no_global: bool,
    /// Show help for this command only ("~" for the unnamed command).
    #[arg(long, conflicts_with = "filter")]
    command: Option<String>,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Definition file (.yaml, .yml or .json).
    definitions: PathBuf,
    /// Arguments to dispatch, as the defined application would receive them.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Summary(args) => run_summary(args),
        Command::Help(args) => run_help(args),
        Command::Run(args) => match run_dispatch(args) {
            Ok(0) => Ok(()),
            Ok(code) => std::process::exit(code),
            Err(err) => Err(err),
        },
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let set = load_definitions(&args.definitions)?;
    let registry = compile_definitions(&set, &args.definitions)?;
    println!(
        "ok: {} command(s) and {} global option(s) in '{}'.",
        registry.command_keys().len(),
        set.global_options.len(),
        args.definitions.display()
    );
    Ok(())
}

fn run_summary(args: SummaryArgs) -> Result<(), String> {
    let set = load_definitions(&args.definitions)?;
    let registry = compile_definitions(&set, &args.definitions)?;
    let summary = registry.summary();

    let rendered = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&summary)
            .map(|json| format!("{json}\n"))
            .map_err(|err| format!("Failed to serialize summary: {err}"))?,
        // Through a JSON value so the top-level variant becomes a plain key.
        CliOutputFormat::Yaml => serde_json::to_value(&summary)
            .map_err(|err| err.to_string())
            .and_then(|value| serde_yaml::to_string(&value).map_err(|err| err.to_string()))
            .map_err(|err| format!("Failed to serialize summary: {err}"))?,
    };
    print!("{rendered}");
    Ok(())
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let set = load_definitions(&args.definitions)?;
    let registry = compile_definitions(&set, &args.definitions)?;

    match args.command {
        Some(name) => registry.print_command(&name).map_err(|err| err.to_string()),
        None => registry
            .print_commands(args.filter.as_deref().unwrap_or(""), !args.no_global)
            .map_err(|err| format!("Failed to write help: {err}")),
    }
}

/// Returns the process exit code: 0 on success, 2 for usage errors and 1 for
/// everything else.
fn run_dispatch(args: RunArgs) -> Result<i32, String> {
    let set = load_definitions(&args.definitions)?;
    let registry = compile_definitions(&set, &args.definitions)?;

    debug!(app = %set.name, args = args.args.len(), "Dispatching");
    match registry.process(&args.args) {
        Ok(()) => Ok(0),
        Err(err) => {
            registry
                .help(Some(&err), &set.name, &args.args)
                .map_err(|err| format!("Failed to write help: {err}"))?;
            Ok(if err.is_usage() { USAGE_EXIT_CODE } else { 1 })
        }
    }
}

fn load_definitions(path: &Path) -> Result<TemplateSet, String> {
    TemplateSet::load(path).map_err(|err| format!("Failed to load '{}': {err}", path.display()))
}

fn compile_definitions(set: &TemplateSet, path: &Path) -> Result<Registry, String> {
    set.compile_into(print_handler)
        .map_err(|report| format!("'{}' has {report}", path.display()))
}

/// A handler printing its definition and the values it received as one JSON line.
fn print_handler(template: &str) -> Handler {
    let definition = template.to_string();
    into_handler(move |values, out| {
        let record = serde_json::json!({ "definition": definition, "values": values });
        writeln!(out, "{record}")?;
        Ok(())
    })
}

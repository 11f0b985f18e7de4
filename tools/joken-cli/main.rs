use clap::{Parser, Subcommand};
use joken::prelude::*;
use serde::Deserialize;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Settings file layout. Both sections are optional.
#[derive(Deserialize, Default)]
#[serde(default)]
struct CliConfig {
    compiler: CompilerConfig,
    validator: ValidatorConfig,
}

/// Compiles workflow conditions into query documents and checks workflow graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional path to a JSON settings file with `compiler` and `validator` sections
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a JSON array of conditions into a query document
    Compile {
        /// Path to the conditions JSON file
        conditions_path: String,
    },
    /// Validate a workflow file and compile each of its condition nodes
    Workflow {
        /// Path to the workflow JSON file (legacy layouts are migrated on load)
        workflow_path: String,
    },
    /// Check whether an edge may be drawn between two nodes of a workflow
    Connect {
        /// Path to the workflow JSON file
        workflow_path: String,
        /// Source node id
        source: String,
        /// Target node id
        target: String,
        #[arg(long)]
        source_handle: Option<String>,
        #[arg(long)]
        target_handle: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Command::Compile { conditions_path } => run_compile(&conditions_path, config, cli.pretty),
        Command::Workflow { workflow_path } => run_workflow(&workflow_path, config, cli.pretty),
        Command::Connect {
            workflow_path,
            source,
            target,
            source_handle,
            target_handle,
        } => {
            let connection = ProposedConnection {
                source,
                target,
                source_handle,
                target_handle,
            };
            run_connect(&workflow_path, config, connection)
        }
    }
}

fn load_config(path: Option<&str>) -> CliConfig {
    let Some(path) = path else {
        return CliConfig::default();
    };
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read config file '{}': {}", path, e))
    });
    serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse config JSON: {}", e)))
}

fn read_file(path: &str, what: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read {} file '{}': {}", what, path, e)))
}

fn read_workflow(path: &str) -> Workflow {
    load_workflow(&read_file(path, "workflow"))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load workflow: {}", e)))
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> String {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize output: {}", e)))
}

fn run_compile(conditions_path: &str, config: CliConfig, pretty: bool) {
    let conditions: Vec<Condition> = serde_json::from_str(&read_file(conditions_path, "conditions"))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse conditions JSON: {}", e)));

    let start = Instant::now();
    let assembler = QueryAssembler::builder().with_config(config.compiler).build();
    let document = assembler.assemble(&conditions);
    let duration = start.elapsed();

    for condition in &conditions {
        eprintln!("  - {}", condition.summary());
    }
    eprintln!("Compiled {} conditions in {:?}", conditions.len(), duration);
    println!("{}", to_json(&document, pretty));
}

fn run_workflow(workflow_path: &str, config: CliConfig, pretty: bool) {
    let workflow = read_workflow(workflow_path);
    let report = validate_workflow(&workflow.graph);

    eprintln!("Workflow '{}' ({} nodes, {} edges)", workflow.name, workflow.graph.nodes.len(), workflow.graph.edges.len());
    for issue in &report.issues {
        eprintln!("  {}", issue);
    }
    if !report.is_valid() {
        exit_with_error(&format!("Workflow is not valid: {}", report.summary()));
    }

    let assembler = QueryAssembler::builder().with_config(config.compiler).build();
    let compiled = assembler.compile_workflow(&workflow);
    println!("{}", to_json(&compiled.queries, pretty));
}

fn run_connect(workflow_path: &str, config: CliConfig, connection: ProposedConnection) {
    let workflow = read_workflow(workflow_path);
    let validator = ConnectionValidator::new(config.validator);

    match validator.check(&workflow.graph, &connection) {
        Ok(()) => println!("Connection {} -> {} is allowed", connection.source, connection.target),
        Err(rejection) => {
            let reason = rejection.advisory().unwrap_or_else(|| rejection.to_string());
            exit_with_error(&format!(
                "Connection {} -> {} rejected: {}",
                connection.source, connection.target, reason
            ));
        }
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}

//! shipment-planner: plan production shipments from inventory rows.

#![allow(clippy::struct_excessive_bools, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use shipment_planner::{
    cli::{self, PlanEdits},
    config::{PlanConfig, PlannerConfig, PlanningOverrides},
    filter::PopularFilter,
    pipeline::exit_codes,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shipment-planner")]
#[command(version)]
#[command(about = "Plan shipment quantities from inventory rows", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  No rows left after filtering (with --fail-on-empty)
    2  Error occurred

EXAMPLES:
    # Overstocked rows, most days of inventory first
    shipment-planner plan rows.json --popular overstock --sort doi:desc

    # Edit quantities, add rows and keep the result for next time
    shipment-planner plan rows.json --qty SKU-1=120 --add SKU-1 --save-state plan.yaml

    # Resume a saved plan and export it
    shipment-planner plan rows.json --state plan.yaml -o csv -O plan.csv")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "SHIPMENT_PLANNER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `plan` subcommand
#[derive(Parser)]
struct PlanArgs {
    /// Product rows (JSON array, `{"rows": [...]}` or a response envelope)
    rows: PathBuf,

    /// Resume from a saved table state (YAML or JSON)
    #[arg(long)]
    state: Option<PathBuf>,

    /// Free-text search across every field
    #[arg(long)]
    search: Option<String>,

    /// Condition filter: COLUMN:OPERATOR[:VALUE[:VALUE2]]
    #[arg(long = "where", value_name = "EXPR")]
    conditions: Vec<String>,

    /// Value-set filter: COLUMN=VALUE[,VALUE...]
    #[arg(long, value_name = "EXPR")]
    only: Vec<String>,

    /// Quick filter
    #[arg(long, value_enum)]
    popular: Option<PopularFilter>,

    /// Sort: COLUMN[:asc|desc]
    #[arg(long, value_name = "EXPR")]
    sort: Option<String>,

    /// Sort once and keep that order (requires --sort)
    #[arg(long)]
    freeze: bool,

    /// Add the row with this key to the shipment
    #[arg(long, value_name = "KEY")]
    add: Vec<String>,

    /// Set units to make: KEY=UNITS
    #[arg(long = "qty", value_name = "EXPR")]
    quantities: Vec<String>,

    /// Output format (auto: table on a terminal, JSON otherwise)
    #[arg(short, long, default_value = "auto")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Write the resulting table state here
    #[arg(long)]
    save_state: Option<PathBuf>,

    /// Maximum rows to render
    #[arg(long)]
    limit: Option<usize>,

    /// Days of inventory above which a row counts as overstocked
    #[arg(long)]
    overstock_days: Option<f64>,

    /// Days of inventory below which a row counts as low on stock
    #[arg(long)]
    low_stock_days: Option<f64>,

    /// Exit with code 1 when no rows survive the filters
    #[arg(long)]
    fail_on_empty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter, order and edit a shipment plan
    Plan(Box<PlanArgs>),

    /// Show the case-pack increment for packaging texts
    Increment {
        /// Size labels or product names
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Show the effective configuration
    Config {
        /// Print a fully commented example config instead
        #[arg(long, conflicts_with = "schema")]
        example: bool,

        /// Print the JSON schema of the config file
        #[arg(long)]
        schema: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(exit_codes::ERROR);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match cli.command {
        Commands::Plan(args) => {
            let mut overrides = PlannerConfig::builder()
                .output_format(args.output)
                .output_file(args.output_file.clone())
                .quiet(cli.quiet)
                .build();
            let planning = PlanningOverrides {
                overstock_threshold_days: args.overstock_days,
                low_stock_days: args.low_stock_days,
            };
            overrides.output.no_color = cli.no_color;
            overrides.behavior.fail_on_empty = args.fail_on_empty;

            let (planner_config, loaded_from) =
                PlannerConfig::from_file_with_overrides(
                    cli.config.as_deref(),
                    &overrides,
                    &planning,
                );
            if let Some(path) = loaded_from {
                tracing::debug!("Using config file {}", path.display());
            }

            let mut config = PlanConfig::new(args.rows.clone());
            config.state_path = args.state.clone();
            config.save_state = args.save_state.clone();
            config.limit = args.limit;
            config.planner = planner_config;

            let edits = PlanEdits {
                search: args.search,
                conditions: args.conditions,
                only: args.only,
                popular: args.popular,
                sort: args.sort,
                freeze: args.freeze,
                add: args.add,
                quantities: args.quantities,
            };

            let code = cli::run_plan(config, edits)?;
            if code != exit_codes::SUCCESS {
                std::process::exit(code);
            }
            Ok(())
        }

        Commands::Increment { texts } => {
            let (config, _) = shipment_planner::config::load_or_default(cli.config.as_deref());
            cli::run_increment(&texts, &config)
        }

        Commands::Config { example, schema } => {
            if schema {
                println!("{}", shipment_planner::config::generate_json_schema());
            } else if example {
                print!("{}", shipment_planner::config::generate_full_example_config());
            } else {
                let (config, loaded_from) =
                    shipment_planner::config::load_or_default(cli.config.as_deref());
                match &loaded_from {
                    Some(path) => eprintln!("# Loaded from: {}", path.display()),
                    None => eprintln!("# No config file found; showing defaults"),
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
            }
            Ok(())
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "shipment-planner", &mut io::stdout());
            Ok(())
        }
    }
}

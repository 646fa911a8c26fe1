//! Cohort query compiler command-line interface

use clap::{Parser, Subcommand, ValueEnum};
use octofhir_cohort::EntityType;
use octofhir_cohort::FieldScope;
use octofhir_cohort::cli::{compile, inspect, output};
use std::path::PathBuf;

/// Cohort query to CQL compiler
#[derive(Parser)]
#[command(name = "cohort-cql")]
#[command(author, version, about = "Compile cohort queries into CQL libraries", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Scope {
    /// Every group contributes to every target
    All,
    /// Only groups mapped to the target contribute
    Matching,
}

impl From<Scope> for FieldScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::All => FieldScope::AllGroups,
            Scope::Matching => FieldScope::MatchingGroups,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a JSON query into a CQL library
    Compile {
        /// Configuration file (XML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Query file (JSON)
        #[arg(short, long)]
        query: PathBuf,

        /// Target entity type (Patient, Specimen)
        #[arg(short, long)]
        entity: EntityType,

        /// Query file uses the essential DTO shape
        #[arg(long)]
        essential: bool,

        /// Which groups contribute fields
        #[arg(long, value_enum, default_value = "all")]
        scope: Scope,

        /// Entity type the event group compiles to
        #[arg(long)]
        event_target: Option<EntityType>,
    },

    /// Show the configuration of one data element
    Inspect {
        /// Configuration file (XML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Data element URN
        urn: String,

        /// Restrict to one entity type
        #[arg(short, long)]
        entity: Option<EntityType>,

        /// Pretty-print output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new().filter_level(level).init();

    let result = match cli.command {
        Commands::Compile {
            config,
            query,
            entity,
            essential,
            scope,
            event_target,
        } => compile::compile(compile::CompileConfig {
            config,
            query,
            entity,
            essential,
            scope: scope.into(),
            event_target,
            output_file: cli.output,
        }),

        Commands::Inspect {
            config,
            urn,
            entity,
            pretty,
        } => inspect::inspect(inspect::InspectConfig {
            config,
            urn,
            entity,
            pretty,
            output_file: cli.output,
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

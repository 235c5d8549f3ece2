// crates/tracker-cli/src/main.rs
// ============================================================================
// Module: Logic Tracker CLI Entry Point
// Description: Command dispatcher for offline logic-table queries.
// Purpose: Let data authors inspect resolved requirements without a tracker UI.
// Dependencies: clap, serde, serde_json, thiserror, tracker-config, tracker-logic
// ============================================================================

//! ## Overview
//! `logic-tracker` loads a `tracker.toml`, starts a [`LogicEngine`], runs one
//! query, and prints the answer as a single JSON line on stdout. Failures are
//! reported on stderr with a non-zero exit code.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use thiserror::Error;
use tracker_config::ConfigError;
use tracker_config::TrackerConfig;
use tracker_config::build_engine;
use tracker_logic::Expression;
use tracker_logic::LogicEngine;
use tracker_logic::LogicError;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name = "logic-tracker",
    version,
    about = "Query randomizer logic tables",
    disable_help_subcommand = true
)]
struct Cli {
    /// Config file path (defaults to tracker.toml or `LOGIC_TRACKER_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Dungeon whose boss is not required; may be repeated.
    #[arg(long = "non-required-boss", value_name = "DUNGEON", global = true)]
    non_required_bosses: Vec<String>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Requirements for a single location.
    Location(LocationCommand),
    /// Requirements for a randomizable entrance.
    Entrance {
        /// Entrance name.
        name: String,
    },
    /// Small keys needed before a location can be reached.
    SmallKeys {
        /// General location (dungeon) name.
        general: String,
        /// Detailed location name.
        detailed: String,
    },
    /// Entrances that may lead to an exit.
    EntrancesForExit {
        /// Exit name.
        exit: String,
    },
    /// Exits an entrance may lead to.
    ExitsForEntrance {
        /// Entrance name.
        entrance: String,
    },
    /// Maximum and starting counts for an item.
    MaxCount {
        /// Item name.
        item: String,
    },
    /// Builds and simplifies an ad-hoc requirement string.
    Parse {
        /// Requirement text in the logic DSL.
        requirement: String,
        /// Substitute boss locations instead of leaving them opaque.
        #[arg(long, action = ArgAction::SetTrue)]
        flattened: bool,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for the `location` command.
#[derive(Args, Debug)]
struct LocationCommand {
    /// General location name.
    general: String,
    /// Detailed location name.
    detailed: String,
    /// Substitute boss locations instead of leaving them opaque.
    #[arg(long, action = ArgAction::SetTrue)]
    flattened: bool,
    /// Print the unsimplified tree.
    #[arg(long, action = ArgAction::SetTrue)]
    raw: bool,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Loads the config and every file it names, then reports success.
    Validate,
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// Requirement tree answer.
#[derive(Debug, Serialize)]
struct RequirementOutput<'a> {
    /// What was resolved.
    query: String,
    /// Resulting tree.
    requirement: &'a Expression,
}

/// Small-key answer.
#[derive(Debug, Serialize)]
struct SmallKeysOutput {
    /// `general - detailed` location name.
    location: String,
    /// Keys required.
    small_keys: u32,
}

/// Entrance pool answer.
#[derive(Debug, Serialize)]
struct PoolOutput<'a> {
    /// Entrance or exit the pool was computed for.
    query: &'a str,
    /// Candidate names.
    candidates: &'a [String],
}

/// Item count answer.
#[derive(Debug, Serialize)]
struct ItemCountOutput<'a> {
    /// Item name.
    item: &'a str,
    /// Most copies that can ever be obtained.
    max_count: u32,
    /// Copies held at the start.
    starting_count: u32,
}

/// Config validation answer.
#[derive(Debug, Serialize)]
struct ValidationOutput {
    /// Always `ok`; failures go to stderr.
    status: &'static str,
    /// Resolved game-data path.
    game_data: String,
    /// Resolved settings path, if any.
    settings: Option<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI failures.
#[derive(Debug, Error)]
enum CliError {
    /// Config or data files could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A query failed inside the logic engine.
    #[error("logic error: {0}")]
    Logic(#[from] LogicError),
    /// Output could not be serialized.
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    /// Writing to a standard stream failed.
    #[error("failed to write {stream}: {error}")]
    Output {
        /// Stream name.
        stream: &'static str,
        /// Underlying I/O error.
        error: std::io::Error,
    },
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Parses arguments, runs the command, and maps failures to an exit code.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(&cli).and_then(|line| {
        write_stdout_line(&line).map_err(|error| CliError::Output {
            stream: "stdout",
            error,
        })
    }) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Runs one command and returns the JSON line to print.
fn execute(cli: &Cli) -> CliResult<String> {
    let config = TrackerConfig::load(cli.config.as_deref())?;
    let mut engine = build_engine(&config)?;
    for dungeon in &cli.non_required_bosses {
        engine.set_boss_not_required(dungeon)?;
    }
    match &cli.command {
        Commands::Location(command) => command_location(&engine, command),
        Commands::Entrance {
            name,
        } => {
            let tree = engine.requirements_for_entrance(name)?;
            render(&RequirementOutput {
                query: name.clone(),
                requirement: &tree,
            })
        }
        Commands::SmallKeys {
            general,
            detailed,
        } => render(&SmallKeysOutput {
            location: format!("{general} - {detailed}"),
            small_keys: engine.small_keys_required_for_location(general, detailed)?,
        }),
        Commands::EntrancesForExit {
            exit,
        } => {
            let candidates = engine.random_entrances_for_exit(exit)?;
            render(&PoolOutput {
                query: exit,
                candidates: &candidates,
            })
        }
        Commands::ExitsForEntrance {
            entrance,
        } => {
            let candidates = engine.random_exits_for_entrance(entrance)?;
            render(&PoolOutput {
                query: entrance,
                candidates: &candidates,
            })
        }
        Commands::MaxCount {
            item,
        } => render(&ItemCountOutput {
            item,
            max_count: engine.max_item_count(item),
            starting_count: engine.starting_item_count(item),
        }),
        Commands::Parse {
            requirement,
            flattened,
        } => {
            let tree = engine.build_requirement(requirement, *flattened)?;
            render(&RequirementOutput {
                query: requirement.clone(),
                requirement: &tree,
            })
        }
        Commands::Config {
            command: ConfigCommand::Validate,
        } => render(&ValidationOutput {
            status: "ok",
            game_data: config.game_data_path().display().to_string(),
            settings: config.settings_path().map(|path| path.display().to_string()),
        }),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `location`.
fn command_location(engine: &LogicEngine, command: &LocationCommand) -> CliResult<String> {
    let LocationCommand {
        general,
        detailed,
        flattened,
        raw,
    } = command;
    let tree = if *raw {
        engine.raw_requirements_for_location(general, detailed, *flattened)?
    } else {
        engine.requirements_for_location(general, detailed, *flattened)?
    };
    render(&RequirementOutput {
        query: format!("{general} - {detailed}"),
        requirement: &tree,
    })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Serializes an answer as one JSON line.
fn render<T: Serialize>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

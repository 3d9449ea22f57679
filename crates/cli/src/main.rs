//! `deckctl` – CLI test harness for the Card Games Engine HTTP API.
//!
//! Every front end (one-shot subcommands, the interactive session, scenario
//! files, the socket daemon) drives the same engine view model, so a
//! response looks the same whichever way the action was triggered.

mod config;
mod interactive;
mod logging;
mod serve;

use anyhow::Context;
use clap::{Parser, Subcommand};
use deck_engine::commands::run_action;
use deck_engine::types::*;
use deck_engine::view::Field;
use deck_engine::{Action, ActionRegistry, AppContext, DeckQuery, DeckView};
use std::path::{Path, PathBuf};

// ===========================================================================
// CLI definition
// ===========================================================================

#[derive(Parser)]
#[command(
    name = "deckctl",
    version,
    about = "CLI test harness for the Card Games Engine HTTP API"
)]
struct Cli {
    /// Backend address, overriding config (e.g. "http://localhost:8000").
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a deck: POST /create.
    Create {
        /// Card selection passed through as-is (e.g. "AS,KD,2C").
        #[arg(long, default_value = "")]
        cards: String,
        /// Ask for a shuffled deck.
        #[arg(long)]
        shuffled: bool,
        /// Card count; 0 leaves it out of the request.
        #[arg(long, default_value_t = 0)]
        count: u32,
        /// Output the full action result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Open a deck: GET /open/{guid}.
    Open {
        /// Deck identifier, sent verbatim.
        guid: String,
        /// Output the full action result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Draw cards: PATCH /draw/{guid}.
    Draw {
        /// Deck identifier, sent verbatim.
        guid: String,
        /// Number of cards; 0 leaves it out of the request.
        #[arg(long, default_value_t = 0)]
        count: u32,
        /// Output the full action result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Menu-driven session with all three actions and their last responses.
    Interactive,

    /// Run a scripted scenario from a YAML file.
    RunScenario {
        /// Path to the scenario YAML file.
        file: PathBuf,
        /// Directory for artifacts output.
        #[arg(long)]
        artifacts: Option<PathBuf>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start daemon mode over a Unix socket.
    Serve {
        /// Path for the Unix domain socket.
        #[arg(long)]
        socket: PathBuf,
    },
}

// ===========================================================================
// Main
// ===========================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::get_config().context("failed to load configuration")?;
    logging::init_logging(&cfg.logging).context("failed to initialise logging")?;

    let base_url = cli.base_url.as_deref().unwrap_or(&cfg.backend.base_url);
    let ctx = AppContext::with_base_url(base_url).context("failed to build backend client")?;
    tracing::debug!(base_url = %ctx.base_url, dev_env = %cfg.dev_env, "backend configured");
    let view = ctx.view();

    match cli.command {
        Commands::Create {
            cards,
            shuffled,
            count,
            json,
        } => {
            let action = Action::Create(DeckQuery {
                cards,
                shuffled,
                count,
            });
            cmd_action(&action, json, &view).await;
        }
        Commands::Open { guid, json } => {
            cmd_action(&Action::Open { guid }, json, &view).await;
        }
        Commands::Draw { guid, count, json } => {
            let action = Action::Draw {
                guid,
                query: DeckQuery::with_count(count),
            };
            cmd_action(&action, json, &view).await;
        }
        Commands::Interactive => interactive::run_interactive(view, &ctx.base_url).await?,
        Commands::RunScenario {
            file,
            artifacts,
            json,
        } => cmd_run_scenario(&file, json, artifacts, &view).await,
        Commands::Serve { socket } => {
            serve::run_daemon(socket, view, ActionRegistry::new()).await?
        }
    }
    Ok(())
}

// ===========================================================================
// Subcommand implementations
// ===========================================================================

async fn cmd_action(action: &Action, json: bool, view: &DeckView) {
    let result = run_action(action, view).await;
    if json {
        let j = serde_json::to_string_pretty(&result).unwrap_or_default();
        println!("{}", j);
    } else {
        // The view's field is exactly what the harness displays.
        let field = match action {
            Action::Create(_) => Field::Create,
            Action::Open { .. } => Field::Open,
            Action::Draw { .. } => Field::Draw,
        };
        println!("{}", view.response(field).unwrap_or_default());
    }
    exit_for(result.status);
}

async fn cmd_run_scenario(file: &Path, json: bool, artifacts: Option<PathBuf>, view: &DeckView) {
    let yaml = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read scenario file {}: {}", file.display(), e);
            std::process::exit(2);
        }
    };

    let scenario = match deck_engine::scenario::load_scenario(&yaml) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    let scenario_result = deck_engine::scenario::run_scenario(&scenario, view).await;

    if json {
        let j = serde_json::to_string_pretty(&scenario_result).unwrap_or_default();
        println!("{}", j);
    } else {
        println!("{}", render_scenario(&scenario_result));
    }

    if let Some(ref dir) = artifacts {
        if let Err(e) = write_artifacts(dir, &scenario_result) {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to write artifacts");
        }
    }

    exit_for(scenario_result.overall_status);
}

// ===========================================================================
// Output helpers
// ===========================================================================

fn exit_for(status: Status) {
    match status {
        Status::Pass => {}
        Status::Fail => std::process::exit(1),
        Status::Error => std::process::exit(2),
    }
}

fn render_scenario(r: &ScenarioResult) -> String {
    let mut out = format!(
        "Scenario: {}\nOverall: {}",
        r.name.as_deref().unwrap_or("<unnamed>"),
        r.overall_status.as_str()
    );
    for (i, sr) in r.step_results.iter().enumerate() {
        out.push_str(&format!(
            "\n  Step {}: {} {} -> {} ({}ms)",
            i,
            sr.action,
            sr.target,
            sr.status.as_str(),
            sr.timing_ms.total
        ));
        if let Some(ref err) = sr.error {
            out.push_str(&format!("\n    error: {} – {}", err.code, err.message));
        }
    }
    out
}

// ===========================================================================
// Artifact helpers
// ===========================================================================

/// Writes `<dir>/<run_id>/result.json` and one `events.jsonl` line per step.
/// Returns the run directory.
fn write_artifacts(dir: &Path, result: &ScenarioResult) -> std::io::Result<PathBuf> {
    let art_dir = dir.join(new_run_id());
    std::fs::create_dir_all(&art_dir)?;

    let j = serde_json::to_string_pretty(result).map_err(std::io::Error::other)?;
    std::fs::write(art_dir.join("result.json"), j)?;

    let mut lines = String::new();
    for sr in &result.step_results {
        let line = serde_json::to_string(sr).map_err(std::io::Error::other)?;
        lines.push_str(&line);
        lines.push('\n');
    }
    std::fs::write(art_dir.join("events.jsonl"), lines)?;
    Ok(art_dir)
}

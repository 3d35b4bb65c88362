// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for self-play matches and event replays
// ═══════════════════════════════════════════════════════════════════════

mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use magi_agents::{SearchConfig, StrategyConnector};
use magi_engine::protocol::ServerEvent;
use magi_engine::PlayerId;
use session::{make_strategy, run_match};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "magi-runner", about = "Magi duel strategy runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one self-play match against the reference engine
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short = 'n', long, default_value_t = 5_000)]
        max_decisions: usize,
        /// Search configuration as JSON
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        debounce_ms: Option<u64>,
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Strategy type: "simulation", "random", or "mixed" (simulation vs random)
        #[arg(short, long, default_value = "simulation")]
        agent: String,
    },
    /// Feed recorded server events (one JSON event per line) to a strategy
    /// and print every action it sends
    Replay {
        events: PathBuf,
        /// Only adopt game data addressed to this player
        #[arg(short, long)]
        player: Option<PlayerId>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = "simulation")]
        agent: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { seed, max_decisions, config, debounce_ms, max_iterations, agent } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(ms) = debounce_ms {
                config.debounce_ms = ms;
            }
            if let Some(n) = max_iterations {
                config.max_iterations = n;
            }
            cmd_play(seed, max_decisions, &config, &agent)
        }
        Commands::Replay { events, player, config, agent } => {
            let config = load_config(config.as_deref())?;
            cmd_replay(&events, player, &config, &agent)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SearchConfig> {
    let Some(path) = path else {
        return Ok(SearchConfig::default());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

fn cmd_play(seed: u64, max_decisions: usize, config: &SearchConfig, agent: &str) -> Result<()> {
    println!("=== Magi Duel ===\n");
    println!("Running match: seed={}, agent={}, max_iterations={}\n", seed, agent, config.max_iterations);

    let second = if agent == "mixed" { "random" } else { agent };
    let strategies = [make_strategy(agent, config, seed), make_strategy(second, config, seed + 1)];
    let result = run_match(seed, strategies, Duration::from_millis(config.debounce_ms), max_decisions)?;

    println!("Match finished!");
    println!("  Winner: player {}", result.winner);
    println!("  Turns played: {}", result.turns);
    println!("  Decisions: {} ({} rejected)", result.decisions, result.rejected);
    Ok(())
}

fn cmd_replay(path: &Path, player: Option<PlayerId>, config: &SearchConfig, agent: &str) -> Result<()> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading events {}", path.display()))?;
    let debounce = Duration::from_millis(config.debounce_ms);
    let mut connector = StrategyConnector::new(make_strategy(agent, config, 0), debounce);
    let mut clock = Instant::now();

    for (line_no, line) in raw.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
        let event: ServerEvent =
            serde_json::from_str(line).with_context(|| format!("line {}: malformed event", line_no + 1))?;
        if let (ServerEvent::GameData { player_id, .. }, Some(wanted)) = (&event, player) {
            if *player_id != wanted {
                warn!("line {}: game data for player {} skipped", line_no + 1, player_id);
                continue;
            }
        }
        connector.handle_event(event, clock).with_context(|| format!("line {}", line_no + 1))?;

        // Every recorded event is followed by a quiet period.
        clock += debounce;
        if let Some(action) = connector.poll(clock) {
            println!("{}", serde_json::to_string(&action)?);
        }
    }
    info!("replayed {}", path.display());
    Ok(())
}

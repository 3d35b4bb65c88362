// ═══════════════════════════════════════════════════════════════════════
// Session — a headless match between two connectors
//
// The engine plays the server: it journals every server action, and the
// session hands each seat its redacted copy. Each seat decides through
// its own connector and mirror, exactly as it would over the network.
// Time is virtual: the clock jumps straight to the next debounce
// deadline.
//
// A rejected client action never stalls the match. An open prompt is
// skipped (and announced as resolved), otherwise the active player is
// made to pass.
// ═══════════════════════════════════════════════════════════════════════

use anyhow::{bail, Result};
use log::{debug, info, warn};
use magi_agents::{RandomStrategy, SearchConfig, SimulationStrategy, Strategy, StrategyConnector};
use magi_engine::protocol::{ClientAction, ServerAction, ServerEvent};
use magi_engine::{Action, PlayerId, State};
use std::time::{Duration, Instant};

/// Result of a completed match.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub seed: u64,
    pub winner: PlayerId,
    pub turns: u32,
    pub decisions: usize,
    pub rejected: usize,
}

pub fn make_strategy(kind: &str, config: &SearchConfig, seed: u64) -> Box<dyn Strategy> {
    match kind {
        "random" => Box::new(RandomStrategy::new(seed)),
        _ => Box::new(SimulationStrategy::new(config.clone())),
    }
}

pub struct Session {
    state: State,
    seats: Vec<(PlayerId, StrategyConnector)>,
    clock: Instant,
    decisions: usize,
    rejected: usize,
}

impl Session {
    /// Deals a new game and sends each seat its game data.
    pub fn new(seed: u64, strategies: [Box<dyn Strategy>; 2], debounce: Duration) -> Result<Self> {
        let mut state = magi_engine::setup::create_initial_state(seed);
        state.enable_journal();
        let clock = Instant::now();

        let mut seats = Vec::with_capacity(2);
        for (player, strategy) in state.players.into_iter().zip(strategies) {
            let mut connector = StrategyConnector::new(strategy, debounce);
            let event = ServerEvent::GameData { player_id: player, state: state.serialize_data(player) };
            connector.handle_event(event, clock)?;
            seats.push((player, connector));
        }
        Ok(Session { state, seats, clock, decisions: 0, rejected: 0 })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn connector(&self, player: PlayerId) -> Option<&StrategyConnector> {
        self.seats.iter().find(|(p, _)| *p == player).map(|(_, c)| c)
    }

    pub fn decisions(&self) -> usize {
        self.decisions
    }

    /// Runs until the next decision has been applied and broadcast.
    /// Returns false once the game is over.
    pub fn step(&mut self) -> Result<bool> {
        if self.state.has_winner() {
            return Ok(false);
        }
        let Some(deadline) = self.seats.iter().filter_map(|(_, c)| c.deadline()).min() else {
            bail!("match stuck: nobody to act in turn {} step {}", self.state.turn, self.state.step);
        };
        self.clock = self.clock.max(deadline);

        let mut announced = Vec::new();
        for i in 0..self.seats.len() {
            let Some(client) = self.seats[i].1.poll(self.clock) else { continue };
            self.decisions += 1;
            announced.extend(self.apply(client)?);
        }

        let mut journal = self.state.take_journal();
        journal.extend(announced);
        for (player, connector) in self.seats.iter_mut() {
            for action in &journal {
                connector.handle_event(ServerEvent::Action(action.redacted_for(*player)), self.clock)?;
            }
        }
        Ok(!self.state.has_winner())
    }

    /// Applies one client action. Returns server actions the engine does
    /// not journal itself.
    fn apply(&mut self, client: ClientAction) -> Result<Vec<ServerAction>> {
        let player = client.player();
        let outcome = Action::try_from(client).and_then(|action| {
            self.state.update(&action)?;
            Ok(action)
        });
        let error = match outcome {
            Ok(action) => {
                debug!("player {} {}", player, action);
                return Ok(Vec::new());
            }
            Err(e) => e,
        };

        self.rejected += 1;
        warn!("player {} action rejected: {}", player, error);
        if let Some(prompt) = self.state.prompt.as_ref() {
            let prompt_player = prompt.player;
            self.state.skip_prompt();
            return Ok(vec![ServerAction::ResolvePrompt { player: Some(prompt_player) }]);
        }
        let active = self.state.active_player;
        if let Err(e) = self.state.update(&Action::Pass { player: active }) {
            bail!("forced pass for player {} failed: {}", active, e);
        }
        Ok(Vec::new())
    }

    pub fn result(&self, seed: u64) -> Option<MatchResult> {
        self.state.winner.map(|winner| MatchResult {
            seed,
            winner,
            turns: self.state.turn,
            decisions: self.decisions,
            rejected: self.rejected,
        })
    }
}

/// Plays a full match. Fails if it runs past `max_decisions`.
pub fn run_match(
    seed: u64,
    strategies: [Box<dyn Strategy>; 2],
    debounce: Duration,
    max_decisions: usize,
) -> Result<MatchResult> {
    let mut session = Session::new(seed, strategies, debounce)?;
    while session.step()? {
        if session.decisions() > max_decisions {
            bail!("match exceeded {} decisions (turn {})", max_decisions, session.state().turn);
        }
    }
    let Some(result) = session.result(seed) else {
        bail!("match ended without a winner");
    };
    info!(
        "seed {}: player {} wins after {} turns, {} decisions, {} rejected",
        result.seed, result.winner, result.turns, result.decisions, result.rejected
    );
    Ok(result)
}

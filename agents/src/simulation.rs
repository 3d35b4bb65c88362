// ═══════════════════════════════════════════════════════════════════════
// Simulation Strategy — forward search over the agent's own turn
//
// One decision request:
//   1. Seed: build a sim from the mirror (snapshot module)
//   2. Frontier: the generator's branches from the seed
//   3. Expand: pop, apply to a clone, fingerprint, score, dedupe,
//      record as a leaf (evicting the parent), push its branches
//   4. Select: best non-prompt leaf that beats the baseline
//   5. Emit: first action now, the rest held for later requests
//
// The general search (priority, creatures, prompts) is FIFO over the
// whole turn and threads through prompts the engine raises. The attack
// search is LIFO over attacks only. Both stop at a failsafe iteration
// bound from SearchConfig.
//
// A branch that hands the turn to the opponent is scored on the state
// just before it, so turn-ending plans compare fairly with the seed.
// ═══════════════════════════════════════════════════════════════════════

use crate::config::SearchConfig;
use crate::evaluator::score_with_bonus;
use crate::extractor::{extract_actions, extract_attacks, WorkItem};
use crate::fingerprint::{Fingerprint, Fingerprinter};
use crate::mirror::GameState;
use crate::snapshot::build_sim;
use crate::strategy::{choose_starting_cards, pass, Strategy};
use log::{debug, warn};
use magi_engine::engine::Action;
use magi_engine::protocol::ClientAction;
use magi_engine::state::State;
use magi_engine::types::*;
use std::collections::{BTreeMap, HashSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Priority, creature and prompt decisions. FIFO, whole turn.
    General,
    /// Chained own attacks only. LIFO.
    AttackOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub score: f64,
    pub log: Vec<Action>,
    pub paused_on_prompt: bool,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Score of the seed sim.
    pub baseline: f64,
    pub iterations: usize,
    pub leaves: BTreeMap<Fingerprint, Leaf>,
}

impl SearchOutcome {
    /// The plan to follow. Outside prompts a plan must beat the baseline;
    /// at a prompt some answer has to be given.
    pub fn best_plan(&self, at_prompt: bool) -> Option<&Leaf> {
        let floor = if at_prompt { None } else { Some(self.baseline) };
        select_best(&self.leaves, floor)
    }
}

// ── Search ─────────────────────────────────────────────────────────────

pub fn search(seed: &State, me: PlayerId, opponent: PlayerId, mode: SearchMode, config: &SearchConfig) -> SearchOutcome {
    let mut fingerprinter = Fingerprinter::new();
    let root = fingerprinter.fingerprint(seed);
    let baseline = score_with_bonus(seed, me, opponent, config.win_bonus);

    let expand = |sim: &State, log: &[Action], parent: &str| match mode {
        SearchMode::General => extract_actions(sim, me, opponent, log, parent),
        SearchMode::AttackOnly => extract_attacks(sim, me, opponent, log, parent),
    };
    let limit = match mode {
        SearchMode::General => config.max_iterations,
        SearchMode::AttackOnly => config.attack_max_iterations,
    };

    let mut visited: HashSet<Fingerprint> = HashSet::new();
    visited.insert(root.clone());
    let mut leaves = BTreeMap::new();
    leaves.insert(root.clone(), Leaf { score: baseline, log: Vec::new(), paused_on_prompt: seed.has_prompt() });
    let mut frontier: VecDeque<WorkItem> = expand(seed, &[], &root).into();

    let mut iterations = 0;
    while iterations < limit {
        let next = match mode {
            SearchMode::General => frontier.pop_front(),
            SearchMode::AttackOnly => frontier.pop_back(),
        };
        let Some(item) = next else { break };
        iterations += 1;

        let mut sim = (*item.sim).clone();
        if let Err(e) = sim.update(&item.action) {
            debug!("dead branch {} after {} steps: {}", item.action, item.action_log.len() - 1, e);
            continue;
        }

        let fingerprint = fingerprinter.fingerprint(&sim);
        if !visited.insert(fingerprint.clone()) {
            continue;
        }

        let turn_over = sim.active_player != me && !sim.has_winner();
        let scored = if turn_over { item.sim.as_ref() } else { &sim };
        let score = score_with_bonus(scored, me, opponent, config.win_bonus);

        leaves.remove(&item.parent_fingerprint);
        frontier.extend(expand(&sim, &item.action_log, &fingerprint));
        leaves.insert(fingerprint, Leaf { score, log: item.action_log, paused_on_prompt: sim.has_prompt() });
    }

    if !frontier.is_empty() {
        debug!("{:?} search stopped at {} iterations with {} branches left", mode, iterations, frontier.len());
    }
    SearchOutcome { baseline, iterations, leaves }
}

/// Highest-scoring leaf that is not waiting on a prompt and did
/// something. With a floor, only leaves scoring strictly above it count.
/// Exact ties go to the shorter log, then to the first fingerprint.
pub fn select_best(leaves: &BTreeMap<Fingerprint, Leaf>, floor: Option<f64>) -> Option<&Leaf> {
    leaves
        .values()
        .filter(|leaf| !leaf.paused_on_prompt && !leaf.log.is_empty())
        .filter(|leaf| floor.map_or(true, |f| leaf.score > f))
        .fold(None, |best: Option<&Leaf>, leaf| match best {
            Some(b) if b.score > leaf.score || (b.score == leaf.score && b.log.len() <= leaf.log.len()) => Some(b),
            _ => Some(leaf),
        })
}

// ── Strategy ───────────────────────────────────────────────────────────

pub struct SimulationStrategy {
    player_id: PlayerId,
    config: SearchConfig,
    actions_on_hold: VecDeque<Action>,
}

impl SimulationStrategy {
    pub fn new(config: SearchConfig) -> Self {
        SimulationStrategy { player_id: 0, config, actions_on_hold: VecDeque::new() }
    }

    pub fn held(&self) -> usize {
        self.actions_on_hold.len()
    }

    /// Head of the hold queue if it still applies to the live game.
    /// A stale head drops the whole queue.
    fn next_held(&mut self, game: &GameState) -> Option<Action> {
        let next = self.actions_on_hold.pop_front()?;
        if game.needs_decision() && next.player() == self.player_id {
            let mut sim = build_sim(game);
            match sim.update(&next) {
                Ok(()) => return Some(next),
                Err(e) => debug!("held {} no longer applies: {}", next, e),
            }
        }
        debug!("dropping {} held actions", self.actions_on_hold.len() + 1);
        self.actions_on_hold.clear();
        None
    }

    fn plan(&self, sim: &State, opponent: PlayerId, mode: SearchMode) -> Vec<Action> {
        let outcome = search(sim, self.player_id, opponent, mode, &self.config);
        let best = outcome.best_plan(false);
        debug!(
            "{:?} search: {} iterations, {} leaves, baseline {:.2}, best {}",
            mode,
            outcome.iterations,
            outcome.leaves.len(),
            outcome.baseline,
            best.map_or("none".to_string(), |l| format!("{:.2} in {} actions", l.score, l.log.len())),
        );
        best.map(|leaf| leaf.log.clone()).unwrap_or_default()
    }

    fn plan_prompt(&self, sim: &State, opponent: PlayerId) -> Vec<Action> {
        if !sim.has_prompt() {
            warn!("player {} is the prompt target but the prompt could not be simulated", self.player_id);
            return Vec::new();
        }
        let outcome = search(sim, self.player_id, opponent, SearchMode::General, &self.config);
        if let Some(best) = outcome.best_plan(true) {
            debug!("prompt search: {} iterations, best {:.2}", outcome.iterations, best.score);
            return best.log.clone();
        }
        // Nothing resolved cleanly; any answer beats a rejected pass.
        extract_actions(sim, self.player_id, opponent, &[], "")
            .into_iter()
            .next()
            .map(|item| vec![item.action])
            .unwrap_or_default()
    }

    /// Emits the first action of a plan and holds the rest.
    fn adopt(&mut self, plan: Vec<Action>) -> ClientAction {
        let mut plan = VecDeque::from(plan);
        match plan.pop_front() {
            Some(first) => {
                self.actions_on_hold = plan;
                ClientAction::from(&first)
            }
            None => pass(self.player_id),
        }
    }
}

impl Default for SimulationStrategy {
    fn default() -> Self {
        SimulationStrategy::new(SearchConfig::default())
    }
}

impl Strategy for SimulationStrategy {
    fn name(&self) -> &str {
        "Simulation"
    }

    fn setup(&mut self, player_id: PlayerId) {
        self.player_id = player_id;
        self.actions_on_hold.clear();
    }

    fn request_action(&mut self, game: &GameState) -> ClientAction {
        if let Some(action) = self.next_held(game) {
            debug!("player {} plays held {}", self.player_id, action);
            return ClientAction::from(&action);
        }
        if game.waiting_for_card_selection() {
            return choose_starting_cards(game);
        }

        let sim = build_sim(game);
        let opponent = game.opponent_id();
        let plan = if game.is_prompt_target() {
            self.plan_prompt(&sim, opponent)
        } else {
            match game.step() {
                Step::Priority1 | Step::Priority2 | Step::Creatures => self.plan(&sim, opponent, SearchMode::General),
                Step::Attack => self.plan(&sim, opponent, SearchMode::AttackOnly),
                Step::Energize | Step::Draw => Vec::new(),
            }
        };
        self.adopt(plan)
    }
}

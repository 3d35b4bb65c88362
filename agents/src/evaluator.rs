// ═══════════════════════════════════════════════════════════════════════
// State evaluation — hand-tuned material count
//
// score = Σ(own creatures: energy + CARD_SCORE) + own magi energy
//       − the same for the opponent
//       ± WIN_BONUS for a finished game
//
// A heuristic, not a game value. Near-ties are common; the search breaks
// them by preferring shorter plans.
// ═══════════════════════════════════════════════════════════════════════

use magi_engine::state::State;
use magi_engine::types::*;

/// Worth of a creature in play beyond its energy.
pub const CARD_SCORE: f64 = 0.1;

/// Dominates every material term.
pub const WIN_BONUS: f64 = 1000.0;

pub fn score(sim: &State, attacker: PlayerId, opponent: PlayerId) -> f64 {
    score_with_bonus(sim, attacker, opponent, WIN_BONUS)
}

pub fn score_with_bonus(sim: &State, attacker: PlayerId, opponent: PlayerId, win_bonus: f64) -> f64 {
    let mut mine = 0.0;
    let mut theirs = 0.0;

    for creature in sim.in_play().cards.iter().filter(|c| c.is_creature()) {
        let value = creature.data.energy as f64 + CARD_SCORE;
        if creature.owner == attacker {
            mine += value;
        } else {
            theirs += value;
        }
    }

    mine += sim.active_magi(attacker).map_or(0, |m| m.data.energy) as f64;
    theirs += sim.active_magi(opponent).map_or(0, |m| m.data.energy) as f64;

    match sim.winner {
        Some(winner) if winner == attacker => mine += win_bonus,
        Some(_) => theirs += win_bonus,
        None => {}
    }
    mine - theirs
}

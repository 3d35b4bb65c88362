// ═══════════════════════════════════════════════════════════════════════
// Search configuration
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

/// Bounds and weights for the simulation search. Loadable from JSON;
/// missing fields take their defaults, unknown ones are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Failsafe for the priority, creature and prompt search.
    pub max_iterations: usize,
    /// Failsafe for the attack-only search.
    pub attack_max_iterations: usize,
    /// Quiet period before a burst of observed actions triggers a decision.
    pub debounce_ms: u64,
    /// Added to the winning side's score.
    pub win_bonus: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_iterations: 10_000,
            attack_max_iterations: 1_000,
            debounce_ms: 200,
            win_bonus: crate::evaluator::WIN_BONUS,
        }
    }
}

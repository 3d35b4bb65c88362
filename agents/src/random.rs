// ═══════════════════════════════════════════════════════════════════════
// Random Strategy — picks uniformly among the legal branches.
// Serves as a baseline and for exercising the engine and mirror.
// ═══════════════════════════════════════════════════════════════════════

use crate::extractor::extract_actions;
use crate::mirror::GameState;
use crate::snapshot::build_sim;
use crate::strategy::{choose_starting_cards, pass, Strategy};
use magi_engine::protocol::ClientAction;
use magi_engine::types::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct RandomStrategy {
    player_id: PlayerId,
    rng: ChaCha8Rng,
}

impl RandomStrategy {
    pub fn new(seed: u64) -> Self {
        RandomStrategy { player_id: 0, rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "Random"
    }

    fn setup(&mut self, player_id: PlayerId) {
        self.player_id = player_id;
    }

    fn request_action(&mut self, game: &GameState) -> ClientAction {
        if game.waiting_for_card_selection() {
            return choose_starting_cards(game);
        }
        let sim = build_sim(game);
        let branches = extract_actions(&sim, self.player_id, game.opponent_id(), &[], "");
        match branches.choose(&mut self.rng) {
            Some(item) => ClientAction::from(&item.action),
            None => pass(self.player_id),
        }
    }
}

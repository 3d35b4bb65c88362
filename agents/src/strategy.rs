// ═══════════════════════════════════════════════════════════════════════
// Strategy Trait — interface every decision agent implements
//
// KEY DESIGN PRINCIPLE:
//   Strategies read the game through the `GameState` mirror, which holds
//   only what the server showed this player. They never see the rules
//   engine's full state, so a strategy cannot peek at:
//     - The opponent's hand
//     - Either deck's contents or order
//
//   A strategy is asked for exactly one wire action per decision
//   opportunity and may keep a plan between calls.
// ═══════════════════════════════════════════════════════════════════════

use crate::mirror::GameState;
use magi_engine::protocol::ClientAction;
use magi_engine::types::*;

pub trait Strategy: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Called when the game data arrives, before any request.
    fn setup(&mut self, player_id: PlayerId);

    /// The next action to send. Only called while `game.needs_decision()`.
    fn request_action(&mut self, game: &GameState) -> ClientAction;
}

pub fn pass(player: PlayerId) -> ClientAction {
    ClientAction::Pass { player }
}

/// Answers the starting-hand selection with every offered card.
pub fn choose_starting_cards(game: &GameState) -> ClientAction {
    ClientAction::ResolvePrompt {
        prompt_type: PromptType::ChooseCards,
        target: None,
        number: None,
        use_effect: None,
        cards: Some(game.starting_cards().to_vec()),
        generated_by: game.prompt_generated_by().cloned(),
        player: game.player_id(),
    }
}

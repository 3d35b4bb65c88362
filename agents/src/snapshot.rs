// ═══════════════════════════════════════════════════════════════════════
// Simulation snapshot — a playable engine State built from the mirror
//
// Only what the viewer can see is imported. Hidden cards (the opponent's
// hand, both decks) are left out, so the sim never draws or reveals
// anything the agent could not know. The seat order is [me, opponent],
// which is the side fingerprints are written from.
// ═══════════════════════════════════════════════════════════════════════

use crate::mirror::{definition, GameState};
use log::debug;
use magi_engine::protocol::CardRef;
use magi_engine::state::{CardInGame, CardInGameData, State, StateConfig};
use magi_engine::types::*;

/// Deterministic PRNG seed for a decision point. The same point always
/// replays the same way inside the search.
pub fn seed_for(turn: u32, step: Step, player: PlayerId) -> u64 {
    turn as u64 * 1_000_003 + step.index() as u64 * 1_009 + player as u64
}

pub fn build_sim(game: &GameState) -> State {
    let me = game.player_id();
    let opponent = game.opponent_id();
    let view = game.state();

    let mut sim = State::new(StateConfig {
        players: [me, opponent],
        active_player: view.active_player,
        step: view.step,
        turn: view.turn,
        seed: seed_for(view.turn, view.step, view.active_player),
    });

    for (kind, mine, cards) in view.zones.iter() {
        let owner = if mine { me } else { opponent };
        for card in cards.iter().filter_map(import) {
            sim.zone_mut(kind, owner).add(card);
        }
    }

    sim.continuous_effects = view.continuous_effects.clone();
    if view.game_ended {
        sim.winner = view.winner;
    }

    if view.prompt {
        match (view.prompt_type, view.prompt_player, &view.prompt_generated_by) {
            (Some(prompt_type), Some(player), Some(source)) => {
                if let Err(e) = sim.enter_prompt(prompt_type, player, source, view.prompt_params.clone()) {
                    debug!("could not re-enter {} prompt from {}: {}", prompt_type, source, e);
                }
            }
            _ => debug!("prompt without type, player or source"),
        }
    }
    sim
}

fn import(card: &CardRef) -> Option<CardInGame> {
    let def = definition(card)?;
    let data = &card.data;
    Some(CardInGame {
        id: card.id.clone(),
        card: def,
        owner: card.owner,
        data: CardInGameData {
            energy: data.energy,
            controller: data.controller,
            attacked: data.attacked,
            actions_used: data.actions_used.clone(),
            energy_lost_this_turn: data.energy_lost_this_turn,
            defeated_creature: data.defeated_creature,
            has_attacked: data.has_attacked,
            was_attacked: data.was_attacked,
        },
    })
}

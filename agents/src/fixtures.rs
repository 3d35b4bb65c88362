// Shared builders for agent tests.

use crate::mirror::GameState;
use magi_engine::cards;
use magi_engine::state::{CardInGame, State, StateConfig};
use magi_engine::types::*;

/// Empty duel between players 1 and 2, player 1 to act in `step`.
pub fn sim(step: Step) -> State {
    State::new(StateConfig { step, turn: 3, ..Default::default() })
}

/// Puts a card into a zone and returns its id.
pub fn put(sim: &mut State, kind: ZoneType, owner: PlayerId, name: &str, energy: u32) -> CardId {
    let count: usize = sim.zones.iter().map(|z| z.len()).sum();
    let id = CardId(format!("f{}", count + 1));
    let def = cards::by_name(name).unwrap_or_else(|| panic!("no card named {}", name));
    sim.zone_mut(kind, owner).add(CardInGame::new(id.clone(), def, owner).with_energy(energy));
    id
}

/// What player `viewer` sees of `sim`.
pub fn view(sim: &State, viewer: PlayerId) -> GameState {
    GameState::new(viewer, sim.serialize_data(viewer))
}

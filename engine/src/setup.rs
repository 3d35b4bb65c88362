// ═══════════════════════════════════════════════════════════════════════
// Game setup — creates the initial State for a two-player duel
// ═══════════════════════════════════════════════════════════════════════

use crate::cards;
use crate::state::*;
use crate::types::*;
use log::warn;
use rand::seq::SliceRandom;

/// Cards in the opening hand.
pub const STARTING_HAND: usize = 5;

/// Deck list for one player: magi in order, then (card, copies).
struct DeckSetup {
    magi: &'static [&'static str],
    cards: &'static [(&'static str, usize)],
}

fn deck_setups() -> [DeckSetup; 2] {
    [
        DeckSetup {
            magi: &["Pruitt", "Poad"],
            cards: &[
                ("Weebo", 3),
                ("Timber Hyren", 2),
                ("Carillion", 2),
                ("Leaf Hyren", 3),
                ("Arbolit", 3),
                ("Ayebaw", 1),
                ("Grow", 3),
                ("War Drum", 1),
            ],
        },
        DeckSetup {
            magi: &["Grega", "Magam"],
            cards: &[
                ("Lava Balamant", 2),
                ("Kelthet", 2),
                ("Lava Aq", 3),
                ("Fire Chogo", 3),
                ("Quor Pup", 3),
                ("Fireball", 3),
                ("Shockwave", 2),
                ("Rage", 2),
                ("Siphon Stone", 1),
            ],
        },
    ]
}

/// Create the initial game state: Naroom (player 1) against Cald
/// (player 2). Seed controls deck shuffling and every later random draw.
/// Player 1 starts in PRS1 with the first magi energized.
pub fn create_initial_state(seed: u64) -> State {
    let players = [1, 2];
    let mut state = State::new(StateConfig { players, active_player: players[0], seed, ..Default::default() });

    let mut next_id = 0usize;
    for (player, setup) in players.into_iter().zip(deck_setups()) {
        let mut instance = |name: &str| -> Option<CardInGame> {
            let def = cards::by_name(name).or_else(|| {
                warn!("unknown card {} in deck list", name);
                None
            })?;
            next_id += 1;
            Some(CardInGame::new(CardId(format!("c{}", next_id)), def, player))
        };

        let mut magi: Vec<CardInGame> = setup.magi.iter().filter_map(|&name| instance(name)).collect();
        let mut deck: Vec<CardInGame> = setup
            .cards
            .iter()
            .flat_map(|&(name, copies)| std::iter::repeat(name).take(copies))
            .filter_map(|name| instance(name))
            .collect();
        deck.shuffle(&mut state.rng);

        if !magi.is_empty() {
            let first = magi.remove(0);
            let energy = first.card.data.starting_energy;
            state.zone_mut(ZoneType::ActiveMagi, player).add(first.with_energy(energy));
        }
        state.zone_mut(ZoneType::MagiPile, player).cards = magi;

        let hand_size = STARTING_HAND.min(deck.len());
        let hand: Vec<CardInGame> = deck.drain(deck.len() - hand_size..).collect();
        state.zone_mut(ZoneType::Hand, player).cards = hand;
        state.zone_mut(ZoneType::Deck, player).cards = deck;
    }

    state.start_turn(players[0]);
    state
}

// ═══════════════════════════════════════════════════════════════════════
// Visibility / Information Model
//
// Information in a duel is split between:
//   PUBLIC  — visible to both players at all times
//   PRIVATE — known only to the owning player
//   HIDDEN  — unknown to both players (deck order)
//
// This module produces the view of the game a player is allowed to see,
// both as a full snapshot (gameData) and per observed action.
// ═══════════════════════════════════════════════════════════════════════

use crate::protocol::{CardRef, Effect, SerializedState, SerializedZones, ServerAction};
use crate::state::State;
use crate::types::*;

// ── What is PUBLIC ─────────────────────────────────────────────────────
//
// • Everything in play, with energy and per-turn counters
// • Active magi, magi piles, defeated magi and discard piles
// • Step, turn, active player, prompt descriptor, continuous effects
// • Number of cards in each hand and deck
//
// ── What is PRIVATE ────────────────────────────────────────────────────
//
// • Your own hand
//
// ── What is HIDDEN ─────────────────────────────────────────────────────
//
// • Contents and order of both decks
//

fn is_private(kind: ZoneType) -> bool {
    matches!(kind, ZoneType::Hand | ZoneType::Deck)
}

impl State {
    /// The game as `viewer` sees it.
    pub fn serialize_data(&self, viewer: PlayerId) -> SerializedState {
        let opponent = self.opponent_of(viewer);
        let mut zones = SerializedZones::default();

        zones.in_play = self.in_play().cards.iter().map(CardRef::from).collect();
        for kind in ZoneType::PRIVATE {
            for (owner, mine) in [(viewer, true), (opponent, false)] {
                let visible = !(kind == ZoneType::Deck || (kind == ZoneType::Hand && !mine));
                *zones.get_mut(kind, mine) = self
                    .zone(kind, owner)
                    .cards
                    .iter()
                    .map(|c| if visible { CardRef::from(c) } else { CardRef::hidden(c.id.clone(), c.owner) })
                    .collect();
            }
        }

        let static_abilities = self
            .in_play()
            .cards
            .iter()
            .chain(self.players.iter().filter_map(|p| self.active_magi(*p)))
            .filter(|c| !c.card.data.static_abilities.is_empty())
            .map(|c| c.id.clone())
            .collect();

        let prompt = self.prompt.as_ref();
        SerializedState {
            zones,
            continuous_effects: self.continuous_effects.clone(),
            static_abilities,
            game_ended: self.winner.is_some(),
            winner: self.winner,
            active_player: self.active_player,
            prompt: prompt.is_some(),
            step: self.step,
            prompt_player: prompt.map(|p| p.player),
            prompt_type: prompt.map(|p| p.prompt_type),
            prompt_message: prompt.and_then(|p| p.message.clone()),
            prompt_params: prompt.map(|p| p.params.clone()).unwrap_or_default(),
            prompt_generated_by: prompt.map(|p| p.generated_by.clone()),
            prompt_available_cards: prompt.map(|p| p.params.cards.clone()).unwrap_or_default(),
            turn: self.turn,
            ..Default::default()
        }
    }
}

impl ServerAction {
    /// The action as `viewer` observes it: cards moving into or out of
    /// another player's hand, or into any deck, lose their identity.
    pub fn redacted_for(&self, viewer: PlayerId) -> ServerAction {
        match self {
            ServerAction::Effect(Effect::CardMovedBetweenZones { source_zone, destination_zone, target }) => {
                let zone_private = |name: &str| ZoneType::from_wire(name).is_some_and(is_private);
                let hide_hand = target.owner != viewer
                    && (zone_private(source_zone) || zone_private(destination_zone))
                    && destination_zone.as_str() != ZoneType::InPlay.as_wire()
                    && destination_zone.as_str() != ZoneType::Discard.as_wire();
                let hide_deck = destination_zone.as_str() == ZoneType::Deck.as_wire();
                if hide_hand || hide_deck {
                    ServerAction::Effect(Effect::CardMovedBetweenZones {
                        source_zone: source_zone.clone(),
                        destination_zone: destination_zone.clone(),
                        target: CardRef::hidden(target.id.clone(), target.owner),
                    })
                } else {
                    self.clone()
                }
            }
            other => other.clone(),
        }
    }
}

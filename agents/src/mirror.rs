// ═══════════════════════════════════════════════════════════════════════
// State Mirror — the agent's copy of the game as the server shows it
//
// Starts from the `gameData` snapshot and folds every observed server
// action into it. `reduce` never touches the state it is given: it
// returns a fresh SerializedState, and `GameState::update` swaps it in.
//
// Zones are addressed from the viewer's side: a card moving between
// zones lands in the "player" zones when its owner is the viewer and in
// the "opponent" zones otherwise. In-play is shared.
// ═══════════════════════════════════════════════════════════════════════

use log::debug;
use magi_engine::cards::{self, CardDefinition};
use magi_engine::protocol::{CardRef, Effect, SerializedState, SerializedZones, ServerAction};
use magi_engine::state::PromptParams;
use magi_engine::types::*;
use thiserror::Error;

/// Seconds left on the turn clock after a time notification.
const TURN_SECONDS: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirrorError {
    #[error("unknown zone: {0}")]
    UnknownZone(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    player_id: PlayerId,
    state: SerializedState,
}

impl GameState {
    pub fn new(player_id: PlayerId, state: SerializedState) -> Self {
        GameState { player_id, state }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn state(&self) -> &SerializedState {
        &self.state
    }

    /// Folds one observed action into the mirror.
    pub fn update(&mut self, action: &ServerAction) -> Result<(), MirrorError> {
        self.state = reduce(&self.state, action, self.player_id)?;
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// The other seat, taken from any card it owns.
    pub fn opponent_id(&self) -> PlayerId {
        self.state
            .zones
            .iter()
            .flat_map(|(_, _, cards)| cards.iter())
            .map(|c| c.owner)
            .find(|&owner| owner != self.player_id)
            .unwrap_or(self.player_id + 1)
    }

    pub fn my_magi(&self) -> Option<&CardRef> {
        self.state.zones.player_active_magi.first()
    }

    pub fn opponent_magi(&self) -> Option<&CardRef> {
        self.state.zones.opponent_active_magi.first()
    }

    pub fn my_creatures(&self) -> impl Iterator<Item = &CardRef> {
        self.in_play_of(true, CardType::Creature)
    }

    pub fn enemy_creatures(&self) -> impl Iterator<Item = &CardRef> {
        self.in_play_of(false, CardType::Creature)
    }

    pub fn my_relics(&self) -> impl Iterator<Item = &CardRef> {
        self.in_play_of(true, CardType::Relic)
    }

    pub fn enemy_relics(&self) -> impl Iterator<Item = &CardRef> {
        self.in_play_of(false, CardType::Relic)
    }

    fn in_play_of(&self, mine: bool, card_type: CardType) -> impl Iterator<Item = &CardRef> {
        let me = self.player_id;
        self.state.zones.in_play.iter().filter(move |c| {
            (c.data.controller == me) == mine && definition(c).is_some_and(|d| d.card_type == card_type)
        })
    }

    /// Cards in hand, the candidates for playing.
    pub fn hand(&self) -> &[CardRef] {
        &self.state.zones.player_hand
    }

    pub fn magi_pile(&self) -> &[CardRef] {
        &self.state.zones.player_magi_pile
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    pub fn has_prompt(&self) -> bool {
        self.state.prompt
    }

    pub fn prompt_type(&self) -> Option<PromptType> {
        self.state.prompt_type.filter(|_| self.state.prompt)
    }

    pub fn prompt_generated_by(&self) -> Option<&CardId> {
        self.state.prompt_generated_by.as_ref().filter(|_| self.state.prompt)
    }

    pub fn has_priority(&self) -> bool {
        !self.state.game_ended && self.state.active_player == self.player_id
    }

    pub fn is_prompt_target(&self) -> bool {
        self.state.prompt && self.state.prompt_player == Some(self.player_id)
    }

    /// True when the server is waiting on this player: an open prompt
    /// addressed to us, or priority with no prompt open.
    pub fn needs_decision(&self) -> bool {
        if self.state.game_ended {
            return false;
        }
        if self.state.prompt {
            self.is_prompt_target()
        } else {
            self.has_priority()
        }
    }

    pub fn waiting_for_card_selection(&self) -> bool {
        self.prompt_type() == Some(PromptType::ChooseCards)
    }

    pub fn starting_cards(&self) -> &[CardId] {
        if self.waiting_for_card_selection() {
            &self.state.prompt_available_cards
        } else {
            &[]
        }
    }
}

/// Static definition of a visible card.
pub fn definition(card: &CardRef) -> Option<&'static CardDefinition> {
    if card.is_hidden() {
        None
    } else {
        cards::by_name(&card.card)
    }
}

// ── Reducer ────────────────────────────────────────────────────────────

/// The state after observing `action`, as seen by player `me`.
pub fn reduce(state: &SerializedState, action: &ServerAction, me: PlayerId) -> Result<SerializedState, MirrorError> {
    let mut next = state.clone();
    match action {
        ServerAction::TimeNotification { .. } => {
            next.turn_timer = true;
            next.turn_seconds_left = TURN_SECONDS;
        }
        ServerAction::PlayerWins { player } => {
            next.game_ended = true;
            next.winner = Some(*player);
        }
        ServerAction::Pass { new_step, .. } => {
            next.step = new_step.or_else(|| state.step.next()).unwrap_or_default();
        }
        ServerAction::Power { source, power, .. } => {
            for card in permanents_mut(&mut next.zones).filter(|c| &c.id == source) {
                card.data.actions_used.push(power.clone());
            }
        }
        ServerAction::EnterPrompt { prompt_type, player, generated_by, message, prompt_params } => {
            next.prompt = true;
            next.prompt_player = Some(*player);
            next.prompt_type = Some(*prompt_type);
            next.prompt_message = message.clone();
            next.prompt_generated_by = generated_by.clone();
            next.prompt_available_cards = prompt_params.cards.clone();
            if let Some(params) = prompt_params_for(*prompt_type, prompt_params) {
                next.prompt_params = params;
            }
        }
        ServerAction::ResolvePrompt { .. } => {
            next.prompt = false;
            next.prompt_player = None;
            next.prompt_type = None;
            next.prompt_message = None;
            next.prompt_params = PromptParams::default();
            next.prompt_generated_by = None;
            next.prompt_available_cards.clear();
        }
        ServerAction::Attack { source, target, additional_attackers, .. } => {
            for card in next.zones.in_play.iter_mut() {
                if &card.id == source || additional_attackers.contains(&card.id) {
                    card.data.attacked = card.data.attacked.saturating_add(1);
                    card.data.has_attacked = true;
                } else if &card.id == target {
                    card.data.was_attacked = true;
                }
            }
        }
        ServerAction::Effect(effect) => apply_effect(&mut next, effect, me)?,
        ServerAction::Unknown => debug!("mirror: ignoring unknown action"),
    }
    Ok(next)
}

/// Parameters kept for a prompt type. None keeps the previous ones.
fn prompt_params_for(prompt_type: PromptType, params: &PromptParams) -> Option<PromptParams> {
    let kept = match prompt_type {
        PromptType::Number => PromptParams { min: params.min, max: params.max, ..Default::default() },
        PromptType::AnyCreatureExceptSource => PromptParams { source: params.source.clone(), ..Default::default() },
        PromptType::SingleCreatureFiltered => {
            PromptParams { restrictions: params.restrictions.clone(), ..Default::default() }
        }
        PromptType::ChooseNCardsFromZone => PromptParams {
            zone: params.zone,
            zone_owner: params.zone_owner,
            restrictions: params.restrictions.clone(),
            cards: params.cards.clone(),
            number_of_cards: params.number_of_cards,
            ..Default::default()
        },
        _ => return None,
    };
    Some(kept)
}

fn apply_effect(state: &mut SerializedState, effect: &Effect, me: PlayerId) -> Result<(), MirrorError> {
    match effect {
        Effect::CardMovedBetweenZones { source_zone, destination_zone, target } => {
            let from = zone_type(source_zone)?;
            let to = zone_type(destination_zone)?;
            let mine = target.owner == me;

            state.zones.get_mut(from, mine).retain(|c| c.id != target.id);
            state.zones.get_mut(to, mine).push(target.clone());

            if holds_abilities(from) {
                state.static_abilities.retain(|id| id != &target.id);
            } else if holds_abilities(to) && definition(target).is_some_and(|d| !d.data.static_abilities.is_empty()) {
                state.static_abilities.push(target.id.clone());
            }
        }
        Effect::StartOfTurn { player } => {
            state.active_player = *player;
            state.step = Step::Energize;
            state.turn += 1;
            for card in state.zones.in_play.iter_mut().filter(|c| c.data.controller == *player) {
                card.data.attacked = 0;
                card.data.has_attacked = false;
                card.data.was_attacked = false;
                card.data.actions_used.clear();
            }
            for magi in state.zones.get_mut(ZoneType::ActiveMagi, *player == me) {
                magi.data.was_attacked = false;
                magi.data.actions_used.clear();
            }
        }
        Effect::EndOfTurn { .. } => {
            state.turn_timer = false;
            state.continuous_effects.retain(|e| !e.expires_at_end_of_turn);
        }
        Effect::PayingEnergyForPower { source, amount } => match definition(source).map(|d| d.card_type) {
            Some(CardType::Magi) => drain_magi(&mut state.zones, &source.id, *amount),
            Some(CardType::Relic) => {
                for magi in state.zones.get_mut(ZoneType::ActiveMagi, source.data.controller == me) {
                    magi.data.energy = magi.data.energy.saturating_sub(*amount);
                }
            }
            // Creatures pay from their own energy, reported as a discard.
            Some(CardType::Creature) => {}
            _ => debug!("mirror: power payment from unknown card {}", source.id),
        },
        Effect::PayingEnergyForSpell { from, amount }
        | Effect::PayingEnergyForCreature { from, amount }
        | Effect::PayingEnergyForRelic { from, amount } => drain_magi(&mut state.zones, &from.id, *amount),
        Effect::ForbidAttackToCreature { target } => {
            for card in state.zones.in_play.iter_mut().filter(|c| c.id == target.id) {
                card.data.attacked = u32::MAX;
            }
        }
        Effect::DiscardEnergyFromCreature { target, amount } => {
            for t in target.iter() {
                for card in state.zones.in_play.iter_mut().filter(|c| c.id == t.id) {
                    card.data.energy = card.data.energy.saturating_sub(*amount);
                }
            }
        }
        Effect::DiscardEnergyFromMagi { target, amount } => drain_magi(&mut state.zones, &target.id, *amount),
        Effect::MoveEnergy { source, target, amount } => {
            for card in permanents_mut(&mut state.zones) {
                if card.id == source.id {
                    card.data.energy = card.data.energy.saturating_sub(*amount);
                } else if card.id == target.id {
                    card.data.energy = card.data.energy.saturating_add(*amount);
                }
            }
        }
        Effect::AddEnergyToCreature { target, amount } => {
            for t in target.iter() {
                for card in state.zones.in_play.iter_mut().filter(|c| c.id == t.id) {
                    card.data.energy = card.data.energy.saturating_add(*amount);
                }
            }
        }
        Effect::AddEnergyToMagi { target, amount } => {
            for magi in magi_mut(&mut state.zones).filter(|c| c.id == target.id) {
                magi.data.energy = magi.data.energy.saturating_add(*amount);
            }
        }
        Effect::RearrangeEnergyOnCreatures { energy_on_creatures } => {
            for card in state.zones.in_play.iter_mut() {
                if let Some(&energy) = energy_on_creatures.get(&card.id) {
                    card.data.energy = energy;
                }
            }
        }
        Effect::CreateContinuousEffect { effect } => state.continuous_effects.push(effect.clone()),
        Effect::Unknown => debug!("mirror: ignoring unknown effect"),
    }
    Ok(())
}

fn zone_type(name: &str) -> Result<ZoneType, MirrorError> {
    ZoneType::from_wire(name).ok_or_else(|| MirrorError::UnknownZone(name.to_string()))
}

/// Zones whose cards contribute static abilities.
fn holds_abilities(kind: ZoneType) -> bool {
    matches!(kind, ZoneType::InPlay | ZoneType::ActiveMagi)
}

fn magi_mut(zones: &mut SerializedZones) -> impl Iterator<Item = &mut CardRef> {
    zones.player_active_magi.iter_mut().chain(zones.opponent_active_magi.iter_mut())
}

fn permanents_mut(zones: &mut SerializedZones) -> impl Iterator<Item = &mut CardRef> {
    zones
        .in_play
        .iter_mut()
        .chain(zones.player_active_magi.iter_mut())
        .chain(zones.opponent_active_magi.iter_mut())
}

fn drain_magi(zones: &mut SerializedZones, id: &CardId, amount: u32) {
    for magi in magi_mut(zones).filter(|c| &c.id == id) {
        magi.data.energy = magi.data.energy.saturating_sub(amount);
    }
}

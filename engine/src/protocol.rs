// ═══════════════════════════════════════════════════════════════════════
// Wire protocol — client actions, observed server actions and effects,
// serialized game state, and session events.
//
// Shapes follow the game server's JSON: tagged by "type" for actions,
// "effectType" for effects, and "event" for session events. Kinds we
// do not model decode into an `Unknown` variant instead of failing.
// ═══════════════════════════════════════════════════════════════════════

use crate::engine::{Action, PromptResolution};
use crate::error::EngineError;
use crate::state::{CardInGame, ContinuousEffect, PromptParams};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Card references ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardRefData {
    pub energy: u32,
    pub controller: PlayerId,
    pub attacked: u32,
    pub actions_used: Vec<String>,
    pub energy_lost_this_turn: u32,
    pub defeated_creature: bool,
    pub has_attacked: bool,
    pub was_attacked: bool,
}

/// A card as seen on the wire. `card` is the printed name, empty when
/// the card is hidden from the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardRef {
    pub id: CardId,
    pub card: String,
    pub owner: PlayerId,
    pub data: CardRefData,
}

impl CardRef {
    pub fn hidden(id: CardId, owner: PlayerId) -> Self {
        CardRef { id, owner, data: CardRefData { controller: owner, ..Default::default() }, ..Default::default() }
    }

    pub fn is_hidden(&self) -> bool {
        self.card.is_empty()
    }
}

impl From<&CardInGame> for CardRef {
    fn from(card: &CardInGame) -> Self {
        CardRef {
            id: card.id.clone(),
            card: card.card.name.to_string(),
            owner: card.owner,
            data: CardRefData {
                energy: card.data.energy,
                controller: card.data.controller,
                attacked: card.data.attacked,
                actions_used: card.data.actions_used.clone(),
                energy_lost_this_turn: card.data.energy_lost_this_turn,
                defeated_creature: card.data.defeated_creature,
                has_attacked: card.data.has_attacked,
                was_attacked: card.data.was_attacked,
            },
        }
    }
}

/// A field the server sends either as one value or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item).iter(),
            OneOrMany::Many(items) => items.iter(),
        }
    }
}

// ── Client actions (outbound) ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayPayload {
    pub card: CardId,
    pub player: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientAction {
    #[serde(rename = "actions/pass")]
    Pass { player: PlayerId },
    #[serde(rename = "actions/play")]
    Play { payload: PlayPayload },
    #[serde(rename = "actions/power")]
    Power { source: CardId, power: String, player: PlayerId },
    #[serde(rename = "actions/attack", rename_all = "camelCase")]
    Attack {
        source: CardId,
        target: CardId,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        additional_attackers: Vec<CardId>,
        player: PlayerId,
    },
    #[serde(rename = "actions/resolvePrompt", rename_all = "camelCase")]
    ResolvePrompt {
        prompt_type: PromptType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<CardId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        number: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        use_effect: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cards: Option<Vec<CardId>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        generated_by: Option<CardId>,
        player: PlayerId,
    },
}

impl ClientAction {
    pub fn player(&self) -> PlayerId {
        match self {
            ClientAction::Pass { player }
            | ClientAction::Power { player, .. }
            | ClientAction::Attack { player, .. }
            | ClientAction::ResolvePrompt { player, .. } => *player,
            ClientAction::Play { payload } => payload.player,
        }
    }
}

impl From<&Action> for ClientAction {
    fn from(action: &Action) -> Self {
        match action {
            Action::Pass { player } => ClientAction::Pass { player: *player },
            Action::Play { player, card } => ClientAction::Play {
                payload: PlayPayload { card: card.clone(), player: *player },
            },
            Action::Power { player, source, power } => ClientAction::Power {
                source: source.clone(),
                power: power.clone(),
                player: *player,
            },
            Action::Attack { player, source, target, additional_attackers } => ClientAction::Attack {
                source: source.clone(),
                target: target.clone(),
                additional_attackers: additional_attackers.clone(),
                player: *player,
            },
            Action::ResolvePrompt { player, prompt_type, generated_by, resolution } => {
                let (mut target, mut number, mut use_effect, mut cards) = (None, None, None, None);
                match resolution {
                    PromptResolution::Target(id) => target = Some(id.clone()),
                    PromptResolution::Number(n) => number = Some(*n),
                    PromptResolution::UseEffect(b) => use_effect = Some(*b),
                    PromptResolution::Cards(ids) => cards = Some(ids.clone()),
                }
                ClientAction::ResolvePrompt {
                    prompt_type: *prompt_type,
                    target,
                    number,
                    use_effect,
                    cards,
                    generated_by: generated_by.clone(),
                    player: *player,
                }
            }
        }
    }
}

impl TryFrom<ClientAction> for Action {
    type Error = EngineError;

    fn try_from(action: ClientAction) -> Result<Self, Self::Error> {
        Ok(match action {
            ClientAction::Pass { player } => Action::Pass { player },
            ClientAction::Play { payload } => Action::Play { player: payload.player, card: payload.card },
            ClientAction::Power { source, power, player } => Action::Power { player, source, power },
            ClientAction::Attack { source, target, additional_attackers, player } => {
                Action::Attack { player, source, target, additional_attackers }
            }
            ClientAction::ResolvePrompt { prompt_type, target, number, use_effect, cards, generated_by, player } => {
                let resolution = match (target, number, use_effect, cards) {
                    (Some(id), _, _, _) => PromptResolution::Target(id),
                    (_, Some(n), _, _) => PromptResolution::Number(n),
                    (_, _, Some(b), _) => PromptResolution::UseEffect(b),
                    (_, _, _, Some(ids)) => PromptResolution::Cards(ids),
                    _ => return Err(EngineError::InvalidPromptResolution(prompt_type)),
                };
                Action::ResolvePrompt { player, prompt_type, generated_by, resolution }
            }
        })
    }
}

// ── Server actions (inbound) ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerAction {
    #[serde(rename = "actions/timeNotification", rename_all = "camelCase")]
    TimeNotification {
        #[serde(default)]
        player: Option<PlayerId>,
    },
    #[serde(rename = "actions/playerWins")]
    PlayerWins { player: PlayerId },
    #[serde(rename = "actions/pass", rename_all = "camelCase")]
    Pass {
        player: PlayerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_step: Option<Step>,
    },
    #[serde(rename = "actions/power")]
    Power { source: CardId, power: String, player: PlayerId },
    #[serde(rename = "actions/enterPrompt", rename_all = "camelCase")]
    EnterPrompt {
        prompt_type: PromptType,
        player: PlayerId,
        #[serde(default)]
        generated_by: Option<CardId>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        prompt_params: PromptParams,
    },
    #[serde(rename = "actions/resolvePrompt")]
    ResolvePrompt {
        #[serde(default)]
        player: Option<PlayerId>,
    },
    #[serde(rename = "actions/attack", rename_all = "camelCase")]
    Attack {
        source: CardId,
        target: CardId,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        additional_attackers: Vec<CardId>,
        player: PlayerId,
    },
    #[serde(rename = "actions/effect")]
    Effect(Effect),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effectType")]
pub enum Effect {
    #[serde(rename = "effects/cardMovedBetweenZones", rename_all = "camelCase")]
    CardMovedBetweenZones { source_zone: String, destination_zone: String, target: CardRef },
    #[serde(rename = "effects/startOfTurn")]
    StartOfTurn { player: PlayerId },
    #[serde(rename = "effects/endOfTurn")]
    EndOfTurn { player: PlayerId },
    #[serde(rename = "effects/payingEnergyForPower")]
    PayingEnergyForPower { source: CardRef, amount: u32 },
    #[serde(rename = "effects/payingEnergyForSpell")]
    PayingEnergyForSpell { from: CardRef, amount: u32 },
    #[serde(rename = "effects/payingEnergyForCreature")]
    PayingEnergyForCreature { from: CardRef, amount: u32 },
    #[serde(rename = "effects/payingEnergyForRelic")]
    PayingEnergyForRelic { from: CardRef, amount: u32 },
    #[serde(rename = "effects/forbidAttackToCreature")]
    ForbidAttackToCreature { target: CardRef },
    #[serde(rename = "effects/discardEnergyFromCreature")]
    DiscardEnergyFromCreature { target: OneOrMany<CardRef>, amount: u32 },
    #[serde(rename = "effects/discardEnergyFromMagi")]
    DiscardEnergyFromMagi { target: CardRef, amount: u32 },
    #[serde(rename = "effects/moveEnergy")]
    MoveEnergy { source: CardRef, target: CardRef, amount: u32 },
    #[serde(rename = "effects/addEnergyToCreature")]
    AddEnergyToCreature { target: OneOrMany<CardRef>, amount: u32 },
    #[serde(rename = "effects/addEnergyToMagi")]
    AddEnergyToMagi { target: CardRef, amount: u32 },
    #[serde(rename = "effects/rearrangeEnergyOnCreatures", rename_all = "camelCase")]
    RearrangeEnergyOnCreatures { energy_on_creatures: BTreeMap<CardId, u32> },
    #[serde(rename = "effects/createContinuousEffect")]
    CreateContinuousEffect { effect: ContinuousEffect },
    #[serde(other)]
    Unknown,
}

// ── Serialized state ───────────────────────────────────────────────────
// The game state as one player sees it, sent with the gameData event.

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SerializedZones {
    pub player_hand: Vec<CardRef>,
    pub opponent_hand: Vec<CardRef>,
    pub player_deck: Vec<CardRef>,
    pub opponent_deck: Vec<CardRef>,
    pub player_discard: Vec<CardRef>,
    pub opponent_discard: Vec<CardRef>,
    pub player_active_magi: Vec<CardRef>,
    pub opponent_active_magi: Vec<CardRef>,
    pub player_magi_pile: Vec<CardRef>,
    pub opponent_magi_pile: Vec<CardRef>,
    pub player_defeated_magi: Vec<CardRef>,
    pub opponent_defeated_magi: Vec<CardRef>,
    pub in_play: Vec<CardRef>,
}

impl SerializedZones {
    /// `mine` selects the viewer's side. In-play ignores it.
    pub fn get(&self, kind: ZoneType, mine: bool) -> &Vec<CardRef> {
        match (kind, mine) {
            (ZoneType::InPlay, _) => &self.in_play,
            (ZoneType::Hand, true) => &self.player_hand,
            (ZoneType::Hand, false) => &self.opponent_hand,
            (ZoneType::Deck, true) => &self.player_deck,
            (ZoneType::Deck, false) => &self.opponent_deck,
            (ZoneType::Discard, true) => &self.player_discard,
            (ZoneType::Discard, false) => &self.opponent_discard,
            (ZoneType::ActiveMagi, true) => &self.player_active_magi,
            (ZoneType::ActiveMagi, false) => &self.opponent_active_magi,
            (ZoneType::MagiPile, true) => &self.player_magi_pile,
            (ZoneType::MagiPile, false) => &self.opponent_magi_pile,
            (ZoneType::DefeatedMagi, true) => &self.player_defeated_magi,
            (ZoneType::DefeatedMagi, false) => &self.opponent_defeated_magi,
        }
    }

    pub fn get_mut(&mut self, kind: ZoneType, mine: bool) -> &mut Vec<CardRef> {
        match (kind, mine) {
            (ZoneType::InPlay, _) => &mut self.in_play,
            (ZoneType::Hand, true) => &mut self.player_hand,
            (ZoneType::Hand, false) => &mut self.opponent_hand,
            (ZoneType::Deck, true) => &mut self.player_deck,
            (ZoneType::Deck, false) => &mut self.opponent_deck,
            (ZoneType::Discard, true) => &mut self.player_discard,
            (ZoneType::Discard, false) => &mut self.opponent_discard,
            (ZoneType::ActiveMagi, true) => &mut self.player_active_magi,
            (ZoneType::ActiveMagi, false) => &mut self.opponent_active_magi,
            (ZoneType::MagiPile, true) => &mut self.player_magi_pile,
            (ZoneType::MagiPile, false) => &mut self.opponent_magi_pile,
            (ZoneType::DefeatedMagi, true) => &mut self.player_defeated_magi,
            (ZoneType::DefeatedMagi, false) => &mut self.opponent_defeated_magi,
        }
    }

    /// Every zone with its kind and side, in-play last.
    pub fn iter(&self) -> impl Iterator<Item = (ZoneType, bool, &Vec<CardRef>)> {
        ZoneType::PRIVATE
            .into_iter()
            .flat_map(|kind| [(kind, true), (kind, false)])
            .chain(std::iter::once((ZoneType::InPlay, true)))
            .map(move |(kind, mine)| (kind, mine, self.get(kind, mine)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SerializedState {
    pub zones: SerializedZones,
    pub continuous_effects: Vec<ContinuousEffect>,
    /// Cards in play or magi slots that carry static abilities.
    pub static_abilities: Vec<CardId>,
    pub turn_timer: bool,
    pub turn_seconds_left: u32,
    pub game_ended: bool,
    pub winner: Option<PlayerId>,
    pub active_player: PlayerId,
    pub prompt: bool,
    pub step: Step,
    pub prompt_player: Option<PlayerId>,
    pub prompt_type: Option<PromptType>,
    pub prompt_message: Option<String>,
    pub prompt_params: PromptParams,
    pub prompt_generated_by: Option<CardId>,
    pub prompt_available_cards: Vec<CardId>,
    pub turn: u32,
}

// ── Session events ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "gameData", rename_all = "camelCase")]
    GameData { player_id: PlayerId, state: SerializedState },
    #[serde(rename = "action")]
    Action(ServerAction),
}

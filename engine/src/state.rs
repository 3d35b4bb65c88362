// ═══════════════════════════════════════════════════════════════════════
// Game state — zones, cards in game, prompts, continuous effects
//
// A State is a plain owned value. Cloning it yields a fully independent
// copy (card definitions are &'static and immutable), which is what the
// search relies on when it explores many futures from one ancestor.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::{AbilityScope, CardDefinition, EffectKind};
use crate::error::EngineError;
use crate::protocol::ServerAction;
use crate::types::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

// ── Cards in game ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardInGameData {
    pub energy: u32,
    pub controller: PlayerId,
    /// Attacks made this turn.
    pub attacked: u32,
    /// Power names used this turn.
    pub actions_used: Vec<String>,
    pub energy_lost_this_turn: u32,
    pub defeated_creature: bool,
    pub has_attacked: bool,
    pub was_attacked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardInGame {
    pub id: CardId,
    pub card: &'static CardDefinition,
    pub owner: PlayerId,
    pub data: CardInGameData,
}

impl CardInGame {
    pub fn new(id: CardId, card: &'static CardDefinition, owner: PlayerId) -> Self {
        CardInGame {
            id,
            card,
            owner,
            data: CardInGameData { controller: owner, ..Default::default() },
        }
    }

    pub fn with_energy(mut self, energy: u32) -> Self {
        self.data.energy = energy;
        self
    }

    pub fn is_creature(&self) -> bool {
        self.card.is_creature()
    }

    pub fn power_used(&self, power: &str) -> bool {
        self.data.actions_used.iter().any(|p| p == power)
    }

    /// Clears the per-turn counters and flags.
    pub fn clear_turn_flags(&mut self) {
        self.data.attacked = 0;
        self.data.actions_used.clear();
        self.data.energy_lost_this_turn = 0;
        self.data.has_attacked = false;
        self.data.was_attacked = false;
    }
}

// ── Zones ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub name: String,
    pub zone_type: ZoneType,
    /// None for the shared in-play zone.
    pub owner: Option<PlayerId>,
    pub cards: Vec<CardInGame>,
}

impl Zone {
    pub fn new(zone_type: ZoneType, owner: Option<PlayerId>) -> Self {
        let name = match owner {
            Some(p) => format!("{}:{}", zone_type.as_wire(), p),
            None => zone_type.as_wire().to_string(),
        };
        Zone { name, zone_type, owner, cards: Vec::new() }
    }

    /// Singleton accessor (active magi slot).
    pub fn card(&self) -> Option<&CardInGame> {
        self.cards.first()
    }

    pub fn card_mut(&mut self) -> Option<&mut CardInGame> {
        self.cards.first_mut()
    }

    pub fn by_id(&self, id: &CardId) -> Option<&CardInGame> {
        self.cards.iter().find(|c| &c.id == id)
    }

    pub fn by_id_mut(&mut self, id: &CardId) -> Option<&mut CardInGame> {
        self.cards.iter_mut().find(|c| &c.id == id)
    }

    pub fn add(&mut self, card: CardInGame) {
        self.cards.push(card);
    }

    pub fn remove(&mut self, id: &CardId) -> Option<CardInGame> {
        let index = self.cards.iter().position(|c| &c.id == id)?;
        Some(self.cards.remove(index))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

// ── Prompts ────────────────────────────────────────────────────────────

/// Type-specific prompt parameters. Shared with the wire protocol.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<CardId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<Restriction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<ZoneType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_owner: Option<PlayerId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<CardId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_cards: Option<u32>,
}

/// The effect waiting on a prompt answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEffect {
    pub effect: EffectKind,
    pub source: CardId,
    pub controller: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub prompt_type: PromptType,
    pub player: PlayerId,
    pub generated_by: CardId,
    pub message: Option<String>,
    pub params: PromptParams,
    pub pending: Option<PendingEffect>,
}

// ── Continuous effects ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuousEffect {
    pub property: Property,
    pub modifier: i32,
    /// Applies to creatures controlled by this player.
    pub player: PlayerId,
    pub generated_by: CardId,
    #[serde(default)]
    pub expires_at_end_of_turn: bool,
}

// ── State ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct StateConfig {
    pub players: [PlayerId; 2],
    pub active_player: PlayerId,
    pub step: Step,
    pub turn: u32,
    pub seed: u64,
}

impl Default for StateConfig {
    fn default() -> Self {
        StateConfig { players: [1, 2], active_player: 1, step: Step::Energize, turn: 1, seed: 0 }
    }
}

#[derive(Debug, Clone)]
pub struct State {
    /// In-play zone first, then six private zones per seat.
    pub zones: Vec<Zone>,
    pub players: [PlayerId; 2],
    pub active_player: PlayerId,
    pub step: Step,
    pub turn: u32,
    pub prompt: Option<Prompt>,
    pub continuous_effects: Vec<ContinuousEffect>,
    pub winner: Option<PlayerId>,
    pub rng: ChaCha8Rng,
    journal: Option<Vec<ServerAction>>,
}

impl State {
    pub fn new(config: StateConfig) -> Self {
        let mut zones = vec![Zone::new(ZoneType::InPlay, None)];
        for player in config.players {
            for kind in ZoneType::PRIVATE {
                zones.push(Zone::new(kind, Some(player)));
            }
        }
        State {
            zones,
            players: config.players,
            active_player: config.active_player,
            step: config.step,
            turn: config.turn,
            prompt: None,
            continuous_effects: Vec::new(),
            winner: None,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            journal: None,
        }
    }

    // ── Players ──

    /// Rebinds both seats. Zone contents stay in their seats.
    pub fn set_players(&mut self, first: PlayerId, second: PlayerId) {
        let players = [first, second];
        self.players = players;
        for (i, zone) in self.zones.iter_mut().enumerate().skip(1) {
            let player = players[(i - 1) / ZoneType::PRIVATE.len()];
            zone.owner = Some(player);
            zone.name = format!("{}:{}", zone.zone_type.as_wire(), player);
        }
    }

    /// Any id other than the first player addresses the second seat.
    fn seat(&self, player: PlayerId) -> usize {
        if player == self.players[0] { 0 } else { 1 }
    }

    pub fn opponent_of(&self, player: PlayerId) -> PlayerId {
        self.players[1 - self.seat(player)]
    }

    // ── Zones ──

    fn zone_index(&self, kind: ZoneType, owner: PlayerId) -> usize {
        if kind.is_shared() {
            0
        } else {
            1 + self.seat(owner) * ZoneType::PRIVATE.len() + kind.private_slot()
        }
    }

    pub fn zone(&self, kind: ZoneType, owner: PlayerId) -> &Zone {
        &self.zones[self.zone_index(kind, owner)]
    }

    pub fn zone_mut(&mut self, kind: ZoneType, owner: PlayerId) -> &mut Zone {
        let index = self.zone_index(kind, owner);
        &mut self.zones[index]
    }

    pub fn in_play(&self) -> &Zone {
        &self.zones[0]
    }

    pub fn in_play_mut(&mut self) -> &mut Zone {
        &mut self.zones[0]
    }

    pub fn active_magi(&self, player: PlayerId) -> Option<&CardInGame> {
        self.zone(ZoneType::ActiveMagi, player).card()
    }

    pub fn active_magi_mut(&mut self, player: PlayerId) -> Option<&mut CardInGame> {
        self.zone_mut(ZoneType::ActiveMagi, player).card_mut()
    }

    /// Creatures in play under `player`'s control.
    pub fn creatures_of(&self, player: PlayerId) -> impl Iterator<Item = &CardInGame> {
        self.in_play().cards.iter().filter(move |c| c.is_creature() && c.data.controller == player)
    }

    /// Finds a card anywhere in the game, with the zone holding it.
    pub fn find_card(&self, id: &CardId) -> Option<(&Zone, &CardInGame)> {
        self.zones.iter().find_map(|z| z.by_id(id).map(|c| (z, c)))
    }

    // ── Static abilities & filters ──

    /// Applies static abilities and continuous effects to a base property.
    pub fn modify_by_static_abilities(&self, card: &CardInGame, property: Property) -> u32 {
        let base: i32 = match property {
            Property::AttacksPerTurn => 1,
            Property::Energize => card.card.data.energize as i32,
            Property::Cost => card.card.cost.unwrap_or(0) as i32,
        };

        let carriers = self
            .in_play()
            .cards
            .iter()
            .chain(self.players.iter().filter_map(|p| self.active_magi(*p)));

        let mut value = base;
        for carrier in carriers {
            for ability in carrier.card.data.static_abilities.iter().filter(|a| a.property == property) {
                let applies = match ability.scope {
                    AbilityScope::SelfOnly => carrier.id == card.id,
                    AbilityScope::OwnCreatures => {
                        card.is_creature() && card.data.controller == carrier.data.controller
                    }
                };
                if applies {
                    value += ability.modifier;
                }
            }
        }
        for effect in self.continuous_effects.iter().filter(|e| e.property == property) {
            if card.is_creature() && card.data.controller == effect.player {
                value += effect.modifier;
            }
        }
        value.max(0) as u32
    }

    /// Compiles restriction descriptors into a card predicate, evaluated
    /// from `player`'s point of view. All restrictions must hold.
    pub fn make_card_filter(&self, restrictions: &[Restriction], player: PlayerId) -> impl Fn(&CardInGame) -> bool {
        let restrictions = restrictions.to_vec();
        move |card: &CardInGame| {
            restrictions.iter().all(|r| match *r {
                Restriction::OwnCreature => card.is_creature() && card.data.controller == player,
                Restriction::OpponentCreature => card.is_creature() && card.data.controller != player,
                Restriction::EnergyLessThan(n) => card.data.energy < n,
                Restriction::EnergyEquals(n) => card.data.energy == n,
                Restriction::Region(region) => card.card.region == region,
                Restriction::CreatureWasAttacked => card.data.was_attacked,
            })
        }
    }

    // ── Winner & randomness ──

    pub fn has_winner(&self) -> bool {
        self.winner.is_some()
    }

    pub fn initiate_prng(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    // ── Journal ──
    // Records every server action the engine emits, for feeding mirrors.

    pub fn enable_journal(&mut self) {
        self.journal.get_or_insert_with(Vec::new);
    }

    pub fn take_journal(&mut self) -> Vec<ServerAction> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    pub(crate) fn emit(&mut self, action: ServerAction) {
        if let Some(journal) = self.journal.as_mut() {
            journal.push(action);
        }
    }

    // ── Prompts ──

    /// Enters a prompt generated by a card already in the game. The pending
    /// effect is the card's effect that raises this prompt type.
    pub fn enter_prompt(
        &mut self,
        prompt_type: PromptType,
        player: PlayerId,
        generated_by: &CardId,
        params: PromptParams,
    ) -> Result<(), EngineError> {
        let (_, card) = self
            .find_card(generated_by)
            .ok_or_else(|| EngineError::CardNotFound(generated_by.clone()))?;
        let effect = card
            .card
            .effects()
            .find(|e| e.prompt_type() == Some(prompt_type))
            .ok_or(EngineError::UnsupportedPrompt(prompt_type))?;

        self.prompt = Some(Prompt {
            prompt_type,
            player,
            generated_by: generated_by.clone(),
            message: None,
            params,
            pending: Some(PendingEffect { effect, source: generated_by.clone(), controller: player }),
        });
        Ok(())
    }

    pub fn skip_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn has_prompt(&self) -> bool {
        self.prompt.is_some()
    }
}

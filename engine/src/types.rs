// ═══════════════════════════════════════════════════════════════════════
// Core types — identifiers, card taxonomy, turn steps, zones, prompts
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric player identifier as assigned by the game server.
pub type PlayerId = u32;

// ── Card ID ────────────────────────────────────────────────────────────
// Stable per game instance. Cloning a State preserves every id, so an
// action built against a clone addresses the clone's copy of the card.

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        CardId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        CardId(id.to_string())
    }
}

// ── Enums ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    #[serde(rename = "types/creature")]
    Creature,
    #[serde(rename = "types/magi")]
    Magi,
    #[serde(rename = "types/relic")]
    Relic,
    #[serde(rename = "types/spell")]
    Spell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "regions/arderial")]
    Arderial,
    #[serde(rename = "regions/bograth")]
    Bograth,
    #[serde(rename = "regions/cald")]
    Cald,
    #[serde(rename = "regions/naroom")]
    Naroom,
    #[serde(rename = "regions/orothe")]
    Orothe,
    #[serde(rename = "regions/underneath")]
    Underneath,
    #[serde(rename = "regions/universal")]
    Universal,
}

/// Turn structure. Serialized as its index (0..=5) like the game server does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    #[default]
    Energize,
    Priority1,
    Attack,
    Creatures,
    Priority2,
    Draw,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Energize,
        Step::Priority1,
        Step::Attack,
        Step::Creatures,
        Step::Priority2,
        Step::Draw,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Step> {
        Step::ALL.get(index as usize).copied()
    }

    /// Next step within the same turn. None after Draw (turn ends).
    pub fn next(self) -> Option<Step> {
        Step::from_index(self.index() + 1)
    }

    /// Steps in which powers, spells and relics may be used.
    pub fn is_priority(self) -> bool {
        matches!(self, Step::Priority1 | Step::Priority2)
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Step::from_index(value).ok_or_else(|| format!("invalid step index {}", value))
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> u8 {
        step.index()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Energize => "energize",
            Step::Priority1 => "prs1",
            Step::Attack => "attack",
            Step::Creatures => "creatures",
            Step::Priority2 => "prs2",
            Step::Draw => "draw",
        };
        f.write_str(name)
    }
}

// ── Zones ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneType {
    #[serde(rename = "zones/hand")]
    Hand,
    #[serde(rename = "zones/deck")]
    Deck,
    #[serde(rename = "zones/discard")]
    Discard,
    #[serde(rename = "zones/activeMagi")]
    ActiveMagi,
    #[serde(rename = "zones/magiPile")]
    MagiPile,
    #[serde(rename = "zones/defeatedMagi")]
    DefeatedMagi,
    #[serde(rename = "zones/inPlay")]
    InPlay,
}

impl ZoneType {
    /// Per-player zones, in canonical layout order.
    pub const PRIVATE: [ZoneType; 6] = [
        ZoneType::Hand,
        ZoneType::Deck,
        ZoneType::Discard,
        ZoneType::ActiveMagi,
        ZoneType::MagiPile,
        ZoneType::DefeatedMagi,
    ];

    pub fn as_wire(self) -> &'static str {
        match self {
            ZoneType::Hand => "zones/hand",
            ZoneType::Deck => "zones/deck",
            ZoneType::Discard => "zones/discard",
            ZoneType::ActiveMagi => "zones/activeMagi",
            ZoneType::MagiPile => "zones/magiPile",
            ZoneType::DefeatedMagi => "zones/defeatedMagi",
            ZoneType::InPlay => "zones/inPlay",
        }
    }

    pub fn from_wire(name: &str) -> Option<ZoneType> {
        match name {
            "zones/hand" => Some(ZoneType::Hand),
            "zones/deck" => Some(ZoneType::Deck),
            "zones/discard" => Some(ZoneType::Discard),
            "zones/activeMagi" => Some(ZoneType::ActiveMagi),
            "zones/magiPile" => Some(ZoneType::MagiPile),
            "zones/defeatedMagi" => Some(ZoneType::DefeatedMagi),
            "zones/inPlay" => Some(ZoneType::InPlay),
            _ => None,
        }
    }

    /// The single in-play zone is shared by both players.
    pub fn is_shared(self) -> bool {
        self == ZoneType::InPlay
    }

    pub(crate) fn private_slot(self) -> usize {
        match self {
            ZoneType::Hand => 0,
            ZoneType::Deck => 1,
            ZoneType::Discard => 2,
            ZoneType::ActiveMagi => 3,
            ZoneType::MagiPile => 4,
            ZoneType::DefeatedMagi => 5,
            ZoneType::InPlay => 0,
        }
    }
}

// ── Prompts ────────────────────────────────────────────────────────────
// Unknown prompt names from the server map to `Unknown` instead of
// failing the whole action decode.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PromptType {
    ChooseCards,
    MayAbility,
    Number,
    SingleCreature,
    OwnSingleCreature,
    SingleCreatureFiltered,
    SingleMagi,
    SingleCreatureOrMagi,
    AnyCreatureExceptSource,
    ChooseNCardsFromZone,
    RearrangeEnergyOnCreatures,
    DistributeEnergyOnCreatures,
    Unknown,
}

impl PromptType {
    pub fn as_wire(self) -> &'static str {
        match self {
            PromptType::ChooseCards => "prompt/chooseCards",
            PromptType::MayAbility => "prompt/mayAbility",
            PromptType::Number => "prompt/number",
            PromptType::SingleCreature => "prompt/singleCreature",
            PromptType::OwnSingleCreature => "prompt/ownSingleCreature",
            PromptType::SingleCreatureFiltered => "prompt/singleCreatureFiltered",
            PromptType::SingleMagi => "prompt/singleMagi",
            PromptType::SingleCreatureOrMagi => "prompt/singleCreatureOrMagi",
            PromptType::AnyCreatureExceptSource => "prompt/anyCreatureExceptSource",
            PromptType::ChooseNCardsFromZone => "prompt/chooseNCardsFromZone",
            PromptType::RearrangeEnergyOnCreatures => "prompt/rearrangeEnergyOnCreatures",
            PromptType::DistributeEnergyOnCreatures => "prompt/distributeEnergyOnCreatures",
            PromptType::Unknown => "prompt/unknown",
        }
    }

    /// Prompts answered with a card reference.
    pub fn is_targeted(self) -> bool {
        matches!(
            self,
            PromptType::SingleCreature
                | PromptType::OwnSingleCreature
                | PromptType::SingleCreatureFiltered
                | PromptType::SingleMagi
                | PromptType::SingleCreatureOrMagi
                | PromptType::AnyCreatureExceptSource
        )
    }
}

impl From<String> for PromptType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "prompt/chooseCards" => PromptType::ChooseCards,
            "prompt/mayAbility" => PromptType::MayAbility,
            "prompt/number" => PromptType::Number,
            "prompt/singleCreature" => PromptType::SingleCreature,
            "prompt/ownSingleCreature" => PromptType::OwnSingleCreature,
            "prompt/singleCreatureFiltered" => PromptType::SingleCreatureFiltered,
            "prompt/singleMagi" => PromptType::SingleMagi,
            "prompt/singleCreatureOrMagi" => PromptType::SingleCreatureOrMagi,
            "prompt/anyCreatureExceptSource" => PromptType::AnyCreatureExceptSource,
            "prompt/chooseNCardsFromZone" => PromptType::ChooseNCardsFromZone,
            "prompt/rearrangeEnergyOnCreatures" => PromptType::RearrangeEnergyOnCreatures,
            "prompt/distributeEnergyOnCreatures" => PromptType::DistributeEnergyOnCreatures,
            _ => PromptType::Unknown,
        }
    }
}

impl From<PromptType> for String {
    fn from(prompt: PromptType) -> String {
        prompt.as_wire().to_string()
    }
}

impl fmt::Display for PromptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

// ── Properties & restrictions ──────────────────────────────────────────

/// Card properties that static abilities and continuous effects modify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    #[serde(rename = "properties/attacksPerTurn")]
    AttacksPerTurn,
    #[serde(rename = "properties/energize")]
    Energize,
    #[serde(rename = "properties/cost")]
    Cost,
}

/// Restriction descriptors compiled into card predicates by
/// `State::make_card_filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Restriction {
    #[serde(rename = "restrictions/ownCreature")]
    OwnCreature,
    #[serde(rename = "restrictions/opponentCreature")]
    OpponentCreature,
    #[serde(rename = "restrictions/energyLessThan")]
    EnergyLessThan(u32),
    #[serde(rename = "restrictions/energyEquals")]
    EnergyEquals(u32),
    #[serde(rename = "restrictions/region")]
    Region(Region),
    #[serde(rename = "restrictions/creatureWasAttacked")]
    CreatureWasAttacked,
}

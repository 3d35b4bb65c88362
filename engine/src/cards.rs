// ═══════════════════════════════════════════════════════════════════════
// Card catalogue — static definitions for every card the engine knows
// ═══════════════════════════════════════════════════════════════════════

use crate::types::*;

// ── Definitions ────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
pub struct CardDefinition {
    pub name: &'static str,
    pub card_type: CardType,
    pub region: Region,
    /// Magi have no cost.
    pub cost: Option<u32>,
    pub data: CardData,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CardData {
    pub powers: &'static [Power],
    /// Spell effect, applied when the spell is cast.
    pub effect: Option<EffectKind>,
    pub static_abilities: &'static [StaticAbility],
    pub can_attack_magi_directly: bool,
    pub can_pack_hunt: bool,
    /// Magi only: energy when the magi becomes active.
    pub starting_energy: u32,
    /// Magi only: energy gained in the energize step.
    pub energize: u32,
}

impl CardData {
    pub const EMPTY: CardData = CardData {
        powers: &[],
        effect: None,
        static_abilities: &[],
        can_attack_magi_directly: false,
        can_pack_hunt: false,
        starting_energy: 0,
        energize: 0,
    };
}

#[derive(Debug, PartialEq, Eq)]
pub struct Power {
    pub name: &'static str,
    pub cost: u32,
    pub effect: EffectKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityScope {
    /// Modifies the card carrying the ability.
    SelfOnly,
    /// Modifies every creature controlled by the carrier's controller.
    OwnCreatures,
}

#[derive(Debug, PartialEq, Eq)]
pub struct StaticAbility {
    pub property: Property,
    pub modifier: i32,
    pub scope: AbilityScope,
}

// ── Effects ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    DamageCreature { amount: u32 },
    DamageFilteredCreature { amount: u32, restrictions: &'static [Restriction] },
    EnergizeOwnCreature { amount: u32 },
    EnergizeOwnCreatures { amount: u32 },
    DamageMagi { amount: u32 },
    DamageCreatureOrMagi { amount: u32 },
    MayEnergizeMagi { amount: u32 },
    /// Move up to `limit` energy from the source creature to its magi.
    /// The creature always keeps at least one energy.
    TransferToMagi { limit: u32 },
    /// Own creatures get one more attack until end of turn.
    GrantExtraAttack,
}

impl EffectKind {
    /// The prompt this effect raises, if it needs a choice.
    pub fn prompt_type(self) -> Option<PromptType> {
        match self {
            EffectKind::DamageCreature { .. } => Some(PromptType::SingleCreature),
            EffectKind::DamageFilteredCreature { .. } => Some(PromptType::SingleCreatureFiltered),
            EffectKind::EnergizeOwnCreature { .. } => Some(PromptType::OwnSingleCreature),
            EffectKind::DamageMagi { .. } => Some(PromptType::SingleMagi),
            EffectKind::DamageCreatureOrMagi { .. } => Some(PromptType::SingleCreatureOrMagi),
            EffectKind::MayEnergizeMagi { .. } => Some(PromptType::MayAbility),
            EffectKind::TransferToMagi { .. } => Some(PromptType::Number),
            EffectKind::EnergizeOwnCreatures { .. } | EffectKind::GrantExtraAttack => None,
        }
    }
}

impl CardDefinition {
    pub fn is_creature(&self) -> bool {
        self.card_type == CardType::Creature
    }

    pub fn is_magi(&self) -> bool {
        self.card_type == CardType::Magi
    }

    pub fn power(&self, name: &str) -> Option<&'static Power> {
        self.data.powers.iter().find(|p| p.name == name)
    }

    /// Effects this card can raise: the spell effect plus every power's.
    pub fn effects(&self) -> impl Iterator<Item = EffectKind> + '_ {
        self.data.effect.into_iter().chain(self.data.powers.iter().map(|p| p.effect))
    }
}

// ── Catalogue ──────────────────────────────────────────────────────────

const fn magi(name: &'static str, region: Region, starting_energy: u32, energize: u32, powers: &'static [Power]) -> CardDefinition {
    CardDefinition {
        name,
        card_type: CardType::Magi,
        region,
        cost: None,
        data: CardData { powers, starting_energy, energize, ..CardData::EMPTY },
    }
}

const fn creature(name: &'static str, region: Region, cost: u32, data: CardData) -> CardDefinition {
    CardDefinition { name, card_type: CardType::Creature, region, cost: Some(cost), data }
}

const fn relic(name: &'static str, cost: u32, data: CardData) -> CardDefinition {
    CardDefinition { name, card_type: CardType::Relic, region: Region::Universal, cost: Some(cost), data }
}

const fn spell(name: &'static str, region: Region, cost: u32, effect: EffectKind) -> CardDefinition {
    CardDefinition {
        name,
        card_type: CardType::Spell,
        region,
        cost: Some(cost),
        data: CardData { effect: Some(effect), ..CardData::EMPTY },
    }
}

pub static CARDS: &[CardDefinition] = &[
    // Magi
    magi("Pruitt", Region::Naroom, 15, 5, &[Power {
        name: "Refresh",
        cost: 2,
        effect: EffectKind::EnergizeOwnCreature { amount: 4 },
    }]),
    magi("Poad", Region::Naroom, 10, 6, &[Power {
        name: "Heroes' Feast",
        cost: 1,
        effect: EffectKind::EnergizeOwnCreatures { amount: 1 },
    }]),
    magi("Grega", Region::Cald, 10, 5, &[Power {
        name: "Thunder Vision",
        cost: 2,
        effect: EffectKind::DamageCreature { amount: 2 },
    }]),
    magi("Magam", Region::Cald, 12, 5, &[]),
    // Naroom creatures
    creature("Weebo", Region::Naroom, 2, CardData {
        powers: &[Power { name: "Vitalize", cost: 1, effect: EffectKind::MayEnergizeMagi { amount: 2 } }],
        ..CardData::EMPTY
    }),
    creature("Timber Hyren", Region::Naroom, 5, CardData::EMPTY),
    creature("Carillion", Region::Naroom, 4, CardData {
        powers: &[Power { name: "Channel", cost: 0, effect: EffectKind::TransferToMagi { limit: 3 } }],
        ..CardData::EMPTY
    }),
    creature("Leaf Hyren", Region::Naroom, 3, CardData { can_pack_hunt: true, ..CardData::EMPTY }),
    creature("Arbolit", Region::Naroom, 2, CardData {
        powers: &[Power { name: "Healing Flame", cost: 1, effect: EffectKind::EnergizeOwnCreature { amount: 2 } }],
        ..CardData::EMPTY
    }),
    // Cald creatures
    creature("Lava Balamant", Region::Cald, 5, CardData::EMPTY),
    creature("Kelthet", Region::Cald, 4, CardData {
        static_abilities: &[StaticAbility {
            property: Property::AttacksPerTurn,
            modifier: 1,
            scope: AbilityScope::SelfOnly,
        }],
        ..CardData::EMPTY
    }),
    creature("Lava Aq", Region::Cald, 3, CardData {
        powers: &[Power { name: "Lava Ball", cost: 2, effect: EffectKind::DamageCreatureOrMagi { amount: 2 } }],
        ..CardData::EMPTY
    }),
    creature("Fire Chogo", Region::Cald, 2, CardData { can_attack_magi_directly: true, ..CardData::EMPTY }),
    creature("Quor Pup", Region::Cald, 2, CardData { can_pack_hunt: true, ..CardData::EMPTY }),
    // Universal creatures
    creature("Ayebaw", Region::Universal, 3, CardData::EMPTY),
    // Relics
    relic("Siphon Stone", 2, CardData {
        powers: &[Power {
            name: "Siphon",
            cost: 1,
            effect: EffectKind::DamageFilteredCreature {
                amount: 1,
                restrictions: &[Restriction::OpponentCreature, Restriction::EnergyLessThan(3)],
            },
        }],
        ..CardData::EMPTY
    }),
    relic("War Drum", 3, CardData {
        static_abilities: &[StaticAbility {
            property: Property::AttacksPerTurn,
            modifier: 1,
            scope: AbilityScope::OwnCreatures,
        }],
        ..CardData::EMPTY
    }),
    // Spells
    spell("Fireball", Region::Cald, 2, EffectKind::DamageCreatureOrMagi { amount: 2 }),
    spell("Shockwave", Region::Cald, 3, EffectKind::DamageMagi { amount: 3 }),
    spell("Grow", Region::Naroom, 1, EffectKind::EnergizeOwnCreature { amount: 2 }),
    spell("Rage", Region::Cald, 1, EffectKind::GrantExtraAttack),
];

/// Look up a card definition by its printed name.
pub fn by_name(name: &str) -> Option<&'static CardDefinition> {
    CARDS.iter().find(|c| c.name == name)
}

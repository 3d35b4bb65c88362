// ═══════════════════════════════════════════════════════════════════════
// Action Generator — legal continuations of a simulated state
//
// Given a sim and the acting player, lists every action worth exploring
// as a WorkItem. The input sim is never mutated: all branches share one
// snapshot of it, and the search clones that snapshot when it applies a
// branch's action.
//
// Dispatch:
//   not our turn          → nothing
//   prompt open           → one branch per answer (if the prompt is ours)
//   Energize / Draw       → nothing
//   PRS1 / PRS2           → pass, affordable unused powers, spells, relics
//   Attack                → pass, every attack pattern
//   Creatures             → pass, affordable creatures from hand
// ═══════════════════════════════════════════════════════════════════════

use crate::fingerprint::Fingerprint;
use log::debug;
use magi_engine::engine::{Action, PromptResolution};
use magi_engine::state::{CardInGame, State};
use magi_engine::types::*;
use std::rc::Rc;

/// One frontier entry: apply `action` to a clone of `sim`.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub sim: Rc<State>,
    pub action: Action,
    /// Actions from the search root, ending with `action`.
    pub action_log: Vec<Action>,
    pub parent_fingerprint: Fingerprint,
}

/// Collects branches that all start from the same snapshot.
struct Branches<'a> {
    sim: Rc<State>,
    log: &'a [Action],
    parent: &'a str,
    items: Vec<WorkItem>,
}

impl<'a> Branches<'a> {
    fn new(sim: &State, log: &'a [Action], parent: &'a str) -> Self {
        Branches { sim: Rc::new(sim.clone()), log, parent, items: Vec::new() }
    }

    fn push(&mut self, action: Action) {
        let mut action_log = Vec::with_capacity(self.log.len() + 1);
        action_log.extend_from_slice(self.log);
        action_log.push(action.clone());
        self.items.push(WorkItem {
            sim: Rc::clone(&self.sim),
            action,
            action_log,
            parent_fingerprint: self.parent.to_string(),
        });
    }
}

// ── Attack patterns ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackPattern {
    pub from: CardId,
    pub to: CardId,
    /// Pack hunter joining the attack.
    pub add: Option<CardId>,
}

impl AttackPattern {
    pub fn to_action(&self, player: PlayerId) -> Action {
        Action::Attack {
            player,
            source: self.from.clone(),
            target: self.to.clone(),
            additional_attackers: self.add.iter().cloned().collect(),
        }
    }
}

/// Every legal attack for `attacker`.
///
/// A creature with attacks left may hit any opposing creature. It may hit
/// the opposing magi only when that magi has energy and either no
/// creature defends it or the attacker can bypass defenders. Pack hunters
/// with attacks left join attacks on creatures made by another creature.
pub fn attack_patterns(sim: &State, attacker: PlayerId, opponent: PlayerId) -> Vec<AttackPattern> {
    let has_attacks_left =
        |c: &CardInGame| c.data.attacked < sim.modify_by_static_abilities(c, Property::AttacksPerTurn);
    let attackers: Vec<&CardInGame> = sim.creatures_of(attacker).filter(|c| has_attacks_left(c)).collect();
    let defenders: Vec<&CardInGame> = sim.creatures_of(opponent).collect();
    let magi = sim.active_magi(opponent).filter(|m| m.data.energy > 0);

    let mut patterns = Vec::new();
    for source in &attackers {
        if let Some(magi) = magi {
            if defenders.is_empty() || source.card.data.can_attack_magi_directly {
                patterns.push(AttackPattern { from: source.id.clone(), to: magi.id.clone(), add: None });
            }
        }
        for defender in &defenders {
            patterns.push(AttackPattern { from: source.id.clone(), to: defender.id.clone(), add: None });
            for helper in attackers.iter().filter(|h| h.id != source.id && h.card.data.can_pack_hunt) {
                patterns.push(AttackPattern {
                    from: source.id.clone(),
                    to: defender.id.clone(),
                    add: Some(helper.id.clone()),
                });
            }
        }
    }
    patterns
}

// ── Extraction ─────────────────────────────────────────────────────────

/// Branches for `player` at this decision point.
pub fn extract_actions(
    sim: &State,
    player: PlayerId,
    opponent: PlayerId,
    log: &[Action],
    parent: &str,
) -> Vec<WorkItem> {
    if sim.has_winner() || sim.active_player != player {
        return Vec::new();
    }

    if let Some(prompt) = &sim.prompt {
        if prompt.player != player {
            debug!("prompt {} belongs to player {}, not {}", prompt.prompt_type, prompt.player, player);
            return Vec::new();
        }
        let mut branches = Branches::new(sim, log, parent);
        prompt_branches(sim, player, &mut branches);
        return branches.items;
    }

    if matches!(sim.step, Step::Energize | Step::Draw) {
        return Vec::new();
    }

    let mut branches = Branches::new(sim, log, parent);
    branches.push(Action::Pass { player });
    match sim.step {
        Step::Priority1 | Step::Priority2 => priority_branches(sim, player, &mut branches),
        Step::Attack => {
            for pattern in attack_patterns(sim, player, opponent) {
                branches.push(pattern.to_action(player));
            }
        }
        Step::Creatures => creature_branches(sim, player, &mut branches),
        Step::Energize | Step::Draw => {}
    }
    branches.items
}

/// Attack branches only, without a pass. Used by the attack search,
/// which never leaves the attack step.
pub fn extract_attacks(
    sim: &State,
    player: PlayerId,
    opponent: PlayerId,
    log: &[Action],
    parent: &str,
) -> Vec<WorkItem> {
    if sim.has_winner() || sim.active_player != player || sim.has_prompt() || sim.step != Step::Attack {
        return Vec::new();
    }
    let patterns = attack_patterns(sim, player, opponent);
    if patterns.is_empty() {
        return Vec::new();
    }
    let mut branches = Branches::new(sim, log, parent);
    for pattern in patterns {
        branches.push(pattern.to_action(player));
    }
    branches.items
}

fn priority_branches(sim: &State, player: PlayerId, branches: &mut Branches) {
    let Some(magi) = sim.active_magi(player) else { return };
    let magi_energy = magi.data.energy;

    // Creatures pay for powers themselves, relics and magi pay from the magi.
    let permanents = sim.in_play().cards.iter().filter(|c| c.data.controller == player);
    for card in permanents.chain(std::iter::once(magi)) {
        let reserve = if card.is_creature() { card.data.energy } else { magi_energy };
        for power in card.card.data.powers {
            if !card.power_used(power.name) && power.cost <= reserve {
                branches.push(Action::Power { player, source: card.id.clone(), power: power.name.to_string() });
            }
        }
    }

    for card in &sim.zone(ZoneType::Hand, player).cards {
        let playable = match card.card.card_type {
            CardType::Spell => true,
            CardType::Relic => !sim
                .in_play()
                .cards
                .iter()
                .any(|c| c.data.controller == player && c.card.name == card.card.name),
            _ => false,
        };
        if playable && sim.play_cost(card, player) <= magi_energy {
            branches.push(Action::Play { player, card: card.id.clone() });
        }
    }
}

fn creature_branches(sim: &State, player: PlayerId, branches: &mut Branches) {
    let Some(magi) = sim.active_magi(player) else { return };
    for card in sim.zone(ZoneType::Hand, player).cards.iter().filter(|c| c.is_creature()) {
        if sim.play_cost(card, player) <= magi.data.energy {
            branches.push(Action::Play { player, card: card.id.clone() });
        }
    }
}

fn prompt_branches(sim: &State, player: PlayerId, branches: &mut Branches) {
    let Some(prompt) = &sim.prompt else { return };
    let resolve = |resolution: PromptResolution| Action::ResolvePrompt {
        player,
        prompt_type: prompt.prompt_type,
        generated_by: Some(prompt.generated_by.clone()),
        resolution,
    };

    match prompt.prompt_type {
        PromptType::MayAbility => {
            branches.push(resolve(PromptResolution::UseEffect(true)));
            branches.push(resolve(PromptResolution::UseEffect(false)));
        }
        PromptType::Number => match (prompt.params.min, prompt.params.max) {
            (Some(min), Some(max)) => {
                for n in min..max {
                    branches.push(resolve(PromptResolution::Number(n)));
                }
            }
            _ => debug!("number prompt from {} without bounds", prompt.generated_by),
        },
        PromptType::SingleCreature
        | PromptType::OwnSingleCreature
        | PromptType::SingleCreatureFiltered
        | PromptType::SingleMagi
        | PromptType::SingleCreatureOrMagi => {
            for target in sim.prompt_targets(prompt.prompt_type, &prompt.params, player) {
                branches.push(resolve(PromptResolution::Target(target)));
            }
        }
        PromptType::AnyCreatureExceptSource
        | PromptType::ChooseCards
        | PromptType::ChooseNCardsFromZone
        | PromptType::RearrangeEnergyOnCreatures
        | PromptType::DistributeEnergyOnCreatures
        | PromptType::Unknown => {
            debug!("no branches for prompt {} from {}", prompt.prompt_type, prompt.generated_by);
        }
    }
}

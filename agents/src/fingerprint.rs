// ═══════════════════════════════════════════════════════════════════════
// State fingerprints — canonical keys for search deduplication
//
// Format:
//   {hand}@energy[powers]|#card(attacked/attacks)[powers]:energy|...|@enemy[powers]/step?generator
//
// Card ids and power names are interned to small integers. The interning
// table lives for one search call only. Hand, in-play cards and used
// powers are written in sorted order, so zone ordering never matters.
// ═══════════════════════════════════════════════════════════════════════

use magi_engine::state::{CardInGame, State};
use magi_engine::types::*;
use std::collections::HashMap;
use std::fmt::Write;

pub type Fingerprint = String;

#[derive(Debug, Default)]
pub struct Fingerprinter {
    ids: HashMap<String, usize>,
}

impl Fingerprinter {
    pub fn new() -> Self {
        Fingerprinter::default()
    }

    fn intern(&mut self, key: &str) -> usize {
        let next = self.ids.len() + 1;
        *self.ids.entry(key.to_string()).or_insert(next)
    }

    /// Fingerprint of `sim` from the point of view of `sim.players[0]`.
    pub fn fingerprint(&mut self, sim: &State) -> Fingerprint {
        let [us, them] = sim.players;

        let mut in_play: Vec<&CardInGame> = sim.in_play().cards.iter().collect();
        in_play.sort_by(|a, b| a.id.cmp(&b.id));
        let mut hand: Vec<&CardId> = sim.zone(ZoneType::Hand, us).cards.iter().map(|c| &c.id).collect();
        hand.sort();

        let mut hand: Vec<usize> = hand.into_iter().map(|id| self.intern(id.as_str())).collect();
        hand.sort_unstable();

        let mut out = String::from("{");
        out.push_str(&join(&hand));
        out.push('}');
        self.write_magi(&mut out, sim.active_magi(us));

        for card in in_play {
            out.push('|');
            self.write_card(&mut out, sim, card);
        }
        out.push('|');
        self.write_magi(&mut out, sim.active_magi(them));

        let _ = write!(out, "/{}", sim.step.index());
        if sim.active_player != us {
            out.push('!');
        }
        if let Some(prompt) = &sim.prompt {
            let _ = write!(out, "?{}", self.intern(prompt.generated_by.as_str()));
        }
        out
    }

    fn write_magi(&mut self, out: &mut String, magi: Option<&CardInGame>) {
        match magi {
            Some(magi) => {
                let powers = self.powers(magi);
                let _ = write!(out, "@{}[{}]", magi.data.energy, powers);
            }
            None => out.push('X'),
        }
    }

    fn write_card(&mut self, out: &mut String, sim: &State, card: &CardInGame) {
        let _ = write!(out, "#{}", self.intern(card.id.as_str()));
        if card.is_creature() {
            let attacks = sim.modify_by_static_abilities(card, Property::AttacksPerTurn);
            let _ = write!(out, "({}/{})", card.data.attacked, attacks);
        } else {
            out.push('*');
        }
        if !card.data.actions_used.is_empty() {
            let powers = self.powers(card);
            let _ = write!(out, "[{}]", powers);
        }
        if card.is_creature() {
            let _ = write!(out, ":{}", card.data.energy);
        } else {
            out.push_str(":*");
        }
    }

    fn powers(&mut self, card: &CardInGame) -> String {
        let mut used: Vec<usize> = card.data.actions_used.iter().map(|p| self.intern(p)).collect();
        used.sort_unstable();
        join(&used)
    }
}

fn join(values: &[usize]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}

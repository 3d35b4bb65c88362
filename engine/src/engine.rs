// ═══════════════════════════════════════════════════════════════════════
// Game Engine — action validation and resolution
//
// Architecture:
//   The engine is a pure state machine. It never does I/O or calls agents.
//   `State::update` either applies one action completely or rejects it
//   with an `EngineError` before touching the state. Effects that need a
//   choice park themselves in `state.prompt` and resume when the prompt
//   is resolved by a `ResolvePrompt` action.
//
// Flow of a turn:
//   Energize (automatic) → PRS1 → Attack → Creatures → PRS2 → Draw
//   (automatic) → end of turn → opponent's Energize.
//   Each pass moves to the next step. Passing PRS2 runs the draw step,
//   ends the turn and energizes the next player's magi.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::EffectKind;
use crate::error::EngineError;
use crate::protocol::{CardRef, Effect, OneOrMany, ServerAction};
use crate::state::*;
use crate::types::*;
use log::debug;
use rand::seq::SliceRandom;
use std::fmt;

/// Cards drawn in the draw step.
pub const CARDS_PER_DRAW: usize = 2;

// ── Actions ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PromptResolution {
    Target(CardId),
    Number(u32),
    UseEffect(bool),
    Cards(Vec<CardId>),
}

/// Actions a player can submit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// End the current step.
    Pass { player: PlayerId },

    /// Play a creature, relic or spell from hand.
    Play { player: PlayerId, card: CardId },

    /// Use a power of a permanent or of the active magi.
    Power { player: PlayerId, source: CardId, power: String },

    /// Attack a creature or the opposing magi. Pack hunters join
    /// attacks on creatures only.
    Attack {
        player: PlayerId,
        source: CardId,
        target: CardId,
        additional_attackers: Vec<CardId>,
    },

    /// Answer the pending prompt.
    ResolvePrompt {
        player: PlayerId,
        prompt_type: PromptType,
        generated_by: Option<CardId>,
        resolution: PromptResolution,
    },
}

impl Action {
    pub fn player(&self) -> PlayerId {
        match self {
            Action::Pass { player }
            | Action::Play { player, .. }
            | Action::Power { player, .. }
            | Action::Attack { player, .. }
            | Action::ResolvePrompt { player, .. } => *player,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Action::Pass { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Pass { .. } => write!(f, "pass"),
            Action::Play { card, .. } => write!(f, "play {}", card),
            Action::Power { source, power, .. } => write!(f, "power {}:{}", source, power),
            Action::Attack { source, target, additional_attackers, .. } => {
                write!(f, "attack {}->{}", source, target)?;
                for extra in additional_attackers {
                    write!(f, " +{}", extra)?;
                }
                Ok(())
            }
            Action::ResolvePrompt { prompt_type, resolution, .. } => match resolution {
                PromptResolution::Target(id) => write!(f, "resolve {} target={}", prompt_type, id),
                PromptResolution::Number(n) => write!(f, "resolve {} number={}", prompt_type, n),
                PromptResolution::UseEffect(b) => write!(f, "resolve {} use={}", prompt_type, b),
                PromptResolution::Cards(ids) => write!(f, "resolve {} cards={}", prompt_type, ids.len()),
            },
        }
    }
}

// ── Update ─────────────────────────────────────────────────────────────

impl State {
    /// Apply one action. On error the state is left untouched.
    pub fn update(&mut self, action: &Action) -> Result<(), EngineError> {
        if self.winner.is_some() {
            return Err(EngineError::GameOver);
        }

        match action {
            Action::ResolvePrompt { player, prompt_type, resolution, .. } => {
                self.resolve_prompt(*player, *prompt_type, resolution)
            }
            _ if self.prompt.is_some() => Err(EngineError::PromptPending),
            _ if action.player() != self.active_player => Err(EngineError::NotActivePlayer(action.player())),
            Action::Pass { player } => {
                self.pass(*player);
                Ok(())
            }
            Action::Play { player, card } => self.play(*player, card),
            Action::Power { player, source, power } => self.use_power(*player, source, power),
            Action::Attack { player, source, target, additional_attackers } => {
                self.attack(*player, source, target, additional_attackers)
            }
        }
    }

    // ── Steps & turns ──

    fn pass(&mut self, player: PlayerId) {
        match self.step {
            Step::Priority2 | Step::Draw => {
                if self.step == Step::Priority2 {
                    self.set_step(player, Step::Draw);
                    for _ in 0..CARDS_PER_DRAW {
                        self.draw_card(player);
                    }
                }
                self.end_turn(player);
            }
            step => {
                let next = step.next().unwrap_or(Step::Priority1);
                self.set_step(player, next);
            }
        }
    }

    fn set_step(&mut self, player: PlayerId, step: Step) {
        self.step = step;
        self.emit(ServerAction::Pass { player, new_step: Some(step) });
    }

    fn end_turn(&mut self, player: PlayerId) {
        self.emit(ServerAction::Effect(Effect::EndOfTurn { player }));
        self.continuous_effects.retain(|e| !e.expires_at_end_of_turn);

        let next = self.opponent_of(player);
        self.active_player = next;
        self.turn += 1;
        self.start_turn(next);
    }

    /// Resets the player's permanents, energizes the magi and hands the
    /// player priority in PRS1.
    pub fn start_turn(&mut self, player: PlayerId) {
        self.step = Step::Energize;
        self.emit(ServerAction::Effect(Effect::StartOfTurn { player }));

        for card in self.in_play_mut().cards.iter_mut().filter(|c| c.data.controller == player) {
            card.clear_turn_flags();
        }
        if let Some(magi) = self.active_magi_mut(player) {
            magi.clear_turn_flags();
        }

        let energize = self
            .active_magi(player)
            .map(|magi| (magi.id.clone(), self.modify_by_static_abilities(magi, Property::Energize)));
        if let Some((magi_id, amount)) = energize {
            self.add_energy_to_magi(player, &magi_id, amount);
        }

        self.set_step(player, Step::Priority1);
    }

    fn draw_card(&mut self, player: PlayerId) {
        if self.zone(ZoneType::Deck, player).is_empty() {
            let mut recycled = std::mem::take(&mut self.zone_mut(ZoneType::Discard, player).cards);
            recycled.shuffle(&mut self.rng);
            for card in &recycled {
                self.emit_moved(ZoneType::Discard, ZoneType::Deck, CardRef::from(card));
            }
            self.zone_mut(ZoneType::Deck, player).cards = recycled;
        }
        if let Some(top) = self.zone(ZoneType::Deck, player).cards.last().map(|c| c.id.clone()) {
            self.move_card(&top, ZoneType::Deck, player, ZoneType::Hand);
        }
    }

    // ── Play ──

    /// Total cost of playing `card` for `player`, including the +1 tax on
    /// creatures from a region other than the active magi's.
    pub fn play_cost(&self, card: &CardInGame, player: PlayerId) -> u32 {
        let base = self.modify_by_static_abilities(card, Property::Cost);
        let tax = match (card.card.card_type, self.active_magi(player)) {
            (CardType::Creature, Some(magi))
                if card.card.region != magi.card.region && card.card.region != Region::Universal =>
            {
                1
            }
            _ => 0,
        };
        base + tax
    }

    fn play(&mut self, player: PlayerId, card_id: &CardId) -> Result<(), EngineError> {
        let card = self
            .zone(ZoneType::Hand, player)
            .by_id(card_id)
            .ok_or_else(|| EngineError::CardNotFound(card_id.clone()))?;
        let def = card.card;

        let step_ok = match def.card_type {
            CardType::Creature => self.step == Step::Creatures,
            CardType::Spell | CardType::Relic => self.step.is_priority(),
            CardType::Magi => return Err(EngineError::NotPlayable(card_id.clone())),
        };
        if !step_ok {
            return Err(EngineError::WrongStep(self.step));
        }
        if def.card_type == CardType::Relic
            && self.in_play().cards.iter().any(|c| c.data.controller == player && c.card.name == def.name)
        {
            return Err(EngineError::DuplicateRelic(def.name));
        }

        let cost = self.play_cost(card, player);
        let magi = self.active_magi(player).ok_or(EngineError::NoActiveMagi(player))?;
        if magi.data.energy < cost {
            return Err(EngineError::NotEnoughEnergy { need: cost, have: magi.data.energy });
        }

        // Validated, now apply.
        let from = self.pay_from_magi(player, cost);
        let payment = match def.card_type {
            CardType::Creature => Effect::PayingEnergyForCreature { from, amount: cost },
            CardType::Relic => Effect::PayingEnergyForRelic { from, amount: cost },
            _ => Effect::PayingEnergyForSpell { from, amount: cost },
        };
        self.emit(ServerAction::Effect(payment));

        match def.card_type {
            CardType::Creature => {
                self.move_card(card_id, ZoneType::Hand, player, ZoneType::InPlay);
                self.add_energy_to_creature(card_id, def.cost.unwrap_or(0));
                Ok(())
            }
            CardType::Relic => {
                self.move_card(card_id, ZoneType::Hand, player, ZoneType::InPlay);
                Ok(())
            }
            _ => {
                self.move_card(card_id, ZoneType::Hand, player, ZoneType::Discard);
                match def.data.effect {
                    Some(effect) => self.apply_effect(effect, card_id, player),
                    None => Ok(()),
                }
            }
        }
    }

    /// Deducts energy from the active magi, returning the magi as it was
    /// before paying.
    fn pay_from_magi(&mut self, player: PlayerId, amount: u32) -> CardRef {
        match self.active_magi_mut(player) {
            Some(magi) => {
                let before = CardRef::from(&*magi);
                magi.data.energy = magi.data.energy.saturating_sub(amount);
                before
            }
            None => CardRef::default(),
        }
    }

    // ── Powers ──

    fn use_power(&mut self, player: PlayerId, source: &CardId, power_name: &str) -> Result<(), EngineError> {
        if !self.step.is_priority() {
            return Err(EngineError::WrongStep(self.step));
        }

        let card = match self.in_play().by_id(source) {
            Some(card) if card.data.controller == player => card,
            Some(_) => return Err(EngineError::IllegalTarget(source.clone())),
            None => self
                .active_magi(player)
                .filter(|magi| &magi.id == source)
                .ok_or_else(|| EngineError::CardNotFound(source.clone()))?,
        };
        let power = card
            .card
            .power(power_name)
            .ok_or_else(|| EngineError::UnknownPower(power_name.to_string()))?;
        if card.power_used(power_name) {
            return Err(EngineError::PowerAlreadyUsed(power_name.to_string()));
        }

        // Creatures pay from their own energy, relics and magi from the magi.
        let pays_itself = card.is_creature();
        let have = if pays_itself {
            card.data.energy
        } else {
            self.active_magi(player).ok_or(EngineError::NoActiveMagi(player))?.data.energy
        };
        if have < power.cost {
            return Err(EngineError::NotEnoughEnergy { need: power.cost, have });
        }

        // Validated, now apply.
        let source_ref = match self.permanent_mut(source) {
            Some(card) => {
                card.data.actions_used.push(power_name.to_string());
                if pays_itself {
                    card.data.energy -= power.cost;
                }
                CardRef::from(&*card)
            }
            None => return Err(EngineError::CardNotFound(source.clone())),
        };
        self.emit(ServerAction::Power { source: source.clone(), power: power_name.to_string(), player });
        self.emit(ServerAction::Effect(Effect::PayingEnergyForPower {
            source: source_ref.clone(),
            amount: power.cost,
        }));
        if pays_itself {
            if power.cost > 0 {
                self.emit(ServerAction::Effect(Effect::DiscardEnergyFromCreature {
                    target: OneOrMany::One(source_ref),
                    amount: power.cost,
                }));
            }
        } else {
            self.pay_from_magi(player, power.cost);
        }

        self.apply_effect(power.effect, source, player)?;
        self.remove_dead_creatures();
        Ok(())
    }

    // ── Effects & prompts ──

    fn apply_effect(&mut self, effect: EffectKind, source: &CardId, controller: PlayerId) -> Result<(), EngineError> {
        if let Some(prompt_type) = effect.prompt_type() {
            let params = match self.prompt_params_for(effect, prompt_type, source, controller) {
                Some(params) => params,
                None => {
                    debug!("{:?} from {} has no valid choice, skipping", effect, source);
                    return Ok(());
                }
            };
            self.emit(ServerAction::EnterPrompt {
                prompt_type,
                player: controller,
                generated_by: Some(source.clone()),
                message: None,
                prompt_params: params.clone(),
            });
            self.prompt = Some(Prompt {
                prompt_type,
                player: controller,
                generated_by: source.clone(),
                message: None,
                params,
                pending: Some(PendingEffect { effect, source: source.clone(), controller }),
            });
            return Ok(());
        }

        match effect {
            EffectKind::EnergizeOwnCreatures { amount } => {
                let mut targets = Vec::new();
                for card in self.in_play_mut().cards.iter_mut() {
                    if card.is_creature() && card.data.controller == controller {
                        card.data.energy += amount;
                        targets.push(CardRef::from(&*card));
                    }
                }
                if !targets.is_empty() {
                    self.emit(ServerAction::Effect(Effect::AddEnergyToCreature {
                        target: OneOrMany::Many(targets),
                        amount,
                    }));
                }
            }
            EffectKind::GrantExtraAttack => {
                let effect = ContinuousEffect {
                    property: Property::AttacksPerTurn,
                    modifier: 1,
                    player: controller,
                    generated_by: source.clone(),
                    expires_at_end_of_turn: true,
                };
                self.continuous_effects.push(effect.clone());
                self.emit(ServerAction::Effect(Effect::CreateContinuousEffect { effect }));
            }
            other => debug!("effect {:?} needs a prompt", other),
        }
        Ok(())
    }

    /// Parameters for the prompt an effect raises, or None if nothing
    /// could be chosen.
    fn prompt_params_for(
        &self,
        effect: EffectKind,
        prompt_type: PromptType,
        source: &CardId,
        controller: PlayerId,
    ) -> Option<PromptParams> {
        let mut params = PromptParams::default();
        match effect {
            EffectKind::TransferToMagi { limit } => {
                let energy = self.in_play().by_id(source)?.data.energy;
                if energy <= 1 {
                    return None;
                }
                params.min = Some(1);
                params.max = Some(limit.min(energy - 1) + 1);
                return Some(params);
            }
            EffectKind::DamageFilteredCreature { restrictions, .. } => {
                params.restrictions = restrictions.to_vec();
            }
            EffectKind::MayEnergizeMagi { .. } => return Some(params),
            _ => {}
        }
        if self.prompt_targets(prompt_type, &params, controller).is_empty() {
            None
        } else {
            Some(params)
        }
    }

    /// Cards a targeted prompt accepts. Magi come own first, then the
    /// opponent's.
    pub fn prompt_targets(&self, prompt_type: PromptType, params: &PromptParams, player: PlayerId) -> Vec<CardId> {
        let creatures = self.in_play().cards.iter().filter(|c| c.is_creature());
        let magi = [player, self.opponent_of(player)]
            .into_iter()
            .filter_map(|p| self.active_magi(p))
            .map(|m| m.id.clone());

        match prompt_type {
            PromptType::SingleCreature => creatures.map(|c| c.id.clone()).collect(),
            PromptType::OwnSingleCreature => {
                creatures.filter(|c| c.data.controller == player).map(|c| c.id.clone()).collect()
            }
            PromptType::SingleCreatureFiltered => {
                let filter = self.make_card_filter(&params.restrictions, player);
                creatures.filter(|&c| filter(c)).map(|c| c.id.clone()).collect()
            }
            PromptType::AnyCreatureExceptSource => creatures
                .filter(|c| Some(&c.id) != params.source.as_ref())
                .map(|c| c.id.clone())
                .collect(),
            PromptType::SingleMagi => magi.collect(),
            PromptType::SingleCreatureOrMagi => magi.chain(creatures.map(|c| c.id.clone())).collect(),
            _ => Vec::new(),
        }
    }

    fn resolve_prompt(
        &mut self,
        player: PlayerId,
        prompt_type: PromptType,
        resolution: &PromptResolution,
    ) -> Result<(), EngineError> {
        let prompt = self.prompt.as_ref().ok_or(EngineError::NoPrompt)?;
        if prompt.player != player {
            return Err(EngineError::WrongPromptPlayer { expected: prompt.player, got: player });
        }
        if prompt.prompt_type != prompt_type {
            return Err(EngineError::InvalidPromptResolution(prompt_type));
        }

        match (prompt_type, resolution) {
            (PromptType::RearrangeEnergyOnCreatures | PromptType::DistributeEnergyOnCreatures | PromptType::Unknown, _) => {
                return Err(EngineError::UnsupportedPrompt(prompt_type));
            }
            (t, PromptResolution::Target(id)) if t.is_targeted() => {
                if !self.prompt_targets(t, &prompt.params, player).contains(id) {
                    return Err(EngineError::IllegalTarget(id.clone()));
                }
            }
            (PromptType::Number, PromptResolution::Number(n)) => {
                let min = prompt.params.min.unwrap_or(0);
                let max = prompt.params.max.unwrap_or(u32::MAX);
                if !(min..max).contains(n) {
                    return Err(EngineError::InvalidPromptResolution(prompt_type));
                }
            }
            (PromptType::MayAbility, PromptResolution::UseEffect(_)) => {}
            (PromptType::ChooseCards | PromptType::ChooseNCardsFromZone, PromptResolution::Cards(_)) => {}
            _ => return Err(EngineError::InvalidPromptResolution(prompt_type)),
        }

        // Validated, now apply.
        let pending = self.prompt.take().and_then(|p| p.pending);
        self.emit(ServerAction::ResolvePrompt { player: Some(player) });
        if let Some(pending) = pending {
            self.resolve_effect(&pending, resolution);
        }
        self.remove_dead_creatures();
        Ok(())
    }

    fn resolve_effect(&mut self, pending: &PendingEffect, resolution: &PromptResolution) {
        let controller = pending.controller;
        match (pending.effect, resolution) {
            (
                EffectKind::DamageCreature { amount } | EffectKind::DamageFilteredCreature { amount, .. },
                PromptResolution::Target(id),
            ) => self.damage_creature(id, amount),
            (EffectKind::EnergizeOwnCreature { amount }, PromptResolution::Target(id)) => {
                self.add_energy_to_creature(id, amount)
            }
            (EffectKind::DamageMagi { amount }, PromptResolution::Target(id)) => self.damage_magi(id, amount),
            (EffectKind::DamageCreatureOrMagi { amount }, PromptResolution::Target(id)) => {
                if self.in_play().by_id(id).is_some() {
                    self.damage_creature(id, amount)
                } else {
                    self.damage_magi(id, amount)
                }
            }
            (EffectKind::MayEnergizeMagi { amount }, PromptResolution::UseEffect(true)) => {
                if let Some(magi_id) = self.active_magi(controller).map(|m| m.id.clone()) {
                    self.add_energy_to_magi(controller, &magi_id, amount);
                }
            }
            (EffectKind::TransferToMagi { .. }, PromptResolution::Number(n)) => {
                self.move_energy_to_magi(&pending.source, controller, *n)
            }
            _ => {}
        }
    }

    // ── Attack ──

    fn attack(
        &mut self,
        player: PlayerId,
        source: &CardId,
        target: &CardId,
        additional_attackers: &[CardId],
    ) -> Result<(), EngineError> {
        if self.step != Step::Attack {
            return Err(EngineError::WrongStep(self.step));
        }
        let opponent = self.opponent_of(player);

        let attacker = self
            .in_play()
            .by_id(source)
            .filter(|c| c.is_creature() && c.data.controller == player)
            .ok_or_else(|| EngineError::IllegalTarget(source.clone()))?;
        if attacker.data.attacked >= self.modify_by_static_abilities(attacker, Property::AttacksPerTurn) {
            return Err(EngineError::AttackLimitReached(source.clone()));
        }

        let against_creature = match self.in_play().by_id(target) {
            Some(defender) if defender.is_creature() && defender.data.controller == opponent => true,
            Some(_) => return Err(EngineError::IllegalTarget(target.clone())),
            None => {
                let magi = self
                    .active_magi(opponent)
                    .filter(|m| &m.id == target)
                    .ok_or_else(|| EngineError::CardNotFound(target.clone()))?;
                let has_defenders = self.creatures_of(opponent).next().is_some();
                if magi.data.energy == 0 || (has_defenders && !attacker.card.data.can_attack_magi_directly) {
                    return Err(EngineError::IllegalTarget(target.clone()));
                }
                false
            }
        };

        let mut damage = attacker.data.energy;
        for (i, extra_id) in additional_attackers.iter().enumerate() {
            let extra = self
                .in_play()
                .by_id(extra_id)
                .filter(|c| c.is_creature() && c.data.controller == player && c.card.data.can_pack_hunt)
                .ok_or_else(|| EngineError::IllegalTarget(extra_id.clone()))?;
            if !against_creature || extra_id == source || additional_attackers[..i].contains(extra_id) {
                return Err(EngineError::IllegalTarget(extra_id.clone()));
            }
            if extra.data.attacked >= self.modify_by_static_abilities(extra, Property::AttacksPerTurn) {
                return Err(EngineError::AttackLimitReached(extra_id.clone()));
            }
            damage += extra.data.energy;
        }

        // Validated, now apply.
        self.emit(ServerAction::Attack {
            source: source.clone(),
            target: target.clone(),
            additional_attackers: additional_attackers.to_vec(),
            player,
        });
        for id in std::iter::once(source).chain(additional_attackers) {
            if let Some(card) = self.in_play_mut().by_id_mut(id) {
                card.data.attacked += 1;
                card.data.has_attacked = true;
            }
        }

        if against_creature {
            let counter = self.in_play().by_id(target).map(|c| c.data.energy).unwrap_or(0);
            if let Some(defender) = self.in_play_mut().by_id_mut(target) {
                defender.data.was_attacked = true;
            }
            self.damage_creature(target, damage);
            self.damage_creature(source, counter);
            self.remove_dead_creatures();
        } else {
            self.damage_magi(target, damage);
        }
        Ok(())
    }

    // ── Energy primitives ──

    fn damage_creature(&mut self, id: &CardId, amount: u32) {
        let Some(card) = self.in_play_mut().by_id_mut(id) else { return };
        let lost = amount.min(card.data.energy);
        if lost == 0 {
            return;
        }
        card.data.energy -= lost;
        card.data.energy_lost_this_turn += lost;
        let target = CardRef::from(&*card);
        self.emit(ServerAction::Effect(Effect::DiscardEnergyFromCreature {
            target: OneOrMany::One(target),
            amount: lost,
        }));
    }

    fn damage_magi(&mut self, id: &CardId, amount: u32) {
        let Some(owner) = self.players.into_iter().find(|p| self.active_magi(*p).is_some_and(|m| &m.id == id)) else {
            return;
        };
        let Some(magi) = self.active_magi_mut(owner) else { return };
        let lost = amount.min(magi.data.energy);
        magi.data.energy -= lost;
        let depleted = magi.data.energy == 0;
        let target = CardRef::from(&*magi);
        self.emit(ServerAction::Effect(Effect::DiscardEnergyFromMagi { target, amount: lost }));
        if depleted {
            self.defeat_magi(owner, id);
        }
    }

    fn add_energy_to_creature(&mut self, id: &CardId, amount: u32) {
        let Some(card) = self.in_play_mut().by_id_mut(id) else { return };
        card.data.energy += amount;
        let target = CardRef::from(&*card);
        self.emit(ServerAction::Effect(Effect::AddEnergyToCreature { target: OneOrMany::One(target), amount }));
    }

    fn add_energy_to_magi(&mut self, player: PlayerId, id: &CardId, amount: u32) {
        let Some(magi) = self.active_magi_mut(player).filter(|m| &m.id == id) else { return };
        magi.data.energy += amount;
        let target = CardRef::from(&*magi);
        self.emit(ServerAction::Effect(Effect::AddEnergyToMagi { target, amount }));
    }

    fn move_energy_to_magi(&mut self, source: &CardId, player: PlayerId, amount: u32) {
        let Some(card) = self.in_play_mut().by_id_mut(source) else { return };
        let moved = amount.min(card.data.energy);
        card.data.energy -= moved;
        let from = CardRef::from(&*card);
        let Some(magi) = self.active_magi_mut(player) else { return };
        magi.data.energy += moved;
        let to = CardRef::from(&*magi);
        self.emit(ServerAction::Effect(Effect::MoveEnergy { source: from, target: to, amount: moved }));
    }

    // ── Zone movement ──

    /// Moves a card between zones of its owner (or in and out of play),
    /// clearing its battle data.
    fn move_card(&mut self, id: &CardId, from: ZoneType, from_owner: PlayerId, to: ZoneType) {
        let Some(mut card) = self.zone_mut(from, from_owner).remove(id) else { return };
        card.data = CardInGameData { controller: card.owner, ..Default::default() };
        let owner = card.owner;
        self.emit_moved(from, to, CardRef::from(&card));
        self.zone_mut(to, owner).add(card);
    }

    fn emit_moved(&mut self, from: ZoneType, to: ZoneType, target: CardRef) {
        self.emit(ServerAction::Effect(Effect::CardMovedBetweenZones {
            source_zone: from.as_wire().to_string(),
            destination_zone: to.as_wire().to_string(),
            target,
        }));
    }

    fn remove_dead_creatures(&mut self) {
        let dead: Vec<(CardId, PlayerId)> = self
            .in_play()
            .cards
            .iter()
            .filter(|c| c.is_creature() && c.data.energy == 0)
            .map(|c| (c.id.clone(), c.owner))
            .collect();
        for (id, owner) in dead {
            debug!("creature {} defeated", id);
            self.move_card(&id, ZoneType::InPlay, owner, ZoneType::Discard);
        }
    }

    /// The magi goes to the defeated pile and the next one from the magi
    /// pile takes its place. With no magi left the opponent wins.
    fn defeat_magi(&mut self, owner: PlayerId, id: &CardId) {
        self.move_card(id, ZoneType::ActiveMagi, owner, ZoneType::DefeatedMagi);

        let next = self.zone(ZoneType::MagiPile, owner).cards.first().map(|c| (c.id.clone(), c.card.data.starting_energy));
        match next {
            Some((next_id, energy)) => {
                self.move_card(&next_id, ZoneType::MagiPile, owner, ZoneType::ActiveMagi);
                self.add_energy_to_magi(owner, &next_id, energy);
            }
            None => {
                let winner = self.opponent_of(owner);
                debug!("player {} has no magi left, player {} wins", owner, winner);
                self.winner = Some(winner);
                self.emit(ServerAction::PlayerWins { player: winner });
            }
        }
    }

    /// A card in play or in an active magi slot.
    fn permanent_mut(&mut self, id: &CardId) -> Option<&mut CardInGame> {
        let index = self
            .zones
            .iter()
            .position(|z| matches!(z.zone_type, ZoneType::InPlay | ZoneType::ActiveMagi) && z.by_id(id).is_some())?;
        self.zones[index].by_id_mut(id)
    }
}

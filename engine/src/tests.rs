// ═══════════════════════════════════════════════════════════════════════
// Test suite for the Magi duel engine
// ═══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use crate::cards::{by_name, EffectKind};
    use crate::engine::{Action, PromptResolution};
    use crate::error::EngineError;
    use crate::protocol::*;
    use crate::setup::create_initial_state;
    use crate::state::*;
    use crate::types::*;
    use serde_json::json;

    // ── Helpers: hand-built duels ────────────────────────────────────────

    fn duel(step: Step) -> State {
        State::new(StateConfig { step, ..Default::default() })
    }

    fn put(state: &mut State, kind: ZoneType, owner: PlayerId, name: &str, energy: u32) -> CardId {
        let n = state.zones.iter().map(|z| z.len()).sum::<usize>() + 1;
        let id = CardId(format!("t{}", n));
        let card = CardInGame::new(id.clone(), by_name(name).unwrap(), owner).with_energy(energy);
        state.zone_mut(kind, owner).add(card);
        id
    }

    fn energy(state: &State, id: &CardId) -> u32 {
        state.find_card(id).map(|(_, c)| c.data.energy).unwrap()
    }

    fn pass(state: &mut State) {
        let player = state.active_player;
        state.update(&Action::Pass { player }).unwrap();
    }

    fn power(player: PlayerId, source: &CardId, name: &str) -> Action {
        Action::Power { player, source: source.clone(), power: name.to_string() }
    }

    fn attack(player: PlayerId, source: &CardId, target: &CardId, extra: &[&CardId]) -> Action {
        Action::Attack {
            player,
            source: source.clone(),
            target: target.clone(),
            additional_attackers: extra.iter().map(|id| (*id).clone()).collect(),
        }
    }

    fn resolve(player: PlayerId, prompt_type: PromptType, resolution: PromptResolution) -> Action {
        Action::ResolvePrompt { player, prompt_type, generated_by: None, resolution }
    }

    // ═════════════════════════════════════════════════════════════════════
    // TURN STRUCTURE TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_pass_walks_steps_and_ends_turn() {
        let mut state = duel(Step::Priority1);
        put(&mut state, ZoneType::ActiveMagi, 1, "Pruitt", 10);
        let grega = put(&mut state, ZoneType::ActiveMagi, 2, "Grega", 10);
        for _ in 0..3 {
            put(&mut state, ZoneType::Deck, 1, "Weebo", 0);
        }

        pass(&mut state);
        assert_eq!(state.step, Step::Attack);
        pass(&mut state);
        assert_eq!(state.step, Step::Creatures);
        pass(&mut state);
        assert_eq!(state.step, Step::Priority2);
        pass(&mut state);

        // Draw step, end of turn, opponent energized into PRS1
        assert_eq!(state.zone(ZoneType::Hand, 1).len(), 2);
        assert_eq!(state.zone(ZoneType::Deck, 1).len(), 1);
        assert_eq!(state.active_player, 2);
        assert_eq!(state.step, Step::Priority1);
        assert_eq!(state.turn, 2);
        assert_eq!(energy(&state, &grega), 15);
    }

    #[test]
    fn test_only_active_player_acts() {
        let mut state = duel(Step::Priority1);
        let err = state.update(&Action::Pass { player: 2 }).unwrap_err();
        assert_eq!(err, EngineError::NotActivePlayer(2));
        assert_eq!(state.step, Step::Priority1);
    }

    #[test]
    fn test_empty_deck_recycles_discard() {
        let mut state = duel(Step::Priority2);
        put(&mut state, ZoneType::Discard, 1, "Weebo", 0);
        put(&mut state, ZoneType::Discard, 1, "Grow", 0);
        put(&mut state, ZoneType::Discard, 1, "Arbolit", 0);
        pass(&mut state);
        assert_eq!(state.zone(ZoneType::Hand, 1).len(), 2);
        assert_eq!(state.zone(ZoneType::Deck, 1).len(), 1);
        assert!(state.zone(ZoneType::Discard, 1).is_empty());
    }

    #[test]
    fn test_pass_only_game_survives_many_turns() {
        let mut state = create_initial_state(99);
        for _ in 0..200 {
            pass(&mut state);
        }
        assert_eq!(state.turn, 51);
        assert!(state.winner.is_none());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut state = duel(Step::Priority1);
        let weebo = put(&mut state, ZoneType::InPlay, 1, "Weebo", 2);
        let mut sim = state.clone();
        pass(&mut sim);
        sim.in_play_mut().by_id_mut(&weebo).unwrap().data.energy = 9;

        assert_eq!(state.step, Step::Priority1);
        assert_eq!(energy(&state, &weebo), 2);
        assert_eq!(sim.step, Step::Attack);
    }

    // ═════════════════════════════════════════════════════════════════════
    // POWER TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_power_used_once_per_turn() {
        let mut state = duel(Step::Priority1);
        let poad = put(&mut state, ZoneType::ActiveMagi, 1, "Poad", 3);
        put(&mut state, ZoneType::ActiveMagi, 2, "Magam", 10);
        let weebo = put(&mut state, ZoneType::InPlay, 1, "Weebo", 2);

        state.update(&power(1, &poad, "Heroes' Feast")).unwrap();
        assert_eq!(energy(&state, &poad), 2);
        assert_eq!(energy(&state, &weebo), 3);

        let err = state.update(&power(1, &poad, "Heroes' Feast")).unwrap_err();
        assert_eq!(err, EngineError::PowerAlreadyUsed("Heroes' Feast".into()));

        // Round trip to player 1's next turn re-enables it.
        for _ in 0..8 {
            pass(&mut state);
        }
        assert_eq!(state.active_player, 1);
        assert!(state.update(&power(1, &poad, "Heroes' Feast")).is_ok());
    }

    #[test]
    fn test_power_needs_energy() {
        let mut state = duel(Step::Priority1);
        let pruitt = put(&mut state, ZoneType::ActiveMagi, 1, "Pruitt", 1);
        put(&mut state, ZoneType::InPlay, 1, "Weebo", 2);

        let err = state.update(&power(1, &pruitt, "Refresh")).unwrap_err();
        assert_eq!(err, EngineError::NotEnoughEnergy { need: 2, have: 1 });
        assert_eq!(energy(&state, &pruitt), 1);
        assert!(state.prompt.is_none());
    }

    #[test]
    fn test_power_only_in_priority_steps() {
        let mut state = duel(Step::Attack);
        let poad = put(&mut state, ZoneType::ActiveMagi, 1, "Poad", 3);
        let err = state.update(&power(1, &poad, "Heroes' Feast")).unwrap_err();
        assert_eq!(err, EngineError::WrongStep(Step::Attack));
    }

    #[test]
    fn test_creature_power_pays_own_energy() {
        let mut state = duel(Step::Priority1);
        let pruitt = put(&mut state, ZoneType::ActiveMagi, 1, "Pruitt", 10);
        let weebo = put(&mut state, ZoneType::InPlay, 1, "Weebo", 2);

        state.update(&power(1, &weebo, "Vitalize")).unwrap();
        assert_eq!(energy(&state, &weebo), 1);
        assert_eq!(energy(&state, &pruitt), 10);
        let prompt = state.prompt.as_ref().unwrap();
        assert_eq!(prompt.prompt_type, PromptType::MayAbility);
        assert_eq!(prompt.generated_by, weebo);

        state.update(&resolve(1, PromptType::MayAbility, PromptResolution::UseEffect(true))).unwrap();
        assert_eq!(energy(&state, &pruitt), 12);
        assert!(state.prompt.is_none());
    }

    #[test]
    fn test_relic_power_filtered_prompt() {
        let mut state = duel(Step::Priority1);
        let grega = put(&mut state, ZoneType::ActiveMagi, 1, "Grega", 5);
        let stone = put(&mut state, ZoneType::InPlay, 1, "Siphon Stone", 0);
        let big = put(&mut state, ZoneType::InPlay, 2, "Timber Hyren", 5);
        let small = put(&mut state, ZoneType::InPlay, 2, "Weebo", 2);

        state.update(&power(1, &stone, "Siphon")).unwrap();
        assert_eq!(energy(&state, &grega), 4);
        let prompt = state.prompt.as_ref().unwrap();
        assert_eq!(prompt.prompt_type, PromptType::SingleCreatureFiltered);

        let too_big = resolve(1, PromptType::SingleCreatureFiltered, PromptResolution::Target(big.clone()));
        assert_eq!(state.update(&too_big).unwrap_err(), EngineError::IllegalTarget(big));
        let ok = resolve(1, PromptType::SingleCreatureFiltered, PromptResolution::Target(small.clone()));
        state.update(&ok).unwrap();
        assert_eq!(energy(&state, &small), 1);
    }

    // ═════════════════════════════════════════════════════════════════════
    // PLAY TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_creature_region_tax() {
        let mut state = duel(Step::Creatures);
        let pruitt = put(&mut state, ZoneType::ActiveMagi, 1, "Pruitt", 10);
        let balamant = put(&mut state, ZoneType::Hand, 1, "Lava Balamant", 0);

        state.update(&Action::Play { player: 1, card: balamant.clone() }).unwrap();
        assert_eq!(energy(&state, &pruitt), 4);
        let in_play = state.in_play().by_id(&balamant).unwrap();
        assert_eq!(in_play.data.energy, 5);
        assert_eq!(in_play.data.controller, 1);
    }

    #[test]
    fn test_creature_only_in_creatures_step() {
        let mut state = duel(Step::Priority1);
        put(&mut state, ZoneType::ActiveMagi, 1, "Pruitt", 10);
        let weebo = put(&mut state, ZoneType::Hand, 1, "Weebo", 0);
        let err = state.update(&Action::Play { player: 1, card: weebo }).unwrap_err();
        assert_eq!(err, EngineError::WrongStep(Step::Priority1));
    }

    #[test]
    fn test_spell_prompt_targets_own_creature() {
        let mut state = duel(Step::Priority1);
        let pruitt = put(&mut state, ZoneType::ActiveMagi, 1, "Pruitt", 10);
        let weebo = put(&mut state, ZoneType::InPlay, 1, "Weebo", 2);
        let enemy = put(&mut state, ZoneType::InPlay, 2, "Quor Pup", 2);
        let grow = put(&mut state, ZoneType::Hand, 1, "Grow", 0);

        state.update(&Action::Play { player: 1, card: grow.clone() }).unwrap();
        assert_eq!(energy(&state, &pruitt), 9);
        assert!(state.zone(ZoneType::Discard, 1).by_id(&grow).is_some());
        assert_eq!(state.prompt.as_ref().unwrap().prompt_type, PromptType::OwnSingleCreature);

        // Nothing else can happen until the prompt is answered.
        assert_eq!(state.update(&Action::Pass { player: 1 }).unwrap_err(), EngineError::PromptPending);
        let wrong_player = resolve(2, PromptType::OwnSingleCreature, PromptResolution::Target(weebo.clone()));
        assert!(matches!(state.update(&wrong_player), Err(EngineError::WrongPromptPlayer { .. })));
        let wrong_side = resolve(1, PromptType::OwnSingleCreature, PromptResolution::Target(enemy.clone()));
        assert_eq!(state.update(&wrong_side).unwrap_err(), EngineError::IllegalTarget(enemy));

        state.update(&resolve(1, PromptType::OwnSingleCreature, PromptResolution::Target(weebo.clone()))).unwrap();
        assert_eq!(energy(&state, &weebo), 4);
        assert!(state.prompt.is_none());
    }

    #[test]
    fn test_spell_without_targets_skips_prompt() {
        let mut state = duel(Step::Priority2);
        let pruitt = put(&mut state, ZoneType::ActiveMagi, 1, "Pruitt", 10);
        let grow = put(&mut state, ZoneType::Hand, 1, "Grow", 0);
        state.update(&Action::Play { player: 1, card: grow }).unwrap();
        assert_eq!(energy(&state, &pruitt), 9);
        assert!(state.prompt.is_none());
    }

    #[test]
    fn test_duplicate_relic_rejected() {
        let mut state = duel(Step::Priority1);
        put(&mut state, ZoneType::ActiveMagi, 1, "Pruitt", 10);
        put(&mut state, ZoneType::InPlay, 1, "War Drum", 0);
        let second = put(&mut state, ZoneType::Hand, 1, "War Drum", 0);
        let err = state.update(&Action::Play { player: 1, card: second }).unwrap_err();
        assert_eq!(err, EngineError::DuplicateRelic("War Drum"));
    }

    // ═════════════════════════════════════════════════════════════════════
    // PROMPT TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_number_prompt_half_open_range() {
        let mut state = duel(Step::Priority1);
        let pruitt = put(&mut state, ZoneType::ActiveMagi, 1, "Pruitt", 10);
        let carillion = put(&mut state, ZoneType::InPlay, 1, "Carillion", 4);

        state.update(&power(1, &carillion, "Channel")).unwrap();
        let params = &state.prompt.as_ref().unwrap().params;
        assert_eq!((params.min, params.max), (Some(1), Some(4)));

        let too_many = resolve(1, PromptType::Number, PromptResolution::Number(4));
        assert_eq!(state.update(&too_many).unwrap_err(), EngineError::InvalidPromptResolution(PromptType::Number));
        state.update(&resolve(1, PromptType::Number, PromptResolution::Number(3))).unwrap();
        assert_eq!(energy(&state, &carillion), 1);
        assert_eq!(energy(&state, &pruitt), 13);
    }

    #[test]
    fn test_enter_prompt_from_generating_card() {
        let mut state = duel(Step::Priority1);
        let weebo = put(&mut state, ZoneType::InPlay, 1, "Weebo", 2);
        let grow = put(&mut state, ZoneType::Discard, 1, "Grow", 0);

        state.enter_prompt(PromptType::OwnSingleCreature, 1, &grow, PromptParams::default()).unwrap();
        let pending = state.prompt.as_ref().unwrap().pending.as_ref().unwrap();
        assert_eq!(pending.effect, EffectKind::EnergizeOwnCreature { amount: 2 });

        state.update(&resolve(1, PromptType::OwnSingleCreature, PromptResolution::Target(weebo.clone()))).unwrap();
        assert_eq!(energy(&state, &weebo), 4);

        let err = state.enter_prompt(PromptType::Number, 1, &grow, PromptParams::default()).unwrap_err();
        assert_eq!(err, EngineError::UnsupportedPrompt(PromptType::Number));
    }

    #[test]
    fn test_resolve_without_prompt() {
        let mut state = duel(Step::Priority1);
        let err = state.update(&resolve(1, PromptType::MayAbility, PromptResolution::UseEffect(true))).unwrap_err();
        assert_eq!(err, EngineError::NoPrompt);
    }

    // ═════════════════════════════════════════════════════════════════════
    // COMBAT TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_combat_is_simultaneous() {
        let mut state = duel(Step::Attack);
        put(&mut state, ZoneType::ActiveMagi, 2, "Grega", 10);
        let hyren = put(&mut state, ZoneType::InPlay, 1, "Timber Hyren", 5);
        let aq = put(&mut state, ZoneType::InPlay, 2, "Lava Aq", 3);

        state.update(&attack(1, &hyren, &aq, &[])).unwrap();
        assert_eq!(energy(&state, &hyren), 2);
        assert!(state.zone(ZoneType::Discard, 2).by_id(&aq).is_some());
        let attacker = state.in_play().by_id(&hyren).unwrap();
        assert_eq!(attacker.data.attacked, 1);
        assert!(attacker.data.has_attacked);

        let again = state.update(&attack(1, &hyren, &aq, &[])).unwrap_err();
        assert_eq!(again, EngineError::AttackLimitReached(hyren));
    }

    #[test]
    fn test_magi_shielded_by_creatures() {
        let mut state = duel(Step::Attack);
        let grega = put(&mut state, ZoneType::ActiveMagi, 2, "Grega", 10);
        let hyren = put(&mut state, ZoneType::InPlay, 1, "Timber Hyren", 5);
        let chogo = put(&mut state, ZoneType::InPlay, 1, "Fire Chogo", 2);
        put(&mut state, ZoneType::InPlay, 2, "Lava Aq", 3);

        let err = state.update(&attack(1, &hyren, &grega, &[])).unwrap_err();
        assert_eq!(err, EngineError::IllegalTarget(grega.clone()));
        state.update(&attack(1, &chogo, &grega, &[])).unwrap();
        assert_eq!(energy(&state, &grega), 8);
        assert_eq!(energy(&state, &chogo), 2);
    }

    #[test]
    fn test_pack_hunt() {
        let mut state = duel(Step::Attack);
        let grega = put(&mut state, ZoneType::ActiveMagi, 2, "Grega", 10);
        let hyren = put(&mut state, ZoneType::InPlay, 1, "Timber Hyren", 5);
        let leaf = put(&mut state, ZoneType::InPlay, 1, "Leaf Hyren", 3);
        let balamant = put(&mut state, ZoneType::InPlay, 2, "Lava Balamant", 5);

        // Not against magi, not with non-hunters, not with itself.
        assert!(state.update(&attack(1, &hyren, &grega, &[&leaf])).is_err());
        assert!(state.update(&attack(1, &leaf, &balamant, &[&hyren])).is_err());
        assert!(state.update(&attack(1, &leaf, &balamant, &[&leaf])).is_err());

        state.update(&attack(1, &hyren, &balamant, &[&leaf])).unwrap();
        assert!(state.zone(ZoneType::Discard, 2).by_id(&balamant).is_some());
        assert!(state.zone(ZoneType::Discard, 1).by_id(&hyren).is_some());
        let hunter = state.in_play().by_id(&leaf).unwrap();
        assert_eq!(hunter.data.energy, 3);
        assert_eq!(hunter.data.attacked, 1);
    }

    #[test]
    fn test_magi_defeat_and_winner() {
        let mut state = duel(Step::Attack);
        let grega = put(&mut state, ZoneType::ActiveMagi, 2, "Grega", 3);
        let magam = put(&mut state, ZoneType::MagiPile, 2, "Magam", 0);
        let hyren = put(&mut state, ZoneType::InPlay, 1, "Timber Hyren", 5);
        let chogo = put(&mut state, ZoneType::InPlay, 1, "Fire Chogo", 2);

        state.update(&attack(1, &hyren, &grega, &[])).unwrap();
        assert!(state.zone(ZoneType::DefeatedMagi, 2).by_id(&grega).is_some());
        assert_eq!(state.active_magi(2).unwrap().id, magam);
        assert_eq!(energy(&state, &magam), 12);
        assert!(!state.has_winner());

        state.in_play_mut().by_id_mut(&chogo).unwrap().data.energy = 12;
        state.update(&attack(1, &chogo, &magam, &[])).unwrap();
        assert_eq!(state.winner, Some(1));
        assert_eq!(state.update(&Action::Pass { player: 1 }).unwrap_err(), EngineError::GameOver);
    }

    #[test]
    fn test_magi_without_energy_cannot_be_attacked() {
        let mut state = duel(Step::Attack);
        let grega = put(&mut state, ZoneType::ActiveMagi, 2, "Grega", 0);
        let hyren = put(&mut state, ZoneType::InPlay, 1, "Timber Hyren", 5);
        let err = state.update(&attack(1, &hyren, &grega, &[])).unwrap_err();
        assert_eq!(err, EngineError::IllegalTarget(grega));
    }

    // ═════════════════════════════════════════════════════════════════════
    // STATIC ABILITY & FILTER TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_attacks_per_turn_modifiers() {
        let mut state = duel(Step::Priority1);
        let kelthet = put(&mut state, ZoneType::InPlay, 1, "Kelthet", 4);
        let weebo = put(&mut state, ZoneType::InPlay, 1, "Weebo", 2);
        let pup = put(&mut state, ZoneType::InPlay, 2, "Quor Pup", 2);
        let card = |s: &State, id: &CardId| s.in_play().by_id(id).unwrap().clone();

        assert_eq!(state.modify_by_static_abilities(&card(&state, &kelthet), Property::AttacksPerTurn), 2);
        assert_eq!(state.modify_by_static_abilities(&card(&state, &weebo), Property::AttacksPerTurn), 1);

        put(&mut state, ZoneType::InPlay, 1, "War Drum", 0);
        assert_eq!(state.modify_by_static_abilities(&card(&state, &kelthet), Property::AttacksPerTurn), 3);
        assert_eq!(state.modify_by_static_abilities(&card(&state, &weebo), Property::AttacksPerTurn), 2);
        assert_eq!(state.modify_by_static_abilities(&card(&state, &pup), Property::AttacksPerTurn), 1);
    }

    #[test]
    fn test_continuous_effect_expires_at_end_of_turn() {
        let mut state = duel(Step::Priority1);
        put(&mut state, ZoneType::ActiveMagi, 1, "Grega", 10);
        let pup = put(&mut state, ZoneType::InPlay, 1, "Quor Pup", 2);
        let rage = put(&mut state, ZoneType::Hand, 1, "Rage", 0);

        state.update(&Action::Play { player: 1, card: rage }).unwrap();
        let attacks = |s: &State| s.modify_by_static_abilities(s.in_play().by_id(&pup).unwrap(), Property::AttacksPerTurn);
        assert_eq!(attacks(&state), 2);

        for _ in 0..4 {
            pass(&mut state);
        }
        assert_eq!(state.active_player, 2);
        assert_eq!(attacks(&state), 1);
    }

    #[test]
    fn test_card_filter() {
        let mut state = duel(Step::Priority1);
        let aq = put(&mut state, ZoneType::InPlay, 2, "Lava Aq", 3);
        let chogo = put(&mut state, ZoneType::InPlay, 2, "Fire Chogo", 2);
        let weebo = put(&mut state, ZoneType::InPlay, 1, "Weebo", 2);

        let filter = state.make_card_filter(&[Restriction::OpponentCreature, Restriction::EnergyLessThan(3)], 1);
        let check = |id: &CardId| filter(state.in_play().by_id(id).unwrap());
        assert!(!check(&aq));
        assert!(check(&chogo));
        assert!(!check(&weebo));

        let cald = state.make_card_filter(&[Restriction::Region(Region::Cald)], 1);
        assert!(cald(state.in_play().by_id(&aq).unwrap()));
        assert!(!cald(state.in_play().by_id(&weebo).unwrap()));
    }

    // ═════════════════════════════════════════════════════════════════════
    // PROTOCOL & VISIBILITY TESTS
    // ═════════════════════════════════════════════════════════════════════

    #[test]
    fn test_client_action_wire_shapes() {
        let play = ClientAction::from(&Action::Play { player: 1, card: "c5".into() });
        assert_eq!(
            serde_json::to_value(&play).unwrap(),
            json!({"type": "actions/play", "payload": {"card": "c5", "player": 1}})
        );

        let strike = ClientAction::from(&attack(2, &"a".into(), &"b".into(), &[]));
        assert_eq!(
            serde_json::to_value(&strike).unwrap(),
            json!({"type": "actions/attack", "source": "a", "target": "b", "player": 2})
        );

        let number = ClientAction::from(&resolve(1, PromptType::Number, PromptResolution::Number(2)));
        assert_eq!(
            serde_json::to_value(&number).unwrap(),
            json!({"type": "actions/resolvePrompt", "promptType": "prompt/number", "number": 2, "player": 1})
        );

        let back = Action::try_from(number).unwrap();
        assert_eq!(back, resolve(1, PromptType::Number, PromptResolution::Number(2)));
    }

    #[test]
    fn test_server_action_decoding() {
        let pass: ServerAction = serde_json::from_value(json!({"type": "actions/pass", "player": 1, "newStep": 2})).unwrap();
        assert_eq!(pass, ServerAction::Pass { player: 1, new_step: Some(Step::Attack) });

        let unknown: ServerAction = serde_json::from_value(json!({"type": "actions/somethingNew", "x": 1})).unwrap();
        assert_eq!(unknown, ServerAction::Unknown);

        let effect: ServerAction =
            serde_json::from_value(json!({"type": "actions/effect", "effectType": "effects/mystery"})).unwrap();
        assert_eq!(effect, ServerAction::Effect(Effect::Unknown));

        let prompt: ServerAction = serde_json::from_value(json!({
            "type": "actions/enterPrompt",
            "promptType": "prompt/brandNew",
            "player": 2
        }))
        .unwrap();
        assert!(matches!(prompt, ServerAction::EnterPrompt { prompt_type: PromptType::Unknown, .. }));
    }

    #[test]
    fn test_sparse_card_ref_takes_defaults() {
        let bare: CardRef = serde_json::from_value(json!({"owner": 2})).unwrap();
        assert_eq!(bare.id, CardId::default());
        assert!(bare.is_hidden());
        assert_eq!(bare.data.energy, 0);
        assert_eq!(CardRef::default(), CardRef { owner: 0, ..bare.clone() });

        let named: CardRef = serde_json::from_value(json!({"id": "c7", "card": "Weebo"})).unwrap();
        assert_eq!(named.id, CardId::new("c7"));
        assert_eq!(named.owner, 0);
    }

    #[test]
    fn test_journal_records_emitted_actions() {
        let mut state = duel(Step::Priority1);
        state.enable_journal();
        pass(&mut state);
        assert_eq!(state.take_journal(), vec![ServerAction::Pass { player: 1, new_step: Some(Step::Attack) }]);
        assert!(state.take_journal().is_empty());
    }

    #[test]
    fn test_serialized_view_hides_opponent_hand() {
        let mut state = duel(Step::Priority1);
        put(&mut state, ZoneType::Hand, 1, "Weebo", 0);
        put(&mut state, ZoneType::Deck, 1, "Grow", 0);

        let mine = state.serialize_data(1);
        assert_eq!(mine.zones.player_hand[0].card, "Weebo");
        assert!(mine.zones.player_deck[0].is_hidden());

        let theirs = state.serialize_data(2);
        assert!(theirs.zones.opponent_hand[0].is_hidden());
        assert_eq!(theirs.active_player, 1);
        assert_eq!(theirs.step, Step::Priority1);
    }

    #[test]
    fn test_draw_redacted_for_opponent() {
        let mut state = duel(Step::Priority2);
        state.enable_journal();
        put(&mut state, ZoneType::Deck, 1, "Weebo", 0);
        pass(&mut state);
        let journal = state.take_journal();
        let drawn = journal
            .iter()
            .find_map(|a| match a {
                ServerAction::Effect(Effect::CardMovedBetweenZones { target, .. }) => Some(a.clone()).filter(|_| !target.is_hidden()),
                _ => None,
            })
            .unwrap();

        match drawn.redacted_for(2) {
            ServerAction::Effect(Effect::CardMovedBetweenZones { target, .. }) => assert!(target.is_hidden()),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(drawn.redacted_for(1), drawn);
    }
}

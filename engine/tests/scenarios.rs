mod common;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tactician_battle::{Effect, RosterSlot, SideCondition, Status, Type};
use tactician_engine::{
    Action, DamageEstimator, DamageRange, DecisionEngine, EngineConfig, MatchRegistry, MatchSession, TypeMatchup,
    registry,
};

use common::{FailingCalculator, FixedDamage, battle, combatant, dex, mv};

fn expert(calculator: Arc<FixedDamage>) -> DecisionEngine {
    DecisionEngine::new(dex(), calculator, EngineConfig::expert())
}

#[test]
fn test_low_health_uses_recovery() {
    let engine = expert(Arc::new(FixedDamage::new(&[("thunderbolt", 40.0, 50.0)])));
    let mut session = MatchSession::with_seed("battle-recover", 1);
    let mut state = battle("battle-recover");
    state.ally.roster[0].hp_current = 40;
    state.available_moves = vec![mv("thunderbolt"), mv("recover")];

    assert_eq!(engine.choose_action(&state, &mut session), Action::use_move("recover"));

    state.ally.roster[0].effects.insert(Effect::HealBlock);
    assert_eq!(engine.choose_action(&state, &mut session), Action::use_move("thunderbolt"));
}

#[test]
fn test_recovery_never_fires_at_half_or_above() {
    let engine = expert(Arc::new(FixedDamage::new(&[("thunderbolt", 40.0, 50.0)])));
    let mut session = MatchSession::with_seed("battle-recover", 1);
    let mut state = battle("battle-recover");
    state.available_moves = vec![mv("recover"), mv("slackoff"), mv("thunderbolt")];

    for hp in 50..=100 {
        state.ally.roster[0].hp_current = hp;
        assert_ne!(engine.choose_action(&state, &mut session), Action::use_move("recover"));
        assert_ne!(engine.choose_action(&state, &mut session), Action::use_move("slackoff"));
    }
}

#[test]
fn test_hazard_beats_lower_priority_rules() {
    let engine = expert(Arc::new(FixedDamage::new(&[("thunderbolt", 40.0, 50.0)])));
    let mut session = MatchSession::with_seed("battle-hazards", 1);
    let mut state = battle("battle-hazards");
    state.available_moves = vec![mv("knockoff"), mv("toxic"), mv("thunderbolt"), mv("stealthrock")];

    assert_eq!(engine.choose_action(&state, &mut session), Action::use_move("stealthrock"));

    // rocks are up, knock off is next
    state.foe.add_layer(SideCondition::StealthRock);
    assert_eq!(engine.choose_action(&state, &mut session), Action::use_move("knockoff"));
    assert!(session.memory.was_debuffed(RosterSlot::foe(0)));

    // then toxic, once
    assert_eq!(engine.choose_action(&state, &mut session), Action::use_move("toxic"));
    assert_eq!(engine.choose_action(&state, &mut session), Action::use_move("thunderbolt"));
}

#[test]
fn test_hazards_never_exceed_game_limits() {
    let engine = expert(Arc::new(FixedDamage::new(&[("thunderbolt", 40.0, 50.0)])));
    let mut session = MatchSession::with_seed("battle-spikes", 1);
    let mut state = battle("battle-spikes");
    state.available_moves = vec![mv("spikes"), mv("toxicspikes"), mv("thunderbolt")];

    let mut laid = 0;
    for turn in 1..=10 {
        state.turn = turn;
        let action = engine.choose_action(&state, &mut session);
        if let Some(condition) = action.move_id().and_then(SideCondition::from_protocol) {
            state.foe.add_layer(condition);
            laid += 1;
        }
        assert!(state.foe.layers(SideCondition::Spikes) <= 3);
        assert!(state.foe.layers(SideCondition::ToxicSpikes) <= 2);
    }
    assert_eq!(laid, 5);
    assert_eq!(engine.choose_action(&state, &mut session), Action::use_move("thunderbolt"));
}

#[test]
fn test_forced_replacement_picks_best_matchup() {
    let engine = expert(Arc::new(FixedDamage::default()));
    let mut session = MatchSession::with_seed("battle-forced", 1);
    let mut state = battle("battle-forced");

    state.ally.roster = vec![
        combatant(RosterSlot::ally(0), "Pikachu", vec![Type::Electric], &["thunderbolt"]),
        combatant(RosterSlot::ally(1), "Snorlax", vec![Type::Normal], &["thunderbolt"]),
        combatant(RosterSlot::ally(2), "Kangaskhan", vec![Type::Normal], &["earthquake", "surf"]),
    ];
    state.ally.roster[0].fainted = true;
    state.ally.roster[0].hp_current = 0;
    state.foe.roster[0] = combatant(RosterSlot::foe(0), "Heatran", vec![Type::Fire, Type::Steel], &["tackle"]);
    state.force_switch = true;
    state.available_moves = vec![mv("thunderbolt")];
    state.available_switches = vec![1, 2];

    let matchup = TypeMatchup::new(dex());
    let heatran = &state.foe.roster[0];
    assert_eq!(matchup.one_way(&state.ally.roster[1], heatran), 1.0);
    assert_eq!(matchup.one_way(&state.ally.roster[2], heatran), 3.0);

    assert_eq!(engine.choose_action(&state, &mut session), Action::switch(2));
}

#[test]
fn test_forced_tie_keeps_roster_order() {
    let engine = expert(Arc::new(FixedDamage::default()));
    let mut session = MatchSession::with_seed("battle-forced-tie", 1);
    let mut state = battle("battle-forced-tie");

    state.ally.roster = vec![
        combatant(RosterSlot::ally(0), "Pikachu", vec![Type::Electric], &["thunderbolt"]),
        combatant(RosterSlot::ally(1), "Snorlax", vec![Type::Normal], &["tackle"]),
        combatant(RosterSlot::ally(2), "Kangaskhan", vec![Type::Normal], &["tackle"]),
    ];
    state.ally.roster[0].fainted = true;
    state.ally.roster[0].hp_current = 0;
    state.force_switch = true;
    // the request lists the later slot first
    state.available_switches = vec![2, 1];

    assert_eq!(engine.choose_action(&state, &mut session), Action::switch(1));
}

#[test]
fn test_fallback_picks_highest_average_damage() {
    let engine = expert(Arc::new(FixedDamage::new(&[
        ("thunderbolt", 30.0, 50.0),
        ("surf", 80.0, 90.0),
    ])));
    let mut session = MatchSession::with_seed("battle-fallback", 1);
    let mut state = battle("battle-fallback");
    state.available_moves = vec![mv("thunderbolt"), mv("surf")];

    assert_eq!(engine.choose_action(&state, &mut session), Action::use_move("surf"));
}

#[test]
fn test_observed_immunity_skips_calculator() {
    let calculator = Arc::new(FixedDamage::new(&[("thunderbolt", 90.0, 110.0), ("surf", 40.0, 50.0)]));
    let engine = expert(calculator.clone());
    let matches = MatchRegistry::new();
    let session = matches.insert(MatchSession::with_seed("battle-immune", 1));
    let mut state = battle("battle-immune");
    state.available_moves = vec![mv("thunderbolt"), mv("surf")];

    assert_eq!(
        engine.choose_action(&state, &mut registry::lock(&session)),
        Action::use_move("thunderbolt")
    );

    matches
        .observe_log(&state, "|move|p1a: Pikachu|Thunderbolt|p2a: Dugtrio")
        .unwrap();
    matches.observe_log(&state, "|-immune|p2a: Dugtrio").unwrap();

    state.turn = 2;
    let before = calculator.calls();
    let estimator = engine.estimator();
    let range = estimator.estimate(
        &state,
        RosterSlot::ally(0),
        RosterSlot::foe(0),
        &mv("thunderbolt"),
        &mut registry::lock(&session).memory,
    );
    assert_eq!(range, DamageRange::ZERO);
    assert_eq!(calculator.calls(), before);

    assert_eq!(
        engine.choose_action(&state, &mut registry::lock(&session)),
        Action::use_move("surf")
    );
}

#[test]
fn test_estimate_is_idempotent() {
    let calculator = Arc::new(FixedDamage::new(&[("surf", 40.0, 48.0)]));
    let estimator = DamageEstimator::new(dex(), calculator.clone());
    let mut session = MatchSession::with_seed("battle-idempotent", 1);
    let state = battle("battle-idempotent");

    let first = estimator.estimate(&state, RosterSlot::ally(0), RosterSlot::foe(0), &mv("surf"), &mut session.memory);
    let second = estimator.estimate(&state, RosterSlot::ally(0), RosterSlot::foe(0), &mv("surf"), &mut session.memory);
    assert_eq!(first, second);
    assert_eq!(first, DamageRange::new(40.0, 48.0));
    assert_eq!(calculator.calls(), 1);
}

#[test]
fn test_two_way_score_properties() {
    let matchup = TypeMatchup::new(dex());
    let state = battle("battle-matchup");
    // no revealed moves, so learnsets are used
    let pikachu = combatant(RosterSlot::ally(0), "Pikachu", vec![Type::Electric], &[]);
    let dugtrio = &state.foe.roster[0];
    let gengar = &state.foe.roster[1];

    let ab = matchup.two_way(&pikachu, dugtrio);
    let ba = matchup.two_way(dugtrio, &pikachu);
    assert!((ab - 2.0 / 3.0).abs() < 1e-6);
    assert!((ab * ba - 1.0).abs() < 1e-6);

    // Gengar has no learnset in the fixture, so it cannot hit back
    assert_eq!(matchup.two_way(&pikachu, gengar), f32::INFINITY);
}

#[test]
fn test_failing_calculator_still_acts() {
    let engine = DecisionEngine::new(dex(), Arc::new(FailingCalculator), EngineConfig::expert());
    let mut session = MatchSession::with_seed("battle-failing", 1);
    let mut state = battle("battle-failing");
    state.available_moves = vec![mv("thunderbolt"), mv("surf")];

    assert_eq!(engine.choose_action(&state, &mut session), Action::use_move("thunderbolt"));
}

#[test]
fn test_random_states_always_get_legal_actions() {
    let calculator = Arc::new(FixedDamage::new(&[
        ("thunderbolt", 30.0, 50.0),
        ("surf", 60.0, 70.0),
        ("earthquake", 80.0, 100.0),
        ("futuresight", 90.0, 120.0),
    ]));
    let engines = [
        DecisionEngine::new(dex(), calculator.clone(), EngineConfig::expert()),
        DecisionEngine::new(dex(), calculator, EngineConfig::hazard_stack()),
    ];
    let pool = [
        "recover",
        "stealthrock",
        "spikes",
        "toxicspikes",
        "knockoff",
        "rapidspin",
        "toxic",
        "thunderbolt",
        "surf",
        "earthquake",
        "futuresight",
    ];
    let mut rng = StdRng::seed_from_u64(2024);
    let mut session = MatchSession::with_seed("battle-fuzz", 7);

    for turn in 1..=300 {
        let mut state = battle("battle-fuzz");
        state.turn = turn;
        let count = rng.gen_range(0..=4);
        state.available_moves = pool.choose_multiple(&mut rng, count).map(|id| mv(id)).collect();
        if rng.gen_bool(0.5) {
            state.available_switches = vec![1];
        }
        state.force_switch = rng.gen_bool(0.2);
        state.ally.roster[0].hp_current = rng.gen_range(1..=100);
        if rng.gen_bool(0.3) {
            state.foe.roster[0].status = Some(Status::BadPoison);
        }
        if rng.gen_bool(0.3) {
            state.ally.add_layer(SideCondition::Spikes);
        }
        if rng.gen_bool(0.1) {
            state.ally.active = None;
        }
        if rng.gen_bool(0.1) {
            state.foe.active = None;
        }

        for engine in &engines {
            let action = engine.choose_action(&state, &mut session);
            assert!(action.is_legal(&state), "turn {turn}: {action} is not legal");
            let can_move = !state.force_switch && !state.available_moves.is_empty();
            if can_move || !state.available_switches.is_empty() {
                assert_ne!(action, Action::Default, "turn {turn}: legal options were ignored");
            }
        }
    }
}

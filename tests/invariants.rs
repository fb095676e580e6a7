use std::time::Duration;

use card_combat::{
    BattleSetup, CombatConfig, CombatEngine, Intent, PhaseKind, Side, StandardCatalog,
    StandardDecks,
};
use proptest::prelude::*;

fn intent_from(tag: u8, index: usize) -> Intent {
    match tag {
        0 | 1 => Intent::PlayCard { index },
        2 => Intent::Draw,
        3 => Intent::Pass,
        4 => Intent::BeginDiscardSelect,
        5 => Intent::ToggleDiscard { index },
        6 => Intent::ConfirmDiscard,
        7 => Intent::CancelDiscard,
        8 | 9 => Intent::ResolveStaged,
        10 => Intent::CancelStaged,
        11 => Intent::PlayDefense { index },
        12 => Intent::SkipCounter,
        13 => Intent::DebugForceWin,
        _ => Intent::ContinueAfterCombat,
    }
}

fn step_strategy() -> impl Strategy<Value = (u64, Option<Intent>)> {
    (
        0u64..2_500,
        proptest::option::weighted(0.8, (0u8..15, 0usize..6)),
    )
        .prop_map(|(ms, intent)| (ms, intent.map(|(tag, index)| intent_from(tag, index))))
}

fn engine_for(enemy_deck: &str, seed: u64) -> CombatEngine {
    let setup = BattleSetup {
        enemy_deck: enemy_deck.to_string(),
        ..BattleSetup::default()
    };
    CombatEngine::from_setup(
        &setup,
        CombatConfig::default(),
        &StandardCatalog::new(),
        &StandardDecks,
        Some(seed),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cards_are_never_created_or_lost(
        seed in any::<u64>(),
        deck in prop::sample::select(vec!["intro_enemy", "chapter_boss", "grinder_enemy", "test_small"]),
        steps in prop::collection::vec(step_strategy(), 1..300),
    ) {
        let mut engine = engine_for(deck, seed);
        let player_total = engine.cards_held(Side::Player);
        let enemy_total = engine.cards_held(Side::Enemy);

        for (ms, intent) in steps {
            engine.tick(Duration::from_millis(ms), intent);
            prop_assert_eq!(engine.cards_held(Side::Player), player_total);
            prop_assert_eq!(engine.cards_held(Side::Enemy), enemy_total);
        }
    }

    #[test]
    fn health_and_phase_data_stay_consistent(
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 1..300),
    ) {
        let mut engine = engine_for("grinder_enemy", seed);
        let limit = engine.config().max_hand_size;

        for (ms, intent) in steps {
            engine.tick(Duration::from_millis(ms), intent);

            for side in [Side::Player, Side::Enemy] {
                let combatant = engine.side(side);
                prop_assert!(combatant.health <= combatant.max_health);
                prop_assert!(combatant.hand.len() <= limit);
            }
            if engine.counter_card().is_some() {
                prop_assert!(matches!(
                    engine.phase_kind(),
                    PhaseKind::CounterStaging | PhaseKind::ResolveWithCounter
                ));
            }
            if engine.last_stand_active() {
                prop_assert_eq!(engine.player().health, 0);
            }
            match engine.phase_kind() {
                PhaseKind::Victory => prop_assert_eq!(engine.enemy().health, 0),
                PhaseKind::Defeat => prop_assert_eq!(engine.player().health, 0),
                _ => {}
            }
            if let Some(progress) = engine.timer_progress() {
                prop_assert!((0.0..=1.0).contains(&progress));
            }
        }
    }
}

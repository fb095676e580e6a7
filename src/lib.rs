pub mod ai;
pub mod game;
pub mod utils;

use std::time::Duration;

use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

pub use ai::{choose_action, score_card, AiDecision, Persona};
pub use game::{
    BattleSetup, CardCatalog, CardDescriptor, CardEffect, CardId, CardKind, CombatConfig,
    CombatEngine, CombatEvent, CombatOutcome, CombatPhase, CombatReport, CombatSnapshot,
    Combatant, CombatantView, DeckRecipe, DeckRecipes, InMemoryProgress, Intent, IntentError,
    PhaseKind, ProgressStore, Side, StagedCard, StandardCatalog, StandardDecks,
};

#[cfg(all(feature = "wee_alloc", target_arch = "wasm32"))]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn parse_optional<T>(json: Option<String>) -> Result<T, JsValue>
where
    T: serde::de::DeserializeOwned + Default,
{
    match json.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => serde_json::from_str(json).map_err(serde_to_js_error),
        _ => Ok(T::default()),
    }
}

/// 每次推进后返回给前端的结果：最新快照与本次产生的事件。
#[derive(Serialize)]
struct CombatResolution {
    snapshot: CombatSnapshot,
    events: Vec<CombatEvent>,
}

#[wasm_bindgen]
pub struct CombatSession {
    engine: CombatEngine,
    progress: InMemoryProgress,
}

#[wasm_bindgen]
impl CombatSession {
    /// 三个参数均为可选 JSON：战斗参数、引擎配置、已有进度。
    #[wasm_bindgen(constructor)]
    pub fn new(
        setup_json: Option<String>,
        config_json: Option<String>,
        progress_json: Option<String>,
    ) -> Result<CombatSession, JsValue> {
        let config: CombatConfig = parse_optional(config_json)?;
        let progress: InMemoryProgress = parse_optional(progress_json)?;
        let setup = with_saved_deck(parse_optional(setup_json)?, &progress);

        let engine = CombatEngine::from_setup(
            &setup,
            config,
            &StandardCatalog::new(),
            &StandardDecks,
            None,
        );
        let message = format!(
            "战斗开始：{} vs {}（{}）",
            setup.battle_id,
            setup.enemy_deck,
            engine.persona()
        );
        web_sys::console::log_1(&message.into());

        Ok(CombatSession { engine, progress })
    }

    #[wasm_bindgen(js_name = "submitIntent")]
    pub fn submit_intent(&mut self, intent_json: &str) -> Result<String, JsValue> {
        let intent: Intent = serde_json::from_str(intent_json).map_err(serde_to_js_error)?;
        let events = self.engine.submit_intent(intent);
        self.resolution_json(events)
    }

    #[wasm_bindgen(js_name = "advanceTime")]
    pub fn advance_time(&mut self, delta_ms: f64) -> Result<String, JsValue> {
        let events = self.engine.advance_time(duration_from_ms(delta_ms));
        self.resolution_json(events)
    }

    pub fn tick(&mut self, delta_ms: f64, intent_json: Option<String>) -> Result<String, JsValue> {
        let intent = match intent_json {
            Some(json) => Some(serde_json::from_str::<Intent>(&json).map_err(serde_to_js_error)?),
            None => None,
        };
        let events = self.engine.tick(duration_from_ms(delta_ms), intent);
        self.resolution_json(events)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.snapshot()).map_err(serde_to_js_error)
    }

    pub fn progress(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.progress).map_err(serde_to_js_error)
    }

    fn resolution_json(&mut self, events: Vec<CombatEvent>) -> Result<String, JsValue> {
        self.engine.flush_progress(&mut self.progress);
        let resolution = CombatResolution {
            snapshot: self.engine.snapshot(),
            events,
        };
        serde_json::to_string(&resolution).map_err(serde_to_js_error)
    }
}

/// 未显式指定玩家牌组时，沿用进度中保存的自定义牌组。
fn with_saved_deck(mut setup: BattleSetup, progress: &InMemoryProgress) -> BattleSetup {
    if setup.player_deck.is_none() {
        setup.player_deck = progress.player_deck.clone();
    }
    setup
}

fn duration_from_ms(delta_ms: f64) -> Duration {
    if delta_ms.is_nan() || delta_ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(delta_ms / 1000.0).unwrap_or(Duration::MAX)
}

/// 返回目录中全部卡牌，按标识排序。
#[wasm_bindgen(js_name = "listCards")]
pub fn list_cards() -> Result<JsValue, JsValue> {
    let catalog = StandardCatalog::new();
    let cards: Vec<CardDescriptor> = catalog.cards().cloned().collect();
    to_value(&cards).map_err(JsValue::from)
}

/// 对给定手牌运行敌方决策，不修改任何状态。
#[wasm_bindgen(js_name = "chooseEnemyAction")]
pub fn choose_enemy_action(
    hand: JsValue,
    self_health_frac: f64,
    opponent_health: u32,
    persona: Option<String>,
) -> Result<JsValue, JsValue> {
    let hand: Vec<CardDescriptor> = from_value(hand).map_err(JsValue::from)?;
    let persona = persona
        .as_deref()
        .map(Persona::resolve)
        .unwrap_or_default();
    let decision = choose_action(&hand, self_health_frac, opponent_health, persona);
    to_value(&decision).map_err(JsValue::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_and_invalid_deltas_are_ignored() {
        assert_eq!(duration_from_ms(-5.0), Duration::ZERO);
        assert_eq!(duration_from_ms(f64::NAN), Duration::ZERO);
        assert_eq!(duration_from_ms(1500.0), Duration::from_millis(1500));
        assert_eq!(duration_from_ms(1e300), Duration::MAX);
        assert_eq!(duration_from_ms(f64::MAX), Duration::MAX);
        assert_eq!(duration_from_ms(f64::INFINITY), Duration::MAX);
        assert_eq!(duration_from_ms(f64::NEG_INFINITY), Duration::ZERO);
    }

    #[test]
    fn saved_deck_applies_only_without_explicit_deck() {
        let progress = InMemoryProgress {
            player_deck: Some(vec!["knife".into(), "med_patch".into()]),
            ..InMemoryProgress::default()
        };

        let setup = with_saved_deck(BattleSetup::default(), &progress);
        assert_eq!(setup.player_deck, progress.player_deck);

        let explicit = BattleSetup {
            player_deck: Some(vec!["energy_shield".into()]),
            ..BattleSetup::default()
        };
        let setup = with_saved_deck(explicit, &progress);
        assert_eq!(setup.player_deck, Some(vec!["energy_shield".to_string()]));

        let setup = with_saved_deck(BattleSetup::default(), &InMemoryProgress::default());
        assert!(setup.player_deck.is_none());
    }

    #[test]
    fn blank_json_uses_defaults() {
        let setup: BattleSetup = parse_optional(Some("  ".into())).expect("blank is default");
        assert_eq!(setup, BattleSetup::default());
        let config: CombatConfig =
            parse_optional(Some(r#"{"debug_mode":true}"#.into())).expect("partial config");
        assert!(config.debug_mode);
        assert_eq!(config.max_hand_size, 5);
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_MAX_HAND_SIZE: usize = 5;
const DEFAULT_PLAYER_HP: u32 = 20;
const DEFAULT_ENEMY_HP: u32 = 15;
const DEFAULT_BATTLE_ID: &str = "default";
const DEBUG_BATTLE_ID: &str = "debug";

/// 引擎的节奏与规则参数，所有字段都有默认值。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CombatConfig {
    pub max_hand_size: usize,
    pub player_opening_hand: usize,
    pub enemy_opening_hand: usize,
    pub enemy_think_ms: u64,
    pub card_transit_ms: u64,
    pub counter_transit_ms: u64,
    pub enemy_discard_ms: u64,
    pub reshuffle_ms: u64,
    pub debug_mode: bool,
}

impl CombatConfig {
    pub fn enemy_think(&self) -> Duration {
        Duration::from_millis(self.enemy_think_ms)
    }

    pub fn card_transit(&self) -> Duration {
        Duration::from_millis(self.card_transit_ms)
    }

    pub fn counter_transit(&self) -> Duration {
        Duration::from_millis(self.counter_transit_ms)
    }

    pub fn enemy_discard(&self) -> Duration {
        Duration::from_millis(self.enemy_discard_ms)
    }

    pub fn reshuffle(&self) -> Duration {
        Duration::from_millis(self.reshuffle_ms)
    }

    pub fn with_debug_mode(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    /// 调试模式下，默认战斗改记为 `"debug"`。
    pub fn resolve_battle_id(&self, battle_id: &str) -> String {
        if self.debug_mode && battle_id == DEFAULT_BATTLE_ID {
            DEBUG_BATTLE_ID.to_string()
        } else {
            battle_id.to_string()
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            max_hand_size: DEFAULT_MAX_HAND_SIZE,
            player_opening_hand: 0,
            enemy_opening_hand: DEFAULT_MAX_HAND_SIZE,
            enemy_think_ms: 1500,
            card_transit_ms: 200,
            counter_transit_ms: 200,
            enemy_discard_ms: 500,
            reshuffle_ms: 2000,
            debug_mode: false,
        }
    }
}

/// 单场战斗的参数。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BattleSetup {
    pub player_hp: u32,
    pub enemy_hp: u32,
    pub enemy_deck: String,
    pub battle_id: String,
    pub is_gatekeeper: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_deck: Option<Vec<String>>,
}

impl Default for BattleSetup {
    fn default() -> Self {
        Self {
            player_hp: DEFAULT_PLAYER_HP,
            enemy_hp: DEFAULT_ENEMY_HP,
            enemy_deck: "basic".to_string(),
            battle_id: DEFAULT_BATTLE_ID.to_string(),
            is_gatekeeper: false,
            persona: None,
            player_deck: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: CombatConfig =
            serde_json::from_str(r#"{"enemy_think_ms": 10}"#).expect("config should parse");
        assert_eq!(config.enemy_think(), Duration::from_millis(10));
        assert_eq!(config.max_hand_size, 5);
        assert_eq!(config.reshuffle(), Duration::from_secs(2));

        let setup: BattleSetup =
            serde_json::from_str(r#"{"enemy_deck": "chapter_boss"}"#).expect("setup should parse");
        assert_eq!(setup.enemy_hp, 15);
        assert_eq!(setup.player_hp, 20);
        assert_eq!(setup.enemy_deck, "chapter_boss");
    }

    #[test]
    fn debug_mode_renames_default_battle() {
        let config = CombatConfig::default();
        assert_eq!(config.resolve_battle_id("default"), "default");

        let config = config.with_debug_mode(true);
        assert_eq!(config.resolve_battle_id("default"), "debug");
        assert_eq!(config.resolve_battle_id("gatekeeper_1"), "gatekeeper_1");
    }
}

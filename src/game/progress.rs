use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::events::{CombatOutcome, CombatReport};

/// 长期进度的外部协作者；引擎只在战斗结束时通过显式句柄写入。
pub trait ProgressStore {
    fn record_attempt(&mut self, battle_id: &str);

    fn record_victory(&mut self, battle_id: &str);

    fn record(&mut self, report: &CombatReport) {
        self.record_attempt(&report.battle_id);
        if report.outcome == CombatOutcome::Victory {
            self.record_victory(&report.battle_id);
        }
    }
}

/// 内存中的进度记录，可序列化后由宿主自行持久化。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InMemoryProgress {
    pub battle_attempts: BTreeMap<String, u32>,
    pub completed_battles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_deck: Option<Vec<String>>,
}

impl InMemoryProgress {
    pub fn attempts(&self, battle_id: &str) -> u32 {
        self.battle_attempts.get(battle_id).copied().unwrap_or(0)
    }

    pub fn has_completed(&self, battle_id: &str) -> bool {
        self.completed_battles.iter().any(|id| id == battle_id)
    }
}

impl ProgressStore for InMemoryProgress {
    fn record_attempt(&mut self, battle_id: &str) {
        *self
            .battle_attempts
            .entry(battle_id.to_string())
            .or_insert(0) += 1;
    }

    fn record_victory(&mut self, battle_id: &str) {
        self.completed_battles.push(battle_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcome: CombatOutcome) -> CombatReport {
        CombatReport {
            battle_id: "intro".into(),
            outcome,
            round: 1,
            turn: 4,
        }
    }

    #[test]
    fn defeats_count_attempts_only() {
        let mut progress = InMemoryProgress::default();
        progress.record(&report(CombatOutcome::Defeat));
        progress.record(&report(CombatOutcome::Defeat));

        assert_eq!(progress.attempts("intro"), 2);
        assert!(!progress.has_completed("intro"));
    }

    #[test]
    fn victory_appends_to_completed_battles() {
        let mut progress = InMemoryProgress::default();
        progress.record(&report(CombatOutcome::Victory));
        progress.record(&report(CombatOutcome::Victory));

        assert_eq!(progress.attempts("intro"), 2);
        assert_eq!(progress.completed_battles, vec!["intro", "intro"]);
    }

    #[test]
    fn loads_from_partial_json() {
        let progress: InMemoryProgress =
            serde_json::from_str(r#"{"battle_attempts":{"boss":3}}"#).expect("progress parses");
        assert_eq!(progress.attempts("boss"), 3);
        assert!(progress.completed_battles.is_empty());
    }
}

use serde::Serialize;

use super::card::CardDescriptor;
use super::combat::CombatEngine;
use super::combatant::Combatant;
use super::phase::{CombatPhase, PhaseKind, StagedCard, Transit};
use crate::ai::Persona;

/// 单方的只读视图。牌库与弃牌堆只暴露数量。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CombatantView {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub hand: Vec<CardDescriptor>,
    pub deck_count: usize,
    pub discard_count: usize,
}

impl From<&Combatant> for CombatantView {
    fn from(combatant: &Combatant) -> Self {
        Self {
            name: combatant.name.clone(),
            health: combatant.health,
            max_health: combatant.max_health,
            hand: combatant.hand.clone(),
            deck_count: combatant.deck_len(),
            discard_count: combatant.discard_len(),
        }
    }
}

/// 表现层每帧读取的完整战斗快照。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CombatSnapshot {
    pub battle_id: String,
    pub phase: PhaseKind,
    pub turn: u32,
    pub round: u32,
    pub persona: Persona,
    pub last_stand_active: bool,
    pub max_hand_size: usize,
    pub player: CombatantView,
    pub enemy: CombatantView,
    pub staged: Option<StagedCard>,
    pub counter: Option<StagedCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transit: Option<Transit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enemy_discarding: Option<CardDescriptor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub discard_selection: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_progress: Option<f32>,
}

impl CombatEngine {
    pub fn snapshot(&self) -> CombatSnapshot {
        let phase = self.phase();
        let transit = match phase {
            CombatPhase::PlayerCardStaging { transit, .. } => Some(*transit),
            _ => None,
        };

        CombatSnapshot {
            battle_id: self.battle_id().to_string(),
            phase: self.phase_kind(),
            turn: self.turn(),
            round: self.round(),
            persona: self.persona(),
            last_stand_active: self.last_stand_active(),
            max_hand_size: self.config().max_hand_size,
            player: self.player().into(),
            enemy: self.enemy().into(),
            staged: self.staged_card().cloned(),
            counter: self.counter_card().cloned(),
            transit,
            enemy_discarding: phase.discarding().cloned(),
            discard_selection: self
                .discard_selection()
                .map(|selected| selected.iter().copied().collect())
                .unwrap_or_default(),
            timer_progress: self.timer_progress(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CombatConfig, Intent, Side};

    #[test]
    fn snapshot_reflects_staged_card() {
        let config = CombatConfig {
            enemy_opening_hand: 0,
            ..CombatConfig::default()
        };
        let mut engine = CombatEngine::seeded(
            Combatant::new("Player", 20).with_hand(vec![
                CardDescriptor::attack("knife", "Knife", 1),
                CardDescriptor::heal("med_patch", "Med Patch", 2),
            ]),
            Combatant::new("Enemy", 15),
            Persona::Timid,
            config,
            3,
        );
        engine.submit_intent(Intent::PlayCard { index: 0 });

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.phase, PhaseKind::PlayerCardStaging);
        assert_eq!(snapshot.transit, Some(Transit::ToStaging));
        assert_eq!(snapshot.player.hand.len(), 1);
        assert_eq!(snapshot.timer_progress, Some(0.0));
        let staged = snapshot.staged.as_ref().expect("card should be staged");
        assert_eq!(staged.owner, Side::Player);
        assert_eq!(staged.card.id, "knife");

        let json = serde_json::to_value(&snapshot).expect("snapshot serializes");
        assert_eq!(json["phase"], "PlayerCardStaging");
        assert_eq!(json["persona"], "timid");
        assert!(json.get("discard_selection").is_none());
    }
}

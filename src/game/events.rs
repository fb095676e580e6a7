use serde::{Deserialize, Serialize};

use super::card::CardId;
use super::phase::Side;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CombatOutcome {
    Victory,
    Defeat,
}

/// 一场战斗结束后交给进度存储的记录。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CombatReport {
    pub battle_id: String,
    pub outcome: CombatOutcome,
    pub round: u32,
    pub turn: u32,
}

/// 状态机每次推进产生的事件流，表现层据此驱动动画。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum CombatEvent {
    CardDrawn {
        side: Side,
        card_id: CardId,
    },
    DeckExhausted {
        side: Side,
    },
    CardStaged {
        side: Side,
        card_id: CardId,
        hand_index: usize,
    },
    CardReturned {
        side: Side,
        card_id: CardId,
        hand_index: usize,
    },
    CounterWindowOpened,
    CounterPlayed {
        card_id: CardId,
        hand_index: usize,
    },
    DamageDealt {
        source: Side,
        target: Side,
        amount: u32,
        blocked: u32,
    },
    Healed {
        side: Side,
        amount: u32,
    },
    CardsDiscarded {
        side: Side,
        card_ids: Vec<CardId>,
    },
    EnemyDiscarded {
        card_id: CardId,
    },
    ReshuffleStarted {
        target: Side,
    },
    Reshuffled {
        target: Side,
        deck_size: usize,
    },
    LastStandEntered,
    LastStandCleared,
    EnemyTurnStarted,
    TurnStarted {
        turn: u32,
    },
    CombatEnded {
        outcome: CombatOutcome,
        battle_id: String,
    },
    SessionReset {
        round: u32,
    },
}

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::card::CardDescriptor;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// 限时阶段的计时器，进入阶段时从 0 开始。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseTimer {
    elapsed: Duration,
    duration: Duration,
}

impl PhaseTimer {
    pub fn start(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// 推进计时器，返回是否已到期。
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.is_elapsed()
    }

    pub fn is_elapsed(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// 动画进度 `[0, 1]`，仅供表现层使用。
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

/// 离开手牌、等待结算的牌，由状态机独占持有。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StagedCard {
    pub card: CardDescriptor,
    pub owner: Side,
    pub hand_index: usize,
}

impl StagedCard {
    pub fn new(card: CardDescriptor, owner: Side, hand_index: usize) -> Self {
        Self {
            card,
            owner,
            hand_index,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Transit {
    ToStaging,
    ReturnToHand,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    PlayerTurn,
    PlayerDiscarding,
    PlayerCardStaging,
    EnemyThinking,
    EnemyCardStaging,
    EnemyDiscarding,
    WaitingForCounter,
    CounterStaging,
    WaitingForResolve,
    ResolveWithCounter,
    Reshuffling,
    Victory,
    Defeat,
}

impl PhaseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseKind::PlayerTurn => "player_turn",
            PhaseKind::PlayerDiscarding => "player_discarding",
            PhaseKind::PlayerCardStaging => "player_card_staging",
            PhaseKind::EnemyThinking => "enemy_thinking",
            PhaseKind::EnemyCardStaging => "enemy_card_staging",
            PhaseKind::EnemyDiscarding => "enemy_discarding",
            PhaseKind::WaitingForCounter => "waiting_for_counter",
            PhaseKind::CounterStaging => "counter_staging",
            PhaseKind::WaitingForResolve => "waiting_for_resolve",
            PhaseKind::ResolveWithCounter => "resolve_with_counter",
            PhaseKind::Reshuffling => "reshuffling",
            PhaseKind::Victory => "victory",
            PhaseKind::Defeat => "defeat",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 战斗阶段。每个阶段只携带它合法拥有的数据，
/// 例如只有反击相关阶段才可能持有反击牌。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CombatPhase {
    #[default]
    PlayerTurn,
    PlayerDiscarding {
        selected: BTreeSet<usize>,
    },
    PlayerCardStaging {
        timer: PhaseTimer,
        staged: StagedCard,
        transit: Transit,
    },
    EnemyThinking {
        timer: PhaseTimer,
    },
    EnemyCardStaging {
        timer: PhaseTimer,
        staged: StagedCard,
    },
    EnemyDiscarding {
        timer: PhaseTimer,
        card: CardDescriptor,
    },
    WaitingForCounter {
        staged: StagedCard,
    },
    CounterStaging {
        timer: PhaseTimer,
        staged: StagedCard,
        counter: StagedCard,
    },
    WaitingForResolve {
        staged: StagedCard,
    },
    ResolveWithCounter {
        staged: StagedCard,
        counter: StagedCard,
    },
    Reshuffling {
        timer: PhaseTimer,
        target: Side,
        owner: Side,
    },
    Victory,
    Defeat,
}

impl CombatPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            CombatPhase::PlayerTurn => PhaseKind::PlayerTurn,
            CombatPhase::PlayerDiscarding { .. } => PhaseKind::PlayerDiscarding,
            CombatPhase::PlayerCardStaging { .. } => PhaseKind::PlayerCardStaging,
            CombatPhase::EnemyThinking { .. } => PhaseKind::EnemyThinking,
            CombatPhase::EnemyCardStaging { .. } => PhaseKind::EnemyCardStaging,
            CombatPhase::EnemyDiscarding { .. } => PhaseKind::EnemyDiscarding,
            CombatPhase::WaitingForCounter { .. } => PhaseKind::WaitingForCounter,
            CombatPhase::CounterStaging { .. } => PhaseKind::CounterStaging,
            CombatPhase::WaitingForResolve { .. } => PhaseKind::WaitingForResolve,
            CombatPhase::ResolveWithCounter { .. } => PhaseKind::ResolveWithCounter,
            CombatPhase::Reshuffling { .. } => PhaseKind::Reshuffling,
            CombatPhase::Victory => PhaseKind::Victory,
            CombatPhase::Defeat => PhaseKind::Defeat,
        }
    }

    pub fn timer(&self) -> Option<&PhaseTimer> {
        match self {
            CombatPhase::PlayerCardStaging { timer, .. }
            | CombatPhase::EnemyThinking { timer }
            | CombatPhase::EnemyCardStaging { timer, .. }
            | CombatPhase::EnemyDiscarding { timer, .. }
            | CombatPhase::CounterStaging { timer, .. }
            | CombatPhase::Reshuffling { timer, .. } => Some(timer),
            _ => None,
        }
    }

    pub fn timer_mut(&mut self) -> Option<&mut PhaseTimer> {
        match self {
            CombatPhase::PlayerCardStaging { timer, .. }
            | CombatPhase::EnemyThinking { timer }
            | CombatPhase::EnemyCardStaging { timer, .. }
            | CombatPhase::EnemyDiscarding { timer, .. }
            | CombatPhase::CounterStaging { timer, .. }
            | CombatPhase::Reshuffling { timer, .. } => Some(timer),
            _ => None,
        }
    }

    pub fn staged(&self) -> Option<&StagedCard> {
        match self {
            CombatPhase::PlayerCardStaging { staged, .. }
            | CombatPhase::EnemyCardStaging { staged, .. }
            | CombatPhase::WaitingForCounter { staged }
            | CombatPhase::CounterStaging { staged, .. }
            | CombatPhase::WaitingForResolve { staged }
            | CombatPhase::ResolveWithCounter { staged, .. } => Some(staged),
            _ => None,
        }
    }

    pub fn counter(&self) -> Option<&StagedCard> {
        match self {
            CombatPhase::CounterStaging { counter, .. }
            | CombatPhase::ResolveWithCounter { counter, .. } => Some(counter),
            _ => None,
        }
    }

    /// 正在飞向敌方弃牌堆的牌（不参与结算）。
    pub fn discarding(&self) -> Option<&CardDescriptor> {
        match self {
            CombatPhase::EnemyDiscarding { card, .. } => Some(card),
            _ => None,
        }
    }

    /// 某一方当前不在手牌/牌库/弃牌堆中的牌数。
    pub fn cards_in_flight(&self, side: Side) -> usize {
        let staged = self.staged().filter(|s| s.owner == side).is_some();
        let counter = self.counter().filter(|c| c.owner == side).is_some();
        let discarding = side == Side::Enemy && self.discarding().is_some();
        usize::from(staged) + usize::from(counter) + usize::from(discarding)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CombatPhase::Victory | CombatPhase::Defeat)
    }
}

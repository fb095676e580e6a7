use serde::{Deserialize, Serialize};

use super::card::CardKind;
use super::phase::PhaseKind;

/// 来自表现层的玩家意图。意图只是建议，是否生效由当前阶段决定。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Intent {
    PlayCard { index: usize },
    Draw,
    Pass,
    BeginDiscardSelect,
    ToggleDiscard { index: usize },
    ConfirmDiscard,
    CancelDiscard,
    ResolveStaged,
    CancelStaged,
    PlayDefense { index: usize },
    SkipCounter,
    DebugForceWin,
    DebugForceLose,
    ContinueAfterCombat,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::PlayCard { .. } => "play_card",
            Intent::Draw => "draw",
            Intent::Pass => "pass",
            Intent::BeginDiscardSelect => "begin_discard_select",
            Intent::ToggleDiscard { .. } => "toggle_discard",
            Intent::ConfirmDiscard => "confirm_discard",
            Intent::CancelDiscard => "cancel_discard",
            Intent::ResolveStaged => "resolve_staged",
            Intent::CancelStaged => "cancel_staged",
            Intent::PlayDefense { .. } => "play_defense",
            Intent::SkipCounter => "skip_counter",
            Intent::DebugForceWin => "debug_force_win",
            Intent::DebugForceLose => "debug_force_lose",
            Intent::ContinueAfterCombat => "continue_after_combat",
        }
    }
}

/// 意图被拒绝的原因。被拒绝的意图不会修改任何状态。
#[derive(Debug, Clone, Serialize, PartialEq, Eq, thiserror::Error)]
#[serde(tag = "type")]
pub enum IntentError {
    #[error("{intent} is not accepted during {phase}")]
    WrongPhase {
        intent: &'static str,
        phase: PhaseKind,
    },
    #[error("hand already holds {limit} cards")]
    HandFull { limit: usize },
    #[error("only heal cards may be played during a last stand")]
    LastStandRestricted,
    #[error("no card at hand index {index}")]
    NoSuchCard { index: usize },
    #[error("card at index {index} is a {kind:?} card and cannot be played")]
    NotPlayable { index: usize, kind: CardKind },
    #[error("card at index {index} is a {kind:?} card, not a defense card")]
    NotDefense { index: usize, kind: CardKind },
    #[error("no cards are selected for discard")]
    NothingSelected,
    #[error("only the player's own uncountered card can be cancelled")]
    NotCancellable,
    #[error("debug intents require debug mode")]
    DebugDisabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_round_trip_through_tagged_json() {
        let intent: Intent =
            serde_json::from_str(r#"{"type":"PlayCard","index":2}"#).expect("intent should parse");
        assert_eq!(intent, Intent::PlayCard { index: 2 });

        let intent: Intent =
            serde_json::from_str(r#"{"type":"SkipCounter"}"#).expect("unit intent should parse");
        assert_eq!(intent, Intent::SkipCounter);
    }

    #[test]
    fn errors_describe_the_refusal() {
        let error = IntentError::WrongPhase {
            intent: Intent::ResolveStaged.name(),
            phase: PhaseKind::PlayerTurn,
        };
        assert_eq!(
            error.to_string(),
            "resolve_staged is not accepted during player_turn"
        );
        let json = serde_json::to_string(&error).expect("error should serialize");
        assert!(json.contains(r#""type":"WrongPhase""#));
    }
}

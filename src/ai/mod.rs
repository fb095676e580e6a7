//! 敌方 AI（基于效用打分的出牌策略）。

pub mod utility;

pub use utility::{choose_action, score_card, AiDecision, Persona, LETHAL_BONUS};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::{CardDescriptor, CardEffect};

/// 致命一击的额外分，保证斩杀牌一定被选中。
pub const LETHAL_BONUS: f64 = 100.0;

const PANIC_THRESHOLD: f64 = 0.3;
const HURT_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Aggressive,
    Timid,
    #[default]
    Balanced,
}

impl Persona {
    /// 解析人格名称，无法识别时回退到 `Balanced`。
    pub fn resolve(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!("unknown persona {name:?}, falling back to balanced");
            Persona::Balanced
        })
    }

    pub fn attack_multiplier(self) -> f64 {
        match self {
            Persona::Aggressive => 1.5,
            Persona::Timid => 0.8,
            Persona::Balanced => 1.0,
        }
    }

    pub fn heal_multiplier(self) -> f64 {
        match self {
            Persona::Aggressive => 0.8,
            Persona::Timid => 1.5,
            Persona::Balanced => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Persona::Aggressive => "aggressive",
            Persona::Timid => "timid",
            Persona::Balanced => "balanced",
        }
    }
}

impl FromStr for Persona {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aggressive" | "aggro" => Ok(Persona::Aggressive),
            "timid" | "cautious" => Ok(Persona::Timid),
            "balanced" => Ok(Persona::Balanced),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 敌方回合的决策结果。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum AiDecision {
    PlayCard { index: usize, score: f64 },
    /// 没有值得打出的牌：弃掉最早持有的一张（下标 0）以循环牌库。
    DiscardFallback,
}

/// 对单张牌打分；防御牌不参与主动出牌，返回 `None`。
pub fn score_card(
    card: &CardDescriptor,
    self_health_frac: f64,
    opponent_health: u32,
    persona: Persona,
) -> Option<f64> {
    match card.effect {
        CardEffect::Attack { damage } => {
            let mut score = f64::from(damage) * persona.attack_multiplier();
            if opponent_health <= damage {
                score += LETHAL_BONUS;
            }
            Some(score)
        }
        CardEffect::Heal { amount } => {
            let amount = f64::from(amount);
            let base = if self_health_frac >= 1.0 {
                0.0
            } else if self_health_frac < PANIC_THRESHOLD {
                amount * 3.0
            } else if self_health_frac < HURT_THRESHOLD {
                amount * 1.5
            } else {
                amount * 0.5
            };
            Some(base * persona.heal_multiplier())
        }
        CardEffect::Defense { .. } => None,
    }
}

/// 选出得分最高的牌（同分取下标最小者）；最高分不大于 0 或手牌为空时回退为弃牌。
pub fn choose_action(
    hand: &[CardDescriptor],
    self_health_frac: f64,
    opponent_health: u32,
    persona: Persona,
) -> AiDecision {
    let mut best: Option<(usize, f64)> = None;

    for (index, card) in hand.iter().enumerate() {
        let Some(score) = score_card(card, self_health_frac, opponent_health, persona) else {
            continue;
        };
        tracing::debug!(index, card = %card.id, score, "scored enemy candidate");
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    match best {
        Some((index, score)) if score > 0.0 => AiDecision::PlayCard { index, score },
        _ => AiDecision::DiscardFallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn attack(damage: u32) -> CardDescriptor {
        CardDescriptor::attack("attack", "Attack", damage)
    }

    fn heal(amount: u32) -> CardDescriptor {
        CardDescriptor::heal("heal", "Heal", amount)
    }

    fn shield() -> CardDescriptor {
        CardDescriptor::defense("energy_shield", "Energy Shield", 2)
    }

    #[rstest]
    #[case(Persona::Aggressive, 3.0)]
    #[case(Persona::Timid, 1.6)]
    #[case(Persona::Balanced, 2.0)]
    fn attack_score_scales_with_persona(#[case] persona: Persona, #[case] expected: f64) {
        let score = score_card(&attack(2), 1.0, 20, persona).expect("attacks are scored");
        assert!((score - expected).abs() < 1e-9, "got {score}");
    }

    #[rstest]
    #[case(1.0, 0.0)]
    #[case(0.2, 9.0)]
    #[case(0.3, 4.5)]
    #[case(0.69, 4.5)]
    #[case(0.7, 1.5)]
    #[case(0.9, 1.5)]
    fn heal_score_follows_health_bands(#[case] fraction: f64, #[case] expected: f64) {
        let score =
            score_card(&heal(3), fraction, 20, Persona::Balanced).expect("heals are scored");
        assert!((score - expected).abs() < 1e-9, "fraction {fraction} got {score}");
    }

    #[test]
    fn timid_enemy_values_healing_more() {
        let timid = score_card(&heal(2), 0.5, 20, Persona::Timid).expect("scored");
        let aggressive = score_card(&heal(2), 0.5, 20, Persona::Aggressive).expect("scored");
        assert!((timid - 4.5).abs() < 1e-9);
        assert!((aggressive - 2.4).abs() < 1e-9);
    }

    #[test]
    fn defense_cards_are_never_candidates() {
        assert_eq!(score_card(&shield(), 0.5, 10, Persona::Balanced), None);
        let decision = choose_action(&[shield(), shield()], 0.5, 10, Persona::Balanced);
        assert_eq!(decision, AiDecision::DiscardFallback);
    }

    #[test]
    fn aggressive_enemy_prefers_attack_at_high_health() {
        let hand = vec![attack(2), heal(3)];
        let decision = choose_action(&hand, 0.9, 20, Persona::Aggressive);
        assert_eq!(decision, AiDecision::PlayCard { index: 0, score: 3.0 });
    }

    #[rstest]
    #[case(Persona::Aggressive)]
    #[case(Persona::Timid)]
    #[case(Persona::Balanced)]
    fn lethal_attack_wins_regardless_of_persona(#[case] persona: Persona) {
        let hand = vec![heal(10), attack(5), attack(1)];
        let decision = choose_action(&hand, 0.1, 1, persona);
        match decision {
            AiDecision::PlayCard { index, .. } => assert_eq!(index, 1, "first lethal card wins"),
            other => panic!("expected a play, got {other:?}"),
        }
    }

    #[test]
    fn ties_keep_lowest_index() {
        let hand = vec![shield(), attack(2), attack(2)];
        let decision = choose_action(&hand, 1.0, 20, Persona::Balanced);
        assert_eq!(decision, AiDecision::PlayCard { index: 1, score: 2.0 });
    }

    #[test]
    fn useless_hand_falls_back_to_discard() {
        assert_eq!(
            choose_action(&[heal(2)], 1.0, 20, Persona::Timid),
            AiDecision::DiscardFallback
        );
        assert_eq!(
            choose_action(&[], 0.5, 20, Persona::Balanced),
            AiDecision::DiscardFallback
        );
        assert_eq!(
            choose_action(&[attack(0)], 1.0, 20, Persona::Balanced),
            AiDecision::DiscardFallback,
            "zero-damage attacks score nothing"
        );
    }

    #[rstest]
    #[case("Aggressive", Persona::Aggressive)]
    #[case("aggro", Persona::Aggressive)]
    #[case("TIMID", Persona::Timid)]
    #[case("balanced", Persona::Balanced)]
    #[case("berserker", Persona::Balanced)]
    fn persona_names_resolve_with_default(#[case] name: &str, #[case] expected: Persona) {
        assert_eq!(Persona::resolve(name), expected);
    }
}

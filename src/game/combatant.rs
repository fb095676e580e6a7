use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::card::{CardDescriptor, CardKind};

/// 战斗中一方的状态：生命值、手牌、牌库与弃牌堆。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Combatant {
    pub name: String,
    pub max_health: u32,
    pub health: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hand: Vec<CardDescriptor>,
    #[serde(default, skip_serializing_if = "VecDeque::is_empty")]
    pub deck: VecDeque<CardDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discard_pile: Vec<CardDescriptor>,
}

impl Combatant {
    pub fn new(name: impl Into<String>, max_health: u32) -> Self {
        Self {
            name: name.into(),
            max_health,
            health: max_health,
            hand: Vec::new(),
            deck: VecDeque::new(),
            discard_pile: Vec::new(),
        }
    }

    pub fn with_deck(mut self, cards: impl IntoIterator<Item = CardDescriptor>) -> Self {
        self.deck = cards.into_iter().collect();
        self
    }

    pub fn with_hand(mut self, cards: impl IntoIterator<Item = CardDescriptor>) -> Self {
        self.hand = cards.into_iter().collect();
        self
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health.min(self.max_health);
        self
    }

    /// 扣除生命值，返回实际扣除量（不会低于 0）。
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.health);
        self.health -= actual;
        actual
    }

    /// 恢复生命值，返回实际恢复量（不会超过上限）。
    pub fn heal(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.max_health - self.health);
        self.health += actual;
        actual
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    pub fn restore_health(&mut self) {
        self.health = self.max_health;
    }

    pub fn health_fraction(&self) -> f64 {
        if self.max_health == 0 {
            return 0.0;
        }
        f64::from(self.health) / f64::from(self.max_health)
    }

    /// 从牌库顶抽一张牌放到手牌末尾；牌库为空时返回 `None`。
    pub fn draw_card(&mut self) -> Option<&CardDescriptor> {
        let card = self.deck.pop_front()?;
        self.hand.push(card);
        self.hand.last()
    }

    /// 抽牌直到手牌达到 `limit` 或牌库耗尽，返回抽到的数量。
    pub fn refill_hand(&mut self, limit: usize) -> usize {
        let mut drawn = 0;
        while self.hand.len() < limit {
            if self.draw_card().is_none() {
                break;
            }
            drawn += 1;
        }
        drawn
    }

    pub fn shuffle_deck<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.deck.make_contiguous().shuffle(rng);
    }

    /// 手牌与弃牌堆依次放回牌库（不洗牌）。
    pub fn reset_deck(&mut self) {
        self.deck.extend(self.hand.drain(..));
        self.deck.extend(self.discard_pile.drain(..));
    }

    /// 弃牌堆整体成为新牌库并洗牌，返回新牌库的大小。
    pub fn recycle_discard_pile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        self.deck.extend(self.discard_pile.drain(..));
        self.shuffle_deck(rng);
        self.deck.len()
    }

    pub fn needs_reshuffle(&self) -> bool {
        self.hand.is_empty() && self.deck.is_empty() && !self.discard_pile.is_empty()
    }

    pub fn take_from_hand(&mut self, index: usize) -> Option<CardDescriptor> {
        if index < self.hand.len() {
            Some(self.hand.remove(index))
        } else {
            None
        }
    }

    /// 把牌插回手牌的原位置；位置越界时放到末尾。
    pub fn return_to_hand(&mut self, index: usize, card: CardDescriptor) -> usize {
        let index = index.min(self.hand.len());
        self.hand.insert(index, card);
        index
    }

    pub fn discard(&mut self, card: CardDescriptor) {
        self.discard_pile.push(card);
    }

    pub fn holds_kind(&self, kind: CardKind) -> bool {
        self.hand.iter().any(|card| card.is_kind(kind))
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard_pile.len()
    }

    /// 手牌、牌库与弃牌堆中的总牌数。
    pub fn card_count(&self) -> usize {
        self.hand.len() + self.deck.len() + self.discard_pile.len()
    }
}

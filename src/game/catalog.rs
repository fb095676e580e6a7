use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::card::{CardDescriptor, CardId};
use crate::ai::Persona;

pub const KINETIC_BATTLE_RIFLE: &str = "kinetic_battle_rifle";
pub const KINETIC_SIDEARM: &str = "kinetic_sidearm";
pub const KNIFE: &str = "knife";
pub const MED_PATCH: &str = "med_patch";
pub const ENERGY_SHIELD: &str = "energy_shield";

/// 卡牌目录：按标识提供不可变的卡牌数据。
pub trait CardCatalog {
    fn lookup(&self, card_id: &str) -> Option<CardDescriptor>;

    fn list_ids(&self) -> Vec<&str>;

    /// 按顺序实例化一组卡牌，跳过目录中不存在的标识。
    fn instantiate<'a, I>(&self, card_ids: I) -> Vec<CardDescriptor>
    where
        I: IntoIterator<Item = &'a str>,
        Self: Sized,
    {
        card_ids
            .into_iter()
            .filter_map(|card_id| {
                let card = self.lookup(card_id);
                if card.is_none() {
                    tracing::warn!("card id {card_id:?} is not in the catalog, skipping");
                }
                card
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct StandardCatalog {
    cards: BTreeMap<CardId, CardDescriptor>,
}

impl StandardCatalog {
    pub fn new() -> Self {
        let cards = [
            CardDescriptor::attack(KINETIC_BATTLE_RIFLE, "Kinetic Battle Rifle", 3),
            CardDescriptor::attack(KINETIC_SIDEARM, "Kinetic Sidearm", 2),
            CardDescriptor::attack(KNIFE, "Knife", 1),
            CardDescriptor::heal(MED_PATCH, "Med Patch", 2),
            CardDescriptor::defense(ENERGY_SHIELD, "Energy Shield", 2),
        ];
        Self {
            cards: cards
                .into_iter()
                .map(|card| (card.id.clone(), card))
                .collect(),
        }
    }

    pub fn register(&mut self, card: CardDescriptor) -> Option<CardDescriptor> {
        self.cards.insert(card.id.clone(), card)
    }

    pub fn cards(&self) -> impl Iterator<Item = &CardDescriptor> {
        self.cards.values()
    }
}

impl Default for StandardCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CardCatalog for StandardCatalog {
    fn lookup(&self, card_id: &str) -> Option<CardDescriptor> {
        self.cards.get(card_id).cloned()
    }

    fn list_ids(&self) -> Vec<&str> {
        self.cards.keys().map(String::as_str).collect()
    }
}

/// 牌组配方：有序、可重复的卡牌标识列表，以及敌方使用时的人格。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckRecipe {
    pub key: String,
    pub cards: Vec<CardId>,
    #[serde(default)]
    pub persona: Persona,
}

impl DeckRecipe {
    pub fn new(key: impl Into<String>, counts: &[(&str, usize)], persona: Persona) -> Self {
        let cards = counts
            .iter()
            .flat_map(|(card_id, count)| std::iter::repeat(card_id.to_string()).take(*count))
            .collect();
        Self {
            key: key.into(),
            cards,
            persona,
        }
    }

    pub fn build<C: CardCatalog>(&self, catalog: &C) -> Vec<CardDescriptor> {
        catalog.instantiate(self.cards.iter().map(String::as_str))
    }
}

pub trait DeckRecipes {
    /// 玩家默认牌组。
    fn starter(&self) -> DeckRecipe;

    /// 敌方牌组；未知标识必须回退到默认配方。
    fn enemy(&self, key: &str) -> DeckRecipe;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDecks;

impl StandardDecks {
    pub const FALLBACK_KEY: &'static str = "intro_enemy";

    fn intro_enemy() -> DeckRecipe {
        DeckRecipe::new(
            "intro_enemy",
            &[(KNIFE, 6), (KINETIC_SIDEARM, 4), (KINETIC_BATTLE_RIFLE, 2)],
            Persona::Balanced,
        )
    }
}

impl DeckRecipes for StandardDecks {
    fn starter(&self) -> DeckRecipe {
        DeckRecipe::new(
            "starter",
            &[
                (KINETIC_SIDEARM, 5),
                (KNIFE, 5),
                (KINETIC_BATTLE_RIFLE, 2),
                (MED_PATCH, 2),
                (ENERGY_SHIELD, 2),
            ],
            Persona::Balanced,
        )
    }

    fn enemy(&self, key: &str) -> DeckRecipe {
        match key {
            "intro_enemy" | "basic" => Self::intro_enemy(),
            "chapter_boss" => DeckRecipe::new(
                "chapter_boss",
                &[(KNIFE, 3), (KINETIC_SIDEARM, 5), (KINETIC_BATTLE_RIFLE, 4)],
                Persona::Aggressive,
            ),
            "grinder_enemy" => DeckRecipe::new(
                "grinder_enemy",
                &[
                    (KNIFE, 5),
                    (KINETIC_SIDEARM, 5),
                    (KINETIC_BATTLE_RIFLE, 2),
                    (MED_PATCH, 2),
                ],
                Persona::Balanced,
            ),
            "test_small" => {
                DeckRecipe::new("test_small", &[(KINETIC_SIDEARM, 5)], Persona::Balanced)
            }
            other => {
                tracing::warn!(
                    "unknown enemy deck {other:?}, using {}",
                    Self::FALLBACK_KEY
                );
                Self::intro_enemy()
            }
        }
    }
}

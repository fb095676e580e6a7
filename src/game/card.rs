use serde::{Deserialize, Serialize};

/// 卡牌目录中的唯一标识（如 `"knife"`）。
pub type CardId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Attack,
    Defense,
    Heal,
}

/// 卡牌的结算效果，数值只存在于对应的类型上。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CardEffect {
    Attack { damage: u32 },
    Defense { defense: u32 },
    Heal { amount: u32 },
}

impl CardEffect {
    pub fn kind(&self) -> CardKind {
        match self {
            CardEffect::Attack { .. } => CardKind::Attack,
            CardEffect::Defense { .. } => CardKind::Defense,
            CardEffect::Heal { .. } => CardKind::Heal,
        }
    }
}

/// 不可变的卡牌数据，按值复制进手牌与牌库。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardDescriptor {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub effect: CardEffect,
}

impl CardDescriptor {
    pub fn new(
        id: impl Into<CardId>,
        name: impl Into<String>,
        description: impl Into<String>,
        effect: CardEffect,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            effect,
        }
    }

    pub fn attack(id: impl Into<CardId>, name: impl Into<String>, damage: u32) -> Self {
        Self::new(
            id,
            name,
            format!("Deal {damage} damage"),
            CardEffect::Attack { damage },
        )
    }

    pub fn defense(id: impl Into<CardId>, name: impl Into<String>, defense: u32) -> Self {
        Self::new(
            id,
            name,
            format!("Block {defense} incoming damage"),
            CardEffect::Defense { defense },
        )
    }

    pub fn heal(id: impl Into<CardId>, name: impl Into<String>, amount: u32) -> Self {
        Self::new(
            id,
            name,
            format!("Restores {amount} HP"),
            CardEffect::Heal { amount },
        )
    }

    pub fn kind(&self) -> CardKind {
        self.effect.kind()
    }

    pub fn is_kind(&self, kind: CardKind) -> bool {
        self.kind() == kind
    }

    pub fn attack_damage(&self) -> Option<u32> {
        match self.effect {
            CardEffect::Attack { damage } => Some(damage),
            _ => None,
        }
    }

    pub fn defense_value(&self) -> Option<u32> {
        match self.effect {
            CardEffect::Defense { defense } => Some(defense),
            _ => None,
        }
    }

    pub fn heal_amount(&self) -> Option<u32> {
        match self.effect {
            CardEffect::Heal { amount } => Some(amount),
            _ => None,
        }
    }
}

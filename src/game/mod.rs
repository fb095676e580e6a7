//! 战斗核心逻辑（卡牌、参战方、阶段状态机、进度记录）。

pub mod card;
pub mod catalog;
pub mod combat;
pub mod combatant;
pub mod config;
pub mod events;
pub mod intent;
pub mod phase;
pub mod progress;
pub mod snapshot;

pub use card::{CardDescriptor, CardEffect, CardId, CardKind};
pub use catalog::{CardCatalog, DeckRecipe, DeckRecipes, StandardCatalog, StandardDecks};
pub use combat::CombatEngine;
pub use combatant::Combatant;
pub use config::{BattleSetup, CombatConfig};
pub use events::{CombatEvent, CombatOutcome, CombatReport};
pub use intent::{Intent, IntentError};
pub use phase::{CombatPhase, PhaseKind, PhaseTimer, Side, StagedCard, Transit};
pub use progress::{InMemoryProgress, ProgressStore};
pub use snapshot::{CombatSnapshot, CombatantView};

//! Quest Definition Structures
//!
//! Quests and the chains that own them. Field names on the wire match the
//! persisted `questChains` record.

use serde::{Deserialize, Serialize};

/// Title given to chains created through `add_quest_chain`
pub const NEW_CHAIN_TITLE: &str = "New Quest Chain";
/// Name given to quests created through `add_quest` / `add_quest_chain`
pub const NEW_QUEST_NAME: &str = "New Quest";
/// Bonus text given to chains created through `add_quest_chain`
pub const NEW_CHAIN_BONUS: &str = "New bonus";

/// A single checkable task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    /// Cosmetic reward text, no mechanical effect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<String>,
}

impl Quest {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            completed: false,
            reward: None,
        }
    }

    pub fn with_reward(mut self, reward: &str) -> Self {
        self.reward = Some(reward.to_string());
        self
    }
}

/// An ordered, titled group of quests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestChain {
    pub id: u64,
    pub title: String,
    /// Display order is insertion order
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(
        rename = "chainBonus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub chain_bonus: Option<String>,
}

impl QuestChain {
    pub fn new(id: u64, title: &str, quests: Vec<Quest>) -> Self {
        Self {
            id,
            title: title.to_string(),
            quests,
            chain_bonus: None,
        }
    }

    pub fn with_bonus(mut self, bonus: &str) -> Self {
        self.chain_bonus = Some(bonus.to_string());
        self
    }

    /// Get a quest by ID
    pub fn get_quest(&self, quest_id: u64) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == quest_id)
    }

    /// Get a mutable quest by ID
    pub fn get_quest_mut(&mut self, quest_id: u64) -> Option<&mut Quest> {
        self.quests.iter_mut().find(|q| q.id == quest_id)
    }

    pub fn completed_count(&self) -> usize {
        self.quests.iter().filter(|q| q.completed).count()
    }

    /// True when every quest is checked off. An empty chain is never complete.
    pub fn is_complete(&self) -> bool {
        !self.quests.is_empty() && self.quests.iter().all(|q| q.completed)
    }
}

/// Chains used when no `questChains` record has been persisted yet
pub fn default_chains() -> Vec<QuestChain> {
    vec![
        QuestChain::new(
            1,
            "Morning Victory Chain",
            vec![
                Quest::new(1, "Fajr Prayer").with_reward("Fajr Blessing Buff"),
                Quest::new(2, "Morning Duas").with_reward("Dhikr Shield Buff"),
                Quest::new(3, "One Work Task").with_reward("Chain Completion Bonus"),
            ],
        )
        .with_bonus("+50 to all stats for the day"),
        QuestChain::new(
            2,
            "Daily Prayer Chain",
            vec![
                Quest::new(4, "Fajr"),
                Quest::new(5, "Zuhr"),
                Quest::new(6, "Asr"),
                Quest::new(7, "Maghrib"),
                Quest::new(8, "Isha"),
            ],
        )
        .with_bonus("Maximum MP boost for next day"),
    ]
}

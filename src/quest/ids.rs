//! Monotonic id allocation for chains and quests.

use super::definition::QuestChain;

/// Hands out chain and quest ids that never repeat for the lifetime of the store.
///
/// A counter that has run past `u64::MAX` is exhausted and yields `None`
/// rather than wrapping onto an id already in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    next_chain_id: Option<u64>,
    next_quest_id: Option<u64>,
}

impl IdGenerator {
    /// Seed the counters one past the largest ids already in use
    pub fn seeded_from(chains: &[QuestChain]) -> Self {
        let max_chain = chains.iter().map(|c| c.id).max().unwrap_or(0);
        let max_quest = chains
            .iter()
            .flat_map(|c| c.quests.iter())
            .map(|q| q.id)
            .max()
            .unwrap_or(0);

        Self {
            next_chain_id: max_chain.checked_add(1),
            next_quest_id: max_quest.checked_add(1),
        }
    }

    pub fn next_chain_id(&mut self) -> Option<u64> {
        let id = self.next_chain_id?;
        self.next_chain_id = id.checked_add(1);
        Some(id)
    }

    pub fn next_quest_id(&mut self) -> Option<u64> {
        let id = self.next_quest_id?;
        self.next_quest_id = id.checked_add(1);
        Some(id)
    }
}

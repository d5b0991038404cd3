//! Quest State Tracking
//!
//! Character stats, the root state they live in, and the pure mutations the
//! store applies to it.

use serde::{Deserialize, Serialize};

use super::definition::{
    default_chains, Quest, QuestChain, NEW_CHAIN_BONUS, NEW_CHAIN_TITLE, NEW_QUEST_NAME,
};
use super::events::{ActionOutcome, QuestAction};
use super::ids::IdGenerator;

/// Lowest value any stat can take
pub const STAT_MIN: i32 = 0;
/// Highest value any stat can take
pub const STAT_MAX: i32 = 100;
/// MP gained on completing a quest, lost on un-completing it
pub const MP_DELTA: i32 = 5;
/// ATK gained on completing a quest, lost on un-completing it
pub const ATK_DELTA: i32 = 3;

/// Gamified progress attributes, each within [STAT_MIN, STAT_MAX]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterStats {
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub mp: i32,
    pub agi: i32,
}

impl CharacterStats {
    /// Stats after a quest's completion flag flips.
    ///
    /// `was_completed` is the flag *before* the flip: un-completing costs
    /// MP and ATK, completing grants them. `hp`, `def` and `agi` are left
    /// alone.
    pub fn apply_completion_change(self, was_completed: bool) -> Self {
        let (mp, atk) = if was_completed {
            (self.mp - MP_DELTA, self.atk - ATK_DELTA)
        } else {
            (self.mp + MP_DELTA, self.atk + ATK_DELTA)
        };

        Self {
            mp: clamp_stat(mp),
            atk: clamp_stat(atk),
            ..self
        }
    }

    /// Pull every field into range
    pub fn clamped(self) -> Self {
        Self {
            hp: clamp_stat(self.hp),
            atk: clamp_stat(self.atk),
            def: clamp_stat(self.def),
            mp: clamp_stat(self.mp),
            agi: clamp_stat(self.agi),
        }
    }

    pub fn in_bounds(&self) -> bool {
        [self.hp, self.atk, self.def, self.mp, self.agi]
            .iter()
            .all(|v| (STAT_MIN..=STAT_MAX).contains(v))
    }
}

fn clamp_stat(value: i32) -> i32 {
    value.clamp(STAT_MIN, STAT_MAX)
}

/// Everything the store owns and persists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootState {
    pub stats: CharacterStats,
    pub chains: Vec<QuestChain>,
}

impl Default for RootState {
    fn default() -> Self {
        Self {
            stats: CharacterStats::default(),
            chains: default_chains(),
        }
    }
}

impl RootState {
    pub fn new(stats: CharacterStats, chains: Vec<QuestChain>) -> Self {
        Self { stats, chains }
    }

    /// Get a chain by ID
    pub fn get_chain(&self, chain_id: u64) -> Option<&QuestChain> {
        self.chains.iter().find(|c| c.id == chain_id)
    }

    fn get_chain_mut(&mut self, chain_id: u64) -> Option<&mut QuestChain> {
        self.chains.iter_mut().find(|c| c.id == chain_id)
    }

    /// Look up a quest within a specific chain
    pub fn find_quest(&self, chain_id: u64, quest_id: u64) -> Option<&Quest> {
        self.get_chain(chain_id)?.get_quest(quest_id)
    }

    /// Apply an action in place. Unknown chain or quest ids, or an id space
    /// with nothing left to hand out, leave the state untouched and report
    /// `Ignored`.
    pub fn apply(&mut self, action: &QuestAction, ids: &mut IdGenerator) -> ActionOutcome {
        match action {
            QuestAction::ToggleQuest { chain_id, quest_id } => {
                self.toggle_quest(*chain_id, *quest_id)
            }
            QuestAction::AddQuestChain => self.add_quest_chain(ids),
            QuestAction::AddQuest { chain_id } => self.add_quest(*chain_id, ids),
            QuestAction::EditQuest {
                chain_id,
                quest_id,
                new_name,
            } => self.edit_quest(*chain_id, *quest_id, new_name),
            QuestAction::ResetQuests { .. } => self.reset_quests(),
        }
    }

    fn toggle_quest(&mut self, chain_id: u64, quest_id: u64) -> ActionOutcome {
        let Some(quest) = self
            .get_chain_mut(chain_id)
            .and_then(|c| c.get_quest_mut(quest_id))
        else {
            return ActionOutcome::Ignored;
        };

        let was_completed = quest.completed;
        quest.completed = !was_completed;
        self.stats = self.stats.apply_completion_change(was_completed);
        ActionOutcome::Applied
    }

    fn add_quest_chain(&mut self, ids: &mut IdGenerator) -> ActionOutcome {
        // Take both ids or neither
        let mut next = ids.clone();
        let (Some(chain_id), Some(quest_id)) = (next.next_chain_id(), next.next_quest_id()) else {
            return ActionOutcome::Ignored;
        };
        *ids = next;

        let seed = Quest::new(quest_id, NEW_QUEST_NAME);
        self.chains
            .push(QuestChain::new(chain_id, NEW_CHAIN_TITLE, vec![seed]).with_bonus(NEW_CHAIN_BONUS));
        ActionOutcome::Applied
    }

    fn add_quest(&mut self, chain_id: u64, ids: &mut IdGenerator) -> ActionOutcome {
        // Look up first so an unknown chain does not burn an id
        let Some(index) = self.chains.iter().position(|c| c.id == chain_id) else {
            return ActionOutcome::Ignored;
        };

        let Some(quest_id) = ids.next_quest_id() else {
            return ActionOutcome::Ignored;
        };
        let quest = Quest::new(quest_id, NEW_QUEST_NAME);
        self.chains[index].quests.push(quest);
        ActionOutcome::Applied
    }

    fn edit_quest(&mut self, chain_id: u64, quest_id: u64, new_name: &str) -> ActionOutcome {
        match self
            .get_chain_mut(chain_id)
            .and_then(|c| c.get_quest_mut(quest_id))
        {
            Some(quest) => {
                quest.name = new_name.to_string();
                ActionOutcome::Applied
            }
            None => ActionOutcome::Ignored,
        }
    }

    fn reset_quests(&mut self) -> ActionOutcome {
        for quest in self.chains.iter_mut().flat_map(|c| c.quests.iter_mut()) {
            quest.completed = false;
        }
        ActionOutcome::Applied
    }

    /// Total number of quests across all chains
    pub fn quest_count(&self) -> usize {
        self.chains.iter().map(|c| c.quests.len()).sum()
    }
}

//! Store Actions
//!
//! Every mutation the store accepts, in one enum. Used for logging and for
//! reporting what produced a snapshot.

/// Where a reset request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetTrigger {
    /// Explicit request from the presentation layer
    Manual,
    /// Fired by the daily boundary timer
    DailyBoundary,
}

/// A mutation applied to the quest state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestAction {
    /// Flip a quest's completion flag
    ToggleQuest { chain_id: u64, quest_id: u64 },

    /// Append a fresh chain with one seed quest
    AddQuestChain,

    /// Append a fresh quest to an existing chain
    AddQuest { chain_id: u64 },

    /// Rename a quest
    EditQuest {
        chain_id: u64,
        quest_id: u64,
        new_name: String,
    },

    /// Clear every completion flag
    ResetQuests { trigger: ResetTrigger },
}

impl QuestAction {
    /// Get action type as string (for logging/debugging)
    pub fn event_type(&self) -> &'static str {
        match self {
            QuestAction::ToggleQuest { .. } => "toggle_quest",
            QuestAction::AddQuestChain => "add_quest_chain",
            QuestAction::AddQuest { .. } => "add_quest",
            QuestAction::EditQuest { .. } => "edit_quest",
            QuestAction::ResetQuests { .. } => "reset_quests",
        }
    }
}

/// Result of applying an action to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// State changed and must be persisted
    Applied,
    /// A referenced chain or quest does not exist, or no id is left; state untouched
    Ignored,
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

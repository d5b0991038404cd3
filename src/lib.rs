//! Daily quest tracker.
//!
//! Quests are grouped into chains and checked off through the day. Checking
//! a quest raises character stats, un-checking lowers them, and every
//! completion flag clears at local midnight. State lives in a
//! [`QuestStore`] that persists two records after every change.

pub mod config;
pub mod daily_reset;
pub mod error;
pub mod quest;
pub mod storage;
pub mod store;

pub use config::TrackerConfig;
pub use daily_reset::{DailyReset, DailyResetHandle};
pub use error::StorageError;
pub use quest::{CharacterStats, Quest, QuestAction, QuestChain, RootState};
pub use storage::{MemoryStorage, RecordStorage, SqliteStorage};
pub use store::QuestStore;

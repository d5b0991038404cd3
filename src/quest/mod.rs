//! Quest System Module
//!
//! Quest chains, character stats, and the mutations that move between them.

pub mod definition;
pub mod events;
pub mod ids;
pub mod state;

pub use definition::{default_chains, Quest, QuestChain};
pub use events::{ActionOutcome, QuestAction, ResetTrigger};
pub use ids::IdGenerator;
pub use state::{CharacterStats, RootState};

//! Quest State Store
//!
//! Owns the [`RootState`], applies every mutation under a single lock,
//! persists after each change and publishes immutable snapshots to
//! subscribers.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::quest::{IdGenerator, QuestAction, ResetTrigger, RootState};
use crate::storage::{load_state, save_state, RecordStorage};

struct StoreInner {
    state: RootState,
    ids: IdGenerator,
}

pub struct QuestStore<S> {
    storage: S,
    inner: Mutex<StoreInner>,
    snapshots: watch::Sender<Arc<RootState>>,
}

impl<S: RecordStorage> QuestStore<S> {
    /// Load state from storage (or the seed defaults) and write it back.
    /// Never fails: unreadable records fall back to their defaults.
    pub async fn initialize(storage: S) -> Self {
        let state = load_state(&storage).await;
        let ids = IdGenerator::seeded_from(&state.chains);

        info!(
            "Loaded {} quest chain(s) with {} quest(s)",
            state.chains.len(),
            state.quest_count()
        );

        if let Err(e) = save_state(&storage, &state).await {
            warn!("Failed to persist initial state: {}", e);
        }

        let (snapshots, _) = watch::channel(Arc::new(state.clone()));

        Self {
            storage,
            inner: Mutex::new(StoreInner { state, ids }),
            snapshots,
        }
    }

    /// Latest snapshot
    pub fn snapshot(&self) -> Arc<RootState> {
        self.snapshots.borrow().clone()
    }

    /// Receive a new snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<Arc<RootState>> {
        self.snapshots.subscribe()
    }

    pub async fn toggle_quest(&self, chain_id: u64, quest_id: u64) -> Arc<RootState> {
        self.dispatch(QuestAction::ToggleQuest { chain_id, quest_id }).await
    }

    pub async fn add_quest_chain(&self) -> Arc<RootState> {
        self.dispatch(QuestAction::AddQuestChain).await
    }

    pub async fn add_quest(&self, chain_id: u64) -> Arc<RootState> {
        self.dispatch(QuestAction::AddQuest { chain_id }).await
    }

    pub async fn edit_quest(&self, chain_id: u64, quest_id: u64, new_name: &str) -> Arc<RootState> {
        self.dispatch(QuestAction::EditQuest {
            chain_id,
            quest_id,
            new_name: new_name.to_string(),
        })
        .await
    }

    pub async fn reset_quests(&self) -> Arc<RootState> {
        self.dispatch(QuestAction::ResetQuests {
            trigger: ResetTrigger::Manual,
        })
        .await
    }

    /// Apply an action, persist, and notify subscribers.
    ///
    /// The lock is held until the write finishes, so mutations never
    /// interleave. Unknown ids (or no free id for a new entity) are a no-op:
    /// nothing is written and nobody is notified. A failed write is logged
    /// and the in-memory state stays authoritative.
    pub async fn dispatch(&self, action: QuestAction) -> Arc<RootState> {
        let mut inner = self.inner.lock().await;
        let StoreInner { state, ids } = &mut *inner;

        if !state.apply(&action, ids).is_applied() {
            debug!("Ignored {}: {:?}", action.event_type(), action);
            return self.snapshot();
        }

        debug!("Applied {}", action.event_type());

        if let Err(e) = save_state(&self.storage, state).await {
            warn!("Failed to persist state after {}: {}", action.event_type(), e);
        }

        let snapshot = Arc::new(state.clone());
        self.snapshots.send_replace(snapshot.clone());
        snapshot
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Tear down the store, handing back its storage
    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::definition::NEW_QUEST_NAME;
    use crate::quest::CharacterStats;
    use crate::storage::{MemoryStorage, CHAINS_KEY, STATS_KEY};

    async fn fresh_store() -> QuestStore<MemoryStorage> {
        QuestStore::initialize(MemoryStorage::new()).await
    }

    #[tokio::test]
    async fn test_initialize_persists_defaults() {
        let store = fresh_store().await;
        assert_eq!(*store.snapshot(), RootState::default());
        assert!(store.storage().raw(STATS_KEY).is_some());
        assert!(store.storage().raw(CHAINS_KEY).is_some());
    }

    #[tokio::test]
    async fn test_toggle_scenario() {
        let store = fresh_store().await;

        let state = store.toggle_quest(1, 1).await;
        assert!(state.find_quest(1, 1).unwrap().completed);
        assert_eq!((state.stats.mp, state.stats.atk), (5, 3));

        let state = store.toggle_quest(1, 1).await;
        assert!(!state.find_quest(1, 1).unwrap().completed);
        assert_eq!((state.stats.mp, state.stats.atk), (0, 0));
    }

    #[tokio::test]
    async fn test_stats_clamp_at_top() {
        let storage = MemoryStorage::with_records([(STATS_KEY, r#"{"mp":98,"atk":0}"#)]);
        let store = QuestStore::initialize(storage).await;

        let state = store.toggle_quest(1, 1).await;
        assert_eq!(state.stats.mp, 100);
        let state = store.toggle_quest(1, 2).await;
        assert_eq!(state.stats.mp, 100);
        assert_eq!(state.stats.atk, 6);
    }

    #[tokio::test]
    async fn test_every_change_is_persisted() {
        let store = fresh_store().await;
        let writes = store.storage().write_count();

        store.add_quest_chain().await;
        store.add_quest(2).await;
        store.edit_quest(2, 4, "Fajr (on time)").await;
        let state = store.reset_quests().await;

        // Two records per change
        assert_eq!(store.storage().write_count(), writes + 8);

        let reloaded = QuestStore::initialize(store.into_storage()).await;
        assert_eq!(*reloaded.snapshot(), *state);
    }

    #[tokio::test]
    async fn test_unknown_ids_do_not_write_or_notify() {
        let store = fresh_store().await;
        let mut rx = store.subscribe();
        let before = store.snapshot();
        let writes = store.storage().write_count();

        assert_eq!(*store.toggle_quest(9, 9).await, *before);
        assert_eq!(*store.add_quest(77).await, *before);
        assert_eq!(*store.edit_quest(1, 8, "x").await, *before);

        assert_eq!(store.storage().write_count(), writes);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_subscribers_see_each_snapshot() {
        let store = fresh_store().await;
        let mut rx = store.subscribe();

        store.add_quest(1).await;
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.get_chain(1).unwrap().quests.len(), 4);
        assert_eq!(seen.get_chain(1).unwrap().quests[3].name, NEW_QUEST_NAME);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_state() {
        let store = fresh_store().await;
        store.storage().set_unavailable(true);

        let state = store.toggle_quest(2, 6).await;
        assert!(state.find_quest(2, 6).unwrap().completed);
        assert_eq!(state.stats, CharacterStats { mp: 5, atk: 3, ..Default::default() });
        assert_eq!(*store.snapshot(), *state);

        // Storage comes back: next change writes the full state
        store.storage().set_unavailable(false);
        store.toggle_quest(2, 7).await;
        let reloaded = QuestStore::initialize(store.into_storage()).await;
        assert!(reloaded.snapshot().find_quest(2, 6).unwrap().completed);
        assert_eq!(reloaded.snapshot().stats.mp, 10);
    }

    #[tokio::test]
    async fn test_new_ids_continue_after_reload() {
        let store = fresh_store().await;
        store.add_quest_chain().await;

        let reloaded = QuestStore::initialize(store.into_storage()).await;
        let state = reloaded.add_quest_chain().await;
        let ids: Vec<u64> = state.chains.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(state.chains[3].quests[0].id, 10);
    }

    #[tokio::test]
    async fn test_maximal_persisted_id_does_not_duplicate() {
        let storage = MemoryStorage::with_records([(
            CHAINS_KEY,
            r#"[{"id":18446744073709551615,"title":"Big","quests":[{"id":1,"name":"a"}]}]"#,
        )]);
        let store = QuestStore::initialize(storage).await;
        let before = store.snapshot();
        let writes = store.storage().write_count();

        let state = store.add_quest_chain().await;
        assert_eq!(*state, *before);
        assert_eq!(store.storage().write_count(), writes);

        // Quest ids are still free, so quests can be added to the chain
        let state = store.add_quest(u64::MAX).await;
        let quests = &state.get_chain(u64::MAX).unwrap().quests;
        assert_eq!(quests.len(), 2);
        assert_eq!(quests[1].id, 2);
    }

    #[tokio::test]
    async fn test_concurrent_mutations_do_not_interleave() {
        let store = Arc::new(fresh_store().await);

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.add_quest(1).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let state = store.snapshot();
        let chain = state.get_chain(1).unwrap();
        assert_eq!(chain.quests.len(), 23);
        let mut ids: Vec<u64> = chain.quests.iter().map(|q| q.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 23);
    }
}

//! Persistence codec for the two state records.
//!
//! `characterStats` holds a JSON object `{hp, atk, def, mp, agi}` and
//! `questChains` a JSON array of chains. Each record is decoded on its own:
//! a missing, unreadable or malformed record falls back to its default
//! without affecting the other.

use tracing::{debug, warn};

use super::RecordStorage;
use crate::error::StorageError;
use crate::quest::{default_chains, CharacterStats, QuestChain, RootState};

/// Key of the persisted stats record
pub const STATS_KEY: &str = "characterStats";
/// Key of the persisted chains record
pub const CHAINS_KEY: &str = "questChains";

/// Decode a stats record, clamping every field into range
pub fn decode_stats(raw: Option<&str>) -> CharacterStats {
    let Some(raw) = raw else {
        return CharacterStats::default();
    };

    match serde_json::from_str::<CharacterStats>(raw) {
        Ok(stats) => {
            if !stats.in_bounds() {
                warn!("Persisted stats out of range, clamping: {:?}", stats);
            }
            stats.clamped()
        }
        Err(e) => {
            warn!("Malformed {} record, using defaults: {}", STATS_KEY, e);
            CharacterStats::default()
        }
    }
}

/// Decode a chains record
pub fn decode_chains(raw: Option<&str>) -> Vec<QuestChain> {
    let Some(raw) = raw else {
        return default_chains();
    };

    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Malformed {} record, using seed chains: {}", CHAINS_KEY, e);
        default_chains()
    })
}

pub fn encode_stats(stats: &CharacterStats) -> Result<String, StorageError> {
    Ok(serde_json::to_string(stats)?)
}

pub fn encode_chains(chains: &[QuestChain]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(chains)?)
}

/// Read a record, treating an unreadable store the same as a missing record
async fn read_record<S: RecordStorage>(storage: &S, key: &str) -> Option<String> {
    match storage.get(key).await {
        Ok(value) => {
            if value.is_none() {
                debug!("No {} record persisted", key);
            }
            value
        }
        Err(e) => {
            warn!("Failed to read {} record: {}", key, e);
            None
        }
    }
}

/// Rebuild the root state from storage. Never fails.
pub async fn load_state<S: RecordStorage>(storage: &S) -> RootState {
    let stats = read_record(storage, STATS_KEY).await;
    let chains = read_record(storage, CHAINS_KEY).await;

    RootState::new(decode_stats(stats.as_deref()), decode_chains(chains.as_deref()))
}

/// Write both records. Both writes are attempted; the first error is returned.
pub async fn save_state<S: RecordStorage>(
    storage: &S,
    state: &RootState,
) -> Result<(), StorageError> {
    let stats_result = match encode_stats(&state.stats) {
        Ok(json) => storage.set(STATS_KEY, &json).await,
        Err(e) => Err(e),
    };
    let chains_result = match encode_chains(&state.chains) {
        Ok(json) => storage.set(CHAINS_KEY, &json).await,
        Err(e) => Err(e),
    };

    stats_result.and(chains_result)
}

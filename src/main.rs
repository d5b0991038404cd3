use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use quest_tracker::{
    DailyReset, MemoryStorage, QuestStore, RecordStorage, RootState, SqliteStorage, TrackerConfig,
};

fn init_logging(default_directive: &str) {
    let filter = match default_directive.parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn log_progress(state: &RootState) {
    info!(
        "HP {} | ATK {} | DEF {} | MP {} | AGI {}",
        state.stats.hp, state.stats.atk, state.stats.def, state.stats.mp, state.stats.agi
    );
    for chain in &state.chains {
        info!(
            "  {}: {}/{} done{}",
            chain.title,
            chain.completed_count(),
            chain.quests.len(),
            if chain.is_complete() { " (chain complete)" } else { "" }
        );
    }
}

/// Host the store until Ctrl-C
async fn run<S>(store: Arc<QuestStore<S>>, config: &TrackerConfig)
where
    S: RecordStorage + 'static,
{
    log_progress(&store.snapshot());

    let daily_reset = if config.daily_reset.enabled {
        Some(DailyReset::spawn(Arc::clone(&store)))
    } else {
        info!("Daily reset disabled");
        None
    };

    // Stand-in for a presentation layer: report every new snapshot
    let mut snapshots = store.subscribe();
    let watcher = tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let state = snapshots.borrow_and_update().clone();
            log_progress(&state);
        }
    });

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");

    if let Some(handle) = daily_reset {
        handle.shutdown().await;
    }
    watcher.abort();
}

#[tokio::main]
async fn main() {
    let config_file = TrackerConfig::path_from_env();
    let config_path = Path::new(&config_file);
    let loaded = TrackerConfig::load(config_path);
    let config = loaded.clone().unwrap_or_default();

    // Initialize logging
    init_logging(&config.logging.filter);

    match loaded {
        Err(e) => error!("{}; falling back to default config", e),
        Ok(_) if !config_path.exists() => {
            info!("Config file {:?} not found, using defaults", config_path)
        }
        Ok(_) => info!("Loaded config from {:?}", config_path),
    }

    match SqliteStorage::new(&config.storage.database_url).await {
        Ok(storage) => {
            let store = Arc::new(QuestStore::initialize(storage).await);
            run(Arc::clone(&store), &config).await;
            store.storage().close().await;
        }
        Err(e) => {
            warn!(
                "Failed to open {}: {}; progress will not survive a restart",
                config.storage.database_url, e
            );
            let store = Arc::new(QuestStore::initialize(MemoryStorage::new()).await);
            run(store, &config).await;
        }
    }
}

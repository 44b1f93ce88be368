use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::ViewsConfig;

use super::state::{Action, Change, NotesState};

/// Holds the current notes-page snapshot and publishes every new one.
///
/// `dispatch` runs the reducer inside `send_modify`, so concurrent
/// dispatches are serialized and no observer sees a half-applied action.
pub struct Store {
    sender: watch::Sender<Arc<NotesState>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Arc::new(NotesState::default()));
        Self { sender }
    }

    /// Current snapshot; cheap to clone and safe to hold across awaits
    pub fn snapshot(&self) -> Arc<NotesState> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<NotesState>> {
        self.sender.subscribe()
    }

    /// Apply `action` and return what changed
    pub fn dispatch(&self, action: Action) -> Vec<Change> {
        let name = action.name();
        let mut changes = Vec::new();

        self.sender.send_modify(|current| {
            let next = current.apply(action);
            changes = next.changes_since(current);
            *current = Arc::new(next);
        });

        tracing::debug!(action = name, ?changes, "notes store dispatch");
        changes
    }
}

/// Identifies one browser session of one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewKey {
    pub view: Uuid,
    pub user: Uuid,
}

struct ViewEntry {
    store: Arc<Store>,
    /// Milliseconds since the registry epoch
    last_used: AtomicU64,
    /// Creation order; breaks `last_used` ties
    seq: u64,
}

/// Per-browser-session stores, created lazily on first page load.
///
/// Stores idle for longer than the configured timeout are swept whenever a
/// new one is created (and periodically by `spawn_sweeper`), and each user
/// keeps at most `max_per_user` of them.
#[derive(Clone)]
pub struct ViewRegistry {
    stores: Arc<RwLock<HashMap<ViewKey, ViewEntry>>>,
    created: Arc<AtomicU64>,
    epoch: Instant,
    idle_timeout: Duration,
    max_per_user: usize,
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new(&ViewsConfig::default())
    }
}

impl ViewRegistry {
    pub fn new(config: &ViewsConfig) -> Self {
        Self {
            stores: Arc::new(RwLock::new(HashMap::new())),
            created: Arc::new(AtomicU64::new(0)),
            epoch: Instant::now(),
            idle_timeout: config.idle_timeout(),
            max_per_user: config.max_per_user.max(1),
        }
    }

    fn now(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Existing store for `key`, if it has not been evicted
    pub async fn get(&self, key: &ViewKey) -> Option<Arc<Store>> {
        let stores = self.stores.read().await;
        stores.get(key).map(|entry| {
            entry.last_used.store(self.now(), Ordering::Relaxed);
            entry.store.clone()
        })
    }

    pub async fn get_or_create(&self, key: ViewKey) -> Arc<Store> {
        if let Some(store) = self.get(&key).await {
            return store;
        }

        let mut stores = self.stores.write().await;
        let now = self.now();
        if let Some(entry) = stores.get(&key) {
            entry.last_used.store(now, Ordering::Relaxed);
            return entry.store.clone();
        }

        self.evict_idle(&mut stores, now);
        self.evict_over_cap(&mut stores, key.user);

        tracing::debug!(view = %key.view, user = %key.user, "created notes store");
        let store = Arc::new(Store::new());
        stores.insert(
            key,
            ViewEntry {
                store: store.clone(),
                last_used: AtomicU64::new(now),
                seq: self.created.fetch_add(1, Ordering::Relaxed),
            },
        );
        store
    }

    fn evict_idle(&self, stores: &mut HashMap<ViewKey, ViewEntry>, now: u64) -> usize {
        let idle_ms = self.idle_timeout.as_millis() as u64;
        let before = stores.len();
        stores.retain(|_, entry| now.saturating_sub(entry.last_used.load(Ordering::Relaxed)) < idle_ms);
        before - stores.len()
    }

    /// Make room for one more view of `user`
    fn evict_over_cap(&self, stores: &mut HashMap<ViewKey, ViewEntry>, user: Uuid) {
        let mut owned: Vec<(ViewKey, (u64, u64))> = stores
            .iter()
            .filter(|(key, _)| key.user == user)
            .map(|(key, entry)| (*key, (entry.last_used.load(Ordering::Relaxed), entry.seq)))
            .collect();

        if owned.len() < self.max_per_user {
            return;
        }

        owned.sort_by_key(|(_, order)| *order);
        let excess = owned.len() + 1 - self.max_per_user;
        for (key, _) in owned.into_iter().take(excess) {
            tracing::debug!(view = %key.view, user = %key.user, "evicted notes store");
            stores.remove(&key);
        }
    }

    /// Drop every store idle past the timeout; returns how many went
    pub async fn sweep(&self) -> usize {
        let mut stores = self.stores.write().await;
        let now = self.now();
        self.evict_idle(&mut stores, now)
    }

    /// Sweep idle stores every `every` until the runtime shuts down
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = registry.sweep().await;
                if removed > 0 {
                    tracing::debug!(removed, "swept idle notes stores");
                }
            }
        })
    }

    pub async fn remove(&self, key: &ViewKey) -> bool {
        self.stores.write().await.remove(key).is_some()
    }

    pub async fn len(&self) -> usize {
        self.stores.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

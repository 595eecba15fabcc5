//! Registry of open form sessions.
//!
//! Each session owns one [`FormController`] and therefore one draft. All
//! sessions share the application's store and history view.
//!
//! Sessions are dropped three ways: an explicit close, the idle sweep run by
//! [`start_session_sweeper`], and eviction of the least recently used
//! session when opening one would exceed the registry's capacity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use visitlog_core::draft::ResetPolicy;
use visitlog_form::{FormController, HistoryView};
use visitlog_store::RecordStore;

/// Interval between idle-session sweeps (in seconds).
const SWEEP_INTERVAL_SECS: u64 = 60;

struct Session {
    controller: Arc<FormController>,
    last_touched: Mutex<Instant>,
}

impl Session {
    fn last_touched(&self) -> Instant {
        *self.last_touched.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn touch(&self) {
        *self.last_touched.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }
}

/// Manages all open form sessions.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Session>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionRegistry {
    /// `max_sessions` is clamped to at least one.
    pub fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Open a session with a fresh default draft.
    ///
    /// At capacity, the least recently used session is evicted first.
    pub async fn open(
        &self,
        store: Arc<dyn RecordStore>,
        history: Arc<HistoryView>,
        policy: ResetPolicy,
    ) -> (Uuid, Arc<FormController>) {
        let id = Uuid::new_v4();
        let controller = Arc::new(FormController::new(store, history, policy));

        let mut sessions = self.sessions.write().await;
        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, session)| session.last_touched())
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
            tracing::info!(session_id = %oldest, "Session evicted, registry at capacity");
        }
        sessions.insert(
            id,
            Session {
                controller: Arc::clone(&controller),
                last_touched: Mutex::new(Instant::now()),
            },
        );
        (id, controller)
    }

    /// Look up a session, marking it as used.
    pub async fn get(&self, id: Uuid) -> Option<Arc<FormController>> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id)?;
        session.touch();
        Some(Arc::clone(&session.controller))
    }

    /// Remove a session. Returns `false` if it did not exist.
    pub async fn close(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions unused for longer than the idle timeout.
    ///
    /// Returns the number of sessions removed.
    pub async fn evict_idle(&self) -> usize {
        match Instant::now().checked_sub(self.idle_timeout) {
            Some(cutoff) => self.evict_untouched_since(cutoff).await,
            None => 0,
        }
    }

    /// Drop sessions last used before `cutoff`.
    pub async fn evict_untouched_since(&self, cutoff: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_touched() >= cutoff);
        before - sessions.len()
    }
}

/// Spawn a background task that periodically evicts idle sessions.
///
/// The task runs until aborted; `main` aborts it on shutdown.
pub fn start_session_sweeper(registry: Arc<SessionRegistry>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));

        loop {
            interval.tick().await;
            let evicted = registry.evict_idle().await;
            if evicted > 0 {
                let remaining = registry.count().await;
                tracing::info!(evicted, remaining, "Idle sessions evicted");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use visitlog_core::draft::DraftField;
    use visitlog_core::history::RenderOptions;
    use visitlog_form::FormPhase;
    use visitlog_store::MemoryStore;

    use super::*;

    fn shared() -> (Arc<dyn RecordStore>, Arc<HistoryView>) {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let history = Arc::new(HistoryView::new(
            Arc::clone(&store),
            RenderOptions::default(),
        ));
        (store, history)
    }

    fn registry(max_sessions: usize) -> SessionRegistry {
        SessionRegistry::new(Duration::from_secs(1800), max_sessions)
    }

    async fn open(registry: &SessionRegistry) -> Uuid {
        let (store, history) = shared();
        registry.open(store, history, ResetPolicy::default()).await.0
    }

    #[tokio::test]
    async fn sessions_hold_independent_drafts() {
        let registry = registry(10);
        let (store, history) = shared();

        let (a, first) = registry
            .open(Arc::clone(&store), Arc::clone(&history), ResetPolicy::default())
            .await;
        let (b, _) = registry.open(store, history, ResetPolicy::default()).await;
        assert_ne!(a, b);
        assert_eq!(registry.count().await, 2);

        first.set_field(DraftField::CustomerName, "A商事").unwrap();
        let second = registry.get(b).await.unwrap();
        assert_eq!(second.draft().customer_name, "");
        assert_matches!(second.phase(), FormPhase::Editing);
    }

    #[tokio::test]
    async fn close_is_idempotent_by_result() {
        let registry = registry(10);
        let id = open(&registry).await;

        assert!(registry.close(id).await);
        assert!(!registry.close(id).await);
        assert!(registry.get(id).await.is_none());
    }

    #[tokio::test]
    async fn untouched_sessions_are_evicted_and_used_ones_kept() {
        let registry = registry(10);
        let used = open(&registry).await;
        let abandoned = open(&registry).await;

        tokio::time::sleep(Duration::from_millis(5)).await;
        let cutoff = Instant::now();
        tokio::time::sleep(Duration::from_millis(5)).await;
        registry.get(used).await.unwrap();

        assert_eq!(registry.evict_untouched_since(cutoff).await, 1);
        assert!(registry.get(used).await.is_some());
        assert!(registry.get(abandoned).await.is_none());
    }

    #[tokio::test]
    async fn idle_sweep_with_zero_timeout_clears_everything() {
        let registry = SessionRegistry::new(Duration::ZERO, 10);
        for _ in 0..3 {
            open(&registry).await;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(registry.evict_idle().await, 3);
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn fresh_sessions_survive_the_idle_sweep() {
        let registry = registry(10);
        open(&registry).await;
        assert_eq!(registry.evict_idle().await, 0);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn capacity_evicts_least_recently_used() {
        let registry = registry(3);
        let first = open(&registry).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        let second = open(&registry).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        let third = open(&registry).await;
        tokio::time::sleep(Duration::from_millis(2)).await;

        // Using the oldest makes the second the eviction candidate.
        registry.get(first).await.unwrap();
        let fourth = open(&registry).await;

        assert_eq!(registry.count().await, 3);
        assert!(registry.get(second).await.is_none());
        for id in [first, third, fourth] {
            assert!(registry.get(id).await.is_some());
        }
    }
}

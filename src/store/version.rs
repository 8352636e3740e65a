//! The version store: per-session deck history with undo and idle expiry.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use super::clock::{Clock, SystemClock};
use super::session::{Session, SessionContext, SessionInfo};
use crate::common::{Error, Result};
use crate::config::DeckConfig;
use crate::deck::{Deck, EditSet, merge};

/// Shortest period the background sweep runs at.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Thread-safe map of sessions to their deck history.
///
/// Every operation takes the same lock, so the background sweep can never
/// interleave with a commit or undo on the session it is about to remove.
/// A session idle for longer than the TTL is treated as absent even before
/// the sweep gets to it.
pub struct VersionStore {
    sessions: Mutex<HashMap<String, Session>>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
}

impl VersionStore {
    /// A store on the wall clock with the given idle TTL.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// A store with an injected clock.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            clock,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
        }
    }

    pub fn from_config(config: &DeckConfig) -> Self {
        Self::new(config.session_ttl())
    }

    /// Start a session whose history is `[initial]` and return its identifier.
    pub fn create_session(&self, initial: Deck, context: SessionContext) -> String {
        let id = Uuid::new_v4().to_string();
        let slides = initial.len();
        let session = Session::new(id.clone(), initial, context, self.clock.now());
        self.sessions.lock().insert(id.clone(), session);
        info!(session_id = %id, slides, "session created");
        id
    }

    /// Current deck of a session. Refreshes its last-access time.
    pub fn get_deck(&self, session_id: &str) -> Result<Arc<Deck>> {
        self.with_session(session_id, |session| session.current())
    }

    /// Append `deck` to the history; it becomes current.
    pub fn commit(&self, session_id: &str, deck: Deck) -> Result<Arc<Deck>> {
        let current = self.with_session(session_id, |session| session.push(deck))?;
        debug!(session_id, slides = current.len(), "snapshot committed");
        Ok(current)
    }

    /// Merge `edits` into the current deck and commit the result atomically.
    pub fn apply_edit(&self, session_id: &str, edits: &EditSet) -> Result<Arc<Deck>> {
        let current = self.with_session(session_id, |session| {
            let next = merge(&session.current(), edits);
            session.push(next)
        })?;
        debug!(session_id, slides = current.len(), edits = edits.len(), "edit applied");
        Ok(current)
    }

    /// Step back one snapshot. With a single snapshot this is a no-op.
    pub fn undo(&self, session_id: &str) -> Result<Arc<Deck>> {
        let current = self.with_session(session_id, Session::undo)?;
        debug!(session_id, slides = current.len(), "undo");
        Ok(current)
    }

    /// Context stored when the session was created.
    pub fn context(&self, session_id: &str) -> Result<SessionContext> {
        self.with_session(session_id, |session| session.context().clone())
    }

    pub fn info(&self, session_id: &str) -> Result<SessionInfo> {
        self.with_session(session_id, |session| session.info())
    }

    /// Remove a session explicitly. Returns whether it existed.
    pub fn remove(&self, session_id: &str) -> bool {
        let removed = self.sessions.lock().remove(session_id).is_some();
        if removed {
            info!(session_id, "session removed");
        }
        removed
    }

    /// Metadata for every live session, oldest first.
    pub fn list(&self) -> Vec<SessionInfo> {
        let now = self.clock.now();
        let sessions = self.sessions.lock();
        let mut infos: Vec<_> = sessions
            .values()
            .filter(|s| !s.is_expired(now, self.ttl))
            .map(Session::info)
            .collect();
        infos.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.session_id.cmp(&b.session_id)));
        infos
    }

    /// Number of sessions held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// Drop every session idle for longer than the TTL. Returns how many.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now, self.ttl));
        let swept = before - sessions.len();
        if swept > 0 {
            info!(swept, remaining = sessions.len(), "expired sessions swept");
        }
        swept
    }

    /// Run [`sweep_expired`](Self::sweep_expired) every `interval` on the
    /// current tokio runtime until the returned handle is shut down.
    ///
    /// A zero `interval` is raised to one millisecond.
    #[must_use]
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> SweeperHandle {
        let interval = interval.max(MIN_SWEEP_INTERVAL);
        let store = Arc::clone(self);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    () = token.cancelled() => {
                        debug!("session sweeper shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        store.sweep_expired();
                    }
                }
            }
        });
        SweeperHandle { cancel, task }
    }

    /// Run `f` on a live session under the lock, refreshing its access time.
    fn with_session<T>(&self, session_id: &str, f: impl FnOnce(&mut Session) -> T) -> Result<T> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock();
        let expired = match sessions.get(session_id) {
            Some(session) => session.is_expired(now, self.ttl),
            None => return Err(Error::SessionNotFound(session_id.to_string())),
        };
        if expired {
            sessions.remove(session_id);
            debug!(session_id, "expired session dropped on access");
            return Err(Error::SessionNotFound(session_id.to_string()));
        }
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        session.touch(now);
        Ok(f(session))
    }
}

impl std::fmt::Debug for VersionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionStore")
            .field("sessions", &self.len())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Owns the background sweep task.
#[derive(Debug)]
pub struct SweeperHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Token that stops the sweeper when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop the sweeper and wait for it to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(err) = self.task.await {
            tracing::error!(?err, "session sweeper task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Position, SlideRecord};
    use crate::store::ManualClock;

    const TTL: Duration = Duration::from_secs(3600);

    fn deck(titles: &[&str]) -> Deck {
        Deck::from_records(
            titles
                .iter()
                .enumerate()
                .map(|(i, t)| SlideRecord::new(Position::whole(i as i64 + 1), *t, ""))
                .collect(),
        )
    }

    fn manual_store() -> (Arc<ManualClock>, VersionStore) {
        let clock = Arc::new(ManualClock::default());
        let store = VersionStore::with_clock(TTL, clock.clone());
        (clock, store)
    }

    #[test]
    fn test_commit_and_undo() {
        let (_, store) = manual_store();
        let id = store.create_session(deck(&["A"]), SessionContext::default());

        store.commit(&id, deck(&["A", "B"])).unwrap();
        assert_eq!(store.get_deck(&id).unwrap().len(), 2);

        let back = store.undo(&id).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(store.info(&id).unwrap().version_count, 1);
    }

    #[test]
    fn test_undo_at_single_snapshot_is_noop() {
        let (_, store) = manual_store();
        let id = store.create_session(deck(&["Only"]), SessionContext::default());
        let before = store.get_deck(&id).unwrap();
        let after = store.undo(&id).unwrap();
        assert_eq!(before, after);
        assert_eq!(store.info(&id).unwrap().version_count, 1);
    }

    #[test]
    fn test_apply_edit_merges_current() {
        let (_, store) = manual_store();
        let id = store.create_session(deck(&["A", "B"]), SessionContext::default());
        let edits = EditSet::from_records(vec![SlideRecord::new(Position::from_tenths(15), "Mid", "")]);
        let merged = store.apply_edit(&id, &edits).unwrap();
        let titles: Vec<_> = merged.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["A", "Mid", "B"]);
        assert_eq!(store.undo(&id).unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_session_is_not_found() {
        let (_, store) = manual_store();
        assert!(store.get_deck("nope").unwrap_err().is_not_found());
        assert!(store.undo("nope").unwrap_err().is_not_found());
        assert!(store.commit("nope", Deck::new()).unwrap_err().is_not_found());
        assert!(!store.remove("nope"));
    }

    #[test]
    fn test_remove() {
        let (_, store) = manual_store();
        let id = store.create_session(Deck::new(), SessionContext::default());
        assert!(store.remove(&id));
        assert!(store.get_deck(&id).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_context_round_trip() {
        let (_, store) = manual_store();
        let ctx = SessionContext::new("quarterly report").with_theme("ocean");
        let id = store.create_session(Deck::new(), ctx.clone());
        assert_eq!(store.context(&id).unwrap(), ctx);
    }

    #[test]
    fn test_expired_session_is_not_found_before_sweep() {
        let (clock, store) = manual_store();
        let id = store.create_session(deck(&["A"]), SessionContext::default());
        clock.advance(chrono::Duration::seconds(3601));
        assert!(store.get_deck(&id).unwrap_err().is_not_found());
        assert!(store.is_empty());
    }

    #[test]
    fn test_access_refreshes_idle_time() {
        let (clock, store) = manual_store();
        let id = store.create_session(deck(&["A"]), SessionContext::default());
        clock.advance(chrono::Duration::seconds(3000));
        store.get_deck(&id).unwrap();
        clock.advance(chrono::Duration::seconds(3000));
        assert_eq!(store.sweep_expired(), 0);
        assert!(store.get_deck(&id).is_ok());
    }

    #[test]
    fn test_sweep_removes_only_idle_sessions() {
        let (clock, store) = manual_store();
        let old = store.create_session(deck(&["old"]), SessionContext::default());
        clock.advance(chrono::Duration::seconds(3000));
        let fresh = store.create_session(deck(&["fresh"]), SessionContext::default());
        clock.advance(chrono::Duration::seconds(700));

        assert_eq!(store.list().len(), 1);
        assert_eq!(store.sweep_expired(), 1);
        assert!(store.get_deck(&old).is_err());
        assert!(store.get_deck(&fresh).is_ok());
    }

    #[test]
    fn test_list_ordered_by_creation() {
        let (clock, store) = manual_store();
        let first = store.create_session(Deck::new(), SessionContext::default());
        clock.advance(chrono::Duration::seconds(1));
        let second = store.create_session(Deck::new(), SessionContext::default());
        let ids: Vec<_> = store.list().into_iter().map(|i| i.session_id).collect();
        assert_eq!(ids, [first, second]);
    }

    #[test]
    fn test_concurrent_commits_are_serialized() {
        let store = Arc::new(VersionStore::new(TTL));
        let id = store.create_session(Deck::new(), SessionContext::default());

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = Arc::clone(&store);
                let id = id.clone();
                std::thread::spawn(move || {
                    let title = format!("t{n}");
                    for _ in 0..25 {
                        store.commit(&id, deck(&[title.as_str()])).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.info(&id).unwrap().version_count, 1 + 8 * 25);
    }

    #[tokio::test]
    async fn test_sweeper_task_expires_and_stops() {
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(VersionStore::with_clock(TTL, clock.clone()));
        store.create_session(deck(&["A"]), SessionContext::default());
        clock.advance(chrono::Duration::seconds(7200));

        let sweeper = store.spawn_sweeper(Duration::from_millis(10));
        for _ in 0..200 {
            if store.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(store.is_empty());
        sweeper.shutdown().await;
    }

    #[tokio::test]
    async fn test_zero_interval_sweeper_keeps_running() {
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(VersionStore::with_clock(TTL, clock.clone()));
        let sweeper = store.spawn_sweeper(Duration::ZERO);

        store.create_session(deck(&["A"]), SessionContext::default());
        clock.advance(chrono::Duration::seconds(7200));
        for _ in 0..200 {
            if store.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(store.is_empty());
        assert!(!sweeper.task.is_finished());
        sweeper.shutdown().await;
    }
}

//! Session watcher
//!
//! Connects a session's [`SessionRouter`] to the notification feed: each
//! signal for the session's founder triggers a snapshot fetch and a
//! re-resolution, which the router drops if the user navigated meanwhile.

use crate::store::LifecycleStore;
use hatch_engine::LifecycleSignal;
use hatch_model::Role;
use hatch_routing::{RefreshOutcome, SessionRouter};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

/// Counts of what the watcher did, returned when the feed closes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    pub refreshes: usize,
    pub redirects: usize,
    pub stale: usize,
}

/// Spawn a watcher for one session; it ends when the feed closes
pub fn spawn_session_watcher(
    router: Arc<SessionRouter>,
    store: Arc<dyn LifecycleStore>,
    feed: broadcast::Receiver<LifecycleSignal>,
) -> JoinHandle<WatchStats> {
    tokio::spawn(watch_session(router, store, feed))
}

pub async fn watch_session(
    router: Arc<SessionRouter>,
    store: Arc<dyn LifecycleStore>,
    mut feed: broadcast::Receiver<LifecycleSignal>,
) -> WatchStats {
    let mut stats = WatchStats::default();
    // Admin sessions are never routed by founder state.
    let Some(founder) = router
        .actor()
        .filter(|actor| actor.role == Role::Founder)
        .map(|actor| actor.user_id)
    else {
        return stats;
    };

    loop {
        match feed.recv().await {
            Ok(signal) if signal.founder_id() != founder => continue,
            Ok(_) => {}
            // Missed signals may include ours; refreshing is always safe.
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "session feed lagged");
            }
            Err(RecvError::Closed) => break,
        }

        let ticket = router.begin_refresh();
        let snapshot = match store.snapshot(founder).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(founder = %founder, error = %err, "refresh fetch failed");
                continue;
            }
        };
        stats.refreshes += 1;
        match router.complete_refresh(ticket, snapshot) {
            RefreshOutcome::Redirected(to) => {
                tracing::debug!(founder = %founder, to = %to, "session redirected");
                stats.redirects += 1;
            }
            RefreshOutcome::Stale => stats.stale += 1,
            RefreshOutcome::Unchanged => {}
        }
    }
    stats
}

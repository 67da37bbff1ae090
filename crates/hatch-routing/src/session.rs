//! Per-session routing state
//!
//! A lifecycle notification triggers a re-resolution, but the snapshot
//! fetch behind it is asynchronous. If the user navigates while the fetch
//! is in flight, the finished re-resolution is stale and must not move
//! them. Each navigation bumps a generation counter; a refresh carries the
//! generation it started under and is dropped if the counter moved.

use crate::destination::Destination;
use crate::guard::{GuardDecision, RouteGuard};
use hatch_model::{Actor, LifecycleSnapshot};
use parking_lot::Mutex;

/// Handle for one in-flight re-resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
}

/// Result of completing a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A newer navigation happened; the screen was left alone
    Stale,
    /// The current screen still matches
    Unchanged,
    /// The session was moved
    Redirected(Destination),
}

#[derive(Debug)]
struct SessionState {
    generation: u64,
    current: Destination,
    snapshot: Option<LifecycleSnapshot>,
}

/// Routing state for one open session
#[derive(Debug)]
pub struct SessionRouter {
    actor: Option<Actor>,
    state: Mutex<SessionState>,
}

impl SessionRouter {
    /// A fresh session, placed where the resolver puts it with no snapshot
    #[must_use]
    pub fn new(actor: Option<Actor>) -> Self {
        let current = crate::resolver::resolve(actor.as_ref(), None);
        Self {
            actor,
            state: Mutex::new(SessionState {
                generation: 0,
                current,
                snapshot: None,
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    #[must_use]
    pub fn current(&self) -> Destination {
        self.state.lock().current
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// User navigation to `path`, guarded against the cached snapshot
    pub fn navigate(&self, path: &str) -> GuardDecision {
        let mut state = self.state.lock();
        state.generation += 1;
        let guard = RouteGuard::new(self.actor.as_ref());
        let decision = guard.check_path(path, state.snapshot.as_ref());
        state.current = match (decision, Destination::for_path(path)) {
            (GuardDecision::Allow, Some(requested)) => requested,
            (decision, _) => decision.target(state.current),
        };
        decision
    }

    /// Start a re-resolution; call before fetching the snapshot
    #[must_use]
    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket {
            generation: self.state.lock().generation,
        }
    }

    /// Finish a re-resolution with the freshly fetched snapshot.
    ///
    /// A newer snapshot is cached even when the ticket is stale, so the
    /// next navigation sees current data. An older one is ignored.
    pub fn complete_refresh(
        &self,
        ticket: RefreshTicket,
        snapshot: LifecycleSnapshot,
    ) -> RefreshOutcome {
        let mut state = self.state.lock();
        let newer = state
            .snapshot
            .as_ref()
            .map_or(true, |cached| snapshot.version >= cached.version);
        if newer {
            state.snapshot = Some(snapshot);
        }

        if ticket.generation != state.generation {
            tracing::debug!(
                ticket = ticket.generation,
                generation = state.generation,
                "discarding stale re-resolution"
            );
            return RefreshOutcome::Stale;
        }

        let guard = RouteGuard::new(self.actor.as_ref());
        match guard.check(state.current, state.snapshot.as_ref()) {
            GuardDecision::Allow => RefreshOutcome::Unchanged,
            GuardDecision::Redirect(to) => {
                state.current = to;
                RefreshOutcome::Redirected(to)
            }
        }
    }
}

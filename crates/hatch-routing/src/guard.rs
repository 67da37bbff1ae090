//! Route guard
//!
//! The guard owns no routing rules of its own: it classifies the requested
//! path and compares it with [`resolve`]. A request that already matches
//! the resolved destination is always allowed, which keeps guards that run
//! on every render from looping.

use crate::destination::Destination;
use crate::resolver::resolve;
use hatch_model::{Actor, LifecycleSnapshot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "destination", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuardDecision {
    Allow,
    Redirect(Destination),
}

impl GuardDecision {
    #[inline]
    #[must_use]
    pub fn is_allowed(self) -> bool {
        self == GuardDecision::Allow
    }

    /// Where the actor ends up: `current` when allowed
    #[inline]
    #[must_use]
    pub fn target(self, current: Destination) -> Destination {
        match self {
            GuardDecision::Allow => current,
            GuardDecision::Redirect(to) => to,
        }
    }
}

/// Stateless guard bound to one actor
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard<'a> {
    actor: Option<&'a Actor>,
}

impl<'a> RouteGuard<'a> {
    #[inline]
    #[must_use]
    pub fn new(actor: Option<&'a Actor>) -> Self {
        Self { actor }
    }

    /// Check a navigation to `current`
    #[must_use]
    pub fn check(
        &self,
        current: Destination,
        snapshot: Option<&LifecycleSnapshot>,
    ) -> GuardDecision {
        let resolved = resolve(self.actor, snapshot);
        if current == resolved {
            GuardDecision::Allow
        } else {
            tracing::debug!(from = %current, to = %resolved, "guard redirect");
            GuardDecision::Redirect(resolved)
        }
    }

    /// Check a navigation to a raw path; unknown paths redirect
    #[must_use]
    pub fn check_path(&self, path: &str, snapshot: Option<&LifecycleSnapshot>) -> GuardDecision {
        match Destination::for_path(path) {
            Some(current) => self.check(current, snapshot),
            None => GuardDecision::Redirect(resolve(self.actor, snapshot)),
        }
    }
}

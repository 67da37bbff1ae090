//! Hatchery routing
//!
//! Maps an authenticated actor and their lifecycle snapshot to the one
//! screen they should be on.
//!
//! - [`resolve`]: pure, total resolver; the single source of truth
//! - [`RouteGuard`]: thin per-navigation check built on [`resolve`]
//! - [`SessionRouter`]: per-session state that drops re-resolutions
//!   overtaken by a newer navigation

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod destination;
pub mod guard;
pub mod resolver;
pub mod session;

pub use destination::Destination;
pub use guard::{GuardDecision, RouteGuard};
pub use resolver::resolve;
pub use session::{RefreshOutcome, RefreshTicket, SessionRouter};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

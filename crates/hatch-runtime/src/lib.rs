//! Hatchery runtime
//!
//! Runs the pure engine against real collaborators:
//! - [`LifecycleStore`]: snapshot reads and versioned, atomic writes
//! - [`Notifier`]: cache-invalidation signals to open sessions
//! - [`EffectRunner`]: persist, then notify
//! - [`LifecycleService`]: re-read, apply, persist, retry once on conflict
//!
//! # Example
//!
//! ```rust,ignore
//! use hatch_runtime::{BroadcastNotifier, InMemoryStore, LifecycleService, RuntimeConfig};
//!
//! let store = Arc::new(InMemoryStore::new());
//! let notifier = Arc::new(BroadcastNotifier::default());
//! let service = LifecycleService::new(store, notifier, RuntimeConfig::load("hatch.toml")?);
//!
//! let outcome = service.execute(founder, actor, &Command::FinalizeSubmission).await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod notify;
pub mod runner;
pub mod service;
pub mod session;
pub mod store;

pub use config::{RuntimeConfig, ServiceConfig};
pub use error::{ConfigError, NotifyError, ServiceError, StoreError};
pub use notify::{BroadcastNotifier, Notifier};
pub use runner::{EffectRunner, RunReport};
pub use service::{CommandOutcome, LifecycleService};
pub use session::{spawn_session_watcher, watch_session, WatchStats};
pub use store::{InMemoryStore, LifecycleStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

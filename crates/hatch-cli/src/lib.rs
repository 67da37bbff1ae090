//! hatchctl library
//!
//! The seeded lifecycle [`simulator`] behind `hatchctl simulate`, and the
//! snapshot helpers the other subcommands share.
//!
//! # Example
//!
//! ```rust,ignore
//! use hatch_cli::simulator::{run_simulator, SimulatorConfig};
//!
//! let report = run_simulator(SimulatorConfig::default().with_seed(7)).await;
//! println!("{}", report.generate_text());
//! assert!(report.passed());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod simulator;

use anyhow::Context;
use hatch_model::{Actor, LifecycleSnapshot, Role, UserId};
use hatch_routing::{resolve, Destination};
use std::path::Path;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Read a JSON snapshot from `path`, or from stdin when `path` is `-`
pub fn read_snapshot(path: &Path) -> anyhow::Result<LifecycleSnapshot> {
    let json = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("failed to read snapshot from stdin")?
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&json).context("snapshot is not valid lifecycle JSON")
}

/// Resolve `snapshot` for a viewer.
///
/// A founder without an explicit user id is taken to be the snapshot's own
/// founder.
#[must_use]
pub fn resolve_for(
    snapshot: &LifecycleSnapshot,
    role: Role,
    user: Option<UserId>,
) -> (Actor, Destination) {
    let user_id = user.unwrap_or(snapshot.founder_id);
    let actor = Actor { user_id, role };
    (actor, resolve(Some(&actor), Some(snapshot)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hatch_test_utils::{founder, pending_snapshot};

    #[test]
    fn founder_defaults_to_snapshot_owner() {
        let f = founder();
        let snapshot = pending_snapshot(f.user_id);
        let (actor, destination) = resolve_for(&snapshot, Role::Founder, None);
        assert_eq!(actor, f);
        assert_eq!(destination, Destination::SubmissionChat);
    }

    #[test]
    fn another_founder_sees_loading() {
        let snapshot = pending_snapshot(founder().user_id);
        let (_, destination) = resolve_for(&snapshot, Role::Founder, Some(UserId::new()));
        assert_eq!(destination, Destination::Loading);
    }

    #[test]
    fn admin_goes_home() {
        let snapshot = pending_snapshot(founder().user_id);
        let (_, destination) = resolve_for(&snapshot, Role::Admin, None);
        assert_eq!(destination, Destination::AdminHome);
    }

    #[test]
    fn snapshot_files_are_read() {
        let snapshot = pending_snapshot(founder().user_id);
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), serde_json::to_string(&snapshot).unwrap()).unwrap();
        assert_eq!(read_snapshot(file.path()).unwrap(), snapshot);
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{ not json").unwrap();
        let err = read_snapshot(file.path()).unwrap_err();
        assert!(err.to_string().contains("not valid lifecycle JSON"));
    }
}

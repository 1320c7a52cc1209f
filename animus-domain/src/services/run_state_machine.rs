// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Run status transition rules: monotonic toward terminal states. `Unknown`
//! is entered only when the executor becomes unreachable and may leave back
//! to the previously observed status once re-established.

use chrono::{DateTime, Utc};

use crate::entities::{Run, RunStatus};
use crate::GovernanceError;

/// Attempts to move `run` to `next`, enforcing:
/// - once terminal, status is frozen;
/// - `Unknown` may only be entered from a non-terminal status, and may only
///   leave back to the status the run held before it went `Unknown`.
pub fn transition(
    run: &mut Run,
    next: RunStatus,
    previously_observed: Option<RunStatus>,
    ended_at: Option<DateTime<Utc>>,
) -> Result<(), GovernanceError> {
    let current = run.status();
    if current.is_terminal() {
        return Err(GovernanceError::conflict(format!("run is already terminal ({current:?})")));
    }
    if current == RunStatus::Unknown && next != RunStatus::Unknown {
        match previously_observed {
            Some(prev) if prev == next => {}
            _ => {
                return Err(GovernanceError::conflict(
                    "run can only leave the unknown status back to its previously observed status",
                ))
            }
        }
    }
    run.set_status_unchecked(next, ended_at);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RunKind;
    use crate::value_objects::ProjectId;
    use crate::value_objects::{ExperimentId, RunId};
    use serde_json::json;

    fn new_run() -> Run {
        Run::create(
            RunId::new(),
            ProjectId::new(),
            RunKind::ExperimentRun {
                experiment_id: ExperimentId::new(),
                dataset_version_id: None,
                code_ref: None,
                environment_lock: None,
                params: json!({}),
                metrics: json!({}),
                artifacts_prefix: "p/".into(),
            },
            None,
            "alice".into(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn terminal_status_is_frozen() {
        let mut run = new_run();
        transition(&mut run, RunStatus::Succeeded, None, Some(Utc::now())).unwrap();
        assert!(transition(&mut run, RunStatus::Running, None, None).is_err());
    }

    #[test]
    fn unknown_returns_only_to_previous_status() {
        let mut run = new_run();
        transition(&mut run, RunStatus::Running, None, None).unwrap();
        transition(&mut run, RunStatus::Unknown, None, None).unwrap();
        assert!(transition(&mut run, RunStatus::Succeeded, Some(RunStatus::Running), None).is_err());
        transition(&mut run, RunStatus::Running, Some(RunStatus::Running), None).unwrap();
        assert_eq!(run.status(), RunStatus::Running);
    }
}

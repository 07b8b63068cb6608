//! Orchestrates `deletelogicaldrive` end to end.
//!
//! Inventory is read once. Each resolved controller is staged in inventory
//! order and, when it changed, committed with the entity tag from that read
//! and refreshed before the next controller is considered. A declined
//! confirmation ends the run; controllers committed before it stay committed.

use std::io::{self, Write};

use thiserror::Error;
use tracing::info;

use crate::confirm::Confirm;
use crate::error::DriveError;
use crate::inventory::Controller;
use crate::planner::{DeletionPlanner, DeletionRequest, PlanError, StagedController, Staging};
use crate::resolver::resolve_controllers;
use crate::store::ManagementStore;

/// Errors surfaced while deleting logical drives.
#[derive(Debug, Error)]
pub enum DeleteError<StoreError>
where
    StoreError: std::error::Error + 'static,
{
    /// Raised when arguments, the controller reference or a drive token
    /// cannot be resolved.
    #[error(transparent)]
    Selection(#[from] DriveError),
    /// Raised when the controller inventory cannot be read.
    #[error("failed to read controller inventory: {0}")]
    Inventory(#[source] StoreError),
    /// Raised when a staged controller cannot be written.
    #[error("failed to commit {path}: {source}")]
    Commit {
        /// Controller resource path.
        path: String,
        /// Store error.
        #[source]
        source: StoreError,
    },
    /// Raised when a committed controller cannot be re-read.
    #[error("failed to refresh {path}: {source}")]
    Refresh {
        /// Controller resource path.
        path: String,
        /// Store error.
        #[source]
        source: StoreError,
    },
    /// Raised when progress output cannot be written.
    #[error("failed to write progress output: {0}")]
    Output(#[from] io::Error),
}

impl<E: std::error::Error + 'static> From<PlanError> for DeleteError<E> {
    fn from(value: PlanError) -> Self {
        match value {
            PlanError::Selection(err) => Self::Selection(err),
            PlanError::Output(err) => Self::Output(err),
        }
    }
}

/// What happened to one resolved controller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ControllerOutcome {
    /// Changes were written and the resource refreshed.
    Committed,
    /// Nothing changed, so nothing was sent.
    Unchanged,
    /// The operator declined; nothing was sent for this controller.
    Declined,
}

/// Per-controller summary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ControllerReport {
    /// Controller resource path.
    pub path: String,
    /// Result for this controller.
    pub outcome: ControllerOutcome,
    /// Names of the drives staged for deletion.
    pub staged_drives: Vec<String>,
    /// Whether controller tuning was reset.
    pub tuning_reset: bool,
}

/// Summary of a run, one report per controller processed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DeleteOutcome {
    /// Reports in processing order.
    pub controllers: Vec<ControllerReport>,
}

impl DeleteOutcome {
    /// Returns `true` when the operator declined a confirmation.
    #[must_use]
    pub fn declined(&self) -> bool {
        self.controllers
            .iter()
            .any(|report| report.outcome == ControllerOutcome::Declined)
    }

    /// Paths that were committed, in order.
    #[must_use]
    pub fn committed_paths(&self) -> Vec<&str> {
        self.controllers
            .iter()
            .filter(|report| report.outcome == ControllerOutcome::Committed)
            .map(|report| report.path.as_str())
            .collect()
    }
}

/// Runs deletion requests against a management store.
#[derive(Debug)]
pub struct DeleteOrchestrator<S, C, W> {
    store: S,
    confirm: C,
    out: W,
}

impl<S, C, W> DeleteOrchestrator<S, C, W>
where
    S: ManagementStore,
    C: Confirm,
    W: Write,
{
    /// Creates an orchestrator that reads and writes through `store`, asks
    /// `confirm` before each drive, and reports progress to `out`.
    #[must_use]
    pub const fn new(store: S, confirm: C, out: W) -> Self {
        Self {
            store,
            confirm,
            out,
        }
    }

    /// Stages and commits `request` on every controller it selects.
    ///
    /// # Errors
    ///
    /// Returns [`DeleteError::Selection`] when the controller or a drive
    /// token does not resolve, [`DeleteError::Inventory`],
    /// [`DeleteError::Commit`] or [`DeleteError::Refresh`] when the store
    /// fails, and [`DeleteError::Output`] when progress cannot be written.
    pub async fn execute(
        &mut self,
        request: &DeletionRequest,
    ) -> Result<DeleteOutcome, DeleteError<S::Error>> {
        let inventory = self
            .store
            .controllers()
            .await
            .map_err(DeleteError::Inventory)?;
        let targets: Vec<Controller> = resolve_controllers(&request.controller, &inventory)?
            .into_iter()
            .cloned()
            .collect();

        let mut planner = DeletionPlanner::new(&mut self.confirm, &mut self.out, request.force);
        let mut outcome = DeleteOutcome::default();

        for controller in targets {
            let path = controller.odata_id.clone();
            let staged = match planner.stage(controller, &request.selection)? {
                Staging::Declined => {
                    outcome.controllers.push(ControllerReport {
                        path,
                        outcome: ControllerOutcome::Declined,
                        staged_drives: Vec::new(),
                        tuning_reset: false,
                    });
                    return Ok(outcome);
                }
                Staging::Ready(staged) => staged,
            };

            let result = if staged.has_changes() {
                commit_staged(&self.store, &path, &staged).await?;
                ControllerOutcome::Committed
            } else {
                info!(path, "no logical drive changes to commit");
                ControllerOutcome::Unchanged
            };

            outcome.controllers.push(ControllerReport {
                path,
                outcome: result,
                staged_drives: staged.staged_drives,
                tuning_reset: staged.tuning_reset,
            });
        }

        Ok(outcome)
    }
}

async fn commit_staged<S: ManagementStore>(
    store: &S,
    path: &str,
    staged: &StagedController,
) -> Result<(), DeleteError<S::Error>> {
    let commit_error = |source| DeleteError::Commit {
        path: path.to_owned(),
        source,
    };
    let precondition = store.etag(path).await.map_err(commit_error)?;
    store
        .commit(path, &staged.controller, precondition.as_deref())
        .await
        .map_err(commit_error)?;
    info!(
        path,
        drives = staged.staged_drives.len(),
        tuning_reset = staged.tuning_reset,
        "committed logical drive deletion"
    );

    store
        .refresh(path)
        .await
        .map_err(|source| DeleteError::Refresh {
            path: path.to_owned(),
            source,
        })
}

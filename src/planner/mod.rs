//! Decides which drives to mark on a controller and stages the changes.
//!
//! A controller moves from pending into either per-drive marking or an
//! all-clear, and the caller then commits or abandons it. A declined
//! confirmation stops the whole command; an unmatched token stops this
//! controller before anything is sent.

use std::io::{self, Write};

use thiserror::Error;
use tracing::debug;

use crate::confirm::Confirm;
use crate::error::{DriveError, MissingArgument};
use crate::inventory::Controller;
use crate::matcher::{DriveToken, find_drive, parse_drive_list};
use crate::stager;

/// Message written when the operator declines a confirmation.
pub const DECLINED_MESSAGE: &str = "Stopping command without deleting logical drive.";

/// Which drives the operator asked to delete.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DriveSelection {
    /// Every drive on the controller.
    All,
    /// Drives matching these tokens, processed in order.
    Tokens(Vec<DriveToken>),
}

/// A single `deletelogicaldrive` invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeletionRequest {
    /// Controller reference as supplied by the operator.
    pub controller: String,
    /// Drives to delete.
    pub selection: DriveSelection,
    /// Skip confirmation prompts.
    pub force: bool,
}

impl DeletionRequest {
    /// Builds a request from raw command arguments.
    ///
    /// `all` takes precedence over any drive arguments.
    ///
    /// # Errors
    ///
    /// Returns [`DriveError::MissingArgument`] when no drives are given
    /// without `all`, or when the controller reference is missing or blank.
    pub fn from_args(
        controller: Option<&str>,
        drives: &[String],
        all: bool,
        force: bool,
    ) -> Result<Self, DriveError> {
        let selection = if all {
            DriveSelection::All
        } else {
            let tokens = parse_drive_list(drives);
            if tokens.is_empty() {
                return Err(MissingArgument::Drives.into());
            }
            DriveSelection::Tokens(tokens)
        };

        let controller = controller
            .filter(|value| !value.is_empty())
            .ok_or(MissingArgument::Controller)?;

        Ok(Self {
            controller: controller.to_owned(),
            selection,
            force,
        })
    }
}

/// How a controller was staged.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlanMode {
    /// Individual drives carry the delete marker.
    PerDriveMarking,
    /// The drive sequence was emptied.
    AllClear,
}

/// A controller with its changes applied in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct StagedController {
    /// The mutated controller record.
    pub controller: Controller,
    /// How the controller was staged.
    pub mode: PlanMode,
    /// Names of the drives staged for deletion, one entry per confirmed
    /// match. A drive selected twice appears twice.
    pub staged_drives: Vec<String>,
    /// Whether the last-drive tuning reset was applied.
    pub tuning_reset: bool,
}

impl StagedController {
    /// Returns `true` when the controller must be committed.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        match self.mode {
            PlanMode::AllClear => true,
            PlanMode::PerDriveMarking => !self.staged_drives.is_empty(),
        }
    }
}

/// Result of planning one controller.
#[derive(Clone, Debug, PartialEq)]
pub enum Staging {
    /// Changes are staged; commit when [`StagedController::has_changes`].
    Ready(StagedController),
    /// The operator declined; no further controller may be processed.
    Declined,
}

/// Errors raised while planning a controller.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A drive token did not resolve.
    #[error(transparent)]
    Selection(#[from] DriveError),
    /// Progress output could not be written.
    #[error("failed to write progress output: {0}")]
    Output(#[from] io::Error),
}

/// Stages deletions on one controller at a time.
#[derive(Debug)]
pub struct DeletionPlanner<C, W> {
    confirm: C,
    out: W,
    force: bool,
}

impl<C: Confirm, W: Write> DeletionPlanner<C, W> {
    /// Creates a planner that asks `confirm` before each drive unless
    /// `force` is set, and reports progress to `out`.
    #[must_use]
    pub const fn new(confirm: C, out: W, force: bool) -> Self {
        Self {
            confirm,
            out,
            force,
        }
    }

    /// Applies `selection` to `controller`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Selection`] when a token matches no drive and
    /// [`PlanError::Output`] when progress cannot be written.
    pub fn stage(
        &mut self,
        controller: Controller,
        selection: &DriveSelection,
    ) -> Result<Staging, PlanError> {
        match selection {
            DriveSelection::All => Ok(Staging::Ready(Self::stage_all(controller))),
            DriveSelection::Tokens(tokens) => self.stage_tokens(controller, tokens),
        }
    }

    fn stage_all(mut controller: Controller) -> StagedController {
        let staged_drives = controller
            .logical_drives
            .iter()
            .map(|drive| drive.logical_drive_name.clone())
            .collect();
        stager::clear_all(&mut controller);
        debug!(controller = %controller.odata_id, "cleared all logical drives");
        StagedController {
            controller,
            mode: PlanMode::AllClear,
            staged_drives,
            tuning_reset: true,
        }
    }

    fn stage_tokens(
        &mut self,
        mut controller: Controller,
        tokens: &[DriveToken],
    ) -> Result<Staging, PlanError> {
        let original_count = controller.logical_drives.len();
        let mut staged_drives = Vec::new();

        for token in tokens {
            let index = find_drive(token, &controller.logical_drives).ok_or_else(|| {
                DriveError::DriveNotFound {
                    token: token.to_string(),
                    controller: controller.odata_id.clone(),
                }
            })?;
            let name = controller
                .logical_drives
                .get(index)
                .map(|drive| drive.logical_drive_name.clone())
                .unwrap_or_default();

            if !self.force && !self.confirm.confirm(&confirmation_prompt(&name)) {
                writeln!(self.out, "{DECLINED_MESSAGE}")?;
                return Ok(Staging::Declined);
            }

            writeln!(self.out, "Setting logical drive {name} for deletion")?;
            stager::mark_for_deletion(&mut controller, index);
            debug!(
                controller = %controller.odata_id,
                drive = %name,
                position = index + 1,
                "staged logical drive for deletion"
            );
            staged_drives.push(name);
        }

        let tuning_reset = staged_drives.len() == original_count;
        if tuning_reset {
            stager::reset_last_drive(&mut controller);
        }

        Ok(Staging::Ready(StagedController {
            controller,
            mode: PlanMode::PerDriveMarking,
            staged_drives,
            tuning_reset,
        }))
    }
}

fn confirmation_prompt(name: &str) -> String {
    format!("Are you sure you would like to continue deleting drive {name}? (y/n)")
}

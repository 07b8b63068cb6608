//! Core library for the `raidctl` smart storage tool.
//!
//! The crate models HPE smart storage controllers as read from a management
//! processor and implements `deletelogicaldrive`: resolve a controller by
//! index or slot label, match drive tokens, stage per-drive delete markers or
//! an all-drive clear, and commit each changed controller guarded by its
//! entity tag.

pub mod config;
pub mod confirm;
pub mod delete;
pub mod error;
pub mod inventory;
pub mod matcher;
pub mod planner;
pub mod resolver;
pub mod stager;
pub mod store;
pub mod test_support;

pub use config::{ConfigError, DEFAULT_CONTROLLERS_PATH, LoginOverrides, ManagementConfig};
pub use confirm::{AlwaysConfirm, Confirm, ConsoleConfirm};
pub use delete::{
    ControllerOutcome, ControllerReport, DeleteError, DeleteOrchestrator, DeleteOutcome,
};
pub use error::{DriveError, MissingArgument};
pub use inventory::{
    Controller, DELETE_ACTION, DataGuard, DriveAction, LogicalDrive, TUNING_PROPERTY_NAMES,
    Tunable, TuningProperties,
};
pub use matcher::{DriveToken, find_drive, parse_drive_list};
pub use planner::{
    DECLINED_MESSAGE, DeletionPlanner, DeletionRequest, DriveSelection, PlanError, PlanMode,
    StagedController, Staging,
};
pub use resolver::{ControllerRef, resolve_controllers};
pub use store::{HttpStore, ManagementStore, StoreError, StoreFuture};

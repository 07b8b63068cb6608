//! Selection errors raised while resolving controllers and logical drives.

use std::fmt;

use thiserror::Error;

/// Required command argument that was not supplied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MissingArgument {
    /// Neither a drive list nor `--all` was given.
    Drives,
    /// No `--controller` reference was given.
    Controller,
}

impl fmt::Display for MissingArgument {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drives => formatter.write_str("You must include a logical drive to delete."),
            Self::Controller => formatter.write_str("You must include a controller to select."),
        }
    }
}

/// Errors raised by the drive-selection engine.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DriveError {
    /// Raised before any inventory access when a required argument is absent.
    #[error("{0}")]
    MissingArgument(MissingArgument),
    /// Raised when the controller reference matches nothing in inventory.
    #[error("Selected controller not found in the current inventory list.")]
    ControllerNotFound {
        /// Reference exactly as the operator supplied it.
        reference: String,
    },
    /// Raised when a drive token matches no drive on the selected controller.
    #[error("Logical drive {token} not found.")]
    DriveNotFound {
        /// Token exactly as the operator supplied it.
        token: String,
        /// `@odata.id` of the controller that was searched.
        controller: String,
    },
}

impl From<MissingArgument> for DriveError {
    fn from(value: MissingArgument) -> Self {
        Self::MissingArgument(value)
    }
}

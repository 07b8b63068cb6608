//! Resolves operator-supplied drive tokens against a controller's drives.

use std::fmt;

use crate::inventory::LogicalDrive;

/// A drive selector parsed once from operator input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DriveToken {
    /// All-digit token, compared only against 1-based drive positions.
    Position {
        /// Parsed position; `None` when too large to address any drive.
        position: Option<usize>,
        /// The token as typed.
        raw: String,
    },
    /// Any other token, compared against unique identifier then name.
    Label(String),
}

impl DriveToken {
    /// Parses a token. All-digit input becomes a position.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if is_all_digits(raw) {
            Self::Position {
                position: raw.parse().ok(),
                raw: raw.to_owned(),
            }
        } else {
            Self::Label(raw.to_owned())
        }
    }

    /// Returns `true` when this token selects `drive` at 1-based `position`.
    #[must_use]
    pub fn matches(&self, position: usize, drive: &LogicalDrive) -> bool {
        match self {
            Self::Position { position: wanted, .. } => *wanted == Some(position),
            Self::Label(label) => {
                drive.volume_unique_identifier == *label || drive.logical_drive_name == *label
            }
        }
    }
}

impl fmt::Display for DriveToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position { raw, .. } | Self::Label(raw) => formatter.write_str(raw),
        }
    }
}

/// Returns the 0-based index of the first drive `token` selects.
#[must_use]
pub fn find_drive(token: &DriveToken, drives: &[LogicalDrive]) -> Option<usize> {
    drives
        .iter()
        .enumerate()
        .find(|(index, drive)| token.matches(index + 1, drive))
        .map(|(index, _)| index)
}

/// Splits positional arguments into drive tokens.
///
/// A single argument is a comma or comma-space separated list. Several
/// arguments are taken one token each. Empty entries are skipped.
#[must_use]
pub fn parse_drive_list(args: &[String]) -> Vec<DriveToken> {
    match args {
        [single] => single
            .replace(", ", ",")
            .split(',')
            .filter(|raw| !raw.is_empty())
            .map(DriveToken::parse)
            .collect(),
        many => many
            .iter()
            .filter(|raw| !raw.is_empty())
            .map(|raw| DriveToken::parse(raw))
            .collect(),
    }
}

pub(crate) fn is_all_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit())
}

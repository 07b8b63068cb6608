//! Structured controller and logical drive records.
//!
//! Records deserialise from the management API's property maps and serialise
//! back into the PUT body. Properties the engine does not model are kept in
//! `extra` so a round trip never drops data the controller reported.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

mod tuning;

pub use tuning::{TUNING_PROPERTY_NAMES, Tunable, TuningProperties};

/// Action name the controller firmware recognises as "delete this drive".
pub const DELETE_ACTION: &str = "LogicalDriveDelete";

/// Controller safety mode gating destructive drive operations.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "String", into = "String")]
pub enum DataGuard {
    /// Destructive operations are unrestricted.
    Disabled,
    /// Destructive operations are accepted when explicitly requested.
    Permissive,
    /// Destructive operations are rejected.
    Strict,
    /// A mode this tool does not know about, kept verbatim.
    Other(String),
}

impl DataGuard {
    /// Wire representation of the mode.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Disabled => "Disabled",
            Self::Permissive => "Permissive",
            Self::Strict => "Strict",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for DataGuard {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Disabled" => Self::Disabled,
            "Permissive" => Self::Permissive,
            "Strict" => Self::Strict,
            _ => Self::Other(value),
        }
    }
}

impl From<DataGuard> for String {
    fn from(value: DataGuard) -> Self {
        match value {
            DataGuard::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for DataGuard {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Pending actions on a logical drive.
///
/// A reported `Actions` list is kept verbatim so writing the record back
/// does not cancel actions this tool never touched. Marking a drive replaces
/// the list with the delete marker alone.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum DriveAction {
    /// The record carries no `Actions` list.
    #[default]
    None,
    /// The `Actions` list exactly as the controller reported it.
    Reported(Vec<Value>),
    /// The delete marker has been staged.
    MarkedForDeletion,
}

impl DriveAction {
    /// Returns `true` when the record carries no `Actions` list.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns `true` when the list holds the delete marker.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        match self {
            Self::None => false,
            Self::Reported(entries) => entries.iter().any(|entry| {
                entry.get(ACTION_KEY).and_then(Value::as_str) == Some(DELETE_ACTION)
            }),
            Self::MarkedForDeletion => true,
        }
    }
}

const ACTION_KEY: &str = "Action";

impl Serialize for DriveAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_none(),
            Self::Reported(entries) => entries.serialize(serializer),
            Self::MarkedForDeletion => {
                let mut marker = Map::new();
                marker.insert(ACTION_KEY.to_owned(), Value::from(DELETE_ACTION));
                [Value::Object(marker)].serialize(serializer)
            }
        }
    }
}

impl<'de> Deserialize<'de> for DriveAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<Vec<Value>>::deserialize(deserializer)?.map_or(Self::None, Self::Reported))
    }
}

/// A RAID volume exposed by a controller.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct LogicalDrive {
    /// Opaque identifier assigned by the controller.
    #[serde(rename = "VolumeUniqueIdentifier", default)]
    pub volume_unique_identifier: String,
    /// Human-readable drive name.
    #[serde(rename = "LogicalDriveName", default)]
    pub logical_drive_name: String,
    /// Actions pending on the backing system.
    #[serde(
        rename = "Actions",
        default,
        skip_serializing_if = "DriveAction::is_none"
    )]
    pub action: DriveAction,
    /// Properties not modelled by this tool.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogicalDrive {
    /// Creates a drive record with the given identifiers.
    #[must_use]
    pub fn new(volume_unique_identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            volume_unique_identifier: volume_unique_identifier.into(),
            logical_drive_name: name.into(),
            ..Self::default()
        }
    }

    /// Returns `true` when the drive carries the delete marker, whether
    /// staged here or already reported by the controller.
    #[must_use]
    pub fn is_marked_for_deletion(&self) -> bool {
        self.action.is_delete()
    }
}

/// A storage controller and its logical drives.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Controller {
    /// Resource path of the controller's configuration.
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
    /// Physical location, normally containing a slot number.
    #[serde(rename = "Location", default)]
    pub location: String,
    /// Logical drives in controller order; positions are 1-based.
    #[serde(rename = "LogicalDrives", default)]
    pub logical_drives: Vec<LogicalDrive>,
    /// Safety mode for destructive drive operations.
    #[serde(rename = "DataGuard", default, skip_serializing_if = "Option::is_none")]
    pub data_guard: Option<DataGuard>,
    /// Controller-wide tunables.
    #[serde(flatten)]
    pub tuning: TuningProperties,
    /// Properties not modelled by this tool.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Controller {
    /// Creates an empty controller record.
    #[must_use]
    pub fn new(odata_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            odata_id: odata_id.into(),
            location: location.into(),
            ..Self::default()
        }
    }

    /// Appends a logical drive and returns the controller.
    #[must_use]
    pub fn with_drive(mut self, drive: LogicalDrive) -> Self {
        self.logical_drives.push(drive);
        self
    }
}

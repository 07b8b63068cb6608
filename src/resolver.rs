//! Maps a controller reference onto controllers from inventory.

use tracing::debug;

use crate::error::DriveError;
use crate::inventory::Controller;
use crate::matcher::is_all_digits;

const SLOT_MARKER: &str = "slot";

/// How the operator referred to a controller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ControllerRef {
    /// 1-based position in inventory order.
    Index(usize),
    /// Normalised slot label compared against each controller `Location`.
    Slot(String),
}

impl ControllerRef {
    /// Parses a reference. All-digit input is an index; anything else is a
    /// slot label such as `1`, `"Slot1"` or `SLOT 1`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if is_all_digits(raw) {
            return Self::Index(raw.parse().unwrap_or(usize::MAX));
        }
        let lowered = raw.to_lowercase();
        Self::Slot(slot_segment(lowered.trim_matches('"')).to_owned())
    }

    /// Returns every controller this reference selects, in inventory order.
    #[must_use]
    pub fn select<'a>(&self, inventory: &'a [Controller]) -> Vec<&'a Controller> {
        match self {
            Self::Index(0) => Vec::new(),
            Self::Index(index) => inventory.get(index - 1).into_iter().collect(),
            Self::Slot(slot) => inventory
                .iter()
                .filter(|controller| location_slot(&controller.location) == *slot)
                .collect(),
        }
    }
}

/// Resolves `reference` to at least one controller.
///
/// Several controllers may share a slot label; all of them are returned.
///
/// # Errors
///
/// Returns [`DriveError::ControllerNotFound`] when nothing matches.
pub fn resolve_controllers<'a>(
    reference: &str,
    inventory: &'a [Controller],
) -> Result<Vec<&'a Controller>, DriveError> {
    let parsed = ControllerRef::parse(reference);
    let selected = parsed.select(inventory);
    if selected.is_empty() {
        return Err(DriveError::ControllerNotFound {
            reference: reference.to_owned(),
        });
    }
    debug!(
        reference,
        matched = selected.len(),
        "resolved controller reference"
    );
    Ok(selected)
}

fn location_slot(location: &str) -> String {
    slot_segment(&location.to_lowercase()).to_owned()
}

fn slot_segment(lowered: &str) -> &str {
    lowered
        .rsplit(SLOT_MARKER)
        .next()
        .unwrap_or(lowered)
        .trim_start()
}

//! In-memory state transitions applied to a controller before commit.

use tracing::debug;

use crate::inventory::{Controller, DataGuard, DriveAction};

/// Marks the drive at 0-based `index` for deletion and relaxes the data
/// guard. Any reported actions on that drive are replaced. Returns `false`
/// when no drive exists at `index`.
pub fn mark_for_deletion(controller: &mut Controller, index: usize) -> bool {
    let Some(drive) = controller.logical_drives.get_mut(index) else {
        return false;
    };
    drive.action = DriveAction::MarkedForDeletion;
    controller.data_guard = Some(DataGuard::Permissive);
    true
}

/// Drops every logical drive, disables the data guard and applies the
/// last-drive reset.
pub fn clear_all(controller: &mut Controller) {
    controller.logical_drives.clear();
    controller.data_guard = Some(DataGuard::Disabled);
    reset_last_drive(controller);
}

/// Unsets every tuning property the controller reports. Returns how many
/// properties held a value.
pub fn reset_last_drive(controller: &mut Controller) -> usize {
    let cleared = controller.tuning.reset_present();
    debug!(
        controller = %controller.odata_id,
        cleared,
        "reset controller tuning after last logical drive"
    );
    cleared
}

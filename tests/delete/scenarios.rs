//! BDD scenarios for the deletelogicaldrive workflow.

use rstest_bdd_macros::scenario;

use super::test_helpers::{DeleteContext, delete_context};

#[scenario(
    path = "tests/features/delete_logical_drive.feature",
    name = "Delete one drive by name with force"
)]
fn scenario_delete_by_name(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete_logical_drive.feature",
    name = "Delete the only drive by unique identifier"
)]
fn scenario_delete_only_drive(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete_logical_drive.feature",
    name = "Delete every drive on a controller"
)]
fn scenario_delete_all(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete_logical_drive.feature",
    name = "Abort when a later drive token does not match"
)]
fn scenario_unmatched_token(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete_logical_drive.feature",
    name = "Numeric tokens select by position"
)]
fn scenario_numeric_precedence(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete_logical_drive.feature",
    name = "Declining the confirmation leaves the controller untouched"
)]
fn scenario_declined(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete_logical_drive.feature",
    name = "Confirmed drives are staged one by one"
)]
fn scenario_confirmed(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete_logical_drive.feature",
    name = "Unknown controller reference"
)]
fn scenario_unknown_controller(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete_logical_drive.feature",
    name = "Controllers sharing a slot label are processed in order"
)]
fn scenario_shared_slot(delete_context: DeleteContext) {
    let _ = delete_context;
}

#[scenario(
    path = "tests/features/delete_logical_drive.feature",
    name = "A repeated token counts towards the last drive"
)]
fn scenario_repeated_token(delete_context: DeleteContext) {
    let _ = delete_context;
}

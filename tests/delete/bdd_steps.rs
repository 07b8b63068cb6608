//! BDD step definitions for the `deletelogicaldrive` workflow.

use raidctl::test_support::MemoryStore;
use raidctl::{
    Controller, DataGuard, DeleteError, DeleteOrchestrator, DeletionRequest, DriveError,
    StoreError, Tunable,
};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

use super::test_helpers::{DeleteContext, DeleteFailureKind, DeleteResult};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

fn assertion(message: impl Into<String>) -> StepError {
    StepError::Assertion(message.into())
}

#[given("a controller at \"{location}\" with \"{count}\" logical drives")]
fn controller_with_drives(delete_context: &DeleteContext, location: String, count: usize) {
    delete_context.add_controller(&location, count);
}

#[given("drive \"{position}\" on controller \"{index}\" is named \"{name}\"")]
fn rename_drive(
    delete_context: &DeleteContext,
    position: usize,
    index: usize,
    name: String,
) -> Result<(), StepError> {
    let missing = || assertion(format!("no drive {position} on controller {index}"));
    let mut state = delete_context.state.borrow_mut();
    let controller = state
        .controllers
        .get_mut(index.checked_sub(1).ok_or_else(missing)?)
        .ok_or_else(missing)?;
    let drive = controller
        .logical_drives
        .get_mut(position.checked_sub(1).ok_or_else(missing)?)
        .ok_or_else(missing)?;
    drive.logical_drive_name = name;
    Ok(())
}

#[given("the operator answers \"{answers}\"")]
fn operator_answers(delete_context: &DeleteContext, answers: String) {
    for answer in answers.split(',') {
        delete_context.confirm.push_answer(answer.trim() == "y");
    }
}

#[when("I delete drives \"{drives}\" on controller \"{reference}\" with force")]
fn delete_forced(
    delete_context: &DeleteContext,
    drives: String,
    reference: String,
) -> Result<(), StepError> {
    run_delete(delete_context, &reference, &[drives], false, true)
}

#[when("I delete drives \"{drives}\" on controller \"{reference}\" interactively")]
fn delete_confirmed(
    delete_context: &DeleteContext,
    drives: String,
    reference: String,
) -> Result<(), StepError> {
    run_delete(delete_context, &reference, &[drives], false, false)
}

#[when("I delete all drives on controller \"{reference}\"")]
fn delete_all(delete_context: &DeleteContext, reference: String) -> Result<(), StepError> {
    run_delete(delete_context, &reference, &[], true, false)
}

fn run_delete(
    delete_context: &DeleteContext,
    reference: &str,
    drives: &[String],
    all: bool,
    force: bool,
) -> Result<(), StepError> {
    let runtime = Runtime::new().map_err(|err| assertion(err.to_string()))?;
    let store = MemoryStore::new(delete_context.state.borrow().controllers.clone());
    let mut output = Vec::new();

    let result = match DeletionRequest::from_args(Some(reference), drives, all, force) {
        Ok(request) => {
            let mut orchestrator = DeleteOrchestrator::new(
                store.clone(),
                delete_context.confirm.clone(),
                &mut output,
            );
            let outcome = runtime.block_on(orchestrator.execute(&request));
            drop(orchestrator);
            outcome
        }
        Err(err) => Err(DeleteError::Selection(err)),
    };

    let mut state = delete_context.state.borrow_mut();
    state.output = String::from_utf8_lossy(&output).into_owned();
    state.store = Some(store);
    state.result = Some(match result {
        Ok(outcome) => DeleteResult::Success(outcome),
        Err(err) => DeleteResult::Failure {
            kind: failure_kind(&err),
            message: err.to_string(),
        },
    });
    Ok(())
}

const fn failure_kind(err: &DeleteError<StoreError>) -> DeleteFailureKind {
    match err {
        DeleteError::Selection(DriveError::MissingArgument(_)) => {
            DeleteFailureKind::MissingArgument
        }
        DeleteError::Selection(DriveError::ControllerNotFound { .. }) => {
            DeleteFailureKind::ControllerNotFound
        }
        DeleteError::Selection(DriveError::DriveNotFound { .. }) => {
            DeleteFailureKind::DriveNotFound
        }
        DeleteError::Inventory(_)
        | DeleteError::Commit { .. }
        | DeleteError::Refresh { .. }
        | DeleteError::Output(_) => DeleteFailureKind::Store,
    }
}

fn parse_failure_kind(kind: &str) -> Result<DeleteFailureKind, StepError> {
    match kind {
        "missing-argument" => Ok(DeleteFailureKind::MissingArgument),
        "controller-not-found" => Ok(DeleteFailureKind::ControllerNotFound),
        "drive-not-found" => Ok(DeleteFailureKind::DriveNotFound),
        "store" => Ok(DeleteFailureKind::Store),
        _ => Err(assertion(format!("unknown failure kind: {kind}"))),
    }
}

fn stored_controller(
    delete_context: &DeleteContext,
    index: usize,
) -> Result<Controller, StepError> {
    delete_context
        .stored(index)
        .ok_or_else(|| assertion(format!("controller {index} is not in the store")))
}

fn drive_marked(
    delete_context: &DeleteContext,
    position: usize,
    index: usize,
) -> Result<bool, StepError> {
    let controller = stored_controller(delete_context, index)?;
    position
        .checked_sub(1)
        .and_then(|offset| controller.logical_drives.get(offset))
        .map(raidctl::LogicalDrive::is_marked_for_deletion)
        .ok_or_else(|| assertion(format!("no drive {position} on controller {index}")))
}

#[then("the deletion succeeds")]
fn deletion_succeeds(delete_context: &DeleteContext) -> Result<(), StepError> {
    match &delete_context.state.borrow().result {
        Some(DeleteResult::Success(_)) => Ok(()),
        Some(DeleteResult::Failure { message, .. }) => Err(assertion(format!(
            "expected success, got failure: {message}"
        ))),
        None => Err(assertion("missing outcome")),
    }
}

#[then("the deletion fails with \"{kind}\"")]
fn deletion_fails(delete_context: &DeleteContext, kind: String) -> Result<(), StepError> {
    let expected = parse_failure_kind(&kind)?;
    let state = delete_context.state.borrow();
    let Some(DeleteResult::Failure { kind: actual, .. }) = &state.result else {
        return Err(assertion("expected failure outcome"));
    };
    if *actual == expected {
        Ok(())
    } else {
        Err(assertion(format!(
            "expected failure kind {expected:?}, got {actual:?}"
        )))
    }
}

#[then("drive \"{position}\" on controller \"{index}\" is marked for deletion")]
fn drive_is_marked(
    delete_context: &DeleteContext,
    position: usize,
    index: usize,
) -> Result<(), StepError> {
    if drive_marked(delete_context, position, index)? {
        Ok(())
    } else {
        Err(assertion(format!("drive {position} should be marked")))
    }
}

#[then("drive \"{position}\" on controller \"{index}\" is not marked for deletion")]
fn drive_is_not_marked(
    delete_context: &DeleteContext,
    position: usize,
    index: usize,
) -> Result<(), StepError> {
    if drive_marked(delete_context, position, index)? {
        Err(assertion(format!("drive {position} should not be marked")))
    } else {
        Ok(())
    }
}

#[then("controller \"{index}\" data guard is \"{guard}\"")]
fn data_guard_is(
    delete_context: &DeleteContext,
    index: usize,
    guard: String,
) -> Result<(), StepError> {
    let controller = stored_controller(delete_context, index)?;
    let expected = DataGuard::from(guard);
    if controller.data_guard.as_ref() == Some(&expected) {
        Ok(())
    } else {
        Err(assertion(format!(
            "expected data guard {expected}, got {:?}",
            controller.data_guard
        )))
    }
}

#[then("controller \"{index}\" tuning is reset")]
fn tuning_is_reset(delete_context: &DeleteContext, index: usize) -> Result<(), StepError> {
    let controller = stored_controller(delete_context, index)?;
    let tuning = &controller.tuning;
    let reset = tuning.rebuild_priority == Tunable::Unset
        && tuning.expand_priority == Tunable::Unset
        && tuning.read_cache_percent == Tunable::Unset
        && tuning.configured().is_empty();
    if reset {
        Ok(())
    } else {
        Err(assertion(format!(
            "tuning still configured: {:?}",
            tuning.configured()
        )))
    }
}

#[then("controller \"{index}\" tuning is untouched")]
fn tuning_is_untouched(delete_context: &DeleteContext, index: usize) -> Result<(), StepError> {
    let stored = stored_controller(delete_context, index)?;
    let original = delete_context
        .original(index)
        .ok_or_else(|| assertion(format!("controller {index} was never seeded")))?;
    if stored.tuning == original.tuning {
        Ok(())
    } else {
        Err(assertion("tuning properties changed"))
    }
}

#[then("controller \"{index}\" has no logical drives")]
fn has_no_drives(delete_context: &DeleteContext, index: usize) -> Result<(), StepError> {
    let controller = stored_controller(delete_context, index)?;
    if controller.logical_drives.is_empty() {
        Ok(())
    } else {
        Err(assertion(format!(
            "expected no drives, found {}",
            controller.logical_drives.len()
        )))
    }
}

#[then("controller \"{index}\" was not committed")]
fn not_committed(delete_context: &DeleteContext, index: usize) -> Result<(), StepError> {
    let original = delete_context
        .original(index)
        .ok_or_else(|| assertion(format!("controller {index} was never seeded")))?;
    if delete_context
        .committed_paths()
        .contains(&original.odata_id)
    {
        Err(assertion(format!("{} was committed", original.odata_id)))
    } else {
        Ok(())
    }
}

#[then("\"{count}\" controllers were committed")]
fn commit_count(delete_context: &DeleteContext, count: usize) -> Result<(), StepError> {
    let committed = delete_context.committed_paths();
    if committed.len() == count {
        Ok(())
    } else {
        Err(assertion(format!(
            "expected {count} commits, got {committed:?}"
        )))
    }
}

#[then("the output contains \"{text}\"")]
fn output_contains(delete_context: &DeleteContext, text: String) -> Result<(), StepError> {
    let state = delete_context.state.borrow();
    if state.output.contains(&text) {
        Ok(())
    } else {
        Err(assertion(format!(
            "output {:?} does not contain {text:?}",
            state.output
        )))
    }
}

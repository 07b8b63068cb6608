//! Shared fixtures for deletelogicaldrive BDD scenarios.

use std::cell::RefCell;
use std::rc::Rc;

use raidctl::test_support::{MemoryStore, ScriptedConfirm, sample_controller};
use raidctl::{Controller, DEFAULT_CONTROLLERS_PATH, DeleteOutcome};
use rstest::fixture;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeleteFailureKind {
    MissingArgument,
    ControllerNotFound,
    DriveNotFound,
    Store,
}

#[derive(Clone, Debug)]
pub enum DeleteResult {
    Success(DeleteOutcome),
    Failure {
        kind: DeleteFailureKind,
        message: String,
    },
}

#[derive(Debug, Default)]
pub struct DeleteState {
    pub controllers: Vec<Controller>,
    pub store: Option<MemoryStore>,
    pub result: Option<DeleteResult>,
    pub output: String,
}

/// Scenario state shared by every step through interior mutability.
#[derive(Clone, Debug, Default)]
pub struct DeleteContext {
    pub state: Rc<RefCell<DeleteState>>,
    pub confirm: ScriptedConfirm,
}

impl DeleteContext {
    pub fn add_controller(&self, location: &str, drives: usize) {
        let mut state = self.state.borrow_mut();
        let position = state.controllers.len() + 1;
        let path = format!("{DEFAULT_CONTROLLERS_PATH}/{position}/");
        state
            .controllers
            .push(sample_controller(&path, location, drives));
    }

    pub fn original(&self, index: usize) -> Option<Controller> {
        self.state
            .borrow()
            .controllers
            .get(index.checked_sub(1)?)
            .cloned()
    }

    /// Controller `index` as the store now holds it.
    pub fn stored(&self, index: usize) -> Option<Controller> {
        let state = self.state.borrow();
        let store = state.store.as_ref()?;
        store.snapshot().get(index.checked_sub(1)?).cloned()
    }

    pub fn committed_paths(&self) -> Vec<String> {
        self.state
            .borrow()
            .store
            .as_ref()
            .map(|store| store.commits().into_iter().map(|commit| commit.path).collect())
            .unwrap_or_default()
    }
}

#[fixture]
pub fn delete_context() -> DeleteContext {
    DeleteContext::default()
}

//! Test support utilities shared across unit and integration tests.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::env;
use std::ffi::OsString;
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, MutexGuard};

use crate::confirm::Confirm;
use crate::inventory::{Controller, DataGuard, LogicalDrive, Tunable};
use crate::store::{ManagementStore, StoreError, StoreFuture};

/// A commit observed by [`MemoryStore`].
#[derive(Clone, Debug, PartialEq)]
pub struct CommitRecord {
    /// Resource path written.
    pub path: String,
    /// Body sent for the resource.
    pub controller: Controller,
    /// Entity tag supplied as the precondition.
    pub precondition: Option<String>,
}

#[derive(Debug, Default)]
struct MemoryState {
    controllers: Vec<Controller>,
    versions: HashMap<String, u64>,
    recorded: HashMap<String, String>,
    commits: Vec<CommitRecord>,
    refreshes: Vec<String>,
    inventory_failure: Option<StoreError>,
    commit_failures: HashMap<String, StoreError>,
}

impl MemoryState {
    fn version(&self, path: &str) -> u64 {
        self.versions.get(path).copied().unwrap_or(1)
    }

    fn record(&mut self, path: &str) {
        let tag = format_etag(self.version(path));
        self.recorded.insert(path.to_owned(), tag);
    }
}

/// In-memory controller inventory with entity tags.
///
/// Clones share state so tests can inspect what an orchestrator sent after
/// handing it a copy. Tags take the form `W/"<n>"` and advance on every
/// accepted commit. Like the HTTP store, [`ManagementStore::etag`] answers
/// with the tag seen by the last read of a path.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Creates a store seeded with `controllers` in inventory order.
    #[must_use]
    pub fn new(controllers: Vec<Controller>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                controllers,
                ..MemoryState::default()
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulates another client modifying `path`.
    pub fn bump(&self, path: &str) {
        let mut state = self.lock();
        let next = state.version(path) + 1;
        state.versions.insert(path.to_owned(), next);
    }

    /// Makes the next inventory read fail with `error`.
    pub fn fail_inventory_with(&self, error: StoreError) {
        self.lock().inventory_failure = Some(error);
    }

    /// Makes commits to `path` fail with `error`.
    pub fn fail_commits_to(&self, path: &str, error: StoreError) {
        self.lock().commit_failures.insert(path.to_owned(), error);
    }

    /// Returns every commit accepted so far.
    #[must_use]
    pub fn commits(&self) -> Vec<CommitRecord> {
        self.lock().commits.clone()
    }

    /// Returns every refreshed path in order.
    #[must_use]
    pub fn refreshes(&self) -> Vec<String> {
        self.lock().refreshes.clone()
    }

    /// Returns the stored controllers.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Controller> {
        self.lock().controllers.clone()
    }
}

impl ManagementStore for MemoryStore {
    type Error = StoreError;

    fn controllers(&self) -> StoreFuture<'_, Vec<Controller>, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            if let Some(error) = state.inventory_failure.take() {
                return Err(error);
            }
            let paths: Vec<String> = state
                .controllers
                .iter()
                .map(|controller| controller.odata_id.clone())
                .collect();
            for path in &paths {
                state.record(path);
            }
            Ok(state.controllers.clone())
        })
    }

    fn etag<'a>(&'a self, path: &'a str) -> StoreFuture<'a, Option<String>, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            if !state.recorded.contains_key(path) {
                state.record(path);
            }
            Ok(state.recorded.get(path).cloned())
        })
    }

    fn commit<'a>(
        &'a self,
        path: &'a str,
        controller: &'a Controller,
        precondition: Option<&'a str>,
    ) -> StoreFuture<'a, (), Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            if let Some(error) = state.commit_failures.get(path) {
                return Err(error.clone());
            }
            let current = format_etag(state.version(path));
            if precondition.is_some_and(|tag| tag != current) {
                return Err(StoreError::PreconditionFailed {
                    path: path.to_owned(),
                });
            }

            state.commits.push(CommitRecord {
                path: path.to_owned(),
                controller: controller.clone(),
                precondition: precondition.map(str::to_owned),
            });
            if let Some(stored) = state
                .controllers
                .iter_mut()
                .find(|stored| stored.odata_id == path)
            {
                stored.clone_from(controller);
            }
            let next = state.version(path) + 1;
            state.versions.insert(path.to_owned(), next);
            state.recorded.remove(path);
            Ok(())
        })
    }

    fn refresh<'a>(&'a self, path: &'a str) -> StoreFuture<'a, (), Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.record(path);
            state.refreshes.push(path.to_owned());
            Ok(())
        })
    }
}

fn format_etag(version: u64) -> String {
    format!("W/\"{version}\"")
}

/// Confirmation double that replays scripted answers in FIFO order.
///
/// An exhausted script answers `false`. Clones share the script and the
/// recorded prompts.
#[derive(Clone, Debug, Default)]
pub struct ScriptedConfirm {
    answers: Rc<RefCell<VecDeque<bool>>>,
    prompts: Rc<RefCell<Vec<String>>>,
}

impl ScriptedConfirm {
    /// Creates a double that will give `answers` in order.
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Rc::new(RefCell::new(answers.into_iter().collect())),
            prompts: Rc::default(),
        }
    }

    /// Queues another answer.
    pub fn push_answer(&self, answer: bool) {
        self.answers.borrow_mut().push_back(answer);
    }

    /// Returns every prompt shown so far.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.borrow_mut().push(prompt.to_owned());
        self.answers.borrow_mut().pop_front().unwrap_or(false)
    }
}

/// Builds a controller at `path` with `drives` logical drives named
/// `drive1`, `drive2`, … and identifiers `LD-0001`, `LD-0002`, ….
///
/// The data guard starts as `Strict` and three tuning properties are set so
/// last-drive resets are observable.
#[must_use]
pub fn sample_controller(path: &str, location: &str, drives: usize) -> Controller {
    let mut controller = Controller::new(path, location);
    controller.logical_drives = (1..=drives)
        .map(|n| LogicalDrive::new(format!("LD-{n:04}"), format!("drive{n}")))
        .collect();
    controller.data_guard = Some(DataGuard::Strict);
    controller.tuning.rebuild_priority = Tunable::Value(String::from("High"));
    controller.tuning.expand_priority = Tunable::Value(String::from("Medium"));
    controller.tuning.read_cache_percent = Tunable::Value(10);
    controller
}

/// Global mutex used to serialise environment mutation in tests.
pub static ENV_LOCK: AsyncMutex<()> = AsyncMutex::const_new(());

/// Guard that holds the env mutex and restores variables on drop.
pub struct EnvGuard {
    previous: Vec<(String, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Sets and removes environment variables while holding a global mutex.
    ///
    /// A `None` value removes the variable for the guard's lifetime.
    pub async fn set_vars(pairs: &[(&str, Option<&str>)]) -> Self {
        debug_assert!(
            {
                let mut seen = BTreeSet::new();
                pairs.iter().all(|(key, _)| seen.insert(*key))
            },
            "duplicate environment variable keys passed to EnvGuard::set_vars"
        );

        let guard = ENV_LOCK.lock().await;
        let mut previous = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            previous.push(((*key).to_owned(), env::var_os(key)));
            // SAFETY: Environment mutation is serialised by `ENV_LOCK`, preventing races.
            unsafe {
                match value {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }

        Self {
            previous,
            _guard: guard,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in &self.previous {
            // SAFETY: Environment mutation is serialised by holding `_guard`.
            unsafe {
                match old {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }
    }
}

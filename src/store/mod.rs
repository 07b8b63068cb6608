//! Access to the management processor's controller resources.
//!
//! The orchestrator reads inventory, commits mutated controllers guarded by
//! an entity tag, and refreshes each committed path through this trait.

use std::future::Future;
use std::pin::Pin;

use crate::inventory::Controller;

mod error;
mod http;

pub use error::StoreError;
pub use http::HttpStore;

/// Future returned by store operations.
pub type StoreFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Inventory accessor and commit gateway for smart storage controllers.
pub trait ManagementStore {
    /// Store specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns every controller in inventory order.
    fn controllers(&self) -> StoreFuture<'_, Vec<Controller>, Self::Error>;

    /// Returns the entity tag of `path` as last read, if the resource has one.
    fn etag<'a>(&'a self, path: &'a str) -> StoreFuture<'a, Option<String>, Self::Error>;

    /// Replaces the resource at `path` with `controller`. When `precondition`
    /// is set the write only succeeds if the resource still carries that tag.
    fn commit<'a>(
        &'a self,
        path: &'a str,
        controller: &'a Controller,
        precondition: Option<&'a str>,
    ) -> StoreFuture<'a, (), Self::Error>;

    /// Re-reads `path` so later reads observe the committed state.
    fn refresh<'a>(&'a self, path: &'a str) -> StoreFuture<'a, (), Self::Error>;
}

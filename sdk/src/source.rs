use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::RepoResult;

/// A read-only view of one labeled repository snapshot.
///
/// Paths are repository-relative (`web.yml`, `common/logback.xml`). The
/// snapshot must stay consistent for its lifetime even if the backing store
/// is refreshed concurrently.
#[async_trait]
pub trait Snapshot: Send + Sync {
    /// Deterministic existence check for a regular file.
    async fn exists(&self, path: &str) -> bool;

    /// Read the full contents of a file.
    async fn read(&self, path: &str) -> RepoResult<Bytes>;

    /// List the file names directly under a directory, sorted.
    async fn list(&self, dir: &str) -> RepoResult<Vec<String>>;
}

/// A label-addressable, hierarchical configuration store.
///
/// Implementations must be safe for fully concurrent readers; every request
/// pins its own snapshot and the engine never writes.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Pin a read-consistent snapshot for `label`.
    ///
    /// Fails with `LabelNotFound` when the label does not resolve to a
    /// snapshot.
    async fn snapshot(&self, label: &str) -> RepoResult<Arc<dyn Snapshot>>;
}

#[async_trait]
impl<S: ConfigSource + ?Sized> ConfigSource for Box<S> {
    async fn snapshot(&self, label: &str) -> RepoResult<Arc<dyn Snapshot>> {
        (**self).snapshot(label).await
    }
}

#[async_trait]
impl<S: ConfigSource + ?Sized> ConfigSource for Arc<S> {
    async fn snapshot(&self, label: &str) -> RepoResult<Arc<dyn Snapshot>> {
        (**self).snapshot(label).await
    }
}

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use confserve_sdk::{ConfigSource, RepoError, RepoResult, Snapshot};

/// In-memory store for tests and embedding: label -> path -> bytes.
#[derive(Default)]
pub struct MemoryRepository {
    labels: RwLock<HashMap<String, HashMap<String, Bytes>>>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file under a label, replacing any previous content.
    pub fn put(&self, label: &str, path: &str, content: impl Into<Bytes>) {
        let mut labels = self.labels.write().unwrap();
        labels
            .entry(label.to_string())
            .or_default()
            .insert(normalize(path), content.into());
    }

    /// Builder-style `put` for seeding.
    #[must_use]
    pub fn with_file(self, label: &str, path: &str, content: impl Into<Bytes>) -> Self {
        self.put(label, path, content);
        self
    }
}

fn normalize(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}

#[async_trait]
impl ConfigSource for MemoryRepository {
    async fn snapshot(&self, label: &str) -> RepoResult<Arc<dyn Snapshot>> {
        let labels = self.labels.read().unwrap();
        // Copy-on-read: the snapshot stays stable if the store is mutated
        // while a request is in flight.
        let files = labels
            .get(label)
            .cloned()
            .ok_or_else(|| RepoError::label_not_found(label))?;
        Ok(Arc::new(MemorySnapshot { files }))
    }
}

struct MemorySnapshot {
    files: HashMap<String, Bytes>,
}

#[async_trait]
impl Snapshot for MemorySnapshot {
    async fn exists(&self, path: &str) -> bool {
        self.files.contains_key(&normalize(path))
    }

    async fn read(&self, path: &str) -> RepoResult<Bytes> {
        self.files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| RepoError::file_not_found(path))
    }

    async fn list(&self, dir: &str) -> RepoResult<Vec<String>> {
        let dir = normalize(dir);
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };

        let mut names: Vec<String> = self
            .files
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(str::to_string)
            .collect();
        names.sort();
        Ok(names)
    }
}

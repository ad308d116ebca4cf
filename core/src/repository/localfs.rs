use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use confserve_sdk::{ConfigSource, RepoError, RepoResult, Snapshot};

/// Filesystem-backed store: one subdirectory per label under `root`.
///
/// A snapshot pins the label's directory at lookup time; the directory is
/// expected to be an immutable checkout (refresh by swapping directories,
/// not by mutating one in place).
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl AsRef<Path>) -> RepoResult<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.exists() {
            return Err(RepoError::internal(format!(
                "repository root does not exist: {}",
                root.display()
            )));
        }
        if !root.is_dir() {
            return Err(RepoError::internal(format!(
                "repository root is not a directory: {}",
                root.display()
            )));
        }

        // Normalize symlinks to make `starts_with` comparisons reliable.
        let root = root
            .canonicalize()
            .map_err(|e| RepoError::internal(format!("failed to canonicalize root: {e}")))?;

        Ok(Self { root })
    }
}

#[async_trait]
impl ConfigSource for LocalRepository {
    async fn snapshot(&self, label: &str) -> RepoResult<Arc<dyn Snapshot>> {
        validate_label(label)?;
        let dir = self.root.join(label);
        if !dir.is_dir() {
            return Err(RepoError::label_not_found(label));
        }
        Ok(Arc::new(LocalSnapshot { root: dir }))
    }
}

struct LocalSnapshot {
    root: PathBuf,
}

impl LocalSnapshot {
    fn resolve(&self, path: &str) -> RepoResult<PathBuf> {
        let rel = Path::new(path.trim_start_matches('/'));
        for component in rel.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => {
                    return Err(RepoError::invalid_argument(format!(
                        "path escapes repository: {path}"
                    )))
                }
            }
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl Snapshot for LocalSnapshot {
    async fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.is_file())
    }

    async fn read(&self, path: &str) -> RepoResult<Bytes> {
        let full = self.resolve(path)?;
        fs::read(&full)
            .map(Bytes::from)
            .map_err(|e| map_io_error(&e, path))
    }

    async fn list(&self, dir: &str) -> RepoResult<Vec<String>> {
        let full = self.resolve(dir)?;
        let entries = fs::read_dir(&full).map_err(|e| map_io_error(&e, dir))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RepoError::internal(e.to_string()))?;
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }
}

/// Labels are single path segments; anything else fails before storage is
/// touched.
fn validate_label(label: &str) -> RepoResult<()> {
    if label.is_empty() || label.contains('/') || label.contains('\\') || label.contains("..") {
        return Err(RepoError::label_not_found(label));
    }
    Ok(())
}

fn map_io_error(err: &std::io::Error, path: &str) -> RepoError {
    match err.kind() {
        std::io::ErrorKind::NotFound => RepoError::file_not_found(path),
        _ => RepoError::internal(format!("{path}: {err}")),
    }
}

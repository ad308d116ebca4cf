//! Raw-file resolution with the same profile/application layering as the
//! property-source engine.

use std::sync::Arc;

use confserve_sdk::{ConfigSource, RepoError, RepoResult, ResolvedFile};

use crate::resolver::DEFAULT_PROFILE;

pub struct FileResolver {
    source: Arc<dyn ConfigSource>,
}

impl FileResolver {
    #[must_use]
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        Self { source }
    }

    /// Return the first matching file's exact bytes.
    ///
    /// The search walks the same layers as property resolution — per
    /// profile (last-listed first) the application-directory variant, then
    /// the root variant, then the unprofiled pair — and stops at the first
    /// hit. No match is `FileNotFound`, a 404 at the boundary rather than a
    /// server fault.
    pub async fn resolve_file(
        &self,
        application: &str,
        profiles: &[String],
        label: &str,
        path: &str,
    ) -> RepoResult<ResolvedFile> {
        let rel = path.trim_start_matches('/');
        if rel.is_empty() {
            return Err(RepoError::invalid_argument("empty file path"));
        }

        let snapshot = self.source.snapshot(label).await?;
        for candidate in file_candidates(application, profiles, rel) {
            if snapshot.exists(&candidate).await {
                let body = snapshot.read(&candidate).await?;
                return Ok(ResolvedFile {
                    body,
                    content_type: content_type_for(rel),
                });
            }
        }
        Err(RepoError::file_not_found(rel))
    }
}

fn file_candidates(application: &str, profiles: &[String], path: &str) -> Vec<String> {
    let fallback = [DEFAULT_PROFILE.to_string()];
    let profiles = if profiles.is_empty() {
        &fallback[..]
    } else {
        profiles
    };

    let mut candidates = Vec::with_capacity(profiles.len() * 2 + 2);
    for profile in profiles.iter().rev() {
        let suffixed = profile_suffixed(path, profile);
        candidates.push(format!("{application}/{suffixed}"));
        candidates.push(suffixed);
    }
    candidates.push(format!("{application}/{path}"));
    candidates.push(path.to_string());
    candidates
}

/// `logback.xml` + `dc` -> `logback-dc.xml`; extension-less names get a
/// bare suffix.
fn profile_suffixed(path: &str, profile: &str) -> String {
    let (dir, name) = match path.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, path),
    };
    let suffixed = match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}-{profile}.{ext}"),
        None => format!("{name}-{profile}"),
    };
    match dir {
        Some(dir) => format!("{dir}/{suffixed}"),
        None => suffixed,
    }
}

/// Content type inferred from the file name; it never affects resolution
/// order.
#[must_use]
pub fn content_type_for(path: &str) -> &'static str {
    let name = path.rsplit('/').next().unwrap_or(path);
    let ext = name.rsplit_once('.').map_or("", |(_, ext)| ext);
    match ext {
        "json" => "application/json",
        "yml" | "yaml" => "application/x-yaml",
        "xml" => "application/xml",
        "html" | "htm" => "text/html; charset=utf-8",
        "properties" | "txt" | "conf" | "cfg" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

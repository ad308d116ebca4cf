//! The resolution engine: turns (application, profiles, label) into an
//! ordered list of property sources.

use std::sync::Arc;

use confserve_sdk::{ConfigSource, FailedSource, RepoResult, Resolution, Snapshot};

use crate::loader::{self, SourceFormat};

/// Extension probe order for property-file candidates.
const EXTENSIONS: [&str; 4] = ["yml", "yaml", "properties", "json"];

/// Substituted for an empty profile list.
pub const DEFAULT_PROFILE: &str = "default";

pub struct Resolver {
    source: Arc<dyn ConfigSource>,
}

impl Resolver {
    #[must_use]
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        Self { source }
    }

    /// Resolve the layered property sources for a request.
    ///
    /// Sources come back most-specific first: the last-listed profile's
    /// candidates, then earlier profiles, then the unprofiled defaults.
    /// Missing candidates are skipped silently; a candidate that exists but
    /// fails to parse is recorded on the resolution and never aborts its
    /// siblings. No candidates at all yields an empty resolution, not an
    /// error.
    pub async fn resolve(
        &self,
        application: &str,
        profiles: &[String],
        label: &str,
    ) -> RepoResult<Resolution> {
        let snapshot = self.source.snapshot(label).await?;

        let mut resolution = Resolution::new();
        for stem in candidate_stems(application, profiles) {
            let Some(path) = first_existing(&*snapshot, &stem).await else {
                continue;
            };
            let bytes = snapshot.read(&path).await?;
            let Some(format) = SourceFormat::from_path(&path) else {
                continue;
            };
            match loader::load(&path, &bytes, format) {
                Ok(source) => resolution.sources.push(source),
                Err(err) => {
                    tracing::warn!(source = %path, error = %err, "skipping malformed property source");
                    resolution.failures.push(FailedSource {
                        name: path,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(resolution)
    }
}

/// Candidate stems (paths without extension), most specific first.
///
/// Profiles are walked in reverse request order so the last-listed profile
/// overlays the earlier ones. Within one profile the application-directory
/// file precedes the application file, which precedes the global file. The
/// unprofiled defaults always come last. Duplicate profiles are kept as
/// supplied.
fn candidate_stems(application: &str, profiles: &[String]) -> Vec<String> {
    let fallback = [DEFAULT_PROFILE.to_string()];
    let profiles = if profiles.is_empty() {
        &fallback[..]
    } else {
        profiles
    };

    let mut stems = Vec::with_capacity(profiles.len() * 3 + 3);
    for profile in profiles.iter().rev() {
        stems.push(format!("{application}/{application}-{profile}"));
        stems.push(format!("{application}-{profile}"));
        stems.push(format!("application-{profile}"));
    }
    stems.push(format!("{application}/{application}"));
    stems.push(application.to_string());
    stems.push("application".to_string());
    stems
}

async fn first_existing(snapshot: &dyn Snapshot, stem: &str) -> Option<String> {
    for ext in EXTENSIONS {
        let path = format!("{stem}.{ext}");
        if snapshot.exists(&path).await {
            return Some(path);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use confserve_sdk::PropertyValue;

    fn seeded() -> MemoryRepository {
        MemoryRepository::new()
            .with_file("master", "application.yml", "info:\n  foo: bar\n")
            .with_file(
                "master",
                "web.yml",
                "server:\n  port: 9080\ntype: normal\nsome:\n  property: \"123\"\n",
            )
            .with_file("master", "web-dc.yml", "server:\n  port: 8080\ntype: dc\n")
            .with_file("master", "web-k8s.yml", "server:\n  port: 8080\ntype: k8s\n")
    }

    fn resolver(repo: MemoryRepository) -> Resolver {
        Resolver::new(Arc::new(repo))
    }

    fn profiles(names: &[&str]) -> Vec<String> {
        names.iter().map(|p| (*p).to_string()).collect()
    }

    #[tokio::test]
    async fn default_profile_resolves_application_file_first() {
        let resolver = resolver(seeded());
        let resolution = resolver
            .resolve("web", &profiles(&["default"]), "master")
            .await
            .unwrap();

        assert_eq!(resolution.source_names(), ["web.yml", "application.yml"]);
        let first = &resolution.sources[0];
        assert_eq!(first.get("server.port"), Some(&PropertyValue::from(9080)));
        assert_eq!(first.get("type"), Some(&PropertyValue::from("normal")));
        assert_eq!(first.get("some.property"), Some(&PropertyValue::from("123")));
    }

    #[tokio::test]
    async fn empty_profile_list_means_default() {
        let resolver = resolver(seeded());
        let explicit = resolver
            .resolve("web", &profiles(&["default"]), "master")
            .await
            .unwrap();
        let implicit = resolver.resolve("web", &[], "master").await.unwrap();
        assert_eq!(explicit, implicit);
    }

    #[tokio::test]
    async fn profile_overlay_precedes_the_default() {
        let resolver = resolver(seeded());
        let resolution = resolver
            .resolve("web", &profiles(&["dc"]), "master")
            .await
            .unwrap();

        assert_eq!(
            resolution.source_names(),
            ["web-dc.yml", "web.yml", "application.yml"]
        );
        assert_eq!(
            resolution.sources[0].get("type"),
            Some(&PropertyValue::from("dc"))
        );
        assert_eq!(
            resolution.sources[0].get("server.port"),
            Some(&PropertyValue::from(8080))
        );
        assert_eq!(
            resolution.sources[1].get("type"),
            Some(&PropertyValue::from("normal"))
        );
    }

    #[tokio::test]
    async fn last_listed_profile_wins() {
        let resolver = resolver(seeded());
        let resolution = resolver
            .resolve("web", &profiles(&["k8s", "dc"]), "master")
            .await
            .unwrap();

        assert_eq!(
            resolution.source_names(),
            ["web-dc.yml", "web-k8s.yml", "web.yml", "application.yml"]
        );
        assert_eq!(
            resolution.sources[0].get("type"),
            Some(&PropertyValue::from("dc"))
        );
        assert_eq!(
            resolution.sources[1].get("type"),
            Some(&PropertyValue::from("k8s"))
        );
        assert_eq!(
            resolution.sources[2].get("type"),
            Some(&PropertyValue::from("normal"))
        );
    }

    #[tokio::test]
    async fn reserved_default_application_matches_shared_files() {
        let resolver = resolver(seeded());
        let resolution = resolver
            .resolve("default", &profiles(&["default"]), "master")
            .await
            .unwrap();

        assert_eq!(resolution.source_names(), ["application.yml"]);
        assert_eq!(
            resolution.sources[0].get("info.foo"),
            Some(&PropertyValue::from("bar"))
        );
    }

    #[tokio::test]
    async fn application_directory_overlay_is_most_specific() {
        let repo = seeded().with_file("master", "web/web-dc.yml", "type: dc-dir\n");
        let resolver = resolver(repo);
        let resolution = resolver
            .resolve("web", &profiles(&["dc"]), "master")
            .await
            .unwrap();

        assert_eq!(
            resolution.source_names(),
            ["web/web-dc.yml", "web-dc.yml", "web.yml", "application.yml"]
        );
    }

    #[tokio::test]
    async fn duplicate_profiles_are_processed_independently() {
        let resolver = resolver(seeded());
        let resolution = resolver
            .resolve("web", &profiles(&["dc", "dc"]), "master")
            .await
            .unwrap();

        assert_eq!(
            resolution.source_names(),
            ["web-dc.yml", "web-dc.yml", "web.yml", "application.yml"]
        );
    }

    #[tokio::test]
    async fn extension_probe_order_prefers_yml() {
        let repo = MemoryRepository::new()
            .with_file("master", "web.properties", "type=props\n")
            .with_file("master", "web.yml", "type: yaml\n");
        let resolver = resolver(repo);
        let resolution = resolver.resolve("web", &[], "master").await.unwrap();

        assert_eq!(resolution.source_names(), ["web.yml"]);
    }

    #[tokio::test]
    async fn no_candidates_is_an_empty_resolution() {
        let repo = MemoryRepository::new().with_file("master", "other.yml", "x: 1\n");
        let resolver = resolver(repo);
        let resolution = resolver
            .resolve("ghost", &profiles(&["dc"]), "master")
            .await
            .unwrap();

        assert!(resolution.is_empty());
    }

    #[tokio::test]
    async fn unknown_label_propagates() {
        let resolver = resolver(seeded());
        let err = resolver.resolve("web", &[], "develop").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn malformed_overlay_is_surfaced_and_siblings_survive() {
        let repo = seeded().with_file("master", "web-bad.yml", "a: [1,\n");
        let resolver = resolver(repo);
        let resolution = resolver
            .resolve("web", &profiles(&["bad"]), "master")
            .await
            .unwrap();

        assert_eq!(resolution.source_names(), ["web.yml", "application.yml"]);
        assert_eq!(resolution.failures.len(), 1);
        assert_eq!(resolution.failures[0].name, "web-bad.yml");
        assert!(resolution.failures[0].reason.contains("web-bad.yml"));
    }

    #[tokio::test]
    async fn resolution_is_idempotent() {
        let resolver = resolver(seeded());
        let first = resolver
            .resolve("web", &profiles(&["k8s", "dc"]), "master")
            .await
            .unwrap();
        let second = resolver
            .resolve("web", &profiles(&["k8s", "dc"]), "master")
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn candidate_stems_order() {
        let stems = candidate_stems("web", &profiles(&["k8s", "dc"]));
        assert_eq!(
            stems,
            [
                "web/web-dc",
                "web-dc",
                "application-dc",
                "web/web-k8s",
                "web-k8s",
                "application-k8s",
                "web/web",
                "web",
                "application",
            ]
        );
    }
}

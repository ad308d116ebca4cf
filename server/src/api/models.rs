use confserve_sdk::{FailedSource, PropertySource, PropertyValue, Resolution};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

/// Environment document returned by the property-source routes. Sources are
/// listed in precedence order; consumers flatten them with earlier entries
/// winning on key conflicts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentResponse {
    pub name: String,
    pub profiles: Vec<String>,
    pub label: String,
    pub property_sources: Vec<PropertySourceModel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_sources: Vec<FailedSourceModel>,
}

impl EnvironmentResponse {
    #[must_use]
    pub fn new(
        name: String,
        profiles: Vec<String>,
        label: String,
        resolution: Resolution,
    ) -> Self {
        Self {
            name,
            profiles,
            label,
            property_sources: resolution.sources.into_iter().map(Into::into).collect(),
            failed_sources: resolution.failures.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PropertySourceModel {
    pub name: String,
    pub source: IndexMap<String, PropertyValue>,
}

impl From<PropertySource> for PropertySourceModel {
    fn from(source: PropertySource) -> Self {
        Self {
            name: source.name,
            source: source.source,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FailedSourceModel {
    pub name: String,
    pub reason: String,
}

impl From<FailedSource> for FailedSourceModel {
    fn from(failure: FailedSource) -> Self {
        Self {
            name: failure.name,
            reason: failure.reason,
        }
    }
}

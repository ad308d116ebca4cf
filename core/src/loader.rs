//! Property source loader: parses one candidate file into an ordered,
//! dotted-key mapping with typed values.

use confserve_sdk::{PropertySource, PropertyValue, RepoError, RepoResult};
use indexmap::IndexMap;

/// Supported property-file syntaxes, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Properties,
    Json,
}

impl SourceFormat {
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "yml" | "yaml" => Some(Self::Yaml),
            "properties" => Some(Self::Properties),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        path.rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
    }
}

/// Parse one candidate file.
///
/// Nested structures flatten to dotted keys (`server: {port: 8080}` becomes
/// `server.port`), sequences to indexed keys (`hosts[0]`). Scalars keep
/// their syntactic type.
pub fn load(name: &str, bytes: &[u8], format: SourceFormat) -> RepoResult<PropertySource> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| RepoError::parse(name, format!("invalid utf-8: {e}")))?;

    let mut out = IndexMap::new();
    match format {
        SourceFormat::Yaml => {
            let value: serde_yaml::Value =
                serde_yaml::from_str(text).map_err(|e| RepoError::parse(name, e.to_string()))?;
            match value {
                serde_yaml::Value::Null => {}
                serde_yaml::Value::Mapping(_) => flatten_yaml(name, "", &value, &mut out)?,
                _ => {
                    return Err(RepoError::parse(name, "top-level value must be a mapping"));
                }
            }
        }
        SourceFormat::Json => {
            let value: serde_json::Value =
                serde_json::from_str(text).map_err(|e| RepoError::parse(name, e.to_string()))?;
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::Object(_) => flatten_json("", &value, &mut out),
                _ => {
                    return Err(RepoError::parse(name, "top-level value must be an object"));
                }
            }
        }
        SourceFormat::Properties => parse_properties(text, &mut out),
    }

    Ok(PropertySource {
        name: name.to_string(),
        source: out,
    })
}

fn flatten_yaml(
    name: &str,
    prefix: &str,
    value: &serde_yaml::Value,
    out: &mut IndexMap<String, PropertyValue>,
) -> RepoResult<()> {
    use serde_yaml::Value;

    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                let key = yaml_key(name, k)?;
                flatten_yaml(name, &join_key(prefix, &key), v, out)?;
            }
        }
        Value::Sequence(seq) => {
            for (i, v) in seq.iter().enumerate() {
                flatten_yaml(name, &format!("{prefix}[{i}]"), v, out)?;
            }
        }
        Value::Tagged(tagged) => flatten_yaml(name, prefix, &tagged.value, out)?,
        Value::Null => {
            // An empty value is an empty string property, not an absence.
            out.insert(prefix.to_string(), PropertyValue::String(String::new()));
        }
        Value::Bool(b) => {
            out.insert(prefix.to_string(), PropertyValue::Bool(*b));
        }
        Value::Number(n) => {
            out.insert(prefix.to_string(), yaml_number(n));
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), PropertyValue::String(s.clone()));
        }
    }
    Ok(())
}

fn flatten_json(
    prefix: &str,
    value: &serde_json::Value,
    out: &mut IndexMap<String, PropertyValue>,
) {
    use serde_json::Value;

    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten_json(&join_key(prefix, k), v, out);
            }
        }
        Value::Array(seq) => {
            for (i, v) in seq.iter().enumerate() {
                flatten_json(&format!("{prefix}[{i}]"), v, out);
            }
        }
        Value::Null => {
            out.insert(prefix.to_string(), PropertyValue::String(String::new()));
        }
        Value::Bool(b) => {
            out.insert(prefix.to_string(), PropertyValue::Bool(*b));
        }
        Value::Number(n) => {
            out.insert(prefix.to_string(), PropertyValue::Number(n.clone()));
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), PropertyValue::String(s.clone()));
        }
    }
}

/// `key=value` lines with `#`/`!` comments and trailing-backslash
/// continuations. Values are always strings.
fn parse_properties(text: &str, out: &mut IndexMap<String, PropertyValue>) {
    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        let mut logical = line.trim().to_string();
        while logical.ends_with('\\') {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let trimmed = logical.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let (key, value) = match trimmed.find(['=', ':']) {
            Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
            None => (trimmed, ""),
        };
        out.insert(
            key.trim().to_string(),
            PropertyValue::String(value.trim().to_string()),
        );
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn yaml_key(name: &str, key: &serde_yaml::Value) -> RepoResult<String> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(RepoError::parse(name, "mapping keys must be scalars")),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> PropertyValue {
    if let Some(i) = n.as_i64() {
        PropertyValue::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        PropertyValue::Number(u.into())
    } else if let Some(f) = n.as_f64().and_then(serde_json::Number::from_f64) {
        PropertyValue::Number(f)
    } else {
        // Non-finite floats have no JSON representation.
        PropertyValue::String(n.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_yaml(text: &str) -> PropertySource {
        load("test.yml", text.as_bytes(), SourceFormat::Yaml).unwrap()
    }

    #[test]
    fn yaml_nested_mappings_flatten_to_dotted_keys() {
        let source = load_yaml("server:\n  port: 9080\ntype: normal\nsome:\n  property: \"123\"\n");

        assert_eq!(source.get("server.port"), Some(&PropertyValue::from(9080)));
        assert_eq!(source.get("type"), Some(&PropertyValue::from("normal")));
        assert_eq!(source.get("some.property"), Some(&PropertyValue::from("123")));
    }

    #[test]
    fn yaml_scalars_keep_their_type() {
        let source = load_yaml("count: 3\nratio: 0.5\nenabled: true\nname: web\n");

        assert_eq!(source.get("count"), Some(&PropertyValue::from(3)));
        assert_eq!(
            source.get("ratio"),
            Some(&PropertyValue::Number(
                serde_json::Number::from_f64(0.5).unwrap()
            ))
        );
        assert_eq!(source.get("enabled"), Some(&PropertyValue::from(true)));
        assert_eq!(source.get("name"), Some(&PropertyValue::from("web")));
    }

    #[test]
    fn yaml_quoted_number_stays_a_string() {
        let source = load_yaml("some:\n  property: \"123\"\n");
        assert_eq!(source.get("some.property"), Some(&PropertyValue::from("123")));
    }

    #[test]
    fn yaml_sequences_flatten_to_indexed_keys() {
        let source = load_yaml("hosts:\n  - alpha\n  - beta\n");
        assert_eq!(source.get("hosts[0]"), Some(&PropertyValue::from("alpha")));
        assert_eq!(source.get("hosts[1]"), Some(&PropertyValue::from("beta")));
    }

    #[test]
    fn yaml_null_becomes_empty_string() {
        let source = load_yaml("empty:\n");
        assert_eq!(source.get("empty"), Some(&PropertyValue::from("")));
    }

    #[test]
    fn yaml_preserves_document_order() {
        let source = load_yaml("zeta: 1\nalpha: 2\nmid:\n  inner: 3\n");
        let keys: Vec<_> = source.source.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid.inner"]);
    }

    #[test]
    fn empty_yaml_document_is_an_empty_source() {
        let source = load_yaml("");
        assert!(source.is_empty());
    }

    #[test]
    fn yaml_scalar_document_is_rejected() {
        let err = load("test.yml", b"just a string", SourceFormat::Yaml).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = load("test.yml", b"a: [1,\n", SourceFormat::Yaml).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("test.yml"));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let err = load("test.yml", &[0xff, 0xfe], SourceFormat::Yaml).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn json_objects_flatten_like_yaml() {
        let source = load(
            "test.json",
            br#"{"server": {"port": 8080}, "debug": false, "tags": ["a", "b"]}"#,
            SourceFormat::Json,
        )
        .unwrap();

        assert_eq!(source.get("server.port"), Some(&PropertyValue::from(8080)));
        assert_eq!(source.get("debug"), Some(&PropertyValue::from(false)));
        assert_eq!(source.get("tags[0]"), Some(&PropertyValue::from("a")));
        assert_eq!(source.get("tags[1]"), Some(&PropertyValue::from("b")));
    }

    #[test]
    fn properties_lines_parse_as_strings() {
        let text = "# comment\n! also a comment\nserver.port=9080\ntype: normal\n\nbare\n";
        let source = load("app.properties", text.as_bytes(), SourceFormat::Properties).unwrap();

        assert_eq!(source.get("server.port"), Some(&PropertyValue::from("9080")));
        assert_eq!(source.get("type"), Some(&PropertyValue::from("normal")));
        assert_eq!(source.get("bare"), Some(&PropertyValue::from("")));
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn properties_continuation_lines_join() {
        let text = "greeting=hello \\\n    world\n";
        let source = load("app.properties", text.as_bytes(), SourceFormat::Properties).unwrap();
        assert_eq!(source.get("greeting"), Some(&PropertyValue::from("hello world")));
    }

    #[test]
    fn format_from_path() {
        assert_eq!(SourceFormat::from_path("web.yml"), Some(SourceFormat::Yaml));
        assert_eq!(SourceFormat::from_path("web.yaml"), Some(SourceFormat::Yaml));
        assert_eq!(
            SourceFormat::from_path("app.properties"),
            Some(SourceFormat::Properties)
        );
        assert_eq!(SourceFormat::from_path("app.json"), Some(SourceFormat::Json));
        assert_eq!(SourceFormat::from_path("logback.xml"), None);
        assert_eq!(SourceFormat::from_path("noext"), None);
    }
}

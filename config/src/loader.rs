use crate::{ConfigError, ConfserveConfig};
use regex::Regex;
use std::path::PathBuf;

pub struct ConfigLoader {
    explicit_file: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            search_paths.push(home.join(".config/confserve/confserve.yaml"));
        }
        search_paths.push(PathBuf::from("./confserve.yaml"));

        #[cfg(unix)]
        search_paths.insert(0, PathBuf::from("/etc/confserve/confserve.yaml"));

        Self {
            explicit_file: None,
            search_paths,
        }
    }

    #[must_use]
    pub fn with_file(mut self, path: &str) -> Self {
        self.explicit_file = Some(PathBuf::from(path));
        self
    }

    pub fn load(&self) -> Result<ConfserveConfig, ConfigError> {
        let mut config = ConfserveConfig::default();

        if let Ok(env_path) = std::env::var("CONFSERVE_CONFIG") {
            let content =
                std::fs::read_to_string(&env_path).map_err(|e| ConfigError::ReadFile {
                    path: PathBuf::from(&env_path),
                    source: e,
                })?;
            config = self.parse_yaml(&content)?;
        } else if let Some(ref explicit) = self.explicit_file {
            let content = std::fs::read_to_string(explicit).map_err(|e| ConfigError::ReadFile {
                path: explicit.clone(),
                source: e,
            })?;
            config = self.parse_yaml(&content)?;
        } else {
            for path in &self.search_paths {
                if path.exists() {
                    if let Ok(content) = std::fs::read_to_string(path) {
                        config = self.merge_yaml(&config, &content)?;
                    }
                }
            }
        }

        self.apply_env_overrides(&mut config);
        Ok(config)
    }

    fn parse_yaml(&self, content: &str) -> Result<ConfserveConfig, ConfigError> {
        let expanded = self.expand_env_vars(content);
        Ok(serde_yaml::from_str(&expanded)?)
    }

    fn merge_yaml(
        &self,
        base: &ConfserveConfig,
        content: &str,
    ) -> Result<ConfserveConfig, ConfigError> {
        let expanded = self.expand_env_vars(content);
        let overlay: ConfserveConfig = serde_yaml::from_str(&expanded)?;
        Ok(self.merge_configs(base, &overlay))
    }

    fn merge_configs(&self, base: &ConfserveConfig, overlay: &ConfserveConfig) -> ConfserveConfig {
        let defaults = ConfserveConfig::default();
        let mut result = base.clone();

        if overlay.server.host != defaults.server.host {
            result.server.host = overlay.server.host.clone();
        }
        if overlay.server.port != defaults.server.port {
            result.server.port = overlay.server.port;
        }
        if overlay.repository.root != defaults.repository.root {
            result.repository.root = overlay.repository.root.clone();
        }
        if overlay.repository.default_label != defaults.repository.default_label {
            result.repository.default_label = overlay.repository.default_label.clone();
        }
        if overlay.logging != defaults.logging {
            result.logging = overlay.logging.clone();
        }

        result
    }

    fn expand_env_vars(&self, content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_default()
        })
        .to_string()
    }

    fn apply_env_overrides(&self, config: &mut ConfserveConfig) {
        if let Ok(host) = std::env::var("CONFSERVE_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("CONFSERVE_PORT") {
            if let Ok(p) = port.parse() {
                config.server.port = p;
            }
        }
        if let Ok(root) = std::env::var("CONFSERVE_REPO_ROOT") {
            if !root.is_empty() {
                config.repository.root = root;
            }
        }
        if let Ok(label) = std::env::var("CONFSERVE_DEFAULT_LABEL") {
            if !label.is_empty() {
                config.repository.default_label = label;
            }
        }
        if let Ok(level) = std::env::var("CONFSERVE_LOG_LEVEL") {
            if let Ok(l) = serde_yaml::from_str(&level) {
                config.logging.level = l;
            }
        }
    }
}

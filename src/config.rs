//! Generator settings.
//!
//! Precedence, lowest first: built-in defaults, `adev.toml`, `ADEV_*`
//! environment variables, command-line flags.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "adev.toml";

/// Settings shared by every generating command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Root directory for generated files.
    pub output_dir: PathBuf,
    /// Resolve handler operations through generated DAOs.
    pub use_daos: bool,
    /// Directory of template overrides.
    pub templates_dir: Option<PathBuf>,
    /// Overwrite files that already exist.
    pub force: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output_dir: PathBuf::from("."),
            use_daos: false,
            templates_dir: None,
            force: false,
        }
    }
}

impl GeneratorConfig {
    /// Apply `ADEV_OUTPUT_DIR`, `ADEV_USE_DAOS` and `ADEV_TEMPLATES_DIR` from
    /// the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup. Unparsable booleans are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("ADEV_OUTPUT_DIR").filter(|v| !v.is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup("ADEV_USE_DAOS").and_then(|v| parse_bool(&v)) {
            self.use_daos = flag;
        }
        if let Some(dir) = lookup("ADEV_TEMPLATES_DIR").filter(|v| !v.is_empty()) {
            self.templates_dir = Some(PathBuf::from(dir));
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a TOML config file. A missing file is `Ok(None)`.
pub fn load_config(path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: GeneratorConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(Some(config))
}

/// File config (or defaults) with the environment applied on top.
pub fn resolve_config(path: Option<&Path>) -> anyhow::Result<GeneratorConfig> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let mut config = load_config(path)?.unwrap_or_default();
    config.apply_env();
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("adev.toml")).unwrap().is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adev.toml");
        std::fs::write(&path, "use_daos = true\noutput_dir = \"out\"\n").unwrap();
        let config = load_config(&path).unwrap().unwrap();
        assert!(config.use_daos);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(!config.force);
        assert!(config.templates_dir.is_none());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adev.toml");
        std::fs::write(&path, "output = \"out\"\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ADEV_OUTPUT_DIR", "generated"),
            ("ADEV_USE_DAOS", "yes"),
            ("ADEV_TEMPLATES_DIR", "my_templates"),
        ]);
        let mut config = GeneratorConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.output_dir, PathBuf::from("generated"));
        assert!(config.use_daos);
        assert_eq!(config.templates_dir, Some(PathBuf::from("my_templates")));
    }

    #[test]
    fn test_bad_boolean_is_ignored() {
        let mut config = GeneratorConfig {
            use_daos: true,
            ..GeneratorConfig::default()
        };
        config.apply_overrides(|key| (key == "ADEV_USE_DAOS").then(|| "maybe".to_string()));
        assert!(config.use_daos);
    }
}

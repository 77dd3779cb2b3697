use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::models::options::RemovalConfig;
use crate::processing::pattern::CommentMatcher;

/// Project-local config file names, checked in order
pub const LOCAL_CONFIG_FILES: &[&str] = &[".rmcrc.toml", ".rmcrc.json"];

/// Level key used when none is given
pub const DEFAULT_LEVEL: &str = "1";

/// Removal levels keyed by name, e.g. `"1"` through `"4"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelsConfig {
    pub levels: BTreeMap<String, RemovalConfig>,
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    BuiltIn,
}

impl Default for LevelsConfig {
    fn default() -> Self {
        let notes = ["TODO:", "FIXME:", "NOTE:", "INFO:"];
        let levels = BTreeMap::from([
            ("1".to_string(), RemovalConfig::new(notes[..2].iter().copied(), false)),
            ("2".to_string(), RemovalConfig::new(notes, false)),
            ("3".to_string(), RemovalConfig::new(notes, true)),
            ("4".to_string(), RemovalConfig::new([""], true)),
        ]);
        Self { levels }
    }
}

impl LevelsConfig {
    /// Load levels from a `.toml` or `.json` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: LevelsConfig = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
            _ => toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
        };

        config
            .validate()
            .with_context(|| format!("Invalid configuration in: {}", path.display()))?;

        Ok(config)
    }

    /// Resolve the config to use: an explicit path, a project file, the user file, or the defaults
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            return Ok((Self::from_file(path)?, ConfigSource::File(path.to_path_buf())));
        }

        let candidates = LOCAL_CONFIG_FILES
            .iter()
            .map(|name| cwd.join(name))
            .chain(Self::global_config_path());

        for candidate in candidates {
            if candidate.is_file() {
                let config = Self::from_file(&candidate)?;
                return Ok((config, ConfigSource::File(candidate)));
            }
        }

        Ok((Self::default(), ConfigSource::BuiltIn))
    }

    /// `~/.config/rmc/levels.toml` or the platform equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rmc").join("levels.toml"))
    }

    /// Every level needs a prefix set that compiles
    pub fn validate(&self) -> Result<()> {
        if self.levels.is_empty() {
            return Err(anyhow!("No levels defined"));
        }

        for (name, level) in &self.levels {
            CommentMatcher::new(&level.comment_prefixes)
                .with_context(|| format!("Level '{}' has an invalid comment prefix", name))?;
        }

        Ok(())
    }

    pub fn level(&self, name: &str) -> Result<&RemovalConfig> {
        self.levels.get(name).ok_or_else(|| {
            anyhow!(
                "Unknown level '{}' (available: {})",
                name,
                self.level_names().join(", ")
            )
        })
    }

    pub fn level_names(&self) -> Vec<&str> {
        self.levels.keys().map(String::as_str).collect()
    }

    /// Create a template configuration
    pub fn template() -> String {
        r#"# rmc levels
#
# Each table is a level. `targets` lists the text that must follow `#` for a
# comment to be removed ("" removes every comment). `rm_docstring` drops
# triple-quoted docstring spans.

["1"]
targets = ["TODO:", "FIXME:"]
rm_docstring = false

["2"]
targets = ["TODO:", "FIXME:", "NOTE:", "INFO:"]
rm_docstring = false

["3"]
targets = ["TODO:", "FIXME:", "NOTE:", "INFO:"]
rm_docstring = true

["4"]
targets = [""]
rm_docstring = true
"#
        .to_string()
    }
}

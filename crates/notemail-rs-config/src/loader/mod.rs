//! Layered configuration loading.
//!
//! Layers are read in precedence order (system, user, project root, cwd,
//! then each runtime path), checked individually, deep-merged, decoded and
//! validated as a whole.

mod layers;
mod schema;

#[cfg(test)]
mod tests;

use crate::{ConfigError, NotemailConfig};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "notemail.json5";
const CONFIG_DIR: &str = ".notemail";

/// The merged config and the layers that produced it.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub config: NotemailConfig,
    /// Contributing layers, lowest precedence first.
    pub layers: Vec<ConfigLayer>,
}

/// Where a layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    System,
    User,
    Project,
    Cwd,
    /// Passed explicitly; must exist.
    Runtime,
}

#[derive(Debug, Clone)]
pub struct ConfigLayer {
    pub source: ConfigLayerSource,
    pub path: PathBuf,
}

/// Where to look for layers.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    pub cwd: PathBuf,
    /// Defaults to `/etc/notemail/notemail.json5` on Unix.
    pub system_config_path: Option<PathBuf>,
    /// Defaults to `~/.notemail/notemail.json5`.
    pub user_config_path: Option<PathBuf>,
    pub runtime_paths: Vec<PathBuf>,
    /// Entries whose presence marks a project root.
    pub project_root_markers: Vec<String>,
}

impl LayeredConfigOptions {
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            system_config_path: layers::system_path(),
            user_config_path: layers::user_path(),
            runtime_paths: Vec::new(),
            project_root_markers: vec![".git".to_string()],
        }
    }

    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Optional layers in precedence order.
    fn discovered(&self) -> Vec<(ConfigLayerSource, PathBuf)> {
        let mut found = Vec::new();
        if let Some(path) = &self.system_config_path {
            found.push((ConfigLayerSource::System, path.clone()));
        }
        if let Some(path) = &self.user_config_path {
            found.push((ConfigLayerSource::User, path.clone()));
        }
        if let Some(root) = layers::project_root(&self.cwd, &self.project_root_markers) {
            found.push((ConfigLayerSource::Project, root.join(CONFIG_FILE)));
        }
        found.push((ConfigLayerSource::Cwd, self.cwd.join(CONFIG_FILE)));
        found
    }
}

impl NotemailConfig {
    /// Load one file without layering.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let layer = layers::read(ConfigLayerSource::Runtime, path)?;
        decode(layer.value)
    }

    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        let value: Value = json5::from_str(contents)?;
        schema::check(&value, "inline")?;
        decode(value)
    }

    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let mut seen = HashSet::new();
        let mut loaded = Vec::new();
        for (source, path) in options.discovered() {
            if !seen.insert(layers::identity_of(&path)) {
                debug!("config layer already loaded (path={})", path.display());
                continue;
            }
            loaded.extend(layers::read_if_present(source, &path)?);
        }
        for path in &options.runtime_paths {
            loaded.push(layers::read(ConfigLayerSource::Runtime, path)?);
        }

        let mut merged = Value::Object(Default::default());
        let mut metas = Vec::with_capacity(loaded.len());
        for layer in loaded {
            metas.push(layer.meta);
            layers::deep_merge(&mut merged, layer.value);
        }
        let config = decode(merged)?;
        info!("config loaded (layers={})", metas.len());
        Ok(LayeredConfig {
            config,
            layers: metas,
        })
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vector.top_k == 0 {
            return Err(ConfigError::Invalid(
                "vector.top_k must be at least 1".to_string(),
            ));
        }
        if self.vector.overfetch_factor == 0 {
            return Err(ConfigError::Invalid(
                "vector.overfetch_factor must be at least 1".to_string(),
            ));
        }
        if self.vector.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "vector.batch_size must be at least 1".to_string(),
            ));
        }
        if !(1..=100).contains(&self.store.page_size) {
            return Err(ConfigError::Invalid(
                "store.page_size must be between 1 and 100".to_string(),
            ));
        }
        for (name, temperature) in [
            ("assistant.command_temperature", self.assistant.command_temperature),
            ("assistant.summary_temperature", self.assistant.summary_temperature),
        ] {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be between 0 and 2"
                )));
            }
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "http.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn decode(value: Value) -> Result<NotemailConfig, ConfigError> {
    let config: NotemailConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}

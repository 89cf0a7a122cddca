//! Layer discovery, reading and merging.

use super::{CONFIG_DIR, CONFIG_FILE, ConfigLayer, ConfigLayerSource, schema};
use crate::ConfigError;
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A parsed layer waiting to be merged.
pub(super) struct Layer {
    pub(super) meta: ConfigLayer,
    pub(super) value: Value,
}

impl ConfigLayerSource {
    fn label(self) -> &'static str {
        match self {
            ConfigLayerSource::System => "system",
            ConfigLayerSource::User => "user",
            ConfigLayerSource::Project => "project",
            ConfigLayerSource::Cwd => "cwd",
            ConfigLayerSource::Runtime => "runtime",
        }
    }
}

/// Read, parse and schema-check one layer file.
pub(super) fn read(source: ConfigLayerSource, path: &Path) -> Result<Layer, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|err| ConfigError::io(path, err))?;
    let value: Value = json5::from_str(&text)?;
    schema::check(&value, &format!("{}({})", source.label(), path.display()))?;
    debug!(
        "config layer read (source={}, path={})",
        source.label(),
        path.display()
    );
    Ok(Layer {
        meta: ConfigLayer {
            source,
            path: path.to_path_buf(),
        },
        value,
    })
}

/// Like [`read`], but a missing file yields `None`.
pub(super) fn read_if_present(
    source: ConfigLayerSource,
    path: &Path,
) -> Result<Option<Layer>, ConfigError> {
    if path.is_file() {
        read(source, path).map(Some)
    } else {
        Ok(None)
    }
}

/// Recursively overlay `top` onto `base`; non-object values replace.
pub(super) fn deep_merge(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Object(base), Value::Object(top)) => {
            for (key, value) in top {
                match base.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Canonical form used to skip a file seen through two layers.
pub(super) fn identity_of(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Nearest ancestor of `start` holding one of `markers`.
pub(super) fn project_root(start: &Path, markers: &[String]) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| markers.iter().any(|marker| dir.join(marker).exists()))
        .map(Path::to_path_buf)
}

pub(super) fn system_path() -> Option<PathBuf> {
    if cfg!(unix) {
        Some(PathBuf::from("/etc/notemail").join(CONFIG_FILE))
    } else {
        None
    }
}

pub(super) fn user_path() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    Some(dirs.home_dir().join(CONFIG_DIR).join(CONFIG_FILE))
}

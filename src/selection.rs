//! Filters deciding which discovered plugins take part in a build.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Trait describing plugin filters.
pub trait PluginInclusion {
  /// Returns `true` when the plugin should be bundled.
  fn is_included(&self, plugin_name: &str) -> bool;
}

/// Includes every plugin.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPlugins;

impl PluginInclusion for AllPlugins {
  fn is_included(&self, _plugin_name: &str) -> bool {
    true
  }
}

#[derive(Debug, Default, Deserialize)]
struct PluginSelectionFile {
  #[serde(default)]
  include: Vec<String>,
  #[serde(default)]
  exclude: Vec<String>,
}

/// Include/exclude lists read from `plugins.local.json`.
#[derive(Debug, Clone, Default)]
pub struct PluginSelection {
  include: Option<BTreeSet<String>>,
  exclude: BTreeSet<String>,
}

/// Errors that can occur while loading the selection file.
#[derive(Debug, Error)]
pub enum PluginSelectionError {
  /// Failed to read the selection file from disk.
  #[error("failed to read {}: {source}", path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// Failed to parse the JSON selection file.
  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
}

impl PluginSelection {
  /// Load the selection file if present; a missing file selects every plugin.
  pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, PluginSelectionError> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
      Ok(contents) => contents,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        return Ok(Self::default());
      }
      Err(source) => {
        return Err(PluginSelectionError::Io {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    let file: PluginSelectionFile =
      serde_json::from_str(&contents).map_err(|source| PluginSelectionError::Parse {
        path: path.to_path_buf(),
        source,
      })?;
    Ok(Self::from(file))
  }

  /// Returns true when no filtering rules are active.
  pub fn is_unfiltered(&self) -> bool {
    self.include.is_none() && self.exclude.is_empty()
  }
}

impl PluginInclusion for PluginSelection {
  fn is_included(&self, plugin_name: &str) -> bool {
    if self.exclude.contains(plugin_name) {
      return false;
    }

    self
      .include
      .as_ref()
      .is_none_or(|include| include.contains(plugin_name))
  }
}

impl From<PluginSelectionFile> for PluginSelection {
  fn from(file: PluginSelectionFile) -> Self {
    let include = normalise_list(file.include);
    let exclude = normalise_list(file.exclude);

    Self {
      include: (!include.is_empty()).then_some(include),
      exclude,
    }
  }
}

fn normalise_list(values: impl IntoIterator<Item = String>) -> BTreeSet<String> {
  values
    .into_iter()
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn defaults_to_including_all_plugins() {
    let selection = PluginSelection::default();
    assert!(selection.is_included("any"));
    assert!(selection.is_unfiltered());
  }

  #[test]
  fn excludes_plugins_listed_in_config() {
    let selection = PluginSelection::from(PluginSelectionFile {
      include: Vec::new(),
      exclude: vec!["feedback".into(), String::new(), " statistics ".into()],
    });

    assert!(!selection.is_included("feedback"));
    assert!(!selection.is_included("statistics"));
    assert!(selection.is_included("layers"));
  }

  #[test]
  fn exclusion_wins_over_inclusion() {
    let selection = PluginSelection::from(PluginSelectionFile {
      include: vec!["core".into(), "layers".into()],
      exclude: vec!["layers".into()],
    });

    assert!(selection.is_included("core"));
    assert!(!selection.is_included("layers"));
    assert!(!selection.is_included("time-control"));
  }

  #[test]
  fn load_from_path_returns_default_for_missing_file() {
    let temp = tempdir().unwrap();
    let selection = PluginSelection::load_from_path(temp.path().join("plugins.local.json")).unwrap();
    assert!(selection.is_unfiltered());
  }

  #[test]
  fn load_from_path_reports_malformed_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("plugins.local.json");
    fs::write(&path, r#"{"include": "core"}"#).unwrap();

    let err = PluginSelection::load_from_path(&path).unwrap_err();
    assert!(matches!(err, PluginSelectionError::Parse { .. }));
  }

  #[test]
  fn load_from_path_reads_configuration() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("plugins.local.json");
    fs::write(&path, r#"{"include": ["core", "layers"], "exclude": ["layers", ""]}"#).unwrap();

    let selection = PluginSelection::load_from_path(&path).unwrap();
    assert!(!selection.is_unfiltered());
    assert!(selection.is_included("core"));
    assert!(!selection.is_included("layers"));
  }
}

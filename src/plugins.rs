//! Plugin discovery and per-plugin configuration loading.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::asset_paths::{plugin_name_from_dir, should_skip_entry};
use crate::models::{PluginConfig, PluginSource};
use crate::project::BuildContext;
use crate::selection::PluginInclusion;

/// Errors raised while assembling the plugin list.
#[derive(Debug, Error)]
pub enum PluginConfigError {
  /// A plugin manifest or the plugins root could not be read.
  #[error("failed to read {}: {source}", path.display())]
  Io {
    /// Offending path.
    path: PathBuf,
    /// Underlying I/O error.
    source: std::io::Error,
  },
  /// A plugin manifest is not valid; the build cannot safely default it.
  #[error("malformed plugin configuration {}: {source}", path.display())]
  MalformedConfig {
    /// Offending manifest.
    path: PathBuf,
    /// Underlying parse error.
    source: serde_json::Error,
  },
  /// Two plugin directories resolve to the same plugin name.
  #[error("plugin `{name}` is provided by both {} and {}", first.display(), second.display())]
  DuplicatePlugin {
    /// Conflicting plugin name.
    name: String,
    /// Directory found first.
    first: PathBuf,
    /// Directory found second.
    second: PathBuf,
  },
}

/// Read a plugin manifest; a missing manifest yields the default configuration.
pub fn load_plugin_config(path: &Path) -> Result<PluginConfig, PluginConfigError> {
  let content = match fs::read_to_string(path) {
    Ok(content) => content,
    Err(err) if err.kind() == ErrorKind::NotFound => return Ok(PluginConfig::default()),
    Err(source) => {
      return Err(PluginConfigError::Io {
        path: path.to_path_buf(),
        source,
      });
    }
  };

  serde_json::from_str(&content).map_err(|source| PluginConfigError::MalformedConfig {
    path: path.to_path_buf(),
    source,
  })
}

/// Build the ordered plugin list for a run.
///
/// With a declared order only the declared plugins take part, in that order; otherwise every
/// plugin directory is used, sorted by directory name. The selection filter applies last.
pub fn discover_plugins<S: PluginInclusion>(
  context: &BuildContext<'_>,
  selection: &S,
) -> Result<Vec<PluginSource>, PluginConfigError> {
  let layout = context.layout;
  let available = scan_plugin_dirs(&context.plugins_root, &layout.plugin_dir_suffix)?;

  let ordered: Vec<(String, PathBuf)> = if layout.plugins.is_empty() {
    let mut entries: Vec<(String, PathBuf)> = available.into_iter().collect();
    entries.sort_by(|(_, a), (_, b)| a.file_name().cmp(&b.file_name()));
    entries
  } else {
    let mut entries = Vec::new();
    for declared in &layout.plugins {
      let name = plugin_name_from_dir(declared, &layout.plugin_dir_suffix);
      if entries.iter().any(|(seen, _)| seen == name) {
        debug!(plugin = %declared, "plugin declared more than once");
        continue;
      }
      match available.get(name) {
        Some(dir) => entries.push((name.to_string(), dir.clone())),
        None => warn!(plugin = %declared, "declared plugin has no directory; skipping"),
      }
    }
    entries
  };

  let mut plugins = Vec::with_capacity(ordered.len());
  for (name, dir) in ordered {
    if !selection.is_included(&name) {
      debug!(plugin = %name, "plugin excluded by selection");
      continue;
    }

    let config = load_plugin_config(&dir.join(&layout.plugin_config_file))?;
    plugins.push(PluginSource { name, dir, config });
  }

  Ok(plugins)
}

fn scan_plugin_dirs(root: &Path, suffix: &str) -> Result<BTreeMap<String, PathBuf>, PluginConfigError> {
  let mut found: BTreeMap<String, PathBuf> = BTreeMap::new();
  let entries = match fs::read_dir(root) {
    Ok(entries) => entries,
    Err(err) if err.kind() == ErrorKind::NotFound => {
      warn!(root = %root.display(), "plugins root does not exist");
      return Ok(found);
    }
    Err(source) => {
      return Err(PluginConfigError::Io {
        path: root.to_path_buf(),
        source,
      });
    }
  };

  for entry in entries.flatten() {
    if !entry.file_type().is_ok_and(|ft| ft.is_dir()) {
      continue;
    }

    let dir_name = entry.file_name().to_string_lossy().to_string();
    if should_skip_entry(&dir_name) {
      continue;
    }

    let name = plugin_name_from_dir(&dir_name, suffix).to_string();
    let path = entry.path();
    if let Some(first) = found.get(&name) {
      let (first, second) = if first.file_name() <= path.file_name() {
        (first.clone(), path)
      } else {
        (path, first.clone())
      };
      return Err(PluginConfigError::DuplicatePlugin {
        name,
        first,
        second,
      });
    }
    found.insert(name, path);
  }

  Ok(found)
}

//! Project configuration loader describing the plugin layout and build outputs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::project::{ProjectLayout, StylesheetFormat};

/// File name searched for in the project directory.
pub const DEFAULT_CONFIG_FILE: &str = "bundler.config.json";

/// Errors raised while reading the project configuration.
#[derive(Debug, Error)]
pub enum ProjectConfigError {
  /// The configuration exists but could not be read.
  #[error("failed to read {}: {source}", path.display())]
  Io {
    /// Offending file.
    path: PathBuf,
    /// Underlying I/O error.
    source: std::io::Error,
  },
  /// The configuration is not valid JSON for [`ProjectConfig`].
  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    /// Offending file.
    path: PathBuf,
    /// Underlying parse error.
    source: serde_json::Error,
  },
}

/// Discoverable project configuration; every field falls back to the conventional layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectConfig {
  /// Directory containing the unpacked plugins.
  pub plugins_root: String,
  /// Root of the generated web application.
  pub build_dir: String,
  /// Plugin directory providing `main.js` and `index.html` templates.
  pub core_plugin: String,
  /// Suffix removed from plugin directory names (packaging artefact).
  pub plugin_dir_suffix: String,
  /// Per-plugin configuration file name.
  pub plugin_config_file: String,
  /// Third-party script directory name.
  pub lib_dir: String,
  /// Stylesheet directory name.
  pub styles_dir: String,
  /// Application module directory name.
  pub modules_dir: String,
  /// Theme directory name.
  pub theme_dir: String,
  /// Bootstrap template file name.
  pub main_template: String,
  /// HTML template file name.
  pub index_template: String,
  /// Entry point module name.
  pub entry_point: String,
  /// Bundler manifest output, relative to the project directory.
  pub bundler_manifest_file: String,
  /// Optimized bundle output, relative to the build directory.
  pub optimized_output: String,
  /// Optimizer name passed to the bundler.
  pub optimize: String,
  /// Document title.
  pub title: String,
  /// Names the module loader resolves itself.
  pub reserved_names: Vec<String>,
  /// Declared plugin order.
  pub plugins: Vec<String>,
  /// Include/exclude filter file.
  pub selection_file: String,
  /// Stylesheet list rendering in the HTML document.
  pub stylesheet_format: StylesheetFormat,
  /// Optional concatenated stylesheet output.
  pub stylesheet_bundle: Option<String>,
  /// Package root for npm resources.
  pub node_modules_dir: String,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      plugins_root: "target/geoladris".into(),
      build_dir: "src/main/webapp".into(),
      core_plugin: "core-jar".into(),
      plugin_dir_suffix: "-jar".into(),
      plugin_config_file: "geoladris.json".into(),
      lib_dir: "jslib".into(),
      styles_dir: "styles".into(),
      modules_dir: "modules".into(),
      theme_dir: "theme".into(),
      main_template: "main.js".into(),
      index_template: "index.html".into(),
      entry_point: "main".into(),
      bundler_manifest_file: "build.js".into(),
      optimized_output: "app.min.js".into(),
      optimize: "uglify2".into(),
      title: String::new(),
      reserved_names: vec!["require".into()],
      plugins: Vec::new(),
      selection_file: "plugins.local.json".into(),
      stylesheet_format: StylesheetFormat::Links,
      stylesheet_bundle: None,
      node_modules_dir: "node_modules".into(),
    }
  }
}

impl ProjectConfig {
  /// Load `bundler.config.json` from the project directory.
  pub fn discover(project_dir: &Path) -> Result<Self, ProjectConfigError> {
    Self::load_from_path(project_dir.join(DEFAULT_CONFIG_FILE))
  }

  /// Read configuration from a specific JSON file.
  ///
  /// A missing file yields the defaults; an unreadable or malformed one is an error, since
  /// silently building with the wrong layout would produce an unusable bundle.
  pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ProjectConfigError> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
      Err(source) => {
        return Err(ProjectConfigError::Io {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    serde_json::from_str(&content).map_err(|source| ProjectConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Convert the configuration into an owned layout description.
  pub fn into_layout(self) -> ProjectLayout {
    ProjectLayout {
      plugins_root: self.plugins_root,
      build_dir: self.build_dir,
      core_plugin: self.core_plugin,
      plugin_dir_suffix: self.plugin_dir_suffix,
      plugin_config_file: self.plugin_config_file,
      lib_dir: self.lib_dir,
      styles_dir: self.styles_dir,
      modules_dir: self.modules_dir,
      theme_dir: self.theme_dir,
      main_template: self.main_template,
      index_template: self.index_template,
      entry_point: self.entry_point,
      bundler_manifest_file: self.bundler_manifest_file,
      optimized_output: self.optimized_output,
      optimize: self.optimize,
      title: self.title,
      reserved_names: self.reserved_names,
      plugins: self.plugins,
      selection_file: self.selection_file,
      stylesheet_format: self.stylesheet_format,
      stylesheet_bundle: self.stylesheet_bundle,
      node_modules_dir: self.node_modules_dir,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let config = ProjectConfig::discover(dir.path()).unwrap();
    assert_eq!(config.lib_dir, "jslib");
    assert_eq!(config.reserved_names, vec!["require".to_string()]);
    assert!(config.stylesheet_bundle.is_none());
  }

  #[test]
  fn partial_file_overrides_selected_fields() {
    let dir = tempdir().unwrap();
    fs::write(
      dir.path().join(DEFAULT_CONFIG_FILE),
      r#"{"buildDir": "public", "plugins": ["core", "layers"], "stylesheetFormat": "json", "unknown": 1}"#,
    )
    .unwrap();

    let layout = ProjectConfig::discover(dir.path()).unwrap().into_layout();
    assert_eq!(layout.build_dir, "public");
    assert_eq!(layout.plugins, vec!["core".to_string(), "layers".to_string()]);
    assert_eq!(layout.stylesheet_format, StylesheetFormat::Json);
    assert_eq!(layout.modules_dir, "modules");
  }

  #[test]
  fn malformed_file_is_reported_with_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_CONFIG_FILE);
    fs::write(&path, "{ not json").unwrap();

    let err = ProjectConfig::discover(dir.path()).unwrap_err();
    assert!(matches!(err, ProjectConfigError::Parse { .. }));
    assert!(err.to_string().contains(&path.display().to_string()));
  }
}

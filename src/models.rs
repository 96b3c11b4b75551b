//! Data structures read from plugin manifests and produced for the module bundler.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::project::ProjectLayout;

/// Kinds of resource directory a plugin may ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceCategory {
  /// Third-party scripts addressed by bare module name.
  Lib,
  /// Plugin stylesheets.
  Styles,
  /// Application modules loaded at startup.
  Modules,
  /// Theme assets.
  Theme,
}

impl ResourceCategory {
  /// Every category, in the order resources are copied and scanned.
  pub const ALL: [Self; 4] = [Self::Lib, Self::Styles, Self::Modules, Self::Theme];
}

/// Contents of a plugin's `geoladris.json`.
///
/// Every recognised field is defaulted so a plugin without a manifest participates with
/// `installInRoot = false` and no paths, shims or extra stylesheets. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginConfig {
  /// Install resources at the category root instead of a per-plugin subdirectory.
  pub install_in_root: bool,
  /// Shim table from the flat manifest format.
  pub requirejs_shim: BTreeMap<String, ShimDescriptor>,
  /// Nested RequireJS section.
  pub requirejs: RequireJsConfig,
  /// Auxiliary stylesheets, relative to the plugin directory.
  pub css: Vec<String>,
  /// npm package files to vendor into the library directory.
  pub npm_resources: BTreeMap<String, NpmResource>,
}

impl PluginConfig {
  /// Shim declarations in merge order: the flat table first, then the nested one.
  pub fn shims(&self) -> impl Iterator<Item = (&String, &ShimDescriptor)> {
    self.requirejs_shim.iter().chain(self.requirejs.shim.iter())
  }
}

/// The nested `requirejs` section of a plugin manifest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RequireJsConfig {
  /// Module name to script path (without extension).
  pub paths: BTreeMap<String, String>,
  /// Module name to shim declaration.
  pub shim: BTreeMap<String, ShimDescriptor>,
}

/// Loading instructions for a script that does not declare itself as a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShimDescriptor {
  /// Modules that must load first.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub deps: Vec<String>,
  /// Global variable the script exports.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub exports: Option<String>,
}

/// An `npmResources` entry: `true`/`false` or a destination file name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NpmResource {
  /// `true` copies under the resolved file's own name, `false` skips the entry.
  Enabled(bool),
  /// Copy under this file name.
  Rename(String),
}

/// A plugin taking part in a build, with its configuration already read.
#[derive(Debug, Clone)]
pub struct PluginSource {
  /// Plugin name, unique within a build.
  pub name: String,
  /// Source directory of the plugin.
  pub dir: PathBuf,
  /// Parsed (or defaulted) plugin configuration.
  pub config: PluginConfig,
}

impl PluginSource {
  /// Source directory of a resource category.
  pub fn resource_dir(&self, layout: &ProjectLayout, category: ResourceCategory) -> PathBuf {
    self.dir.join(layout.category_dir(category))
  }

  /// Resolve a path declared in the plugin manifest against the plugin directory.
  pub fn declared_path(&self, relative: &str) -> PathBuf {
    self.dir.join(Path::new(relative.trim_start_matches('/')))
  }
}

/// Build configuration consumed by the RequireJS optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundlerManifest {
  /// Module name to path, relative to `baseUrl`.
  pub paths: BTreeMap<String, String>,
  /// Shim declarations.
  pub shim: BTreeMap<String, ShimDescriptor>,
  /// Modules loaded on startup, in plugin order.
  pub deps: Vec<String>,
  /// Directory module names are resolved against.
  #[serde(rename = "baseUrl")]
  pub base_url: String,
  /// Entry point module.
  pub name: String,
  /// Optimized output file.
  pub out: String,
  /// Optimizer name.
  pub optimize: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_manifest_uses_defaults() {
    let config: PluginConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, PluginConfig::default());
    assert!(!config.install_in_root);
  }

  #[test]
  fn parses_flat_and_nested_requirejs_sections() {
    let config: PluginConfig = serde_json::from_str(
      r#"{
        "installInRoot": true,
        "requirejsShim": {"legacy": {"deps": ["jquery"], "exports": "Legacy"}},
        "requirejs": {
          "paths": {"ol": "../jslib/ol"},
          "shim": {"ol": {"exports": "ol"}}
        },
        "css": ["vendor/ol.css"],
        "npmResources": {"jquery": true, "openlayers": "ol.js", "unused": false},
        "somethingElse": [1, 2, 3]
      }"#,
    )
    .unwrap();

    assert!(config.install_in_root);
    assert_eq!(config.requirejs.paths["ol"], "../jslib/ol");
    assert_eq!(config.css, vec!["vendor/ol.css".to_string()]);
    assert_eq!(config.npm_resources["jquery"], NpmResource::Enabled(true));
    assert_eq!(
      config.npm_resources["openlayers"],
      NpmResource::Rename("ol.js".into())
    );

    let shims: Vec<&String> = config.shims().map(|(name, _)| name).collect();
    assert_eq!(shims, vec!["legacy", "ol"]);
  }

  #[test]
  fn shim_serialization_omits_empty_fields() {
    let shim = ShimDescriptor {
      deps: Vec::new(),
      exports: Some("L".into()),
    };
    assert_eq!(serde_json::to_string(&shim).unwrap(), r#"{"exports":"L"}"#);
  }
}

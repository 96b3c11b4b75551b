//! The manifest accumulator and its merge policy.
//!
//! `paths` and `shim` are ordered maps with last-writer-wins semantics: a later plugin
//! replaces an earlier plugin's entry for the same name. Replacements across plugins are
//! logged but never rejected, so plugins can deliberately override each other.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::models::ShimDescriptor;

use super::stylesheets::order_stylesheets;

/// Everything one plugin adds to the bundle, in merge order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginContribution {
  /// Plugin the entries come from.
  pub plugin: String,
  /// Library scripts: bare name to path.
  pub library_paths: Vec<(String, String)>,
  /// Explicit remaps from the plugin manifest.
  pub remapped_paths: Vec<(String, String)>,
  /// Shim declarations.
  pub shims: Vec<(String, ShimDescriptor)>,
  /// Application modules: qualified name to path.
  pub modules: Vec<(String, String)>,
  /// Stylesheets relative to the build root, in discovery order.
  pub stylesheets: Vec<String>,
}

/// Accumulator threaded through the plugin fold.
#[derive(Debug, Clone, Default)]
pub struct BundleManifest {
  paths: BTreeMap<String, String>,
  shim: BTreeMap<String, ShimDescriptor>,
  deps: Vec<String>,
  stylesheets: Vec<String>,
  path_owners: BTreeMap<String, String>,
  shim_owners: BTreeMap<String, String>,
}

/// The finished manifest, ready for serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedManifest {
  /// Module name to path, relative to the modules directory.
  pub paths: BTreeMap<String, String>,
  /// Shim declarations.
  pub shim: BTreeMap<String, ShimDescriptor>,
  /// Startup modules, in plugin order.
  pub deps: Vec<String>,
  /// Stylesheets relative to the build root, in link order.
  pub stylesheets: Vec<String>,
}

impl BundleManifest {
  /// Merge one plugin's contribution, returning the updated accumulator.
  pub fn merge(mut self, contribution: PluginContribution) -> Self {
    let PluginContribution {
      plugin,
      library_paths,
      remapped_paths,
      shims,
      modules,
      stylesheets,
    } = contribution;

    for (name, path) in library_paths.into_iter().chain(remapped_paths) {
      self.register_path(&plugin, name, path);
    }

    for (name, descriptor) in shims {
      if let Some(previous) = self.shim.get(&name) {
        let owner = self.shim_owners.get(&name).map(String::as_str).unwrap_or_default();
        if owner != plugin && *previous != descriptor {
          warn!(module = %name, previous = %owner, plugin = %plugin, "shim overridden by later plugin");
        }
      }
      self.shim_owners.insert(name.clone(), plugin.clone());
      self.shim.insert(name, descriptor);
    }

    for (name, path) in modules {
      self.deps.push(name.clone());
      self.register_path(&plugin, name, path);
    }

    for stylesheet in stylesheets {
      if !self.stylesheets.contains(&stylesheet) {
        self.stylesheets.push(stylesheet);
      }
    }

    self
  }

  fn register_path(&mut self, plugin: &str, name: String, path: String) {
    if let Some(previous) = self.paths.get(&name) {
      let owner = self.path_owners.get(&name).map(String::as_str).unwrap_or_default();
      if owner != plugin && *previous != path {
        warn!(
          module = %name,
          previous = %previous,
          replacement = %path,
          plugin = %plugin,
          "module path overridden by later plugin"
        );
      }
    }
    debug!(module = %name, path = %path, plugin = %plugin, "registered module path");
    self.path_owners.insert(name.clone(), plugin.to_string());
    self.paths.insert(name, path);
  }

  /// Current path entry for a module name.
  pub fn path(&self, name: &str) -> Option<&str> {
    self.paths.get(name).map(String::as_str)
  }

  /// Startup modules registered so far.
  pub fn deps(&self) -> &[String] {
    &self.deps
  }

  /// Drop loader-reserved names and put stylesheets in link order.
  pub fn finalize(self, reserved_names: &[String], theme_dir: &str) -> ResolvedManifest {
    let Self {
      mut paths,
      shim,
      deps,
      mut stylesheets,
      ..
    } = self;

    for reserved in reserved_names {
      if paths.remove(reserved).is_some() {
        debug!(module = %reserved, "removed reserved module name from paths");
      }
    }
    order_stylesheets(&mut stylesheets, theme_dir);

    ResolvedManifest {
      paths,
      shim,
      deps,
      stylesheets,
    }
  }
}

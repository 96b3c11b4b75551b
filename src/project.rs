//! Project layout shared by every build step.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::models::ResourceCategory;

/// How the HTML document lists stylesheets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylesheetFormat {
  /// One `<link rel="stylesheet">` tag per stylesheet.
  #[default]
  Links,
  /// A JSON array of stylesheet paths, for templates that inject them at runtime.
  Json,
}

/// Names and locations describing a plugin project on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
  /// Directory containing one subdirectory per plugin.
  pub plugins_root: String,
  /// Root of the generated web application.
  pub build_dir: String,
  /// Plugin directory holding the bootstrap and HTML templates.
  pub core_plugin: String,
  /// Suffix stripped from plugin directory names.
  pub plugin_dir_suffix: String,
  /// Name of the per-plugin configuration manifest.
  pub plugin_config_file: String,
  /// Directory holding third-party scripts.
  pub lib_dir: String,
  /// Directory holding plugin stylesheets.
  pub styles_dir: String,
  /// Directory holding application modules.
  pub modules_dir: String,
  /// Directory holding theme assets.
  pub theme_dir: String,
  /// Bootstrap template file name inside the core plugin.
  pub main_template: String,
  /// HTML template file name inside the core plugin.
  pub index_template: String,
  /// Module name used as the bundler entry point.
  pub entry_point: String,
  /// Bundler manifest path, relative to the project directory.
  pub bundler_manifest_file: String,
  /// Optimized output file, relative to the build directory.
  pub optimized_output: String,
  /// Optimizer passed through to the bundler.
  pub optimize: String,
  /// Document title.
  pub title: String,
  /// Loader-internal names never overridden through `paths`.
  pub reserved_names: Vec<String>,
  /// Declared plugin order; empty means discovery order.
  pub plugins: Vec<String>,
  /// Include/exclude filter file, relative to the project directory.
  pub selection_file: String,
  /// Stylesheet list rendering.
  pub stylesheet_format: StylesheetFormat,
  /// Concatenated stylesheet path relative to the build directory.
  pub stylesheet_bundle: Option<String>,
  /// Package root used when preparing npm resources.
  pub node_modules_dir: String,
}

impl ProjectLayout {
  /// Directory name used for a resource category.
  pub fn category_dir(&self, category: ResourceCategory) -> &str {
    match category {
      ResourceCategory::Lib => &self.lib_dir,
      ResourceCategory::Styles => &self.styles_dir,
      ResourceCategory::Modules => &self.modules_dir,
      ResourceCategory::Theme => &self.theme_dir,
    }
  }
}

/// Resolved directories for a single build run.
#[derive(Debug, Clone)]
pub struct BuildContext<'a> {
  /// Layout names the run operates with.
  pub layout: &'a ProjectLayout,
  /// Directory the relative layout paths are resolved against.
  pub project_dir: PathBuf,
  /// Absolute plugins root.
  pub plugins_root: PathBuf,
  /// Absolute build output root.
  pub build_dir: PathBuf,
}

impl<'a> BuildContext<'a> {
  /// Resolve the layout against a project directory.
  pub fn new(layout: &'a ProjectLayout, project_dir: &Path) -> Self {
    Self {
      layout,
      project_dir: project_dir.to_path_buf(),
      plugins_root: project_dir.join(&layout.plugins_root),
      build_dir: project_dir.join(&layout.build_dir),
    }
  }

  /// Directory of the plugin providing the templates.
  pub fn core_plugin_dir(&self) -> PathBuf {
    self.plugins_root.join(&self.layout.core_plugin)
  }

  /// Output directory of a resource category.
  pub fn output_dir(&self, category: ResourceCategory) -> PathBuf {
    self.build_dir.join(self.layout.category_dir(category))
  }

  /// Location the bundler manifest is written to.
  pub fn bundler_manifest_path(&self) -> PathBuf {
    self.project_dir.join(&self.layout.bundler_manifest_file)
  }

  /// Location of the plugin include/exclude filter.
  pub fn selection_path(&self) -> PathBuf {
    self.project_dir.join(&self.layout.selection_file)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ProjectConfig;

  #[test]
  fn resolves_directories_against_project_dir() {
    let layout = ProjectConfig::default().into_layout();
    let context = BuildContext::new(&layout, Path::new("/work/app"));

    assert_eq!(context.plugins_root, PathBuf::from("/work/app/target/geoladris"));
    assert_eq!(context.build_dir, PathBuf::from("/work/app/src/main/webapp"));
    assert_eq!(
      context.core_plugin_dir(),
      PathBuf::from("/work/app/target/geoladris/core-jar")
    );
    assert_eq!(
      context.output_dir(ResourceCategory::Theme),
      PathBuf::from("/work/app/src/main/webapp/theme")
    );
    assert_eq!(context.bundler_manifest_path(), PathBuf::from("/work/app/build.js"));
  }
}

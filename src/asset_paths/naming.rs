use std::path::{Path, PathBuf};

use crate::models::PluginSource;

/// Derive the plugin name from its directory name by dropping the packaging suffix.
pub fn plugin_name_from_dir<'a>(dir_name: &'a str, suffix: &str) -> &'a str {
  match dir_name.strip_suffix(suffix) {
    Some(name) if !suffix.is_empty() && !name.is_empty() => name,
    _ => dir_name,
  }
}

/// Bare module name of a script file, or `None` when the file is not a script.
pub fn module_stem(file_name: &str) -> Option<&str> {
  file_name
    .strip_suffix(".js")
    .filter(|stem| !stem.is_empty())
}

/// Where a plugin's resources live relative to each category root.
///
/// Plugins installed in root share the category directory and their module names are used
/// as-is; every other plugin is nested under its own name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
  plugin: &'a str,
  in_root: bool,
}

impl<'a> Placement<'a> {
  /// Placement for an explicit plugin name and install mode.
  pub fn new(plugin: &'a str, in_root: bool) -> Self {
    Self { plugin, in_root }
  }

  /// Placement declared by a plugin's configuration.
  pub fn of(source: &'a PluginSource) -> Self {
    Self::new(&source.name, source.config.install_in_root)
  }

  /// Whether resources are installed at the category root.
  pub fn in_root(&self) -> bool {
    self.in_root
  }

  /// Qualified-name prefix: empty in root, `plugin/` otherwise.
  pub fn prefix(&self) -> String {
    if self.in_root {
      String::new()
    } else {
      format!("{}/", self.plugin)
    }
  }

  /// Qualified module name for a bare name.
  pub fn qualify(&self, name: &str) -> String {
    format!("{}{}", self.prefix(), name)
  }

  /// Destination directory inside a category output root.
  pub fn destination(&self, category_root: &Path) -> PathBuf {
    if self.in_root {
      category_root.to_path_buf()
    } else {
      category_root.join(self.plugin)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_packaging_suffix() {
    assert_eq!(plugin_name_from_dir("layers-jar", "-jar"), "layers");
    assert_eq!(plugin_name_from_dir("layers", "-jar"), "layers");
    assert_eq!(plugin_name_from_dir("-jar", "-jar"), "-jar");
    assert_eq!(plugin_name_from_dir("layers", ""), "layers");
  }

  #[test]
  fn extracts_script_stems() {
    assert_eq!(module_stem("map.js"), Some("map"));
    assert_eq!(module_stem("jquery.min.js"), Some("jquery.min"));
    assert_eq!(module_stem("map.css"), None);
    assert_eq!(module_stem(".js"), None);
  }

  #[test]
  fn root_placement_uses_bare_names() {
    let placement = Placement::new("core", true);
    assert_eq!(placement.qualify("main"), "main");
    assert_eq!(
      placement.destination(Path::new("build/modules")),
      PathBuf::from("build/modules")
    );
  }

  #[test]
  fn nested_placement_prefixes_plugin_name() {
    let placement = Placement::new("timeControl", false);
    assert_eq!(placement.qualify("slider"), "timeControl/slider");
    assert_eq!(
      placement.destination(Path::new("build/modules")),
      PathBuf::from("build/modules/timeControl")
    );
  }
}

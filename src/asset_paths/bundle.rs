use crate::asset_paths::Placement;
use crate::project::ProjectLayout;

/// `paths` value for a library script, relative to the bundler's module base directory.
pub fn library_module_path(layout: &ProjectLayout, placement: Placement<'_>, bare: &str) -> String {
  format!("../{}/{}", layout.lib_dir, placement.qualify(bare))
}

/// Point a declared path remapping at the plugin's nested library directory.
///
/// Manifests are written as if the plugin were installed in root (`../jslib/ol`); a nested
/// plugin's scripts live in `jslib/<plugin>/`, so every library segment is rewritten.
pub fn nest_library_remap(layout: &ProjectLayout, placement: Placement<'_>, value: &str) -> String {
  if placement.in_root() {
    return value.to_string();
  }

  let segment = format!("{}/", layout.lib_dir);
  value.replace(&segment, &format!("{}{}", segment, placement.prefix()))
}

/// Path of a copied resource relative to the build root.
///
/// Always uses forward slashes so generated HTML and manifests are identical on every platform.
pub fn bundle_relative_path(category_dir: &str, placement: Placement<'_>, relative: &str) -> String {
  format!(
    "{}/{}{}",
    category_dir,
    placement.prefix(),
    relative.replace('\\', "/").trim_start_matches('/')
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ProjectConfig;

  fn layout() -> ProjectLayout {
    ProjectConfig::default().into_layout()
  }

  #[test]
  fn library_paths_follow_placement() {
    let layout = layout();
    assert_eq!(
      library_module_path(&layout, Placement::new("core", true), "jquery"),
      "../jslib/jquery"
    );
    assert_eq!(
      library_module_path(&layout, Placement::new("layers", false), "ol"),
      "../jslib/layers/ol"
    );
  }

  #[test]
  fn remaps_are_nested_only_outside_root() {
    let layout = layout();
    assert_eq!(
      nest_library_remap(&layout, Placement::new("layers", false), "../jslib/ol-debug"),
      "../jslib/layers/ol-debug"
    );
    assert_eq!(
      nest_library_remap(&layout, Placement::new("core", true), "../jslib/ol-debug"),
      "../jslib/ol-debug"
    );
    assert_eq!(
      nest_library_remap(&layout, Placement::new("layers", false), "../vendor/ol"),
      "../vendor/ol"
    );
  }

  #[test]
  fn normalises_backslashes_from_windows_inputs() {
    let result = bundle_relative_path("styles", Placement::new("layers", false), "sub\\legend.css");
    assert_eq!(result, "styles/layers/sub/legend.css");
  }
}

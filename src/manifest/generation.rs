//! Generate the bundle manifest by scanning every plugin in order.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::asset_paths::{
  Placement, bundle_relative_path, library_module_path, module_stem, nest_library_remap,
};
use crate::manifest::accumulator::{BundleManifest, PluginContribution, ResolvedManifest};
use crate::manifest::scanning::{collect_stylesheets, list_scripts};
use crate::models::{PluginSource, ResourceCategory};
use crate::project::ProjectLayout;

/// Scan one plugin's resource directories and configuration into a contribution.
pub fn collect_contribution(
  layout: &ProjectLayout,
  plugin: &PluginSource,
) -> Result<PluginContribution> {
  let placement = Placement::of(plugin);

  let library_paths = list_scripts(&plugin.resource_dir(layout, ResourceCategory::Lib))?
    .iter()
    .filter_map(|file| module_stem(file))
    .map(|bare| (bare.to_string(), library_module_path(layout, placement, bare)))
    .collect();

  let remapped_paths = plugin
    .config
    .requirejs
    .paths
    .iter()
    .map(|(name, value)| (name.clone(), nest_library_remap(layout, placement, value)))
    .collect();

  let shims = plugin
    .config
    .shims()
    .map(|(name, descriptor)| (name.clone(), descriptor.clone()))
    .collect();

  let modules = list_scripts(&plugin.resource_dir(layout, ResourceCategory::Modules))?
    .iter()
    .filter_map(|file| module_stem(file))
    .map(|stem| {
      let qualified = placement.qualify(stem);
      (qualified.clone(), qualified)
    })
    .collect();

  let mut stylesheets = Vec::new();
  for category in ResourceCategory::ALL {
    let category_dir = layout.category_dir(category);
    for relative in collect_stylesheets(&plugin.resource_dir(layout, category))? {
      stylesheets.push(bundle_relative_path(category_dir, placement, &relative));
    }
  }
  let lib_source = plugin.resource_dir(layout, ResourceCategory::Lib);
  for declared in &plugin.config.css {
    let file_name = Path::new(declared)
      .file_name()
      .with_context(|| format!("plugin `{}` declares stylesheet without a file name: {declared}", plugin.name))?;
    if !plugin.declared_path(declared).is_file() && !lib_source.join(file_name).is_file() {
      debug!(plugin = %plugin.name, stylesheet = %declared, "declared stylesheet not found; skipping");
      continue;
    }
    stylesheets.push(bundle_relative_path(
      &layout.lib_dir,
      placement,
      &file_name.to_string_lossy(),
    ));
  }

  Ok(PluginContribution {
    plugin: plugin.name.clone(),
    library_paths,
    remapped_paths,
    shims,
    modules,
    stylesheets,
  })
}

/// Fold every plugin, in order, into the finished manifest.
pub fn generate_bundle_manifest(
  layout: &ProjectLayout,
  plugins: &[PluginSource],
) -> Result<ResolvedManifest> {
  let manifest = plugins
    .iter()
    .try_fold(BundleManifest::default(), |manifest, plugin| {
      info!(plugin = %plugin.name, in_root = plugin.config.install_in_root, "processing plugin");
      collect_contribution(layout, plugin).map(|contribution| manifest.merge(contribution))
    })?;

  Ok(manifest.finalize(&layout.reserved_names, &layout.theme_dir))
}

//! Output directory reset and plugin resource copying.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use same_file::is_same_file;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::asset_paths::{Placement, should_skip_entry};
use crate::models::{PluginSource, ResourceCategory};
use crate::project::BuildContext;

/// Remove and recreate every category directory under the build root.
///
/// Running two builds against the same build root at once is not supported.
pub fn reset_output_dirs(context: &BuildContext<'_>) -> Result<()> {
  for category in ResourceCategory::ALL {
    let dir = context.output_dir(category);
    match fs::remove_dir_all(&dir) {
      Ok(()) => debug!(dir = %dir.display(), "removed previous output"),
      Err(err) if err.kind() == ErrorKind::NotFound => {}
      Err(err) => return Err(err).with_context(|| format!("failed to remove {}", dir.display())),
    }
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
  }
  Ok(())
}

/// Copy every resource directory of a plugin into the build root.
///
/// Destinations come from the plugin's [`Placement`], the same rule the manifest uses for
/// qualified names. Returns the number of files copied.
pub fn copy_plugin_resources(context: &BuildContext<'_>, plugin: &PluginSource) -> Result<usize> {
  let layout = context.layout;
  let placement = Placement::of(plugin);
  let mut copied = 0;

  for category in ResourceCategory::ALL {
    let source = plugin.resource_dir(layout, category);
    if !source.is_dir() {
      continue;
    }
    let destination = placement.destination(&context.output_dir(category));
    copied += copy_tree(&source, &destination)?;
  }

  let lib_source = plugin.resource_dir(layout, ResourceCategory::Lib);
  let lib_destination = placement.destination(&context.output_dir(ResourceCategory::Lib));
  for declared in &plugin.config.css {
    let Some(file_name) = Path::new(declared).file_name() else {
      continue;
    };
    // Already copied with the rest of the plugin library.
    if lib_source.join(file_name).is_file() {
      continue;
    }
    let target = lib_destination.join(file_name);

    let source = plugin.declared_path(declared);
    if !source.is_file() {
      warn!(plugin = %plugin.name, stylesheet = %declared, "declared stylesheet not found");
      continue;
    }
    fs::create_dir_all(&lib_destination)
      .with_context(|| format!("failed to create {}", lib_destination.display()))?;
    install_resource(&source, &target)?;
    copied += 1;
  }

  Ok(copied)
}

fn copy_tree(source: &Path, destination: &Path) -> Result<usize> {
  let mut copied = 0;
  let walker = WalkDir::new(source)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| entry.depth() == 0 || !should_skip_entry(&entry.file_name().to_string_lossy()));

  for entry in walker {
    let entry = entry.with_context(|| format!("failed to scan {}", source.display()))?;
    let relative = entry
      .path()
      .strip_prefix(source)
      .with_context(|| format!("{} escaped {}", entry.path().display(), source.display()))?;
    let target = destination.join(relative);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).with_context(|| format!("failed to create {}", target.display()))?;
    } else if entry.file_type().is_file() {
      install_resource(entry.path(), &target)?;
      copied += 1;
    }
  }

  Ok(copied)
}

/// Copy a single file, leaving it alone when source and destination are the same file.
pub(crate) fn install_resource(source: &Path, destination: &Path) -> Result<()> {
  if destination.exists() {
    if is_same_file(source, destination)
      .with_context(|| format!("failed to compare {} with {}", source.display(), destination.display()))?
    {
      return Ok(());
    }
    fs::remove_file(destination)
      .with_context(|| format!("failed to replace {}", destination.display()))?;
  }

  fs::copy(source, destination).with_context(|| {
    format!(
      "failed to copy {} to {}",
      source.display(),
      destination.display()
    )
  })?;
  debug!(from = %source.display(), to = %destination.display(), "copied resource");
  Ok(())
}

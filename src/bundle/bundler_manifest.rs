//! The build configuration handed to the RequireJS optimizer.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::manifest::ResolvedManifest;
use crate::models::BundlerManifest;
use crate::project::ProjectLayout;

/// Combine the resolved manifest with the layout's optimizer settings.
///
/// Locations are expressed relative to the project directory so the file is identical no
/// matter where the project is checked out.
pub fn bundler_manifest(layout: &ProjectLayout, manifest: &ResolvedManifest) -> BundlerManifest {
  let build_dir = layout.build_dir.trim_end_matches('/');
  BundlerManifest {
    paths: manifest.paths.clone(),
    shim: manifest.shim.clone(),
    deps: manifest.deps.clone(),
    base_url: format!("{}/{}", build_dir, layout.modules_dir),
    name: layout.entry_point.clone(),
    out: format!("{}/{}", build_dir, layout.optimized_output),
    optimize: layout.optimize.clone(),
  }
}

/// Serialize the bundler manifest as prettified JSON.
pub fn write_bundler_manifest(path: &Path, manifest: &BundlerManifest) -> Result<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let mut content =
    serde_json::to_string_pretty(manifest).context("failed to serialize bundler manifest")?;
  content.push('\n');
  fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
  info!(path = %path.display(), "generated bundler manifest");
  Ok(())
}

/// Load a previously written bundler manifest.
pub fn load_bundler_manifest(path: &Path) -> Result<BundlerManifest> {
  let content = fs::read_to_string(path)
    .with_context(|| format!("bundler manifest not found at {}", path.display()))?;
  serde_json::from_str(&content)
    .with_context(|| format!("failed to parse bundler manifest {}", path.display()))
}

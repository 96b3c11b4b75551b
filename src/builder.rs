//! Build orchestrator: discovers plugins, resolves the bundle manifest and writes every output.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::bundle::bootstrap::write_bootstrap;
use crate::bundle::bundler_manifest::{bundler_manifest, write_bundler_manifest};
use crate::bundle::copy::{copy_plugin_resources, reset_output_dirs};
use crate::bundle::index::write_index;
use crate::bundle::styles::write_stylesheet_bundle;
use crate::manifest::{ResolvedManifest, generate_bundle_manifest};
use crate::models::{BundlerManifest, PluginSource};
use crate::plugins::discover_plugins;
use crate::project::BuildContext;
use crate::selection::PluginInclusion;

/// Everything a completed build produced.
#[derive(Debug)]
pub struct BuildArtifacts {
  /// Plugins that took part, in processing order.
  pub plugins: Vec<String>,
  /// The resolved path, shim, dependency and stylesheet tables.
  pub manifest: ResolvedManifest,
  /// The configuration written for the module bundler.
  pub bundler_manifest: BundlerManifest,
  /// Generated files, in the order they were written.
  pub written: Vec<PathBuf>,
}

/// High-level helper running a complete application build.
pub struct PluginBundleBuilder<'a> {
  context: BuildContext<'a>,
}

impl<'a> PluginBundleBuilder<'a> {
  /// Create a builder for the provided build context.
  pub fn new(context: BuildContext<'a>) -> Self {
    Self { context }
  }

  /// The context the builder operates in.
  pub fn context(&self) -> &BuildContext<'a> {
    &self.context
  }

  /// Resolve the ordered plugin list without touching the build output.
  pub fn plugins<S: PluginInclusion>(&self, selection: &S) -> Result<Vec<PluginSource>> {
    Ok(discover_plugins(&self.context, selection)?)
  }

  /// Run the build.
  ///
  /// Every input is read and validated before the output directories are reset, so a
  /// malformed plugin manifest or a missing template aborts without destroying the previous
  /// build. All writes have completed when this returns.
  pub fn build<S: PluginInclusion>(&self, selection: &S) -> Result<BuildArtifacts> {
    let context = &self.context;
    let layout = context.layout;

    let plugins = self.plugins(selection)?;
    if plugins.is_empty() {
      bail!("no plugins found in {}", context.plugins_root.display());
    }
    self.check_templates()?;

    let manifest = generate_bundle_manifest(layout, &plugins)?;

    reset_output_dirs(context)?;
    for plugin in &plugins {
      let copied = copy_plugin_resources(context, plugin)
        .with_context(|| format!("failed to copy resources of plugin `{}`", plugin.name))?;
      debug!(plugin = %plugin.name, files = copied, "copied plugin resources");
    }

    let mut written = Vec::new();
    written.push(write_bootstrap(context, &manifest)?);
    written.push(write_index(context, &self.linked_stylesheets(&manifest))?);

    let bundler_manifest = bundler_manifest(layout, &manifest);
    let bundler_manifest_path = context.bundler_manifest_path();
    write_bundler_manifest(&bundler_manifest_path, &bundler_manifest)?;
    written.push(bundler_manifest_path);

    if let Some(path) = write_stylesheet_bundle(context, &manifest.stylesheets)? {
      written.push(path);
    }

    info!(
      plugins = plugins.len(),
      modules = manifest.deps.len(),
      stylesheets = manifest.stylesheets.len(),
      "build complete"
    );

    Ok(BuildArtifacts {
      plugins: plugins.into_iter().map(|plugin| plugin.name).collect(),
      manifest,
      bundler_manifest,
      written,
    })
  }

  fn check_templates(&self) -> Result<()> {
    let core = self.context.core_plugin_dir();
    let layout = self.context.layout;
    for template in [&layout.main_template, &layout.index_template] {
      let path = core.join(template);
      if !path.is_file() {
        bail!("required template {} does not exist", path.display());
      }
    }
    Ok(())
  }

  fn linked_stylesheets(&self, manifest: &ResolvedManifest) -> Vec<String> {
    match &self.context.layout.stylesheet_bundle {
      Some(bundle) => vec![bundle.trim_start_matches('/').to_string()],
      None => manifest.stylesheets.clone(),
    }
  }
}

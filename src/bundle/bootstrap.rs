//! Generation of the bootstrap module from the core plugin's `main.js` template.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::{NoExpand, Regex};
use tracing::{info, warn};

use crate::manifest::ResolvedManifest;
use crate::project::BuildContext;

struct Placeholders {
  paths: Regex,
  shim: Regex,
  modules: Regex,
}

fn placeholders() -> &'static Placeholders {
  static PLACEHOLDERS: OnceLock<Placeholders> = OnceLock::new();
  PLACEHOLDERS.get_or_init(|| Placeholders {
    paths: Regex::new(r"\$paths").expect("invalid paths placeholder regex"),
    shim: Regex::new(r"\$shim").expect("invalid shim placeholder regex"),
    modules: Regex::new(r"\$modules").expect("invalid modules placeholder regex"),
  })
}

/// Substitute the first `$paths`, `$shim` and `$modules` placeholders of a template.
///
/// Values are inserted literally, so `$` characters inside module paths survive.
pub fn render_bootstrap(template: &str, manifest: &ResolvedManifest) -> Result<String> {
  let placeholders = placeholders();
  let paths = format!("paths : {}", serde_json::to_string(&manifest.paths)?);
  let shim = format!("shim : {}", serde_json::to_string(&manifest.shim)?);
  let modules = serde_json::to_string(&manifest.deps)?;

  let text = placeholders.paths.replacen(template, 1, NoExpand(&paths));
  let text = placeholders.shim.replacen(&text, 1, NoExpand(&shim));
  let text = placeholders.modules.replacen(&text, 1, NoExpand(&modules));
  Ok(text.into_owned())
}

/// Render the bootstrap template into the modules directory and return the written path.
pub fn write_bootstrap(context: &BuildContext<'_>, manifest: &ResolvedManifest) -> Result<PathBuf> {
  let layout = context.layout;
  let template_path = context.core_plugin_dir().join(&layout.main_template);
  let template = fs::read_to_string(&template_path)
    .with_context(|| format!("failed to read bootstrap template {}", template_path.display()))?;

  if manifest.deps.iter().any(|dep| *dep == layout.entry_point) {
    warn!(module = %layout.entry_point, "bootstrap replaces a plugin module with the same name");
  }

  let target = context
    .build_dir
    .join(&layout.modules_dir)
    .join(format!("{}.js", layout.entry_point));
  if let Some(parent) = target.parent() {
    fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
  }
  fs::write(&target, render_bootstrap(&template, manifest)?)
    .with_context(|| format!("failed to write {}", target.display()))?;
  info!(path = %target.display(), "generated bootstrap module");
  Ok(target)
}

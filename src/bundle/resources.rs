//! Vendoring of declared third-party resources into a plugin's library directory.
//!
//! Runs inside a single plugin's source tree before the plugin is packaged, so that the
//! application build only ever has to look at the plugin's resource directories.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use tracing::{debug, info};

use crate::bundle::copy::install_resource;
use crate::models::{NpmResource, PluginConfig};
use crate::plugins::load_plugin_config;
use crate::project::ProjectLayout;

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
  #[serde(default)]
  main: Option<String>,
}

/// Resolve an npm resource name (`jquery` or `ol/ol.css`) to a file under `node_modules`.
pub fn resolve_npm_resource(node_modules: &Path, resource: &str) -> Result<PathBuf> {
  let candidate = node_modules.join(resource);
  if candidate.is_file() {
    return Ok(candidate);
  }

  let with_extension = node_modules.join(format!("{resource}.js"));
  if with_extension.is_file() {
    return Ok(with_extension);
  }

  if candidate.is_dir() {
    let package_json = candidate.join("package.json");
    let main = match fs::read_to_string(&package_json) {
      Ok(content) => serde_json::from_str::<PackageJson>(&content)
        .with_context(|| format!("failed to parse {}", package_json.display()))?
        .main,
      Err(_) => None,
    };
    let entry = candidate.join(main.as_deref().unwrap_or("index.js"));
    if entry.is_file() {
      return Ok(entry);
    }
    let entry_with_extension = entry.with_extension("js");
    if entry_with_extension.is_file() {
      return Ok(entry_with_extension);
    }
  }

  Err(anyhow!(
    "cannot resolve npm resource `{resource}` in {}",
    node_modules.display()
  ))
}

/// Copy the plugin's declared path remaps, stylesheets and npm resources into its library
/// directory. Returns the written files.
pub fn prepare_plugin_resources(layout: &ProjectLayout, plugin_dir: &Path) -> Result<Vec<PathBuf>> {
  let config_path = plugin_dir.join(&layout.plugin_config_file);
  let config = load_plugin_config(&config_path)?;
  let lib_dir = plugin_dir.join(&layout.lib_dir);
  fs::create_dir_all(&lib_dir).with_context(|| format!("failed to create {}", lib_dir.display()))?;

  let mut written = Vec::new();
  for (source, file_name) in planned_copies(layout, plugin_dir, &config)? {
    let target = lib_dir.join(&file_name);
    if !source.is_file() {
      bail!(
        "{} declares {} but the file does not exist",
        config_path.display(),
        source.display()
      );
    }
    install_resource(&source, &target)?;
    written.push(target);
  }

  info!(plugin = %plugin_dir.display(), files = written.len(), "prepared plugin resources");
  Ok(written)
}

fn planned_copies(
  layout: &ProjectLayout,
  plugin_dir: &Path,
  config: &PluginConfig,
) -> Result<Vec<(PathBuf, String)>> {
  let mut copies = Vec::new();

  for (name, value) in &config.requirejs.paths {
    if value.contains(layout.lib_dir.as_str()) {
      debug!(module = %name, path = %value, "path already inside library directory");
      continue;
    }
    let source = plugin_dir.join(format!("{}.js", value.trim_start_matches('/')));
    copies.push((source, format!("{}.js", file_name_of(value)?)));
  }

  for stylesheet in &config.css {
    copies.push((
      plugin_dir.join(stylesheet.trim_start_matches('/')),
      file_name_of(stylesheet)?,
    ));
  }

  let node_modules = plugin_dir.join(&layout.node_modules_dir);
  for (resource, target) in &config.npm_resources {
    let file_name = match target {
      NpmResource::Enabled(false) => continue,
      NpmResource::Enabled(true) => None,
      NpmResource::Rename(name) => Some(name.clone()),
    };
    let source = resolve_npm_resource(&node_modules, resource)?;
    let file_name = match file_name {
      Some(name) => name,
      None => file_name_of(&source.to_string_lossy())?,
    };
    copies.push((source, file_name));
  }

  Ok(copies)
}

fn file_name_of(path: &str) -> Result<String> {
  Path::new(path)
    .file_name()
    .map(|name| name.to_string_lossy().to_string())
    .ok_or_else(|| anyhow!("`{path}` has no file name"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ProjectConfig;
  use tempfile::tempdir;

  fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
  }

  #[test]
  fn resolves_files_packages_and_extensionless_names() {
    let dir = tempdir().unwrap();
    let modules = dir.path();
    write_file(&modules.join("ol/ol.css"), "");
    write_file(&modules.join("moment/min/moment.min.js"), "");
    write_file(&modules.join("jquery/package.json"), r#"{"main": "dist/jquery.js"}"#);
    write_file(&modules.join("jquery/dist/jquery.js"), "");
    write_file(&modules.join("plain/index.js"), "");

    assert_eq!(resolve_npm_resource(modules, "ol/ol.css").unwrap(), modules.join("ol/ol.css"));
    assert_eq!(
      resolve_npm_resource(modules, "moment/min/moment.min").unwrap(),
      modules.join("moment/min/moment.min.js")
    );
    assert_eq!(
      resolve_npm_resource(modules, "jquery").unwrap(),
      modules.join("jquery/dist/jquery.js")
    );
    assert_eq!(resolve_npm_resource(modules, "plain").unwrap(), modules.join("plain/index.js"));
    assert!(resolve_npm_resource(modules, "absent").is_err());
  }

  #[test]
  fn copies_declared_resources_into_library_directory() {
    let dir = tempdir().unwrap();
    let plugin = dir.path();
    write_file(
      &plugin.join("geoladris.json"),
      r#"{
        "requirejs": {"paths": {"proj4": "vendor/proj4", "ol": "../jslib/ol"}},
        "css": ["vendor/ol.css"],
        "npmResources": {"jquery": true, "moment/min/moment.min": "moment.js", "skipped": false}
      }"#,
    );
    write_file(&plugin.join("vendor/proj4.js"), "proj4");
    write_file(&plugin.join("vendor/ol.css"), ".ol{}");
    write_file(&plugin.join("node_modules/jquery/package.json"), r#"{"main": "dist/jquery.js"}"#);
    write_file(&plugin.join("node_modules/jquery/dist/jquery.js"), "jquery");
    write_file(&plugin.join("node_modules/moment/min/moment.min.js"), "moment");

    let layout = ProjectConfig::default().into_layout();
    let written = prepare_plugin_resources(&layout, plugin).unwrap();

    let lib = plugin.join("jslib");
    assert_eq!(written.len(), 4);
    assert_eq!(fs::read_to_string(lib.join("proj4.js")).unwrap(), "proj4");
    assert_eq!(fs::read_to_string(lib.join("ol.css")).unwrap(), ".ol{}");
    assert_eq!(fs::read_to_string(lib.join("jquery.js")).unwrap(), "jquery");
    assert_eq!(fs::read_to_string(lib.join("moment.js")).unwrap(), "moment");
    assert!(!lib.join("ol.js").exists());
  }

  #[test]
  fn missing_declared_source_is_an_error() {
    let dir = tempdir().unwrap();
    let plugin = dir.path();
    write_file(&plugin.join("geoladris.json"), r#"{"css": ["vendor/missing.css"]}"#);

    let layout = ProjectConfig::default().into_layout();
    let err = prepare_plugin_resources(&layout, plugin).unwrap_err();
    assert!(err.to_string().contains("missing.css"));
  }
}

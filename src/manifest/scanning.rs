//! Directory scanning for the scripts and stylesheets a plugin ships.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::asset_paths::{is_script, is_stylesheet, should_skip_entry};

/// Script file names directly inside `dir`, sorted by name.
///
/// A missing directory contributes nothing.
pub fn list_scripts(dir: &Path) -> Result<Vec<String>> {
  let entries = match fs::read_dir(dir) {
    Ok(entries) => entries,
    Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
    Err(err) => {
      return Err(err).with_context(|| format!("failed to read {}", dir.display()));
    }
  };

  let mut scripts = Vec::new();
  for entry in entries {
    let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
    if !entry.file_type().is_ok_and(|ft| ft.is_file()) {
      continue;
    }

    let name = entry.file_name().to_string_lossy().to_string();
    if is_script(&name) {
      scripts.push(name);
    }
  }

  scripts.sort();
  Ok(scripts)
}

/// Stylesheets anywhere below `dir`, as forward-slash paths relative to it.
///
/// Entries are visited in file-name order so the result is stable across platforms.
pub fn collect_stylesheets(dir: &Path) -> Result<Vec<String>> {
  if !dir.is_dir() {
    return Ok(Vec::new());
  }

  let mut stylesheets = Vec::new();
  let walker = WalkDir::new(dir)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| entry.depth() == 0 || !should_skip_entry(&entry.file_name().to_string_lossy()));

  for entry in walker {
    let entry = entry.with_context(|| format!("failed to scan {}", dir.display()))?;
    if !entry.file_type().is_file() || !is_stylesheet(&entry.file_name().to_string_lossy()) {
      continue;
    }

    let relative = entry
      .path()
      .strip_prefix(dir)
      .with_context(|| format!("{} escaped {}", entry.path().display(), dir.display()))?;
    stylesheets.push(relative.to_string_lossy().replace('\\', "/"));
  }

  Ok(stylesheets)
}

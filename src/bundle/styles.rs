//! Concatenated stylesheet artifact for optimized deployments.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use tracing::{info, warn};

use crate::project::BuildContext;

fn url_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"url\(\s*(['"]?)([^'")]*)['"]?\s*\)"#).expect("invalid url() regex")
  })
}

fn comment_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("invalid comment regex"))
}

fn whitespace_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"\s+").expect("invalid whitespace regex"))
}

fn punctuation_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"\s*([{};,])\s*").expect("invalid punctuation regex"))
}

/// Rewrite relative `url(...)` references of a stylesheet located at `stylesheet` (relative to
/// the build root) so they resolve from a file `depth` directories below the build root.
pub fn rebase_urls(css: &str, stylesheet: &str, depth: usize) -> String {
  let base = match stylesheet.rsplit_once('/') {
    Some((dir, _)) => format!("{dir}/"),
    None => String::new(),
  };
  let climb = "../".repeat(depth);

  url_pattern()
    .replace_all(css, |caps: &Captures<'_>| {
      let quote = &caps[1];
      let target = caps[2].trim();
      if target.is_empty() || target.starts_with('/') || target.starts_with('#') || target.contains(':') {
        return caps[0].to_string();
      }
      format!("url({quote}{climb}{base}{target}{quote})")
    })
    .into_owned()
}

/// Strip comments and redundant whitespace.
///
/// Works on the raw text: whitespace inside quoted strings is collapsed too.
pub fn minify_css(css: &str) -> String {
  let text = comment_pattern().replace_all(css, "");
  let text = whitespace_pattern().replace_all(&text, " ");
  let text = punctuation_pattern().replace_all(&text, "$1");
  text.replace(";}", "}").trim().to_string()
}

/// Concatenate the copied stylesheets, in order, into one minified document.
pub fn concatenate_stylesheets(build_dir: &Path, stylesheets: &[String], output: &str) -> Result<String> {
  let depth = output.trim_start_matches('/').matches('/').count();
  let mut parts = Vec::with_capacity(stylesheets.len());

  for stylesheet in stylesheets {
    let path = build_dir.join(stylesheet);
    if !path.is_file() {
      warn!(stylesheet = %stylesheet, "stylesheet missing from build output; not bundled");
      continue;
    }
    let css = fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    parts.push(minify_css(&rebase_urls(&css, stylesheet, depth)));
  }

  let mut bundle = parts.join("\n");
  bundle.push('\n');
  Ok(bundle)
}

/// Write the configured stylesheet bundle, if any, and return its path.
pub fn write_stylesheet_bundle(context: &BuildContext<'_>, stylesheets: &[String]) -> Result<Option<PathBuf>> {
  let Some(output) = context.layout.stylesheet_bundle.as_deref() else {
    return Ok(None);
  };

  let bundle = concatenate_stylesheets(&context.build_dir, stylesheets, output)?;
  let target = context.build_dir.join(output.trim_start_matches('/'));
  if let Some(parent) = target.parent() {
    fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
  }
  fs::write(&target, bundle).with_context(|| format!("failed to write {}", target.display()))?;
  info!(path = %target.display(), stylesheets = stylesheets.len(), "generated stylesheet bundle");
  Ok(Some(target))
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn rebases_relative_urls_only() {
    let css = r#"a{background:url("img/a.png")} b{background:url(/abs.png)} c{background:url(data:image/png;base64,xyz)} d{src:url('../fonts/f.woff')}"#;
    let rebased = rebase_urls(css, "styles/layers/legend.css", 0);
    assert_eq!(
      rebased,
      r#"a{background:url("styles/layers/img/a.png")} b{background:url(/abs.png)} c{background:url(data:image/png;base64,xyz)} d{src:url('styles/layers/../fonts/f.woff')}"#
    );
  }

  #[test]
  fn rebases_for_nested_bundle_location() {
    let rebased = rebase_urls("a{background:url(img/a.png)}", "theme/base.css", 1);
    assert_eq!(rebased, "a{background:url(../theme/img/a.png)}");
  }

  #[test]
  fn minifies_comments_and_whitespace() {
    let css = "/* header */\n.map ,\n.legend {\n  color : red;\n  margin: 0;\n}\n";
    assert_eq!(minify_css(css), ".map,.legend{color : red;margin: 0}");
  }

  #[test]
  fn concatenates_in_link_order_and_skips_missing_files() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("styles/layers")).unwrap();
    fs::write(root.join("styles/app.css"), "body { margin: 0; }").unwrap();
    fs::write(root.join("styles/layers/legend.css"), ".legend { color: blue; }").unwrap();

    let bundle = concatenate_stylesheets(
      root,
      &[
        "styles/app.css".into(),
        "styles/missing.css".into(),
        "styles/layers/legend.css".into(),
      ],
      "app.min.css",
    )
    .unwrap();

    assert_eq!(bundle, "body{margin: 0}\n.legend{color: blue}\n");
  }
}

//! Generation of `index.html` from the core plugin's template.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::project::{BuildContext, StylesheetFormat};

const TITLE_PLACEHOLDER: &str = "$title";
const STYLESHEETS_PLACEHOLDER: &str = "$stylesheets";

/// Render the stylesheet list in the configured format.
pub fn render_stylesheets(stylesheets: &[String], format: StylesheetFormat) -> Result<String> {
  match format {
    StylesheetFormat::Links => Ok(
      stylesheets
        .iter()
        .map(|href| format!("\t<link rel=\"stylesheet\" href=\"{}\">", escape_attribute(href)))
        .collect::<Vec<_>>()
        .join("\n"),
    ),
    StylesheetFormat::Json => Ok(serde_json::to_string(stylesheets)?),
  }
}

/// Substitute the title and stylesheet placeholders of an HTML template.
pub fn render_index(template: &str, title: &str, stylesheets: &str) -> String {
  let title = if title.is_empty() {
    String::new()
  } else {
    format!("<title>{}</title>", escape_text(title))
  };

  template
    .replacen(TITLE_PLACEHOLDER, &title, 1)
    .replacen(STYLESHEETS_PLACEHOLDER, stylesheets, 1)
}

/// Write `index.html` into the build root, linking the given stylesheets in order.
pub fn write_index(context: &BuildContext<'_>, stylesheets: &[String]) -> Result<PathBuf> {
  let layout = context.layout;
  let template_path = context.core_plugin_dir().join(&layout.index_template);
  let template = fs::read_to_string(&template_path)
    .with_context(|| format!("failed to read HTML template {}", template_path.display()))?;

  let rendered = render_index(
    &template,
    &layout.title,
    &render_stylesheets(stylesheets, layout.stylesheet_format)?,
  );

  let target = context.build_dir.join(&layout.index_template);
  fs::create_dir_all(&context.build_dir)
    .with_context(|| format!("failed to create {}", context.build_dir.display()))?;
  fs::write(&target, rendered).with_context(|| format!("failed to write {}", target.display()))?;
  info!(path = %target.display(), stylesheets = stylesheets.len(), "generated HTML document");
  Ok(target)
}

fn escape_text(value: &str) -> String {
  value
    .replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
  escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn stylesheets() -> Vec<String> {
    vec!["styles/app.css".into(), "styles/layers/legend.css".into()]
  }

  #[test]
  fn renders_link_tags_in_order() {
    let rendered = render_stylesheets(&stylesheets(), StylesheetFormat::Links).unwrap();
    assert_eq!(
      rendered,
      "\t<link rel=\"stylesheet\" href=\"styles/app.css\">\n\t<link rel=\"stylesheet\" href=\"styles/layers/legend.css\">"
    );
  }

  #[test]
  fn renders_json_array() {
    let rendered = render_stylesheets(&stylesheets(), StylesheetFormat::Json).unwrap();
    assert_eq!(rendered, r#"["styles/app.css","styles/layers/legend.css"]"#);
  }

  #[test]
  fn substitutes_title_and_stylesheets() {
    let template = "<head>\n$title\n$stylesheets\n</head>";
    assert_eq!(render_index(template, "", "LINKS"), "<head>\n\nLINKS\n</head>");
    assert_eq!(
      render_index(template, "Forests & Maps", "LINKS"),
      "<head>\n<title>Forests &amp; Maps</title>\nLINKS\n</head>"
    );
  }
}

//! Link order for the collected stylesheets.

use std::cmp::Ordering;

/// Sort stylesheets so root-level files precede plugin-nested ones and theme files come last
/// within each group.
///
/// A path with exactly two segments (`styles/app.css`) lives directly under a category root;
/// anything deeper belongs to a nested plugin. The sort is stable: equal entries keep the
/// plugin order they were discovered in.
pub fn order_stylesheets(stylesheets: &mut [String], theme_dir: &str) {
  stylesheets.sort_by(|a, b| compare_stylesheets(a, b, theme_dir));
}

fn compare_stylesheets(a: &str, b: &str, theme_dir: &str) -> Ordering {
  is_nested(a)
    .cmp(&is_nested(b))
    .then_with(|| is_theme(a, theme_dir).cmp(&is_theme(b, theme_dir)))
}

fn is_nested(path: &str) -> bool {
  path.split('/').filter(|segment| !segment.is_empty()).count() > 2
}

fn is_theme(path: &str, theme_dir: &str) -> bool {
  path.split('/').next() == Some(theme_dir)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ordered(input: &[&str]) -> Vec<String> {
    let mut stylesheets: Vec<String> = input.iter().map(|value| value.to_string()).collect();
    order_stylesheets(&mut stylesheets, "theme");
    stylesheets
  }

  #[test]
  fn root_level_precedes_nested() {
    assert_eq!(
      ordered(&["styles/layers/legend.css", "styles/app.css"]),
      vec!["styles/app.css", "styles/layers/legend.css"]
    );
  }

  #[test]
  fn theme_follows_other_categories_at_same_depth() {
    assert_eq!(
      ordered(&[
        "theme/layers/dark.css",
        "theme/base.css",
        "styles/layers/legend.css",
        "jslib/layers/ol.css",
        "styles/app.css",
      ]),
      vec![
        "styles/app.css",
        "theme/base.css",
        "styles/layers/legend.css",
        "jslib/layers/ol.css",
        "theme/layers/dark.css",
      ]
    );
  }

  #[test]
  fn ordering_is_stable_for_equal_entries() {
    assert_eq!(
      ordered(&["styles/b/x.css", "styles/a/y.css", "modules/c/z.css"]),
      vec!["styles/b/x.css", "styles/a/y.css", "modules/c/z.css"]
    );
  }
}

use std::sync::OnceLock;

use regex::Regex;

fn skipped_entry_patterns() -> &'static [Regex] {
  static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
  PATTERNS
    .get_or_init(|| {
      vec![
        Regex::new(r"^\.").expect("invalid hidden file regex"),
        Regex::new(r"~$").expect("invalid backup file regex"),
        Regex::new(r"(?i)\.sw[op]$").expect("invalid swap file regex"),
      ]
    })
    .as_slice()
}

/// Whether a directory entry is editor or VCS noise that never belongs in a bundle.
pub fn should_skip_entry(file_name: &str) -> bool {
  skipped_entry_patterns()
    .iter()
    .any(|pattern| pattern.is_match(file_name))
}

/// Whether a file is a script the module loader can address.
pub fn is_script(file_name: &str) -> bool {
  file_name.ends_with(".js") && !should_skip_entry(file_name)
}

/// Whether a file is a stylesheet.
pub fn is_stylesheet(file_name: &str) -> bool {
  file_name.ends_with(".css") && !should_skip_entry(file_name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn skips_hidden_and_editor_files() {
    assert!(should_skip_entry(".DS_Store"));
    assert!(should_skip_entry("map.js~"));
    assert!(should_skip_entry("map.js.swp"));
    assert!(!should_skip_entry("map.js"));
  }

  #[test]
  fn classifies_scripts_and_stylesheets() {
    assert!(is_script("map.js"));
    assert!(!is_script("map.json"));
    assert!(!is_script(".hidden.js"));
    assert!(is_stylesheet("legend.css"));
    assert!(!is_stylesheet("legend.scss"));
  }
}

//! Naming and path rules shared by the copy step and the manifest step.
//!
//! Both steps derive a plugin's on-disk destination and its qualified module names from the
//! same [`Placement`], so generated paths always match where the files were copied.

mod bundle;
mod filters;
mod naming;

pub use bundle::{bundle_relative_path, library_module_path, nest_library_remap};
pub use filters::{is_script, is_stylesheet, should_skip_entry};
pub use naming::{Placement, module_stem, plugin_name_from_dir};

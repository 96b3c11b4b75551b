#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod builder;
pub mod bundle;
pub mod config;
pub mod manifest;
pub mod models;
pub mod plugins;
pub mod project;
pub mod selection;

pub use builder::{BuildArtifacts, PluginBundleBuilder};
pub use config::ProjectConfig;
pub use manifest::{BundleManifest, ResolvedManifest};
pub use project::{BuildContext, ProjectLayout};
pub use selection::{AllPlugins, PluginInclusion, PluginSelection};

//! Filesystem side effects of a build: copying resources and writing generated files.

pub mod bootstrap;
pub mod bundler_manifest;
pub mod copy;
pub mod index;
pub mod resources;
pub mod styles;

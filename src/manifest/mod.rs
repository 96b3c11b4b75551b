//! Bundle manifest construction: a fold of per-plugin contributions, in plugin order.

mod accumulator;
mod generation;
mod scanning;
mod stylesheets;

pub use accumulator::{BundleManifest, PluginContribution, ResolvedManifest};
pub use generation::{collect_contribution, generate_bundle_manifest};
pub use scanning::{collect_stylesheets, list_scripts};
pub use stylesheets::order_stylesheets;

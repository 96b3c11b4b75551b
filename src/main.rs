use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plugin_bundler::{BuildContext, PluginBundleBuilder, PluginSelection, ProjectConfig};
use plugin_bundler::bundle::resources::prepare_plugin_resources;
use tracing_subscriber::EnvFilter;

/// Assemble plugin resources into a single RequireJS web application.
#[derive(Parser)]
#[command(name = "plugin-bundler")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Project directory the configured layout is relative to
  #[arg(long, global = true, default_value = ".")]
  project_dir: PathBuf,

  /// Project configuration file (default: <project-dir>/bundler.config.json)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the application (the default)
  Build,

  /// Copy a plugin's declared third-party resources into its library directory
  Prepare {
    /// Plugin source directory
    #[arg(default_value = ".")]
    plugin_dir: PathBuf,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
    )
    .without_time()
    .with_writer(std::io::stderr)
    .init();

  let config = match &cli.config {
    Some(path) => ProjectConfig::load_from_path(path)?,
    None => ProjectConfig::discover(&cli.project_dir)?,
  };
  let layout = config.into_layout();

  match cli.command.unwrap_or(Commands::Build) {
    Commands::Build => {
      let builder = PluginBundleBuilder::new(BuildContext::new(&layout, &cli.project_dir));
      let selection = PluginSelection::load_from_path(builder.context().selection_path())?;
      let artifacts = builder.build(&selection).context("build failed")?;
      for path in &artifacts.written {
        println!("{}", path.display());
      }
    }
    Commands::Prepare { plugin_dir } => {
      for path in prepare_plugin_resources(&layout, &plugin_dir)? {
        println!("{}", path.display());
      }
    }
  }

  Ok(())
}

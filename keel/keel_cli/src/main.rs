use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use keel_runtime::{
    EnvironmentStore, Manifest, ManifestSource, Orchestrator, OrchestratorConfig,
    StaticModuleLoader,
};

/// Keel Command Line Interface
///
/// A thin desktop shell around the Keel bootstrap runtime: it resolves the
/// manifest, drives init / load / tick / deinit, and nothing else.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bootstrap from a manifest and drive the frame loop
    Run {
        /// Path to the manifest (defaults to $APP_MANIFEST_PATH)
        #[clap(long)]
        manifest: Option<PathBuf>,

        /// Number of frames to drive before a clean shutdown
        #[clap(long, default_value = "60")]
        frames: u64,
    },

    /// Parse a manifest and report its host OS sections
    Inspect {
        /// Path to the manifest (defaults to $APP_MANIFEST_PATH)
        #[clap(long)]
        manifest: Option<PathBuf>,
    },
}

fn resolve_manifest_path(flag: Option<PathBuf>, store: &EnvironmentStore) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    match store.get("APP_MANIFEST_PATH") {
        Some(path) => Ok(PathBuf::from(path)),
        None => bail!("No manifest given: pass --manifest or set APP_MANIFEST_PATH"),
    }
}

fn run(manifest: Option<PathBuf>, frames: u64) -> Result<()> {
    let store = Arc::new(EnvironmentStore::from_process());
    let manifest_path = resolve_manifest_path(manifest, &store)?;

    if let Some(data_dir) = store.get("APP_DATA_DIR") {
        info!(%data_dir, "Data directory");
    }

    let loader = Arc::new(StaticModuleLoader::new().with_ctor(
        keel_archive::MODULE_STEM,
        keel_archive::register_directory_backend,
    ));

    let mut orchestrator =
        Orchestrator::new(OrchestratorConfig::default(), store, loader)?;
    orchestrator.init(Arc::new(()))?;
    orchestrator.load_manifest(ManifestSource::from(manifest_path.as_path()))?;

    info!(frames, "Entering frame loop");
    for _ in 0..frames {
        orchestrator.tick()?;
    }

    orchestrator.deinit();
    info!("Shutdown complete");
    Ok(())
}

fn inspect(manifest: Option<PathBuf>) -> Result<()> {
    let store = EnvironmentStore::from_process();
    let manifest_path = resolve_manifest_path(manifest, &store)?;

    let text = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("reading {}", manifest_path.display()))?;
    let manifest = Manifest::from_text(&text)?;

    for os_id in manifest.host_os_ids() {
        let host = manifest.host_section(os_id)?;
        println!(
            "{}: {} environment directive(s), {} module(s)",
            os_id,
            host.environments.len(),
            host.modules.len()
        );
        for module in &host.modules {
            println!("  module {}", module);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { manifest, frames } => run(manifest, frames),
        Commands::Inspect { manifest } => inspect(manifest),
    }
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use readinglist::{ConfigOverrides, Site, SiteConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Renders a reading list CSV into a static HTML page.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to a TOML config file. Defaults to `readingList.toml` if it exists.
    #[arg(long)]
    config: Option<PathBuf>,

    /// The CSV file to read entries from.
    #[arg(long)]
    input: Option<PathBuf>,

    /// The directory to write the page to.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_env("READINGLIST_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = SiteConfig::discover(args.config.as_deref(), ".")
        .context("failed to load config")?;
    config.apply_overrides(ConfigOverrides {
        input_path: args.input,
        output_dir: args.output_dir,
    });

    let site = Site::new(config);
    debug!(config = ?site.config(), "generating site");

    let output_path = site.generate().context("failed to generate site")?;
    info!("Wrote {}", output_path.display());

    Ok(())
}

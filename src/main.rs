use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stiffness_spy::spy::{render_rgb, show};
use stiffness_spy::{spy_matrix_market, SpyConfig};

/// Show the sparsity pattern of a Matrix Market matrix
#[derive(Parser, Debug)]
#[command(name = "stiffness-spy")]
#[command(version, about)]
struct Cli {
    /// Matrix Market file to plot
    #[arg(value_name = "MATRIX", env = "STIFFNESS_SPY_MATRIX")]
    matrix: PathBuf,

    /// Figure title
    #[arg(long, default_value = "STIFFNESS")]
    title: String,

    /// Entries with magnitude at or below this are not plotted
    #[arg(long, default_value_t = 1e-7)]
    precision: f64,

    /// Marker size in points
    #[arg(long, default_value_t = 0.1)]
    marker_size: f64,

    /// Figure resolution in dots per inch
    #[arg(long, default_value_t = 100)]
    dpi: u32,
}

impl Cli {
    fn spy_config(&self) -> SpyConfig {
        let mut config = SpyConfig {
            title: self.title.clone(),
            precision: self.precision,
            marker_size: self.marker_size,
            ..SpyConfig::default()
        };
        config.figure.dpi = self.dpi;
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.spy_config();

    let figure = spy_matrix_market(&cli.matrix, &config)
        .with_context(|| format!("failed to plot {}", cli.matrix.display()))?;
    let raster = render_rgb(&figure.plot, &config).context("failed to render figure")?;
    show(&raster, &figure.plot.title).context("failed to display figure")?;

    Ok(())
}

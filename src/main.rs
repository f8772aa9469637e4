use clap::Parser;
use log::{info, warn};
use phong_viewer::app::{run_cli, run_gui};
use phong_viewer::io::config::Config;
use std::path::PathBuf;

/// Phong-lit OBJ viewer with three toggleable point lights.
#[derive(Parser, Debug)]
#[command(name = "phong-viewer", version)]
struct Cli {
    /// TOML config file. Built-in defaults are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Render one frame to a PNG instead of opening a window.
    #[arg(long)]
    headless: bool,

    /// Output image path for headless mode (overrides `render.output`).
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<(), String> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!("Loading config: {}", path.display());
            Config::load(path).map_err(|e| e.to_string())?
        }
        None => {
            info!("Using built-in defaults");
            Config::default()
        }
    };

    if cli.headless {
        run_cli(&config, cli.output.as_deref())
    } else {
        if cli.output.is_some() {
            warn!("--output only applies to --headless renders");
        }
        run_gui(&config)
    }
}

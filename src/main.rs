//! CropX video cropper
//!
//! Crops a video through ffmpeg, reporting progress while the engine runs
//! and handing the result to an external player on request.
//!
//! # Usage
//!
//! ```bash
//! cropper crop --input sample.mp4 --output cropped.mp4 --width 500 --height 500 -x 300 -y 100
//! cropper crop --asset assets/sample.mp4 --progress json
//! cropper crop --dry-run
//! cropper probe --input sample.mp4
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use cropx_cli::adapters::init_tracing;
use cropx_cli::cli::{commands, Cli, Commands};
use cropx_cli::config_initialization::initialize_configuration_hierarchy;

/// Main entry point for the CropX CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli).await?;
    init_tracing(&config.logging)?;

    info!("Starting CropX");
    debug!(?config, "Effective configuration");

    // Execute the requested command
    match &cli.command {
        Commands::Crop(args) => {
            info!("Executing crop command");
            commands::crop(&config, args).await?;
        }
        Commands::Probe(args) => {
            info!("Executing probe command");
            commands::probe(&config, args).await?;
        }
    }

    Ok(())
}

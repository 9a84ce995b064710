//! Configuration initialization and hierarchy management

use anyhow::Result;
use tracing::info;

use crate::adapters::TomlConfigAdapter;
use crate::cli::{Cli, Commands};
use crate::domain::config::AppConfig;
use crate::ports::ConfigPort;

/// Build the effective configuration following precedence: CLI > Env > File > Defaults
pub async fn initialize_configuration_hierarchy(cli: &Cli) -> Result<AppConfig> {
    initialize_with_adapter(&TomlConfigAdapter::new(), cli).await
}

/// Same as [`initialize_configuration_hierarchy`] with an explicit config port
pub async fn initialize_with_adapter(port: &dyn ConfigPort, cli: &Cli) -> Result<AppConfig> {
    // Steps 1-3: defaults, file, environment
    let mut config = port.load_config(cli.config.as_deref()).await?;

    // Step 4: CLI arguments
    let overrides = apply_cli_configuration_overrides(&mut config, cli);
    if overrides > 0 {
        info!("Applied {} CLI configuration overrides", overrides);
    }

    config.validate()?;
    Ok(config)
}

/// Apply CLI argument overrides to configuration, returning how many applied
pub fn apply_cli_configuration_overrides(config: &mut AppConfig, cli: &Cli) -> usize {
    let mut cli_overrides = 0;

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
        cli_overrides += 1;
    }
    if cli.json_log {
        config.logging.json = true;
        cli_overrides += 1;
    }

    match &cli.command {
        Commands::Crop(args) => {
            if let Some(input) = &args.input {
                config.paths.input = input.clone();
                cli_overrides += 1;
            }
            if let Some(output) = &args.output {
                config.paths.output = output.clone();
                cli_overrides += 1;
            }
            if let Some(asset) = &args.asset {
                config.paths.asset = Some(asset.clone());
                cli_overrides += 1;
            }
            if let Some(width) = args.width {
                config.crop.width = width;
                cli_overrides += 1;
            }
            if let Some(height) = args.height {
                config.crop.height = height;
                cli_overrides += 1;
            }
            if let Some(x) = args.x {
                config.crop.x = x;
                cli_overrides += 1;
            }
            if let Some(y) = args.y {
                config.crop.y = y;
                cli_overrides += 1;
            }
            if let Some(decoder) = &args.decoder {
                config.transcode.decoder = decoder.clone();
                cli_overrides += 1;
            }
            if let Some(encoder) = &args.encoder {
                config.transcode.encoder = encoder.clone();
                cli_overrides += 1;
            }
            if let Some(ffmpeg) = &args.ffmpeg {
                config.engine.ffmpeg_path = ffmpeg.clone();
                cli_overrides += 1;
            }
            if let Some(ffprobe) = &args.ffprobe {
                config.engine.ffprobe_path = ffprobe.clone();
                cli_overrides += 1;
            }
        }
        Commands::Probe(args) => {
            if let Some(input) = &args.input {
                config.paths.input = input.clone();
                cli_overrides += 1;
            }
            if let Some(ffprobe) = &args.ffprobe {
                config.engine.ffprobe_path = ffprobe.clone();
                cli_overrides += 1;
            }
        }
    }

    cli_overrides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CropRect;
    use clap::Parser;
    use std::path::PathBuf;

    fn no_env_adapter() -> TomlConfigAdapter {
        TomlConfigAdapter::new()
            .with_env_lookup(|_| None)
            .with_search_paths(Vec::new())
    }

    #[test]
    fn test_crop_overrides() {
        let cli = Cli::parse_from([
            "cropper",
            "--log-level",
            "debug",
            "crop",
            "--input",
            "in.mp4",
            "--width",
            "320",
            "-x",
            "12",
            "--encoder",
            "libx264",
        ]);
        let mut config = AppConfig::default();
        let applied = apply_cli_configuration_overrides(&mut config, &cli);

        assert_eq!(applied, 5);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.paths.input, PathBuf::from("in.mp4"));
        assert_eq!(config.crop, CropRect::new(320, 500, 12, 100));
        assert_eq!(config.transcode.encoder, "libx264");
        assert_eq!(config.transcode.decoder, "libopenh264");
    }

    #[test]
    fn test_probe_overrides() {
        let cli = Cli::parse_from(["cropper", "probe", "--input", "clip.mov"]);
        let mut config = AppConfig::default();
        assert_eq!(apply_cli_configuration_overrides(&mut config, &cli), 1);
        assert_eq!(config.paths.input, PathBuf::from("clip.mov"));
    }

    #[tokio::test]
    async fn test_cli_beats_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cropx.toml");
        std::fs::write(&path, "[crop]\nwidth = 100\nheight = 80\n").unwrap();

        let cli = Cli::parse_from([
            "cropper",
            "--config",
            path.to_str().unwrap(),
            "crop",
            "--height",
            "90",
        ]);
        let config = initialize_with_adapter(&no_env_adapter(), &cli).await.unwrap();
        assert_eq!(config.crop.width, 100);
        assert_eq!(config.crop.height, 90);
    }

    #[tokio::test]
    async fn test_invalid_cli_level_fails_validation() {
        let cli = Cli::parse_from(["cropper", "--log-level", "noisy", "probe"]);
        assert!(initialize_with_adapter(&no_env_adapter(), &cli).await.is_err());
    }
}

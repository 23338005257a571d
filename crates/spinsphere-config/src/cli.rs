//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Command-line arguments for the sphere demo.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "spinsphere", about = "Headless rotating sphere demo")]
pub struct CliArgs {
    /// Sphere subdivision level.
    #[arg(long)]
    pub quality: Option<usize>,

    /// Sphere radius at render time.
    #[arg(long)]
    pub radius: Option<f32>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 120)]
    pub frames: u32,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(quality) = args.quality {
            self.sphere.quality = quality;
        }
        if let Some(radius) = args.radius {
            self.sphere.radius = radius;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            quality: Some(5),
            log_level: Some("trace".to_string()),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.sphere.quality, 5);
        assert_eq!(config.debug.log_level, "trace");
        // Non-overridden fields retain defaults
        assert_eq!(config.sphere.radius, 0.5);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "spinsphere",
            "--quality",
            "2",
            "--radius",
            "0.75",
            "--frames",
            "10",
        ]);
        assert_eq!(args.quality, Some(2));
        assert_eq!(args.radius, Some(0.75));
        assert_eq!(args.frames, 10);
        assert_eq!(args.width, 1280);
        assert!(args.config.is_none());
    }
}

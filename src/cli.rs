//! Command-line argument parsing for the viewer
//!
//! Supports:
//! - Opening a markdown file at startup
//! - Overriding theme and font size for one session
//! - Starting without the native host

use clap::Parser;
use std::path::PathBuf;

use crate::config::ViewerConfig;
use crate::model::ThemeMode;

const MIN_FONT_SIZE: u16 = 8;
const MAX_FONT_SIZE: u16 = 72;

/// A lightweight markdown viewer
#[derive(Parser, Debug, Default)]
#[command(name = "mdview", version, about = "A lightweight markdown viewer")]
pub struct CliArgs {
    /// Markdown file to open
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Preview palette (light or dark)
    #[arg(long, value_name = "THEME")]
    pub theme: Option<ThemeMode>,

    /// Base font size in pixels
    #[arg(long, value_name = "PX")]
    pub font_size: Option<u16>,

    /// Skip the native host and start in degraded mode
    #[arg(long)]
    pub no_host: bool,
}

/// Configuration derived from CLI arguments merged over the config file
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Startup document, surfaced to the controller through `get_cli_args`
    pub path: Option<String>,
    pub config: ViewerConfig,
    pub host_enabled: bool,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self, mut config: ViewerConfig) -> Result<StartupConfig, String> {
        if let Some(theme) = self.theme {
            config.settings.theme = theme;
        }

        if let Some(size) = self.font_size {
            if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) {
                return Err(format!(
                    "Font size {} out of range ({}-{})",
                    size, MIN_FONT_SIZE, MAX_FONT_SIZE
                ));
            }
            config.settings.font_size = size;
        }

        let path = self
            .path
            .map(|p| p.to_string_lossy().into_owned())
            .filter(|p| !p.trim().is_empty());

        Ok(StartupConfig {
            path,
            config,
            host_enabled: !self.no_host,
        })
    }
}

impl StartupConfig {
    /// The argument list the host reports from `get_cli_args`
    pub fn cli_args(&self) -> Vec<String> {
        self.path.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_args_keep_config() {
        let config = CliArgs::default()
            .into_config(ViewerConfig::default())
            .unwrap();
        assert!(config.path.is_none());
        assert!(config.cli_args().is_empty());
        assert!(config.host_enabled);
        assert_eq!(config.config, ViewerConfig::default());
    }

    #[test]
    fn test_single_path() {
        let args = CliArgs {
            path: Some(PathBuf::from("/tmp/readme.md")),
            ..Default::default()
        };
        let config = args.into_config(ViewerConfig::default()).unwrap();
        assert_eq!(config.cli_args(), vec!["/tmp/readme.md".to_string()]);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let args = CliArgs {
            theme: Some(ThemeMode::Dark),
            font_size: Some(20),
            ..Default::default()
        };
        let config = args.into_config(ViewerConfig::default()).unwrap();
        assert_eq!(config.config.settings.theme, ThemeMode::Dark);
        assert_eq!(config.config.settings.font_size, 20);
    }

    #[test]
    fn test_font_size_out_of_range() {
        let args = CliArgs {
            font_size: Some(200),
            ..Default::default()
        };
        assert!(args.into_config(ViewerConfig::default()).is_err());
    }

    #[test]
    fn test_no_host_flag() {
        let args = CliArgs {
            no_host: true,
            ..Default::default()
        };
        assert!(!args.into_config(ViewerConfig::default()).unwrap().host_enabled);
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = CliArgs::parse_from(["mdview", "--theme", "dark", "notes.md"]);
        assert_eq!(args.theme, Some(ThemeMode::Dark));
        assert_eq!(args.path, Some(PathBuf::from("notes.md")));
    }
}

//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use plotstyle::palette::DEFAULT_UNSEEN_COLOR;
use plotstyle::theme::SettingValue;

/// Resolve plot palettes and themes from local or remote YAML files.
#[derive(Debug, Parser)]
#[command(name = "plotstyle", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub globals: Globals,

    #[command(subcommand)]
    pub command: Command,
}

/// Where configuration comes from and how output looks.
#[derive(Debug, Args)]
pub struct Globals {
    /// Directory holding the default palettes.yaml and themes.yaml.
    #[arg(long, global = true, env = "PLOTSTYLE_DEFAULTS_DIR", value_name = "DIR")]
    pub defaults_dir: Option<PathBuf>,

    /// Palette file to load, a path or an http(s) URL.
    #[arg(long, global = true, env = "PLOTSTYLE_PALETTES", value_name = "LOCATION")]
    pub palettes: Option<String>,

    /// Theme file to load, a path or an http(s) URL.
    #[arg(long, global = true, env = "PLOTSTYLE_THEMES", value_name = "LOCATION")]
    pub themes: Option<String>,

    /// Token sent to GitHub hosts when fetching configuration.
    #[arg(long, global = true, env = "GITHUB_PAT", hide_env_values = true)]
    pub token: Option<String>,

    /// Token for font downloads; "none" sends no token. Defaults to --token.
    #[arg(long, global = true, env = "PLOTSTYLE_FONT_TOKEN", hide_env_values = true)]
    pub font_token: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List palette names.
    Palettes,

    /// List theme names.
    Themes,

    /// Resolve a discrete palette, optionally for specific data levels.
    Palette {
        name: String,

        /// Data levels to color, comma separated.
        #[arg(long, value_delimiter = ',')]
        levels: Vec<String>,

        /// Color for levels the palette has no entry for.
        #[arg(long, default_value = DEFAULT_UNSEEN_COLOR, value_name = "COLOR")]
        unseen: String,
    },

    /// Resolve a palette as gradient colors.
    Gradient { name: String },

    /// Resolve a theme with optional setting overrides.
    Theme {
        name: String,

        /// Override a setting, e.g. --set legend.position=none.
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
        overrides: Vec<(String, SettingValue)>,
    },
}

impl Globals {
    /// Log level used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

fn parse_override(raw: &str) -> Result<(String, SettingValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing setting name in '{}'", raw));
    }
    let value = SettingValue::from_override(value.trim()).map_err(|e| e.to_string())?;
    Ok((key.to_string(), value))
}

//! Subcommand handlers.
//!
//! Handlers write to any `io::Write` so tests can capture their output.

use std::io::Write;

use anyhow::{Context, Result};
use plotstyle::fetch::{Credential, FontCredential};
use plotstyle::palette::{ContinuousScale, DiscreteScale};
use plotstyle::store::Defaults;
use plotstyle::ConfigStore;
use serde_json::json;

use crate::cli::{Command, Globals};

/// Loads defaults and any explicitly requested files into `store`.
pub fn initialize(store: &ConfigStore, globals: &Globals) -> Result<()> {
    let defaults = match &globals.defaults_dir {
        Some(dir) => Defaults::in_dir(dir),
        None => Defaults::bundled(),
    };
    let report = store
        .load_defaults(&defaults)
        .context("Failed to load default configuration")?;
    tracing::debug!(palettes = ?report.palettes, themes = ?report.themes, "Loaded defaults");

    let token = globals.token.as_deref().map(Credential::new);

    if let Some(location) = &globals.palettes {
        // Failures are logged and the defaults stay active
        store.load_palettes(location, token.as_ref());
    }

    if let Some(location) = &globals.themes {
        let font_credential = FontCredential::from_option(globals.font_token.as_deref());
        store
            .load_themes(location, token.as_ref(), &font_credential)
            .with_context(|| format!("Failed to load themes from {}", location))?;
    }

    Ok(())
}

pub fn run(store: &ConfigStore, command: &Command, json: bool, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Palettes => names(store.palette_names()?, json, out),
        Command::Themes => names(store.theme_names()?, json, out),
        Command::Palette {
            name,
            levels,
            unseen,
        } => palette(store, name, levels, unseen, json, out),
        Command::Gradient { name } => gradient(store, name, json, out),
        Command::Theme { name, overrides } => {
            let theme = store.resolve_theme(name, overrides.iter().cloned())?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &theme)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{} ({}, family {})", theme.name, theme.base, theme.base_family)?;
                for (key, value) in theme.settings.iter() {
                    writeln!(out, "  {} = {}", key, value)?;
                }
            }
            Ok(())
        }
    }
}

fn names(names: Vec<String>, json: bool, out: &mut dyn Write) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, &names)?;
        writeln!(out)?;
    } else {
        for name in names {
            writeln!(out, "{}", name)?;
        }
    }
    Ok(())
}

fn palette(
    store: &ConfigStore,
    name: &str,
    levels: &[String],
    unseen: &str,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let lookup = match store.discrete(name, unseen)? {
        DiscreteScale::Builtin => return builtin(name, json, out),
        DiscreteScale::Lookup(lookup) => lookup,
    };

    let (pairs, missing): (Vec<(String, String)>, Vec<String>) = if levels.is_empty() {
        let legend = lookup
            .legend()
            .map(|(label, color)| (label.to_string(), color.to_string()))
            .collect();
        (legend, Vec::new())
    } else {
        let resolved = lookup.colors(levels);
        let pairs = resolved
            .pairs(levels)
            .into_iter()
            .map(|(level, color)| (level.to_string(), color.to_string()))
            .collect();
        (pairs, resolved.unseen)
    };

    if json {
        let colors: Vec<_> = pairs
            .iter()
            .map(|(level, color)| json!({ "level": level, "color": color }))
            .collect();
        let value = json!({
            "name": name,
            "builtin": false,
            "colors": colors,
            "unseen": missing,
        });
        serde_json::to_writer_pretty(&mut *out, &value)?;
        writeln!(out)?;
    } else {
        for (level, color) in &pairs {
            writeln!(out, "{}\t{}", level, color)?;
        }
    }
    Ok(())
}

fn gradient(store: &ConfigStore, name: &str, json: bool, out: &mut dyn Write) -> Result<()> {
    let scale = store.continuous(name)?;
    if json {
        serde_json::to_writer(&mut *out, &scale)?;
        writeln!(out)?;
        return Ok(());
    }
    match scale {
        ContinuousScale::Builtin => builtin(name, false, out),
        ContinuousScale::Gradient(colors) => {
            for color in colors {
                writeln!(out, "{}", color)?;
            }
            Ok(())
        }
    }
}

fn builtin(name: &str, json: bool, out: &mut dyn Write) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, &json!({ "name": name, "builtin": true }))?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}: built-in scale of the plotting library", name)?;
    }
    Ok(())
}

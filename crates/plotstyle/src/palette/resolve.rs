//! Turning palette names into scale inputs.
//!
//! Discrete scales need a level → color lookup; continuous scales need an
//! ordered list of gradient stops. The reserved name [`DEFAULT_PALETTE`]
//! defers to the plotting library's own scale unless a palette with that
//! literal name has been loaded.

use serde::Serialize;

use super::table::{LabeledPalette, PaletteTable};
use crate::error::{StyleError, TableKind};

/// Palette name that selects the plotting library's built-in scale.
pub const DEFAULT_PALETTE: &str = "default";

/// Color used for levels a discrete palette has no entry for (grey70).
pub const DEFAULT_UNSEEN_COLOR: &str = "#B3B3B3";

/// What a discrete scale should be built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscreteScale {
    /// Use the plotting library's built-in discrete scale.
    Builtin,
    /// Use manual values from a loaded palette.
    Lookup(DiscreteLookup),
}

/// What a continuous scale should be built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "colors")]
pub enum ContinuousScale {
    /// Use the plotting library's built-in continuous scale.
    Builtin,
    /// Gradient stops in order.
    Gradient(Vec<String>),
}

/// Maps data levels to palette colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscreteLookup {
    name: String,
    palette: LabeledPalette,
    unseen_color: String,
}

/// Colors for a set of levels plus the levels the palette did not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelColors {
    /// One color per requested level, in request order.
    pub colors: Vec<String>,
    /// Levels that fell back to the unseen color, deduplicated, in order.
    pub unseen: Vec<String>,
}

impl LevelColors {
    /// Pairs each level with its color, the form manual scales take.
    pub fn pairs<'a>(&'a self, levels: &'a [impl AsRef<str>]) -> Vec<(&'a str, &'a str)> {
        levels
            .iter()
            .map(|level| level.as_ref())
            .zip(self.colors.iter().map(String::as_str))
            .collect()
    }
}

impl DiscreteLookup {
    pub fn new(
        name: impl Into<String>,
        palette: LabeledPalette,
        unseen_color: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            palette,
            unseen_color: unseen_color.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unseen_color(&self) -> &str {
        &self.unseen_color
    }

    /// Label/color pairs in legend order.
    pub fn legend(&self) -> impl Iterator<Item = (&str, &str)> {
        self.palette.iter()
    }

    /// Resolves each level to a color.
    ///
    /// Levels missing from the palette get the unseen color. If any level
    /// was missing, a single warning listing all of them is emitted.
    pub fn colors(&self, levels: &[impl AsRef<str>]) -> LevelColors {
        let mut colors = Vec::with_capacity(levels.len());
        let mut unseen: Vec<String> = Vec::new();

        for level in levels {
            let level: &str = level.as_ref();
            match self.palette.get(level) {
                Some(color) => colors.push(color.to_string()),
                None => {
                    colors.push(self.unseen_color.clone());
                    if !unseen.iter().any(|seen| seen == level) {
                        unseen.push(level.to_string());
                    }
                }
            }
        }

        if !unseen.is_empty() {
            tracing::warn!(
                palette = %self.name,
                unseen = ?unseen,
                fallback = %self.unseen_color,
                "Values not in palette '{}' were colored {}: {}",
                self.name,
                self.unseen_color,
                unseen.join(", ")
            );
        }

        LevelColors { colors, unseen }
    }
}

/// Resolves palette names against an optional palette table.
///
/// `None` means nothing was ever loaded; only the reserved default name
/// resolves in that state.
#[derive(Debug, Clone, Copy)]
pub struct PaletteResolver<'a> {
    table: Option<&'a PaletteTable>,
}

impl<'a> PaletteResolver<'a> {
    pub fn new(table: Option<&'a PaletteTable>) -> Self {
        Self { table }
    }

    /// Builds the input of a discrete scale.
    ///
    /// # Errors
    ///
    /// - [`StyleError::NotLoaded`] if no palettes are loaded
    /// - [`StyleError::PaletteNotFound`] if `name` is unknown
    /// - [`StyleError::PaletteNotDiscrete`] if the palette has no labels
    pub fn discrete(&self, name: &str, unseen_color: &str) -> Result<DiscreteScale, StyleError> {
        if self.defers_to_builtin(name) {
            return Ok(DiscreteScale::Builtin);
        }

        let palette = self.lookup(name)?;
        let labeled = palette
            .as_labeled()
            .ok_or_else(|| StyleError::PaletteNotDiscrete(name.to_string()))?;
        Ok(DiscreteScale::Lookup(DiscreteLookup::new(
            name,
            labeled.clone(),
            unseen_color,
        )))
    }

    /// Builds the input of a continuous scale.
    ///
    /// Labeled palettes are accepted; their labels are dropped.
    pub fn continuous(&self, name: &str) -> Result<ContinuousScale, StyleError> {
        if self.defers_to_builtin(name) {
            return Ok(ContinuousScale::Builtin);
        }

        Ok(ContinuousScale::Gradient(self.lookup(name)?.colors()))
    }

    fn defers_to_builtin(&self, name: &str) -> bool {
        name == DEFAULT_PALETTE && !self.table.is_some_and(|table| table.contains(name))
    }

    fn lookup(&self, name: &str) -> Result<&'a super::Palette, StyleError> {
        let table = self
            .table
            .ok_or(StyleError::NotLoaded(TableKind::Palettes))?;
        table.get(name).ok_or_else(|| StyleError::PaletteNotFound {
            name: name.to_string(),
            available: table.names(),
        })
    }
}

//! Palette data model and YAML parsing.
//!
//! A palette file is a top-level mapping from palette name to either a
//! mapping of label → color (a discrete palette, in legend order) or a
//! sequence of colors (continuous gradient stops):
//!
//! ```yaml
//! okabe_ito:
//!   control: "#E69F00"
//!   treated: "#56B4E9"
//! npg_gradient:
//!   - "#4DBBD5FF"
//!   - "#00A087FF"
//!   - "#3C5488FF"
//! ```
//!
//! Palettes are validated eagerly: every color must parse with
//! [`ColorDef`](super::ColorDef) and labels must be unique. A file with a
//! single bad entry is rejected as a whole.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_yaml::Value;

use super::color::ColorDef;

/// Label → color entries kept in file order.
///
/// Serializes as a mapping in legend order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledPalette {
    entries: Vec<(String, String)>,
}

impl LabeledPalette {
    /// Builds a palette from label/color pairs.
    ///
    /// Returns an error naming the first repeated label.
    pub fn new<L, C>(entries: impl IntoIterator<Item = (L, C)>) -> Result<Self, String>
    where
        L: Into<String>,
        C: Into<String>,
    {
        let mut palette = Self::default();
        for (label, color) in entries {
            let label = label.into();
            if palette.get(&label).is_some() {
                return Err(format!("duplicate label '{}'", label));
            }
            palette.entries.push((label, color.into()));
        }
        Ok(palette)
    }

    /// Color for `label`, if present.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, color)| color.as_str())
    }

    /// Label/color pairs in legend order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), c.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn colors(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, c)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for LabeledPalette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// A named set of colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Palette {
    /// Label-keyed colors for discrete scales.
    Labeled(LabeledPalette),
    /// Ordered colors for gradients.
    Unlabeled(Vec<String>),
}

impl Palette {
    /// All colors in stored order, labels dropped.
    pub fn colors(&self) -> Vec<String> {
        match self {
            Palette::Labeled(labeled) => labeled.colors().map(str::to_string).collect(),
            Palette::Unlabeled(colors) => colors.clone(),
        }
    }

    /// The labeled form, if this palette has labels.
    pub fn as_labeled(&self) -> Option<&LabeledPalette> {
        match self {
            Palette::Labeled(labeled) => Some(labeled),
            Palette::Unlabeled(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Palette::Labeled(labeled) => labeled.len(),
            Palette::Unlabeled(colors) => colors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn from_value(name: &str, value: &Value) -> Result<Self, String> {
        match value {
            Value::Mapping(mapping) => {
                let mut entries = Vec::with_capacity(mapping.len());
                for (label, color) in mapping {
                    let label = scalar_to_string(label)
                        .ok_or_else(|| format!("palette '{}' has a non-scalar label", name))?;
                    let color = color_string(name, &label, color)?;
                    entries.push((label, color));
                }
                LabeledPalette::new(entries)
                    .map(Palette::Labeled)
                    .map_err(|e| format!("palette '{}': {}", name, e))
            }
            Value::Sequence(sequence) => sequence
                .iter()
                .enumerate()
                .map(|(i, color)| color_string(name, &format!("#{}", i + 1), color))
                .collect::<Result<Vec<_>, _>>()
                .map(Palette::Unlabeled),
            Value::Tagged(tagged) => Self::from_value(name, &tagged.value),
            _ => Err(format!(
                "palette '{}' must be a mapping of label to color or a list of colors",
                name
            )),
        }
    }
}

/// All loaded palettes by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PaletteTable {
    palettes: BTreeMap<String, Palette>,
}

impl PaletteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a palette document.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first problem found: malformed
    /// YAML, a top level that is not a mapping, a palette of the wrong
    /// shape, an invalid color or a duplicate label.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let root: Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
        let mapping = match root {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Err("palette file is empty".to_string()),
            _ => return Err("palette file must be a mapping of palette names".to_string()),
        };

        let mut table = Self::new();
        for (name, value) in &mapping {
            let name = scalar_to_string(name)
                .ok_or_else(|| "palette names must be scalars".to_string())?;
            let palette = Palette::from_value(&name, value)?;
            table.palettes.insert(name, palette);
        }
        Ok(table)
    }

    /// Adds or replaces a palette.
    pub fn insert(&mut self, name: impl Into<String>, palette: Palette) {
        self.palettes.insert(name.into(), palette);
    }

    pub fn get(&self, name: &str) -> Option<&Palette> {
        self.palettes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.palettes.contains_key(name)
    }

    /// Palette names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.palettes.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Palette)> {
        self.palettes.iter().map(|(name, p)| (name.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }
}

/// String form of a YAML scalar used as a name or label.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn color_string(palette: &str, entry: &str, value: &Value) -> Result<String, String> {
    let Value::String(color) = value else {
        return Err(format!(
            "palette '{}' entry '{}': color must be a string",
            palette, entry
        ));
    };
    ColorDef::parse(color)
        .map(|_| color.clone())
        .map_err(|e| format!("palette '{}' entry '{}': {}", palette, entry, e))
}

//! Theme data model and YAML parsing.
//!
//! A theme file is a top-level mapping from theme name to a record:
//!
//! ```yaml
//! clean:
//!   base_theme: theme_minimal
//!   font_family: Inter
//!   axis_text_size: 10
//!   axis_title_size: 12
//!   other_settings:
//!     legend.position: bottom
//!     panel.grid.minor: element_blank()
//!   fonts:
//!     Inter:
//!       - https://example.com/fonts/Inter-Regular.ttf
//!       - https://example.com/fonts/Inter-Bold.ttf
//! ```
//!
//! Setting expressions are parsed when the file is loaded, so a document
//! with one bad expression is rejected as a whole.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use super::element::SettingValue;
use crate::palette::scalar_to_string;

/// Font files declared for one family, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDeclaration {
    pub family: String,
    pub files: Vec<String>,
}

/// One named theme as written in a theme file.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSpec {
    /// Base theme constructor name, checked when the theme is resolved.
    pub base_theme: String,
    pub font_family: String,
    pub axis_text_size: f64,
    pub axis_title_size: f64,
    /// Additional settings in file order.
    pub other_settings: Vec<(String, SettingValue)>,
    pub fonts: Vec<FontDeclaration>,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    base_theme: String,
    font_family: String,
    axis_text_size: f64,
    axis_title_size: f64,
    #[serde(default)]
    other_settings: Option<Mapping>,
    #[serde(default)]
    fonts: Option<Mapping>,
}

impl ThemeSpec {
    fn from_value(name: &str, value: Value) -> Result<Self, String> {
        let raw: RawTheme =
            serde_yaml::from_value(value).map_err(|e| format!("theme '{}': {}", name, e))?;

        let mut other_settings = Vec::new();
        for (key, value) in raw.other_settings.unwrap_or_default() {
            let key = scalar_to_string(&key)
                .ok_or_else(|| format!("theme '{}': setting names must be scalars", name))?;
            let value = SettingValue::from_yaml(value)
                .map_err(|e| format!("theme '{}' setting '{}': {}", name, key, e))?;
            other_settings.push((key, value));
        }

        let mut fonts = Vec::new();
        for (family, files) in raw.fonts.unwrap_or_default() {
            let family = scalar_to_string(&family)
                .ok_or_else(|| format!("theme '{}': font family names must be scalars", name))?;
            let files = font_files(name, &family, files)?;
            fonts.push(FontDeclaration { family, files });
        }

        Ok(Self {
            base_theme: raw.base_theme,
            font_family: raw.font_family,
            axis_text_size: raw.axis_text_size,
            axis_title_size: raw.axis_title_size,
            other_settings,
            fonts,
        })
    }

    /// Value of a setting from `other_settings`, if present.
    pub fn setting(&self, key: &str) -> Option<&SettingValue> {
        self.other_settings
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }
}

fn font_files(theme: &str, family: &str, files: Value) -> Result<Vec<String>, String> {
    match files {
        // `Inter:` with nothing under it declares no files
        Value::Null => Ok(Vec::new()),
        Value::String(file) => Ok(vec![file]),
        Value::Sequence(files) => files
            .into_iter()
            .map(|file| match file {
                Value::String(file) => Ok(file),
                _ => Err(format!(
                    "theme '{}' font '{}': file locations must be strings",
                    theme, family
                )),
            })
            .collect(),
        _ => Err(format!(
            "theme '{}' font '{}': expected a list of file locations",
            theme, family
        )),
    }
}

/// All loaded themes by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeTable {
    themes: BTreeMap<String, ThemeSpec>,
}

impl ThemeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a theme document.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first problem found: malformed
    /// YAML, a top level that is not a mapping, a theme missing a required
    /// key or with a wrongly typed value, or an invalid setting expression.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let root: Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
        let mapping = match root {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Err("theme file is empty".to_string()),
            _ => return Err("theme file must be a mapping of theme names".to_string()),
        };

        let mut table = Self::new();
        for (name, value) in mapping {
            let name =
                scalar_to_string(&name).ok_or_else(|| "theme names must be scalars".to_string())?;
            let spec = ThemeSpec::from_value(&name, value)?;
            table.themes.insert(name, spec);
        }
        Ok(table)
    }

    /// Adds or replaces a theme.
    pub fn insert(&mut self, name: impl Into<String>, spec: ThemeSpec) {
        self.themes.insert(name.into(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&ThemeSpec> {
        self.themes.get(name)
    }

    /// Theme names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.themes.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThemeSpec)> {
        self.themes.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Element;

    const CLEAN: &str = r#"
clean:
  base_theme: theme_minimal
  font_family: Inter
  axis_text_size: 10
  axis_title_size: 12.5
  other_settings:
    legend.position: bottom
    panel.grid.minor: element_blank()
    plot.title: element_text(face = "bold")
  fonts:
    Inter:
      - https://example.com/Inter-Regular.ttf
      - https://example.com/Inter-Bold.ttf
    Empty:
"#;

    #[test]
    fn test_parse_full_theme() {
        let table = ThemeTable::from_yaml(CLEAN).unwrap();
        let spec = table.get("clean").unwrap();

        assert_eq!(spec.base_theme, "theme_minimal");
        assert_eq!(spec.font_family, "Inter");
        assert_eq!(spec.axis_text_size, 10.0);
        assert_eq!(spec.axis_title_size, 12.5);

        let keys: Vec<_> = spec.other_settings.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["legend.position", "panel.grid.minor", "plot.title"]);
        assert_eq!(
            spec.setting("legend.position"),
            Some(&SettingValue::Literal(Value::String("bottom".into())))
        );
        assert_eq!(
            spec.setting("panel.grid.minor").and_then(SettingValue::element),
            Some(&Element::Blank)
        );

        assert_eq!(spec.fonts.len(), 2);
        assert_eq!(spec.fonts[0].family, "Inter");
        assert_eq!(spec.fonts[0].files.len(), 2);
        assert!(spec.fonts[1].files.is_empty());
    }

    #[test]
    fn test_optional_sections() {
        let table = ThemeTable::from_yaml(
            "plain:\n  base_theme: bw\n  font_family: sans\n  axis_text_size: 9\n  axis_title_size: 11\n",
        )
        .unwrap();
        let spec = table.get("plain").unwrap();
        assert!(spec.other_settings.is_empty());
        assert!(spec.fonts.is_empty());
    }

    #[test]
    fn test_missing_required_key() {
        let err = ThemeTable::from_yaml("broken:\n  base_theme: bw\n  font_family: sans\n")
            .unwrap_err();
        assert!(err.contains("theme 'broken'"));
        assert!(err.contains("axis_text_size"));
    }

    #[test]
    fn test_invalid_expression_rejects_file() {
        let err = ThemeTable::from_yaml(
            r#"
bad:
  base_theme: bw
  font_family: sans
  axis_text_size: 9
  axis_title_size: 11
  other_settings:
    plot.title: element_text(size = big)
"#,
        )
        .unwrap_err();
        assert!(err.contains("setting 'plot.title'"));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(ThemeTable::from_yaml("").is_err());
        assert!(ThemeTable::from_yaml("- a\n- b\n").is_err());
        assert!(ThemeTable::from_yaml("clean: [").is_err());
        assert!(ThemeTable::from_yaml("clean: 5").is_err());
    }

    #[test]
    fn test_names_sorted() {
        let yaml = "b:\n  base_theme: bw\n  font_family: sans\n  axis_text_size: 9\n  axis_title_size: 11\na:\n  base_theme: bw\n  font_family: sans\n  axis_text_size: 9\n  axis_title_size: 11\n";
        let table = ThemeTable::from_yaml(yaml).unwrap();
        assert_eq!(table.names(), vec!["a".to_string(), "b".to_string()]);
    }
}

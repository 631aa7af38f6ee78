//! Turning a theme name into the final settings of a plot theme.

use serde::{Serialize, Serializer};

use super::base::BaseTheme;
use super::element::{Element, Measure, SettingValue, TextElement};
use super::spec::ThemeTable;
use crate::error::{StyleError, TableKind};
use crate::fonts::{FontRegistry, FALLBACK_FAMILY};

/// Theme settings keyed by element name, in the order they were first set.
///
/// Setting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    entries: Vec<(String, SettingValue)>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, returning the value it replaced.
    pub fn set(&mut self, key: impl Into<String>, value: SettingValue) -> Option<SettingValue> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Settings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// A theme ready to be applied: base theme, font family and settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTheme {
    pub name: String,
    pub base: BaseTheme,
    /// Font family the base theme is built with.
    pub base_family: String,
    pub settings: Settings,
}

/// Resolves theme names against an optional theme table.
pub struct ThemeResolver<'a> {
    table: Option<&'a ThemeTable>,
    fonts: &'a dyn FontRegistry,
}

impl<'a> ThemeResolver<'a> {
    pub fn new(table: Option<&'a ThemeTable>, fonts: &'a dyn FontRegistry) -> Self {
        Self { table, fonts }
    }

    /// Builds the final theme for `name`, with `overrides` layered on top.
    ///
    /// Settings start with the axis text and title sizes, then the theme's
    /// `other_settings`, then the overrides. Later layers replace earlier
    /// ones key by key; nested element values are not merged.
    ///
    /// If the theme's font family cannot be activated, a warning is logged
    /// and the theme is built with the system `sans` family.
    ///
    /// # Errors
    ///
    /// - [`StyleError::NotLoaded`] if no themes are loaded
    /// - [`StyleError::ThemeNotFound`] if `name` is unknown
    /// - [`StyleError::UnknownBaseTheme`] if `base_theme` is not a known preset
    pub fn resolve<K, I>(&self, name: &str, overrides: I) -> Result<ResolvedTheme, StyleError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SettingValue)>,
    {
        let table = self.table.ok_or(StyleError::NotLoaded(TableKind::Themes))?;
        let spec = table.get(name).ok_or_else(|| StyleError::ThemeNotFound {
            name: name.to_string(),
            available: table.names(),
        })?;

        let base: BaseTheme = spec
            .base_theme
            .parse()
            .map_err(|_| StyleError::UnknownBaseTheme {
                theme: name.to_string(),
                base: spec.base_theme.clone(),
                known: BaseTheme::known_names(),
            })?;

        let base_family = match self.fonts.activate(&spec.font_family) {
            Ok(()) => spec.font_family.clone(),
            Err(e) => {
                tracing::warn!(
                    theme = name,
                    family = %spec.font_family,
                    fallback = FALLBACK_FAMILY,
                    "Font '{}' is not available ({}); using '{}'",
                    spec.font_family,
                    e,
                    FALLBACK_FAMILY
                );
                FALLBACK_FAMILY.to_string()
            }
        };

        let mut settings = Settings::new();
        settings.set("axis.text", text_size(spec.axis_text_size));
        settings.set("axis.title", text_size(spec.axis_title_size));
        for (key, value) in &spec.other_settings {
            settings.set(key.clone(), value.clone());
        }
        for (key, value) in overrides {
            settings.set(key, value);
        }

        Ok(ResolvedTheme {
            name: name.to_string(),
            base,
            base_family,
            settings,
        })
    }
}

fn text_size(size: f64) -> SettingValue {
    SettingValue::Element(Element::Text(TextElement {
        size: Some(Measure::Absolute(size)),
        ..Default::default()
    }))
}

#[cfg(test)]
mod tests {
    use serde_yaml::Value;

    use super::*;
    use crate::fonts::MemoryFontRegistry;

    const THEMES: &str = r#"
clean:
  base_theme: theme_minimal
  font_family: serif
  axis_text_size: 10
  axis_title_size: 12
  other_settings:
    legend.position: right
    axis.text: element_text(size = 8, colour = "grey30")
custom_font:
  base_theme: classic
  font_family: Inter
  axis_text_size: 9
  axis_title_size: 11
odd:
  base_theme: theme_fancy
  font_family: sans
  axis_text_size: 9
  axis_title_size: 11
"#;

    fn table() -> ThemeTable {
        ThemeTable::from_yaml(THEMES).unwrap()
    }

    fn no_overrides() -> Vec<(String, SettingValue)> {
        Vec::new()
    }

    #[test]
    fn test_resolve_layers_settings() {
        let table = table();
        let fonts = MemoryFontRegistry::new();
        let theme = ThemeResolver::new(Some(&table), &fonts)
            .resolve("clean", no_overrides())
            .unwrap();

        assert_eq!(theme.base, BaseTheme::Minimal);
        assert_eq!(theme.base_family, "serif");
        let keys: Vec<_> = theme.settings.keys().collect();
        assert_eq!(keys, vec!["axis.text", "axis.title", "legend.position"]);

        // other_settings replace the seeded axis text
        let Some(Element::Text(text)) = theme.settings.get("axis.text").and_then(SettingValue::element)
        else {
            panic!("Expected text element");
        };
        assert_eq!(text.size, Some(Measure::Absolute(8.0)));
        assert_eq!(theme.settings.get("axis.title"), Some(&text_size(12.0)));
    }

    #[test]
    fn test_overrides_win() {
        let table = table();
        let fonts = MemoryFontRegistry::new();
        let theme = ThemeResolver::new(Some(&table), &fonts)
            .resolve(
                "clean",
                [
                    ("legend.position", SettingValue::from_override("none").unwrap()),
                    ("plot.title", SettingValue::from_override("element_blank()").unwrap()),
                ],
            )
            .unwrap();

        assert_eq!(
            theme.settings.get("legend.position"),
            Some(&SettingValue::Literal(Value::String("none".into())))
        );
        assert_eq!(
            theme.settings.get("plot.title"),
            Some(&SettingValue::Element(Element::Blank))
        );
    }

    #[test]
    fn test_unavailable_font_falls_back_to_sans() {
        let table = table();
        let fonts = MemoryFontRegistry::new();
        let theme = ThemeResolver::new(Some(&table), &fonts)
            .resolve("custom_font", no_overrides())
            .unwrap();

        assert_eq!(theme.base, BaseTheme::Classic);
        assert_eq!(theme.base_family, "sans");
    }

    #[test]
    fn test_unknown_base_theme() {
        let table = table();
        let fonts = MemoryFontRegistry::new();
        let err = ThemeResolver::new(Some(&table), &fonts)
            .resolve("odd", no_overrides())
            .unwrap_err();
        match err {
            StyleError::UnknownBaseTheme { theme, base, known } => {
                assert_eq!(theme, "odd");
                assert_eq!(base, "theme_fancy");
                assert!(known.contains(&"theme_minimal".to_string()));
            }
            other => panic!("Expected UnknownBaseTheme, got {other:?}"),
        }
    }

    #[test]
    fn test_theme_not_found_lists_names() {
        let table = table();
        let fonts = MemoryFontRegistry::new();
        let err = ThemeResolver::new(Some(&table), &fonts)
            .resolve("missing", no_overrides())
            .unwrap_err();
        match err {
            StyleError::ThemeNotFound { available, .. } => {
                assert_eq!(available, vec!["clean", "custom_font", "odd"]);
            }
            other => panic!("Expected ThemeNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_not_loaded() {
        let fonts = MemoryFontRegistry::new();
        let err = ThemeResolver::new(None, &fonts)
            .resolve("clean", no_overrides())
            .unwrap_err();
        assert!(matches!(err, StyleError::NotLoaded(TableKind::Themes)));
    }

    #[test]
    fn test_settings_set_replaces_in_place() {
        let mut settings = Settings::new();
        settings.set("a", SettingValue::from_override("1").unwrap());
        settings.set("b", SettingValue::from_override("2").unwrap());
        let old = settings.set("a", SettingValue::from_override("3").unwrap());

        assert_eq!(old, Some(SettingValue::Literal(Value::from(1))));
        let keys: Vec<_> = settings.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_resolved_theme_serializes() {
        let table = table();
        let fonts = MemoryFontRegistry::new();
        let theme = ThemeResolver::new(Some(&table), &fonts)
            .resolve("clean", no_overrides())
            .unwrap();
        let yaml = serde_yaml::to_string(&theme).unwrap();
        assert!(yaml.contains("base: theme_minimal"));
        assert!(yaml.contains("legend.position: right"));
        assert!(yaml.contains("element: text"));
    }
}

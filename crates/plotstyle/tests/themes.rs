//! Integration tests for theme loading, font provisioning and resolution.

mod common;

use std::sync::Arc;

use common::{capture, store_with, theme_yaml, warnings};
use plotstyle::fetch::{Credential, FontCredential, MockFetcher};
use plotstyle::fonts::{FontRegistry, FontStyle, MemoryFontRegistry};
use plotstyle::theme::{BaseTheme, Element, SettingValue};
use plotstyle::{ConfigStore, Defaults, LoadOutcome, StyleError};
use serde_yaml::Value;

const FONT_HOST: &str = "https://raw.githubusercontent.com/acme/fonts/main";

fn no_overrides() -> Vec<(String, SettingValue)> {
    Vec::new()
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn malformed_theme_file_is_an_error_and_keeps_previous() {
    let (store, _) = store_with(
        MockFetcher::new()
            .with_text("good.yaml", theme_yaml("clean", "sans", ""))
            .with_text("bad.yaml", "clean:\n  base_theme: [unclosed\n"),
    );
    store
        .load_themes("good.yaml", None, &FontCredential::Inherit)
        .unwrap();

    let err = store
        .load_themes("bad.yaml", None, &FontCredential::Inherit)
        .unwrap_err();

    assert!(matches!(err, StyleError::Parse { ref location, .. } if location == "bad.yaml"));
    assert_eq!(store.theme_names().unwrap(), vec!["clean"]);
}

#[test]
fn unreachable_theme_file_is_an_error() {
    let (store, _) = store_with(MockFetcher::new());
    let err = store
        .load_themes("https://example.com/themes.yaml", None, &FontCredential::Inherit)
        .unwrap_err();
    assert!(matches!(err, StyleError::Fetch(_)));
}

#[test]
fn invalid_setting_expression_fails_the_load() {
    let yaml = theme_yaml(
        "clean",
        "sans",
        "  other_settings:\n    plot.title: element_text(size = eval('boom'))\n",
    );
    let (store, _) = store_with(MockFetcher::new().with_text("t.yaml", yaml));

    let err = store
        .load_themes("t.yaml", None, &FontCredential::Inherit)
        .unwrap_err();

    assert!(err.to_string().contains("plot.title"));
    assert!(store.themes().is_err());
}

// ============================================================================
// Fonts
// ============================================================================

#[test]
fn unreachable_font_fails_theme_load_but_palette_failure_only_warns() {
    let themes = theme_yaml(
        "branded",
        "Inter",
        &format!("  fonts:\n    Inter:\n      - {FONT_HOST}/Inter-Regular.ttf\n"),
    );
    let (store, _) = store_with(
        MockFetcher::new()
            .with_text("t.yaml", themes)
            .with_status("https://example.com/palettes.yaml", 500),
    );

    let err = store
        .load_themes("t.yaml", None, &FontCredential::Inherit)
        .unwrap_err();
    assert!(matches!(err, StyleError::FontProvisioning { ref family, .. } if family == "Inter"));
    // The table was already replaced when provisioning ran
    assert_eq!(store.theme_names().unwrap(), vec!["branded"]);

    let (outcome, events) = capture(|| store.load_palettes("https://example.com/palettes.yaml", None));
    assert!(matches!(outcome, LoadOutcome::Kept { .. }));
    assert_eq!(warnings(&events).len(), 1);
}

#[test]
fn partially_fetched_family_is_registered_with_warning() {
    let themes = theme_yaml(
        "branded",
        "Inter",
        &format!(
            "  fonts:\n    Inter:\n      - {FONT_HOST}/Inter-Regular.ttf\n      - {FONT_HOST}/Inter-Italic.ttf\n"
        ),
    );
    let (store, fonts) = store_with(
        MockFetcher::new()
            .with_text("t.yaml", themes)
            .with_bytes(format!("{FONT_HOST}/Inter-Regular.ttf"), vec![0u8]),
    );

    let (result, events) =
        capture(|| store.load_themes("t.yaml", None, &FontCredential::Inherit));

    assert_eq!(result.unwrap(), 1);
    let warns = warnings(&events);
    assert_eq!(warns.len(), 1);
    assert!(warns[0].message.contains("Inter-Italic.ttf"));
    assert_eq!(fonts.styles("Inter"), Some(vec![FontStyle::Regular]));
}

#[test]
fn font_files_are_classified_into_slots() {
    let files = ["Regular", "Bold", "Italic", "BoldItalic"]
        .iter()
        .map(|style| format!("      - {FONT_HOST}/Roboto-{style}.ttf\n"))
        .collect::<String>();
    let themes = theme_yaml("r", "Roboto", &format!("  fonts:\n    Roboto:\n{files}"));
    let mut fetcher = MockFetcher::new().with_text("t.yaml", themes);
    for style in ["Regular", "Bold", "Italic", "BoldItalic"] {
        fetcher = fetcher.with_bytes(format!("{FONT_HOST}/Roboto-{style}.ttf"), vec![0u8]);
    }
    let (store, fonts) = store_with(fetcher);

    store
        .load_themes("t.yaml", None, &FontCredential::Inherit)
        .unwrap();

    assert_eq!(fonts.styles("Roboto"), Some(FontStyle::ALL.to_vec()));
    let theme = store.resolve_theme("r", no_overrides()).unwrap();
    assert_eq!(theme.base_family, "Roboto");
}

#[test]
fn font_credential_precedence() {
    let font = format!("{FONT_HOST}/Inter-Regular.ttf");
    let themes = theme_yaml("t", "Inter", &format!("  fonts:\n    Inter:\n      - {font}\n"));
    let theme_url = "https://raw.githubusercontent.com/acme/style/main/themes.yaml";
    let theme_token = Credential::new("theme-token");

    let cases = [
        (FontCredential::Inherit, Some("theme-token")),
        (FontCredential::from_option(Some("none")), None),
        (FontCredential::from_option(Some("font-token")), Some("font-token")),
    ];

    for (font_credential, expected) in cases {
        let fetcher = MockFetcher::new()
            .with_text(theme_url, themes.clone())
            .with_bytes(font.clone(), vec![0u8]);
        let (store, _) = store_with(fetcher.clone());

        store
            .load_themes(theme_url, Some(&theme_token), &font_credential)
            .unwrap();

        let requests = fetcher.requests();
        assert_eq!(requests[0].1.as_deref(), Some("theme-token"));
        assert_eq!(requests[1].0, font);
        assert_eq!(requests[1].1.as_deref(), expected);
    }
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn overrides_take_precedence_over_theme_settings() {
    let yaml = theme_yaml(
        "clean",
        "sans",
        "  other_settings:\n    legend.position: bottom\n    panel.grid.minor: element_blank()\n",
    );
    let (store, _) = store_with(MockFetcher::new().with_text("t.yaml", yaml));
    store
        .load_themes("t.yaml", None, &FontCredential::Inherit)
        .unwrap();

    let theme = store
        .resolve_theme(
            "clean",
            [("legend.position", SettingValue::from_override("none").unwrap())],
        )
        .unwrap();

    assert_eq!(
        theme.settings.get("legend.position"),
        Some(&SettingValue::Literal(Value::String("none".into())))
    );
    assert_eq!(
        theme.settings.get("panel.grid.minor"),
        Some(&SettingValue::Element(Element::Blank))
    );
}

#[test]
fn unknown_font_family_falls_back_with_warning() {
    let (store, _) = store_with(
        MockFetcher::new().with_text("t.yaml", theme_yaml("clean", "Fancy Sans", "")),
    );
    store
        .load_themes("t.yaml", None, &FontCredential::Inherit)
        .unwrap();

    let (theme, events) = capture(|| store.resolve_theme("clean", no_overrides()));

    assert_eq!(theme.unwrap().base_family, "sans");
    let warns = warnings(&events);
    assert_eq!(warns.len(), 1);
    assert!(warns[0].message.contains("Fancy Sans"));
}

#[test]
fn theme_not_found_lists_available() {
    let (store, _) = store_with(
        MockFetcher::new().with_text("t.yaml", theme_yaml("clean", "sans", "")),
    );
    store
        .load_themes("t.yaml", None, &FontCredential::Inherit)
        .unwrap();

    let err = store.resolve_theme("dark", no_overrides()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Theme 'dark' not found. Available themes: clean"
    );
}

// ============================================================================
// Bundled defaults
// ============================================================================

#[test]
fn bundled_defaults_load_and_resolve() {
    let store = ConfigStore::with_http().unwrap();
    let report = store.load_defaults(&Defaults::bundled()).unwrap();

    assert!(report.palettes.unwrap() > 0);
    assert!(report.themes.unwrap() > 0);
    assert!(store.palette_names().unwrap().contains(&"okabe_ito".to_string()));

    for name in store.theme_names().unwrap() {
        let theme = store.resolve_theme(&name, no_overrides()).unwrap();
        assert!(theme.settings.get("axis.text").is_some());
    }
    let publication = store.resolve_theme("publication", no_overrides()).unwrap();
    assert_eq!(publication.base, BaseTheme::Classic);
    assert_eq!(publication.base_family, "serif");
}

#[test]
fn broken_bundled_theme_file_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("palettes.yaml"), "broken: 1\n").unwrap();
    std::fs::write(dir.path().join("themes.yaml"), "clean: [\n").unwrap();
    let fonts: Arc<dyn FontRegistry> = Arc::new(MemoryFontRegistry::new());
    let store = ConfigStore::new(
        Arc::new(plotstyle::fetch::HttpFetcher::new().unwrap()),
        fonts,
    );

    let (result, events) = capture(|| store.load_defaults(&Defaults::in_dir(dir.path())));

    assert!(matches!(result, Err(StyleError::Parse { .. })));
    assert_eq!(warnings(&events).len(), 1);
}

//! The configuration store: the active palette and theme tables.
//!
//! A [`ConfigStore`] owns everything that used to be process-wide state:
//! the two tables, the fetcher used to load them and the font registry
//! that receives theme fonts. Tables are replaced wholesale by the load
//! methods and read through `Arc` snapshots, so a resolver never observes
//! a half-loaded table.
//!
//! # Load semantics
//!
//! | Operation       | On failure                                     |
//! |-----------------|------------------------------------------------|
//! | `load_palettes` | warning logged, previous table kept            |
//! | `load_themes`   | error returned, previous table kept            |
//! | font fetch      | warning per file; error if a family gets none  |
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use plotstyle::fetch::MockFetcher;
//! use plotstyle::fonts::MemoryFontRegistry;
//! use plotstyle::store::{ConfigStore, LoadOutcome};
//!
//! let fetcher = MockFetcher::new().with_text(
//!     "palettes.yaml",
//!     "groups:\n  A: '#111111'\n  B: '#222222'\n",
//! );
//! let store = ConfigStore::new(Arc::new(fetcher), Arc::new(MemoryFontRegistry::new()));
//!
//! assert_eq!(
//!     store.load_palettes("palettes.yaml", None),
//!     LoadOutcome::Loaded { count: 1 }
//! );
//! assert_eq!(store.palette_names().unwrap(), vec!["groups"]);
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{FetchError, StyleError, TableKind};
use crate::fetch::{Credential, Fetcher, FontCredential, HttpFetcher, Location};
use crate::fonts::{provision, FontRegistry, MemoryFontRegistry};
use crate::palette::{ContinuousScale, DiscreteScale, PaletteResolver, PaletteTable};
use crate::theme::{ResolvedTheme, SettingValue, ThemeResolver, ThemeTable};

/// File name of the palette file inside a defaults directory.
pub const DEFAULT_PALETTES_FILE: &str = "palettes.yaml";

/// File name of the theme file inside a defaults directory.
pub const DEFAULT_THEMES_FILE: &str = "themes.yaml";

/// Result of a palette load.
///
/// Palette loads never fail the caller; a failed load keeps whatever was
/// active before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The table was replaced with `count` palettes.
    Loaded { count: usize },
    /// The load failed and the previous table is still active.
    Kept { error: String },
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

/// Palette file compiled into the crate.
pub const BUNDLED_PALETTES: &str = include_str!("../assets/palettes.yaml");

/// Theme file compiled into the crate.
pub const BUNDLED_THEMES: &str = include_str!("../assets/themes.yaml");

/// One default file: text compiled into the binary, or a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultFile {
    Embedded {
        /// Shown in logs and errors in place of a path.
        origin: &'static str,
        yaml: &'static str,
    },
    /// Skipped when the file does not exist.
    Path(PathBuf),
}

/// The default palette and theme files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    pub palettes: Option<DefaultFile>,
    pub themes: Option<DefaultFile>,
}

impl Defaults {
    /// `palettes.yaml` and `themes.yaml` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            palettes: Some(DefaultFile::Path(dir.join(DEFAULT_PALETTES_FILE))),
            themes: Some(DefaultFile::Path(dir.join(DEFAULT_THEMES_FILE))),
        }
    }

    /// The defaults compiled into the crate.
    pub fn bundled() -> Self {
        Self {
            palettes: Some(DefaultFile::Embedded {
                origin: "<bundled palettes.yaml>",
                yaml: BUNDLED_PALETTES,
            }),
            themes: Some(DefaultFile::Embedded {
                origin: "<bundled themes.yaml>",
                yaml: BUNDLED_THEMES,
            }),
        }
    }
}

/// Counts of what [`ConfigStore::load_defaults`] loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultsReport {
    pub palettes: Option<usize>,
    pub themes: Option<usize>,
}

/// Holds the active palette and theme tables.
pub struct ConfigStore {
    fetcher: Arc<dyn Fetcher>,
    fonts: Arc<dyn FontRegistry>,
    palettes: RwLock<Option<Arc<PaletteTable>>>,
    themes: RwLock<Option<Arc<ThemeTable>>>,
}

impl ConfigStore {
    /// Creates an empty store.
    pub fn new(fetcher: Arc<dyn Fetcher>, fonts: Arc<dyn FontRegistry>) -> Self {
        Self {
            fetcher,
            fonts,
            palettes: RwLock::new(None),
            themes: RwLock::new(None),
        }
    }

    /// Creates an empty store that fetches over HTTP and keeps fonts in
    /// memory.
    pub fn with_http() -> Result<Self, FetchError> {
        Ok(Self::new(
            Arc::new(HttpFetcher::new()?),
            Arc::new(MemoryFontRegistry::new()),
        ))
    }

    /// The registry theme fonts are registered with.
    pub fn fonts(&self) -> &dyn FontRegistry {
        self.fonts.as_ref()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Loads a palette file and makes it the active palette table.
    ///
    /// Failures are logged as warnings and reported in the outcome; the
    /// previously active table stays in effect.
    pub fn load_palettes(&self, location: &str, credential: Option<&Credential>) -> LoadOutcome {
        let table = self
            .fetch_text(location, credential)
            .and_then(|text| parse_palettes(location, &text));
        self.install_palettes(location, table)
    }

    /// Like [`load_palettes`](Self::load_palettes), for YAML already in
    /// memory. `origin` names the source in logs and errors.
    pub fn load_palettes_str(&self, origin: &str, yaml: &str) -> LoadOutcome {
        self.install_palettes(origin, parse_palettes(origin, yaml))
    }

    fn install_palettes(
        &self,
        origin: &str,
        table: Result<PaletteTable, StyleError>,
    ) -> LoadOutcome {
        match table {
            Ok(table) => {
                let count = table.len();
                *self.palettes.write().unwrap_or_else(PoisonError::into_inner) =
                    Some(Arc::new(table));
                tracing::info!(location = origin, count, "Loaded palettes");
                LoadOutcome::Loaded { count }
            }
            Err(e) => {
                tracing::warn!(
                    location = origin,
                    error = %e,
                    "Failed to load palettes from {}, keeping previous palettes: {}",
                    origin,
                    e
                );
                LoadOutcome::Kept {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Loads a theme file, makes it the active theme table and provisions
    /// its fonts.
    ///
    /// Fonts are fetched with `font_credential` resolved against
    /// `credential`, see [`FontCredential::resolve`].
    ///
    /// # Errors
    ///
    /// Fetch and parse failures are returned and leave the previous table
    /// active. Font provisioning runs after the new table is active; its
    /// failure is returned too, but the new table stays.
    pub fn load_themes(
        &self,
        location: &str,
        credential: Option<&Credential>,
        font_credential: &FontCredential,
    ) -> Result<usize, StyleError> {
        let text = self.fetch_text(location, credential)?;
        self.load_themes_str(location, &text, credential, font_credential)
    }

    /// Like [`load_themes`](Self::load_themes), for YAML already in memory.
    /// Font files the themes declare are still fetched.
    pub fn load_themes_str(
        &self,
        origin: &str,
        yaml: &str,
        credential: Option<&Credential>,
        font_credential: &FontCredential,
    ) -> Result<usize, StyleError> {
        let table = Arc::new(
            ThemeTable::from_yaml(yaml).map_err(|message| StyleError::parse(origin, message))?,
        );
        let count = table.len();

        *self.themes.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&table));
        tracing::info!(location = origin, count, "Loaded themes");

        let report = provision(
            &table,
            self.fetcher.as_ref(),
            self.fonts.as_ref(),
            font_credential.resolve(credential),
        )?;
        if !report.registered.is_empty() {
            tracing::info!(families = ?report.registered, "Registered theme fonts");
        }

        Ok(count)
    }

    /// Loads the default files.
    ///
    /// Default files on disk that do not exist are skipped. Everything else
    /// goes through the regular palette and theme loads, so a broken default
    /// theme file is an error while a broken palette file only warns.
    pub fn load_defaults(&self, defaults: &Defaults) -> Result<DefaultsReport, StyleError> {
        let mut report = DefaultsReport::default();

        let outcome = match &defaults.palettes {
            Some(DefaultFile::Embedded { origin, yaml }) => Some(self.load_palettes_str(origin, yaml)),
            Some(DefaultFile::Path(path)) => {
                existing(path).map(|location| self.load_palettes(&location, None))
            }
            None => None,
        };
        if let Some(LoadOutcome::Loaded { count }) = outcome {
            report.palettes = Some(count);
        }

        report.themes = match &defaults.themes {
            Some(DefaultFile::Embedded { origin, yaml }) => {
                Some(self.load_themes_str(origin, yaml, None, &FontCredential::Inherit)?)
            }
            Some(DefaultFile::Path(path)) => match existing(path) {
                Some(location) => Some(self.load_themes(&location, None, &FontCredential::Inherit)?),
                None => None,
            },
            None => None,
        };

        Ok(report)
    }

    fn fetch_text(&self, location: &str, credential: Option<&Credential>) -> Result<String, StyleError> {
        Ok(self
            .fetcher
            .fetch_text(&Location::parse(location)?, credential)?)
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// The active palette table.
    pub fn palettes(&self) -> Result<Arc<PaletteTable>, StyleError> {
        self.palette_snapshot()
            .ok_or(StyleError::NotLoaded(TableKind::Palettes))
    }

    /// The active theme table.
    pub fn themes(&self) -> Result<Arc<ThemeTable>, StyleError> {
        self.theme_snapshot()
            .ok_or(StyleError::NotLoaded(TableKind::Themes))
    }

    /// Names of the active palettes, sorted.
    pub fn palette_names(&self) -> Result<Vec<String>, StyleError> {
        self.palettes().map(|table| table.names())
    }

    /// Names of the active themes, sorted.
    pub fn theme_names(&self) -> Result<Vec<String>, StyleError> {
        self.themes().map(|table| table.names())
    }

    // =========================================================================
    // Resolving
    // =========================================================================

    /// See [`PaletteResolver::discrete`].
    pub fn discrete(&self, name: &str, unseen_color: &str) -> Result<DiscreteScale, StyleError> {
        let table = self.palette_snapshot();
        PaletteResolver::new(table.as_deref()).discrete(name, unseen_color)
    }

    /// See [`PaletteResolver::continuous`].
    pub fn continuous(&self, name: &str) -> Result<ContinuousScale, StyleError> {
        let table = self.palette_snapshot();
        PaletteResolver::new(table.as_deref()).continuous(name)
    }

    /// See [`ThemeResolver::resolve`].
    pub fn resolve_theme<K, I>(&self, name: &str, overrides: I) -> Result<ResolvedTheme, StyleError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SettingValue)>,
    {
        let table = self.theme_snapshot();
        ThemeResolver::new(table.as_deref(), self.fonts.as_ref()).resolve(name, overrides)
    }

    fn palette_snapshot(&self) -> Option<Arc<PaletteTable>> {
        self.palettes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn theme_snapshot(&self) -> Option<Arc<ThemeTable>> {
        self.themes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn parse_palettes(origin: &str, yaml: &str) -> Result<PaletteTable, StyleError> {
    PaletteTable::from_yaml(yaml).map_err(|message| StyleError::parse(origin, message))
}

fn existing(path: &Path) -> Option<String> {
    if path.is_file() {
        Some(path.to_string_lossy().into_owned())
    } else {
        tracing::debug!(path = %path.display(), "No default file, skipping");
        None
    }
}

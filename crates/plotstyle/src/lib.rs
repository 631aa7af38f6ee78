//! Named palettes and themes for plotting, loaded from local or remote YAML.
//!
//! `plotstyle` is the styling configuration layer that sits between a
//! plotting call site and the plotting library. It loads color palettes
//! and visual themes from YAML files (local paths or URLs, optionally
//! authenticated), keeps them in an explicit [`ConfigStore`], and turns
//! palette and theme names into concrete values: hex colors per data
//! level, gradient stops, font families and theme element settings.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use plotstyle::fetch::MockFetcher;
//! use plotstyle::fonts::MemoryFontRegistry;
//! use plotstyle::palette::{DiscreteScale, DEFAULT_UNSEEN_COLOR};
//! use plotstyle::ConfigStore;
//!
//! let fetcher = MockFetcher::new().with_text(
//!     "palettes.yaml",
//!     "groups:\n  control: '#E69F00'\n  treated: '#56B4E9'\n",
//! );
//! let store = ConfigStore::new(Arc::new(fetcher), Arc::new(MemoryFontRegistry::new()));
//! store.load_palettes("palettes.yaml", None);
//!
//! let DiscreteScale::Lookup(lookup) = store.discrete("groups", DEFAULT_UNSEEN_COLOR).unwrap() else {
//!     panic!("groups is a loaded palette");
//! };
//! let colors = lookup.colors(&["treated", "placebo"]);
//! assert_eq!(colors.colors, vec!["#56B4E9", "#B3B3B3"]);
//! assert_eq!(colors.unseen, vec!["placebo"]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ConfigStore
//! ├── Fetcher         → local file or HTTP GET (token only for code hosts)
//! ├── PaletteTable    → PaletteResolver → DiscreteScale / ContinuousScale
//! ├── ThemeTable      → ThemeResolver   → ResolvedTheme
//! └── FontRegistry    ← fonts declared by themes, provisioned on load
//! ```
//!
//! # Logging
//!
//! Recoverable problems (a palette file that failed to load, data levels a
//! palette has no color for, a font file that could not be fetched) are
//! reported as `tracing` warnings. The library never installs a
//! subscriber; that is up to the application.

mod error;
pub mod fetch;
pub mod fonts;
pub mod palette;
pub mod store;
pub mod theme;

pub use error::{FetchError, FontError, StyleError, TableKind};
pub use store::{ConfigStore, DefaultFile, Defaults, LoadOutcome};

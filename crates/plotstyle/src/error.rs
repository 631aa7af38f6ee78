//! Error types for loading and resolving palettes and themes.
//!
//! [`FetchError`] covers everything that can go wrong while getting bytes
//! from a location. [`StyleError`] is the error returned by the store and
//! the resolvers; it wraps fetch failures and adds the lookup failures that
//! name the missing resource and the valid alternatives.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while fetching content from a local path or a URL.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The location looked like a URL but could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A local path does not exist.
    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// A local path exists but could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Transport-level failure talking to a remote host.
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The remote host answered with a non-success status.
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Fetched bytes could not be written to a temporary file.
    #[error("Failed to write temporary file: {0}")]
    TempFile(#[source] io::Error),
}

/// Errors raised by the font registry of the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FontError {
    /// The family has never been registered and is not a system family.
    #[error("Font family '{0}' is not registered")]
    UnknownFamily(String),

    /// A registration was attempted without any font face.
    #[error("Font family '{0}' has no font faces")]
    MissingFaces(String),
}

/// Which of the two configuration tables an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Palettes,
    Themes,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Palettes => write!(f, "palettes"),
            Self::Themes => write!(f, "themes"),
        }
    }
}

/// Errors returned by the configuration store and the resolvers.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// Content could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Content was fetched but is not a valid palette or theme document.
    #[error("Failed to parse {location}: {message}")]
    Parse { location: String, message: String },

    /// A table was read before anything was loaded into it.
    #[error("No {0} loaded. Load a {0} file first.")]
    NotLoaded(TableKind),

    #[error("Palette '{name}' not found. Available palettes: {}", join_names(.available))]
    PaletteNotFound { name: String, available: Vec<String> },

    #[error("Theme '{name}' not found. Available themes: {}", join_names(.available))]
    ThemeNotFound { name: String, available: Vec<String> },

    /// The theme names a base theme the plotting library does not provide.
    #[error("Theme '{theme}' uses unknown base theme '{base}'. Known base themes: {}", join_names(.known))]
    UnknownBaseTheme {
        theme: String,
        base: String,
        known: Vec<String>,
    },

    /// A discrete scale was requested from a palette without labels.
    #[error("Palette '{0}' has no labels and can only be used as a gradient")]
    PaletteNotDiscrete(String),

    /// None of the files declared for a font family could be fetched.
    #[error("Could not provision font family '{family}': {message}")]
    FontProvisioning { family: String, message: String },

    /// The rendering layer rejected a font registration.
    #[error(transparent)]
    Font(#[from] FontError),
}

impl StyleError {
    /// Create a parse error for the given location.
    pub fn parse(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            location: location.into(),
            message: message.into(),
        }
    }
}

fn join_names(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

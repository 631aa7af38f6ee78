//! Content locations: URLs and local paths.

use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::error::FetchError;

/// Hosts that receive credentials. Subdomains match too.
const CREDENTIAL_HOSTS: &[&str] = &["github.com", "githubusercontent.com"];

/// Where a palette file, theme file or font file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// An `http://` or `https://` URL.
    Url(Url),
    /// A path on the local filesystem.
    Path(PathBuf),
}

impl Location {
    /// Classifies `raw` as a URL or a local path.
    ///
    /// Only the `http://` and `https://` prefixes make a URL; everything
    /// else, including `file://`-less relative paths, is a path.
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(trimmed).map_err(|e| FetchError::InvalidUrl {
                url: trimmed.to_string(),
                reason: e.to_string(),
            })?;
            Ok(Location::Url(url))
        } else {
            Ok(Location::Path(PathBuf::from(trimmed)))
        }
    }

    /// Whether a supplied credential may be attached when fetching here.
    ///
    /// True only for URLs on a recognized code-hosting domain (raw content
    /// or repository pages). Local paths never take credentials.
    pub fn accepts_credential(&self) -> bool {
        match self {
            Location::Url(url) => url.host_str().is_some_and(|host| {
                let host = host.to_ascii_lowercase();
                CREDENTIAL_HOSTS
                    .iter()
                    .any(|known| host == *known || host.ends_with(&format!(".{known}")))
            }),
            Location::Path(_) => false,
        }
    }

    /// The last path segment, used to classify font files.
    ///
    /// Query strings and fragments are ignored for URLs.
    pub fn file_name(&self) -> String {
        match self {
            Location::Url(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .unwrap_or_default()
                .to_string(),
            Location::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    /// The file extension including the leading dot, or an empty string.
    pub fn extension_suffix(&self) -> String {
        let name = self.file_name();
        Path::new(&name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Url(url) => write!(f, "{url}"),
            Location::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

//! Fetching palette, theme and font content from local paths or URLs.
//!
//! Everything that loads configuration goes through the [`Fetcher`] trait,
//! so the store can be exercised without touching the network:
//!
//! ```text
//! Fetcher
//! ├── HttpFetcher   → local files + blocking HTTP GET
//! └── MockFetcher   → in-memory responses for tests
//! ```
//!
//! A location is either a URL (`http://` or `https://`) or a filesystem
//! path; see [`Location`]. Credentials are only ever sent to recognized
//! code-hosting domains, see [`Location::accepts_credential`].
//!
//! # Example
//!
//! ```rust
//! use plotstyle::fetch::{Fetcher, Location, MockFetcher};
//!
//! let fetcher = MockFetcher::new().with_text("palettes.yaml", "npg: ['#E64B35FF']");
//! let text = fetcher
//!     .fetch_text(&Location::parse("palettes.yaml").unwrap(), None)
//!     .unwrap();
//! assert!(text.starts_with("npg"));
//! ```

mod credential;
mod http;
mod location;
mod mock;

use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::error::FetchError;

pub use credential::{Credential, FontCredential, NO_CREDENTIAL};
pub use http::HttpFetcher;
pub use location::Location;
pub use mock::MockFetcher;

/// A source of raw configuration content.
///
/// Implementations make a single attempt per call. Failures are returned,
/// never retried.
pub trait Fetcher: Send + Sync {
    /// Fetch the full content at `location` as UTF-8 text.
    fn fetch_text(
        &self,
        location: &Location,
        credential: Option<&Credential>,
    ) -> Result<String, FetchError>;

    /// Fetch the content at `location` as a file on disk.
    ///
    /// Font registration needs a path rather than bytes, so remote content
    /// is written to a temporary file that lives as long as the returned
    /// [`FetchedFile`].
    fn fetch_binary(
        &self,
        location: &Location,
        credential: Option<&Credential>,
    ) -> Result<FetchedFile, FetchError>;
}

/// A fetched file, either an existing local path or a scoped temp file.
#[derive(Debug)]
pub enum FetchedFile {
    /// A local file that was already on disk.
    Local(PathBuf),
    /// Downloaded bytes, deleted when this value is dropped.
    Temp(TempPath),
}

impl FetchedFile {
    /// Path of the file on disk.
    pub fn path(&self) -> &Path {
        match self {
            FetchedFile::Local(path) => path,
            FetchedFile::Temp(temp) => temp,
        }
    }

    /// Writes `bytes` to a fresh temporary file.
    ///
    /// The file keeps `suffix` (typically the original extension) so that
    /// consumers sniffing by extension still work.
    pub fn from_bytes(bytes: &[u8], suffix: &str) -> Result<Self, FetchError> {
        use std::io::Write;

        let mut file = tempfile::Builder::new()
            .prefix("plotstyle-")
            .suffix(suffix)
            .tempfile()
            .map_err(FetchError::TempFile)?;
        file.write_all(bytes).map_err(FetchError::TempFile)?;
        file.flush().map_err(FetchError::TempFile)?;
        Ok(FetchedFile::Temp(file.into_temp_path()))
    }
}

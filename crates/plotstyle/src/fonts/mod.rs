//! Custom fonts declared by themes.
//!
//! Theme files may list font files per family. After a theme load, every
//! declared file is fetched with [`Fetcher::fetch_binary`](crate::fetch::Fetcher::fetch_binary),
//! sorted into a face slot by its file name ([`classify`]) and handed to a
//! [`FontRegistry`] as one [`FontFamily`] per family name.
//!
//! ```text
//! fonts:
//!   Inter:
//!     - .../Inter-Regular.ttf     → regular
//!     - .../Inter-Bold.ttf        → bold
//!     - .../Inter-Italic.ttf      → italic
//!     - .../Inter-BoldItalic.ttf  → bold-italic
//! ```

mod classify;
mod provision;
mod registry;

pub use classify::{classify, FontStyle};
pub use provision::{provision, ProvisionReport};
pub use registry::{
    FontFaces, FontFamily, FontRegistry, MemoryFontRegistry, FALLBACK_FAMILY, SYSTEM_FAMILIES,
};

//! The font registry of the rendering layer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::classify::FontStyle;
use crate::error::FontError;
use crate::fetch::FetchedFile;

/// Generic families every rendering device understands.
pub const SYSTEM_FAMILIES: &[&str] = &["sans", "serif", "mono"];

/// Family used when a theme's own family cannot be activated.
pub const FALLBACK_FAMILY: &str = "sans";

/// Up to one file per face slot.
#[derive(Debug, Default)]
pub struct FontFaces {
    regular: Option<FetchedFile>,
    bold: Option<FetchedFile>,
    italic: Option<FetchedFile>,
    bold_italic: Option<FetchedFile>,
}

impl FontFaces {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, style: FontStyle) -> &mut Option<FetchedFile> {
        match style {
            FontStyle::Regular => &mut self.regular,
            FontStyle::Bold => &mut self.bold,
            FontStyle::Italic => &mut self.italic,
            FontStyle::BoldItalic => &mut self.bold_italic,
        }
    }

    /// Fills a slot, returning the file it replaced.
    pub fn set(&mut self, style: FontStyle, file: FetchedFile) -> Option<FetchedFile> {
        self.slot_mut(style).replace(file)
    }

    pub fn get(&self, style: FontStyle) -> Option<&FetchedFile> {
        match style {
            FontStyle::Regular => self.regular.as_ref(),
            FontStyle::Bold => self.bold.as_ref(),
            FontStyle::Italic => self.italic.as_ref(),
            FontStyle::BoldItalic => self.bold_italic.as_ref(),
        }
    }

    /// Filled slots with their file paths, in slot order.
    pub fn paths(&self) -> Vec<(FontStyle, &Path)> {
        FontStyle::ALL
            .iter()
            .filter_map(|style| self.get(*style).map(|file| (*style, file.path())))
            .collect()
    }

    pub fn len(&self) -> usize {
        FontStyle::ALL
            .iter()
            .filter(|style| self.get(**style).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A family name with its face files.
#[derive(Debug)]
pub struct FontFamily {
    pub name: String,
    pub faces: FontFaces,
}

impl FontFamily {
    pub fn new(name: impl Into<String>, faces: FontFaces) -> Self {
        Self {
            name: name.into(),
            faces,
        }
    }
}

/// Where fetched fonts are handed over to the renderer.
///
/// Registration takes ownership of the faces; temp files stay on disk for
/// as long as the registry keeps them.
pub trait FontRegistry: Send + Sync {
    /// Makes a family available under its name, replacing any earlier
    /// registration of the same name.
    fn register(&self, family: FontFamily) -> Result<(), FontError>;

    /// Makes `family` the active family for subsequent drawing.
    fn activate(&self, family: &str) -> Result<(), FontError>;

    /// Names of registered families, sorted.
    fn families(&self) -> Vec<String>;
}

/// A registry that keeps fonts in process memory.
///
/// System families are always activatable; other families must be
/// registered first.
#[derive(Debug, Default)]
pub struct MemoryFontRegistry {
    families: Mutex<BTreeMap<String, FontFaces>>,
    active: Mutex<Option<String>>,
}

impl MemoryFontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently activated family.
    pub fn active(&self) -> Option<String> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Filled face slots of a registered family.
    pub fn styles(&self, family: &str) -> Option<Vec<FontStyle>> {
        let families = self.families.lock().unwrap_or_else(PoisonError::into_inner);
        families
            .get(family)
            .map(|faces| faces.paths().into_iter().map(|(style, _)| style).collect())
    }

    /// Path of the face file in `style`, if registered.
    pub fn face_path(&self, family: &str, style: FontStyle) -> Option<PathBuf> {
        let families = self.families.lock().unwrap_or_else(PoisonError::into_inner);
        families
            .get(family)
            .and_then(|faces| faces.get(style))
            .map(|file| file.path().to_path_buf())
    }
}

impl FontRegistry for MemoryFontRegistry {
    fn register(&self, family: FontFamily) -> Result<(), FontError> {
        if family.faces.is_empty() {
            return Err(FontError::MissingFaces(family.name));
        }
        let mut families = self.families.lock().unwrap_or_else(PoisonError::into_inner);
        families.insert(family.name, family.faces);
        Ok(())
    }

    fn activate(&self, family: &str) -> Result<(), FontError> {
        let known = SYSTEM_FAMILIES.contains(&family)
            || self
                .families
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains_key(family);
        if !known {
            return Err(FontError::UnknownFamily(family.to_string()));
        }
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = Some(family.to_string());
        Ok(())
    }

    fn families(&self) -> Vec<String> {
        self.families
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

//! Font style detection from file names.

use std::fmt;

use serde::Serialize;

/// The four face slots of a font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub const ALL: [FontStyle; 4] = [
        FontStyle::Regular,
        FontStyle::Bold,
        FontStyle::Italic,
        FontStyle::BoldItalic,
    ];
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FontStyle::Regular => "regular",
            FontStyle::Bold => "bold",
            FontStyle::Italic => "italic",
            FontStyle::BoldItalic => "bold-italic",
        };
        f.write_str(name)
    }
}

/// Classifies a font file by markers in its name, ignoring case.
///
/// `Roboto-BoldItalic.ttf` is bold-italic, `Roboto-Oblique.ttf` italic,
/// `Roboto-Bold.ttf` bold; anything else is regular.
pub fn classify(file_name: &str) -> FontStyle {
    let name = file_name.to_ascii_lowercase();
    let bold = name.contains("bold");
    let italic = name.contains("italic") || name.contains("oblique");
    match (bold, italic) {
        (true, true) => FontStyle::BoldItalic,
        (false, true) => FontStyle::Italic,
        (true, false) => FontStyle::Bold,
        (false, false) => FontStyle::Regular,
    }
}

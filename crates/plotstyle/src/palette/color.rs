//! Color string validation for palette entries.
//!
//! Palettes store colors exactly as written in the YAML file; this module
//! only decides whether a string is something the plotting library accepts.
//!
//! Supported formats:
//!
//! - RGB hex: `"#fff"` or `"#ff6b35"`
//! - RGBA hex: `"#fff8"` or `"#4DBBD5FF"`
//! - Color names: `red`, `grey30`, `steelblue`, `transparent`
//!
//! # Example
//!
//! ```rust
//! use plotstyle::palette::ColorDef;
//!
//! let hex = ColorDef::parse("#4DBBD5FF").unwrap();
//! assert_eq!(hex, ColorDef::Rgba(0x4D, 0xBB, 0xD5, 0xFF));
//!
//! let named = ColorDef::parse("grey30").unwrap();
//! assert_eq!(named, ColorDef::Named("grey30".to_string()));
//! ```

/// A parsed color value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorDef {
    /// Hex color, alpha defaults to `0xFF`.
    Rgba(u8, u8, u8, u8),
    /// A color name, lowercased.
    Named(String),
}

impl ColorDef {
    /// Parses a color string.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty color value".to_string());
        }

        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        Self::parse_named(s)
    }

    /// Parses a hex color code (without the # prefix).
    fn parse_hex(hex: &str) -> Result<Self, String> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Invalid hex color: #{}", hex));
        }

        let short = |i: usize| -> Result<u8, String> {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| format!("Invalid hex: {}", hex))
        };
        let long = |i: usize| -> Result<u8, String> {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("Invalid hex: {}", hex))
        };

        match hex.len() {
            // #rgb -> #rrggbb
            3 => Ok(ColorDef::Rgba(short(0)?, short(1)?, short(2)?, 0xFF)),
            4 => Ok(ColorDef::Rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Ok(ColorDef::Rgba(long(0)?, long(2)?, long(4)?, 0xFF)),
            8 => Ok(ColorDef::Rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => Err(format!(
                "Invalid hex color: #{} (must be 3, 4, 6 or 8 digits)",
                hex
            )),
        }
    }

    /// Parses a color name such as `red` or `grey30`.
    fn parse_named(name: &str) -> Result<Self, String> {
        let mut chars = name.chars();
        let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        if starts_with_letter && chars.all(|c| c.is_ascii_alphanumeric()) {
            Ok(ColorDef::Named(name.to_ascii_lowercase()))
        } else {
            Err(format!("Unknown color: {}", name))
        }
    }
}

/// True when `s` is a color string the plotting library accepts.
pub fn is_valid_color(s: &str) -> bool {
    ColorDef::parse(s).is_ok()
}

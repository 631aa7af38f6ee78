//! Base themes provided by the plotting library.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A foundational theme preset, parameterized with a font family when
/// the final theme is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum BaseTheme {
    Grey,
    Bw,
    Linedraw,
    Light,
    Dark,
    Minimal,
    Classic,
    Void,
    Test,
}

impl BaseTheme {
    pub const ALL: [BaseTheme; 9] = [
        BaseTheme::Grey,
        BaseTheme::Bw,
        BaseTheme::Linedraw,
        BaseTheme::Light,
        BaseTheme::Dark,
        BaseTheme::Minimal,
        BaseTheme::Classic,
        BaseTheme::Void,
        BaseTheme::Test,
    ];

    /// The constructor name in the plotting library.
    pub fn function_name(&self) -> &'static str {
        match self {
            BaseTheme::Grey => "theme_grey",
            BaseTheme::Bw => "theme_bw",
            BaseTheme::Linedraw => "theme_linedraw",
            BaseTheme::Light => "theme_light",
            BaseTheme::Dark => "theme_dark",
            BaseTheme::Minimal => "theme_minimal",
            BaseTheme::Classic => "theme_classic",
            BaseTheme::Void => "theme_void",
            BaseTheme::Test => "theme_test",
        }
    }

    /// Every accepted constructor name, for error messages.
    pub fn known_names() -> Vec<String> {
        Self::ALL
            .iter()
            .map(|base| base.function_name().to_string())
            .collect()
    }
}

impl FromStr for BaseTheme {
    type Err = String;

    /// Accepts `theme_minimal`, `minimal` and `theme_gray`/`gray` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let name = name.strip_prefix("theme_").unwrap_or(&name);
        match name {
            "grey" | "gray" => Ok(BaseTheme::Grey),
            "bw" => Ok(BaseTheme::Bw),
            "linedraw" => Ok(BaseTheme::Linedraw),
            "light" => Ok(BaseTheme::Light),
            "dark" => Ok(BaseTheme::Dark),
            "minimal" => Ok(BaseTheme::Minimal),
            "classic" => Ok(BaseTheme::Classic),
            "void" => Ok(BaseTheme::Void),
            "test" => Ok(BaseTheme::Test),
            _ => Err(format!("Unknown base theme: {}", s)),
        }
    }
}

impl fmt::Display for BaseTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name())
    }
}

impl From<BaseTheme> for String {
    fn from(base: BaseTheme) -> Self {
        base.function_name().to_string()
    }
}

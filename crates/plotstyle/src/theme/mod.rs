//! Named plot themes.
//!
//! - [`ThemeTable`] / [`ThemeSpec`]: the data model and YAML parsing
//! - [`SettingValue`] / [`Element`]: setting values and constructor parsing
//! - [`ThemeResolver`]: base theme, font fallback and override merge
//! - [`BaseTheme`]: the presets a theme builds on

mod base;
mod element;
mod expr;
mod resolve;
mod spec;

pub use base::BaseTheme;
pub use element::{Element, LineElement, Margin, Measure, RectElement, SettingValue, TextElement, Unit};
pub use expr::ExpressionError;
pub use resolve::{ResolvedTheme, Settings, ThemeResolver};
pub use spec::{FontDeclaration, ThemeSpec, ThemeTable};

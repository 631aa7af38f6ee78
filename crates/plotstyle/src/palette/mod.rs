//! Named color palettes.
//!
//! - [`PaletteTable`] / [`Palette`]: the data model and YAML parsing
//! - [`PaletteResolver`]: discrete lookups and continuous gradients
//! - [`ColorDef`]: color string validation

mod color;
mod resolve;
mod table;

pub use color::{is_valid_color, ColorDef};
pub use resolve::{
    ContinuousScale, DiscreteLookup, DiscreteScale, LevelColors, PaletteResolver,
    DEFAULT_PALETTE, DEFAULT_UNSEEN_COLOR,
};
pub use table::{LabeledPalette, Palette, PaletteTable};

pub(crate) use table::scalar_to_string;

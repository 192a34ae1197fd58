//! Tiles Module
//!
//! Palettes, hide sets and the pixel pipeline applied to intercepted tiles.

pub mod codec;
pub mod hide;
pub mod palette;
pub mod pixel;


pub use codec::{transform_tile, TransformOutcome};
pub use hide::HideSet;
pub use palette::{ColorMapping, Rgb, DESIGNATION_COLORS, PLOW_RECENCY_MAPPINGS};

// == Tile Kind ==
/// The two tile families whose pixels are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    /// Colors encode how recently a street was plowed; recolored
    PlowRecency,
    /// Colors encode street priority; only optionally hidden
    Designation,
}

//! Palette Tables
//!
//! Fixed colors used by the two intercepted tile families. Order matters:
//! the index is the category number addressed by the `hide` parameter, and
//! the earlier entry wins an exact distance tie.

/// An RGB triple in 0..=255 channel space.
pub type Rgb = [u8; 3];

// == Color Mapping ==
/// Replacement of one upstream plow-recency color by its display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMapping {
    pub source: Rgb,
    pub destination: Rgb,
}

impl ColorMapping {
    pub const fn new(source: Rgb, destination: Rgb) -> Self {
        Self {
            source,
            destination,
        }
    }
}

/// Plow-recency buckets, most recently serviced first.
pub const PLOW_RECENCY_MAPPINGS: [ColorMapping; 5] = [
    // Within the last hour
    ColorMapping::new([56, 168, 0], [0, 230, 118]),
    // One to three hours
    ColorMapping::new([152, 230, 0], [118, 255, 3]),
    // Three to six hours
    ColorMapping::new([255, 255, 0], [255, 214, 0]),
    // Six to twelve hours
    ColorMapping::new([255, 170, 0], [255, 109, 0]),
    // Over twelve hours
    ColorMapping::new([230, 0, 0], [213, 0, 0]),
];

/// Street designation categories, drawn as-is by upstream.
pub const DESIGNATION_COLORS: [Rgb; 3] = [
    // Arterial routes
    [0, 92, 230],
    // Residential streets
    [255, 0, 197],
    // Side streets and alleys
    [168, 112, 0],
];

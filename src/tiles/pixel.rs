//! Pixel Transformer
//!
//! In-place operations over interleaved RGBA8 buffers. Fully transparent
//! pixels are skipped without inspection. There is no cross-pixel
//! dependency, so processing order does not affect the result.

use super::hide::HideSet;
use super::palette::{ColorMapping, Rgb};

/// Squared RGB distance below which a pixel is considered a palette color.
pub const MATCH_THRESHOLD: u32 = 12_000;

/// Euclidean distance at which the recolor blend factor reaches zero.
pub const FADE_DISTANCE: f64 = 110.0;

// == Distance ==
pub fn squared_distance(a: Rgb, b: Rgb) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as i32 - y as i32;
            (d * d) as u32
        })
        .sum()
}

// == Nearest Color ==
/// Returns the index and squared distance of the closest palette color.
///
/// The first index wins an exact tie. `None` only for an empty palette.
pub fn nearest_color<I>(rgb: Rgb, palette: I) -> Option<(usize, u32)>
where
    I: IntoIterator<Item = Rgb>,
{
    let mut best: Option<(usize, u32)> = None;
    for (index, color) in palette.into_iter().enumerate() {
        let distance = squared_distance(rgb, color);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }
    best
}

/// Nearest palette index, only when within `MATCH_THRESHOLD`.
fn classify<I>(rgb: Rgb, palette: I) -> Option<(usize, u32)>
where
    I: IntoIterator<Item = Rgb>,
{
    nearest_color(rgb, palette).filter(|&(_, distance)| distance < MATCH_THRESHOLD)
}

// == Blend ==
/// Fraction of the recolor shift applied at squared distance `d2`.
pub fn blend_factor(d2: u32) -> f64 {
    (1.0 - (d2 as f64).sqrt() / FADE_DISTANCE).max(0.0)
}

fn blend_channel(original: u8, source: u8, destination: u8, t: f64) -> u8 {
    let shift = (destination as f64 - source as f64) * t;
    (original as f64 + shift).round().clamp(0.0, 255.0) as u8
}

// == Recolor ==
/// Recolors plow-recency pixels toward their mapped destination colors.
///
/// Exact source matches are replaced outright; near matches are shifted by
/// the source-to-destination delta scaled by `blend_factor`, which keeps
/// anti-aliased edges smooth. A pixel whose category is in `hide` gets
/// alpha 0 instead.
pub fn recolor_pixels(rgba: &mut [u8], mappings: &[ColorMapping], hide: &HideSet) {
    for px in rgba.chunks_exact_mut(4) {
        if px[3] == 0 {
            continue;
        }

        let rgb = [px[0], px[1], px[2]];
        let Some((index, d2)) = classify(rgb, mappings.iter().map(|m| m.source)) else {
            continue;
        };

        if hide.contains(index) {
            px[3] = 0;
            continue;
        }

        let mapping = mappings[index];
        if d2 == 0 {
            px[..3].copy_from_slice(&mapping.destination);
            continue;
        }

        let t = blend_factor(d2);
        for c in 0..3 {
            px[c] = blend_channel(rgb[c], mapping.source[c], mapping.destination[c], t);
        }
    }
}

// == Filter ==
/// Zeroes alpha for designation pixels whose category is in `hide`.
///
/// RGB channels are never modified.
pub fn filter_pixels(rgba: &mut [u8], palette: &[Rgb], hide: &HideSet) {
    if hide.is_empty() {
        return;
    }

    for px in rgba.chunks_exact_mut(4) {
        if px[3] == 0 {
            continue;
        }

        let rgb = [px[0], px[1], px[2]];
        if let Some((index, _)) = classify(rgb, palette.iter().copied()) {
            if hide.contains(index) {
                px[3] = 0;
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::palette::{DESIGNATION_COLORS, PLOW_RECENCY_MAPPINGS};

    fn recolor_one(px: [u8; 4], hide: &HideSet) -> [u8; 4] {
        let mut buf = px;
        recolor_pixels(&mut buf, &PLOW_RECENCY_MAPPINGS, hide);
        buf
    }

    #[test]
    fn test_squared_distance() {
        assert_eq!(squared_distance([0, 0, 0], [0, 0, 0]), 0);
        assert_eq!(squared_distance([10, 0, 0], [0, 20, 0]), 500);
        assert_eq!(squared_distance([0, 0, 0], [255, 255, 255]), 3 * 255 * 255);
    }

    #[test]
    fn test_nearest_color_first_index_wins_tie() {
        let palette = [[0, 0, 0], [10, 0, 0]];
        assert_eq!(nearest_color([5, 0, 0], palette), Some((0, 25)));
        assert_eq!(nearest_color([6, 0, 0], palette), Some((1, 16)));
    }

    #[test]
    fn test_nearest_color_empty_palette() {
        assert_eq!(nearest_color([1, 2, 3], std::iter::empty()), None);
    }

    #[test]
    fn test_exact_match_replaced_with_destination() {
        let hide = HideSet::new();
        for mapping in PLOW_RECENCY_MAPPINGS {
            let [r, g, b] = mapping.source;
            let [dr, dg, db] = mapping.destination;
            assert_eq!(recolor_one([r, g, b, 255], &hide), [dr, dg, db, 255]);
        }
    }

    #[test]
    fn test_near_match_interpolates_per_entry() {
        let hide = HideSet::new();
        // (input, expected) hand-computed from round(orig + (dst - src) * (1 - sqrt(d2) / 110))
        let cases = [
            ([60, 170, 4, 255], [7, 229, 116, 255]),
            ([150, 224, 10, 200], [120, 246, 13, 200]),
            ([250, 250, 8, 255], [250, 213, 8, 255]),
            ([250, 176, 6, 255], [250, 120, 6, 255]),
            ([224, 8, 4, 128], [209, 8, 4, 128]),
        ];
        for (input, expected) in cases {
            assert_eq!(recolor_one(input, &hide), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_far_pixel_untouched() {
        let hide = HideSet::from_iter([0, 1, 2, 3, 4]);
        assert_eq!(recolor_one([20, 20, 200, 255], &hide), [20, 20, 200, 255]);
        assert_eq!(recolor_one([128, 128, 128, 255], &hide), [128, 128, 128, 255]);
    }

    #[test]
    fn test_transparent_pixel_untouched() {
        let hide = HideSet::from_iter([0]);
        assert_eq!(recolor_one([56, 168, 0, 0], &hide), [56, 168, 0, 0]);
    }

    #[test]
    fn test_hidden_category_zeroes_alpha_only() {
        let hide = HideSet::from_iter([0]);
        assert_eq!(recolor_one([56, 168, 0, 255], &hide), [56, 168, 0, 0]);
        assert_eq!(recolor_one([60, 170, 4, 255], &hide), [60, 170, 4, 0]);
        // Other categories still recolor
        assert_eq!(recolor_one([230, 0, 0, 255], &hide), [213, 0, 0, 255]);
    }

    #[test]
    fn test_blend_factor_bounds() {
        assert_eq!(blend_factor(0), 1.0);
        assert!(blend_factor(MATCH_THRESHOLD - 1) > 0.0);
        assert_eq!(blend_factor(110 * 110), 0.0);
        assert_eq!(blend_factor(200 * 200), 0.0);
    }

    #[test]
    fn test_filter_hides_only_members() {
        let hide = HideSet::from_iter([1]);
        let mut buf = [
            255, 0, 197, 255, // residential, hidden
            250, 5, 190, 255, // near residential, hidden
            0, 92, 230, 255, // arterial, kept
            20, 200, 20, 255, // unrelated, kept
        ];

        filter_pixels(&mut buf, &DESIGNATION_COLORS, &hide);

        assert_eq!(
            buf,
            [255, 0, 197, 0, 250, 5, 190, 0, 0, 92, 230, 255, 20, 200, 20, 255]
        );
    }

    #[test]
    fn test_filter_empty_hide_set_is_noop() {
        let mut buf = [255, 0, 197, 255, 0, 92, 230, 255];
        let before = buf;

        filter_pixels(&mut buf, &DESIGNATION_COLORS, &HideSet::new());

        assert_eq!(buf, before);
    }
}

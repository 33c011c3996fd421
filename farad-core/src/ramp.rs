//! Battery-level color ramp
//!
//! Maps the measured battery fraction onto the user's ordered color list.
//! The list runs from the full-battery end (index 0 = 100%) down to the
//! empty end (last meaningful index = 0%), matching the order the control
//! protocol writes it in.

use rgb::RGB8;

use crate::state::DEFAULT_COLOR;
use farad_protocol::messages::MAX_COLORS;

/// Unpack a 24-bit color into its channels
pub fn rgb_from_u24(color: u32) -> RGB8 {
    RGB8 {
        r: (color >> 16) as u8,
        g: (color >> 8) as u8,
        b: color as u8,
    }
}

/// Channel-wise linear blend, 8-bit integer arithmetic with truncation
///
/// `t` runs 0 (all `a`) to 255 (all `b`).
fn blend(a: RGB8, b: RGB8, t: u8) -> RGB8 {
    let mix = |a: u8, b: u8| {
        ((a as u32 * (255 - t as u32) + b as u32 * t as u32) / 255) as u8
    };
    RGB8 {
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
    }
}

/// Interpolate the ramp color for a battery fraction
///
/// - `count == 0`: fixed fallback red
/// - `count == 1`: that single color
/// - `count >= 2`: [0,1] is split into `count - 1` equal segments and the
///   two segment endpoint colors are blended; out-of-range fractions clamp
///   to the nearest end of the list
pub fn interpolate(colors: &[u32; MAX_COLORS], count: u8, battery: f32) -> RGB8 {
    let count = (count as usize).min(MAX_COLORS);
    match count {
        0 => return rgb_from_u24(DEFAULT_COLOR),
        1 => return rgb_from_u24(colors[0]),
        _ => {}
    }

    let battery = battery.clamp(0.0, 1.0);

    // Distance along the list measured from the full-battery end
    let position = (1.0 - battery) * (count - 1) as f32;
    let segment = (position as usize).min(count - 2);
    let local = position - segment as f32;

    let high = rgb_from_u24(colors[segment]);
    let low = rgb_from_u24(colors[segment + 1]);
    blend(high, low, (local * 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UNSET_COLOR;

    fn palette(colors: &[u32]) -> [u32; MAX_COLORS] {
        let mut out = [UNSET_COLOR; MAX_COLORS];
        out[..colors.len()].copy_from_slice(colors);
        out
    }

    #[test]
    fn test_empty_list_falls_back_to_red() {
        let colors = palette(&[]);
        assert_eq!(interpolate(&colors, 0, 0.5), rgb_from_u24(0xFF0000));
    }

    #[test]
    fn test_single_color_ignores_fraction() {
        let colors = palette(&[0x00FF7F]);
        for battery in [0.0, 0.3, 1.0] {
            assert_eq!(interpolate(&colors, 1, battery), rgb_from_u24(0x00FF7F));
        }
    }

    #[test]
    fn test_midpoint_hits_middle_color_exactly() {
        // Ordered 100% -> 50% -> 0%
        let colors = palette(&[0xFF0000, 0x00FF00, 0x0000FF]);
        assert_eq!(interpolate(&colors, 3, 0.5), rgb_from_u24(0x00FF00));
    }

    #[test]
    fn test_quarter_point_blends_top_segment() {
        let colors = palette(&[0xFF0000, 0x00FF00, 0x0000FF]);
        // 0.75 sits halfway between index 0 (100%) and index 1 (50%)
        let mid = interpolate(&colors, 3, 0.75);
        assert_eq!(mid, blend(rgb_from_u24(0xFF0000), rgb_from_u24(0x00FF00), 127));
        // Channel-wise midpoint, up to integer truncation
        assert!(mid.r == 127 || mid.r == 128);
        assert!(mid.g == 127 || mid.g == 128);
        assert_eq!(mid.b, 0);
    }

    #[test]
    fn test_endpoints_are_exact() {
        let colors = palette(&[0xFF0000, 0x00FF00, 0x0000FF]);
        assert_eq!(interpolate(&colors, 3, 1.0), rgb_from_u24(0xFF0000));
        assert_eq!(interpolate(&colors, 3, 0.0), rgb_from_u24(0x0000FF));
    }

    #[test]
    fn test_out_of_range_fractions_clamp() {
        let colors = palette(&[0xFF0000, 0x0000FF]);
        assert_eq!(interpolate(&colors, 2, 1.5), rgb_from_u24(0xFF0000));
        assert_eq!(interpolate(&colors, 2, -0.5), rgb_from_u24(0x0000FF));
    }
}

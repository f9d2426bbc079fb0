// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Coordinate quantization at the wire precision.
//!
//! Encoded paths carry coordinates as integers scaled by [`COORD_SCALE`].
//! Comparing two decoded points is only meaningful after projecting both onto
//! that grid.

/// Scale factor between degrees and the integer grid (five decimal places).
pub const COORD_SCALE: f64 = 1e5;

/// Project a coordinate in degrees onto the integer grid.
///
/// Rounds half away from zero, which is what upstream encoders do.
/// Callers must pass finite values; non-finite input saturates.
pub fn quantize(degrees: f64) -> i64 {
    let scaled = degrees * COORD_SCALE;
    // `as` saturates on overflow and maps NaN to 0.
    if scaled >= 0.0 {
        (scaled + 0.5) as i64
    } else {
        (scaled - 0.5) as i64
    }
}

/// Convert a grid value back to degrees.
pub fn dequantize(value: i64) -> f64 {
    value as f64 / COORD_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_rounds_half_away_from_zero() {
        assert_eq!(quantize(38.5), 3_850_000);
        assert_eq!(quantize(0.000_01), 1);
        assert_eq!(quantize(-0.000_01), -1);
        assert_eq!(quantize(-120.2), -12_020_000);
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(quantize(-0.0), 0);
    }

    #[test]
    fn test_dequantize_inverts_quantize_on_grid() {
        assert!((dequantize(quantize(42.35123)) - 42.35123).abs() < 1e-9);
    }
}

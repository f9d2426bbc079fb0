// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Encoded polyline format.
//!
//! Each coordinate is quantized to five decimal places, delta-encoded against
//! the previous point, zig-zag folded and written as base-32 chunks offset by
//! 63. Latitude comes before longitude. This matches the common upstream
//! encoders at their default precision.

use livemap_surface_port::{dequantize, quantize, LatLng};
use thiserror::Error;

const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION: i64 = 0x20;
const CHAR_OFFSET: u8 = 63;
// 64-bit accumulator; anything shifted further is garbage.
const MAX_SHIFT: u32 = 60;

/// Errors produced while decoding an encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    /// A byte outside the encoding alphabet (`?`..=`~`).
    #[error("invalid byte 0x{byte:02x} at offset {offset}")]
    InvalidByte {
        /// Byte offset in the input.
        offset: usize,
        /// Offending byte.
        byte: u8,
    },
    /// Input ended in the middle of a value.
    #[error("truncated value at offset {0}")]
    Truncated(usize),
    /// A value ran longer than a 64-bit accumulator can hold.
    #[error("value overflow at offset {0}")]
    Overflow(usize),
    /// The input held a latitude with no matching longitude.
    #[error("latitude without longitude at offset {0}")]
    UnpairedLatitude(usize),
}

/// Decode an encoded polyline into points.
///
/// An empty string decodes to an empty sequence; callers decide whether that
/// is acceptable.
pub fn decode(encoded: &str) -> Result<Vec<LatLng>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::with_capacity(bytes.len() / 4);
    let mut offset = 0;
    let mut lat = 0i64;
    let mut lon = 0i64;

    while offset < bytes.len() {
        let lat_start = offset;
        let (dlat, next) = decode_value(bytes, offset)?;
        if next >= bytes.len() {
            return Err(PolylineError::UnpairedLatitude(lat_start));
        }
        let (dlon, next) = decode_value(bytes, next)?;
        offset = next;

        lat = lat.wrapping_add(dlat);
        lon = lon.wrapping_add(dlon);
        points.push(LatLng::new(dequantize(lat), dequantize(lon)));
    }

    Ok(points)
}

fn decode_value(bytes: &[u8], start: usize) -> Result<(i64, usize), PolylineError> {
    let mut result = 0i64;
    let mut shift = 0u32;
    let mut offset = start;

    loop {
        let Some(&byte) = bytes.get(offset) else {
            return Err(PolylineError::Truncated(start));
        };
        if !(CHAR_OFFSET..=b'~').contains(&byte) {
            return Err(PolylineError::InvalidByte { offset, byte });
        }
        if shift > MAX_SHIFT {
            return Err(PolylineError::Overflow(start));
        }
        let chunk = i64::from(byte - CHAR_OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;
        offset += 1;
        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    let value = if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Ok((value, offset))
}

/// Encode points as a polyline string.
///
/// Points that fail [`LatLng::is_valid`] are skipped, so deltas stay within
/// the range a 64-bit accumulator can carry.
pub fn encode(points: &[LatLng]) -> String {
    let mut out = String::with_capacity(points.len() * 8);
    let mut prev_lat = 0i64;
    let mut prev_lon = 0i64;

    for point in points.iter().filter(|p| p.is_valid()) {
        let lat = quantize(point.lat);
        let lon = quantize(point.lon);
        encode_value(lat - prev_lat, &mut out);
        encode_value(lon - prev_lon, &mut out);
        prev_lat = lat;
        prev_lon = lon;
    }

    out
}

fn encode_value(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= CONTINUATION {
        out.push(char::from(
            ((CONTINUATION | (value & CHUNK_MASK)) as u8) + CHAR_OFFSET,
        ));
        value >>= CHUNK_BITS;
    }
    out.push(char::from((value as u8) + CHAR_OFFSET));
}

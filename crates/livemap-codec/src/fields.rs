// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Attribute names and per-field parsers.
//!
//! Every parser handles exactly one field so a malformed value can be dropped
//! without affecting its neighbours.

use livemap_surface_port::{Bounds, Heading, LatLng};
use serde::Deserialize;
use thiserror::Error;

use crate::polyline::{self, PolylineError};

/// Attribute carrying the destination record (read once at init).
pub const ATTR_DESTINATION: &str = "data-destination";
/// Attribute carrying the vehicle label.
pub const ATTR_VEHICLE: &str = "data-vehicle";
/// Attribute carrying the vehicle heading in integer degrees.
pub const ATTR_VEHICLE_HEADING: &str = "data-vehicle-heading";
/// Attribute carrying the viewport rectangle as `[[lat, lon], [lat, lon]]`.
pub const ATTR_BBOX: &str = "data-bbox";
/// Attribute carrying the encoded route path.
pub const ATTR_POLYLINE: &str = "data-polyline";
/// Attribute carrying the popup text.
pub const ATTR_POPUP: &str = "data-popup";

/// Attributes whose mutation triggers a reconciliation pass.
pub const OBSERVED_ATTRIBUTES: [&str; 5] = [
    ATTR_VEHICLE,
    ATTR_VEHICLE_HEADING,
    ATTR_BBOX,
    ATTR_POLYLINE,
    ATTR_POPUP,
];

/// Why a single field was rejected.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The value was not a number.
    #[error("not a number: {0:?}")]
    NotNumeric(String),
    /// The number was NaN or infinite.
    #[error("non-finite number")]
    NonFinite,
    /// The value was not the expected JSON shape.
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    /// A coordinate fell outside the WGS84 ranges.
    #[error("coordinate out of range: ({lat}, {lon})")]
    OutOfRange {
        /// Offending latitude.
        lat: f64,
        /// Offending longitude.
        lon: f64,
    },
    /// The encoded path could not be decoded.
    #[error("polyline: {0}")]
    Polyline(#[from] PolylineError),
    /// The encoded path decoded to zero points.
    #[error("path has no points")]
    NoPoints,
}

/// Destination record as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DestinationWire {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Accessible label for the destination pin.
    #[serde(default)]
    pub alt: Option<String>,
    /// Altitude in meters, when known.
    #[serde(default)]
    pub altitude: Option<f64>,
}

impl DestinationWire {
    /// Position of the destination.
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }
}

/// Treat empty strings the way the page does: as absent.
pub fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

/// Parse the destination record.
pub fn parse_destination(raw: &str) -> Result<DestinationWire, FieldError> {
    let dest: DestinationWire = serde_json::from_str(raw)?;
    check_point(dest.position())?;
    Ok(dest)
}

/// Parse a heading in degrees.
///
/// Integers are taken as-is; decimals are truncated toward zero.
pub fn parse_heading(raw: &str) -> Result<Heading, FieldError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| FieldError::NotNumeric(trimmed.to_owned()))?;
    heading_from_f64(value)
}

/// Build a heading from a JSON number, truncating toward zero.
pub fn heading_from_f64(value: f64) -> Result<Heading, FieldError> {
    if !value.is_finite() {
        return Err(FieldError::NonFinite);
    }
    Heading::from_degrees(value.trunc()).ok_or(FieldError::NonFinite)
}

/// Parse a viewport rectangle from its JSON text.
pub fn parse_bounds(raw: &str) -> Result<Bounds, FieldError> {
    let corners: [[f64; 2]; 2] = serde_json::from_str(raw)?;
    bounds_from_corners(corners)
}

/// Parse a viewport rectangle from an already-decoded JSON value.
pub fn bounds_from_json(value: serde_json::Value) -> Result<Bounds, FieldError> {
    let corners: [[f64; 2]; 2] = serde_json::from_value(value)?;
    bounds_from_corners(corners)
}

fn bounds_from_corners(corners: [[f64; 2]; 2]) -> Result<Bounds, FieldError> {
    let a = LatLng::new(corners[0][0], corners[0][1]);
    let b = LatLng::new(corners[1][0], corners[1][1]);
    check_point(a)?;
    check_point(b)?;
    Ok(Bounds::from_corners(a, b))
}

/// Decode an encoded path, rejecting empty or out-of-range geometry.
pub fn parse_path(raw: &str) -> Result<Vec<LatLng>, FieldError> {
    let points = polyline::decode(raw)?;
    if points.is_empty() {
        return Err(FieldError::NoPoints);
    }
    if let Some(bad) = points.iter().find(|p| !p.is_valid()) {
        return Err(FieldError::OutOfRange {
            lat: bad.lat,
            lon: bad.lon,
        });
    }
    Ok(points)
}

fn check_point(point: LatLng) -> Result<(), FieldError> {
    if point.is_valid() {
        Ok(())
    } else {
        Err(FieldError::OutOfRange {
            lat: point.lat,
            lon: point.lon,
        })
    }
}

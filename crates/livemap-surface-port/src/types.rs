// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core map types for the rendering port contract.
//!
//! These types are pure domain objects with no serialization logic.
//! Wire parsing is handled by livemap-codec.

use alloc::string::String;

/// Geographic position in degrees (WGS84).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct LatLng {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl LatLng {
    /// Create a position.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both components are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Axis-aligned geographic rectangle.
///
/// `southwest` always holds the minimum latitude and longitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub southwest: LatLng,
    /// Maximum corner.
    pub northeast: LatLng,
}

impl Bounds {
    /// Build a rectangle from two opposite corners given in any order.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            southwest: LatLng::new(a.lat.min(b.lat), a.lon.min(b.lon)),
            northeast: LatLng::new(a.lat.max(b.lat), a.lon.max(b.lon)),
        }
    }
}

/// Compass heading in degrees, normalized into `[0, 360)`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Heading(f64);

impl Heading {
    /// Normalize a heading. Returns `None` for NaN or infinite input.
    pub fn from_degrees(degrees: f64) -> Option<Self> {
        if !degrees.is_finite() {
            return None;
        }
        let mut wrapped = degrees % 360.0;
        if wrapped < 0.0 {
            wrapped += 360.0;
        }
        // -1e-18 % 360 + 360 rounds to exactly 360.0.
        if wrapped >= 360.0 {
            wrapped = 0.0;
        }
        Some(Self(wrapped))
    }

    /// Heading in degrees.
    pub fn degrees(self) -> f64 {
        self.0
    }
}

/// Pixel padding kept between a fitted rectangle and the viewport edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Padding {
    /// Horizontal padding in pixels.
    pub x: u32,
    /// Vertical padding in pixels.
    pub y: u32,
}

impl Padding {
    /// Same padding on both axes.
    pub const fn uniform(px: u32) -> Self {
        Self { x: px, y: px }
    }
}

/// Handle to a marker attached to the surface.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerHandle(pub u64);

/// Handle to a polyline attached to the surface.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineHandle(pub u64);

/// Handle to an open popup.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PopupHandle(pub u64);

/// Which icon a marker uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum IconKind {
    /// Fixed destination pin.
    Location = 0,
    /// Moving vehicle, rotated by heading.
    Vehicle = 1,
}

/// Marker icon description. Loading the image is the surface's concern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IconDef {
    /// Icon role.
    pub kind: IconKind,
    /// Image source, if the host supplied one.
    pub url: Option<String>,
    /// Rendered size `[width, height]` in pixels.
    pub size: [u32; 2],
    /// Pixel within the image placed on the marker position.
    pub anchor: [u32; 2],
}

/// Marker definition handed to [`crate::MapSurface::create_marker`].
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerDef {
    /// Marker position.
    pub position: LatLng,
    /// Icon to draw.
    pub icon: IconDef,
    /// Rotation about the icon center, if any.
    pub heading: Option<Heading>,
    /// Accessible label (alt text).
    pub label: Option<String>,
    /// Accept pointer and keyboard events.
    pub interactive: bool,
}

/// Polyline styling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineStyle {
    /// CSS color of the stroke.
    pub color: String,
    /// Accept pointer events.
    pub interactive: bool,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: String::from("blue"),
            interactive: false,
        }
    }
}

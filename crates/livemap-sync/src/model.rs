// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Session data model: the destination and the canonical update record.

use std::sync::Arc;

use livemap_codec::DestinationWire;
use livemap_surface_port::{Bounds, Heading, LatLng};

/// The fixed point the page is about. Never changes during a session.
#[derive(Clone, Debug, PartialEq)]
pub struct Destination {
    /// Pin position.
    pub position: LatLng,
    /// Altitude in meters, when known.
    pub altitude: Option<f64>,
    /// Accessible label for the pin.
    pub label: Option<String>,
}

impl Destination {
    /// Destination with no altitude or label.
    pub fn new(position: LatLng) -> Self {
        Self {
            position,
            altitude: None,
            label: None,
        }
    }
}

impl From<DestinationWire> for Destination {
    fn from(wire: DestinationWire) -> Self {
        Self {
            position: wire.position(),
            altitude: wire.altitude,
            label: wire.alt.filter(|s| !s.is_empty()),
        }
    }
}

/// Where the vehicle is right now.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleState {
    /// Marker position.
    pub position: LatLng,
    /// Marker rotation.
    pub heading: Option<Heading>,
    /// Accessible label for the marker.
    pub label: Option<String>,
}

impl VehicleState {
    /// A vehicle at `position` with no heading or label.
    pub fn at(position: LatLng) -> Self {
        Self {
            position,
            heading: None,
            label: None,
        }
    }
}

/// A route path in both wire and decoded form.
///
/// Always holds at least one point.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteState {
    encoded: String,
    points: Arc<[LatLng]>,
}

impl RouteState {
    /// Pair an encoded path with its decoded points. `None` when `points` is empty.
    pub fn new(encoded: impl Into<String>, points: impl Into<Arc<[LatLng]>>) -> Option<Self> {
        let points = points.into();
        if points.is_empty() {
            return None;
        }
        Some(Self {
            encoded: encoded.into(),
            points,
        })
    }

    /// Wire form of the path.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Decoded points.
    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    /// Shared handle to the decoded points.
    pub fn shared_points(&self) -> Arc<[LatLng]> {
        Arc::clone(&self.points)
    }

    /// Where the vehicle sits: the first point of the path.
    pub fn head(&self) -> LatLng {
        // Constructor guarantees a first point.
        self.points.first().copied().unwrap_or_default()
    }
}

/// Status text shown at the destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopupState {
    /// Popup text.
    pub text: String,
}

/// Channel-independent description of the latest known state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanonicalUpdate {
    /// Vehicle, if the update supplied one.
    pub vehicle: Option<VehicleState>,
    /// Route, if the update supplied one.
    pub route: Option<RouteState>,
    /// Explicit viewport rectangle.
    pub bound: Option<Bounds>,
    /// Status popup.
    pub popup: Option<PopupState>,
}

impl CanonicalUpdate {
    /// An update carrying a route with the vehicle on its first point.
    pub fn with_route(route: RouteState, heading: Option<Heading>) -> Self {
        let vehicle = VehicleState {
            heading,
            ..VehicleState::at(route.head())
        };
        Self {
            vehicle: Some(vehicle),
            route: Some(route),
            ..Self::default()
        }
    }

    /// Set the viewport rectangle.
    pub fn bounded(mut self, bound: Bounds) -> Self {
        self.bound = Some(bound);
        self
    }

    /// Set the popup text.
    pub fn with_popup(mut self, text: impl Into<String>) -> Self {
        self.popup = Some(PopupState { text: text.into() });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_requires_points() {
        assert!(RouteState::new("", Vec::<LatLng>::new()).is_none());
        let route = RouteState::new("x", vec![LatLng::new(1.0, 2.0), LatLng::new(3.0, 4.0)])
            .expect("route");
        assert_eq!(route.head(), LatLng::new(1.0, 2.0));
        assert_eq!(route.points().len(), 2);
    }

    #[test]
    fn test_destination_from_wire_drops_empty_label() {
        let wire = DestinationWire {
            lat: 42.35,
            lon: -71.07,
            alt: Some(String::new()),
            altitude: Some(12.0),
        };
        let dest = Destination::from(wire);
        assert_eq!(dest.label, None);
        assert_eq!(dest.altitude, Some(12.0));
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Viewport framing decisions.

use crate::types::{Bounds, LatLng, Padding};

/// How the viewport should be framed on a reconciliation pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewFrame {
    /// Fit the view to an explicit rectangle.
    Bound {
        /// Rectangle to fit.
        bounds: Bounds,
        /// Pixel padding kept around the rectangle.
        padding: Padding,
    },
    /// Center on a point at a fixed zoom level.
    Center {
        /// View center.
        center: LatLng,
        /// Zoom level.
        zoom: u8,
    },
}

impl ViewFrame {
    /// Choose between an explicit bound and the fallback center.
    pub fn choose(bound: Option<Bounds>, padding: Padding, center: LatLng, zoom: u8) -> Self {
        match bound {
            Some(bounds) => Self::Bound { bounds, padding },
            None => Self::Center { center, zoom },
        }
    }
}

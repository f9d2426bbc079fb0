// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pushed message schema.
//!
//! The server pushes discrete events instead of mutating attributes:
//!
//! ```json
//! {"event": "route", "payload": {"polyline": "...", "bearing": 90, "bbox": [[42.3, -71.1], [42.4, -71.0]]}}
//! {"event": "clear", "payload": {"popup": "Arriving"}}
//! ```
//!
//! Payload fields stay as raw JSON so each one can be validated on its own;
//! only the envelope must be well formed.

use serde::{Deserialize, Serialize};

/// A discrete update pushed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum PushedMessage {
    /// Vehicle, route and viewport update.
    Route(RouteMessage),
    /// Vehicle gone; optionally show a status popup.
    Clear(ClearMessage),
}

/// Payload of a `route` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMessage {
    /// Encoded path; the vehicle sits on its first point.
    #[serde(default)]
    pub polyline: Option<String>,
    /// Vehicle heading in degrees.
    #[serde(default)]
    pub bearing: Option<serde_json::Value>,
    /// Viewport rectangle as `[[lat, lon], [lat, lon]]`.
    #[serde(default)]
    pub bbox: Option<serde_json::Value>,
}

/// Payload of a `clear` event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClearMessage {
    /// Status text anchored at the destination.
    #[serde(default)]
    pub popup: Option<String>,
}

impl PushedMessage {
    /// Parse a message envelope from JSON text.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

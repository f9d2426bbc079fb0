// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Update normalization: attribute snapshots and pushed messages in,
//! [`CanonicalUpdate`] out.
//!
//! Each field is parsed on its own. A malformed field is dropped (logged and
//! recorded as a [`FieldIssue`]) and the rest of the update still applies.
//! Nothing here touches the rendering surface.

use std::collections::BTreeMap;

use livemap_codec::{
    bounds_from_json, heading_from_f64, non_empty, parse_bounds, parse_heading, parse_path,
    ClearMessage, FieldError, PushedMessage, RouteMessage, ATTR_BBOX, ATTR_DESTINATION,
    ATTR_POLYLINE, ATTR_POPUP, ATTR_VEHICLE, ATTR_VEHICLE_HEADING, OBSERVED_ATTRIBUTES,
};
use livemap_surface_port::Heading;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{CanonicalUpdate, PopupState, RouteState, VehicleState};

const FIELD_BEARING: &str = "bearing";
const FIELD_BBOX: &str = "bbox";
const FIELD_POLYLINE: &str = "polyline";

/// Snapshot of the element's data attributes, keyed by attribute name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag(BTreeMap<String, String>);

impl AttributeBag {
    /// Empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set an attribute.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Remove an attribute.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Raw attribute value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Names that are neither observed nor the destination; a pass ignores them.
    pub fn unobserved(&self) -> impl Iterator<Item = &str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|name| *name != ATTR_DESTINATION && !OBSERVED_ATTRIBUTES.contains(name))
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One incoming update, from either channel.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateSource {
    /// Attribute mutation batch; carries the full current snapshot.
    Attributes(AttributeBag),
    /// Discrete message pushed by the server.
    Pushed(PushedMessage),
}

impl From<AttributeBag> for UpdateSource {
    fn from(bag: AttributeBag) -> Self {
        Self::Attributes(bag)
    }
}

impl From<PushedMessage> for UpdateSource {
    fn from(message: PushedMessage) -> Self {
        Self::Pushed(message)
    }
}

/// A field that was dropped during normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldIssue {
    /// Attribute or payload field name.
    pub field: &'static str,
    /// Why it was dropped.
    pub reason: String,
}

/// Normalizes updates from either channel into [`CanonicalUpdate`].
///
/// Keeps the last decoded route so an unchanged encoded path is not decoded
/// again.
#[derive(Debug, Default)]
pub struct SourceAdapter {
    route_cache: Option<RouteState>,
    issues: Vec<FieldIssue>,
    decodes: u64,
}

impl SourceAdapter {
    /// Adapter with an empty route cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize one update.
    pub fn normalize(&mut self, source: &UpdateSource) -> CanonicalUpdate {
        self.issues.clear();
        match source {
            UpdateSource::Attributes(bag) => self.normalize_attributes(bag),
            UpdateSource::Pushed(PushedMessage::Route(route)) => self.normalize_route(route),
            UpdateSource::Pushed(PushedMessage::Clear(clear)) => Self::normalize_clear(clear),
        }
    }

    /// Fields dropped by the most recent [`Self::normalize`] call.
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Number of polyline decodes performed so far.
    pub fn decodes(&self) -> u64 {
        self.decodes
    }

    fn normalize_attributes(&mut self, bag: &AttributeBag) -> CanonicalUpdate {
        for name in bag.unobserved() {
            debug!(attribute = name, "ignoring unobserved attribute");
        }
        let route = non_empty(bag.get(ATTR_POLYLINE)).and_then(|raw| self.route(ATTR_POLYLINE, raw));
        let heading = non_empty(bag.get(ATTR_VEHICLE_HEADING))
            .and_then(|raw| self.keep(ATTR_VEHICLE_HEADING, parse_heading(raw)));
        let label = non_empty(bag.get(ATTR_VEHICLE)).map(str::to_owned);
        let bound =
            non_empty(bag.get(ATTR_BBOX)).and_then(|raw| self.keep(ATTR_BBOX, parse_bounds(raw)));
        let popup = non_empty(bag.get(ATTR_POPUP)).map(|text| PopupState {
            text: text.to_owned(),
        });

        if route.is_none() && (heading.is_some() || label.is_some()) {
            debug!("vehicle attributes present without a route; vehicle stays hidden");
        }
        let vehicle = route.as_ref().map(|r| VehicleState {
            position: r.head(),
            heading,
            label,
        });

        CanonicalUpdate {
            vehicle,
            route,
            bound,
            popup,
        }
    }

    fn normalize_route(&mut self, message: &RouteMessage) -> CanonicalUpdate {
        let route = message
            .polyline
            .as_deref()
            .and_then(|raw| self.route(FIELD_POLYLINE, raw));
        let heading = message
            .bearing
            .as_ref()
            .and_then(|value| self.keep(FIELD_BEARING, heading_from_json(value)));
        let bound = message
            .bbox
            .clone()
            .and_then(|value| self.keep(FIELD_BBOX, bounds_from_json(value)));

        let vehicle = route.as_ref().map(|r| VehicleState {
            heading,
            ..VehicleState::at(r.head())
        });

        CanonicalUpdate {
            vehicle,
            route,
            bound,
            popup: None,
        }
    }

    fn normalize_clear(message: &ClearMessage) -> CanonicalUpdate {
        CanonicalUpdate {
            popup: non_empty(message.popup.as_deref()).map(|text| PopupState {
                text: text.to_owned(),
            }),
            ..CanonicalUpdate::default()
        }
    }

    fn route(&mut self, field: &'static str, raw: &str) -> Option<RouteState> {
        if let Some(cached) = self.route_cache.as_ref().filter(|r| r.encoded() == raw) {
            return Some(cached.clone());
        }
        self.decodes += 1;
        let points = self.keep(field, parse_path(raw))?;
        let route = RouteState::new(raw, points)?;
        self.route_cache = Some(route.clone());
        Some(route)
    }

    fn keep<T>(&mut self, field: &'static str, parsed: Result<T, FieldError>) -> Option<T> {
        match parsed {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(field, error = %err, "dropping malformed field");
                self.issues.push(FieldIssue {
                    field,
                    reason: err.to_string(),
                });
                None
            }
        }
    }
}

fn heading_from_json(value: &serde_json::Value) -> Result<Heading, FieldError> {
    match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| FieldError::NotNumeric(n.to_string()))
            .and_then(heading_from_f64),
        serde_json::Value::String(s) => parse_heading(s),
        other => Err(FieldError::NotNumeric(other.to_string())),
    }
}

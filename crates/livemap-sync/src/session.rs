// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! One map session: destination, surface, normalizer and reconciler.

use livemap_app_core::prefs::MapPrefs;
use livemap_codec::{parse_destination, FieldError, ATTR_DESTINATION};
use livemap_surface_port::{IconDef, MapSurface, MarkerDef, MarkerHandle};
use thiserror::Error;
use tracing::{info, warn};

use crate::model::{CanonicalUpdate, Destination};
use crate::reconcile::{Failure, Outcome, Reconciler, ReconcilerSettings, VisualHandles};
use crate::source::{AttributeBag, FieldIssue, SourceAdapter, UpdateSource};

/// Errors that prevent a session from starting.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The element carried no destination record.
    #[error("missing data-destination attribute")]
    MissingDestination,
    /// The destination record could not be parsed.
    #[error("invalid destination: {0}")]
    InvalidDestination(#[source] FieldError),
}

/// Result of applying one update through a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Fields dropped while normalizing.
    pub issues: Vec<FieldIssue>,
    /// What happened on the surface.
    pub outcome: Outcome,
}

/// A live map bound to one surface.
///
/// Updates are applied one at a time, each to completion. Use
/// [`crate::SessionDriver`] when several producers feed the same session.
#[derive(Debug)]
pub struct MapSession<S> {
    surface: S,
    destination: Destination,
    location_icon: IconDef,
    destination_marker: Option<MarkerHandle>,
    source: SourceAdapter,
    reconciler: Reconciler,
    passes: u64,
}

impl<S> MapSession<S>
where
    S: MapSurface,
{
    /// Start a session for `destination` and attach its pin.
    ///
    /// Nothing else is drawn until the first update arrives.
    pub fn new(destination: Destination, prefs: &MapPrefs, surface: S) -> Self {
        let reconciler = Reconciler::new(ReconcilerSettings::new(&destination, prefs));
        let mut session = Self {
            surface,
            destination,
            location_icon: prefs.location_icon_def(),
            destination_marker: None,
            source: SourceAdapter::new(),
            reconciler,
            passes: 0,
        };
        session.ensure_destination_marker();
        info!(
            lat = session.destination.position.lat,
            lon = session.destination.position.lon,
            "map session started"
        );
        session
    }

    /// Start a session from the element's initial attributes and run the
    /// first pass against them.
    pub fn from_attributes(
        attributes: &AttributeBag,
        prefs: &MapPrefs,
        surface: S,
    ) -> Result<(Self, PassReport), SessionError> {
        let raw = attributes
            .get(ATTR_DESTINATION)
            .filter(|s| !s.is_empty())
            .ok_or(SessionError::MissingDestination)?;
        let destination =
            Destination::from(parse_destination(raw).map_err(SessionError::InvalidDestination)?);
        let mut session = Self::new(destination, prefs, surface);
        let report = session.apply(&UpdateSource::Attributes(attributes.clone()));
        Ok((session, report))
    }

    /// Normalize and reconcile one update.
    pub fn apply(&mut self, source: &UpdateSource) -> PassReport {
        let update = self.source.normalize(source);
        let issues = self.source.issues().to_vec();
        PassReport {
            issues,
            outcome: self.apply_update(&update),
        }
    }

    /// Reconcile an already-normalized update.
    pub fn apply_update(&mut self, update: &CanonicalUpdate) -> Outcome {
        self.ensure_destination_marker();
        self.passes += 1;
        self.reconciler.reconcile(&mut self.surface, update)
    }

    /// Detach everything, including the destination pin, and return the surface.
    pub fn close(mut self) -> (S, Outcome) {
        let mut outcome = self.reconciler.detach_all(&mut self.surface);
        if let Some(handle) = self.destination_marker.take() {
            match self.surface.remove_marker(handle) {
                Ok(()) => outcome.applied.push("remove_destination"),
                Err(error) => {
                    warn!(%error, "failed to remove destination marker");
                    outcome.failures.push(Failure {
                        op: "remove_destination",
                        error,
                    });
                }
            }
        }
        (self.surface, outcome)
    }

    /// Attached vehicle, route and popup.
    pub fn handles(&self) -> &VisualHandles {
        self.reconciler.handles()
    }

    /// Destination pin handle, once attached.
    pub fn destination_marker(&self) -> Option<MarkerHandle> {
        self.destination_marker
    }

    /// Session destination.
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Number of reconciliation passes run.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Normalizer state (decode counters).
    pub fn source(&self) -> &SourceAdapter {
        &self.source
    }

    /// Borrow the surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutably borrow the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn ensure_destination_marker(&mut self) {
        if self.destination_marker.is_some() {
            return;
        }
        let def = MarkerDef {
            position: self.destination.position,
            icon: self.location_icon.clone(),
            heading: None,
            label: self.destination.label.clone(),
            interactive: false,
        };
        match self.surface.create_marker(&def) {
            Ok(handle) => self.destination_marker = Some(handle),
            Err(error) => warn!(%error, "destination marker not attached; will retry"),
        }
    }
}

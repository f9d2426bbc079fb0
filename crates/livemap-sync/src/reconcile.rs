// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reconciliation of a [`CanonicalUpdate`] onto a [`MapSurface`].
//!
//! Each tracked object (vehicle marker, route line, popup) is a two-state
//! machine driven by whether the update carries it and whether a handle is
//! held:
//!
//! | held | wanted | action            |
//! |------|--------|-------------------|
//! | no   | yes    | create, keep handle |
//! | yes  | yes    | update in place   |
//! | yes  | no     | remove, drop handle |
//! | no   | no     | nothing           |
//!
//! Operations run in a fixed order: vehicle, route, framing, popup, size.
//! Framing always precedes the popup because some surfaces position anchored
//! overlays against the settled view. When framing fails the popup step is
//! deferred to the next pass.
//!
//! [`Reconciler::plan`] is pure; [`Reconciler::reconcile`] executes the plan
//! and updates [`VisualHandles`] only for calls that succeeded.

use std::borrow::Cow;
use std::sync::Arc;

use livemap_app_core::prefs::MapPrefs;
use livemap_surface_port::{
    Heading, IconDef, LatLng, LineHandle, LineStyle, MapSurface, MarkerDef, MarkerHandle, Padding,
    PopupHandle, PopupOptions, SurfaceError, ViewFrame,
};
use tracing::{debug, trace, warn};

use crate::model::{CanonicalUpdate, Destination, VehicleState};

/// Surface objects currently attached, one slot per tracked object.
///
/// A slot is `Some` exactly when its object is attached to the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisualHandles {
    /// Vehicle marker.
    pub vehicle: Option<MarkerHandle>,
    /// Route line.
    pub route: Option<LineHandle>,
    /// Status popup.
    pub popup: Option<PopupHandle>,
}

impl VisualHandles {
    /// True when nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.vehicle.is_none() && self.route.is_none() && self.popup.is_none()
    }
}

/// One step of a reconciliation plan.
#[derive(Clone, Debug, PartialEq)]
pub enum PlannedOp {
    /// Attach the vehicle marker.
    CreateVehicle(MarkerDef),
    /// Move the vehicle marker in place.
    UpdateVehicle {
        /// Held marker.
        handle: MarkerHandle,
        /// New position.
        position: LatLng,
        /// New rotation.
        heading: Option<Heading>,
        /// New label.
        label: Option<String>,
    },
    /// Detach the vehicle marker.
    RemoveVehicle(MarkerHandle),
    /// Attach the route line.
    CreateRoute {
        /// Wire form, remembered once the line is attached.
        encoded: String,
        /// Line geometry.
        points: Arc<[LatLng]>,
    },
    /// Replace route geometry in place.
    UpdateRoute {
        /// Held line.
        handle: LineHandle,
        /// Wire form, remembered once the geometry is replaced.
        encoded: String,
        /// New geometry.
        points: Arc<[LatLng]>,
    },
    /// Detach the route line.
    RemoveRoute(LineHandle),
    /// Frame the viewport.
    Frame(ViewFrame),
    /// Open the status popup.
    ShowPopup(String),
    /// Replace popup text in place.
    UpdatePopup {
        /// Held popup.
        handle: PopupHandle,
        /// New text.
        text: String,
    },
    /// Close the status popup.
    HidePopup(PopupHandle),
    /// Re-measure the container.
    InvalidateSize,
}

impl PlannedOp {
    /// Short name for logs and outcome reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateVehicle(_) => "create_vehicle",
            Self::UpdateVehicle { .. } => "update_vehicle",
            Self::RemoveVehicle(_) => "remove_vehicle",
            Self::CreateRoute { .. } => "create_route",
            Self::UpdateRoute { .. } => "update_route",
            Self::RemoveRoute(_) => "remove_route",
            Self::Frame(ViewFrame::Bound { .. }) => "frame_to_bound",
            Self::Frame(ViewFrame::Center { .. }) => "frame_to_center",
            Self::ShowPopup(_) => "show_popup",
            Self::UpdatePopup { .. } => "update_popup",
            Self::HidePopup(_) => "hide_popup",
            Self::InvalidateSize => "invalidate_size",
        }
    }

    /// True for popup show, update or hide.
    pub fn is_popup(&self) -> bool {
        matches!(
            self,
            Self::ShowPopup(_) | Self::UpdatePopup { .. } | Self::HidePopup(_)
        )
    }
}

/// Ordered operations for one pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Plan {
    /// Operations in execution order.
    pub ops: Vec<PlannedOp>,
    /// Updates left out because the surface already shows the same data.
    pub skipped: u32,
}

/// A surface call that failed during a pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    /// Planned operation name.
    pub op: &'static str,
    /// What the surface reported.
    pub error: SurfaceError,
}

/// Result of one reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Operations that succeeded, in order.
    pub applied: Vec<&'static str>,
    /// Updates left out because nothing changed.
    pub skipped: u32,
    /// Operations the surface rejected; retried on the next pass.
    pub failures: Vec<Failure>,
    /// Operations not attempted this pass; retried on the next pass.
    pub deferred: Vec<&'static str>,
}

impl Outcome {
    /// True when every planned operation succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fixed inputs of the reconciler, resolved once per session.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconcilerSettings {
    /// Destination position: popup anchor and fallback view center.
    pub anchor: LatLng,
    /// Zoom for the fallback view.
    pub default_zoom: u8,
    /// Padding for bound fitting.
    pub padding: Padding,
    /// Vehicle marker icon.
    pub vehicle_icon: IconDef,
    /// Route line style.
    pub line_style: LineStyle,
    /// Popup presentation.
    pub popup_options: PopupOptions,
}

impl ReconcilerSettings {
    /// Resolve settings for a destination from saved preferences.
    pub fn new(destination: &Destination, prefs: &MapPrefs) -> Self {
        Self {
            anchor: destination.position,
            default_zoom: prefs.tiles.clamp_zoom(prefs.default_zoom),
            padding: prefs.padding(),
            vehicle_icon: prefs.vehicle_icon_def(),
            line_style: prefs.line_style(),
            popup_options: prefs.popup_options(),
        }
    }
}

/// Owns the [`VisualHandles`] of one map session and drives them toward
/// each incoming update.
#[derive(Debug)]
pub struct Reconciler {
    settings: ReconcilerSettings,
    handles: VisualHandles,
    applied_route: Option<String>,
    applied_popup: Option<String>,
}

impl Reconciler {
    /// Reconciler with nothing attached.
    pub fn new(settings: ReconcilerSettings) -> Self {
        Self {
            settings,
            handles: VisualHandles::default(),
            applied_route: None,
            applied_popup: None,
        }
    }

    /// Currently attached objects.
    pub fn handles(&self) -> &VisualHandles {
        &self.handles
    }

    /// Resolved settings.
    pub fn settings(&self) -> &ReconcilerSettings {
        &self.settings
    }

    /// Compute the operations that would bring the surface to `update`.
    pub fn plan(&self, update: &CanonicalUpdate) -> Plan {
        let mut plan = Plan::default();

        match (self.handles.vehicle, effective_vehicle(update)) {
            (None, Some(vehicle)) => plan.ops.push(PlannedOp::CreateVehicle(self.vehicle_marker(
                vehicle.position,
                vehicle.heading,
                vehicle.label.as_deref(),
            ))),
            (Some(handle), Some(vehicle)) => plan.ops.push(PlannedOp::UpdateVehicle {
                handle,
                position: vehicle.position,
                heading: vehicle.heading,
                label: vehicle.label.clone(),
            }),
            (Some(handle), None) => plan.ops.push(PlannedOp::RemoveVehicle(handle)),
            (None, None) => {}
        }

        match (self.handles.route, update.route.as_ref()) {
            (None, Some(route)) => plan.ops.push(PlannedOp::CreateRoute {
                encoded: route.encoded().to_owned(),
                points: route.shared_points(),
            }),
            (Some(_), Some(route)) if self.applied_route.as_deref() == Some(route.encoded()) => {
                plan.skipped += 1;
            }
            (Some(handle), Some(route)) => plan.ops.push(PlannedOp::UpdateRoute {
                handle,
                encoded: route.encoded().to_owned(),
                points: route.shared_points(),
            }),
            (Some(handle), None) => plan.ops.push(PlannedOp::RemoveRoute(handle)),
            (None, None) => {}
        }

        plan.ops.push(PlannedOp::Frame(ViewFrame::choose(
            update.bound,
            self.settings.padding,
            self.settings.anchor,
            self.settings.default_zoom,
        )));

        match (self.handles.popup, update.popup.as_ref()) {
            (None, Some(popup)) => plan.ops.push(PlannedOp::ShowPopup(popup.text.clone())),
            (Some(_), Some(popup)) if self.applied_popup.as_deref() == Some(popup.text.as_str()) => {
                plan.skipped += 1;
            }
            (Some(handle), Some(popup)) => plan.ops.push(PlannedOp::UpdatePopup {
                handle,
                text: popup.text.clone(),
            }),
            (Some(handle), None) => plan.ops.push(PlannedOp::HidePopup(handle)),
            (None, None) => {}
        }

        plan.ops.push(PlannedOp::InvalidateSize);
        plan
    }

    /// Plan and execute one pass against `surface`.
    ///
    /// Failed calls leave the bookkeeping as it was and do not stop the
    /// remaining operations.
    pub fn reconcile<S>(&mut self, surface: &mut S, update: &CanonicalUpdate) -> Outcome
    where
        S: MapSurface + ?Sized,
    {
        let plan = self.plan(update);
        trace!(ops = plan.ops.len(), skipped = plan.skipped, "reconciling");
        self.execute(surface, plan)
    }

    /// Detach everything this reconciler holds.
    pub fn detach_all<S>(&mut self, surface: &mut S) -> Outcome
    where
        S: MapSurface + ?Sized,
    {
        let mut plan = Plan::default();
        if let Some(handle) = self.handles.vehicle {
            plan.ops.push(PlannedOp::RemoveVehicle(handle));
        }
        if let Some(handle) = self.handles.route {
            plan.ops.push(PlannedOp::RemoveRoute(handle));
        }
        if let Some(handle) = self.handles.popup {
            plan.ops.push(PlannedOp::HidePopup(handle));
        }
        self.execute(surface, plan)
    }

    fn execute<S>(&mut self, surface: &mut S, plan: Plan) -> Outcome
    where
        S: MapSurface + ?Sized,
    {
        let mut outcome = Outcome {
            skipped: plan.skipped,
            ..Outcome::default()
        };
        let mut framed = true;
        for op in plan.ops {
            let name = op.name();
            if !framed && op.is_popup() {
                debug!(op = name, "view not framed; popup deferred");
                outcome.deferred.push(name);
                continue;
            }
            let is_frame = matches!(op, PlannedOp::Frame(_));
            match self.apply(surface, op) {
                Ok(()) => {
                    debug!(op = name, "surface op applied");
                    outcome.applied.push(name);
                }
                Err(error) => {
                    framed &= !is_frame;
                    warn!(op = name, %error, "surface op failed; handles unchanged");
                    outcome.failures.push(Failure { op: name, error });
                }
            }
        }
        outcome
    }

    fn apply<S>(&mut self, surface: &mut S, op: PlannedOp) -> Result<(), SurfaceError>
    where
        S: MapSurface + ?Sized,
    {
        match op {
            PlannedOp::CreateVehicle(def) => {
                self.handles.vehicle = Some(surface.create_marker(&def)?);
            }
            PlannedOp::UpdateVehicle {
                handle,
                position,
                heading,
                label,
            } => match surface.update_marker(handle, position, heading, label.as_deref()) {
                Err(SurfaceError::UnknownHandle(_)) => {
                    debug!(handle = handle.0, "vehicle marker vanished; recreating");
                    self.handles.vehicle = None;
                    let def = self.vehicle_marker(position, heading, label.as_deref());
                    self.handles.vehicle = Some(surface.create_marker(&def)?);
                }
                other => other?,
            },
            PlannedOp::RemoveVehicle(handle) => {
                tolerate_unknown(surface.remove_marker(handle))?;
                self.handles.vehicle = None;
            }
            PlannedOp::CreateRoute { encoded, points } => {
                self.handles.route = Some(surface.create_line(&points, &self.settings.line_style)?);
                self.applied_route = Some(encoded);
            }
            PlannedOp::UpdateRoute {
                handle,
                encoded,
                points,
            } => {
                match surface.update_line(handle, &points) {
                    Err(SurfaceError::UnknownHandle(_)) => {
                        debug!(handle = handle.0, "route line vanished; recreating");
                        self.handles.route = None;
                        self.applied_route = None;
                        self.handles.route =
                            Some(surface.create_line(&points, &self.settings.line_style)?);
                    }
                    other => other?,
                }
                self.applied_route = Some(encoded);
            }
            PlannedOp::RemoveRoute(handle) => {
                tolerate_unknown(surface.remove_line(handle))?;
                self.handles.route = None;
                self.applied_route = None;
            }
            PlannedOp::Frame(frame) => surface.frame(&frame)?,
            PlannedOp::ShowPopup(text) => {
                self.handles.popup = Some(surface.show_popup(
                    self.settings.anchor,
                    &text,
                    &self.settings.popup_options,
                )?);
                self.applied_popup = Some(text);
            }
            PlannedOp::UpdatePopup { handle, text } => {
                match surface.update_popup(handle, &text) {
                    Err(SurfaceError::UnknownHandle(_)) => {
                        debug!(handle = handle.0, "popup vanished; reopening");
                        self.handles.popup = None;
                        self.applied_popup = None;
                        self.handles.popup = Some(surface.show_popup(
                            self.settings.anchor,
                            &text,
                            &self.settings.popup_options,
                        )?);
                    }
                    other => other?,
                }
                self.applied_popup = Some(text);
            }
            PlannedOp::HidePopup(handle) => {
                tolerate_unknown(surface.hide_popup(handle))?;
                self.handles.popup = None;
                self.applied_popup = None;
            }
            PlannedOp::InvalidateSize => surface.invalidate_size()?,
        }
        Ok(())
    }

    fn vehicle_marker(
        &self,
        position: LatLng,
        heading: Option<Heading>,
        label: Option<&str>,
    ) -> MarkerDef {
        MarkerDef {
            position,
            icon: self.settings.vehicle_icon.clone(),
            heading,
            label: label.map(str::to_owned),
            interactive: false,
        }
    }
}

/// Route presence decides vehicle presence. Without a route the vehicle is
/// hidden; with a route but no vehicle fields it sits on the route head.
fn effective_vehicle(update: &CanonicalUpdate) -> Option<Cow<'_, VehicleState>> {
    match (&update.route, &update.vehicle) {
        (Some(_), Some(vehicle)) => Some(Cow::Borrowed(vehicle)),
        (Some(route), None) => Some(Cow::Owned(VehicleState::at(route.head()))),
        (None, Some(_)) => {
            debug!("vehicle without route; treating vehicle as absent");
            None
        }
        (None, None) => None,
    }
}

/// A detach of an object the surface no longer knows is already done.
fn tolerate_unknown(result: Result<(), SurfaceError>) -> Result<(), SurfaceError> {
    match result {
        Err(SurfaceError::UnknownHandle(id)) => {
            debug!(handle = id, "object already detached");
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RouteState;
    use livemap_codec::{RecordingSurface, SurfaceOp};
    use livemap_surface_port::Bounds;

    fn destination() -> Destination {
        Destination::new(LatLng::new(42.35, -71.07))
    }

    fn reconciler() -> Reconciler {
        Reconciler::new(ReconcilerSettings::new(&destination(), &MapPrefs::default()))
    }

    fn route(encoded: &str, points: &[(f64, f64)]) -> RouteState {
        let points: Vec<LatLng> = points.iter().map(|&(a, b)| LatLng::new(a, b)).collect();
        RouteState::new(encoded, points).expect("route")
    }

    fn moving(heading: f64) -> CanonicalUpdate {
        CanonicalUpdate::with_route(
            route("A", &[(42.31, -71.09), (42.33, -71.08)]),
            Heading::from_degrees(heading),
        )
        .bounded(Bounds::from_corners(
            LatLng::new(42.3, -71.1),
            LatLng::new(42.4, -71.0),
        ))
    }

    #[test]
    fn test_plan_for_empty_update_only_frames() {
        let plan = reconciler().plan(&CanonicalUpdate::default());
        let names: Vec<_> = plan.ops.iter().map(PlannedOp::name).collect();
        assert_eq!(names, vec!["frame_to_center", "invalidate_size"]);
    }

    #[test]
    fn test_plan_orders_frame_before_popup() {
        let plan = reconciler().plan(&moving(90.0).with_popup("Boarding"));
        let names: Vec<_> = plan.ops.iter().map(PlannedOp::name).collect();
        assert_eq!(
            names,
            vec![
                "create_vehicle",
                "create_route",
                "frame_to_bound",
                "show_popup",
                "invalidate_size"
            ]
        );
    }

    #[test]
    fn test_route_without_vehicle_fields_puts_vehicle_on_head() {
        let mut update = moving(0.0);
        update.vehicle = None;
        let plan = reconciler().plan(&update);
        let PlannedOp::CreateVehicle(def) = &plan.ops[0] else {
            panic!("expected vehicle creation first");
        };
        assert_eq!(def.position, LatLng::new(42.31, -71.09));
        assert_eq!(def.heading, None);
    }

    #[test]
    fn test_vehicle_without_route_is_hidden() {
        let update = CanonicalUpdate {
            vehicle: Some(VehicleState::at(LatLng::new(42.0, -71.0))),
            ..CanonicalUpdate::default()
        };
        let plan = reconciler().plan(&update);
        assert!(!plan
            .ops
            .iter()
            .any(|op| matches!(op, PlannedOp::CreateVehicle(_))));
    }

    #[test]
    fn test_repeated_route_skips_geometry_but_moves_vehicle() {
        let mut r = reconciler();
        let mut surface = RecordingSurface::new();
        assert!(r.reconcile(&mut surface, &moving(90.0)).is_clean());
        surface.take_ops();

        let outcome = r.reconcile(&mut surface, &moving(120.0));
        assert!(outcome.is_clean());
        assert_eq!(outcome.skipped, 1);
        assert_eq!(
            surface.op_names(),
            vec!["update_marker", "frame_to_bound", "invalidate_size"]
        );
    }

    #[test]
    fn test_failed_create_leaves_slot_empty_and_retries() {
        let mut r = reconciler();
        let mut surface = RecordingSurface::new();
        surface.fail_next(1);
        let outcome = r.reconcile(&mut surface, &moving(90.0));
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].op, "create_vehicle");
        assert!(r.handles().vehicle.is_none());
        assert!(r.handles().route.is_some());

        let outcome = r.reconcile(&mut surface, &moving(90.0));
        assert!(outcome.is_clean());
        assert!(r.handles().vehicle.is_some());
        assert_eq!(surface.marker_count(), 1);
    }

    #[test]
    fn test_failed_line_update_is_retried() {
        let mut r = reconciler();
        let mut surface = RecordingSurface::new();
        r.reconcile(&mut surface, &moving(90.0));

        let next = CanonicalUpdate::with_route(route("B", &[(42.32, -71.08)]), None);
        // Marker update succeeds, line update fails.
        surface.take_ops();
        let mut failing = FailOn {
            inner: &mut surface,
            op: "update_line",
        };
        let outcome = r.reconcile(&mut failing, &next);
        assert_eq!(outcome.failures[0].op, "update_route");

        let outcome = r.reconcile(&mut surface, &next);
        assert!(outcome.is_clean());
        assert!(surface.op_names().contains(&"update_line"));
    }

    #[test]
    fn test_popup_waits_for_a_framed_view() {
        let mut r = reconciler();
        let mut surface = RecordingSurface::new();
        let update = CanonicalUpdate::default().with_popup("Arriving");

        // Framing is the first call of this pass.
        surface.fail_next(1);
        let outcome = r.reconcile(&mut surface, &update);
        assert_eq!(outcome.failures[0].op, "frame_to_center");
        assert_eq!(outcome.deferred, vec!["show_popup"]);
        assert!(!surface.ops.iter().any(SurfaceOp::is_popup));
        assert!(r.handles().popup.is_none());

        let outcome = r.reconcile(&mut surface, &update);
        assert!(outcome.is_clean());
        assert!(outcome.deferred.is_empty());
        assert_eq!(
            surface.op_names(),
            vec!["invalidate_size", "frame_to_center", "show_popup", "invalidate_size"]
        );
    }

    #[test]
    fn test_popup_text_change_is_deferred_when_framing_fails() {
        let mut r = reconciler();
        let mut surface = RecordingSurface::new();
        r.reconcile(&mut surface, &CanonicalUpdate::default().with_popup("2 stops away"));
        let next = CanonicalUpdate::default().with_popup("1 stop away");

        let mut failing = FailOn {
            inner: &mut surface,
            op: "frame_to_center",
        };
        let outcome = r.reconcile(&mut failing, &next);
        assert_eq!(outcome.deferred, vec!["update_popup"]);
        let handle = r.handles().popup.expect("popup kept");
        assert_eq!(surface.get_popup(handle).expect("open").text, "2 stops away");

        let outcome = r.reconcile(&mut surface, &next);
        assert!(outcome.is_clean());
        assert_eq!(surface.get_popup(handle).expect("open").text, "1 stop away");
    }

    #[test]
    fn test_failed_remove_keeps_handle() {
        let mut r = reconciler();
        let mut surface = RecordingSurface::new();
        r.reconcile(&mut surface, &moving(90.0));
        surface.set_ready(false);
        let outcome = r.reconcile(&mut surface, &CanonicalUpdate::default());
        assert!(!outcome.is_clean());
        assert!(r.handles().vehicle.is_some());
        assert!(r.handles().route.is_some());

        surface.set_ready(true);
        assert!(r.reconcile(&mut surface, &CanonicalUpdate::default()).is_clean());
        assert!(r.handles().is_empty());
        assert_eq!(surface.marker_count(), 0);
        assert_eq!(surface.line_count(), 0);
    }

    #[test]
    fn test_vanished_marker_is_recreated() {
        let mut r = reconciler();
        let mut surface = RecordingSurface::new();
        r.reconcile(&mut surface, &moving(90.0));
        surface.markers.clear();

        let outcome = r.reconcile(&mut surface, &moving(90.0));
        assert!(outcome.is_clean());
        assert_eq!(surface.marker_count(), 1);
        assert_eq!(r.handles().vehicle.map(|h| surface.get_marker(h).is_some()), Some(true));
    }

    #[test]
    fn test_popup_text_change_updates_in_place() {
        let mut r = reconciler();
        let mut surface = RecordingSurface::new();
        r.reconcile(&mut surface, &CanonicalUpdate::default().with_popup("2 stops away"));
        let handle = r.handles().popup.expect("popup");
        surface.take_ops();

        r.reconcile(&mut surface, &CanonicalUpdate::default().with_popup("1 stop away"));
        assert_eq!(r.handles().popup, Some(handle));
        assert!(surface.ops.iter().any(|op| matches!(
            op,
            SurfaceOp::UpdatePopup { text, .. } if text == "1 stop away"
        )));
        assert!(!surface.ops.iter().any(SurfaceOp::is_create));
    }

    #[test]
    fn test_detach_all_clears_everything() {
        let mut r = reconciler();
        let mut surface = RecordingSurface::new();
        r.reconcile(&mut surface, &moving(90.0).with_popup("hi"));
        assert!(r.detach_all(&mut surface).is_clean());
        assert!(r.handles().is_empty());
        assert_eq!(surface.marker_count() + surface.line_count() + surface.popup_count(), 0);
    }

    /// Forwards to a recording surface but fails one named call.
    struct FailOn<'a> {
        inner: &'a mut RecordingSurface,
        op: &'static str,
    }

    impl FailOn<'_> {
        fn check(&self, name: &str) -> Result<(), SurfaceError> {
            if self.op == name {
                Err(SurfaceError::Backend(name.into()))
            } else {
                Ok(())
            }
        }
    }

    impl MapSurface for FailOn<'_> {
        fn create_marker(&mut self, def: &MarkerDef) -> Result<MarkerHandle, SurfaceError> {
            self.check("create_marker")?;
            self.inner.create_marker(def)
        }
        fn update_marker(
            &mut self,
            handle: MarkerHandle,
            position: LatLng,
            heading: Option<Heading>,
            label: Option<&str>,
        ) -> Result<(), SurfaceError> {
            self.check("update_marker")?;
            self.inner.update_marker(handle, position, heading, label)
        }
        fn remove_marker(&mut self, handle: MarkerHandle) -> Result<(), SurfaceError> {
            self.check("remove_marker")?;
            self.inner.remove_marker(handle)
        }
        fn create_line(
            &mut self,
            points: &[LatLng],
            style: &LineStyle,
        ) -> Result<LineHandle, SurfaceError> {
            self.check("create_line")?;
            self.inner.create_line(points, style)
        }
        fn update_line(&mut self, handle: LineHandle, points: &[LatLng]) -> Result<(), SurfaceError> {
            self.check("update_line")?;
            self.inner.update_line(handle, points)
        }
        fn remove_line(&mut self, handle: LineHandle) -> Result<(), SurfaceError> {
            self.check("remove_line")?;
            self.inner.remove_line(handle)
        }
        fn frame_to_bound(
            &mut self,
            bounds: &livemap_surface_port::Bounds,
            padding: Padding,
        ) -> Result<(), SurfaceError> {
            self.check("frame_to_bound")?;
            self.inner.frame_to_bound(bounds, padding)
        }
        fn frame_to_center(&mut self, center: LatLng, zoom: u8) -> Result<(), SurfaceError> {
            self.check("frame_to_center")?;
            self.inner.frame_to_center(center, zoom)
        }
        fn show_popup(
            &mut self,
            anchor: LatLng,
            text: &str,
            options: &PopupOptions,
        ) -> Result<PopupHandle, SurfaceError> {
            self.check("show_popup")?;
            self.inner.show_popup(anchor, text, options)
        }
        fn update_popup(&mut self, handle: PopupHandle, text: &str) -> Result<(), SurfaceError> {
            self.check("update_popup")?;
            self.inner.update_popup(handle, text)
        }
        fn hide_popup(&mut self, handle: PopupHandle) -> Result<(), SurfaceError> {
            self.check("hide_popup")?;
            self.inner.hide_popup(handle)
        }
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording surface for headless testing of MapSurface callers.
//!
//! RecordingSurface tracks attached objects in HashMaps without drawing
//! anything, and logs every successful call in order. Use it to verify
//! reconciliation sequences and failure handling.

use std::collections::HashMap;

use livemap_surface_port::{
    Bounds, Heading, LatLng, LineHandle, LineStyle, MapSurface, MarkerDef, MarkerHandle, Padding,
    PopupHandle, PopupOptions, SurfaceError, ViewFrame,
};

/// One successful call against a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// A marker was attached.
    CreateMarker {
        /// Allocated handle.
        handle: MarkerHandle,
        /// Marker definition.
        def: MarkerDef,
    },
    /// A marker was moved in place.
    UpdateMarker {
        /// Target marker.
        handle: MarkerHandle,
        /// New position.
        position: LatLng,
        /// New rotation.
        heading: Option<Heading>,
        /// New label.
        label: Option<String>,
    },
    /// A marker was detached.
    RemoveMarker {
        /// Detached marker.
        handle: MarkerHandle,
    },
    /// A polyline was attached.
    CreateLine {
        /// Allocated handle.
        handle: LineHandle,
        /// Line geometry.
        points: Vec<LatLng>,
    },
    /// A polyline's geometry was replaced.
    UpdateLine {
        /// Target line.
        handle: LineHandle,
        /// New geometry.
        points: Vec<LatLng>,
    },
    /// A polyline was detached.
    RemoveLine {
        /// Detached line.
        handle: LineHandle,
    },
    /// The view was fit to a rectangle.
    FrameToBound {
        /// Fitted rectangle.
        bounds: Bounds,
        /// Padding in pixels.
        padding: Padding,
    },
    /// The view was centered.
    FrameToCenter {
        /// View center.
        center: LatLng,
        /// Zoom level.
        zoom: u8,
    },
    /// A popup was opened.
    ShowPopup {
        /// Allocated handle.
        handle: PopupHandle,
        /// Anchor position.
        anchor: LatLng,
        /// Popup text.
        text: String,
    },
    /// Popup text was replaced.
    UpdatePopup {
        /// Target popup.
        handle: PopupHandle,
        /// New text.
        text: String,
    },
    /// A popup was closed.
    HidePopup {
        /// Closed popup.
        handle: PopupHandle,
    },
    /// The container was re-measured.
    InvalidateSize,
}

impl SurfaceOp {
    /// Short operation name, stable for logs and snapshots.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateMarker { .. } => "create_marker",
            Self::UpdateMarker { .. } => "update_marker",
            Self::RemoveMarker { .. } => "remove_marker",
            Self::CreateLine { .. } => "create_line",
            Self::UpdateLine { .. } => "update_line",
            Self::RemoveLine { .. } => "remove_line",
            Self::FrameToBound { .. } => "frame_to_bound",
            Self::FrameToCenter { .. } => "frame_to_center",
            Self::ShowPopup { .. } => "show_popup",
            Self::UpdatePopup { .. } => "update_popup",
            Self::HidePopup { .. } => "hide_popup",
            Self::InvalidateSize => "invalidate_size",
        }
    }

    /// True for calls that attach a new object.
    pub fn is_create(&self) -> bool {
        matches!(
            self,
            Self::CreateMarker { .. } | Self::CreateLine { .. } | Self::ShowPopup { .. }
        )
    }

    /// True for calls that detach an object.
    pub fn is_remove(&self) -> bool {
        matches!(
            self,
            Self::RemoveMarker { .. } | Self::RemoveLine { .. } | Self::HidePopup { .. }
        )
    }

    /// True for viewport framing calls.
    pub fn is_frame(&self) -> bool {
        matches!(self, Self::FrameToBound { .. } | Self::FrameToCenter { .. })
    }

    /// True for any popup call.
    pub fn is_popup(&self) -> bool {
        matches!(
            self,
            Self::ShowPopup { .. } | Self::UpdatePopup { .. } | Self::HidePopup { .. }
        )
    }
}

/// An open popup as tracked by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub struct OpenPopup {
    /// Anchor position.
    pub anchor: LatLng,
    /// Current text.
    pub text: String,
    /// Options it was opened with.
    pub options: PopupOptions,
}

/// Recording map surface for testing.
///
/// Implements `MapSurface` by tracking state in HashMaps.
/// Useful for verifying call sequences without a real map.
#[derive(Debug)]
pub struct RecordingSurface {
    /// Attached markers.
    pub markers: HashMap<MarkerHandle, MarkerDef>,
    /// Attached polylines and their geometry.
    pub lines: HashMap<LineHandle, Vec<LatLng>>,
    /// Open popups.
    pub popups: HashMap<PopupHandle, OpenPopup>,
    /// Most recent framing applied.
    pub view: Option<ViewFrame>,
    /// Successful calls, in order.
    pub ops: Vec<SurfaceOp>,
    /// Number of calls rejected (not ready or injected failure).
    pub rejected: u32,
    ready: bool,
    fail_budget: u32,
    next_id: u64,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            markers: HashMap::new(),
            lines: HashMap::new(),
            popups: HashMap::new(),
            view: None,
            ops: Vec::new(),
            rejected: 0,
            ready: true,
            fail_budget: 0,
            next_id: 1,
        }
    }
}

impl RecordingSurface {
    /// Create a ready surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface that rejects every call until [`Self::set_ready`].
    pub fn not_ready() -> Self {
        Self {
            ready: false,
            ..Self::default()
        }
    }

    /// Toggle readiness.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Make the next `count` calls fail with a backend error.
    pub fn fail_next(&mut self, count: u32) {
        self.fail_budget = count;
    }

    /// Drain the recorded calls.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Names of the recorded calls, in order.
    pub fn op_names(&self) -> Vec<&'static str> {
        self.ops.iter().map(SurfaceOp::name).collect()
    }

    /// Number of attached markers.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Number of attached polylines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of open popups.
    pub fn popup_count(&self) -> usize {
        self.popups.len()
    }

    /// Get marker by handle.
    pub fn get_marker(&self, handle: MarkerHandle) -> Option<&MarkerDef> {
        self.markers.get(&handle)
    }

    /// Get line geometry by handle.
    pub fn get_line(&self, handle: LineHandle) -> Option<&[LatLng]> {
        self.lines.get(&handle).map(Vec::as_slice)
    }

    /// Get popup by handle.
    pub fn get_popup(&self, handle: PopupHandle) -> Option<&OpenPopup> {
        self.popups.get(&handle)
    }

    fn gate(&mut self) -> Result<(), SurfaceError> {
        if !self.ready {
            self.rejected += 1;
            return Err(SurfaceError::NotReady);
        }
        if self.fail_budget > 0 {
            self.fail_budget -= 1;
            self.rejected += 1;
            return Err(SurfaceError::Backend("injected failure".into()));
        }
        Ok(())
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl MapSurface for RecordingSurface {
    fn create_marker(&mut self, def: &MarkerDef) -> Result<MarkerHandle, SurfaceError> {
        self.gate()?;
        if !def.position.is_valid() {
            return Err(SurfaceError::InvalidGeometry("marker position".into()));
        }
        let handle = MarkerHandle(self.allocate());
        self.markers.insert(handle, def.clone());
        self.ops.push(SurfaceOp::CreateMarker {
            handle,
            def: def.clone(),
        });
        Ok(handle)
    }

    fn update_marker(
        &mut self,
        handle: MarkerHandle,
        position: LatLng,
        heading: Option<Heading>,
        label: Option<&str>,
    ) -> Result<(), SurfaceError> {
        self.gate()?;
        let marker = self
            .markers
            .get_mut(&handle)
            .ok_or(SurfaceError::UnknownHandle(handle.0))?;
        marker.position = position;
        marker.heading = heading;
        marker.label = label.map(str::to_owned);
        self.ops.push(SurfaceOp::UpdateMarker {
            handle,
            position,
            heading,
            label: label.map(str::to_owned),
        });
        Ok(())
    }

    fn remove_marker(&mut self, handle: MarkerHandle) -> Result<(), SurfaceError> {
        self.gate()?;
        self.markers
            .remove(&handle)
            .ok_or(SurfaceError::UnknownHandle(handle.0))?;
        self.ops.push(SurfaceOp::RemoveMarker { handle });
        Ok(())
    }

    fn create_line(
        &mut self,
        points: &[LatLng],
        _style: &LineStyle,
    ) -> Result<LineHandle, SurfaceError> {
        self.gate()?;
        if points.is_empty() {
            return Err(SurfaceError::InvalidGeometry("empty line".into()));
        }
        let handle = LineHandle(self.allocate());
        self.lines.insert(handle, points.to_vec());
        self.ops.push(SurfaceOp::CreateLine {
            handle,
            points: points.to_vec(),
        });
        Ok(handle)
    }

    fn update_line(&mut self, handle: LineHandle, points: &[LatLng]) -> Result<(), SurfaceError> {
        self.gate()?;
        if points.is_empty() {
            return Err(SurfaceError::InvalidGeometry("empty line".into()));
        }
        let line = self
            .lines
            .get_mut(&handle)
            .ok_or(SurfaceError::UnknownHandle(handle.0))?;
        *line = points.to_vec();
        self.ops.push(SurfaceOp::UpdateLine {
            handle,
            points: points.to_vec(),
        });
        Ok(())
    }

    fn remove_line(&mut self, handle: LineHandle) -> Result<(), SurfaceError> {
        self.gate()?;
        self.lines
            .remove(&handle)
            .ok_or(SurfaceError::UnknownHandle(handle.0))?;
        self.ops.push(SurfaceOp::RemoveLine { handle });
        Ok(())
    }

    fn frame_to_bound(&mut self, bounds: &Bounds, padding: Padding) -> Result<(), SurfaceError> {
        self.gate()?;
        self.view = Some(ViewFrame::Bound {
            bounds: *bounds,
            padding,
        });
        self.ops.push(SurfaceOp::FrameToBound {
            bounds: *bounds,
            padding,
        });
        Ok(())
    }

    fn frame_to_center(&mut self, center: LatLng, zoom: u8) -> Result<(), SurfaceError> {
        self.gate()?;
        self.view = Some(ViewFrame::Center { center, zoom });
        self.ops.push(SurfaceOp::FrameToCenter { center, zoom });
        Ok(())
    }

    fn show_popup(
        &mut self,
        anchor: LatLng,
        text: &str,
        options: &PopupOptions,
    ) -> Result<PopupHandle, SurfaceError> {
        self.gate()?;
        let handle = PopupHandle(self.allocate());
        self.popups.insert(
            handle,
            OpenPopup {
                anchor,
                text: text.to_owned(),
                options: options.clone(),
            },
        );
        self.ops.push(SurfaceOp::ShowPopup {
            handle,
            anchor,
            text: text.to_owned(),
        });
        Ok(handle)
    }

    fn update_popup(&mut self, handle: PopupHandle, text: &str) -> Result<(), SurfaceError> {
        self.gate()?;
        let popup = self
            .popups
            .get_mut(&handle)
            .ok_or(SurfaceError::UnknownHandle(handle.0))?;
        popup.text = text.to_owned();
        self.ops.push(SurfaceOp::UpdatePopup {
            handle,
            text: text.to_owned(),
        });
        Ok(())
    }

    fn hide_popup(&mut self, handle: PopupHandle) -> Result<(), SurfaceError> {
        self.gate()?;
        self.popups
            .remove(&handle)
            .ok_or(SurfaceError::UnknownHandle(handle.0))?;
        self.ops.push(SurfaceOp::HidePopup { handle });
        Ok(())
    }

    fn invalidate_size(&mut self) -> Result<(), SurfaceError> {
        self.gate()?;
        self.ops.push(SurfaceOp::InvalidateSize);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livemap_surface_port::{IconDef, IconKind};

    fn make_marker(lat: f64, lon: f64) -> MarkerDef {
        MarkerDef {
            position: LatLng::new(lat, lon),
            icon: IconDef {
                kind: IconKind::Vehicle,
                url: None,
                size: [40, 40],
                anchor: [20, 20],
            },
            heading: Heading::from_degrees(90.0),
            label: Some("Bus 39".into()),
            interactive: false,
        }
    }

    #[test]
    fn test_create_and_update_marker() {
        let mut surface = RecordingSurface::new();
        let handle = surface
            .create_marker(&make_marker(42.35, -71.07))
            .expect("create failed");
        surface
            .update_marker(handle, LatLng::new(42.36, -71.06), None, None)
            .expect("update failed");

        let marker = surface.get_marker(handle).unwrap();
        assert_eq!(marker.position, LatLng::new(42.36, -71.06));
        assert_eq!(marker.heading, None);
        assert_eq!(marker.label, None);
        assert_eq!(surface.op_names(), vec!["create_marker", "update_marker"]);
    }

    #[test]
    fn test_handles_are_unique() {
        let mut surface = RecordingSurface::new();
        let a = surface.create_marker(&make_marker(0.0, 0.0)).unwrap();
        let b = surface.create_marker(&make_marker(1.0, 1.0)).unwrap();
        assert_ne!(a, b);
        assert_eq!(surface.marker_count(), 2);
    }

    #[test]
    fn test_unknown_handle_rejected() {
        let mut surface = RecordingSurface::new();
        assert_eq!(
            surface.remove_line(LineHandle(99)),
            Err(SurfaceError::UnknownHandle(99))
        );
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn test_empty_line_rejected() {
        let mut surface = RecordingSurface::new();
        assert!(matches!(
            surface.create_line(&[], &LineStyle::default()),
            Err(SurfaceError::InvalidGeometry(_))
        ));
        assert_eq!(surface.line_count(), 0);
    }

    #[test]
    fn test_not_ready_rejects_everything() {
        let mut surface = RecordingSurface::not_ready();
        assert_eq!(
            surface.create_marker(&make_marker(0.0, 0.0)),
            Err(SurfaceError::NotReady)
        );
        assert_eq!(
            surface.frame_to_center(LatLng::new(0.0, 0.0), 17),
            Err(SurfaceError::NotReady)
        );
        assert_eq!(surface.rejected, 2);
        assert_eq!(surface.marker_count(), 0);
        assert!(surface.view.is_none());

        surface.set_ready(true);
        assert!(surface.create_marker(&make_marker(0.0, 0.0)).is_ok());
    }

    #[test]
    fn test_fail_next_is_consumed() {
        let mut surface = RecordingSurface::new();
        surface.fail_next(1);
        assert!(surface.invalidate_size().is_err());
        assert!(surface.invalidate_size().is_ok());
        assert_eq!(surface.op_names(), vec!["invalidate_size"]);
    }

    #[test]
    fn test_popup_lifecycle() {
        let mut surface = RecordingSurface::new();
        let anchor = LatLng::new(42.35, -71.07);
        let handle = surface
            .show_popup(anchor, "Arriving", &PopupOptions::default())
            .unwrap();
        surface.update_popup(handle, "Boarding").unwrap();
        assert_eq!(surface.get_popup(handle).unwrap().text, "Boarding");
        assert!(surface.get_popup(handle).unwrap().options.is_persistent());
        surface.hide_popup(handle).unwrap();
        assert_eq!(surface.popup_count(), 0);
        assert!(surface.ops.iter().all(SurfaceOp::is_popup));
    }

    #[test]
    fn test_frame_via_default_method() {
        let mut surface = RecordingSurface::new();
        let center = LatLng::new(42.35, -71.07);
        surface
            .frame(&ViewFrame::Center { center, zoom: 17 })
            .unwrap();
        assert_eq!(surface.view, Some(ViewFrame::Center { center, zoom: 17 }));
        assert!(surface.ops[0].is_frame());
    }
}

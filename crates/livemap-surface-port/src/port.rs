// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Map surface trait defining the renderer contract.

use crate::{
    Bounds, Heading, LatLng, LineHandle, LineStyle, MarkerDef, MarkerHandle, Padding, PopupHandle,
    PopupOptions, SurfaceError, ViewFrame,
};

/// Rendering surface port trait.
///
/// One method per rendering primitive. Implementors wrap a concrete map
/// library (Leaflet through wasm bindings, a native tile renderer, a test
/// recorder) and hold no knowledge of vehicles, routes or destinations.
///
/// # Design
///
/// This trait defines a hexagonal port for rendering. The domain (the
/// reconciler) decides what must change; adapters implement this trait to
/// make it visible.
///
/// # Failure Semantics
///
/// Any call may fail. A failed `create_*`/`show_popup` must leave nothing
/// attached; a failed `remove_*`/`hide_popup` must leave the object attached.
/// Callers rely on this to keep their handle bookkeeping truthful.
pub trait MapSurface {
    /// Attach a marker and return its handle.
    fn create_marker(&mut self, def: &MarkerDef) -> Result<MarkerHandle, SurfaceError>;

    /// Move an existing marker and re-set its rotation and label in place.
    fn update_marker(
        &mut self,
        handle: MarkerHandle,
        position: LatLng,
        heading: Option<Heading>,
        label: Option<&str>,
    ) -> Result<(), SurfaceError>;

    /// Detach a marker.
    fn remove_marker(&mut self, handle: MarkerHandle) -> Result<(), SurfaceError>;

    /// Attach a polyline through `points`.
    fn create_line(&mut self, points: &[LatLng], style: &LineStyle)
        -> Result<LineHandle, SurfaceError>;

    /// Replace the geometry of an existing polyline.
    fn update_line(&mut self, handle: LineHandle, points: &[LatLng]) -> Result<(), SurfaceError>;

    /// Detach a polyline.
    fn remove_line(&mut self, handle: LineHandle) -> Result<(), SurfaceError>;

    /// Fit the view to a rectangle, keeping `padding` pixels clear.
    fn frame_to_bound(&mut self, bounds: &Bounds, padding: Padding) -> Result<(), SurfaceError>;

    /// Center the view on a point at a zoom level.
    fn frame_to_center(&mut self, center: LatLng, zoom: u8) -> Result<(), SurfaceError>;

    /// Open a popup anchored at `anchor`.
    fn show_popup(
        &mut self,
        anchor: LatLng,
        text: &str,
        options: &PopupOptions,
    ) -> Result<PopupHandle, SurfaceError>;

    /// Replace popup text without re-opening it.
    fn update_popup(&mut self, handle: PopupHandle, text: &str) -> Result<(), SurfaceError>;

    /// Close a popup.
    fn hide_popup(&mut self, handle: PopupHandle) -> Result<(), SurfaceError>;

    /// Ask the surface to re-measure its container.
    ///
    /// Surfaces that track their size on their own may leave the default.
    fn invalidate_size(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    /// Apply a framing decision.
    fn frame(&mut self, frame: &ViewFrame) -> Result<(), SurfaceError> {
        match *frame {
            ViewFrame::Bound { bounds, padding } => self.frame_to_bound(&bounds, padding),
            ViewFrame::Center { center, zoom } => self.frame_to_center(center, zoom),
        }
    }
}

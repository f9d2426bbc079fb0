// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rendering surface port contract for livemap.
//!
//! This crate defines the contract between the map reconciler and whatever
//! concrete map library draws markers, lines and popups. It contains NO wire
//! parsing; that lives in livemap-codec.
//!
//! # Design Principles
//!
//! - **Surfaces are dumb**: One call per rendering primitive. No domain logic.
//! - **Handles are opaque**: The surface allocates them; callers only store
//!   and hand them back.
//! - **Every call is fallible**: A surface that is not ready yet says so, and
//!   the caller keeps its bookkeeping unchanged.
//!
//! # Crate Features
//!
//! - `std` (default): Enables std library. Disable for no_std contexts.

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

use thiserror::Error;

/// Error type for rendering surface operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The surface has not finished initializing (no container, no map yet).
    #[error("surface not ready")]
    NotReady,
    /// The handle does not refer to an object attached to this surface.
    #[error("unknown handle: {0}")]
    UnknownHandle(u64),
    /// The surface rejected the geometry (empty line, out-of-range point).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(alloc::string::String),
    /// A backend-specific error occurred.
    #[error("backend error: {0}")]
    Backend(alloc::string::String),
}

mod canon;
mod popup;
mod port;
mod types;
mod view;

pub use canon::{dequantize, quantize, COORD_SCALE};
pub use popup::PopupOptions;
pub use port::MapSurface;
pub use types::{
    Bounds, Heading, IconDef, IconKind, LatLng, LineHandle, LineStyle, MarkerDef, MarkerHandle,
    Padding, PopupHandle,
};
pub use view::ViewFrame;

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Live map synchronization engine.
//!
//! Takes sparse, intermittent descriptions of where things are and keeps a
//! map surface in step with them:
//!
//! - [`SourceAdapter`] turns attribute snapshots or pushed messages into a
//!   [`CanonicalUpdate`].
//! - [`Reconciler`] compares the update with the [`VisualHandles`] it holds
//!   and issues the smallest set of create/update/remove calls.
//! - [`MapSession`] ties one destination, one surface and both of the above
//!   together; [`SessionDriver`] serializes updates from many producers.
//!
//! The surface itself is reached only through
//! [`livemap_surface_port::MapSurface`].

mod driver;
mod model;
mod reconcile;
mod session;
mod source;

pub use driver::{DriverClosed, SessionDriver, SessionHandle};
pub use model::{CanonicalUpdate, Destination, PopupState, RouteState, VehicleState};
pub use reconcile::{
    Failure, Outcome, Plan, PlannedOp, Reconciler, ReconcilerSettings, VisualHandles,
};
pub use session::{MapSession, PassReport, SessionError};
pub use source::{AttributeBag, FieldIssue, SourceAdapter, UpdateSource};

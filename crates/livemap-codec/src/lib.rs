// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire formats and test harness for livemap-surface-port.
//!
//! This crate provides:
//! - Encoded polyline decode/encode (precision 5)
//! - Parsers for the individual attribute fields and pushed messages
//! - RecordingSurface for headless testing of the reconciler
//!
//! livemap-surface-port stays free of parsing; everything wire-shaped lives
//! here.

mod fields;
mod message;
mod mock_surface;
mod polyline;

pub use fields::*;
pub use message::*;
pub use mock_surface::*;
pub use polyline::*;

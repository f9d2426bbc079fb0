// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Single-consumer driver that serializes updates for one session.
//!
//! Any number of producers (attribute observers, pushed-message handlers)
//! hold a [`SessionHandle`]; one [`SessionDriver`] owns the session and
//! applies updates strictly in arrival order, each to completion.

use livemap_surface_port::MapSurface;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::session::{MapSession, PassReport};
use crate::source::UpdateSource;

/// The driver has stopped and no longer accepts updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session driver stopped")]
pub struct DriverClosed;

/// Cloneable producer side of a session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<UpdateSource>,
}

impl SessionHandle {
    /// Queue an update. Never blocks.
    pub fn push(&self, update: impl Into<UpdateSource>) -> Result<(), DriverClosed> {
        self.tx.send(update.into()).map_err(|_| DriverClosed)
    }
}

/// Owns a [`MapSession`] and drains queued updates into it.
#[derive(Debug)]
pub struct SessionDriver<S> {
    session: MapSession<S>,
    rx: mpsc::UnboundedReceiver<UpdateSource>,
}

impl<S> SessionDriver<S>
where
    S: MapSurface,
{
    /// Wrap a session; returns the driver and its first producer handle.
    pub fn new(session: MapSession<S>) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { session, rx }, SessionHandle { tx })
    }

    /// Apply every update queued so far without waiting for more.
    pub fn drain(&mut self) -> Vec<PassReport> {
        let mut reports = Vec::new();
        while let Ok(update) = self.rx.try_recv() {
            reports.push(self.step(&update));
        }
        reports
    }

    /// Apply updates until every handle is dropped, then return the session.
    pub async fn run(mut self) -> MapSession<S> {
        while let Some(update) = self.rx.recv().await {
            self.step(&update);
        }
        debug!(passes = self.session.passes(), "all session handles dropped");
        self.session
    }

    /// Borrow the session.
    pub fn session(&self) -> &MapSession<S> {
        &self.session
    }

    fn step(&mut self, update: &UpdateSource) -> PassReport {
        let report = self.session.apply(update);
        if !report.outcome.is_clean() {
            warn!(
                failures = report.outcome.failures.len(),
                "pass left surface out of date; next update will retry"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Destination;
    use livemap_app_core::prefs::MapPrefs;
    use livemap_codec::{ClearMessage, PushedMessage, RecordingSurface, ATTR_POPUP};
    use livemap_surface_port::LatLng;

    use crate::source::AttributeBag;

    fn session() -> MapSession<RecordingSurface> {
        MapSession::new(
            Destination::new(LatLng::new(42.35, -71.07)),
            &MapPrefs::default(),
            RecordingSurface::new(),
        )
    }

    #[tokio::test]
    async fn test_run_applies_updates_in_order_and_returns_session() {
        let (driver, handle) = SessionDriver::new(session());
        let second = handle.clone();
        handle
            .push(AttributeBag::new().with(ATTR_POPUP, "first"))
            .expect("push");
        second
            .push(PushedMessage::Clear(ClearMessage {
                popup: Some("second".into()),
            }))
            .expect("push");
        drop(handle);
        drop(second);

        let session = driver.run().await;
        assert_eq!(session.passes(), 2);
        let popup = session.handles().popup.expect("popup");
        assert_eq!(session.surface().get_popup(popup).expect("open").text, "second");
    }

    #[test]
    fn test_drain_applies_what_is_queued() {
        let (mut driver, handle) = SessionDriver::new(session());
        handle.push(AttributeBag::new()).expect("push");
        handle.push(AttributeBag::new()).expect("push");
        assert_eq!(driver.drain().len(), 2);
        assert!(driver.drain().is_empty());
        assert_eq!(driver.session().passes(), 2);
    }

    #[test]
    fn test_push_after_driver_dropped_fails() {
        let (driver, handle) = SessionDriver::new(session());
        drop(driver);
        assert_eq!(handle.push(AttributeBag::new()), Err(DriverClosed));
    }
}

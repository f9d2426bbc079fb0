// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]

use livemap_app_core::prefs::MapPrefs;
use livemap_codec::{
    encode, RecordingSurface, ATTR_BBOX, ATTR_DESTINATION, ATTR_POLYLINE, ATTR_POPUP,
    ATTR_VEHICLE_HEADING,
};
use livemap_surface_port::LatLng;
use livemap_sync::{AttributeBag, MapSession};
use proptest::prelude::*;

const DESTINATION: &str = r#"{"lat":42.35,"lon":-71.07}"#;

fn paths() -> Vec<String> {
    vec![
        encode(&[LatLng::new(42.31, -71.09), LatLng::new(42.33, -71.08)]),
        encode(&[LatLng::new(42.34, -71.06)]),
        encode(&[
            LatLng::new(42.36, -71.05),
            LatLng::new(42.355, -71.06),
            LatLng::new(42.35, -71.07),
        ]),
    ]
}

prop_compose! {
    fn snapshot()(
        path in prop::option::of(0usize..3),
        heading in prop::option::of(0u16..360),
        bbox in any::<bool>(),
        popup in prop::option::of(prop::sample::select(vec!["2 stops away", "1 stop away", "Arriving"])),
    ) -> AttributeBag {
        let mut bag = AttributeBag::new().with(ATTR_DESTINATION, DESTINATION);
        if let Some(i) = path {
            bag.insert(ATTR_POLYLINE, paths()[i].clone());
        }
        if let Some(h) = heading {
            bag.insert(ATTR_VEHICLE_HEADING, h.to_string());
        }
        if bbox {
            bag.insert(ATTR_BBOX, "[[42.30,-71.10],[42.40,-71.00]]");
        }
        if let Some(text) = popup {
            bag.insert(ATTR_POPUP, text);
        }
        bag
    }
}

fn start() -> MapSession<RecordingSurface> {
    let bag = AttributeBag::new().with(ATTR_DESTINATION, DESTINATION);
    let (session, _) = MapSession::from_attributes(&bag, &MapPrefs::default(), RecordingSurface::new())
        .expect("session starts");
    session
}

proptest! {
    #[test]
    fn reapplying_an_update_never_creates_or_removes(updates in prop::collection::vec(snapshot(), 1..8)) {
        let mut session = start();
        for bag in &updates {
            session.apply(&bag.clone().into());
            let handles = *session.handles();
            session.surface_mut().take_ops();

            let report = session.apply(&bag.clone().into());
            prop_assert!(report.outcome.is_clean());
            prop_assert_eq!(*session.handles(), handles);
            let ops = &session.surface().ops;
            prop_assert!(!ops.iter().any(|op| op.is_create() || op.is_remove()));
            prop_assert!(!ops.iter().any(|op| op.name() == "update_line"));
            prop_assert!(!ops.iter().any(|op| op.name() == "update_popup"));
        }
    }

    #[test]
    fn attached_objects_mirror_the_latest_update(updates in prop::collection::vec(snapshot(), 1..12)) {
        let mut session = start();
        for bag in &updates {
            let report = session.apply(&bag.clone().into());
            prop_assert!(report.outcome.is_clean());

            let has_route = bag.get(ATTR_POLYLINE).is_some();
            let has_popup = bag.get(ATTR_POPUP).is_some();
            let handles = session.handles();
            prop_assert_eq!(handles.route.is_some(), has_route);
            prop_assert_eq!(handles.vehicle.is_some(), has_route);
            prop_assert_eq!(handles.popup.is_some(), has_popup);

            let surface = session.surface();
            prop_assert_eq!(surface.marker_count(), 1 + usize::from(has_route));
            prop_assert_eq!(surface.line_count(), usize::from(has_route));
            prop_assert_eq!(surface.popup_count(), usize::from(has_popup));
        }
    }

    #[test]
    fn transient_failures_converge_once_surface_recovers(
        updates in prop::collection::vec(snapshot(), 1..6),
        failures in 0u32..6,
    ) {
        let mut session = start();
        for bag in &updates {
            session.surface_mut().fail_next(failures);
            session.apply(&bag.clone().into());
        }
        session.surface_mut().fail_next(0);
        let last = updates.last().cloned().unwrap_or_default();
        let report = session.apply(&last.clone().into());
        prop_assert!(report.outcome.is_clean());

        let has_route = last.get(ATTR_POLYLINE).is_some();
        prop_assert_eq!(session.handles().route.is_some(), has_route);
        prop_assert_eq!(session.surface().marker_count(), 1 + usize::from(has_route));
        prop_assert_eq!(session.surface().popup_count(), usize::from(last.get(ATTR_POPUP).is_some()));
    }
}

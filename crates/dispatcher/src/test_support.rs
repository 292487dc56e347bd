//! Hand-built trial outputs for sink tests

use contracts::{
    CombinedRow, CombinedSegment, Event, EventKind, FeatureRecord, SegmentId, SensorKind,
    TrialEvents, TrialOutput, Vector3,
};

pub(crate) fn events() -> TrialEvents {
    TrialEvents {
        take_off: Event::new(EventKind::TakeOff, 10, 6_250),
        left_contact: Event::new(EventKind::LeftContact, 50, 31_250),
        right_contact: Event::new(EventKind::RightContact, 52, 32_500),
        knee_flexion: Event::new(EventKind::KneeFlexion, 300, 187_500),
    }
}

/// Every combined record has three rows; the right ankle ends after two.
pub(crate) fn trial(participant: &str) -> TrialOutput {
    let value = Vector3::new(1.0, 2.0, 3.0);
    let rows = (0..3)
        .map(|i| CombinedRow {
            left: value,
            right: if i < 2 { value } else { Vector3::SENTINEL },
            pelvis: value,
        })
        .collect::<Vec<_>>();

    let mut combined = Vec::new();
    for segment in SegmentId::ALL {
        for kind in SensorKind::ALL {
            combined.push(CombinedSegment {
                segment,
                kind,
                source_lens: [3, 2, 3],
                rows: rows.clone(),
            });
        }
    }

    let mut features = FeatureRecord::new(participant.into());
    features.push("takeOff_flight_time_left", 25_000.0);
    features.push("S1_LANK_ax_m/s/s_rms", 1.0);

    TrialOutput {
        participant: participant.into(),
        events: events(),
        channels: Vec::new(),
        combined,
        features,
    }
}

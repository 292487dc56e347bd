//! Detected biomechanical events.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Channel, Location, SensorKind};

/// Kind of detected event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Participant leaves the ground (pelvis accelerometer)
    TakeOff,
    /// Left foot lands (left ankle accelerometer)
    LeftContact,
    /// Right foot lands (right ankle accelerometer)
    RightContact,
    /// Deepest squat during landing absorption (pelvis accelerometer)
    KneeFlexion,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::TakeOff => "take_off",
            EventKind::LeftContact => "left_contact",
            EventKind::RightContact => "right_contact",
            EventKind::KneeFlexion => "knee_flexion",
        }
    }

    /// Stream the event is detected on; its `index` refers to this stream.
    pub fn source_channel(self) -> Channel {
        let location = match self {
            EventKind::LeftContact => Location::LeftAnkle,
            EventKind::RightContact => Location::RightAnkle,
            EventKind::TakeOff | EventKind::KneeFlexion => Location::Pelvis,
        };
        Channel::new(location, SensorKind::Accelerometer)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected instant.
///
/// `index` refers to the stream the detector ran on; `timestamp` is the
/// value used to re-resolve the event against any other stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub index: usize,
    pub timestamp: i64,
}

impl Event {
    pub const fn new(kind: EventKind, index: usize, timestamp: i64) -> Self {
        Self {
            kind,
            index,
            timestamp,
        }
    }
}

/// The four events of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialEvents {
    pub take_off: Event,
    pub left_contact: Event,
    pub right_contact: Event,
    pub knee_flexion: Event,
}

impl TrialEvents {
    /// The earlier of the two ankle contacts; the pelvis splits its
    /// segments there.
    pub fn first_contact(&self) -> Event {
        if self.left_contact.timestamp > self.right_contact.timestamp {
            self.right_contact
        } else {
            self.left_contact
        }
    }

    /// True when take-off < every contact < knee flexion in time.
    pub fn is_ordered(&self) -> bool {
        [self.left_contact, self.right_contact]
            .iter()
            .all(|c| {
                self.take_off.timestamp < c.timestamp && c.timestamp < self.knee_flexion.timestamp
            })
    }
}

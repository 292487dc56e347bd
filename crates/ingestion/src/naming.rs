//! 录制文件名解析
//!
//! `<participant>_<device-serial>_<...>_<highg|lowg>.csv`

use contracts::{ParticipantId, SensorKind};

use crate::error::{IngestionError, Result};

/// Parsed recording file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingName {
    pub participant: ParticipantId,
    pub serial: String,
    pub kind: SensorKind,
    pub file_name: String,
}

impl RecordingName {
    /// Parses `file_name`.
    ///
    /// Returns `Ok(None)` for files that are not sensor recordings at all
    /// (wrong suffix) so callers can skip them quietly.
    pub fn parse(file_name: &str) -> Result<Option<Self>> {
        let Some(kind) = SensorKind::from_file_name(file_name) else {
            return Ok(None);
        };

        let mut tokens = file_name.split('_');
        let participant = tokens.next().unwrap_or_default();
        let serial = tokens.next();

        match serial {
            Some(serial) if !participant.is_empty() && !serial.is_empty() => {
                Ok(Some(Self {
                    participant: ParticipantId::new(participant),
                    serial: serial.to_string(),
                    kind,
                    file_name: file_name.to_string(),
                }))
            }
            _ => Err(IngestionError::UnrecognisedName {
                name: file_name.to_string(),
                reason: "expected '<participant>_<serial>_...' tokens".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accelerometer() {
        let name = RecordingName::parse("P01J1_TS-04223_2023-05-01_highg.csv")
            .unwrap()
            .unwrap();
        assert_eq!(name.participant, "P01J1");
        assert_eq!(name.serial, "TS-04223");
        assert_eq!(name.kind, SensorKind::Accelerometer);
    }

    #[test]
    fn test_parse_gyroscope() {
        let name = RecordingName::parse("P2_TS-04205_lowg.csv").unwrap().unwrap();
        assert_eq!(name.kind, SensorKind::Gyroscope);
        assert_eq!(name.serial, "TS-04205");
    }

    #[test]
    fn test_other_files_are_ignored() {
        assert_eq!(RecordingName::parse("feature_list.csv").unwrap(), None);
        assert_eq!(RecordingName::parse("notes.txt").unwrap(), None);
    }

    #[test]
    fn test_missing_serial_is_an_error() {
        let err = RecordingName::parse("highg.csv").unwrap_err();
        assert!(matches!(err, IngestionError::UnrecognisedName { .. }));
    }
}

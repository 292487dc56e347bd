//! Trial 组装状态机
//!
//! Walks a sorted file listing and groups the six recordings of each
//! participant. A trial is complete as soon as a file with a different
//! participant identifier shows up, or when the listing ends.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use contracts::{Channel, DeviceMap, ParticipantId, TrialRecording};
use tracing::{debug, instrument, warn};

use crate::error::{IngestionError, Result};
use crate::naming::RecordingName;
use crate::reader::read_stream;

/// File paths of one trial, keyed by channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialFiles {
    participant: ParticipantId,
    slots: BTreeMap<usize, (Channel, PathBuf)>,
}

impl TrialFiles {
    pub fn new(participant: ParticipantId) -> Self {
        Self {
            participant,
            slots: BTreeMap::new(),
        }
    }

    pub fn participant(&self) -> &ParticipantId {
        &self.participant
    }

    pub fn get(&self, channel: Channel) -> Option<&Path> {
        self.slots
            .get(&slot_index(channel))
            .map(|(_, path)| path.as_path())
    }

    /// Occupied slots in canonical channel order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &Path)> {
        self.slots
            .values()
            .map(|(channel, path)| (*channel, path.as_path()))
    }

    pub fn missing(&self) -> Vec<Channel> {
        Channel::all()
            .into_iter()
            .filter(|c| !self.slots.contains_key(&slot_index(*c)))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.len() == Channel::all().len()
    }

    /// Fills `channel`; returns false when the slot was already taken.
    fn fill(&mut self, channel: Channel, path: PathBuf) -> bool {
        let index = slot_index(channel);
        if self.slots.contains_key(&index) {
            return false;
        }
        self.slots.insert(index, (channel, path));
        true
    }
}

fn slot_index(channel: Channel) -> usize {
    Channel::all()
        .iter()
        .position(|c| *c == channel)
        .unwrap_or(usize::MAX)
}

/// Why a file did not make it into a trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnrecognisedName(String),
    UnknownDevice(String),
    DuplicateSlot(Channel),
}

impl SkipReason {
    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::UnrecognisedName(_) => "unrecognised_name",
            SkipReason::UnknownDevice(_) => "unknown_device",
            SkipReason::DuplicateSlot(_) => "duplicate_slot",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnrecognisedName(reason) => write!(f, "unrecognised name: {reason}"),
            SkipReason::UnknownDevice(serial) => write!(f, "unknown device serial '{serial}'"),
            SkipReason::DuplicateSlot(channel) => write!(f, "slot {channel} already filled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Groups recordings into trials as they are pushed in sorted order.
#[derive(Debug)]
pub struct TrialAssembler {
    devices: DeviceMap,
    current: Option<TrialFiles>,
    skipped: Vec<SkippedFile>,
}

impl TrialAssembler {
    pub fn new(devices: DeviceMap) -> Self {
        Self {
            devices,
            current: None,
            skipped: Vec::new(),
        }
    }

    /// Feeds the next file of the listing.
    ///
    /// Returns the previous trial when `path` starts a new participant.
    pub fn push(&mut self, path: &Path) -> Option<TrialFiles> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let name = match RecordingName::parse(&file_name) {
            Ok(Some(name)) => name,
            Ok(None) => return None,
            Err(IngestionError::UnrecognisedName { reason, .. }) => {
                self.skip(path, SkipReason::UnrecognisedName(reason));
                return None;
            }
            Err(other) => {
                self.skip(path, SkipReason::UnrecognisedName(other.to_string()));
                return None;
            }
        };

        let switching = self
            .current
            .as_ref()
            .is_some_and(|trial| trial.participant != name.participant);
        let finished = if switching { self.current.take() } else { None };

        let location = self.devices.locate(&name.serial);
        let trial = self
            .current
            .get_or_insert_with(|| TrialFiles::new(name.participant.clone()));

        match location {
            Some(location) => {
                let channel = Channel::new(location, name.kind);
                if trial.fill(channel, path.to_path_buf()) {
                    debug!(participant = %name.participant, %channel, file = %file_name, "slot filled");
                } else {
                    self.skip(path, SkipReason::DuplicateSlot(channel));
                }
            }
            None => self.skip(path, SkipReason::UnknownDevice(name.serial)),
        }

        finished
    }

    /// Ends the listing, returning the trial still being assembled.
    pub fn finish(&mut self) -> Option<TrialFiles> {
        self.current.take()
    }

    /// Files skipped since the last drain.
    pub fn drain_skipped(&mut self) -> Vec<SkippedFile> {
        std::mem::take(&mut self.skipped)
    }

    fn skip(&mut self, path: &Path, reason: SkipReason) {
        warn!(file = %path.display(), %reason, "skipping file");
        self.skipped.push(SkippedFile {
            path: path.to_path_buf(),
            reason,
        });
    }
}

/// Regular files of `dir`, sorted by file name.
pub fn list_recordings(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| IngestionError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IngestionError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Every trial of `dir`, plus the files that were skipped.
pub fn assemble_directory(
    dir: &Path,
    devices: DeviceMap,
) -> Result<(Vec<TrialFiles>, Vec<SkippedFile>)> {
    let mut assembler = TrialAssembler::new(devices);
    let mut trials = Vec::new();

    for path in list_recordings(dir)? {
        trials.extend(assembler.push(&path));
    }
    trials.extend(assembler.finish());

    Ok((trials, assembler.drain_skipped()))
}

/// Loads every occupied slot. Empty slots stay empty.
#[instrument(name = "load_trial", skip_all, fields(participant = %files.participant()))]
pub fn load_trial(files: &TrialFiles) -> Result<TrialRecording> {
    let mut recording = TrialRecording::new(files.participant().clone());
    for (channel, path) in files.iter() {
        recording.insert(read_stream(path, channel)?);
    }
    Ok(recording)
}

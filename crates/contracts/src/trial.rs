//! TrialRecording - 一次跳跃的六路数据

use std::collections::HashMap;

use crate::{Channel, ParticipantId, Stream};

/// The loaded streams of one trial.
///
/// A slot can be empty when its file was never found; consumers report
/// that as a missing stream instead of failing at load time.
#[derive(Debug, Clone)]
pub struct TrialRecording {
    participant: ParticipantId,
    streams: HashMap<Channel, Stream>,
}

impl TrialRecording {
    pub fn new(participant: ParticipantId) -> Self {
        Self {
            participant,
            streams: HashMap::new(),
        }
    }

    pub fn participant(&self) -> &ParticipantId {
        &self.participant
    }

    /// Stores `stream` under its own channel, returning any previous one.
    pub fn insert(&mut self, stream: Stream) -> Option<Stream> {
        self.streams.insert(stream.channel(), stream)
    }

    pub fn get(&self, channel: Channel) -> Option<&Stream> {
        self.streams.get(&channel)
    }

    /// Occupied channels in canonical order.
    pub fn channels(&self) -> Vec<Channel> {
        Channel::all()
            .into_iter()
            .filter(|c| self.streams.contains_key(c))
            .collect()
    }

    pub fn missing(&self) -> Vec<Channel> {
        Channel::all()
            .into_iter()
            .filter(|c| !self.streams.contains_key(c))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.streams.len() == Channel::all().len()
    }

    /// Replaces every stream with `f(stream)`, stopping at the first error.
    pub fn try_map_streams<F, E>(self, mut f: F) -> Result<TrialRecording, E>
    where
        F: FnMut(Stream) -> Result<Stream, E>,
    {
        let mut streams = HashMap::with_capacity(self.streams.len());
        for (channel, stream) in self.streams {
            streams.insert(channel, f(stream)?);
        }
        Ok(TrialRecording {
            participant: self.participant,
            streams,
        })
    }
}

//! Feature vectors extracted from a segmented trial.

use serde::{Deserialize, Serialize};

use crate::ParticipantId;

/// A named scalar feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureValue {
    pub name: String,
    pub value: f64,
}

impl FeatureValue {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Feature row for one trial, in output column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub participant: ParticipantId,
    pub values: Vec<FeatureValue>,
}

impl FeatureRecord {
    pub fn new(participant: ParticipantId) -> Self {
        Self {
            participant,
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: f64) {
        self.values.push(FeatureValue::new(name, value));
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.iter().find(|v| v.name == name).map(|v| v.value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.name.as_str())
    }
}

//! Sliding temporal window: retained past, one current impression, and
//! pending anticipations.
//!
//! Lifecycle of a slot: empty → current → retained (fading with depth) →
//! evicted once more than `retention_capacity` items follow it. Anticipations
//! are either resolved at the next impression or silently evicted when the
//! pending buffer overflows first. Neither buffer ever reports an error.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::act::clamp_unit;
use crate::config::WindowConfig;
use crate::constants::{IMPRESSION_WEIGHT, PROTENTION_WEIGHT, RETENTION_WEIGHT};
use crate::time::now_iso8601;
use crate::tokenizer::similarity;

/// The occupant of the current slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Impression {
    pub content: String,
    pub context: Value,
    pub timestamp: String,
}

/// A displaced impression held in the past buffer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Retention {
    pub content: String,
    pub context: Value,
    pub original_timestamp: String,
    pub retained_at: String,
    pub modification_depth: usize,
    pub fading: f64,
}

impl Retention {
    fn from_impression(impression: Impression) -> Self {
        Self {
            content: impression.content,
            context: impression.context,
            original_timestamp: impression.timestamp,
            retained_at: now_iso8601(),
            modification_depth: 0,
            fading: 1.0,
        }
    }

    /// Move this retention to `depth`, recomputing its fading.
    fn sink_to(&mut self, depth: usize) {
        self.modification_depth = depth;
        self.fading = 1.0 / (1.0 + depth as f64);
    }
}

/// An expectation about the next impression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anticipation {
    pub expected: String,
    pub confidence: f64,
    pub created_at: String,
}

/// How one anticipation fared against the impression that resolved it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub expected: String,
    pub actual: String,
    pub confidence: f64,
    #[serde(rename = "match")]
    pub match_score: f64,
    pub surprise: f64,
}

/// Snapshot emitted by every impression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
    pub sequence: usize,
    pub impression: Impression,
    pub retention_depth: usize,
    pub resolved: Vec<Resolution>,
    pub temporal_thickness: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamSummary {
    pub now: Option<Impression>,
    pub retention_depth: usize,
    pub protention_count: usize,
    pub temporal_thickness: f64,
    pub oldest_retention: Option<Retention>,
    pub flow_length: usize,
}

#[derive(Debug)]
pub struct TemporalWindow {
    retention_capacity: usize,
    protention_capacity: usize,
    past: VecDeque<Retention>,
    current: Option<Impression>,
    pending: VecDeque<Anticipation>,
    flow: Vec<FlowState>,
}

impl Default for TemporalWindow {
    fn default() -> Self {
        Self::from_config(&WindowConfig::default())
    }
}

impl TemporalWindow {
    /// Create a window. Capacities below 1 are raised to 1.
    pub fn new(retention_capacity: usize, protention_capacity: usize) -> Self {
        let retention_capacity = retention_capacity.max(1);
        let protention_capacity = protention_capacity.max(1);
        Self {
            retention_capacity,
            protention_capacity,
            past: VecDeque::with_capacity(retention_capacity),
            current: None,
            pending: VecDeque::with_capacity(protention_capacity),
            flow: Vec::new(),
        }
    }

    pub fn from_config(config: &WindowConfig) -> Self {
        Self::new(config.retention_capacity, config.protention_capacity)
    }

    /// Make `content` the current impression.
    ///
    /// The previous impression (if any) is retained, every pending
    /// anticipation is resolved against `content` and then dropped.
    pub fn impress(&mut self, content: impl Into<String>, context: Value) -> FlowState {
        let content = content.into();

        if let Some(previous) = self.current.take() {
            self.retain(previous);
        }

        let pending_before = self.pending.len();
        let resolved: Vec<Resolution> = self
            .pending
            .drain(..)
            .map(|a| {
                let score = similarity(&a.expected, &content);
                Resolution {
                    expected: a.expected,
                    actual: content.clone(),
                    confidence: a.confidence,
                    match_score: score,
                    surprise: 1.0 - score,
                }
            })
            .collect();
        if pending_before > 0 {
            tracing::debug!(resolved = pending_before, "resolved pending anticipations");
        }

        let impression = Impression {
            content,
            context,
            timestamp: now_iso8601(),
        };
        self.current = Some(impression.clone());

        let state = FlowState {
            sequence: self.flow.len(),
            impression,
            retention_depth: self.past.len(),
            resolved,
            temporal_thickness: self.thickness(pending_before),
        };
        self.flow.push(state.clone());
        state
    }

    /// Queue an anticipation for the next impression, evicting the oldest
    /// pending one when the buffer is full.
    pub fn protend(&mut self, expected_content: impl Into<String>, confidence: f64) -> Anticipation {
        let anticipation = Anticipation {
            expected: expected_content.into(),
            confidence: clamp_unit(confidence),
            created_at: now_iso8601(),
        };
        if self.pending.len() >= self.protention_capacity
            && let Some(dropped) = self.pending.pop_front()
        {
            tracing::debug!(expected = %dropped.expected, "evicted unresolved anticipation");
        }
        self.pending.push_back(anticipation.clone());
        anticipation
    }

    pub fn stream_summary(&self) -> StreamSummary {
        StreamSummary {
            now: self.current.clone(),
            retention_depth: self.past.len(),
            protention_count: self.pending.len(),
            temporal_thickness: self.thickness(self.pending.len()),
            oldest_retention: self.past.back().cloned(),
            flow_length: self.flow.len(),
        }
    }

    /// Retained past, newest first.
    pub fn past(&self) -> impl ExactSizeIterator<Item = &Retention> {
        self.past.iter()
    }

    /// Pending anticipations, oldest first.
    pub fn pending(&self) -> impl ExactSizeIterator<Item = &Anticipation> {
        self.pending.iter()
    }

    pub fn current(&self) -> Option<&Impression> {
        self.current.as_ref()
    }

    pub fn flow(&self) -> &[FlowState] {
        &self.flow
    }

    /// (retention_capacity, protention_capacity)
    pub fn capacity(&self) -> (usize, usize) {
        (self.retention_capacity, self.protention_capacity)
    }

    fn retain(&mut self, impression: Impression) {
        self.past.push_front(Retention::from_impression(impression));
        if self.past.len() > self.retention_capacity
            && let Some(evicted) = self.past.pop_back()
        {
            tracing::debug!(content = %evicted.content, "evicted oldest retention");
        }
        for (depth, retention) in self.past.iter_mut().enumerate() {
            retention.sink_to(depth);
        }
    }

    fn thickness(&self, pending: usize) -> f64 {
        let retained = (self.past.len() as f64 / self.retention_capacity as f64).min(1.0);
        let present = if self.current.is_some() { 1.0 } else { 0.0 };
        let protended = (pending as f64 / self.protention_capacity as f64).min(1.0);
        RETENTION_WEIGHT * retained + IMPRESSION_WEIGHT * present + PROTENTION_WEIGHT * protended
    }
}

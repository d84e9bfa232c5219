//! Engine configuration.
//!
//! Every field has a default, so a partial TOML or JSON document (or none at
//! all) yields a usable configuration. Reading files is left to the caller.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PROTENTION_CAPACITY, DEFAULT_RETENTION_CAPACITY};

/// Top-level configuration for one set of engines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub reduction: ReductionPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Capacity R of the past buffer.
    pub retention_capacity: usize,
    /// Capacity P of the pending buffer.
    pub protention_capacity: usize,
}

/// Which top-level keys the reduction engine strips or recognizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionPolicy {
    /// Removed from the residual and recorded in the bracketed log.
    pub natural_attitude: BTreeSet<String>,
    /// Removed from the residual without being logged.
    pub contextual: BTreeSet<String>,
    /// Any of these surviving in the residual makes it apodictic.
    pub self_awareness_markers: BTreeSet<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            retention_capacity: DEFAULT_RETENTION_CAPACITY,
            protention_capacity: DEFAULT_PROTENTION_CAPACITY,
        }
    }
}

impl Default for ReductionPolicy {
    fn default() -> Self {
        Self {
            natural_attitude: set([
                "existence",
                "causality",
                "external_world",
                "objective_properties",
                "physical_location",
            ]),
            contextual: set(["source", "timestamp", "confidence"]),
            self_awareness_markers: set(["self_awareness"]),
        }
    }
}

impl ReductionPolicy {
    pub fn new<N, C, M>(natural_attitude: N, contextual: C, self_awareness_markers: M) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            natural_attitude: natural_attitude.into_iter().map(Into::into).collect(),
            contextual: contextual.into_iter().map(Into::into).collect(),
            self_awareness_markers: self_awareness_markers.into_iter().map(Into::into).collect(),
        }
    }
}

fn set<const N: usize>(keys: [&str; N]) -> BTreeSet<String> {
    keys.into_iter().map(str::to_string).collect()
}

//! JSONL event driver.
//!
//! Each line of an events file is one JSON object tagged by `op`. A session
//! owns one instance of every engine and turns each event into one JSON
//! output line. The engines never see each other; the session is the only
//! place they are composed.

use std::io::BufRead;

use anyhow::{Context, Result};
use ep_core::{
    Act, Correlator, EngineConfig, ObjectAsMeant, Record, ReductionEngine, TemporalWindow,
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Event {
    Constitute {
        act: Act,
        object: ObjectAsMeant,
    },
    /// Without an id, the most recently constituted record is fulfilled.
    Fulfill {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        evidence: String,
    },
    Horizons {
        object: ObjectAsMeant,
    },
    Impress {
        content: String,
        #[serde(default = "empty_context")]
        context: Value,
    },
    Protend {
        expected: String,
        #[serde(default = "default_confidence")]
        confidence: f64,
    },
    Summary,
    Reduce {
        record: Record,
    },
    Vary {
        records: Vec<Record>,
    },
}

fn empty_context() -> Value {
    json!({})
}

fn default_confidence() -> f64 {
    0.5
}

pub struct Session {
    correlator: Correlator,
    window: TemporalWindow,
    reduction: ReductionEngine,
}

impl Session {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            correlator: Correlator::new(),
            window: TemporalWindow::from_config(&config.window),
            reduction: ReductionEngine::new(config.reduction.clone()),
        }
    }

    /// Apply one event and return its JSON output.
    pub fn apply(&mut self, event: Event) -> Result<Value> {
        let out = match event {
            Event::Constitute { act, object } => {
                serde_json::to_value(self.correlator.constitute(&act, &object))?
            }
            Event::Fulfill { id, evidence } => {
                let id = id.or_else(|| self.correlator.latest().map(|r| r.id.clone()));
                match id {
                    Some(id) => match self.correlator.fulfill(&id, &evidence) {
                        Ok(record) => serde_json::to_value(record)?,
                        Err(e) => {
                            tracing::warn!("{e}");
                            json!({"error": "not_found", "id": id})
                        }
                    },
                    None => {
                        tracing::warn!("fulfill before any record was constituted");
                        json!({"error": "not_found", "id": null})
                    }
                }
            }
            Event::Horizons { object } => {
                serde_json::to_value(Correlator::horizonal_analysis(&object))?
            }
            Event::Impress { content, context } => {
                serde_json::to_value(self.window.impress(content, context))?
            }
            Event::Protend {
                expected,
                confidence,
            } => serde_json::to_value(self.window.protend(expected, confidence))?,
            Event::Summary => serde_json::to_value(self.window.stream_summary())?,
            Event::Reduce { record } => serde_json::to_value(self.reduction.reduce(&record))?,
            Event::Vary { records } => {
                serde_json::to_value(ReductionEngine::eidetic_variation(&records))?
            }
        };
        Ok(out)
    }

    /// Run every event in `input`, calling `emit` with each output.
    /// Returns the number of events applied.
    pub fn run(
        &mut self,
        input: impl BufRead,
        mut emit: impl FnMut(&Value) -> Result<()>,
    ) -> Result<usize> {
        let mut applied = 0;
        for (idx, line) in input.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.with_context(|| format!("failed to read line {line_no}"))?;
            if line.trim().is_empty() {
                continue;
            }
            let event: Event = serde_json::from_str(&line)
                .with_context(|| format!("line {line_no}: invalid event"))?;
            tracing::debug!(line = line_no, ?event, "applying event");
            let out = self.apply(event)?;
            emit(&out)?;
            applied += 1;
        }
        Ok(applied)
    }

    pub fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    pub fn window(&self) -> &TemporalWindow {
        &self.window
    }

    pub fn reduction(&self) -> &ReductionEngine {
        &self.reduction
    }
}

/// Reduce every record through one engine, then vary the residua.
pub fn reduce_batch(config: &EngineConfig, records: &[Record]) -> Result<Value> {
    let mut engine = ReductionEngine::new(config.reduction.clone());
    let residua: Vec<_> = records.iter().map(|r| engine.reduce(r)).collect();
    let pure: Vec<Record> = residua.iter().map(|r| r.pure_experience.clone()).collect();
    let invariants = ReductionEngine::eidetic_variation(&pure);
    Ok(json!({
        "residua": serde_json::to_value(&residua)?,
        "invariants": serde_json::to_value(&invariants)?,
    }))
}

//! Bracketing and eidetic variation.
//!
//! `reduce` strips keys named by a [`ReductionPolicy`] from one record.
//! `eidetic_variation` compares a batch of records key by key and reports
//! which keys hold the same value everywhere.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::act::EvidenceGrade;
use crate::config::ReductionPolicy;
use crate::constants::ADEQUATE_KEY_THRESHOLD;
use crate::time::now_iso8601;

/// A flat experience record: top-level key → value.
pub type Record = Map<String, Value>;

/// One key removed under the natural-attitude set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketedEntry {
    pub key: String,
    pub value: Value,
    pub bracketed_at: String,
}

/// What remains of a record after bracketing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Residuum {
    pub pure_experience: Record,
    pub bracketed_keys: BTreeSet<String>,
    pub reduction_depth: usize,
    pub apodicticity: EvidenceGrade,
}

/// Invariant and variant keys across a batch of records.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct InvariantReport {
    pub essence: Record,
    pub variant_properties: BTreeMap<String, BTreeSet<String>>,
    pub invariance_ratio: f64,
    pub total_experiences: usize,
    pub total_properties: usize,
}

#[derive(Debug, Default)]
pub struct ReductionEngine {
    policy: ReductionPolicy,
    bracketed_log: Vec<BracketedEntry>,
    last_residuum: Option<Residuum>,
}

impl ReductionEngine {
    pub fn new(policy: ReductionPolicy) -> Self {
        Self {
            policy,
            bracketed_log: Vec::new(),
            last_residuum: None,
        }
    }

    /// Bracket one record.
    pub fn reduce(&mut self, record: &Record) -> Residuum {
        let mut pure_experience = Record::new();
        let mut bracketed_keys = BTreeSet::new();
        let mut dropped = 0usize;

        for (key, value) in record {
            if self.policy.natural_attitude.contains(key) {
                bracketed_keys.insert(key.clone());
                self.bracketed_log.push(BracketedEntry {
                    key: key.clone(),
                    value: value.clone(),
                    bracketed_at: now_iso8601(),
                });
            } else if self.policy.contextual.contains(key) {
                dropped += 1;
            } else {
                pure_experience.insert(key.clone(), value.clone());
            }
        }

        let apodicticity = self.apodicticity(&pure_experience);
        tracing::debug!(
            bracketed = bracketed_keys.len(),
            contextual = dropped,
            retained = pure_experience.len(),
            apodicticity = apodicticity.as_str(),
            "reduced record"
        );

        let residuum = Residuum {
            pure_experience,
            bracketed_keys,
            reduction_depth: self.bracketed_log.len(),
            apodicticity,
        };
        self.last_residuum = Some(residuum.clone());
        residuum
    }

    /// Compare records key by key.
    ///
    /// A key is invariant when every record carries it and all of its
    /// string forms agree. An empty batch yields the empty report.
    pub fn eidetic_variation(records: &[Record]) -> InvariantReport {
        let mut observed: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for record in records {
            for (key, value) in record {
                observed.entry(key.as_str()).or_default().push(string_form(value));
            }
        }

        let mut essence = Record::new();
        let mut variant_properties: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for (key, forms) in &observed {
            let everywhere = forms.len() == records.len();
            let agreed = forms.windows(2).all(|w| w[0] == w[1]);
            if everywhere && agreed {
                // every record has the key, so the first one does too
                if let Some(value) = records.first().and_then(|r| r.get(*key)) {
                    essence.insert((*key).to_string(), value.clone());
                }
            } else {
                variant_properties.insert((*key).to_string(), forms.iter().cloned().collect());
            }
        }

        let total_properties = observed.len();
        let invariance_ratio = if total_properties == 0 {
            0.0
        } else {
            essence.len() as f64 / total_properties as f64
        };

        InvariantReport {
            essence,
            variant_properties,
            invariance_ratio,
            total_experiences: records.len(),
            total_properties,
        }
    }

    pub fn policy(&self) -> &ReductionPolicy {
        &self.policy
    }

    pub fn bracketed_log(&self) -> &[BracketedEntry] {
        &self.bracketed_log
    }

    pub fn last_residuum(&self) -> Option<&Residuum> {
        self.last_residuum.as_ref()
    }

    /// Cumulative number of bracketed entries.
    pub fn reduction_depth(&self) -> usize {
        self.bracketed_log.len()
    }

    fn apodicticity(&self, residual: &Record) -> EvidenceGrade {
        if residual
            .keys()
            .any(|k| self.policy.self_awareness_markers.contains(k))
        {
            EvidenceGrade::Apodictic
        } else if residual.len() > ADEQUATE_KEY_THRESHOLD {
            EvidenceGrade::Adequate
        } else {
            EvidenceGrade::Inadequate
        }
    }
}

/// Strings compare by their raw text, everything else by compact JSON.
fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> Record {
        match v {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_reduce_partitions_keys() {
        let mut engine = ReductionEngine::default();
        let r = engine.reduce(&record(json!({
            "existence": true,
            "causality": "push",
            "source": "camera",
            "timestamp": 12,
            "color": "red"
        })));
        assert_eq!(
            r.bracketed_keys,
            BTreeSet::from(["causality".to_string(), "existence".to_string()])
        );
        assert_eq!(r.pure_experience, record(json!({"color": "red"})));
        assert_eq!(r.reduction_depth, 2);
        assert_eq!(engine.bracketed_log().len(), 2);
    }

    #[test]
    fn test_contextual_keys_not_logged() {
        let mut engine = ReductionEngine::default();
        let r = engine.reduce(&record(json!({"source": "x", "confidence": 0.4})));
        assert!(r.bracketed_keys.is_empty());
        assert!(r.pure_experience.is_empty());
        assert_eq!(r.reduction_depth, 0);
        assert!(engine.bracketed_log().is_empty());
    }

    #[test]
    fn test_reduce_keeps_key_order() {
        let mut engine = ReductionEngine::default();
        let r = engine.reduce(&record(json!({
            "zeta": 1,
            "existence": true,
            "mass": 2,
            "alpha": 3
        })));
        let keys: Vec<&str> = r.pure_experience.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "mass", "alpha"]);
        assert_eq!(
            serde_json::to_string(&r.pure_experience).unwrap(),
            r#"{"zeta":1,"mass":2,"alpha":3}"#
        );
    }

    #[test]
    fn test_reduction_depth_is_cumulative() {
        let mut engine = ReductionEngine::default();
        engine.reduce(&record(json!({"existence": 1})));
        engine.reduce(&record(json!({"existence": 2, "causality": 3})));
        let r = engine.reduce(&record(json!({"color": "blue"})));
        assert_eq!(r.reduction_depth, 3);
        assert_eq!(engine.reduction_depth(), 3);
        assert!(
            engine
                .bracketed_log()
                .iter()
                .any(|e| e.key == "existence" && e.value == json!(2))
        );
    }

    #[test]
    fn test_last_residuum_overwritten() {
        let mut engine = ReductionEngine::default();
        assert!(engine.last_residuum().is_none());
        engine.reduce(&record(json!({"a": 1})));
        engine.reduce(&record(json!({"b": 2})));
        let last = engine.last_residuum().unwrap();
        assert!(last.pure_experience.contains_key("b"));
        assert!(!last.pure_experience.contains_key("a"));
    }

    #[test]
    fn test_apodicticity_levels() {
        let mut engine = ReductionEngine::default();
        let r = engine.reduce(&record(json!({"self_awareness": true})));
        assert_eq!(r.apodicticity, EvidenceGrade::Apodictic);
        let r = engine.reduce(&record(json!({"a": 1, "b": 2, "c": 3, "d": 4})));
        assert_eq!(r.apodicticity, EvidenceGrade::Adequate);
        let r = engine.reduce(&record(json!({"a": 1, "b": 2, "c": 3})));
        assert_eq!(r.apodicticity, EvidenceGrade::Inadequate);
    }

    #[test]
    fn test_marker_bracketed_away_does_not_count() {
        let policy = ReductionPolicy::new(["self_awareness"], ["source"], ["self_awareness"]);
        let mut engine = ReductionEngine::new(policy);
        let r = engine.reduce(&record(json!({"self_awareness": true})));
        assert_eq!(r.apodicticity, EvidenceGrade::Inadequate);
    }

    #[test]
    fn test_custom_policy() {
        let policy = ReductionPolicy::new(["mood"], ["author"], Vec::<String>::new());
        let mut engine = ReductionEngine::new(policy);
        let r = engine.reduce(&record(json!({
            "mood": "calm",
            "author": "x",
            "existence": true
        })));
        assert!(r.bracketed_keys.contains("mood"));
        assert!(r.pure_experience.contains_key("existence"));
        assert!(!r.pure_experience.contains_key("author"));
    }

    #[test]
    fn test_eidetic_variation_empty() {
        let report = ReductionEngine::eidetic_variation(&[]);
        assert!(report.essence.is_empty());
        assert!(report.variant_properties.is_empty());
        assert_eq!(report.invariance_ratio, 0.0);
        assert_eq!(report.total_experiences, 0);
        assert_eq!(report.total_properties, 0);
    }

    #[test]
    fn test_eidetic_variation_identical() {
        let r = record(json!({"shape": "sphere", "color": "red", "n": 3}));
        let report = ReductionEngine::eidetic_variation(&[r.clone(), r.clone(), r]);
        assert_eq!(report.invariance_ratio, 1.0);
        assert_eq!(report.essence.len(), 3);
        assert_eq!(report.essence["n"], json!(3));
    }

    #[test]
    fn test_eidetic_variation_mixed() {
        let batch = [
            record(json!({"shape": "sphere", "color": "red"})),
            record(json!({"shape": "sphere", "color": "blue"})),
        ];
        let report = ReductionEngine::eidetic_variation(&batch);
        assert_eq!(report.essence, record(json!({"shape": "sphere"})));
        assert_eq!(
            report.variant_properties["color"],
            BTreeSet::from(["blue".to_string(), "red".to_string()])
        );
        assert_eq!(report.invariance_ratio, 0.5);
        assert_eq!(report.total_experiences, 2);
        assert_eq!(report.total_properties, 2);
    }

    #[test]
    fn test_key_missing_somewhere_is_variant() {
        let batch = [
            record(json!({"shape": "sphere", "size": "small"})),
            record(json!({"shape": "sphere"})),
        ];
        let report = ReductionEngine::eidetic_variation(&batch);
        assert!(report.essence.contains_key("shape"));
        assert_eq!(
            report.variant_properties["size"],
            BTreeSet::from(["small".to_string()])
        );
    }

    #[test]
    fn test_string_form_conflates_text_and_json() {
        // "1" (string) and 1 (number) share the string form "1"
        let batch = [record(json!({"k": "1"})), record(json!({"k": 1}))];
        let report = ReductionEngine::eidetic_variation(&batch);
        assert!(report.essence.contains_key("k"));
    }

    #[test]
    fn test_empty_records_batch() {
        let report = ReductionEngine::eidetic_variation(&[Record::new(), Record::new()]);
        assert_eq!(report.total_experiences, 2);
        assert_eq!(report.total_properties, 0);
        assert_eq!(report.invariance_ratio, 0.0);
    }
}

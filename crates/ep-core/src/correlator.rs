//! Correlation of acts with their objects.
//!
//! The correlator owns an append-only log of experience records. Records are
//! never removed; the only later change a record admits is the attachment of
//! fulfillment evidence.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::act::Act;
use crate::constants::{INNER_HORIZON_PREFIX, RECORD_ID_LEN};
use crate::error::{CorrelatorError, Result};
use crate::object::{Horizon, ObjectAsMeant};
use crate::record::{ExperienceRecord, Fulfillment, MatchQuality};
use crate::time::{now_iso8601, now_unix_nanos};

/// Horizon structure of an object, split by the `inner_` naming convention.
/// Both halves keep the object's horizon order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HorizonalAnalysis {
    pub determinacy: f64,
    pub inner_horizons: IndexMap<String, Horizon>,
    pub outer_horizons: IndexMap<String, Horizon>,
    pub total_possibilities: usize,
    pub openness: f64,
}

#[derive(Debug, Default)]
pub struct Correlator {
    log: Vec<ExperienceRecord>,
    sequence: u64,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Correlate an act with its object, log the record and return a copy.
    pub fn constitute(&mut self, act: &Act, object: &ObjectAsMeant) -> ExperienceRecord {
        let id = self.next_id(act, object);
        let record = ExperienceRecord {
            id,
            act: act.clone(),
            object: object.clone(),
            created_at: now_iso8601(),
            fulfilled: act.is_fulfilled(),
            fulfillment: None,
        };
        tracing::trace!(
            id = %record.id,
            act_type = %act.act_type,
            fulfilled = record.fulfilled,
            "constituted experience"
        );
        self.log.push(record.clone());
        record
    }

    /// Attach evidence to the record with `record_id`.
    ///
    /// Repeated calls overwrite the previous fulfillment (last write wins).
    /// The match quality comes from the record's evidence grade; see
    /// [`MatchQuality::grade`].
    pub fn fulfill(&mut self, record_id: &str, evidence: &str) -> Result<ExperienceRecord> {
        let Some(record) = self.log.iter_mut().find(|r| r.id == record_id) else {
            tracing::debug!(id = record_id, "fulfill: no such record");
            return Err(CorrelatorError::NotFound {
                id: record_id.to_string(),
            });
        };

        if record.fulfillment.is_some() {
            tracing::debug!(id = record_id, "fulfill: overwriting previous fulfillment");
        }
        let match_quality = MatchQuality::grade(record.act.evidence_grade, evidence);
        tracing::debug!(id = record_id, quality = match_quality.as_str(), "fulfilled");
        record.fulfillment = Some(Fulfillment {
            evidence: evidence.to_string(),
            resolved_at: now_iso8601(),
            match_quality,
        });
        Ok(record.clone())
    }

    /// Split an object's horizons into inner and outer and measure its openness.
    pub fn horizonal_analysis(object: &ObjectAsMeant) -> HorizonalAnalysis {
        let (inner_horizons, outer_horizons): (IndexMap<_, _>, IndexMap<_, _>) = object
            .horizons
            .iter()
            .map(|(name, h)| (name.clone(), h.clone()))
            .partition(|(name, _)| name.starts_with(INNER_HORIZON_PREFIX));

        HorizonalAnalysis {
            determinacy: object.determinacy,
            inner_horizons,
            outer_horizons,
            total_possibilities: object.total_possibilities(),
            openness: 1.0 - object.determinacy,
        }
    }

    pub fn get(&self, record_id: &str) -> Option<&ExperienceRecord> {
        self.log.iter().find(|r| r.id == record_id)
    }

    /// All records in creation order.
    pub fn records(&self) -> &[ExperienceRecord] {
        &self.log
    }

    pub fn latest(&self) -> Option<&ExperienceRecord> {
        self.log.last()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn fulfilled_count(&self) -> usize {
        self.log.iter().filter(|r| r.fulfilled).count()
    }

    /// Content digest salted with the clock and a per-instance sequence number.
    fn next_id(&mut self, act: &Act, object: &ObjectAsMeant) -> String {
        self.sequence += 1;
        let mut hasher = Sha256::new();
        hasher.update(act.act_type.as_bytes());
        hasher.update([0u8]);
        hasher.update(object.content.to_string().as_bytes());
        hasher.update([0u8]);
        hasher.update(now_unix_nanos().to_le_bytes());
        hasher.update(self.sequence.to_le_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..RECORD_ID_LEN].to_string()
    }
}

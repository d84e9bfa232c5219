use serde::{Deserialize, Serialize};

use crate::act::{Act, EvidenceGrade};
use crate::object::ObjectAsMeant;

/// Qualitative grade attached when evidence is brought to a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchQuality {
    Complete,
    Partial,
    Empty,
    Inadequate,
}

impl MatchQuality {
    /// Grade derived from the act's evidence grade alone.
    ///
    /// The evidence text only matters for adequate acts, and only as
    /// present/absent. Its content is never compared against the object.
    pub fn grade(evidence_grade: EvidenceGrade, evidence: &str) -> Self {
        match evidence_grade {
            EvidenceGrade::Apodictic => Self::Complete,
            EvidenceGrade::Adequate if !evidence.is_empty() => Self::Partial,
            EvidenceGrade::Adequate => Self::Empty,
            _ => Self::Inadequate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Partial => "partial",
            Self::Empty => "empty",
            Self::Inadequate => "inadequate",
        }
    }
}

/// Evidence attached to a record after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fulfillment {
    pub evidence: String,
    pub resolved_at: String,
    pub match_quality: MatchQuality,
}

/// One correlated act/object pair. Apart from `fulfillment`, nothing here
/// changes after the correlator creates it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub id: String,
    pub act: Act,
    pub object: ObjectAsMeant,
    pub created_at: String,
    pub fulfilled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfillment: Option<Fulfillment>,
}

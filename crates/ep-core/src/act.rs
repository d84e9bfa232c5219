use serde::{Deserialize, Serialize};

/// How strongly an act is grounded in evidence.
/// Only apodictic and adequate acts count as fulfilled.
///
/// Serializes lowercase. Deserializes leniently through
/// [`EvidenceGrade::from_str_lossy`], so unknown grades read as `Inadequate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum EvidenceGrade {
    /// Given with certainty; cannot be doubted.
    Apodictic,
    /// Given fully enough for the purpose at hand.
    Adequate,
    /// Asserted but not yet checked.
    Assertoric,
    /// Assumed on indirect grounds.
    Presumptive,
    /// Given only partially, or not at all.
    #[default]
    Inadequate,
}

impl EvidenceGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apodictic => "apodictic",
            Self::Adequate => "adequate",
            Self::Assertoric => "assertoric",
            Self::Presumptive => "presumptive",
            Self::Inadequate => "inadequate",
        }
    }

    /// Parse a grade, mapping anything unrecognized to `Inadequate`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "apodictic" => Self::Apodictic,
            "adequate" => Self::Adequate,
            "assertoric" => Self::Assertoric,
            "presumptive" => Self::Presumptive,
            _ => Self::Inadequate,
        }
    }

    /// Whether an act carrying this grade is evidentially fulfilled.
    pub fn is_fulfilling(&self) -> bool {
        matches!(self, Self::Apodictic | Self::Adequate)
    }
}

impl From<String> for EvidenceGrade {
    fn from(s: String) -> Self {
        Self::from_str_lossy(&s)
    }
}

/// The directed side of an experience: what kind of act, in which quality,
/// with how much attention and how much evidence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAct")]
pub struct Act {
    pub act_type: String,
    pub quality: String,
    pub attention: f64,
    pub evidence_grade: EvidenceGrade,
}

#[derive(Deserialize)]
struct RawAct {
    act_type: String,
    quality: String,
    attention: f64,
    #[serde(default)]
    evidence_grade: EvidenceGrade,
}

impl From<RawAct> for Act {
    fn from(raw: RawAct) -> Self {
        Self::new(raw.act_type, raw.quality, raw.attention, raw.evidence_grade)
    }
}

impl Act {
    /// Build an act. Attention is clamped into [0, 1]; NaN becomes 0.
    pub fn new(
        act_type: impl Into<String>,
        quality: impl Into<String>,
        attention: f64,
        evidence_grade: EvidenceGrade,
    ) -> Self {
        Self {
            act_type: act_type.into(),
            quality: quality.into(),
            attention: clamp_unit(attention),
            evidence_grade,
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        self.evidence_grade.is_fulfilling()
    }
}

/// Clamp into [0, 1], mapping NaN to 0.
pub(crate) fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

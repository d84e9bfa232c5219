//! epoche core: three bounded, stateful transformations over experience
//! records.
//!
//! - [`Correlator`] pairs an act with its object and tracks fulfillment.
//! - [`TemporalWindow`] keeps retained past, one current impression and
//!   pending anticipations, scoring anticipations by token overlap.
//! - [`ReductionEngine`] brackets configured keys out of a record and finds
//!   invariant keys across a batch.
//!
//! The engines never call each other and share no state. Zero I/O; callers
//! compose them and own any serialization.

pub mod act;
pub mod config;
pub mod constants;
pub mod correlator;
pub mod error;
pub mod object;
pub mod record;
pub mod reduction;
pub mod time;
pub mod tokenizer;
pub mod window;

pub use act::{Act, EvidenceGrade};
pub use config::{EngineConfig, ReductionPolicy, WindowConfig};
pub use constants::{DEFAULT_PROTENTION_CAPACITY, DEFAULT_RETENTION_CAPACITY};
pub use correlator::{Correlator, HorizonalAnalysis};
pub use error::CorrelatorError;
pub use object::{Horizon, ObjectAsMeant};
pub use record::{ExperienceRecord, Fulfillment, MatchQuality};
pub use reduction::{BracketedEntry, InvariantReport, Record, ReductionEngine, Residuum};
pub use tokenizer::{similarity, tokenize};
pub use window::{
    Anticipation, FlowState, Impression, Resolution, Retention, StreamSummary, TemporalWindow,
};

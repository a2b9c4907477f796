//! Redaction engine for scrub
//!
//! Entity detection, overlap resolution and the four redaction strategies.

pub mod analyzer;
pub mod anonymizer;
pub mod conflict;
pub mod encryption;
pub mod entity;
pub mod hashing;
pub mod priority;
pub mod redactor;
pub mod strategy;

pub use analyzer::{AnalyzeRequest, EntityAnalyzer, PatternAnalyzer, Recognizer};
pub use anonymizer::{Anonymizer, Operator, OperatorConfig, OperatorEngine};
pub use conflict::resolve_conflicts;
pub use encryption::EntityCipher;
pub use entity::DetectedEntity;
pub use hashing::{EntityHasher, normalize_entity_text};
pub use priority::entity_priority;
pub use redactor::{Redaction, Redactor, RedactorSettings};
pub use strategy::RedactionStrategy;

//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod sink;
pub mod source;

pub use sink::ArtifactSink;
pub use source::{PoiBatch, PoiSource, SkippedRow};

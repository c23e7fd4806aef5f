//! # collabbeats-shared
//!
//! Domain identifiers, typed models, and application constants shared by the
//! backend capability layer and the client feature services.
//!
//! Models mirror the wire-level document shapes of the external store: field
//! names are declared with explicit `#[serde(rename)]` attributes and every
//! denormalized counter carries `#[serde(default)]` so legacy documents that
//! predate a counter decode as zero instead of failing.

pub mod constants;
pub mod ids;
pub mod models;

pub use ids::*;
pub use models::*;

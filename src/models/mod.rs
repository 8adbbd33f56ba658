// src/models/mod.rs

//! Domain models for the search trigger.
//!
//! Records coming back from the Arr listing endpoints stay as raw
//! `serde_json::Value`; everything downstream works on the normalized
//! types defined here.

mod candidate;
mod flavor;
mod ledger;
mod settings;

// Re-export all public types
pub use candidate::{Candidate, Command, SourcePool};
pub use flavor::Flavor;
pub use ledger::CooldownLedger;
pub use settings::SelectionSettings;

/// Raw record from a `wanted/*` listing page.
pub type Record = serde_json::Value;

//! Pipeline stages for one search run.
//!
//! - `fetch`: page through the `wanted/missing` and `wanted/cutoff` listings
//! - `candidates`: turn raw records into keyed search candidates
//! - `select`: weighted pool choice, then a uniform pick
//! - `run`: the end-to-end cycle including trigger and ledger update

pub mod candidates;
pub mod fetch;
pub mod run;
pub mod select;

pub use candidates::build_candidates;
pub use fetch::{fetch_all, fetch_wanted, parse_page};
pub use run::{SearchOutcome, run_search, select_candidate};
pub use select::{choose_pool, pick_candidate};

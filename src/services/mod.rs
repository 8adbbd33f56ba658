//! Remote services used by the pipeline.

pub mod arr;

pub use arr::{ArrApi, ArrClient, ClientConfig, CommandStatus};

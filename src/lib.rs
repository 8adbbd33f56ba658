// src/lib.rs

//! foundarr: trigger one random search for missing or cutoff-unmet items
//! on a Radarr, Sonarr or Lidarr server, skipping items searched recently.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

//! Normalized search candidates and the commands that trigger them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which wanted list a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourcePool {
    /// No acceptable file at all
    Missing,
    /// Has a file below the quality cutoff
    CutoffUnmet,
}

impl SourcePool {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourcePool::Missing => "missing",
            SourcePool::CutoffUnmet => "cutoff-unmet",
        }
    }

    /// Listing endpoint relative to the API base.
    pub fn path(&self) -> &'static str {
        match self {
            SourcePool::Missing => "wanted/missing",
            SourcePool::CutoffUnmet => "wanted/cutoff",
        }
    }
}

impl fmt::Display for SourcePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search command posted to `{api_base}/command`.
///
/// Serializes to the Arr wire shape, e.g.
/// `{"name": "SeasonSearch", "seriesId": 7, "seasonNumber": 2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all_fields = "camelCase")]
pub enum Command {
    MoviesSearch { movie_ids: Vec<i64> },
    SeriesSearch { series_id: i64 },
    SeasonSearch { series_id: i64, season_number: i64 },
    EpisodeSearch { episode_ids: Vec<i64> },
    ArtistSearch { artist_id: i64 },
    AlbumSearch { album_ids: Vec<i64> },
}

impl Command {
    /// Command name as the server knows it.
    pub fn name(&self) -> &'static str {
        match self {
            Command::MoviesSearch { .. } => "MoviesSearch",
            Command::SeriesSearch { .. } => "SeriesSearch",
            Command::SeasonSearch { .. } => "SeasonSearch",
            Command::EpisodeSearch { .. } => "EpisodeSearch",
            Command::ArtistSearch { .. } => "ArtistSearch",
            Command::AlbumSearch { .. } => "AlbumSearch",
        }
    }
}

/// A triggerable unit derived from a wanted record.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Stable identity, prefixed with the target's scope key
    pub key: String,
    pub source_pool: SourcePool,
    pub command: Command,
    /// Human-readable description for logs only
    pub summary: String,
}

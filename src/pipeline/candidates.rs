// src/pipeline/candidates.rs

//! Candidate building: raw wanted records to normalized search candidates.
//!
//! Each flavor maps its own record shape onto the same [`Candidate`] form.
//! Keys are a pure function of the record and the scope key, so the same
//! item produces the same key on every run. Records with no usable id are
//! skipped; a live catalog routinely returns partial rows.

use crate::models::{Candidate, Command, Flavor, Record, SourcePool};
use crate::utils::{FieldPaths, as_int, first_id, first_text};

// Field order matters: existing ledgers were keyed with these precedences.
const MOVIE_ID: FieldPaths = &[&["id"], &["movieId"], &["movie", "id"]];
const MOVIE_TITLE: FieldPaths = &[&["title"], &["movie", "title"]];

const EPISODE_ID: FieldPaths = &[&["id"], &["episodeId"]];
const SERIES_ID: FieldPaths = &[&["seriesId"], &["series", "id"]];
const SERIES_TITLE: FieldPaths = &[&["series", "title"]];

const ALBUM_ID: FieldPaths = &[&["id"], &["albumId"]];
const ARTIST_ID: FieldPaths = &[&["artistId"], &["artist", "id"]];
const ARTIST_NAME: FieldPaths = &[&["artist", "artistName"], &["artist", "name"]];

const TITLE: FieldPaths = &[&["title"]];

const UNKNOWN: &str = "<unknown>";

/// Build candidates for every usable record of one pool.
pub fn build_candidates(
    flavor: Flavor,
    pool: SourcePool,
    scope_key: &str,
    records: &[Record],
) -> Vec<Candidate> {
    let candidates: Vec<Candidate> = records
        .iter()
        .filter_map(|record| {
            let (suffix, command, summary) = match flavor {
                Flavor::Radarr => movie(record)?,
                Flavor::Sonarr => series(record)?,
                Flavor::Lidarr => music(record)?,
            };
            Some(Candidate {
                key: format!("{}:{}", scope_key, suffix),
                source_pool: pool,
                command,
                summary,
            })
        })
        .collect();

    log::debug!(
        "{} valid candidates in {} pool: {}",
        flavor,
        pool,
        candidates.len()
    );
    candidates
}

type Built = (String, Command, String);

fn movie(record: &Record) -> Option<Built> {
    let movie_id = first_id(record, MOVIE_ID)?;
    let title = first_text(record, MOVIE_TITLE).unwrap_or(UNKNOWN);

    Some((
        format!("movie:{}", movie_id),
        Command::MoviesSearch {
            movie_ids: vec![movie_id],
        },
        format!("title={:?} movie_id={}", title, movie_id),
    ))
}

/// Season beats whole series beats single episode.
fn series(record: &Record) -> Option<Built> {
    let series_id = first_id(record, SERIES_ID);
    let season = record.get("seasonNumber").and_then(as_int);
    let series_name = first_text(record, SERIES_TITLE)
        .map(str::to_string)
        .or_else(|| series_id.map(|id| format!("<id:{}>", id)))
        .unwrap_or_else(|| UNKNOWN.to_string());

    match (series_id, season) {
        (Some(series_id), Some(season_number)) => Some((
            format!("series:{}:season:{}", series_id, season_number),
            Command::SeasonSearch {
                series_id,
                season_number,
            },
            format!("series={:?} season={}", series_name, season_number),
        )),
        (Some(series_id), None) => Some((
            format!("series:{}", series_id),
            Command::SeriesSearch { series_id },
            format!("series={:?}", series_name),
        )),
        (None, _) => {
            let episode_id = first_id(record, EPISODE_ID)?;
            let episode = record.get("episodeNumber").and_then(as_int);
            let title = first_text(record, TITLE).unwrap_or(UNKNOWN);
            Some((
                format!("episode:{}", episode_id),
                Command::EpisodeSearch {
                    episode_ids: vec![episode_id],
                },
                format!(
                    "series={:?} season={} episode={} title={:?}",
                    series_name,
                    display_opt(season),
                    display_opt(episode),
                    title
                ),
            ))
        }
    }
}

/// Album beats artist.
fn music(record: &Record) -> Option<Built> {
    let artist_id = first_id(record, ARTIST_ID);
    let artist_name = first_text(record, ARTIST_NAME)
        .map(str::to_string)
        .or_else(|| artist_id.map(|id| format!("<id:{}>", id)))
        .unwrap_or_else(|| UNKNOWN.to_string());

    if let Some(album_id) = first_id(record, ALBUM_ID) {
        let album = first_text(record, TITLE).unwrap_or(UNKNOWN);
        return Some((
            format!("album:{}", album_id),
            Command::AlbumSearch {
                album_ids: vec![album_id],
            },
            format!(
                "artist={:?} album={:?} album_id={}",
                artist_name, album, album_id
            ),
        ));
    }

    let artist_id = artist_id?;
    Some((
        format!("artist:{}", artist_id),
        Command::ArtistSearch { artist_id },
        format!("artist={:?} artist_id={}", artist_name, artist_id),
    ))
}

fn display_opt(value: Option<i64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

// src/pipeline/run.rs

//! Selection engine: fetch, build, cool down, pick, trigger, record.

use rand::Rng;

use crate::error::Result;
use crate::models::{Candidate, CooldownLedger, Record, SelectionSettings, SourcePool};
use crate::pipeline::{build_candidates, fetch_wanted, pick_candidate};
use crate::services::{ArrApi, CommandStatus};
use crate::storage::LedgerStorage;
use crate::utils::unix_now;

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Every candidate was cooling down or no record had a usable id
    NothingEligible,
    /// A command was accepted by the server
    Triggered {
        candidate: Candidate,
        status: CommandStatus,
    },
}

/// Fetch both pools and pick one eligible candidate.
///
/// Fetch errors propagate; the ledger is only read.
pub async fn select_candidate<R: Rng>(
    api: &dyn ArrApi,
    settings: &SelectionSettings,
    ledger: &CooldownLedger,
    now: f64,
    rng: &mut R,
) -> Result<Option<Candidate>> {
    let (missing_records, cutoff_records) = fetch_wanted(api, settings).await?;

    let eligible = |pool: SourcePool, records: &[Record]| {
        let candidates = build_candidates(settings.flavor, pool, &settings.scope_key, records);
        ledger.filter(candidates, now, settings.cooldown_seconds)
    };
    let missing = eligible(SourcePool::Missing, &missing_records);
    let cutoff = eligible(SourcePool::CutoffUnmet, &cutoff_records);

    Ok(pick_candidate(
        &missing,
        &cutoff,
        settings.missing_weight,
        settings.cutoff_weight,
        rng,
    ))
}

/// Run one complete selection-and-trigger cycle.
///
/// The ledger is persisted only after the server accepted the command; a
/// failed save is logged and does not fail the run.
pub async fn run_search<R: Rng>(
    api: &dyn ArrApi,
    settings: &SelectionSettings,
    storage: &dyn LedgerStorage,
    rng: &mut R,
) -> Result<SearchOutcome> {
    let now = unix_now();
    let mut ledger = storage.load().await;
    ledger.prune(now, settings.cooldown_seconds);

    log::debug!(
        "Config arr_type={} api_base={} page_size={} missing_weight={} cutoff_weight={} \
         cooldown_seconds={} state_path={} state_entries={}",
        settings.flavor,
        settings.api_base,
        settings.page_size,
        settings.missing_weight,
        settings.cutoff_weight,
        settings.cooldown_seconds,
        storage.location(),
        ledger.len()
    );

    let Some(candidate) = select_candidate(api, settings, &ledger, now, rng).await? else {
        log::warn!(
            "No eligible missing/cutoff-unmet entries remain after cooldown (cooldown_hours={:.2}).",
            settings.cooldown_hours()
        );
        return Ok(SearchOutcome::NothingEligible);
    };

    log::info!(
        "Selected {} item for {}: {}",
        candidate.source_pool,
        candidate.command.name(),
        candidate.summary
    );
    let payload = serde_json::to_string(&candidate.command)?;
    log::debug!("Command payload: {}", payload);

    let status = api.post_command(&candidate.command).await?;

    ledger.record(&candidate.key, unix_now(), settings.cooldown_seconds);
    if let Err(e) = storage.save(&ledger).await {
        log::warn!("Failed to write state file {}: {}", storage.location(), e);
    }

    log::info!(
        "Triggered {} (command id={}, status={})",
        candidate.command.name(),
        status.id.map_or_else(|| "None".to_string(), |id| id.to_string()),
        status.status.as_deref().unwrap_or("None")
    );

    Ok(SearchOutcome::Triggered { candidate, status })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{Command, Flavor};
    use crate::services::arr::fake::FakeArr;
    use crate::storage::LocalLedger;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;
    use tempfile::TempDir;

    fn settings(flavor: Flavor, cooldown_seconds: f64) -> SelectionSettings {
        SelectionSettings::new(flavor, "http://arr:7878", 250, (50.0, 50.0), cooldown_seconds)
    }

    #[tokio::test]
    async fn test_movie_single_candidate_triggers() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalLedger::new(tmp.path().join("state.json"));
        let api = FakeArr::new().with_pages(
            "wanted/missing",
            vec![json!({"records": [{"id": 42, "title": "Heat"}], "totalRecords": 1})],
        );
        let settings = settings(Flavor::Radarr, 86400.0);
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = run_search(&api, &settings, &storage, &mut rng).await.unwrap();

        let SearchOutcome::Triggered { candidate, status } = outcome else {
            panic!("expected a triggered search");
        };
        assert_eq!(
            candidate.command,
            Command::MoviesSearch {
                movie_ids: vec![42]
            }
        );
        assert_eq!(status.id, Some(1001));
        assert_eq!(api.sent_commands(), vec![candidate.command.clone()]);

        let ledger = storage.load().await;
        assert!(ledger.get("radarr:http://arr:7878/api/v3:movie:42").is_some());
    }

    #[tokio::test]
    async fn test_series_season_precedence() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalLedger::new(tmp.path().join("state.json"));
        let api = FakeArr::new().with_pages(
            "wanted/cutoff",
            vec![json!({"records": [{"id": 900, "seriesId": 7, "seasonNumber": 2}]})],
        );
        let settings = settings(Flavor::Sonarr, 0.0);
        let mut rng = StdRng::seed_from_u64(2);

        let outcome = run_search(&api, &settings, &storage, &mut rng).await.unwrap();

        match outcome {
            SearchOutcome::Triggered { candidate, .. } => {
                assert_eq!(candidate.source_pool, SourcePool::CutoffUnmet);
                assert_eq!(
                    candidate.command,
                    Command::SeasonSearch {
                        series_id: 7,
                        season_number: 2
                    }
                );
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let requests = api.requests.lock().unwrap();
        assert!(
            requests
                .iter()
                .all(|(_, q)| q.contains(&("includeSeries".to_string(), "true".to_string())))
        );
    }

    #[tokio::test]
    async fn test_all_cooled_down_is_nothing_eligible() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalLedger::new(tmp.path().join("state.json"));
        let now = unix_now();
        let mut ledger = CooldownLedger::new();
        ledger.record("radarr:http://arr:7878/api/v3:movie:1", now - 60.0, 3600.0);
        ledger.record("radarr:http://arr:7878/api/v3:movie:2", now - 60.0, 3600.0);
        storage.save(&ledger).await.unwrap();
        let before = std::fs::read(storage.path()).unwrap();

        let api = FakeArr::new()
            .with_pages("wanted/missing", vec![json!({"records": [{"id": 1}]})])
            .with_pages("wanted/cutoff", vec![json!({"records": [{"movieId": 2}]})]);
        let mut rng = StdRng::seed_from_u64(3);

        let outcome = run_search(&api, &settings(Flavor::Radarr, 3600.0), &storage, &mut rng)
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::NothingEligible);
        assert!(api.sent_commands().is_empty());
        assert_eq!(std::fs::read(storage.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_malformed_records_aborts_without_persisting() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalLedger::new(tmp.path().join("state.json"));
        let api = FakeArr::new()
            .with_pages("wanted/missing", vec![json!({"records": "not a list"})]);
        let mut rng = StdRng::seed_from_u64(4);

        let result = run_search(&api, &settings(Flavor::Radarr, 3600.0), &storage, &mut rng).await;

        assert!(matches!(result, Err(AppError::UnexpectedResponse { .. })));
        assert!(api.sent_commands().is_empty());
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn test_transport_failure_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalLedger::new(tmp.path().join("state.json"));
        let api = FakeArr::new().failing(503);
        let mut rng = StdRng::seed_from_u64(5);

        let result = run_search(&api, &settings(Flavor::Lidarr, 3600.0), &storage, &mut rng).await;

        match result {
            Err(AppError::Status { status, .. }) => assert_eq!(status, 503),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn test_cooldown_steers_selection() {
        let now = unix_now();
        let mut ledger = CooldownLedger::new();
        ledger.record("radarr:http://arr:7878/api/v3:movie:1", now, 3600.0);
        let api = FakeArr::new().with_pages(
            "wanted/missing",
            vec![json!({"records": [{"id": 1}, {"id": 2}]})],
        );
        let settings = settings(Flavor::Radarr, 3600.0);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = select_candidate(&api, &settings, &ledger, now, &mut rng)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(picked.key, "radarr:http://arr:7878/api/v3:movie:2");
        }
    }

    #[tokio::test]
    async fn test_save_failure_does_not_fail_run() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let storage = LocalLedger::new(blocker.join("state.json"));
        let api = FakeArr::new()
            .with_pages("wanted/missing", vec![json!({"records": [{"artistId": 8}]})]);
        let mut rng = StdRng::seed_from_u64(6);

        let outcome = run_search(&api, &settings(Flavor::Lidarr, 3600.0), &storage, &mut rng)
            .await
            .unwrap();

        assert!(matches!(outcome, SearchOutcome::Triggered { .. }));
        assert_eq!(api.sent_commands(), vec![Command::ArtistSearch { artist_id: 8 }]);
    }
}

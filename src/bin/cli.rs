//! foundarr CLI
//!
//! Picks one random missing or cutoff-unmet item and triggers an Arr search.
//! Meant to be run periodically by cron or a systemd timer.

use std::process::ExitCode;

use clap::Parser;
use foundarr::{
    config::{RawConfig, resolve_log_level},
    error::Result,
    pipeline::{self, SearchOutcome},
    services::ArrClient,
    storage::LocalLedger,
};

/// foundarr - random Arr search trigger
#[derive(Parser, Debug)]
#[command(
    name = "foundarr",
    version,
    about = "Pick one random missing/cutoff-unmet item and trigger an Arr search."
)]
struct Cli {
    /// radarr, sonarr, or lidarr
    #[arg(long = "type", env = "ARR_TYPE")]
    arr_type: Option<String>,

    /// Arr hostname, with or without http/https
    #[arg(long, env = "ARR_HOSTNAME")]
    hostname: Option<String>,

    /// Arr API key
    #[arg(long, env = "ARR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Relative weight for missing items (default: 50)
    #[arg(long, env = "ARR_MISSING_WEIGHT")]
    missing_weight: Option<f64>,

    /// Relative weight for cutoff-unmet items (default: 50)
    #[arg(long, env = "ARR_CUTOFF_UNMET_WEIGHT")]
    cutoff_unmet_weight: Option<f64>,

    /// Records requested per page (default: 250)
    #[arg(long, env = "ARR_PAGE_SIZE")]
    page_size: Option<u32>,

    /// Hours before the same item may be searched again; 0 disables (default: 24)
    #[arg(long, env = "ARR_SEARCH_COOLDOWN_HOURS")]
    cooldown_hours: Option<f64>,

    /// Cooldown state file (default: $XDG_STATE_HOME/search-not-foundarr/state.json)
    #[arg(long, env = "ARR_STATE_FILE")]
    state_file: Option<String>,

    /// Increase log verbosity by one step per use (INFO -> DEBUG -> TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease log verbosity by one step per use (INFO -> WARN -> ERROR -> OFF)
    #[arg(short, long, action = clap::ArgAction::Count)]
    quiet: u8,
}

impl From<Cli> for RawConfig {
    fn from(cli: Cli) -> Self {
        Self {
            flavor: cli.arr_type,
            hostname: cli.hostname,
            api_key: cli.api_key,
            missing_weight: cli.missing_weight,
            cutoff_weight: cli.cutoff_unmet_weight,
            page_size: cli.page_size,
            cooldown_hours: cli.cooldown_hours,
            state_file: cli.state_file,
        }
    }
}

/// Initialize logging at the resolved level.
fn init_logging(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_secs()
        .init();
}

async fn run(cli: Cli) -> Result<SearchOutcome> {
    let config = RawConfig::from(cli).resolve()?;
    let settings = &config.settings;

    let api = ArrClient::new(&settings.api_base, &config.api_key, &config.client)?;
    let storage = LocalLedger::new(&config.state_path);
    let mut rng = rand::rng();

    pipeline::run_search(&api, settings, &storage, &mut rng).await
}

/// Nothing eligible is a normal outcome; only errors fail the process.
fn exit_code(result: &Result<SearchOutcome>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };
    init_logging(resolve_log_level(cli.verbose, cli.quiet));

    let result = run(cli).await;
    if let Err(e) = &result {
        log::error!("{}", e);
    }
    exit_code(&result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundarr::error::AppError;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("foundarr").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&Ok(SearchOutcome::NothingEligible)), ExitCode::SUCCESS);
        assert_eq!(
            exit_code(&Err(AppError::config("Weights must be non-negative"))),
            ExitCode::FAILURE
        );
        assert_eq!(
            exit_code(&Err(AppError::unexpected("wanted/missing", "records is not a list"))),
            ExitCode::FAILURE
        );
    }

    #[tokio::test]
    async fn test_invalid_weight_fails_before_any_request() {
        let cli = cli(&[
            "--type",
            "radarr",
            "--hostname",
            "127.0.0.1:9",
            "--api-key",
            "k",
            "--missing-weight=-1",
            "--state-file",
            "/nonexistent/state.json",
        ]);

        let result = run(cli).await;

        assert!(matches!(result, Err(AppError::Config(_))));
        assert_eq!(exit_code(&result), ExitCode::FAILURE);
    }

    #[test]
    fn test_verbosity_flags_count() {
        let cli = cli(&["-vv", "-q"]);
        assert_eq!(resolve_log_level(cli.verbose, cli.quiet), log::LevelFilter::Debug);
    }
}

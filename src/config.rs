// src/config.rs

//! Configuration resolution.
//!
//! Raw values come from CLI flags with environment fallbacks (see the
//! binary); this module validates them into an immutable [`RunConfig`].

use std::path::{Path, PathBuf};

use log::LevelFilter;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Flavor, SelectionSettings};
use crate::services::ClientConfig;

pub const DEFAULT_PAGE_SIZE: u32 = 250;
pub const DEFAULT_COOLDOWN_HOURS: f64 = 24.0;
pub const DEFAULT_WEIGHT: f64 = 50.0;

const STATE_DIR_NAME: &str = "search-not-foundarr";
const STATE_FILE_NAME: &str = "state.json";

/// Unvalidated configuration as supplied by the user.
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    pub flavor: Option<String>,
    pub hostname: Option<String>,
    pub api_key: Option<String>,
    pub missing_weight: Option<f64>,
    pub cutoff_weight: Option<f64>,
    pub page_size: Option<u32>,
    pub cooldown_hours: Option<f64>,
    pub state_file: Option<String>,
}

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub settings: SelectionSettings,
    pub api_key: String,
    pub state_path: PathBuf,
    pub client: ClientConfig,
}

impl RawConfig {
    /// Validate into a [`RunConfig`].
    pub fn resolve(self) -> Result<RunConfig> {
        let flavor: Flavor = required(self.flavor, "--type", "ARR_TYPE")?.parse()?;
        let host = normalize_host(&required(self.hostname, "--hostname", "ARR_HOSTNAME")?)?;
        let weights = resolve_weights(self.missing_weight, self.cutoff_weight)?;
        let page_size = resolve_page_size(self.page_size)?;
        let cooldown_seconds = resolve_cooldown_seconds(self.cooldown_hours)?;
        let state_path = resolve_state_path(self.state_file.as_deref())?;
        let api_key = required(self.api_key, "--api-key", "ARR_API_KEY")?;

        Ok(RunConfig {
            settings: SelectionSettings::new(flavor, &host, page_size, weights, cooldown_seconds),
            api_key,
            state_path,
            client: ClientConfig::default(),
        })
    }
}

/// Trimmed value, or an error naming both the flag and its variable.
fn required(value: Option<String>, option: &str, env: &str) -> Result<String> {
    required_with(value, option, env, |name| std::env::var(name).ok())
}

/// A blank flag still falls back to the variable; clap only reads it when
/// the flag is absent.
fn required_with<F>(value: Option<String>, option: &str, env: &str, lookup: F) -> Result<String>
where
    F: FnOnce(&str) -> Option<String>,
{
    let non_blank = |v: String| Some(v.trim().to_string()).filter(|v| !v.is_empty());

    value
        .and_then(non_blank)
        .or_else(|| lookup(env).and_then(non_blank))
        .ok_or_else(|| AppError::config(format!("Missing required value: {option} (or {env})")))
}

/// Add a scheme when absent and strip trailing slashes.
pub fn normalize_host(hostname: &str) -> Result<String> {
    let host = hostname.trim().trim_end_matches('/');
    if host.is_empty() {
        return Err(AppError::config("ARR_HOSTNAME is empty"));
    }

    let host = if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{host}")
    };

    Url::parse(&host)
        .map_err(|e| AppError::config(format!("ARR_HOSTNAME is not a valid URL ({host}): {e}")))?;
    Ok(host)
}

/// Default to 50/50; both non-negative and not both zero.
pub fn resolve_weights(missing: Option<f64>, cutoff: Option<f64>) -> Result<(f64, f64)> {
    let missing = missing.unwrap_or(DEFAULT_WEIGHT);
    let cutoff = cutoff.unwrap_or(DEFAULT_WEIGHT);

    if !missing.is_finite() || !cutoff.is_finite() {
        return Err(AppError::config("Weights must be finite numbers"));
    }
    if missing < 0.0 || cutoff < 0.0 {
        return Err(AppError::config("Weights must be non-negative"));
    }
    if missing == 0.0 && cutoff == 0.0 {
        return Err(AppError::config(
            "At least one weight must be greater than zero",
        ));
    }
    Ok((missing, cutoff))
}

fn resolve_page_size(page_size: Option<u32>) -> Result<u32> {
    match page_size.unwrap_or(DEFAULT_PAGE_SIZE) {
        0 => Err(AppError::config("ARR_PAGE_SIZE must be at least 1")),
        size => Ok(size),
    }
}

/// Cooldown hours to seconds.
pub fn resolve_cooldown_seconds(hours: Option<f64>) -> Result<f64> {
    let hours = hours.unwrap_or(DEFAULT_COOLDOWN_HOURS);
    if !hours.is_finite() {
        return Err(AppError::config("ARR_SEARCH_COOLDOWN_HOURS must be a number"));
    }
    if hours < 0.0 {
        return Err(AppError::config(
            "ARR_SEARCH_COOLDOWN_HOURS must be non-negative",
        ));
    }
    Ok(hours * 3600.0)
}

/// Explicit path (with `~` expanded), else the XDG state directory.
pub fn resolve_state_path(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(raw) = explicit.map(str::trim).filter(|p| !p.is_empty()) {
        return expand_home(raw);
    }

    let state_root = match std::env::var_os("XDG_STATE_HOME").filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => home_dir()?.join(".local").join("state"),
    };
    Ok(default_state_path(&state_root))
}

fn default_state_path(state_root: &Path) -> PathBuf {
    state_root.join(STATE_DIR_NAME).join(STATE_FILE_NAME)
}

fn expand_home(path: &str) -> Result<PathBuf> {
    if path == "~" {
        return home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => Ok(home_dir()?.join(rest)),
        None => Ok(PathBuf::from(path)),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| AppError::config("Cannot determine home directory; set ARR_STATE_FILE"))
}

/// Resolve `-v`/`-q` counters into one level, starting from Info.
pub fn resolve_log_level(verbose: u8, quiet: u8) -> LevelFilter {
    const LEVELS: [LevelFilter; 6] = [
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];
    let index = (3 + i32::from(verbose) - i32::from(quiet)).clamp(0, LEVELS.len() as i32 - 1);
    LEVELS[index as usize]
}

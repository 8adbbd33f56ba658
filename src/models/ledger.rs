//! Cooldown ledger: when each candidate key was last triggered.

use std::collections::BTreeMap;

use super::Candidate;

/// Mapping from candidate key to last-trigger unix timestamp (seconds).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CooldownLedger {
    entries: BTreeMap<String, f64>,
}

impl CooldownLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: BTreeMap<String, f64>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &BTreeMap<String, f64> {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Seconds left before `key` may be triggered again, if it is still cooling down.
    pub fn remaining(&self, key: &str, now: f64, cooldown_seconds: f64) -> Option<f64> {
        if cooldown_seconds <= 0.0 {
            return None;
        }
        let elapsed = now - self.get(key)?;
        (elapsed < cooldown_seconds).then(|| cooldown_seconds - elapsed)
    }

    /// Drop entries older than the cooldown window.
    ///
    /// No-op when cooldown is disabled.
    pub fn prune(&mut self, now: f64, cooldown_seconds: f64) {
        if cooldown_seconds <= 0.0 {
            return;
        }
        self.entries
            .retain(|_, last| now - *last < cooldown_seconds);
    }

    /// Keep only candidates that are not cooling down.
    pub fn filter(
        &self,
        candidates: Vec<Candidate>,
        now: f64,
        cooldown_seconds: f64,
    ) -> Vec<Candidate> {
        if cooldown_seconds <= 0.0 {
            return candidates;
        }

        let total = candidates.len();
        let eligible: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| match self.remaining(&candidate.key, now, cooldown_seconds) {
                Some(remaining) => {
                    log::debug!(
                        "Cooldown skip key={} remaining={:.0}s",
                        candidate.key,
                        remaining
                    );
                    false
                }
                None => true,
            })
            .collect();

        log::debug!(
            "Eligible candidates after cooldown: {}/{} (blocked={})",
            eligible.len(),
            total,
            total - eligible.len()
        );
        eligible
    }

    /// Stamp `key` with `now`, then prune.
    pub fn record(&mut self, key: &str, now: f64, cooldown_seconds: f64) {
        self.entries.insert(key.to_string(), now);
        self.prune(now, cooldown_seconds);
    }
}

//! Immutable selection settings for one run.

use super::Flavor;

/// Parameters controlling candidate fetch, filter and selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSettings {
    pub flavor: Flavor,
    /// e.g. `http://localhost:8989/api/v3`
    pub api_base: String,
    pub page_size: u32,
    /// Prefix for candidate keys, unique per (flavor, server)
    pub scope_key: String,
    pub missing_weight: f64,
    pub cutoff_weight: f64,
    /// 0 disables cooldown filtering
    pub cooldown_seconds: f64,
}

impl SelectionSettings {
    /// Build settings for a normalized host such as `http://localhost:7878`.
    pub fn new(
        flavor: Flavor,
        host: &str,
        page_size: u32,
        (missing_weight, cutoff_weight): (f64, f64),
        cooldown_seconds: f64,
    ) -> Self {
        let api_base = format!("{}/api/{}", host, flavor.api_version());
        let scope_key = format!("{}:{}", flavor, api_base);
        Self {
            flavor,
            api_base,
            page_size,
            scope_key,
            missing_weight,
            cutoff_weight,
            cooldown_seconds,
        }
    }

    pub fn cooldown_hours(&self) -> f64 {
        self.cooldown_seconds / 3600.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_key_includes_flavor_and_base() {
        let settings =
            SelectionSettings::new(Flavor::Lidarr, "http://music:8686", 250, (50.0, 50.0), 0.0);
        assert_eq!(settings.api_base, "http://music:8686/api/v1");
        assert_eq!(settings.scope_key, "lidarr:http://music:8686/api/v1");
    }

    #[test]
    fn test_cooldown_hours() {
        let settings =
            SelectionSettings::new(Flavor::Radarr, "http://m", 250, (1.0, 0.0), 7200.0);
        assert_eq!(settings.cooldown_hours(), 2.0);
    }
}

//! Arr application flavors.

use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Which Arr application is targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    /// Movie library manager
    Radarr,
    /// Episode-oriented TV library manager
    Sonarr,
    /// Music library manager
    Lidarr,
}

impl Flavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flavor::Radarr => "radarr",
            Flavor::Sonarr => "sonarr",
            Flavor::Lidarr => "lidarr",
        }
    }

    /// API version path segment.
    pub fn api_version(&self) -> &'static str {
        match self {
            Flavor::Lidarr => "v1",
            Flavor::Radarr | Flavor::Sonarr => "v3",
        }
    }

    /// Extra query parameters sent to the `wanted/*` endpoints.
    pub fn wanted_params(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Flavor::Radarr => &[],
            Flavor::Sonarr => &[("includeSeries", "true")],
            Flavor::Lidarr => &[("includeArtist", "true")],
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flavor {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "radarr" => Ok(Flavor::Radarr),
            "sonarr" => Ok(Flavor::Sonarr),
            "lidarr" => Ok(Flavor::Lidarr),
            _ => Err(AppError::config(
                "ARR_TYPE must be 'radarr', 'sonarr', or 'lidarr'",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Sonarr".parse::<Flavor>().unwrap(), Flavor::Sonarr);
        assert_eq!(" LIDARR ".parse::<Flavor>().unwrap(), Flavor::Lidarr);
        assert!(matches!(
            "readarr".parse::<Flavor>(),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_api_version() {
        assert_eq!(Flavor::Radarr.api_version(), "v3");
        assert_eq!(Flavor::Sonarr.api_version(), "v3");
        assert_eq!(Flavor::Lidarr.api_version(), "v1");
    }

    #[test]
    fn test_wanted_params() {
        assert!(Flavor::Radarr.wanted_params().is_empty());
        assert_eq!(Flavor::Sonarr.wanted_params(), &[("includeSeries", "true")]);
        assert_eq!(Flavor::Lidarr.wanted_params(), &[("includeArtist", "true")]);
    }
}

//! Collector configuration.

use serde::{Deserialize, Serialize};

/// Runtime switches for the collection engine.
///
/// Production mode silences the developer-facing output (the debug mirror
/// of each record and the slow-resource warnings). Collection itself and
/// the sink offer are unaffected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Suppress the record mirror and slow-resource diagnostics.
    pub production: bool,
}

impl CollectorConfig {
    /// Read the config from the process environment.
    ///
    /// `PAGEWATCH_ENV=production` (case-insensitive) enables production
    /// mode; any other value, or an unset variable, leaves it off.
    pub fn from_env() -> Self {
        Self {
            production: is_production(std::env::var("PAGEWATCH_ENV").ok().as_deref()),
        }
    }
}

fn is_production(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("production"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_flag_matches_case_insensitively() {
        assert!(is_production(Some("production")));
        assert!(is_production(Some("PRODUCTION")));
        assert!(is_production(Some("Production")));
    }

    #[test]
    fn other_values_stay_in_development() {
        assert!(!is_production(None));
        assert!(!is_production(Some("")));
        assert!(!is_production(Some("development")));
        assert!(!is_production(Some("prod")));
    }

    #[test]
    fn default_is_development() {
        assert!(!CollectorConfig::default().production);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let config: CollectorConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.production);
    }
}

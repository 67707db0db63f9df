//! Session fixture loading.
//!
//! A fixture is a JSON snapshot of one page session: the navigation
//! record, the resource-timing entries, and a script of vitals with
//! delivery offsets. Replaying one assembles the same inputs a live page
//! would have produced, minus the page.

use std::path::Path;

use serde::{Deserialize, Serialize};

use pagewatch_collector::{
    NavigationTiming, ResourceTiming, ScriptedVital, ScriptedVitalsSource, StaticEnvironment,
};

/// One recorded page session.
///
/// Every section is optional; an empty fixture replays a session in which
/// the page produced no signals at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionFixture {
    /// Page-load navigation record.
    pub navigation: Option<NavigationTiming>,
    /// Resource-timing buffer contents.
    pub resources: Vec<ResourceTiming>,
    /// Vitals script, expected in non-decreasing `after_ms` order.
    pub vitals: Vec<ScriptedVital>,
}

impl SessionFixture {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let fixture: SessionFixture = serde_json::from_str(&content)?;
        Ok(fixture)
    }

    /// The environment snapshot this fixture describes.
    pub fn environment(&self) -> StaticEnvironment {
        let mut environment = StaticEnvironment::new().with_resources(self.resources.clone());
        if let Some(navigation) = self.navigation {
            environment = environment.with_navigation(navigation);
        }
        environment
    }

    /// Timed vitals source, when the fixture scripts any vitals.
    pub fn vitals_source(&self) -> Option<ScriptedVitalsSource> {
        if self.vitals.is_empty() {
            None
        } else {
            Some(ScriptedVitalsSource::timed(self.vitals.clone()))
        }
    }
}

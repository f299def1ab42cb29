//! FILENAME: app/orchestrator/src/config.rs
//! PURPOSE: Dashboard-wide settings for rendering, debouncing and logging.
//! CONTEXT: Every field has a default, so a host can pass `{}` or only the
//! keys it cares about.

use std::path::PathBuf;
use std::time::Duration;

use engine::{ChartLibrary, Widget};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const MIN_DEBOUNCE_MS: u64 = 100;
const MAX_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    pub resize_debounce_ms: u64,
    pub sticky_debounce_ms: u64,
    /// Backend for widgets that do not pick one.
    pub default_library: ChartLibrary,
    /// Palette for widgets that do not pick one.
    pub default_palette: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    /// Shown in place of a widget whose fetch failed.
    pub nodata_message: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            resize_debounce_ms: 150,
            sticky_debounce_ms: 150,
            default_library: ChartLibrary::default(),
            default_palette: "default".to_string(),
            log_file: None,
            log_level: "info".to_string(),
            nodata_message: "Unable to load data for this widget".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn resize_debounce(&self) -> Duration {
        clamp_debounce(self.resize_debounce_ms)
    }

    pub fn sticky_debounce(&self) -> Duration {
        clamp_debounce(self.sticky_debounce_ms)
    }

    /// Fills in the library and palette a widget left unset.
    pub fn apply_defaults(&self, widget: &Widget) -> Widget {
        let mut resolved = widget.clone();
        if resolved.chart_library.is_none() {
            resolved.chart_library = Some(self.default_library);
        }
        if resolved.color_palette.is_none() {
            resolved.color_palette = Some(self.default_palette.clone());
        }
        resolved
    }
}

fn clamp_debounce(ms: u64) -> Duration {
    Duration::from_millis(ms.clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS))
}

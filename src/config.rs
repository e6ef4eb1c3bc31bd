use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::debounce::DEFAULT_DEBOUNCE_MS;

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

/// Where to load data from at startup, and how long to wait for filters to settle.
///
/// Every option falls back to a `PFAS_MAP_*` environment variable; command
/// line values win.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(
    name = "pfas-map",
    version,
    about = "Choropleth of PFAS readings in Maine towns"
)]
pub struct AppConfig {
    /// Sample table (.csv, .json, .parquet); pick one from the File menu if omitted
    #[arg(env = "PFAS_MAP_SAMPLES", value_name = "SAMPLES")]
    pub samples: Option<PathBuf>,

    /// Town boundaries (GeoJSON)
    #[arg(env = "PFAS_MAP_TOWNS", value_name = "TOWNS")]
    pub towns: Option<PathBuf>,

    /// Quiet period after the last filter edit before the map is recomputed
    #[arg(long, env = "PFAS_MAP_DEBOUNCE_MS", value_name = "MS", default_value_t = DEFAULT_DEBOUNCE_MS)]
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            samples: None,
            towns: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl AppConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

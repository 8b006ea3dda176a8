use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Samples kept on each side of the requested window, per unit of the
/// request's resolution hint, so rendered graphs reach the window edges.
pub const DEFAULT_GRAPH_PAD_SAMPLES: usize = 1;
pub const DEFAULT_MAX_CSV_ROWS: usize = 10_000;
pub const DEFAULT_MAX_CSV_COLUMNS: usize = 256;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Base number of boundary samples kept outside the window on each side.
    /// The effective count is scaled linearly by the request's resolution hint.
    pub graph_pad_samples: usize,

    /// Upper bound on data rows parsed out of a CSV-valued metric.
    pub max_csv_rows: usize,

    /// Upper bound on columns parsed out of a CSV-valued metric.
    pub max_csv_columns: usize,

    /// Whether a metric with no samples inside the padded window still yields
    /// an empty frame. When false such metrics are skipped entirely.
    pub keep_empty_frames: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            graph_pad_samples: DEFAULT_GRAPH_PAD_SAMPLES,
            max_csv_rows: DEFAULT_MAX_CSV_ROWS,
            max_csv_columns: DEFAULT_MAX_CSV_COLUMNS,
            keep_empty_frames: true,
        }
    }
}

impl Settings {
    fn from_env() -> Self {
        let defaults = Settings::default();
        Settings {
            graph_pad_samples: get_setting_from_env("PMVIEW_GRAPH_PAD_SAMPLES")
                .unwrap_or(defaults.graph_pad_samples),
            max_csv_rows: get_setting_from_env("PMVIEW_MAX_CSV_ROWS")
                .unwrap_or(defaults.max_csv_rows),
            max_csv_columns: get_setting_from_env("PMVIEW_MAX_CSV_COLUMNS")
                .unwrap_or(defaults.max_csv_columns),
            keep_empty_frames: get_setting_from_env("PMVIEW_KEEP_EMPTY_FRAMES")
                .unwrap_or(defaults.keep_empty_frames),
        }
    }
}

static GLOBAL_SETTINGS: OnceLock<Settings> = OnceLock::new();

pub fn get_global_settings() -> &'static Settings {
    GLOBAL_SETTINGS.get_or_init(Settings::from_env)
}

fn get_setting_from_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse::<T>().ok())
}

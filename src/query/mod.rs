mod align;
mod csv;
mod derive;
mod processor;
mod table;
mod time_series;
mod types;
mod window;

pub use align::*;
pub use derive::*;
pub use processor::*;
pub use types::*;
pub use window::*;

pub use csv::build_csv_frame;
pub use table::build_metrics_table_frame;
pub use time_series::{build_heatmap_frames, build_time_series_frames};

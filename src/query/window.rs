use crate::config::get_global_settings;
use crate::query::types::TimeWindow;
use crate::series::MetricSample;

/// Contiguous sub-sequence of a sample buffer satisfying a window plus its
/// padding rules. `lookback` counts the leading samples that were selected
/// only so the first padded point of a counter metric has a predecessor to
/// derive from; identity passthrough skips them.
#[derive(Debug)]
pub struct SelectedWindow<'a> {
    pub samples: &'a [MetricSample],
    pub lookback: usize,
}

impl<'a> SelectedWindow<'a> {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The most recent selected sample, used by snapshot-style formats.
    pub fn latest(&self) -> Option<&'a MetricSample> {
        self.samples.last()
    }
}

/// Picks the minimal sub-sequence of `samples` covering `window`.
///
/// All samples inside the window are kept. Up to `pad` samples immediately
/// before and after the window are kept in addition, so rendered graphs
/// reach the window edges, where `pad` is the configured base count scaled
/// by the request's resolution hint. Counter metrics keep up to `pad`
/// further samples before the left pad: deriving the left pad's rate needs
/// its own predecessor, and without it the visible start of the graph
/// shifts inward.
///
/// Fewer available samples than the padding asks for is not an error.
pub fn select_window<'a>(
    samples: &'a [MetricSample],
    window: &TimeWindow,
    counter: bool,
    resolution_hint: u32,
) -> SelectedWindow<'a> {
    let pad = get_global_settings().graph_pad_samples * resolution_hint.max(1) as usize;

    // First sample inside the window and first sample past it.
    let window_start = samples.partition_point(|s| s.timestamp_ms < window.from_ms);
    let window_end = samples.partition_point(|s| s.timestamp_ms <= window.to_ms);

    let left_pad = window_start.min(pad);
    let mut start = window_start - left_pad;
    let lookback = if counter { start.min(pad) } else { 0 };
    start -= lookback;

    let right_pad = (samples.len() - window_end).min(pad);
    let end = window_end + right_pad;

    SelectedWindow {
        samples: &samples[start..end],
        lookback,
    }
}

use crate::config::get_global_settings;
use crate::error::{QueryError, QueryResult};
use crate::frames::Frame;
use crate::query::align::{align_instances, AlignedMetric};
use crate::query::csv::build_csv_frame;
use crate::query::derive::{derive_instance_series, DeriveMode};
use crate::query::table::build_metrics_table_frame;
use crate::query::time_series::{build_heatmap_frames, build_time_series_frames};
use crate::query::types::{
    QueryRequest, QueryResponse, TargetError, TargetFormat, TargetQuery, TargetResult, TimeWindow,
};
use crate::query::window::{select_window, SelectedWindow};
use crate::series::{InstanceId, MetricSeries};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Runs one refresh request against the collector-supplied target data.
///
/// Targets are processed independently and their frames appended in request
/// order. A target whose endpoint or query is in an error state
/// short-circuits to an error descriptor without touching the pipeline, and
/// one target's failure never aborts the others.
pub fn process_queries(request: &QueryRequest, results: &[TargetResult]) -> QueryResponse {
    let mut response = QueryResponse::default();

    for target in &request.targets {
        let mut found = false;
        for result in results.iter().filter(|r| r.query.ref_id == target.ref_id) {
            found = true;
            process_target(request, target, result, &mut response);
        }
        if !found {
            // not polled yet, nothing to render
            debug!(ref_id = %target.ref_id, "no collected data for target");
        }
    }
    response
}

fn process_target(
    request: &QueryRequest,
    target: &TargetQuery,
    result: &TargetResult,
    response: &mut QueryResponse,
) {
    if let Some(message) = result.error_message() {
        warn!(ref_id = %target.ref_id, %message, "target short-circuited");
        response
            .errors
            .push(TargetError::new(&target.ref_id, QueryError::EndpointError(message)));
        return;
    }

    let window = target.window.unwrap_or(request.window);
    match build_target_frames(target, result, &window, request.resolution_hint) {
        Ok(frames) => response.frames.extend(frames),
        Err(err) => {
            warn!(ref_id = %target.ref_id, error = %err, "target failed");
            response.errors.push(TargetError::new(&target.ref_id, err));
        }
    }
}

fn build_target_frames(
    target: &TargetQuery,
    result: &TargetResult,
    window: &TimeWindow,
    resolution_hint: u32,
) -> QueryResult<Vec<Frame>> {
    let keep_empty = get_global_settings().keep_empty_frames;
    let mut frames = vec![];

    match target.format {
        TargetFormat::TimeSeries | TargetFormat::Heatmap => {
            for series in &result.metrics {
                let aligned = align_metric(series, window, resolution_hint);
                if aligned.is_empty() {
                    debug!(metric = %series.meta.name, "no samples in window");
                    if !keep_empty {
                        continue;
                    }
                }
                if target.format == TargetFormat::TimeSeries {
                    frames.extend(build_time_series_frames(target, series, &aligned));
                } else {
                    frames.extend(build_heatmap_frames(target, series, &aligned)?);
                }
            }
        }
        TargetFormat::MetricsTable => {
            let aligned: Vec<(&MetricSeries, AlignedMetric)> = result
                .metrics
                .iter()
                .map(|series| (*series, align_metric(series, window, resolution_hint)))
                .collect();
            frames.push(build_metrics_table_frame(target, &aligned));
        }
        TargetFormat::CsvTable => {
            for series in &result.metrics {
                let selection = select_window(series.samples(), window, false, resolution_hint);
                frames.push(build_csv_frame(target, series, &selection)?);
            }
        }
    }
    Ok(frames)
}

/// Window, derive and align one metric onto a shared per-instance axis.
fn align_metric(series: &MetricSeries, window: &TimeWindow, resolution_hint: u32) -> AlignedMetric {
    let selection = select_window(
        series.samples(),
        window,
        series.meta.semantics.is_counter(),
        resolution_hint,
    );
    let mode = DeriveMode::for_metric(&series.meta);

    let per_instance = observed_instances(&selection)
        .into_iter()
        .map(|instance| (instance, derive_instance_series(&selection, instance, mode)))
        .collect();
    align_instances(per_instance)
}

/// Instances reported in the selected samples, singular first then ascending
/// by id. The instance domain may know more, but never-observed instances
/// would only contribute all-missing series.
fn observed_instances(selection: &SelectedWindow) -> Vec<Option<InstanceId>> {
    let mut instances: BTreeSet<Option<InstanceId>> = BTreeSet::new();
    for sample in selection.samples {
        for value in &sample.values {
            instances.insert(value.instance);
        }
    }
    instances.into_iter().collect()
}

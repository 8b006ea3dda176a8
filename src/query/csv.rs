use crate::config::get_global_settings;
use crate::error::{QueryError, QueryResult};
use crate::frames::{Field, Frame};
use crate::query::types::TargetQuery;
use crate::query::window::SelectedWindow;
use crate::series::{MetricSeries, RawValue};
use smallvec::SmallVec;

// CSV snapshots are narrow in practice; rows wider than this spill to the heap.
type Row = SmallVec<[Option<String>; 8]>;

/// Parses the most recent selected sample of a text metric as comma-separated
/// tabular data and builds a single table frame from it.
///
/// This format is a current-state snapshot, not a series: earlier samples in
/// the window never affect the output, and an absent current sample yields an
/// empty frame rather than an error. The first line names the columns; data
/// rows wider than the header extend it with synthesized `colN` names, and
/// shorter rows pad with missing cells.
pub fn build_csv_frame(
    query: &TargetQuery,
    series: &MetricSeries,
    selection: &SelectedWindow,
) -> QueryResult<Frame> {
    let frame = Frame::new(&query.ref_id).with_name(&series.meta.name);

    let Some(sample) = selection.latest() else {
        return Ok(frame);
    };
    let Some(instance_value) = sample.values.first() else {
        return Ok(frame);
    };
    let text = match &instance_value.value {
        RawValue::Text(text) => text,
        RawValue::Number(_) => {
            return Err(QueryError::InvalidCsvData(format!(
                "metric {} reports numbers, not CSV text",
                series.meta.name
            )));
        }
    };
    if text.is_empty() {
        return Ok(frame);
    }

    let settings = get_global_settings();
    let mut lines = text.lines();

    let mut header: Vec<String> = match lines.next() {
        Some(line) => line
            .split(',')
            .take(settings.max_csv_columns)
            .map(|cell| cell.trim().to_string())
            .collect(),
        None => return Ok(frame),
    };

    let mut rows: Vec<Row> = Vec::new();
    for line in lines.take(settings.max_csv_rows) {
        let cells: Row = line
            .split(',')
            .take(settings.max_csv_columns)
            .map(|cell| Some(cell.trim().to_string()))
            .collect();
        while header.len() < cells.len() {
            header.push(format!("col{}", header.len() + 1));
        }
        rows.push(cells);
    }

    let mut frame = frame;
    for (column, name) in header.iter().enumerate() {
        let values: Vec<Option<String>> = rows
            .iter()
            .map(|row| row.get(column).cloned().flatten())
            .collect();
        frame.push_field(Field::text(name, values));
    }
    frame.validate()?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::FieldValues;
    use crate::series::{InstanceValue, MetricMeta, MetricSample, Semantics, ValueKind};

    fn csv_series() -> MetricSeries {
        MetricSeries::new(MetricMeta::new(
            "some.string",
            ValueKind::Text,
            Semantics::Instant,
            "none",
        ))
    }

    fn query() -> TargetQuery {
        TargetQuery {
            expr: "some.string".to_string(),
            ref_id: "A".to_string(),
            ..Default::default()
        }
    }

    fn text_sample(ts: i64, text: &str) -> MetricSample {
        MetricSample::new(ts, vec![InstanceValue::new(None, text)])
    }

    fn selection(samples: &[MetricSample]) -> SelectedWindow {
        SelectedWindow { samples, lookback: 0 }
    }

    #[test]
    fn test_only_latest_sample_is_used() {
        let samples = vec![
            text_sample(10000, "a,b,c"),
            text_sample(
                11000,
                "col1,col2,col3\nrow1 col1,row1 col2,row1 col3\nrow2 col1,row2 col2,row2 col3",
            ),
        ];
        let frame = build_csv_frame(&query(), &csv_series(), &selection(&samples)).unwrap();

        let names: Vec<&str> = frame.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["col1", "col2", "col3"]);
        assert_eq!(frame.row_count(), 2);
        assert_eq!(
            frame.fields[0].values,
            FieldValues::Text(vec![Some("row1 col1".to_string()), Some("row2 col1".to_string())])
        );
    }

    #[test]
    fn test_header_only_text_yields_zero_rows() {
        let samples = vec![text_sample(10000, "a,b,c")];
        let frame = build_csv_frame(&query(), &csv_series(), &selection(&samples)).unwrap();
        let names: Vec<&str> = frame.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(frame.row_count(), 0);
    }

    #[test]
    fn test_no_sample_yields_empty_frame() {
        let frame = build_csv_frame(&query(), &csv_series(), &selection(&[])).unwrap();
        assert_eq!(frame.ref_id, "A");
        assert!(frame.fields.is_empty());
    }

    #[test]
    fn test_ragged_rows() {
        let samples = vec![text_sample(10000, "a,b\n1,2,3\n4")];
        let frame = build_csv_frame(&query(), &csv_series(), &selection(&samples)).unwrap();

        let names: Vec<&str> = frame.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "col3"]);
        assert_eq!(
            frame.fields[1].values,
            FieldValues::Text(vec![Some("2".to_string()), None])
        );
        assert_eq!(
            frame.fields[2].values,
            FieldValues::Text(vec![Some("3".to_string()), None])
        );
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_numeric_value_is_a_structural_error() {
        let samples = vec![MetricSample::new(10000, vec![InstanceValue::new(None, 3.0)])];
        let result = build_csv_frame(&query(), &csv_series(), &selection(&samples));
        assert!(matches!(result, Err(QueryError::InvalidCsvData(_))));
    }

    #[test]
    fn test_empty_text_yields_empty_frame() {
        let samples = vec![text_sample(10000, "")];
        let frame = build_csv_frame(&query(), &csv_series(), &selection(&samples)).unwrap();
        assert!(frame.fields.is_empty());
    }
}

use crate::error::{QueryError, QueryResult};
use crate::frames::field::Field;
use serde::Serialize;

/// Tabular query output: an ordered set of equal-length named columns, tagged
/// with the refId of the target that produced it.
///
/// Frames are freshly allocated per request and exclusively owned by the
/// caller; nothing in the pipeline retains them.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Frame {
    pub ref_id: String,
    /// Optional frame-level name (metric or metric/instance).
    pub name: Option<String>,
    pub fields: Vec<Field>,
}

impl Frame {
    pub fn new(ref_id: &str) -> Self {
        Frame {
            ref_id: ref_id.to_string(),
            name: None,
            fields: vec![],
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn row_count(&self) -> usize {
        self.fields.first().map_or(0, |f| f.len())
    }

    /// All columns of a frame must have identical row counts.
    pub fn validate(&self) -> QueryResult<()> {
        let rows = self.row_count();
        for field in &self.fields {
            if field.len() != rows {
                return Err(QueryError::General(format!(
                    "column length mismatch in frame {}: field {} has {} rows, expected {}",
                    self.ref_id,
                    field.name,
                    field.len(),
                    rows
                )));
            }
        }
        Ok(())
    }
}

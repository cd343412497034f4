use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, PrimitiveArray, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema, UInt64Type};
use arrow::error::Result as ArrowResult;
use arrow::ipc::writer::FileWriter;
use arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::pairs::TextPair;

// Rough per-side text size used to pre-size the string builders.
const APPROX_TEXT_BYTES: usize = 16;
// Upper bound on rows reserved up front, whatever capacity is requested.
const PRESIZE_ROWS_CAP: usize = 1 << 16;

pub fn distance_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("line", DataType::UInt64, false),
        Field::new("left", DataType::Utf8, false),
        Field::new("right", DataType::Utf8, false),
        Field::new("distance", DataType::UInt64, false),
    ]))
}

#[derive(Debug, Serialize)]
pub struct JsonDistanceRecord<'a> {
    pub line: usize,
    pub left: &'a str,
    pub right: &'a str,
    pub distance: usize,
}

impl<'a> JsonDistanceRecord<'a> {
    pub fn new(pair: &'a TextPair, distance: usize) -> Self {
        JsonDistanceRecord { line: pair.line, left: &pair.left, right: &pair.right, distance }
    }
}

/// Column builders for one Arrow record batch of distance results.
pub struct DistanceBatch {
    capacity: usize,
    lines: Vec<u64>,
    left: StringBuilder,
    right: StringBuilder,
    distances: Vec<u64>,
}

impl DistanceBatch {
    pub fn with_capacity(capacity: usize) -> Self {
        let rows = capacity.min(PRESIZE_ROWS_CAP);
        DistanceBatch {
            capacity,
            lines: Vec::with_capacity(rows),
            left: StringBuilder::with_capacity(rows, rows * APPROX_TEXT_BYTES),
            right: StringBuilder::with_capacity(rows, rows * APPROX_TEXT_BYTES),
            distances: Vec::with_capacity(rows),
        }
    }

    pub fn add(&mut self, pair: &TextPair, distance: usize) {
        self.lines.push(pair.line as u64);
        self.left.append_value(&pair.left);
        self.right.append_value(&pair.right);
        self.distances.push(distance as u64);
    }

    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
    pub fn is_full(&self) -> bool { self.lines.len() >= self.capacity }

    /// Drains the builders into a record batch; the batch is empty afterwards.
    pub fn finish(&mut self, schema: &Arc<Schema>) -> ArrowResult<RecordBatch> {
        let col_line: ArrayRef = Arc::new(PrimitiveArray::<UInt64Type>::from(std::mem::take(&mut self.lines)));
        let col_left: ArrayRef = Arc::new(self.left.finish());
        let col_right: ArrayRef = Arc::new(self.right.finish());
        let col_distance: ArrayRef = Arc::new(PrimitiveArray::<UInt64Type>::from(std::mem::take(&mut self.distances)));
        RecordBatch::try_new(schema.clone(), vec![col_line, col_left, col_right, col_distance])
    }

    pub fn write_and_clear<W: Write>(&mut self, writer: &mut FileWriter<W>, schema: &Arc<Schema>) -> ArrowResult<()> {
        if self.is_empty() { return Ok(()); }
        let batch = self.finish(schema)?;
        writer.write(&batch)
    }
}

use std::collections::HashSet;
use std::io::{self, Cursor, Write};

use arrow::array::UInt64Array;
use arrow::ipc::reader::FileReader;
use unicode_distance_calculator::pipeline::{write_ipc_parallel, PARALLEL_BATCH_SIZE};
use unicode_distance_calculator::{compute_distance, Error, TextPair};

fn numbered_pairs(n: usize) -> Vec<TextPair> {
    (1..=n)
        .map(|line| TextPair { line, left: format!("{line}ж"), right: format!("{}😊", line * 7) })
        .collect()
}

fn run_on_pool<T: Send>(threads: usize, job: impl FnOnce() -> T + Send) -> T {
    rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap().install(job)
}

fn read_rows(bytes: Vec<u8>) -> (Vec<(u64, u64)>, usize) {
    let reader = FileReader::try_new(Cursor::new(bytes), None).unwrap();
    let mut rows = Vec::new();
    let mut batches = 0;
    for batch in reader {
        let batch = batch.unwrap();
        batches += 1;
        let lines = batch.column_by_name("line").unwrap().as_any().downcast_ref::<UInt64Array>().unwrap();
        let distances = batch.column_by_name("distance").unwrap().as_any().downcast_ref::<UInt64Array>().unwrap();
        rows.extend(lines.values().iter().copied().zip(distances.values().iter().copied()));
    }
    (rows, batches)
}

fn assert_every_row_once(pairs: &[TextPair], rows: &[(u64, u64)]) {
    assert_eq!(rows.len(), pairs.len());
    let unique: HashSet<u64> = rows.iter().map(|&(line, _)| line).collect();
    assert_eq!(unique.len(), pairs.len(), "duplicate lines in output");

    let mut got = rows.to_vec();
    got.sort_unstable();
    let expected: Vec<(u64, u64)> = pairs
        .iter()
        .map(|p| (p.line as u64, compute_distance(&p.left, &p.right) as u64))
        .collect();
    assert_eq!(got, expected);
}

#[test]
fn default_batch_size_spans_several_batches_on_four_threads() {
    let pairs = numbered_pairs(PARALLEL_BATCH_SIZE + 1_234);
    let bytes = run_on_pool(4, || write_ipc_parallel(&pairs, Vec::new(), PARALLEL_BATCH_SIZE, 8)).unwrap();

    let (rows, batches) = read_rows(bytes);
    assert_eq!(batches, 2);
    assert_every_row_once(&pairs, &rows);
}

#[test]
fn small_batches_through_a_narrow_channel() {
    let pairs = numbered_pairs(5_000);
    let bytes = run_on_pool(3, || write_ipc_parallel(&pairs, Vec::new(), 97, 1)).unwrap();

    let (rows, batches) = read_rows(bytes);
    assert_eq!(batches, 5_000usize.div_ceil(97));
    assert_every_row_once(&pairs, &rows);
}

#[test]
fn length_cap_removes_rows_from_output() {
    let mut pairs = numbered_pairs(200);
    pairs.push(TextPair { line: 201, left: "x".repeat(50), right: String::new() });
    let dropped = unicode_distance_calculator::pairs::retain_within(&mut pairs, 8);
    assert_eq!(dropped, 1);

    let bytes = run_on_pool(2, || write_ipc_parallel(&pairs, Vec::new(), 16, 4)).unwrap();
    let (rows, _) = read_rows(bytes);
    assert!(rows.iter().all(|&(line, _)| line != 201));
    assert_every_row_once(&pairs, &rows);
}

/// Accepts the file header, then panics or errors once `limit` bytes are exceeded.
struct FailingWriter {
    written: usize,
    limit: usize,
    panics: bool,
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written += buf.len();
        if self.written > self.limit {
            if self.panics {
                panic!("output device gone");
            }
            return Err(io::Error::other("disk full"));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn writer_thread_panic_becomes_an_error() {
    let pairs = numbered_pairs(2_000);
    let writer = FailingWriter { written: 0, limit: 4_096, panics: true };
    let result = run_on_pool(2, || write_ipc_parallel(&pairs, writer, 100, 2));
    match result {
        Err(Error::WriterPanicked(msg)) => assert_eq!(msg, "output device gone"),
        other => panic!("expected WriterPanicked, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn writer_io_error_is_reported_instead_of_closed_channel() {
    let pairs = numbered_pairs(2_000);
    let writer = FailingWriter { written: 0, limit: 4_096, panics: false };
    let result = run_on_pool(2, || write_ipc_parallel(&pairs, writer, 100, 2));
    assert!(matches!(result, Err(Error::Arrow(_))), "{:?}", result.map(|_| ()));
}

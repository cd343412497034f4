use std::any::Any;
use std::io::Write;
use std::thread;

use arrow::ipc::writer::FileWriter;
use arrow::record_batch::RecordBatch;
use crossbeam_channel::bounded;
use rayon::prelude::*;

use crate::error::Error;
use crate::output::{distance_schema, DistanceBatch, JsonDistanceRecord};
use crate::pairs::TextPair;

const PROGRESS_STEPS: usize = 20;
const MIN_PROGRESS_INTERVAL: usize = 10;

/// Rows per record batch in [`write_ipc_parallel`] when the caller has no preference.
pub const PARALLEL_BATCH_SIZE: usize = 1 << 16;

/// Computes every pair in input order and hands each result to `record_handler`.
///
/// Progress is reported about every 1/20th of the input and once more on the
/// last pair. The first handler error stops processing.
pub fn process_pairs_core<'a, RecordH, ProgressF>(
    pairs: &'a [TextPair],
    mut record_handler: RecordH,
    mut progress: ProgressF,
) -> Result<(), Error>
where
    RecordH: FnMut(&'a TextPair, usize) -> Result<(), Error>,
    ProgressF: FnMut(&str),
{
    let total = pairs.len();
    let report_every = (total / PROGRESS_STEPS).max(MIN_PROGRESS_INTERVAL);

    for (idx, pair) in pairs.iter().enumerate() {
        let distance = pair.distance();
        record_handler(pair, distance)?;

        let done = idx + 1;
        if done % report_every == 0 || done == total {
            progress(&format!("Pair {}/{} (line {}) processed.", done, total, pair.line));
        }
    }
    Ok(())
}

pub fn pairs_to_json<ProgressF>(pairs: &[TextPair], progress: ProgressF) -> Result<String, Error>
where
    ProgressF: FnMut(&str),
{
    let mut records: Vec<JsonDistanceRecord<'_>> = Vec::with_capacity(pairs.len());
    process_pairs_core(
        pairs,
        |pair, distance| {
            records.push(JsonDistanceRecord::new(pair, distance));
            Ok(())
        },
        progress,
    )?;
    Ok(serde_json::to_string(&records)?)
}

/// Arrow IPC file bytes with rows in input order, at most `batch_size` per batch.
pub fn pairs_to_ipc_bytes<ProgressF>(pairs: &[TextPair], batch_size: usize, progress: ProgressF) -> Result<Vec<u8>, Error>
where
    ProgressF: FnMut(&str),
{
    let schema = distance_schema();
    let mut writer = FileWriter::try_new(Vec::new(), &schema)?;
    let mut batch = DistanceBatch::with_capacity(batch_size.max(1));

    process_pairs_core(
        pairs,
        |pair, distance| {
            batch.add(pair, distance);
            if batch.is_full() {
                batch.write_and_clear(&mut writer, &schema)?;
            }
            Ok(())
        },
        progress,
    )?;
    batch.write_and_clear(&mut writer, &schema)?;

    Ok(writer.into_inner()?)
}

/// Computes `pairs` on the current rayon pool, `batch_size` pairs per record
/// batch, and hands the batches to a dedicated thread that owns the Arrow writer.
///
/// Batches are written in completion order, so row order is not deterministic;
/// the `line` column identifies each row. Returns the inner writer once the
/// Arrow file is finished.
pub fn write_ipc_parallel<W: Write + Send + 'static>(
    pairs: &[TextPair],
    writer: W,
    batch_size: usize,
    channel_capacity: usize,
) -> Result<W, Error> {
    let schema = distance_schema();
    let mut arrow_writer = FileWriter::try_new(writer, &schema)?;

    let (tx, rx) = bounded::<RecordBatch>(channel_capacity.max(1));

    let writer_thread = thread::spawn(move || -> Result<W, Error> {
        let mut batches_written = 0;
        let mut total_rows_written = 0;
        for record_batch in rx {
            arrow_writer.write(&record_batch)?;
            batches_written += 1;
            total_rows_written += record_batch.num_rows();
            if batches_written % 100 == 0 {
                log::info!("Writer thread: Written {} batches ({} rows total).", batches_written, total_rows_written);
            }
        }
        log::debug!("Writer thread: All data received. Finalizing Arrow file.");
        let inner = arrow_writer.into_inner()?;
        log::info!("Writer thread: Arrow file finished. Total batches written: {}, total rows: {}.", batches_written, total_rows_written);
        Ok(inner)
    });

    let computation_result = pairs
        .par_chunks(batch_size.max(1))
        .try_for_each(|chunk| -> Result<(), Error> {
            let mut batch = DistanceBatch::with_capacity(chunk.len());
            for pair in chunk {
                batch.add(pair, pair.distance());
            }
            let record_batch = batch.finish(&schema)?;
            tx.send(record_batch).map_err(|_| Error::WriterClosed)
        });
    drop(tx);

    if let Err(e) = &computation_result {
        log::error!("Distance computation stopped early: {}", e);
    }

    // a writer failure is the cause of any WriterClosed seen by the workers
    let inner = match writer_thread.join() {
        Ok(result) => result.inspect_err(|e| log::error!("Writer thread failed: {}", e))?,
        Err(panic_payload) => {
            let panic_msg = panic_message(panic_payload.as_ref());
            log::error!("Writer thread panicked: {}", panic_msg);
            return Err(Error::WriterPanicked(panic_msg));
        }
    };
    computation_result?;
    Ok(inner)
}

/// JSON array of every pair in input order, distances computed on the current rayon pool.
pub fn write_json_parallel<W: Write>(pairs: &[TextPair], mut writer: W) -> Result<W, Error> {
    let distances: Vec<usize> = pairs.par_iter().map(TextPair::distance).collect();
    let records: Vec<JsonDistanceRecord<'_>> = pairs
        .iter()
        .zip(distances)
        .map(|(pair, distance)| JsonDistanceRecord::new(pair, distance))
        .collect();
    serde_json::to_writer(&mut writer, &records)?;
    writer.flush().map_err(Error::Write)?;
    Ok(writer)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    }
}

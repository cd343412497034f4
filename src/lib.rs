mod error;
mod levenshtein;
pub mod output;
pub mod pairs;
pub mod pipeline;

pub use error::Error;
pub use levenshtein::{compute_distance, compute_distance_bytes, slice_distance};
pub use pairs::TextPair;

use wasm_bindgen::prelude::*;

const IPC_ARROW_BATCH_SIZE: usize = 1 << 12;

fn report_progress(progress_callback: &js_sys::Function, message: &str) {
    if let Err(err) = progress_callback.call1(&JsValue::NULL, &JsValue::from_str(message)) {
        web_sys::console::warn_1(&err);
    }
}

fn load_for_js(content: &[u8], is_gzipped: bool, label: &str, progress_callback: &js_sys::Function) -> Result<Vec<TextPair>, JsValue> {
    report_progress(progress_callback, &format!("Rust Wasm ({}): Starting...", label));
    let pairs = pairs::load_pairs_from_bytes(content, is_gzipped)
        .map_err(|e| JsValue::from_str(&format!("Pairs parsing error: {}", e)))?;
    if pairs.is_empty() { return Err(JsValue::from_str(&Error::NoPairs.to_string())); }
    report_progress(progress_callback, &format!("Rust Wasm ({}): Loaded {} pairs.", label, pairs.len()));
    Ok(pairs)
}

#[wasm_bindgen(js_name = computeDistance)]
pub fn compute_distance_js(a: &str, b: &str) -> usize {
    compute_distance(a, b)
}

#[wasm_bindgen(js_name = computeDistanceBytes)]
pub fn compute_distance_bytes_js(a: &[u8], b: &[u8]) -> usize {
    compute_distance_bytes(a, b)
}

#[wasm_bindgen]
pub fn process_pairs_to_json(
    content: &[u8], is_gzipped: bool, progress_callback: &js_sys::Function,
) -> Result<String, JsValue> {
    let pairs = load_for_js(content, is_gzipped, "JSON", progress_callback)?;
    let json = pipeline::pairs_to_json(&pairs, |msg| report_progress(progress_callback, msg))
        .map_err(|e| JsValue::from_str(&format!("JSON output error: {}", e)))?;
    report_progress(progress_callback, "Rust Wasm (JSON): Processing complete.");
    Ok(json)
}

#[wasm_bindgen]
pub fn process_pairs_to_ipc_bytes(
    content: &[u8], is_gzipped: bool, progress_callback: &js_sys::Function,
) -> Result<Vec<u8>, JsValue> {
    let pairs = load_for_js(content, is_gzipped, "IPC", progress_callback)?;
    let ipc = pipeline::pairs_to_ipc_bytes(&pairs, IPC_ARROW_BATCH_SIZE, |msg| report_progress(progress_callback, msg))
        .map_err(|e| JsValue::from_str(&format!("Arrow IPC output error: {}", e)))?;
    report_progress(progress_callback, "Rust Wasm (IPC): Processing complete.");
    Ok(ipc)
}

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::error::Error;
use crate::levenshtein::compute_distance;

/// One `left<TAB>right` line of a pairs file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPair {
    /// 1-based line number in the source.
    pub line: usize,
    pub left: String,
    pub right: String,
}

impl TextPair {
    pub fn distance(&self) -> usize {
        compute_distance(&self.left, &self.right)
    }

    /// Code-point length of the longer side.
    pub fn max_chars(&self) -> usize {
        self.left.chars().count().max(self.right.chars().count())
    }
}

/// Loads every pair from a file, gunzipping when the path ends with `.gz`.
pub fn load_pairs(path: &str) -> Result<Vec<TextPair>, Error> {
    let file = File::open(path).map_err(|source| Error::Open { path: path.to_string(), source })?;

    let reader: Box<dyn BufRead> = if path.ends_with(".gz") {
        log::info!("Detected .gz extension for '{}', reading as gzipped pairs file.", path);
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    read_pairs(reader)
}

pub fn load_pairs_from_bytes(content: &[u8], is_gzipped: bool) -> Result<Vec<TextPair>, Error> {
    let reader: Box<dyn BufRead + '_> = if is_gzipped {
        Box::new(BufReader::new(GzDecoder::new(content)))
    } else {
        Box::new(content)
    };
    read_pairs(reader)
}

/// Parses pairs line by line.
///
/// Empty lines and lines starting with `#` are skipped. Everything up to the
/// first tab is the left side, the rest of the line is the right side. Bytes
/// that are not valid UTF-8 are kept as U+FFFD rather than rejected.
pub fn read_pairs<R: BufRead>(mut reader: R) -> Result<Vec<TextPair>, Error> {
    let mut pairs = Vec::new();
    let mut buf = Vec::new();
    let mut line = 0;

    loop {
        buf.clear();
        line += 1;
        let read = reader.read_until(b'\n', &mut buf).map_err(|source| Error::Read { line, source })?;
        if read == 0 { break; }

        let mut content = buf.as_slice();
        if let Some(rest) = content.strip_suffix(b"\n") { content = rest; }
        if let Some(rest) = content.strip_suffix(b"\r") { content = rest; }
        if content.is_empty() || content.starts_with(b"#") { continue; }

        let tab = content.iter().position(|&byte| byte == b'\t').ok_or(Error::MissingSeparator { line })?;
        pairs.push(TextPair {
            line,
            left: String::from_utf8_lossy(&content[..tab]).into_owned(),
            right: String::from_utf8_lossy(&content[tab + 1..]).into_owned(),
        });
    }

    log::debug!("Read {} pair(s) from {} line(s).", pairs.len(), line - 1);
    Ok(pairs)
}

/// Drops pairs where either side is longer than `max_chars` code points.
/// Returns the number of pairs removed.
pub fn retain_within(pairs: &mut Vec<TextPair>, max_chars: usize) -> usize {
    let before = pairs.len();
    pairs.retain(|pair| pair.max_chars() <= max_chars);
    before - pairs.len()
}

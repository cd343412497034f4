#![allow(dead_code)]

use rand::Rng;

/// Inclusive code point ranges encoding to 1, 2, 3 and 4 UTF-8 bytes:
/// ASCII, Cyrillic, Tibetan and emoticons.
pub const CODE_POINT_RANGES: [(u32, u32); 4] = [
    (0x20, 0x7E),
    (0x0400, 0x04FF),
    (0x0F00, 0x0FD4),
    (0x1F600, 0x1F64F),
];

pub fn random_char<R: Rng>(rng: &mut R) -> char {
    let (lo, hi) = CODE_POINT_RANGES[rng.random_range(0..CODE_POINT_RANGES.len())];
    char::from_u32(rng.random_range(lo..=hi)).expect("ranges contain no surrogates")
}

pub fn random_text<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| random_char(rng)).collect()
}

/// Applies up to `max_edits` random insertions or substitutions.
/// Returns the new text and how many edits were applied.
pub fn perturb<R: Rng>(rng: &mut R, text: &str, max_edits: usize) -> (String, usize) {
    let mut chars: Vec<char> = text.chars().collect();
    let edits = rng.random_range(0..=max_edits);
    for _ in 0..edits {
        if chars.is_empty() || rng.random_bool(0.5) {
            let at = rng.random_range(0..=chars.len());
            chars.insert(at, random_char(rng));
        } else {
            let at = rng.random_range(0..chars.len());
            chars[at] = random_char(rng);
        }
    }
    (chars.into_iter().collect(), edits)
}

/// Mismatches between same-index code points plus the length difference.
/// Always at least the edit distance.
pub fn aligned_mismatch_bound(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let mismatches = a.chars().zip(b.chars()).filter(|(x, y)| x != y).count();
    mismatches + a_len.abs_diff(b_len)
}

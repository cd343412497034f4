// src/levenshtein.rs

/// Levenshtein distance between two strings, counted in code points.
///
/// Multi-byte characters (accented letters, CJK, emoji) are one unit each,
/// so `compute_distance("hello", "hello 😊")` is 2.
pub fn compute_distance(a: &str, b: &str) -> usize {
    if a == b { return 0; }
    if a.is_empty() { return b.chars().count(); }
    if b.is_empty() { return a.chars().count(); }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    slice_distance(&a_chars, &b_chars)
}

/// Same as [`compute_distance`] over raw bytes.
///
/// Each side is decoded as UTF-8 with every maximal invalid subsequence
/// replaced by U+FFFD, so malformed input compares as that placeholder
/// instead of failing.
pub fn compute_distance_bytes(a: &[u8], b: &[u8]) -> usize {
    if a == b { return 0; }
    compute_distance(&String::from_utf8_lossy(a), &String::from_utf8_lossy(b))
}

/// Wagner–Fischer over any random-access sequence, keeping a single row
/// sized by the shorter input.
pub fn slice_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() { return b.len(); }
    if b.is_empty() { return a.len(); }

    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let width = short.len();

    let mut row: Vec<usize> = (0..=width).collect();

    for (i_idx, long_item) in long.iter().enumerate() {
        // row[j] still holds the previous row until it is overwritten below
        let mut diagonal = row[0];
        row[0] = i_idx + 1;
        for (j_idx, short_item) in short.iter().enumerate() {
            let cost = if short_item == long_item { 0 } else { 1 };
            let above = row[j_idx + 1];
            row[j_idx + 1] = min3(above + 1, row[j_idx] + 1, diagonal + cost);
            diagonal = above;
        }
    }
    row[width]
}

fn min3(a: usize, b: usize, c: usize) -> usize {
    let m = if a < b { a } else { b };
    if m < c { m } else { c }
}

//! Splits the input on its first newline into two byte strings and checks
//! that the distance stays within the length bounds of the decoded sides.
//! Invalid UTF-8 is passed through and must decode to U+FFFD.

#![no_main]

use libfuzzer_sys::fuzz_target;
use unicode_distance_calculator::compute_distance_bytes;

fuzz_target!(|data: &[u8]| {
    let Some(split) = data.iter().position(|&b| b == b'\n') else {
        return;
    };
    let (a, b) = (&data[..split], &data[split + 1..]);

    let d = compute_distance_bytes(a, b);
    let a_len = String::from_utf8_lossy(a).chars().count();
    let b_len = String::from_utf8_lossy(b).chars().count();

    assert!(d <= a_len.max(b_len), "distance {d} above max length for {a:?} / {b:?}");
    assert!(d >= a_len.abs_diff(b_len), "distance {d} below length difference for {a:?} / {b:?}");
    assert_eq!(d, compute_distance_bytes(b, a));
});

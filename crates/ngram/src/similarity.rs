/// Warp values within this distance of 1.0 use the plain ratio.
const WARP_EPSILON: f64 = 1e-9;

/// Similarity of two gram multisets from their shared and total gram counts.
///
/// With `a` all grams, `d = a - samegrams` differing grams and `e` the warp:
/// `(a^e - d^e) / a^e`, which reduces to `samegrams / a` when `e == 1`.
///
/// Returns 0.0 when `allgrams` is zero.
pub fn ngram_similarity(samegrams: usize, allgrams: usize, warp: f64) -> f64 {
    if allgrams == 0 {
        return 0.0;
    }
    let same = samegrams as f64;
    let all = allgrams as f64;
    if (warp - 1.0).abs() < WARP_EPSILON {
        same / all
    } else {
        let diff = all - same;
        let all_warped = all.powf(warp);
        (all_warped - diff.powf(warp)) / all_warped
    }
}

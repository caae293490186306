//! Title rating derived from review scores.

/// Round a raw `AVG(score)` to the integer rating shown to clients.
///
/// `None` (no reviews) stays `None`. Halves round away from zero, which
/// matches PostgreSQL `ROUND`.
pub fn round_rating(average: Option<f64>) -> Option<i32> {
    average.map(|avg| avg.round() as i32)
}

/// Compute the rating directly from a set of scores.
pub fn average_rating(scores: &[i32]) -> Option<i32> {
    if scores.is_empty() {
        return None;
    }
    let sum: i64 = scores.iter().map(|&s| i64::from(s)).sum();
    round_rating(Some(sum as f64 / scores.len() as f64))
}

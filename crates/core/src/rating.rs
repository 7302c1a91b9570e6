//! Feedback ratings shown on the public booking page.

/// Mean of the given ratings rounded to one decimal place.
///
/// Returns `None` when there are no ratings.
pub fn average_rating(ratings: &[i16]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    let mean = sum as f64 / ratings.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

//! Reduction of per-headline polarity scores

/// Score used when no text is available
pub const NEUTRAL_SENTIMENT: f64 = 0.0;

/// Arithmetic mean of the scores, clamped to [-1, 1]; 0.0 for no input
pub fn aggregate(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return NEUTRAL_SENTIMENT;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    mean.clamp(-1.0, 1.0)
}

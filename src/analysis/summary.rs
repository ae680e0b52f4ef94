// ============================================================================
// Summary Reducer
// ============================================================================
// max, min, moyenne et écart-type d'échantillon (dénominateur N-1).
// ============================================================================

use crate::error::{PipelineError, Result};
use crate::models::SummaryStats;

/// Résume une série non vide
///
/// Une seule valeur donne un écart-type NaN (indéfini avec N-1 = 0).
pub fn summarize(values: &[f64]) -> Result<SummaryStats> {
    if values.is_empty() {
        return Err(PipelineError::EmptySeries);
    }

    let n = values.len() as f64;
    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let min = values.iter().copied().fold(f64::MAX, f64::min);
    let mean = values.iter().sum::<f64>() / n;

    let std_dev = if values.len() < 2 {
        f64::NAN
    } else {
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / (n - 1.0)).sqrt()
    };

    Ok(SummaryStats {
        max,
        min,
        mean,
        std_dev,
    })
}

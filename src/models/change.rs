// ============================================================================
// Structure : ChangePoint
// ============================================================================
// Variation en pourcentage du prix d'une année par rapport au prix
// `interval` années plus tôt.
// ============================================================================

use serde::{Deserialize, Serialize};

/// Variation d'une année par rapport à l'année `year - interval`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangePoint {
    pub year: i32,

    /// (prix courant - prix passé) / prix passé × 100
    pub percent_change: f64,
}

impl ChangePoint {
    pub fn new(year: i32, percent_change: f64) -> Self {
        Self {
            year,
            percent_change,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.percent_change < 0.0
    }
}

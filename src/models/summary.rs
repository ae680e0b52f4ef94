// ============================================================================
// Structure : SummaryStats
// ============================================================================
// Résumé d'une série (prix ou variations) : max, min, moyenne, écart-type.
// Valeurs brutes ; l'arrondi à 2 décimales est réservé à l'affichage.
// ============================================================================

use serde::{Deserialize, Serialize};

/// Statistiques d'une série de valeurs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub max: f64,
    pub min: f64,
    pub mean: f64,

    /// Écart-type d'échantillon (dénominateur N-1), NaN pour une seule valeur
    pub std_dev: f64,
}

impl SummaryStats {
    /// Copie arrondie à 2 décimales (NaN reste NaN)
    pub fn rounded(&self) -> Self {
        Self {
            max: round2(self.max),
            min: round2(self.min),
            mean: round2(self.mean),
            std_dev: round2(self.std_dev),
        }
    }
}

/// Arrondi à 2 décimales
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

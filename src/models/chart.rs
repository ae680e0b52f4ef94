// ============================================================================
// Spécifications de graphiques
// ============================================================================
// Description déclarative des deux graphiques du dashboard (barres des
// variations, ligne des prix). Le TUI les dessine avec ratatui, le rapport
// JSON les exporte tels quels.
//
// Les libellés des séries sont les mêmes chaînes que les colonnes de la table,
// ce qui garantit une association couleur <-> série cohérente.
// ============================================================================

use serde::{Deserialize, Serialize};

/// Type de graphique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// Couleurs nommées utilisées par les graphiques
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesColor {
    /// Variation positive (vue simple)
    Green,
    /// Variation négative (vue simple)
    Red,
    /// Premier ticker (vue comparaison)
    LightSkyBlue,
    /// Second ticker (vue comparaison)
    LightSalmon,
}

impl SeriesColor {
    /// Couleur de la n-ième série en vue comparaison
    pub fn for_series(index: usize) -> Self {
        if index == 0 {
            SeriesColor::LightSkyBlue
        } else {
            SeriesColor::LightSalmon
        }
    }
}

/// Règle de coloration d'une série
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesColoring {
    /// Rouge si la valeur est négative, vert sinon
    BySign,
    /// Une couleur pour toute la série
    Fixed(SeriesColor),
}

impl SeriesColoring {
    /// Couleur d'un point selon la règle
    pub fn color_for(&self, value: f64) -> SeriesColor {
        match self {
            SeriesColoring::BySign if value < 0.0 => SeriesColor::Red,
            SeriesColoring::BySign => SeriesColor::Green,
            SeriesColoring::Fixed(color) => *color,
        }
    }
}

/// Une série de points (année, valeur)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub label: String,
    pub coloring: SeriesColoring,
    pub points: Vec<(i32, f64)>,
}

/// Un graphique complet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub y_label: String,
    pub series: Vec<SeriesSpec>,
}

impl ChartSpec {
    /// Bornes (min, max) de toutes les valeurs du graphique
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(_, v)| v))
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
    }

    /// Bornes (première, dernière) des années du graphique
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(year, _)| year))
            .fold(None, |acc, y| match acc {
                None => Some((y, y)),
                Some((first, last)) => Some((first.min(y), last.max(y))),
            })
    }
}

// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod query;      // Entrées du dashboard (tickers, années, intervalle)
pub mod year_price; // Prix de début d'année et séries annuelles
pub mod change;     // Variations en pourcentage
pub mod summary;    // Statistiques résumées
pub mod chart;      // Spécifications de graphiques
pub mod format;     // Formatage monétaire / pourcentage
pub mod report;     // Résultat structuré d'un calcul

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use longview::models::query::Query;
// On peut faire : use longview::models::Query;
pub use change::ChangePoint;
pub use chart::{ChartKind, ChartSpec, SeriesColor, SeriesColoring, SeriesSpec};
pub use query::{Query, View};
pub use report::{DashboardReport, Metric, ReportRow, TickerReport};
pub use summary::SummaryStats;
pub use year_price::{YearPricePoint, YearSeries};

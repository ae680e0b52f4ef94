// ============================================================================
// Structures : TickerReport et DashboardReport
// ============================================================================
// Résultat structuré d'un calcul du dashboard. La couche de présentation
// (TUI, rapport texte, JSON) ne fait que lire ces structures :
// - rows() : table combinée, une ligne par année
// - change_chart() / price_chart() : spécifications des graphiques
// - change_metrics() / price_metrics() : métriques formatées
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::chart::{ChartKind, ChartSpec, SeriesColor, SeriesColoring, SeriesSpec};
use crate::models::format::{format_currency, format_percent, format_signed_percent};
use crate::models::{ChangePoint, Query, SummaryStats, View, YearSeries};

/// Résultat complet pour un ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerReport {
    pub ticker: String,

    /// Série échantillonnée complète : [start - interval, end]
    pub sampled: YearSeries,

    /// Prix des années affichées : [start, end]
    pub prices: YearSeries,

    /// Variations des années affichées, triées par année
    pub changes: Vec<ChangePoint>,

    pub price_summary: SummaryStats,
    pub change_summary: SummaryStats,
}

impl TickerReport {
    /// Variation d'une année donnée
    pub fn change_for(&self, year: i32) -> Option<f64> {
        self.changes
            .iter()
            .find(|c| c.year == year)
            .map(|c| c.percent_change)
    }
}

/// Ligne de la table combinée (valeurs brutes, une colonne par ticker)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub year: i32,
    pub prices: Vec<f64>,
    pub changes: Vec<f64>,
}

/// Métrique affichée (ex: "Highest Change (WMT)" -> "154.21%")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    fn new(label: String, value: String) -> Self {
        Self { label, value }
    }
}

/// Résultat d'un calcul du dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub query: Query,
    pub tickers: Vec<TickerReport>,
}

impl DashboardReport {
    pub fn view(&self) -> View {
        self.query.view()
    }

    // ========================================================================
    // Libellés (identiques pour la table, la légende et les couleurs)
    // ========================================================================

    /// Libellé de la colonne des prix d'un ticker
    pub fn price_label(&self, ticker: &str) -> String {
        match self.view() {
            View::Single => "Adj Close".to_string(),
            View::Compare => format!("Adj Close ({})", ticker),
        }
    }

    /// Libellé de la colonne des variations d'un ticker
    pub fn change_label(&self, ticker: &str) -> String {
        match self.view() {
            View::Single => format!("Percent Change From {} Years Ago", self.query.interval),
            View::Compare => format!(
                "% Change from {} Years Ago ({})",
                self.query.interval, ticker
            ),
        }
    }

    /// Libellé d'une métrique, suffixé par le ticker en vue comparaison
    fn metric_label(&self, base: &str, ticker: &str) -> String {
        match self.view() {
            View::Single => base.to_string(),
            View::Compare => format!("{} ({})", base, ticker),
        }
    }

    // ========================================================================
    // Tables
    // ========================================================================

    /// Table combinée : une ligne par année affichée, zippée par année
    pub fn rows(&self) -> Vec<ReportRow> {
        let Some(first) = self.tickers.first() else {
            return Vec::new();
        };

        first
            .prices
            .points
            .iter()
            .map(|point| ReportRow {
                year: point.year,
                prices: self
                    .tickers
                    .iter()
                    .map(|t| t.prices.price_for(point.year).unwrap_or(f64::NAN))
                    .collect(),
                changes: self
                    .tickers
                    .iter()
                    .map(|t| t.change_for(point.year).unwrap_or(f64::NAN))
                    .collect(),
            })
            .collect()
    }

    /// En-têtes de la table : Year, prix par ticker, variations par ticker
    pub fn table_header(&self) -> Vec<String> {
        let mut header = vec!["Year".to_string()];
        header.extend(self.tickers.iter().map(|t| self.price_label(&t.ticker)));
        header.extend(self.tickers.iter().map(|t| self.change_label(&t.ticker)));
        header
    }

    /// Table formatée pour l'affichage ("$1,200.00", "+9.09%")
    pub fn formatted_rows(&self) -> Vec<Vec<String>> {
        self.rows()
            .into_iter()
            .map(|row| {
                let mut cells = vec![row.year.to_string()];
                cells.extend(row.prices.iter().map(|&p| format_currency(p)));
                cells.extend(row.changes.iter().map(|&c| format_signed_percent(c)));
                cells
            })
            .collect()
    }

    // ========================================================================
    // Graphiques
    // ========================================================================

    /// Barres : variation par année
    pub fn change_chart(&self) -> ChartSpec {
        let interval = self.query.interval;
        let (title, y_label) = match self.tickers.as_slice() {
            [a, b] => (
                format!("{} v.s. {}", a.ticker, b.ticker),
                format!("% Change From {} Years Ago", interval),
            ),
            _ => {
                let ticker = self.ticker_names().join(", ");
                (
                    format!(
                        "Percent Change of Last {} Years of Closing Price of {} on First Day of Each Year",
                        interval, ticker
                    ),
                    format!("Percent Change From {} Years Ago", interval),
                )
            }
        };

        let series = self
            .tickers
            .iter()
            .enumerate()
            .map(|(i, t)| SeriesSpec {
                label: self.change_label(&t.ticker),
                coloring: self.coloring_for(i, SeriesColoring::BySign),
                points: t.changes.iter().map(|c| (c.year, c.percent_change)).collect(),
            })
            .collect();

        ChartSpec {
            title,
            kind: ChartKind::Bar,
            y_label,
            series,
        }
    }

    /// Ligne : prix par année
    pub fn price_chart(&self) -> ChartSpec {
        let title = match self.tickers.as_slice() {
            [a, b] => format!(
                "Closing Price of {} and {} on First Day of Each Year",
                a.ticker, b.ticker
            ),
            _ => format!(
                "Closing Price of {} on First Day of Each Year",
                self.ticker_names().join(", ")
            ),
        };

        let series = self
            .tickers
            .iter()
            .enumerate()
            .map(|(i, t)| SeriesSpec {
                label: self.price_label(&t.ticker),
                coloring: self.coloring_for(i, SeriesColoring::Fixed(SeriesColor::LightSkyBlue)),
                points: t
                    .prices
                    .points
                    .iter()
                    .map(|p| (p.year, p.closing_price))
                    .collect(),
            })
            .collect();

        ChartSpec {
            title,
            kind: ChartKind::Line,
            y_label: "Adj Close".to_string(),
            series,
        }
    }

    /// Vue simple : règle donnée ; vue comparaison : une couleur par série
    fn coloring_for(&self, index: usize, single: SeriesColoring) -> SeriesColoring {
        match self.view() {
            View::Single => single,
            View::Compare => SeriesColoring::Fixed(SeriesColor::for_series(index)),
        }
    }

    fn ticker_names(&self) -> Vec<&str> {
        self.tickers.iter().map(|t| t.ticker.as_str()).collect()
    }

    // ========================================================================
    // Métriques
    // ========================================================================

    /// 4 métriques par ticker : plus haute, plus basse, moyenne, écart-type
    pub fn change_metrics(&self) -> Vec<Metric> {
        let std_label = match self.view() {
            View::Single => "Variance of Change (std)",
            View::Compare => "Variance",
        };

        self.tickers
            .iter()
            .flat_map(|t| {
                let stats = t.change_summary.rounded();
                vec![
                    Metric::new(self.metric_label("Highest Change", &t.ticker), format_percent(stats.max)),
                    Metric::new(self.metric_label("Lowest Change", &t.ticker), format_percent(stats.min)),
                    Metric::new(self.metric_label("Average Change", &t.ticker), format_percent(stats.mean)),
                    Metric::new(self.metric_label(std_label, &t.ticker), format_percent(stats.std_dev)),
                ]
            })
            .collect()
    }

    /// 3 métriques par ticker : plus haut, plus bas, moyenne
    pub fn price_metrics(&self) -> Vec<Metric> {
        self.tickers
            .iter()
            .flat_map(|t| {
                let stats = t.price_summary.rounded();
                vec![
                    Metric::new(self.metric_label("Highest Value", &t.ticker), format_currency(stats.max)),
                    Metric::new(self.metric_label("Lowest Value", &t.ticker), format_currency(stats.min)),
                    Metric::new(self.metric_label("Average Value", &t.ticker), format_currency(stats.mean)),
                ]
            })
            .collect()
    }
}

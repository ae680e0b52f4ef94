// ============================================================================
// Dashboard : gestionnaire requête -> rapport
// ============================================================================
// Point d'entrée explicite du calcul :
//   1. valide la Query (avant tout appel réseau)
//   2. échantillonne les prix (Year-Sampler)
//   3. construit les variations (Change-Series Builder)
//   4. résume prix et variations (Summary Reducer)
//   5. retourne un DashboardReport
//
// La couche de présentation (TUI, rapport texte) ne fait qu'appeler handle()
// et afficher le résultat.
// ============================================================================

use tracing::{info, instrument};

use crate::analysis::{build_change_series, sample_years, summarize};
use crate::api::PriceSource;
use crate::error::{PipelineError, Result};
use crate::models::{DashboardReport, Query, TickerReport, YearSeries};

/// Concurrence par défaut du fan-out des requêtes de prix
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Exécute les requêtes du dashboard contre une source de prix
pub struct Dashboard<S> {
    source: S,
    concurrency: usize,
}

impl<S: PriceSource> Dashboard<S> {
    pub fn new(source: S, concurrency: usize) -> Self {
        Self {
            source,
            concurrency: concurrency.max(1),
        }
    }

    /// Accès à la source (ex: vider le cache)
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Calcule le rapport complet d'une requête
    ///
    /// # Erreurs
    /// Toute erreur annule le calcul : aucun résultat partiel n'est retourné.
    #[instrument(skip(self, query), fields(tickers = ?query.tickers, start = query.start_year, end = query.end_year, interval = query.interval))]
    pub async fn handle(&self, query: &Query) -> Result<DashboardReport> {
        query.validate()?;

        let sampled = sample_years(
            &self.source,
            &query.tickers,
            query.sampled_years(),
            self.concurrency,
        )
        .await?;

        let tickers = sampled
            .into_iter()
            .map(|series| build_ticker_report(series, query))
            .collect::<Result<Vec<_>>>()?;

        info!(rows = tickers.first().map(|t| t.changes.len()).unwrap_or(0), "Dashboard report ready");

        Ok(DashboardReport {
            query: query.clone(),
            tickers,
        })
    }
}

/// Variations + résumés d'un ticker
fn build_ticker_report(sampled: YearSeries, query: &Query) -> Result<TickerReport> {
    let changes = build_change_series(&sampled, query.interval, query.start_year)?;
    if changes.is_empty() {
        return Err(PipelineError::EmptySeries);
    }

    let prices = sampled.since(query.start_year);
    let price_summary = summarize(&prices.closing_prices())?;

    let change_values: Vec<f64> = changes.iter().map(|c| c.percent_change).collect();
    let change_summary = summarize(&change_values)?;

    Ok(TickerReport {
        ticker: sampled.ticker.clone(),
        sampled,
        prices,
        changes,
        price_summary,
        change_summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::StaticSource;
    use crate::models::{ChartKind, SeriesColor, SeriesColoring, View};

    fn gspc_source() -> StaticSource {
        StaticSource::new().with_series("^GSPC", 2009, &[900.0, 1000.0, 1100.0, 1200.0])
    }

    fn query(tickers: &[&str], start: i32, end: i32, interval: i32) -> Query {
        Query::new(
            tickers.iter().map(|t| t.to_string()).collect(),
            start,
            end,
            interval,
        )
    }

    #[tokio::test]
    async fn test_known_prices_scenario() {
        let dashboard = Dashboard::new(gspc_source(), 4);
        let report = dashboard
            .handle(&query(&["^GSPC"], 2010, 2012, 1))
            .await
            .unwrap();

        assert_eq!(report.view(), View::Single);
        let gspc = &report.tickers[0];

        assert_eq!(gspc.sampled.len(), 4);
        assert_eq!(gspc.prices.len(), 3);

        let rounded: Vec<(i32, f64)> = gspc
            .changes
            .iter()
            .map(|c| (c.year, (c.percent_change * 100.0).round() / 100.0))
            .collect();
        assert_eq!(rounded, vec![(2010, 11.11), (2011, 10.0), (2012, 9.09)]);

        let prices = gspc.price_summary.rounded();
        assert_eq!(prices.max, 1200.0);
        assert_eq!(prices.min, 1000.0);
        assert_eq!(prices.mean, 1100.0);
    }

    #[tokio::test]
    async fn test_series_lengths() {
        let prices: Vec<f64> = (0..30).map(|i| 50.0 + (i as f64) * 3.5).collect();
        let source = StaticSource::new().with_series("WMT", 1995, &prices);
        let dashboard = Dashboard::new(source, 8);

        let q = query(&["WMT"], 2002, 2024, 7);
        let report = dashboard.handle(&q).await.unwrap();
        let wmt = &report.tickers[0];

        let before = (q.end_year - (q.start_year - q.interval) + 1) as usize;
        let after = (q.end_year - q.start_year + 1) as usize;
        assert_eq!(wmt.sampled.len(), before);
        assert_eq!(wmt.prices.len(), after);
        assert_eq!(wmt.changes.len(), after);
        assert_eq!(wmt.changes.first().map(|c| c.year), Some(2002));
        assert_eq!(wmt.changes.last().map(|c| c.year), Some(2024));
    }

    #[tokio::test]
    async fn test_ticker_listed_too_late() {
        // Coté en 2011 : 2009 n'existe pas
        let source = StaticSource::new().with_series("ABNB", 2011, &[10.0, 12.0]);
        let dashboard = Dashboard::new(source, 1);

        let err = dashboard
            .handle(&query(&["ABNB"], 2010, 2012, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::NoDataForYear { year: 2009, .. }));
    }

    #[tokio::test]
    async fn test_zero_interval() {
        let dashboard = Dashboard::new(gspc_source(), 4);
        let report = dashboard
            .handle(&query(&["^GSPC"], 2010, 2012, 0))
            .await
            .unwrap();

        let gspc = &report.tickers[0];
        assert_eq!(gspc.sampled.len(), 3);
        assert!(gspc.changes.iter().all(|c| c.percent_change == 0.0));
        assert_eq!(gspc.change_summary.std_dev, 0.0);
    }

    #[tokio::test]
    async fn test_invalid_query_makes_no_request() {
        let dashboard = Dashboard::new(gspc_source(), 4);

        let err = dashboard
            .handle(&query(&["^GSPC"], 2012, 2010, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptySeries));

        let err = dashboard
            .handle(&query(&["^GSPC"], 2010, 2012, 30))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInterval(30)));

        let err = dashboard
            .handle(&query(&["^GSPC"], i32::MIN, 2024, 7))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidYear(_)));

        assert_eq!(dashboard.source().calls(), 0);
    }

    #[tokio::test]
    async fn test_single_year_std_dev_is_nan() {
        let dashboard = Dashboard::new(gspc_source(), 4);
        let report = dashboard
            .handle(&query(&["^GSPC"], 2012, 2012, 1))
            .await
            .unwrap();

        assert!(report.tickers[0].change_summary.std_dev.is_nan());
        let metrics = report.change_metrics();
        assert_eq!(metrics[3].value, "N/A");
    }

    #[tokio::test]
    async fn test_idempotent_tables() {
        let dashboard = Dashboard::new(gspc_source(), 4);
        let q = query(&["^GSPC"], 2010, 2012, 1);

        let first = dashboard.handle(&q).await.unwrap();
        let second = dashboard.handle(&q).await.unwrap();

        assert_eq!(first.formatted_rows(), second.formatted_rows());
        assert_eq!(first.change_metrics(), second.change_metrics());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_single_view_presentation() {
        let dashboard = Dashboard::new(gspc_source(), 4);
        let report = dashboard
            .handle(&query(&["^GSPC"], 2010, 2012, 1))
            .await
            .unwrap();

        assert_eq!(
            report.table_header(),
            vec!["Year", "Adj Close", "Percent Change From 1 Years Ago"]
        );
        assert_eq!(
            report.formatted_rows(),
            vec![
                vec!["2010", "$1,000.00", "+11.11%"],
                vec!["2011", "$1,100.00", "+10.00%"],
                vec!["2012", "$1,200.00", "+9.09%"],
            ]
        );

        let change = report.change_metrics();
        assert_eq!(change.len(), 4);
        assert_eq!(change[0].label, "Highest Change");
        assert_eq!(change[0].value, "11.11%");
        assert_eq!(change[1].value, "9.09%");
        assert_eq!(change[3].label, "Variance of Change (std)");

        let price = report.price_metrics();
        assert_eq!(price.len(), 3);
        assert_eq!(price[0].value, "$1,200.00");
        assert_eq!(price[2].label, "Average Value");
        assert_eq!(price[2].value, "$1,100.00");

        let bar = report.change_chart();
        assert_eq!(bar.kind, ChartKind::Bar);
        assert_eq!(
            bar.title,
            "Percent Change of Last 1 Years of Closing Price of ^GSPC on First Day of Each Year"
        );
        assert_eq!(bar.series[0].coloring, SeriesColoring::BySign);
        assert_eq!(bar.series[0].points.len(), 3);

        let line = report.price_chart();
        assert_eq!(line.kind, ChartKind::Line);
        assert_eq!(line.title, "Closing Price of ^GSPC on First Day of Each Year");
        assert_eq!(line.series[0].points[0], (2010, 1000.0));
    }

    #[tokio::test]
    async fn test_compare_view_zips_by_year() {
        let source = gspc_source().with_series("WMT", 2009, &[48.0, 53.5, 54.0, 60.0]);
        let dashboard = Dashboard::new(source, 4);
        let report = dashboard
            .handle(&query(&["^GSPC", "WMT"], 2010, 2012, 1))
            .await
            .unwrap();

        assert_eq!(report.view(), View::Compare);
        assert_eq!(report.tickers.len(), 2);

        let rows = report.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].year, 2010);
        assert_eq!(rows[0].prices, vec![1000.0, 53.5]);
        assert!((rows[2].changes[1] - (60.0 - 54.0) / 54.0 * 100.0).abs() < 1e-6);

        assert_eq!(
            report.table_header(),
            vec![
                "Year",
                "Adj Close (^GSPC)",
                "Adj Close (WMT)",
                "% Change from 1 Years Ago (^GSPC)",
                "% Change from 1 Years Ago (WMT)",
            ]
        );

        // Les libellés du graphique sont ceux des colonnes : couleurs cohérentes
        let bar = report.change_chart();
        assert_eq!(bar.title, "^GSPC v.s. WMT");
        assert_eq!(bar.series[0].label, report.table_header()[3]);
        assert_eq!(bar.series[1].label, report.table_header()[4]);
        assert_eq!(bar.series[0].coloring, SeriesColoring::Fixed(SeriesColor::LightSkyBlue));
        assert_eq!(bar.series[1].coloring, SeriesColoring::Fixed(SeriesColor::LightSalmon));

        let line = report.price_chart();
        assert_eq!(line.title, "Closing Price of ^GSPC and WMT on First Day of Each Year");
        assert_eq!(line.series[1].label, "Adj Close (WMT)");

        assert_eq!(report.change_metrics().len(), 8);
        assert_eq!(report.price_metrics().len(), 6);
        assert_eq!(report.change_metrics()[7].label, "Variance (WMT)");
    }

    #[tokio::test]
    async fn test_compare_fails_if_either_ticker_fails() {
        let source = gspc_source().with_series("WMT", 2011, &[54.0, 60.0]);
        let dashboard = Dashboard::new(source, 4);

        let err = dashboard
            .handle(&query(&["^GSPC", "WMT"], 2010, 2012, 1))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::NoDataForYear { ref ticker, .. } if ticker == "WMT"
        ));
    }
}

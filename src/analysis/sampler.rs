// ============================================================================
// Year-Sampler
// ============================================================================
// Pour chaque (ticker, année) de la plage demandée, récupère la clôture de la
// première séance de l'année, puis assemble une YearSeries par ticker.
//
// CONCEPT : Fan-out borné
// - Toutes les requêtes sont lancées via un stream futures
// - buffer_unordered(n) : au plus n requêtes en vol simultanément
// - Les requêtes sont émises par année croissante, ticker A avant ticker B
//   (avec n = 1, c'est exactement la boucle séquentielle)
// - try_collect() s'arrête à la première erreur : tout le calcul est annulé
// ============================================================================

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument};

use crate::api::PriceSource;
use crate::error::{PipelineError, Result};
use crate::models::YearSeries;

/// Échantillonne les prix de début d'année de chaque ticker
///
/// # Arguments
/// * `source` - Source des prix (Yahoo, cache, ...)
/// * `tickers` - Symboles à échantillonner
/// * `years` - Plage d'années, années d'amorçage comprises
/// * `concurrency` - Nombre maximal de requêtes simultanées (min 1)
///
/// # Retourne
/// Une YearSeries par ticker, dans l'ordre de `tickers`
#[instrument(skip(source))]
pub async fn sample_years<S: PriceSource + ?Sized>(
    source: &S,
    tickers: &[String],
    years: RangeInclusive<i32>,
    concurrency: usize,
) -> Result<Vec<YearSeries>> {
    // Ordre d'émission : années croissantes, puis tickers dans l'ordre
    let requests: Vec<(usize, i32)> = years
        .clone()
        .flat_map(|year| (0..tickers.len()).map(move |index| (index, year)))
        .collect();

    debug!(requests = requests.len(), "Issuing price requests");

    let fetched: Vec<(usize, i32, f64)> = stream::iter(requests)
        .map(|(index, year)| async move {
            let ticker = &tickers[index];
            let price = source.first_close_of_year(ticker, year).await?;

            if !price.is_finite() || price <= 0.0 {
                return Err(PipelineError::InvalidPrice {
                    ticker: ticker.clone(),
                    year,
                    price,
                });
            }

            Ok::<_, PipelineError>((index, year, price))
        })
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    // Regroupe par ticker ; BTreeMap trie par année
    let mut by_ticker: Vec<BTreeMap<i32, f64>> = vec![BTreeMap::new(); tickers.len()];
    for (index, year, price) in fetched {
        by_ticker[index].insert(year, price);
    }

    let series = tickers
        .iter()
        .zip(by_ticker.iter())
        .map(|(ticker, prices)| YearSeries::from_prices(ticker, years.clone(), prices))
        .collect::<Result<Vec<_>>>()?;

    info!(
        tickers = tickers.len(),
        years = years.clone().count(),
        "Sampled first close of each year"
    );

    Ok(series)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::api::testing::StaticSource;

    fn tickers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_sample_single_ticker() {
        let source = StaticSource::new().with_series("^GSPC", 2009, &[900.0, 1000.0, 1100.0, 1200.0]);

        let series = sample_years(&source, &tickers(&["^GSPC"]), 2009..=2012, 4)
            .await
            .unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].ticker, "^GSPC");
        assert_eq!(series[0].closing_prices(), vec![900.0, 1000.0, 1100.0, 1200.0]);
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test]
    async fn test_sequential_order_with_concurrency_one() {
        let source = StaticSource::new()
            .with_series("^GSPC", 2009, &[900.0, 1000.0])
            .with_series("WMT", 2009, &[50.0, 53.0]);

        sample_years(&source, &tickers(&["^GSPC", "WMT"]), 2009..=2010, 1)
            .await
            .unwrap();

        assert_eq!(
            source.requests(),
            vec![
                ("^GSPC".to_string(), 2009),
                ("WMT".to_string(), 2009),
                ("^GSPC".to_string(), 2010),
                ("WMT".to_string(), 2010),
            ]
        );
        assert_eq!(source.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_fan_out_respects_cap() {
        let prices: Vec<f64> = (0..12).map(|i| 100.0 + i as f64).collect();
        let source = StaticSource::new()
            .with_series("^GSPC", 2000, &prices)
            .with_delay(Duration::from_millis(5));

        let series = sample_years(&source, &tickers(&["^GSPC"]), 2000..=2011, 3)
            .await
            .unwrap();

        assert_eq!(series[0].len(), 12);
        assert!(source.max_in_flight() <= 3);
        assert!(source.max_in_flight() > 1);
        // Résultat ordonné par année quel que soit l'ordre de complétion
        assert_eq!(series[0].closing_prices(), prices);
    }

    #[tokio::test]
    async fn test_missing_year_aborts() {
        // Ticker coté à partir de 2011 seulement
        let source = StaticSource::new().with_series("ABNB", 2011, &[10.0, 12.0]);

        let err = sample_years(&source, &tickers(&["ABNB"]), 2009..=2012, 1)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::NoDataForYear { ref ticker, year: 2009 } if ticker == "ABNB"
        ));
        // Arrêt à la première erreur
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalid_price_rejected() {
        let source = StaticSource::new().with_series("BAD", 2010, &[0.0]);

        let err = sample_years(&source, &tickers(&["BAD"]), 2010..=2010, 1)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidPrice { year: 2010, .. }));
    }
}

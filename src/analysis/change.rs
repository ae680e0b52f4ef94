// ============================================================================
// Change-Series Builder
// ============================================================================
// Variation en pourcentage de chaque année par rapport au prix `interval`
// années plus tôt :
//
//     change[y] = (price[y] - price[y - k]) / price[y - k] × 100
//
// Seules les années [start_year, end_year] sont produites : les k années
// d'amorçage ne servent qu'à calculer les premières variations.
// ============================================================================

use crate::error::{PipelineError, Result};
use crate::models::query::{MAX_INTERVAL, MIN_INTERVAL};
use crate::models::{ChangePoint, YearSeries};

/// Construit la série des variations à partir de `start_year`
///
/// - `interval = 0` : variation nulle pour chaque année, sans division
/// - Le prix passé est cherché par année (jamais par position)
pub fn build_change_series(
    series: &YearSeries,
    interval: i32,
    start_year: i32,
) -> Result<Vec<ChangePoint>> {
    if !(MIN_INTERVAL..=MAX_INTERVAL).contains(&interval) {
        return Err(PipelineError::InvalidInterval(interval));
    }

    series
        .points
        .iter()
        .filter(|point| point.year >= start_year)
        .map(|point| {
            if interval == 0 {
                return Ok(ChangePoint::new(point.year, 0.0));
            }

            let past_year = point.year - interval;
            let past = series
                .price_for(past_year)
                .ok_or_else(|| PipelineError::NoDataForYear {
                    ticker: series.ticker.clone(),
                    year: past_year,
                })?;

            let change = (point.closing_price - past) / past * 100.0;
            Ok(ChangePoint::new(point.year, change))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn series(first_year: i32, prices: &[f64]) -> YearSeries {
        let map: BTreeMap<i32, f64> = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| (first_year + i as i32, p))
            .collect();
        let last_year = first_year + prices.len() as i32 - 1;
        YearSeries::from_prices("^GSPC", first_year..=last_year, &map).unwrap()
    }

    #[test]
    fn test_one_year_interval() {
        let s = series(2009, &[900.0, 1000.0, 1100.0, 1200.0]);
        let changes = build_change_series(&s, 1, 2010).unwrap();

        let years: Vec<i32> = changes.iter().map(|c| c.year).collect();
        assert_eq!(years, vec![2010, 2011, 2012]);

        assert!((changes[0].percent_change - 11.111111).abs() < 1e-6);
        assert!((changes[1].percent_change - 10.0).abs() < 1e-6);
        assert!((changes[2].percent_change - 9.090909).abs() < 1e-6);
    }

    #[test]
    fn test_formula_holds_for_every_year() {
        let prices = [40.0, 38.5, 52.0, 61.25, 47.0, 80.0, 95.5, 90.0];
        let s = series(2000, &prices);
        let interval = 3;
        let changes = build_change_series(&s, interval, 2003).unwrap();

        assert_eq!(changes.len(), prices.len() - interval as usize);
        for change in &changes {
            let current = s.price_for(change.year).unwrap();
            let past = s.price_for(change.year - interval).unwrap();
            let expected = (current - past) / past * 100.0;
            assert!((change.percent_change - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_interval_is_constant_zero() {
        let s = series(2010, &[1000.0, 1100.0, 1200.0]);
        let changes = build_change_series(&s, 0, 2010).unwrap();

        assert_eq!(changes.len(), 3);
        assert!(changes.iter().all(|c| c.percent_change == 0.0));
    }

    #[test]
    fn test_negative_change() {
        let s = series(2008, &[1400.0, 900.0]);
        let changes = build_change_series(&s, 1, 2009).unwrap();

        assert!(changes[0].is_negative());
        assert!((changes[0].percent_change + 35.714285).abs() < 1e-6);
    }

    #[test]
    fn test_missing_bootstrap_year() {
        let s = series(2010, &[1000.0, 1100.0]);
        let err = build_change_series(&s, 2, 2010).unwrap_err();
        assert!(matches!(err, PipelineError::NoDataForYear { year: 2008, .. }));
    }

    #[test]
    fn test_interval_out_of_range() {
        let s = series(2010, &[1000.0]);
        assert!(matches!(
            build_change_series(&s, 26, 2010),
            Err(PipelineError::InvalidInterval(26))
        ));
    }
}

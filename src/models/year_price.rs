// ============================================================================
// Structures : YearPricePoint et YearSeries
// ============================================================================
// Le prix "annuel" d'un ticker est le cours de clôture de la première séance
// de l'année (pas une moyenne, pas une série lissée). Toutes les statistiques
// dérivées en dépendent.
//
// CONCEPT : Invariant "pas de trou"
// - Une YearSeries contient exactement une entrée par année de sa plage
// - Une année manquante est une erreur (NoDataForYear), jamais un défaut
// ============================================================================

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Clôture de la première séance d'une année pour un ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearPricePoint {
    pub year: i32,
    pub ticker: String,
    pub closing_price: f64,
}

impl YearPricePoint {
    pub fn new(year: i32, ticker: String, closing_price: f64) -> Self {
        Self {
            year,
            ticker,
            closing_price,
        }
    }
}

/// Série annuelle d'un ticker, triée par année croissante, sans trou
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSeries {
    pub ticker: String,
    pub points: Vec<YearPricePoint>,
}

impl YearSeries {
    /// Assemble une série à partir des prix collectés par année
    ///
    /// CONCEPT RUST : BTreeMap
    /// - Clés triées : l'ordre de collecte (fan-out) n'a aucune influence
    /// - Chaque année de `years` doit être présente, sinon NoDataForYear
    pub fn from_prices(
        ticker: &str,
        years: RangeInclusive<i32>,
        prices: &BTreeMap<i32, f64>,
    ) -> Result<Self> {
        let points = years
            .map(|year| {
                prices
                    .get(&year)
                    .map(|&price| YearPricePoint::new(year, ticker.to_string(), price))
                    .ok_or_else(|| PipelineError::NoDataForYear {
                        ticker: ticker.to_string(),
                        year,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            ticker: ticker.to_string(),
            points,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.points.first().map(|p| p.year)
    }

    pub fn last_year(&self) -> Option<i32> {
        self.points.last().map(|p| p.year)
    }

    /// Prix d'une année donnée
    ///
    /// Les années étant contiguës, l'index se déduit de la première année.
    pub fn price_for(&self, year: i32) -> Option<f64> {
        let first = self.first_year()?;
        let index = usize::try_from(year.checked_sub(first)?).ok()?;
        self.points
            .get(index)
            .filter(|p| p.year == year)
            .map(|p| p.closing_price)
    }

    /// Sous-série à partir de `year` (les années d'amorçage sont retirées)
    pub fn since(&self, year: i32) -> YearSeries {
        YearSeries {
            ticker: self.ticker.clone(),
            points: self
                .points
                .iter()
                .filter(|p| p.year >= year)
                .cloned()
                .collect(),
        }
    }

    /// Les prix seuls, dans l'ordre des années
    pub fn closing_prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.closing_price).collect()
    }
}

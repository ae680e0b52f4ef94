// ============================================================================
// Structure : Query
// ============================================================================
// Les entrées du dashboard : ticker(s), année de début, année de fin et
// intervalle d'années. Une Query est validée avant tout appel réseau.
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Ticker par défaut de la vue simple (S&P 500)
pub const DEFAULT_TICKER: &str = "^GSPC";

/// Second ticker par défaut de la vue comparaison
pub const DEFAULT_COMPARE_TICKER: &str = "WMT";

pub const DEFAULT_START_YEAR: i32 = 2000;
pub const DEFAULT_END_YEAR: i32 = 2024;
pub const DEFAULT_INTERVAL: i32 = 7;

/// Bornes de l'intervalle d'années (incluses)
pub const MIN_INTERVAL: i32 = 0;
pub const MAX_INTERVAL: i32 = 25;

/// Années acceptées (incluses), années d'amorçage comprises
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Vue du dashboard, déduite du nombre de tickers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    /// Un seul ticker
    Single,
    /// Deux tickers comparés année par année
    Compare,
}

impl View {
    pub fn label(&self) -> &'static str {
        match self {
            View::Single => "Single",
            View::Compare => "Compare",
        }
    }

    /// Bascule Single <-> Compare
    pub fn toggle(&self) -> Self {
        match self {
            View::Single => View::Compare,
            View::Compare => View::Single,
        }
    }
}

/// Paramètres d'un calcul du dashboard
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    /// Un ou deux symboles (ex: "^GSPC", "WMT")
    pub tickers: Vec<String>,

    /// Première année affichée
    pub start_year: i32,

    /// Dernière année affichée (incluse)
    pub end_year: i32,

    /// Nombre d'années entre le prix courant et le prix de référence
    pub interval: i32,
}

impl Query {
    /// Crée une requête ; les symboles sont normalisés (trim + majuscules)
    pub fn new(tickers: Vec<String>, start_year: i32, end_year: i32, interval: i32) -> Self {
        Self {
            tickers: tickers.iter().map(|t| normalize_ticker(t)).collect(),
            start_year,
            end_year,
            interval,
        }
    }

    /// Requête de la vue simple avec les valeurs par défaut
    pub fn single(ticker: &str) -> Self {
        Self::new(
            vec![ticker.to_string()],
            DEFAULT_START_YEAR,
            DEFAULT_END_YEAR,
            DEFAULT_INTERVAL,
        )
    }

    /// Requête de la vue comparaison avec les valeurs par défaut
    pub fn compare(first: &str, second: &str) -> Self {
        Self::new(
            vec![first.to_string(), second.to_string()],
            DEFAULT_START_YEAR,
            DEFAULT_END_YEAR,
            DEFAULT_INTERVAL,
        )
    }

    pub fn view(&self) -> View {
        if self.tickers.len() > 1 {
            View::Compare
        } else {
            View::Single
        }
    }

    /// Première année à échantillonner (années d'amorçage comprises)
    ///
    /// Saturée aux bornes de i32 ; validate() rejette ces valeurs.
    pub fn first_sampled_year(&self) -> i32 {
        self.start_year.saturating_sub(self.interval)
    }

    /// Années à échantillonner : [start_year - interval, end_year]
    pub fn sampled_years(&self) -> std::ops::RangeInclusive<i32> {
        self.first_sampled_year()..=self.end_year
    }

    /// Vérifie la requête avant tout appel réseau
    ///
    /// L'ordre des vérifications détermine l'erreur remontée quand
    /// plusieurs entrées sont invalides à la fois.
    pub fn validate(&self) -> Result<()> {
        if self.tickers.is_empty() || self.tickers.len() > 2 {
            return Err(PipelineError::InvalidTickerCount(self.tickers.len()));
        }

        if !(MIN_INTERVAL..=MAX_INTERVAL).contains(&self.interval) {
            return Err(PipelineError::InvalidInterval(self.interval));
        }

        // Aucune année de sortie : inutile d'interroger la source
        if self.end_year < self.start_year {
            return Err(PipelineError::EmptySeries);
        }

        let first = self
            .start_year
            .checked_sub(self.interval)
            .ok_or(PipelineError::InvalidYear(
                i64::from(self.start_year) - i64::from(self.interval),
            ))?;
        for year in [first, self.end_year] {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                return Err(PipelineError::InvalidYear(i64::from(year)));
            }
        }

        Ok(())
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::single(DEFAULT_TICKER)
    }
}

/// Normalise un symbole saisi par l'utilisateur
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = Query::default();
        assert_eq!(query.tickers, vec!["^GSPC".to_string()]);
        assert_eq!(query.start_year, 2000);
        assert_eq!(query.end_year, 2024);
        assert_eq!(query.interval, 7);
        assert_eq!(query.view(), View::Single);

        let compare = Query::compare(DEFAULT_TICKER, DEFAULT_COMPARE_TICKER);
        assert_eq!(compare.view(), View::Compare);
        assert_eq!(compare.tickers[1], "WMT");
    }

    #[test]
    fn test_tickers_are_normalized() {
        let query = Query::new(vec!["  wmt ".to_string()], 2010, 2012, 1);
        assert_eq!(query.tickers, vec!["WMT".to_string()]);
    }

    #[test]
    fn test_sampled_years_include_bootstrap() {
        let query = Query::new(vec!["^GSPC".to_string()], 2010, 2012, 1);
        assert_eq!(query.sampled_years(), 2009..=2012);
        assert_eq!(query.sampled_years().count(), 4);
    }

    #[test]
    fn test_validate_interval_bounds() {
        let mut query = Query::default();
        query.interval = 26;
        assert!(matches!(query.validate(), Err(PipelineError::InvalidInterval(26))));

        query.interval = -1;
        assert!(matches!(query.validate(), Err(PipelineError::InvalidInterval(-1))));

        query.interval = 0;
        assert!(query.validate().is_ok());

        query.interval = 25;
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_range() {
        let query = Query::new(vec!["^GSPC".to_string()], 2012, 2010, 1);
        assert!(matches!(query.validate(), Err(PipelineError::EmptySeries)));
    }

    #[test]
    fn test_validate_year_bounds() {
        let query = Query::new(vec!["^GSPC".to_string()], i32::MIN, 2024, 7);
        assert_eq!(query.first_sampled_year(), i32::MIN);
        assert!(matches!(
            query.validate(),
            Err(PipelineError::InvalidYear(year)) if year == i64::from(i32::MIN) - 7
        ));

        // L'amorçage sort de la plage même si l'année de début y est
        let query = Query::new(vec!["^GSPC".to_string()], 3, 10, 7);
        assert!(matches!(query.validate(), Err(PipelineError::InvalidYear(-4))));

        let query = Query::new(vec!["^GSPC".to_string()], 2000, i32::MAX, 7);
        assert!(matches!(query.validate(), Err(PipelineError::InvalidYear(_))));

        let query = Query::new(vec!["^GSPC".to_string()], 8, 9999, 7);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_validate_ticker_count() {
        let query = Query::new(Vec::new(), 2010, 2012, 1);
        assert!(matches!(query.validate(), Err(PipelineError::InvalidTickerCount(0))));

        let query = Query::new(
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            2010,
            2012,
            1,
        );
        assert!(matches!(query.validate(), Err(PipelineError::InvalidTickerCount(3))));
    }

    #[test]
    fn test_view_toggle() {
        assert_eq!(View::Single.toggle(), View::Compare);
        assert_eq!(View::Compare.toggle(), View::Single);
    }
}

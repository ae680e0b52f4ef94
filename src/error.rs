// ============================================================================
// Erreurs du pipeline
// ============================================================================
// Toutes les erreurs qui peuvent interrompre un calcul du dashboard.
// Aucune récupération locale : la première erreur annule le calcul complet
// et le message est affiché tel quel à l'utilisateur.
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] génère l'implémentation de std::error::Error
// - #[error("...")] génère Display avec interpolation des champs
// - #[source] chaîne l'erreur sous-jacente (visible avec {:?} / anyhow)
// ============================================================================

use thiserror::Error;

/// Erreurs du pipeline Year-Sampler → Change-Series → Summary
#[derive(Debug, Error)]
pub enum PipelineError {
    /// La source n'a retourné aucune séance dans la fenêtre de début d'année
    /// (ticker pas encore coté, ticker inconnu, pas d'historique)
    #[error("No data for {ticker} in the first days of {year}")]
    NoDataForYear { ticker: String, year: i32 },

    /// Aucune ligne de variation après suppression des années d'amorçage
    #[error("No rows left to display: end year must be greater than or equal to start year")]
    EmptySeries,

    /// Intervalle hors de [0, 25]
    #[error("Interval of years must be between 0 and 25 (got {0})")]
    InvalidInterval(i32),

    /// Année hors de la plage représentable (années d'amorçage comprises)
    #[error("Year {0} is out of range (1-9999)")]
    InvalidYear(i64),

    /// Une requête porte sur un ou deux tickers
    #[error("A query needs one or two tickers (got {0})")]
    InvalidTickerCount(usize),

    /// Prix inutilisable pour un calcul de variation
    #[error("Invalid closing price {price} for {ticker} in {year}")]
    InvalidPrice { ticker: String, year: i32, price: f64 },

    /// Échec de la source elle-même (réseau, HTTP, JSON)
    #[error("Price source failed for {ticker} in {year}")]
    Source {
        ticker: String,
        year: i32,
        #[source]
        source: anyhow::Error,
    },
}

/// Alias pour les résultats du pipeline
pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    /// Message affiché à l'utilisateur, avec la cause éventuelle
    ///
    /// Ex: "Price source failed for WMT in 2003: HTTP 503"
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Source { source, .. } => format!("{}: {:#}", self, source),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_message() {
        let err = PipelineError::NoDataForYear {
            ticker: "ABNB".to_string(),
            year: 2013,
        };
        assert_eq!(err.to_string(), "No data for ABNB in the first days of 2013");
    }

    #[test]
    fn test_user_message_includes_source() {
        let err = PipelineError::Source {
            ticker: "WMT".to_string(),
            year: 2003,
            source: anyhow::anyhow!("HTTP 503"),
        };
        assert_eq!(err.user_message(), "Price source failed for WMT in 2003: HTTP 503");
    }
}

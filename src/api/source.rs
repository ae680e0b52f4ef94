// ============================================================================
// Trait : PriceSource
// ============================================================================
// Point d'entrée unique vers les données de marché : le cours de clôture de la
// première séance d'une année. Implémenté par le client Yahoo Finance, par le
// cache mémoire qui l'enveloppe, et par une source statique dans les tests.
//
// CONCEPT RUST : async_trait
// - Les méthodes async des traits ne sont pas object-safe nativement
// - #[async_trait] les transforme en méthodes retournant une Future boxée
// - Send + Sync : la source est partagée par les futures du fan-out
// ============================================================================

use async_trait::async_trait;

use crate::error::Result;

/// Source des prix de début d'année
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Clôture de la première séance au 1er janvier ou après (fenêtre courte)
    ///
    /// # Erreurs
    /// * `NoDataForYear` si la source n'a aucune séance dans la fenêtre
    /// * `Source` si la requête elle-même échoue
    async fn first_close_of_year(&self, ticker: &str, year: i32) -> Result<f64>;
}

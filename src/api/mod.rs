// ============================================================================
// Module : api
// ============================================================================
// Ce module contient l'accès aux données de marché : le trait PriceSource,
// le client Yahoo Finance et le cache mémoire qui l'enveloppe.
// ============================================================================

pub mod cache;  // Cache (ticker, année) avec TTL
pub mod source; // Trait PriceSource
pub mod yahoo;  // Client API Yahoo Finance

#[cfg(test)]
pub mod testing; // Source en mémoire pour les tests

// Re-export des types principaux
pub use cache::CachedSource;
pub use source::PriceSource;
pub use yahoo::YahooClient;

// ============================================================================
// Cache : CachedSource
// ============================================================================
// Mémoïsation des prix par (ticker, année) avec une durée de vie (TTL).
// Les prix historiques ne changent pas : une requête répétée avec les mêmes
// paramètres ne refait aucun appel réseau tant que l'entrée est fraîche.
//
// CONCEPT RUST : Décorateur générique
// - CachedSource<S> enveloppe n'importe quelle source S: PriceSource
// - Implémente lui-même PriceSource, donc transparent pour le pipeline
//
// CONCEPT RUST : tokio::sync::Mutex
// - Le verrou n'est jamais tenu pendant un .await réseau
// - Seuls les succès sont mis en cache (une erreur est retentée au prochain
//   calcul, sur action de l'utilisateur)
// ============================================================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::api::PriceSource;
use crate::error::Result;

/// Entrée du cache : prix + instant de récupération
#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    price: f64,
    fetched_at: Instant,
}

/// Source avec cache mémoire partagé entre les requêtes de la session
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<(String, i32), CacheEntry>>,
}

impl<S: PriceSource> CachedSource<S> {
    /// Enveloppe `inner` ; un TTL nul désactive la réutilisation
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Nombre d'entrées actuellement en cache (fraîches ou non)
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Vide le cache (rechargement forcé)
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Retourne le prix en cache s'il est encore frais
    async fn lookup(&self, key: &(String, i32)) -> Option<f64> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.price)
    }
}

#[async_trait]
impl<S: PriceSource> PriceSource for CachedSource<S> {
    async fn first_close_of_year(&self, ticker: &str, year: i32) -> Result<f64> {
        let key = (ticker.to_string(), year);

        if let Some(price) = self.lookup(&key).await {
            trace!(ticker = %ticker, year, "Cache hit");
            return Ok(price);
        }

        debug!(ticker = %ticker, year, "Cache miss, fetching from source");
        let price = self.inner.first_close_of_year(ticker, year).await?;

        self.entries.lock().await.insert(
            key,
            CacheEntry {
                price,
                fetched_at: Instant::now(),
            },
        );

        Ok(price)
    }
}

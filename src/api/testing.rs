// ============================================================================
// Source de test : StaticSource
// ============================================================================
// Prix en mémoire pour les tests, sans réseau. Enregistre le nombre d'appels,
// l'ordre des requêtes et la concurrence maximale observée.
// ============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::PriceSource;
use crate::error::{PipelineError, Result};

#[derive(Default)]
pub struct StaticSource {
    prices: HashMap<(String, i32), f64>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<(String, i32)>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute les prix (année, clôture) d'un ticker
    pub fn with_prices(mut self, ticker: &str, prices: &[(i32, f64)]) -> Self {
        for &(year, price) in prices {
            self.prices.insert((ticker.to_string(), year), price);
        }
        self
    }

    /// Ajoute une série continue à partir de `first_year`
    pub fn with_series(self, ticker: &str, first_year: i32, prices: &[f64]) -> Self {
        let entries: Vec<(i32, f64)> = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| (first_year + i as i32, p))
            .collect();
        self.with_prices(ticker, &entries)
    }

    /// Chaque appel attend `delay` avant de répondre
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Requêtes dans l'ordre où elles ont commencé
    pub fn requests(&self) -> Vec<(String, i32)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for StaticSource {
    async fn first_close_of_year(&self, ticker: &str, year: i32) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((ticker.to_string(), year));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.prices
            .get(&(ticker.to_string(), year))
            .copied()
            .ok_or_else(|| PipelineError::NoDataForYear {
                ticker: ticker.to_string(),
                year,
            })
    }
}

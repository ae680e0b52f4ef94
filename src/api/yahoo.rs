// ============================================================================
// API Client : Yahoo Finance
// ============================================================================
// Récupère le cours de clôture de la première séance de chaque année
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. Result<T, E> : erreurs typées du pipeline + contexte anyhow
// 3. Serde : désérialisation JSON automatique
// ============================================================================

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::api::PriceSource;
use crate::error::{PipelineError, Result};

/// URL de base de l'API chart de Yahoo Finance
const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Taille de la fenêtre de sondage : du 1er au 4 janvier inclus
///
/// Le 1er janvier est toujours férié ; un week-end prolongé repousse la
/// première séance au plus tard au 4.
const PROBE_DAYS: i64 = 4;

// ============================================================================
// Structures pour parser la réponse JSON de Yahoo Finance
// ============================================================================
// Yahoo retourne un JSON complexe, on définit des structures qui matchent
// exactement la structure JSON pour que serde puisse désérialiser automatiquement
// ============================================================================

/// Réponse complète de l'API Yahoo Finance
#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    /// null quand Yahoo retourne une erreur (symbole inconnu, etc.)
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,

    /// Clôtures ajustées (dividendes, splits), présentes en intervalle 1d
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    adjclose: Option<Vec<Option<f64>>>,
}

// ============================================================================
// Client
// ============================================================================

/// Client Yahoo Finance
///
/// Le client HTTP est créé une seule fois et réutilisé pour toutes les
/// requêtes (pool de connexions partagé par le fan-out).
#[derive(Debug, Clone)]
pub struct YahooClient {
    http: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    /// Crée le client avec un User-Agent de navigateur
    ///
    /// Sans User-Agent, Yahoo bloque les requêtes.
    pub fn new() -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            http,
            base_url: YAHOO_CHART_URL.to_string(),
        })
    }

    /// Envoie la requête et désérialise la réponse
    async fn fetch_window(&self, url: Url) -> anyhow::Result<(StatusCode, Option<YahooResponse>)> {
        debug!("Sending HTTP request to Yahoo Finance");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Échec de la requête HTTP vers Yahoo Finance")?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // 404 : symbole inconnu, le corps n'a pas d'intérêt
        if status == StatusCode::NOT_FOUND {
            return Ok((status, None));
        }

        if !status.is_success() {
            anyhow::bail!("Yahoo Finance a retourné une erreur : HTTP {}", status);
        }

        let parsed: YahooResponse = response
            .json()
            .await
            .context("Échec du parsing JSON de la réponse Yahoo")?;

        Ok((status, Some(parsed)))
    }
}

#[async_trait]
impl PriceSource for YahooClient {
    /// Interroge la fenêtre [1er janvier, 5 janvier) de l'année
    ///
    /// CONCEPT RUST : #[instrument]
    /// - Tous les logs à l'intérieur auront le contexte ticker + year
    #[instrument(skip(self))]
    async fn first_close_of_year(&self, ticker: &str, year: i32) -> Result<f64> {
        let url = build_yahoo_url(&self.base_url, ticker, year)?;
        debug!(url = %url, "Built Yahoo Finance API URL");

        let (status, response) =
            self.fetch_window(url)
                .await
                .map_err(|source| PipelineError::Source {
                    ticker: ticker.to_string(),
                    year,
                    source,
                })?;

        let Some(response) = response else {
            warn!(status = %status, "Ticker not found by Yahoo Finance");
            return Err(no_data(ticker, year));
        };

        let price = first_close_in_window(response, ticker, year)?;
        info!(price, "Fetched first close of year");
        Ok(price)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Timestamps Unix (UTC) de la fenêtre de sondage [1er janvier, +PROBE_DAYS)
fn probe_window(year: i32) -> Option<(i64, i64)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?.and_utc();
    let end = start + chrono::Duration::days(PROBE_DAYS);
    Some((start.timestamp(), end.timestamp()))
}

/// Construit l'URL de l'API Yahoo Finance pour la fenêtre d'une année
///
/// Le symbole est un segment de chemin et les paramètres passent par la
/// query string : l'encodage ("/", "?", "#", espace...) est fait par Url.
fn build_yahoo_url(base_url: &str, ticker: &str, year: i32) -> Result<Url> {
    let (period1, period2) = probe_window(year).ok_or_else(|| no_data(ticker, year))?;

    let mut url = Url::parse(base_url).map_err(|e| PipelineError::Source {
        ticker: ticker.to_string(),
        year,
        source: anyhow::Error::new(e).context("URL de base Yahoo invalide"),
    })?;

    url.path_segments_mut()
        .map_err(|_| PipelineError::Source {
            ticker: ticker.to_string(),
            year,
            source: anyhow::anyhow!("URL de base Yahoo sans chemin : {}", base_url),
        })?
        .push(ticker);

    url.query_pairs_mut()
        .append_pair("interval", "1d")
        .append_pair("period1", &period1.to_string())
        .append_pair("period2", &period2.to_string());

    Ok(url)
}

fn no_data(ticker: &str, year: i32) -> PipelineError {
    PipelineError::NoDataForYear {
        ticker: ticker.to_string(),
        year,
    }
}

/// Extrait la clôture de la première séance de la fenêtre
///
/// La clôture ajustée est utilisée quand Yahoo la fournit, sinon la clôture
/// brute. Les séances sans valeur sont ignorées.
fn first_close_in_window(response: YahooResponse, ticker: &str, year: i32) -> Result<f64> {
    if let Some(error) = response.chart.error {
        warn!(code = %error.code, description = ?error.description, "Yahoo Finance returned an error payload");
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Err(no_data(ticker, year));
        }
        return Err(PipelineError::Source {
            ticker: ticker.to_string(),
            year,
            source: anyhow::anyhow!(
                "{}: {}",
                error.code,
                error.description.unwrap_or_default()
            ),
        });
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| no_data(ticker, year))?;

    let timestamps = result.timestamp.unwrap_or_default();
    debug!(timestamp_count = timestamps.len(), "Received timestamps from Yahoo");

    let adjusted = result
        .indicators
        .adjclose
        .and_then(|a| a.into_iter().next())
        .and_then(|a| a.adjclose)
        .unwrap_or_default();

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .and_then(|q| q.close)
        .unwrap_or_default();

    let (window_start, window_end) = probe_window(year).ok_or_else(|| no_data(ticker, year))?;

    // Première séance (par timestamp) dans la fenêtre avec une valeur
    let first = timestamps
        .iter()
        .enumerate()
        .filter(|&(_, &ts)| ts >= window_start && ts < window_end)
        .filter_map(|(i, &ts)| {
            let price = adjusted
                .get(i)
                .copied()
                .flatten()
                .or_else(|| closes.get(i).copied().flatten())?;
            Some((ts, price))
        })
        .min_by_key(|&(ts, _)| ts);

    let (timestamp, price) = first.ok_or_else(|| no_data(ticker, year))?;

    if let Some(date) = DateTime::from_timestamp(timestamp, 0) {
        debug!(date = %date.date_naive(), price, "Selected first trading session");
    }

    Ok(price)
}

// ============================================================================
// Tests unitaires
// ============================================================================

// ============================================================================
// Configuration : ligne de commande
// ============================================================================
// longview [OPTIONS] [tui | report ...]
//
// - Sans sous-commande : lance le dashboard interactif (TUI)
// - report : calcul unique, affichage texte ou JSON sur stdout
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::analysis::DEFAULT_CONCURRENCY;
use crate::models::query::{
    DEFAULT_END_YEAR, DEFAULT_INTERVAL, DEFAULT_START_YEAR, DEFAULT_TICKER,
};
use crate::models::Query;

/// TTL par défaut du cache des prix (1 heure)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

#[derive(Parser, Debug)]
#[command(version, about = "Long term stock investment performance dashboard", long_about = None)]
pub struct Cli {
    /// Maximum number of concurrent price requests
    #[arg(long, global = true, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Price cache time-to-live in seconds (0 disables reuse)
    #[arg(long, global = true, default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    /// Directory for the rotating log files
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive terminal dashboard (default).
    Tui,

    /// Compute once and print tables and metrics.
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Ticker symbol; repeat once to compare two tickers
    #[arg(long = "ticker", default_value = DEFAULT_TICKER)]
    pub tickers: Vec<String>,

    /// First displayed year
    #[arg(long, default_value_t = DEFAULT_START_YEAR)]
    pub start: i32,

    /// Last displayed year
    #[arg(long, default_value_t = DEFAULT_END_YEAR)]
    pub end: i32,

    /// Number of years between compared prices (0-25)
    #[arg(long, default_value_t = DEFAULT_INTERVAL, allow_negative_numbers = true)]
    pub interval: i32,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    pub fn query(&self) -> Query {
        Query::new(self.tickers.clone(), self.start, self.end, self.interval)
    }
}

/// Réglages partagés par le TUI et le rapport
#[derive(Debug, Clone)]
pub struct Settings {
    pub concurrency: usize,
    pub cache_ttl: Duration,
    pub log_dir: PathBuf,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            concurrency: self.concurrency.max(1),
            cache_ttl: Duration::from_secs(self.cache_ttl),
            log_dir: self.log_dir.clone().unwrap_or_else(default_log_dir),
        }
    }
}

/// Répertoire des logs par défaut
///
/// - Linux/WSL : ~/.local/share/longview/logs
/// - macOS : ~/Library/Application Support/longview/logs
/// - Windows : C:\Users\<user>\AppData\Local\longview\logs
/// - Sinon : ./logs
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("longview").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

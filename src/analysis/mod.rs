// ============================================================================
// Module : analysis
// ============================================================================
// Le cœur du dashboard :
//   Year-Sampler -> Change-Series Builder -> Summary Reducer
// orchestré par Dashboard::handle()
// ============================================================================

pub mod change;    // Variations sur N années
pub mod dashboard; // Requête -> rapport
pub mod sampler;   // Prix de début d'année (fan-out borné)
pub mod summary;   // max / min / moyenne / écart-type

pub use change::build_change_series;
pub use dashboard::{Dashboard, DEFAULT_CONCURRENCY};
pub use sampler::sample_years;
pub use summary::summarize;

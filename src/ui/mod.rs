// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// et le rendu texte de la commande `report`
// ============================================================================

pub mod events;    // Gestion des événements clavier
pub mod dashboard; // Rendu de l'interface principale
pub mod chart;     // Graphiques barres / ligne
pub mod table;     // Métriques et table combinée
pub mod text;      // Rendu texte brut (sans terminal)

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use dashboard::render;
pub use text::render_text;

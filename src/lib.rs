// ============================================================================
// Longview - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod analysis; // Échantillonnage, variations, résumés
pub mod api;      // Sources de prix (Yahoo Finance, cache)
pub mod app;      // État de l'application
pub mod config;   // Ligne de commande
pub mod error;    // Erreurs du pipeline
pub mod models;   // Structures de données
pub mod ui;       // Interface utilisateur

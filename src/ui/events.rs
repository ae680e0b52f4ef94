// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Pattern matching : identifier la touche pressée
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

// ============================================================================
// Enum Event
// ============================================================================
// CONCEPT RUST : Enums avec données
// - Key(KeyEvent) : stocke l'événement clavier complet
// - Tick : variant sans données (unit variant)
// ============================================================================

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (rafraîchissement, indicateur de chargement)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Crée un gestionnaire avec un tick toutes les 250ms
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
        }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend au plus tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release
                // On ne garde que Press pour éviter les doublons
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),

                // Release, resize, souris, etc.
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : Convertir KeyEvent en action
// ============================================================================

/// Vérifie le KeyCode d'un événement clavier
fn key_matches(event: &Event, predicate: impl Fn(KeyCode) -> bool) -> bool {
    match event {
        Event::Key(key) => predicate(key.code),
        Event::Tick => false,
    }
}

/// 'q' : quitter (deux pressions)
pub fn is_quit_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('q') | KeyCode::Char('Q')))
}

/// Échap
pub fn is_escape_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Esc))
}

/// Entrée
pub fn is_enter_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Enter))
}

/// Flèche vers le haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    key_matches(event, |code| {
        matches!(code, KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K'))
    })
}

/// Flèche vers le bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    key_matches(event, |code| {
        matches!(code, KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J'))
    })
}

/// 'l', '+' ou flèche droite : intervalle + 1
pub fn is_next_interval_event(event: &Event) -> bool {
    key_matches(event, |code| {
        matches!(code, KeyCode::Char('l') | KeyCode::Char('+') | KeyCode::Right)
    })
}

/// 'h', '-' ou flèche gauche : intervalle - 1
pub fn is_previous_interval_event(event: &Event) -> bool {
    key_matches(event, |code| {
        matches!(code, KeyCode::Char('h') | KeyCode::Char('-') | KeyCode::Left)
    })
}

/// 'v' : bascule vue simple / comparaison
pub fn is_toggle_view_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('v') | KeyCode::Char('V')))
}

/// Tab : panneau suivant (variations, prix, table)
pub fn is_next_panel_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Tab))
}

/// 'r' : recalculer (avec le cache)
pub fn is_reload_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('r')))
}

/// 'R' : recalculer en vidant le cache
pub fn is_force_reload_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('R')))
}

/// Backspace
pub fn is_backspace_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Backspace))
}

/// Caractère accepté dans un champ (symboles comme "^GSPC", "BRK-B", "EURUSD=X")
pub fn is_input_char_event(event: &Event) -> bool {
    key_matches(event, |code| {
        matches!(code, KeyCode::Char(c) if c.is_alphanumeric() || matches!(c, '-' | '.' | '^' | '='))
    })
}

/// Extrait le caractère d'un événement clavier si c'est un caractère
pub fn get_char_from_event(event: &Event) -> Option<char> {
    match event {
        Event::Key(KeyEvent {
            code: KeyCode::Char(c),
            ..
        }) => Some(*c),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_interval_keys() {
        assert!(is_next_interval_event(&key(KeyCode::Char('l'))));
        assert!(is_next_interval_event(&key(KeyCode::Right)));
        assert!(is_previous_interval_event(&key(KeyCode::Char('-'))));
        assert!(!is_previous_interval_event(&key(KeyCode::Char('l'))));
    }

    #[test]
    fn test_reload_is_case_sensitive() {
        assert!(is_reload_event(&key(KeyCode::Char('r'))));
        assert!(!is_reload_event(&key(KeyCode::Char('R'))));
        assert!(is_force_reload_event(&key(KeyCode::Char('R'))));
    }

    #[test]
    fn test_input_chars() {
        assert!(is_input_char_event(&key(KeyCode::Char('^'))));
        assert!(is_input_char_event(&key(KeyCode::Char('7'))));
        assert!(is_input_char_event(&key(KeyCode::Char('='))));
        assert!(!is_input_char_event(&key(KeyCode::Char(' '))));
        assert_eq!(get_char_from_event(&key(KeyCode::Char('^'))), Some('^'));
        assert_eq!(get_char_from_event(&key(KeyCode::Enter)), None);
    }
}

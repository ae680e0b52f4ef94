// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Les calculs tournent dans le worker ; App ne fait que stocker la Query
//   courante et le dernier résultat
// ============================================================================

use crate::models::query::{
    normalize_ticker, DEFAULT_COMPARE_TICKER, DEFAULT_END_YEAR, DEFAULT_INTERVAL,
    DEFAULT_START_YEAR, DEFAULT_TICKER, MAX_INTERVAL, MIN_INTERVAL,
};
use crate::models::{DashboardReport, Query, View};

// ============================================================================
// Enums : Screen, Panel, Field
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : formulaire + résultats
    Dashboard,

    /// Mode saisie : édition du champ sélectionné
    /// - Enter valide, ESC annule
    InputMode,
}

/// Panneau de résultats affiché à droite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Barres des variations + métriques de variation
    Change,
    /// Ligne des prix + métriques de prix
    Price,
    /// Table combinée
    Table,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Change, Panel::Price, Panel::Table];

    pub fn label(&self) -> &'static str {
        match self {
            Panel::Change => "Change",
            Panel::Price => "Price",
            Panel::Table => "Table",
        }
    }

    /// Cycle Change -> Price -> Table -> Change
    pub fn next(&self) -> Self {
        match self {
            Panel::Change => Panel::Price,
            Panel::Price => Panel::Table,
            Panel::Table => Panel::Change,
        }
    }
}

/// Champs du formulaire d'entrées
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstTicker,
    SecondTicker,
    StartYear,
    EndYear,
    Interval,
}

/// Ligne du formulaire prête à afficher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLine {
    pub label: &'static str,
    pub value: String,
    pub selected: bool,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Vue courante (un ticker ou deux)
    pub view: View,

    /// Ticker de la vue simple
    pub single_ticker: String,

    /// Tickers de la vue comparaison
    pub compare_tickers: [String; 2],

    pub start_year: i32,
    pub end_year: i32,

    /// Intervalle d'années, toujours dans [0, 25]
    pub interval: i32,

    /// Index du champ sélectionné dans fields()
    pub selected_field: usize,

    pub current_screen: Screen,
    pub panel: Panel,

    /// Two-step quit pour éviter les sorties accidentelles
    pub confirm_quit: bool,

    /// Indique si un calcul est en cours dans le worker
    pub is_loading: bool,
    pub loading_message: Option<String>,

    /// Buffer et prompt du mode saisie
    pub input_buffer: String,
    pub input_prompt: String,

    /// Dernier rapport calculé
    pub report: Option<DashboardReport>,

    /// Dernière erreur ; remplace le rapport à l'affichage
    pub error: Option<String>,

    /// Identifiant de la dernière requête envoyée au worker
    /// Les résultats d'une requête plus ancienne sont ignorés
    pub request_id: u64,
}

impl App {
    /// Crée une App avec les entrées par défaut (^GSPC, 2000-2024, 7 ans)
    pub fn new() -> Self {
        Self {
            running: true,
            view: View::Single,
            single_ticker: DEFAULT_TICKER.to_string(),
            compare_tickers: [DEFAULT_TICKER.to_string(), DEFAULT_COMPARE_TICKER.to_string()],
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            interval: DEFAULT_INTERVAL,
            selected_field: 0,
            current_screen: Screen::Dashboard,
            panel: Panel::Change,
            confirm_quit: false,
            is_loading: false,
            loading_message: None,
            input_buffer: String::new(),
            input_prompt: String::new(),
            report: None,
            error: None,
            request_id: 0,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tick : appelé à chaque itération de la boucle
    ///
    /// Rien à mettre à jour pour l'instant : le worker pousse ses résultats.
    pub fn tick(&mut self) {}

    // ========================================================================
    // Query
    // ========================================================================

    /// La requête correspondant aux entrées actuelles
    pub fn query(&self) -> Query {
        let tickers = match self.view {
            View::Single => vec![self.single_ticker.clone()],
            View::Compare => self.compare_tickers.to_vec(),
        };
        Query::new(tickers, self.start_year, self.end_year, self.interval)
    }

    /// Démarre une nouvelle requête : retourne son identifiant et la Query
    pub fn begin_request(&mut self) -> (u64, Query) {
        self.request_id += 1;
        let query = self.query();
        self.start_loading(Some(format!(
            "Chargement de {} ({}-{})...",
            query.tickers.join(", "),
            query.first_sampled_year(),
            query.end_year
        )));
        (self.request_id, query)
    }

    /// Applique le résultat d'une requête
    ///
    /// Retourne false si le résultat est périmé (une requête plus récente
    /// a été envoyée entre-temps).
    pub fn accept_result(&mut self, id: u64, result: Result<DashboardReport, String>) -> bool {
        if id != self.request_id {
            return false;
        }

        self.stop_loading();
        match result {
            Ok(report) => {
                self.report = Some(report);
                self.error = None;
            }
            Err(message) => {
                // Aucun résultat partiel : l'erreur remplace le rapport
                self.report = None;
                self.error = Some(message);
            }
        }
        true
    }

    // ========================================================================
    // Formulaire
    // ========================================================================

    /// Champs affichés selon la vue
    pub fn fields(&self) -> Vec<Field> {
        match self.view {
            View::Single => vec![Field::FirstTicker, Field::StartYear, Field::EndYear, Field::Interval],
            View::Compare => vec![
                Field::FirstTicker,
                Field::SecondTicker,
                Field::StartYear,
                Field::EndYear,
                Field::Interval,
            ],
        }
    }

    pub fn selected(&self) -> Field {
        let fields = self.fields();
        fields
            .get(self.selected_field)
            .copied()
            .unwrap_or(Field::FirstTicker)
    }

    pub fn field_label(&self, field: Field) -> &'static str {
        match (field, self.view) {
            (Field::FirstTicker, View::Single) => "Ticker",
            (Field::FirstTicker, View::Compare) => "Ticker 1",
            (Field::SecondTicker, _) => "Ticker 2",
            (Field::StartYear, _) => "Start Year",
            (Field::EndYear, _) => "End Year",
            (Field::Interval, _) => "Interval of Years",
        }
    }

    pub fn field_value(&self, field: Field) -> String {
        match field {
            Field::FirstTicker => match self.view {
                View::Single => self.single_ticker.clone(),
                View::Compare => self.compare_tickers[0].clone(),
            },
            Field::SecondTicker => self.compare_tickers[1].clone(),
            Field::StartYear => self.start_year.to_string(),
            Field::EndYear => self.end_year.to_string(),
            Field::Interval => self.interval.to_string(),
        }
    }

    /// Lignes du formulaire pour le rendu
    pub fn field_lines(&self) -> Vec<FieldLine> {
        self.fields()
            .into_iter()
            .enumerate()
            .map(|(index, field)| FieldLine {
                label: self.field_label(field),
                value: self.field_value(field),
                selected: index == self.selected_field,
            })
            .collect()
    }

    /// Champ précédent (saturating : reste sur le premier)
    pub fn navigate_up(&mut self) {
        self.selected_field = self.selected_field.saturating_sub(1);
    }

    /// Champ suivant (reste sur le dernier)
    pub fn navigate_down(&mut self) {
        let max_index = self.fields().len().saturating_sub(1);
        self.selected_field = (self.selected_field + 1).min(max_index);
    }

    /// Bascule la vue ; la sélection est ramenée dans les bornes
    pub fn toggle_view(&mut self) {
        self.view = self.view.toggle();
        let max_index = self.fields().len().saturating_sub(1);
        self.selected_field = self.selected_field.min(max_index);
    }

    pub fn next_panel(&mut self) {
        self.panel = self.panel.next();
    }

    /// Intervalle + 1 ; retourne true s'il a changé
    pub fn increase_interval(&mut self) -> bool {
        self.set_interval(self.interval + 1)
    }

    /// Intervalle - 1 ; retourne true s'il a changé
    pub fn decrease_interval(&mut self) -> bool {
        self.set_interval(self.interval - 1)
    }

    /// Borne l'intervalle dans [0, 25]
    fn set_interval(&mut self, value: i32) -> bool {
        let clamped = value.clamp(MIN_INTERVAL, MAX_INTERVAL);
        let changed = clamped != self.interval;
        self.interval = clamped;
        changed
    }

    // ========================================================================
    // Input Mode Management
    // ========================================================================

    /// Entre en mode input sur le champ sélectionné (buffer prérempli)
    pub fn start_input(&mut self) {
        let field = self.selected();
        self.current_screen = Screen::InputMode;
        self.input_prompt = format!("{}: ", self.field_label(field));
        self.input_buffer = self.field_value(field);
    }

    /// Annule le mode input
    pub fn cancel_input(&mut self) {
        self.current_screen = Screen::Dashboard;
        self.input_buffer.clear();
        self.input_prompt.clear();
    }

    /// Valide la saisie et l'applique au champ sélectionné
    ///
    /// Retourne true si une entrée a changé (un recalcul est nécessaire).
    /// Une saisie non numérique pour une année est refusée avec un message.
    pub fn submit_input(&mut self) -> bool {
        let value = self.input_buffer.trim().to_string();
        let field = self.selected();
        self.cancel_input();

        match field {
            Field::FirstTicker | Field::SecondTicker => {
                let ticker = normalize_ticker(&value);
                if ticker.is_empty() {
                    return false;
                }
                let slot = match (field, self.view) {
                    (Field::FirstTicker, View::Single) => &mut self.single_ticker,
                    (Field::FirstTicker, View::Compare) => &mut self.compare_tickers[0],
                    _ => &mut self.compare_tickers[1],
                };
                let changed = *slot != ticker;
                *slot = ticker;
                changed
            }
            Field::StartYear | Field::EndYear | Field::Interval => {
                let Ok(number) = value.parse::<i32>() else {
                    self.error = Some(format!("'{}' is not a valid number", value));
                    self.report = None;
                    return false;
                };
                match field {
                    Field::StartYear => replace(&mut self.start_year, number),
                    Field::EndYear => replace(&mut self.end_year, number),
                    _ => self.set_interval(number),
                }
            }
        }
    }

    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.current_screen == Screen::InputMode
    }

    // ========================================================================
    // Quit / Loading
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    pub fn is_loading_data(&self) -> bool {
        self.is_loading
    }
}

/// Remplace la valeur ; retourne true si elle a changé
fn replace(slot: &mut i32, value: i32) -> bool {
    let changed = *slot != value;
    *slot = value;
    changed
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_report(query: Query) -> DashboardReport {
        DashboardReport {
            query,
            tickers: Vec::new(),
        }
    }

    fn type_text(app: &mut App, text: &str) {
        app.input_buffer.clear();
        for c in text.chars() {
            app.append_char(c);
        }
    }

    #[test]
    fn test_app_creation() {
        let app = App::new();
        assert!(app.is_running());
        assert_eq!(app.query(), Query::default());
        assert!(app.report.is_none());
        assert_eq!(app.panel, Panel::Change);
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::new();
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_compare_query() {
        let mut app = App::new();
        app.toggle_view();
        let query = app.query();
        assert_eq!(query.view(), View::Compare);
        assert_eq!(query.tickers, vec!["^GSPC".to_string(), "WMT".to_string()]);
    }

    #[test]
    fn test_navigation_bounds() {
        let mut app = App::new();
        app.navigate_up();
        assert_eq!(app.selected(), Field::FirstTicker);

        for _ in 0..10 {
            app.navigate_down();
        }
        assert_eq!(app.selected(), Field::Interval);

        // Vue comparaison : un champ de plus
        app.toggle_view();
        app.navigate_down();
        assert_eq!(app.selected_field, 4);
        assert_eq!(app.selected(), Field::Interval);

        // Retour en vue simple : la sélection est ramenée dans les bornes
        app.toggle_view();
        assert_eq!(app.selected_field, 3);
    }

    #[test]
    fn test_interval_is_clamped() {
        let mut app = App::new();
        app.interval = 25;
        assert!(!app.increase_interval());
        assert_eq!(app.interval, 25);

        app.interval = 0;
        assert!(!app.decrease_interval());
        assert_eq!(app.interval, 0);
        assert!(app.increase_interval());
        assert_eq!(app.interval, 1);
    }

    #[test]
    fn test_edit_ticker() {
        let mut app = App::new();
        app.start_input();
        assert!(app.is_in_input_mode());
        assert_eq!(app.input_prompt, "Ticker: ");
        assert_eq!(app.input_buffer, "^GSPC");

        type_text(&mut app, "aapl");
        assert!(app.submit_input());
        assert!(!app.is_in_input_mode());
        assert_eq!(app.single_ticker, "AAPL");
    }

    #[test]
    fn test_edit_second_ticker() {
        let mut app = App::new();
        app.toggle_view();
        app.navigate_down();
        app.start_input();
        type_text(&mut app, "tgt");
        assert!(app.submit_input());
        assert_eq!(app.compare_tickers[1], "TGT");
        assert_eq!(app.single_ticker, "^GSPC");
    }

    #[test]
    fn test_edit_year_and_interval() {
        let mut app = App::new();
        app.navigate_down();
        app.start_input();
        type_text(&mut app, "2010");
        assert!(app.submit_input());
        assert_eq!(app.start_year, 2010);

        // Même valeur : pas de recalcul
        app.start_input();
        assert!(!app.submit_input());

        app.navigate_down();
        app.navigate_down();
        app.start_input();
        type_text(&mut app, "40");
        assert!(app.submit_input());
        assert_eq!(app.interval, 25);
    }

    #[test]
    fn test_invalid_number_sets_error() {
        let mut app = App::new();
        app.navigate_down();
        app.start_input();
        type_text(&mut app, "20x0");
        assert!(!app.submit_input());
        assert_eq!(app.start_year, 2000);
        assert!(app.error.is_some());
    }

    #[test]
    fn test_stale_results_are_ignored() {
        let mut app = App::new();
        let (first, query) = app.begin_request();
        let (second, _) = app.begin_request();
        assert!(app.is_loading_data());

        assert!(!app.accept_result(first, Ok(empty_report(query.clone()))));
        assert!(app.is_loading_data());
        assert!(app.report.is_none());

        assert!(app.accept_result(second, Ok(empty_report(query))));
        assert!(!app.is_loading_data());
        assert!(app.report.is_some());
    }

    #[test]
    fn test_error_replaces_report() {
        let mut app = App::new();
        let (id, query) = app.begin_request();
        app.accept_result(id, Ok(empty_report(query)));

        let (id, _) = app.begin_request();
        app.accept_result(id, Err("No data for ABNB in the first days of 2013".to_string()));

        assert!(app.report.is_none());
        assert_eq!(
            app.error.as_deref(),
            Some("No data for ABNB in the first days of 2013")
        );
    }

    #[test]
    fn test_field_lines() {
        let app = App::new();
        let lines = app.field_lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].label, "Ticker");
        assert!(lines[0].selected);
        assert_eq!(lines[3].value, "7");
    }
}

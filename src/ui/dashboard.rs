// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI en utilisant les widgets de ratatui
//
//  ┌──────────────── header : titre + onglets de vue ────────────────┐
//  │ inputs (formulaire) │ panneau : Change | Price | Table          │
//  │ aide                │                                           │
//  └──────────────── footer : raccourcis / saisie ───────────────────┘
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : composants UI (Block, Paragraph, Tabs, etc.)
// 3. Layout : découpage de l'espace en zones
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Panel, Screen};
use crate::models::{DashboardReport, View};
use crate::ui::{chart, table};

const TITLE: &str = "Long Term Stock Investment Performance 📈";

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)])
        .split(chunks[1]);

    render_sidebar(frame, app, body[0]);
    render_main_content(frame, app, body[1]);

    match app.current_screen {
        Screen::InputMode => render_input_footer(frame, app, chunks[2]),
        Screen::Dashboard => render_footer(frame, app, chunks[2]),
    }
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(4), // Footer
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : titre, vue, panneau
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", TITLE))
        .title_alignment(Alignment::Center);

    let selected = match app.view {
        View::Single => 0,
        View::Compare => 1,
    };

    let mut titles: Vec<Line> = vec![
        Line::from(View::Single.label()),
        Line::from(View::Compare.label()),
    ];
    titles.extend(
        Panel::ALL
            .iter()
            .map(|panel| {
                let style = if *panel == app.panel {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Line::from(Span::styled(format!("· {}", panel.label()), style))
            }),
    );

    let tabs = Tabs::new(titles)
        .block(block)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

// ============================================================================
// Sidebar : formulaire d'entrées + aide
// ============================================================================

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Inputs ");

    let lines: Vec<Line> = app
        .field_lines()
        .into_iter()
        .map(|field| {
            let marker = if field.selected { "▶ " } else { "  " };
            let style = if field.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(marker, style),
                Span::styled(format!("{:<18}", field.label), style),
                Span::styled(field.value, Style::default().fg(Color::Green)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);
    render_help(frame, chunks[1]);
}

/// Usage prévu du dashboard (panneau "About")
pub const INTENDED_USE: [&str; 4] = [
    "• Checks stock performance over long periods of time & compare individual stocks with index.",
    "• The information empowers users to make decisions on long term investments.",
    "• Percent Change Graph: displays how much the stock price changed compared to [x] years ago (set by the user).",
    "For example, if Interval of Years = 7, the stock price in 2020 displayed on the chart will be compared to the stock price in 2013.",
];

/// Conseils affichés avec une erreur
pub const ERROR_HINTS: [&str; 2] = [
    "• Retype in the ticker/year to reload the data",
    "• Adjust \"Start Year\": it must be greater than the year the stock started + interval of years",
];

fn render_help(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Intended Use ");

    let mut text: Vec<Line> = Vec::new();
    for (index, line) in INTENDED_USE.iter().enumerate() {
        // L'exemple suit les puces, après une ligne vide
        if index == INTENDED_USE.len() - 1 {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(*line, Style::default().fg(Color::Gray))));
        } else {
            text.push(Line::from(*line));
        }
    }

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Main Content : panneau de résultats
// ============================================================================

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    if app.is_loading_data() {
        render_loading(frame, app, area);
        return;
    }

    if let Some(error) = &app.error {
        render_error(frame, error, area);
        return;
    }

    let Some(report) = &app.report else {
        render_loading(frame, app, area);
        return;
    };

    match app.panel {
        Panel::Change => render_change_panel(frame, report, area),
        Panel::Price => render_price_panel(frame, report, area),
        Panel::Table => table::render_table(frame, report, area),
    }
}

/// Hauteur du bloc de métriques (en-tête + valeurs + bordures)
const METRICS_HEIGHT: u16 = 4;

fn split_chart_and_metrics(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(METRICS_HEIGHT)])
        .split(area)
        .to_vec()
}

fn render_change_panel(frame: &mut Frame, report: &DashboardReport, area: Rect) {
    let chunks = split_chart_and_metrics(area);
    chart::render_chart(frame, &report.change_chart(), chunks[0]);
    render_metric_rows(frame, "Change", report.change_metrics(), report.tickers.len(), chunks[1]);
}

fn render_price_panel(frame: &mut Frame, report: &DashboardReport, area: Rect) {
    let chunks = split_chart_and_metrics(area);
    chart::render_chart(frame, &report.price_chart(), chunks[0]);
    render_metric_rows(frame, "Price", report.price_metrics(), report.tickers.len(), chunks[1]);
}

/// En vue comparaison, une rangée de métriques par ticker
fn render_metric_rows(
    frame: &mut Frame,
    title: &str,
    metrics: Vec<crate::models::Metric>,
    tickers: usize,
    area: Rect,
) {
    if tickers <= 1 {
        table::render_metrics(frame, title, &metrics, area);
        return;
    }

    let per_ticker = metrics.len() / tickers;
    let rows = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, tickers as u32); tickers])
        .split(area);

    for (row, chunk) in metrics.chunks(per_ticker.max(1)).zip(rows.iter()) {
        table::render_metrics(frame, title, row, *chunk);
    }
}

fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let message = app
        .loading_message
        .clone()
        .unwrap_or_else(|| "Chargement...".to_string());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("⏳ {}", message),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" ⚠ Erreur ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "If you encounter an error, you can:",
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(ERROR_HINTS[0], Style::default().fg(Color::Gray))),
        Line::from(Span::styled(ERROR_HINTS[1], Style::default().fg(Color::Gray))),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Footer : Instructions
// ============================================================================

fn key_style(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = if app.is_awaiting_quit_confirmation() {
        vec![Line::from(vec![
            Span::styled("⚠  Appuyez sur ", key_style(Color::Yellow)),
            Span::styled(
                "[q]",
                key_style(Color::Red).add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                key_style(Color::Yellow),
            ),
        ])]
    } else {
        vec![
            Line::from(vec![
                Span::styled("[q]", key_style(Color::Yellow)),
                Span::raw(" Quit  "),
                Span::styled("[↑↓ / j k]", key_style(Color::Yellow)),
                Span::raw(" Field  "),
                Span::styled("[Enter]", key_style(Color::Yellow)),
                Span::raw(" Edit  "),
                Span::styled("[h l]", key_style(Color::Yellow)),
                Span::raw(" Interval  "),
            ]),
            Line::from(vec![
                Span::styled("[v]", key_style(Color::Green)),
                Span::raw(" Single/Compare  "),
                Span::styled("[Tab]", key_style(Color::Green)),
                Span::raw(" Panel  "),
                Span::styled("[r]", key_style(Color::Green)),
                Span::raw(" Recompute  "),
                Span::styled("[R]", key_style(Color::Red)),
                Span::raw(" Refetch"),
            ]),
        ]
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine le footer en mode input avec la ligne de saisie
fn render_input_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let input_line = Line::from(vec![
        Span::styled(
            app.input_prompt.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.input_buffer.as_str(), Style::default().fg(Color::White)),
        Span::styled(
            "█",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);

    let help_line = Line::from(vec![
        Span::styled("[Enter]", key_style(Color::Green)),
        Span::raw(" Confirm  "),
        Span::styled("[ESC]", key_style(Color::Red)),
        Span::raw(" Cancel"),
    ]);

    let paragraph = Paragraph::new(vec![input_line, help_line])
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

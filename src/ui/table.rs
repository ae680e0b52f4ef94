// ============================================================================
// Tables : métriques et table combinée
// ============================================================================
// CONCEPTS RATATUI :
// 1. Table widget : Row, Cell, largeurs de colonnes
// 2. Style par cellule : rouge pour les valeurs négatives
// ============================================================================

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::models::{DashboardReport, Metric};

/// Style d'une valeur formatée : rouge si elle est négative
fn value_style(value: &str) -> Style {
    if value.starts_with('-') {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    }
}

fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Dessine une rangée de métriques (libellé au-dessus, valeur en dessous)
pub fn render_metrics(frame: &mut Frame, title: &str, metrics: &[Metric], area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", title));

    if metrics.is_empty() {
        frame.render_widget(block, area);
        return;
    }

    let header = Row::new(metrics.iter().map(|m| Cell::from(m.label.clone()))).style(header_style());
    let values = Row::new(
        metrics
            .iter()
            .map(|m| Cell::from(m.value.clone()).style(value_style(&m.value).add_modifier(Modifier::BOLD))),
    );

    let widths = vec![Constraint::Ratio(1, metrics.len() as u32); metrics.len()];
    let table = Table::new(vec![values], widths)
        .header(header)
        .block(block)
        .column_spacing(1);

    frame.render_widget(table, area);
}

/// Dessine la table combinée (une ligne par année affichée)
pub fn render_table(frame: &mut Frame, report: &DashboardReport, area: Rect) {
    let header_cells = report.table_header();
    let columns = header_cells.len();
    let header = Row::new(header_cells.into_iter().map(Cell::from))
        .style(header_style())
        .height(1);

    let rows: Vec<Row> = report
        .formatted_rows()
        .into_iter()
        .map(|cells| {
            Row::new(cells.into_iter().map(|cell| {
                let style = value_style(&cell);
                Cell::from(cell).style(style)
            }))
        })
        .collect();

    // Year étroite, le reste réparti
    let mut widths = vec![Constraint::Length(6)];
    widths.extend(
        std::iter::repeat(Constraint::Ratio(1, columns.saturating_sub(1).max(1) as u32))
            .take(columns.saturating_sub(1)),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" 📋 Table "),
        )
        .column_spacing(2);

    frame.render_widget(table, area);
}

// ============================================================================
// Chart - Rendu d'un ChartSpec
// ============================================================================
// Dessine les deux graphiques du dashboard :
// - Barres : variation sur N années, par année
// - Ligne : prix du premier jour de bourse, par année
//
// CONCEPTS RATATUI :
// 1. Chart widget : GraphType::Line uniquement
// 2. Dataset : une série par couleur, un segment vertical par barre
// 3. Axis : bornes et labels
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::models::{ChartKind, ChartSpec, SeriesColor, SeriesColoring, SeriesSpec};

/// Décalage horizontal des barres en vue comparaison (barres côte à côte)
const BAR_OFFSET: f64 = 0.15;

/// Couleur terminal d'une couleur de série
pub fn to_color(color: SeriesColor) -> Color {
    match color {
        SeriesColor::Green => Color::Green,
        SeriesColor::Red => Color::Red,
        SeriesColor::LightSkyBlue => Color::Rgb(135, 206, 250),
        SeriesColor::LightSalmon => Color::Rgb(255, 160, 122),
    }
}

/// Points prêts à dessiner, groupés par couleur
///
/// Chaque groupe devient un Dataset. Une série colorée par signe donne deux
/// groupes (positifs, négatifs) portant le même libellé.
#[derive(Debug, Clone, PartialEq)]
struct PlotGroup {
    label: String,
    color: SeriesColor,
    points: Vec<(f64, f64)>,
}

fn plot_groups(spec: &ChartSpec) -> Vec<PlotGroup> {
    let count = spec.series.len();
    spec.series
        .iter()
        .enumerate()
        .flat_map(|(index, series)| {
            let offset = match (spec.kind, count) {
                (ChartKind::Bar, 2) if index == 0 => -BAR_OFFSET,
                (ChartKind::Bar, 2) => BAR_OFFSET,
                _ => 0.0,
            };
            groups_for_series(series, offset)
        })
        .collect()
}

fn groups_for_series(series: &SeriesSpec, offset: f64) -> Vec<PlotGroup> {
    let to_point = |&(year, value): &(i32, f64)| (year as f64 + offset, value);

    match series.coloring {
        SeriesColoring::Fixed(color) => vec![PlotGroup {
            label: series.label.clone(),
            color,
            points: series.points.iter().map(to_point).collect(),
        }],
        SeriesColoring::BySign => [SeriesColor::Green, SeriesColor::Red]
            .into_iter()
            .map(|color| PlotGroup {
                label: series.label.clone(),
                color,
                points: series
                    .points
                    .iter()
                    .filter(|&&(_, value)| series.coloring.color_for(value) == color)
                    .map(to_point)
                    .collect(),
            })
            .filter(|group| !group.points.is_empty())
            .collect(),
    }
}

/// Un Dataset à dessiner
///
/// Seul le premier Dataset d'une série porte son libellé (une entrée de
/// légende par série).
#[derive(Debug, Clone, PartialEq)]
struct DrawnSeries {
    name: Option<String>,
    color: SeriesColor,
    points: Vec<(f64, f64)>,
}

/// Lignes : un Dataset par groupe. Barres : un segment (x, 0) -> (x, valeur)
/// par point, chaque segment étant dessiné comme une ligne.
fn drawn_series(groups: &[PlotGroup], kind: ChartKind) -> Vec<DrawnSeries> {
    let mut seen: Vec<&str> = Vec::new();
    let mut drawn = Vec::new();

    for group in groups {
        let segments: Vec<Vec<(f64, f64)>> = match kind {
            ChartKind::Line => vec![group.points.clone()],
            ChartKind::Bar => group
                .points
                .iter()
                .map(|&(x, value)| vec![(x, 0.0), (x, value)])
                .collect(),
        };

        for points in segments {
            let name = if seen.contains(&group.label.as_str()) {
                None
            } else {
                seen.push(group.label.as_str());
                Some(group.label.clone())
            };
            drawn.push(DrawnSeries {
                name,
                color: group.color,
                points,
            });
        }
    }

    drawn
}

/// Bornes de l'axe Y avec 5% de marge ; 0 est inclus pour les barres
fn y_bounds(spec: &ChartSpec) -> [f64; 2] {
    let (min, max) = spec.value_bounds().unwrap_or((0.0, 1.0));
    let (min, max) = match spec.kind {
        ChartKind::Bar => (min.min(0.0), max.max(0.0)),
        ChartKind::Line => (min, max),
    };
    let margin = ((max - min) * 0.05).max(1.0);
    let lower = match spec.kind {
        ChartKind::Line => (min - margin).max(0.0),
        ChartKind::Bar => min - margin,
    };
    [lower, max + margin]
}

fn y_label(spec: &ChartSpec, value: f64) -> String {
    match spec.kind {
        ChartKind::Bar => format!("{:.0}%", value),
        ChartKind::Line => format!("${:.0}", value),
    }
}

// ============================================================================
// Rendu
// ============================================================================

/// Dessine un graphique du dashboard
pub fn render_chart(frame: &mut Frame, spec: &ChartSpec, area: Rect) {
    let groups = plot_groups(spec);
    let Some((first_year, last_year)) = spec.year_bounds() else {
        render_no_data(frame, area, "Pas de données à afficher");
        return;
    };

    let marker = match spec.kind {
        ChartKind::Bar => symbols::Marker::HalfBlock,
        ChartKind::Line => symbols::Marker::Braille,
    };

    let drawn = drawn_series(&groups, spec.kind);
    let datasets: Vec<Dataset> = drawn
        .iter()
        .map(|series| {
            let dataset = Dataset::default()
                .marker(marker)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(to_color(series.color)))
                .data(&series.points);
            match &series.name {
                Some(name) => dataset.name(name.clone()),
                None => dataset,
            }
        })
        .collect();

    let x_bounds = [first_year as f64 - 0.5, last_year as f64 + 0.5];
    let x_axis = Axis::default()
        .title("Year")
        .style(Style::default().fg(Color::Gray))
        .bounds(x_bounds)
        .labels(vec![
            Span::raw(first_year.to_string()),
            Span::raw(((first_year + last_year) / 2).to_string()),
            Span::raw(last_year.to_string()),
        ]);

    let [y_min, y_max] = y_bounds(spec);
    let y_axis = Axis::default()
        .title(spec.y_label.clone())
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(y_label(spec, y_min)),
            Span::raw(y_label(spec, (y_min + y_max) / 2.0)),
            Span::raw(y_label(spec, y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(Span::styled(
                    format!(" {} ", spec.title),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Affiche un message quand il n'y a pas de données à afficher
fn render_no_data(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Rendu texte du rapport (commande `report`)
// ============================================================================
// Même contenu que le TUI, sans terminal : titre, métriques, table alignée.
// ============================================================================

use std::fmt::Write;

use crate::models::{DashboardReport, Metric};

/// Rend le rapport complet en texte brut
pub fn render_text(report: &DashboardReport) -> String {
    let mut out = String::new();

    let change_chart = report.change_chart();
    let _ = writeln!(out, "{}", change_chart.title);
    let _ = writeln!(out, "{}", "=".repeat(change_chart.title.chars().count()));
    let _ = writeln!(out);

    write_metrics(&mut out, "Change", &report.change_metrics());
    write_metrics(&mut out, "Price", &report.price_metrics());

    let header = report.table_header();
    let rows = report.formatted_rows();
    write_table(&mut out, &header, &rows);

    out
}

fn write_metrics(out: &mut String, title: &str, metrics: &[Metric]) {
    let _ = writeln!(out, "{}", title);
    let width = metrics
        .iter()
        .map(|m| m.label.chars().count())
        .max()
        .unwrap_or(0);
    for metric in metrics {
        let _ = writeln!(out, "  {:<width$}  {}", metric.label, metric.value, width = width);
    }
    let _ = writeln!(out);
}

/// Table alignée : Year à gauche, valeurs à droite
fn write_table(out: &mut String, header: &[String], rows: &[Vec<String>]) {
    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .chain(std::iter::once(&header[col]))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(col, (cell, &width))| {
                if col == 0 {
                    format!("{:<width$}", cell, width = width)
                } else {
                    format!("{:>width$}", cell, width = width)
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    let _ = writeln!(out, "{}", format_row(header));
    let _ = writeln!(out, "{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in rows {
        let _ = writeln!(out, "{}", format_row(row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Dashboard;
    use crate::api::testing::StaticSource;
    use crate::models::Query;

    #[tokio::test]
    async fn test_render_single_report() {
        let source = StaticSource::new().with_series("^GSPC", 2009, &[900.0, 1000.0, 1100.0, 1200.0]);
        let dashboard = Dashboard::new(source, 2);
        let query = Query::new(vec!["^GSPC".to_string()], 2010, 2012, 1);
        let report = dashboard.handle(&query).await.unwrap();

        let text = render_text(&report);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Percent Change of Last 1 Years"));
        assert!(text.contains("Highest Change"));
        assert!(text.contains("11.11%"));
        assert!(text.contains("Average Value"));
        assert!(text.contains("$1,100.00"));

        let header = lines
            .iter()
            .find(|line| line.starts_with("Year"))
            .unwrap();
        assert!(header.contains("Adj Close"));
        assert!(header.contains("Percent Change From 1 Years Ago"));

        let last = lines.last().unwrap();
        assert!(last.starts_with("2012"));
        assert!(last.ends_with("+9.09%"));
    }

    #[test]
    fn test_table_alignment() {
        let mut out = String::new();
        let header = vec!["Year".to_string(), "Value".to_string()];
        let rows = vec![vec!["2010".to_string(), "$1.00".to_string()]];
        write_table(&mut out, &header, &rows);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Year  Value");
        assert_eq!(lines[1], "-----------");
        assert_eq!(lines[2], "2010  $1.00");
    }
}

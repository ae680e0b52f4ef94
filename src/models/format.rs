// ============================================================================
// Formatage pour l'affichage
// ============================================================================
// - Prix : "$X,XXX.XX" (séparateur de milliers)
// - Métriques de variation : "X.XX%"
// - Table des variations : "±X.XX%"
// Les valeurs non finies (écart-type d'une seule valeur) s'affichent "N/A".
// ============================================================================

/// Formate un prix : 1234567.891 -> "$1,234,567.89"
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let formatted = format!("{:.2}", value.abs());
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    // Insère une virgule toutes les 3 positions en partant de la droite
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, dec_part)
}

/// Formate une métrique en pourcentage : 10.0673 -> "10.07%"
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    format!("{:.2}%", value)
}

/// Formate une variation avec son signe : 11.111 -> "+11.11%"
pub fn format_signed_percent(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    format!("{:+.2}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1200.0), "$1,200.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(45.5), "$45.50");
        assert_eq!(format_currency(-1500.25), "-$1,500.25");
        assert_eq!(format_currency(f64::NAN), "N/A");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(10.06734), "10.07%");
        assert_eq!(format_percent(-3.5), "-3.50%");
        assert_eq!(format_percent(f64::NAN), "N/A");
    }

    #[test]
    fn test_format_signed_percent() {
        assert_eq!(format_signed_percent(11.1111), "+11.11%");
        assert_eq!(format_signed_percent(-9.0909), "-9.09%");
        assert_eq!(format_signed_percent(0.0), "+0.00%");
    }
}

//! Meters and millimeters phrases ("seis metros setecientos cincuenta milímetros").

use crate::numbers::to_words_before_noun;

/// Render a length in meters as notarial words.
///
/// The length is rounded to whole millimeters first; sub-millimeter input is
/// lost. Non-finite input is treated as zero.
pub fn format_meters(length_meters: f64) -> String {
    let length = if length_meters.is_finite() {
        length_meters
    } else {
        0.0
    };
    let total_millimeters = (length * 1000.0).round() as i64;

    if total_millimeters < 0 {
        return format!("menos {}", format_millimeters(total_millimeters.saturating_neg()));
    }
    format_millimeters(total_millimeters)
}

/// Render a non-negative count of millimeters split into meters and millimeters.
pub fn format_millimeters(total_millimeters: i64) -> String {
    let meters = total_millimeters / 1000;
    let millimeters = total_millimeters % 1000;

    match (meters, millimeters) {
        (0, 0) => "cero milímetros".to_string(),
        (0, mm) => millimeters_phrase(mm),
        (m, 0) => meters_phrase(m),
        (m, mm) => format!("{} {}", meters_phrase(m), millimeters_phrase(mm)),
    }
}

fn meters_phrase(meters: i64) -> String {
    if meters == 1 {
        "un metro".to_string()
    } else {
        format!("{} metros", to_words_before_noun(meters))
    }
}

fn millimeters_phrase(millimeters: i64) -> String {
    if millimeters == 1 {
        "un milímetro".to_string()
    } else {
        format!("{} milímetros", to_words_before_noun(millimeters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_and_millimeters() {
        assert_eq!(
            format_meters(6.750),
            "seis metros setecientos cincuenta milímetros"
        );
        assert_eq!(format_meters(8.5), "ocho metros quinientos milímetros");
    }

    #[test]
    fn test_millimeters_only() {
        assert_eq!(format_meters(0.520), "quinientos veinte milímetros");
        assert_eq!(format_meters(0.001), "un milímetro");
    }

    #[test]
    fn test_whole_meters() {
        assert_eq!(format_meters(1.000), "un metro");
        assert_eq!(format_meters(12.0), "doce metros");
        assert_eq!(format_meters(21.0), "veintiún metros");
    }

    #[test]
    fn test_zero() {
        assert_eq!(format_meters(0.0), "cero milímetros");
        assert_eq!(format_meters(0.0004), "cero milímetros");
        assert_eq!(format_meters(f64::NAN), "cero milímetros");
    }

    #[test]
    fn test_rounds_to_millimeters() {
        assert_eq!(format_meters(2.9996), "tres metros");
        assert_eq!(format_meters(1.0024), "un metro dos milímetros");
    }

    #[test]
    fn test_singular_millimeter_with_meters() {
        assert_eq!(format_meters(3.001), "tres metros un milímetro");
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_meters(-1.5), "menos un metro quinientos milímetros");
    }
}

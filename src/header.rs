//! Unit header formatting ("unidad_b-4" -> "Unidad B guion cuatro:").

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::numbers::digits_to_words;

fn hyphen_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-(\d+)").expect("valid hyphen-number regex"))
}

fn dotted_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)").expect("valid dotted-number regex"))
}

fn trailing_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\s)(\d+)$").expect("valid trailing-number regex"))
}

/// Format a unit name into a speakable, sentence-cased header ending in `:`.
///
/// Each step works on the output of the previous one:
/// whitespace/underscores are collapsed, the name is sentence-cased,
/// `-<digits>` becomes `guion <words>`, `<d>.<d>` becomes `<words> punto <words>`,
/// a trailing standalone number gets its words in parentheses, and exactly one
/// colon closes the header.
pub fn format_unit_header(unit_name: &str) -> String {
    let collapsed = collapse_whitespace(&unit_name.replace('_', " "));
    let cased = sentence_case(&collapsed);

    let hyphenated = hyphen_number().replace_all(&cased, |caps: &Captures| {
        format!(" guion {}", digits_to_words(&caps[1]))
    });
    let dotted = dotted_number().replace_all(&hyphenated, |caps: &Captures| {
        format!(
            "{} punto {}",
            digits_to_words(&caps[1]),
            digits_to_words(&caps[2])
        )
    });

    let mut header = collapse_whitespace(&dotted)
        .trim_end_matches(|c: char| c == ':' || c.is_whitespace())
        .to_string();

    let trailing_words = trailing_number()
        .captures(&header)
        .map(|caps| digits_to_words(&caps[1]));
    if let Some(words) = trailing_words {
        header.push_str(&format!(" ({})", words));
    }

    header.push(':');
    header
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase everything, then uppercase the first character of the string and
/// every character right after `.`, `_`, `-` or whitespace.
fn sentence_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_boundary = true;

    for c in text.chars() {
        if at_boundary {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_boundary = c.is_whitespace() || matches!(c, '.' | '_' | '-');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore_and_hyphen() {
        assert_eq!(format_unit_header("unidad_b-4"), "Unidad B guion cuatro:");
    }

    #[test]
    fn test_uppercase_input() {
        assert_eq!(format_unit_header("UNIDAD B-2"), "Unidad B guion dos:");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            format_unit_header("  local   comercial\tpb-3 "),
            "Local Comercial Pb guion tres:"
        );
    }

    #[test]
    fn test_dotted_number() {
        assert_eq!(format_unit_header("lote 1.5"), "Lote uno punto cinco:");
    }

    #[test]
    fn test_trailing_standalone_number() {
        assert_eq!(
            format_unit_header("departamento 101"),
            "Departamento 101 (ciento uno):"
        );
    }

    #[test]
    fn test_attached_number_is_not_trailing() {
        assert_eq!(format_unit_header("casa a4"), "Casa A4:");
    }

    #[test]
    fn test_single_trailing_colon() {
        assert_eq!(format_unit_header("Unidad B-4::"), "Unidad B guion cuatro:");
        assert_eq!(format_unit_header("Unidad 7 :"), "Unidad 7 (siete):");
    }

    #[test]
    fn test_capitalizes_after_dot() {
        assert_eq!(format_unit_header("depto.norte"), "Depto.Norte:");
    }
}

//! Spanish number words for notarial prose.
//!
//! Cardinals cover 0..=999_999. Anything larger falls back to the digit
//! string; boundary measurements never get there.
//!
//! [`to_words`] ends in the full "uno" (`veintiuno`) but shortens it before
//! `mil` (`veintiún mil`). [`to_words_before_noun`] also shortens the final
//! "uno" (`veintiún`) and is what measurements use before `metros`.

/// First integer that is rendered as digits instead of words.
pub const WORDS_LIMIT: u64 = 1_000_000;

const UNITS: [&str; 20] = [
    "cero",
    "uno",
    "dos",
    "tres",
    "cuatro",
    "cinco",
    "seis",
    "siete",
    "ocho",
    "nueve",
    "diez",
    "once",
    "doce",
    "trece",
    "catorce",
    "quince",
    "dieciséis",
    "diecisiete",
    "dieciocho",
    "diecinueve",
];

const TWENTIES: [&str; 10] = [
    "veinte",
    "veintiuno",
    "veintidós",
    "veintitrés",
    "veinticuatro",
    "veinticinco",
    "veintiséis",
    "veintisiete",
    "veintiocho",
    "veintinueve",
];

const TENS: [&str; 10] = [
    "", "", "", "treinta", "cuarenta", "cincuenta", "sesenta", "setenta", "ochenta", "noventa",
];

const HUNDREDS: [&str; 10] = [
    "",
    "ciento",
    "doscientos",
    "trescientos",
    "cuatrocientos",
    "quinientos",
    "seiscientos",
    "setecientos",
    "ochocientos",
    "novecientos",
];

const ORDINALS: [&str; 10] = [
    "primero", "segundo", "tercero", "cuarto", "quinto", "sexto", "séptimo", "octavo", "noveno",
    "décimo",
];

//=============================================================================
// Cardinals
//=============================================================================

/// Convert an integer to Spanish cardinal words.
///
/// Negative numbers get a plain `menos` prefix.
pub fn to_words(n: i64) -> String {
    if n < 0 {
        return format!("menos {}", unsigned_to_words(n.unsigned_abs()));
    }
    unsigned_to_words(n as u64)
}

/// Cardinal words in the form used before a masculine noun
/// (`un metro`, `veintiún metros`, `treinta y un milímetros`).
pub fn to_words_before_noun(n: i64) -> String {
    apocopate(&to_words(n))
}

/// Convert a run of ASCII digits to words, keeping the digits when they do
/// not fit in an `i64`.
pub fn digits_to_words(digits: &str) -> String {
    match digits.parse::<i64>() {
        Ok(n) => to_words(n),
        Err(_) => digits.to_string(),
    }
}

fn unsigned_to_words(n: u64) -> String {
    if n >= WORDS_LIMIT {
        return n.to_string();
    }
    if n < 1000 {
        return below_thousand(n);
    }

    let thousands = n / 1000;
    let rest = n % 1000;
    let head = if thousands == 1 {
        "mil".to_string()
    } else {
        format!("{} mil", apocopate(&below_thousand(thousands)))
    };

    if rest == 0 {
        head
    } else {
        format!("{} {}", head, below_thousand(rest))
    }
}

fn below_thousand(n: u64) -> String {
    match n {
        0..=19 => UNITS[n as usize].to_string(),
        20..=29 => TWENTIES[(n - 20) as usize].to_string(),
        30..=99 => {
            let (tens, units) = ((n / 10) as usize, (n % 10) as usize);
            if units == 0 {
                TENS[tens].to_string()
            } else {
                format!("{} y {}", TENS[tens], UNITS[units])
            }
        }
        100 => "cien".to_string(),
        _ => {
            let (hundreds, rest) = ((n / 100) as usize, n % 100);
            if rest == 0 {
                HUNDREDS[hundreds].to_string()
            } else {
                format!("{} {}", HUNDREDS[hundreds], below_thousand(rest))
            }
        }
    }
}

/// Shorten a trailing "uno" the way Spanish does before a noun or `mil`.
fn apocopate(words: &str) -> String {
    if let Some(stem) = words.strip_suffix("veintiuno") {
        return format!("{}veintiún", stem);
    }
    if words == "uno" || words.ends_with(" uno") {
        if let Some(stem) = words.strip_suffix("uno") {
            return format!("{}un", stem);
        }
    }
    words.to_string()
}

//=============================================================================
// Ordinals and tramo counts
//=============================================================================

/// Ordinal word for a 1-indexed tramo position. Past ten, `11º` style.
pub fn ordinal(n: usize) -> String {
    match n {
        1..=10 => ORDINALS[n - 1].to_string(),
        _ => format!("{}º", n),
    }
}

/// Count word used in "en <count> tramos".
pub fn tramo_count(n: usize) -> String {
    match n {
        2 => "dos".to_string(),
        3 => "tres".to_string(),
        4 => "cuatro".to_string(),
        5 => "cinco".to_string(),
        _ => to_words(n as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_and_teens() {
        assert_eq!(to_words(0), "cero");
        assert_eq!(to_words(1), "uno");
        assert_eq!(to_words(15), "quince");
        assert_eq!(to_words(16), "dieciséis");
        assert_eq!(to_words(19), "diecinueve");
    }

    #[test]
    fn test_tens() {
        assert_eq!(to_words(20), "veinte");
        assert_eq!(to_words(21), "veintiuno");
        assert_eq!(to_words(22), "veintidós");
        assert_eq!(to_words(30), "treinta");
        assert_eq!(to_words(31), "treinta y uno");
        assert_eq!(to_words(99), "noventa y nueve");
    }

    #[test]
    fn test_hundreds() {
        assert_eq!(to_words(100), "cien");
        assert_eq!(to_words(101), "ciento uno");
        assert_eq!(to_words(500), "quinientos");
        assert_eq!(to_words(520), "quinientos veinte");
        assert_eq!(to_words(750), "setecientos cincuenta");
        assert_eq!(to_words(999), "novecientos noventa y nueve");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(to_words(1000), "mil");
        assert_eq!(to_words(1001), "mil uno");
        assert_eq!(to_words(2000), "dos mil");
        assert_eq!(to_words(21_000), "veintiún mil");
        assert_eq!(to_words(31_500), "treinta y un mil quinientos");
        assert_eq!(to_words(100_000), "cien mil");
        assert_eq!(to_words(101_000), "ciento un mil");
        assert_eq!(
            to_words(999_999),
            "novecientos noventa y nueve mil novecientos noventa y nueve"
        );
    }

    #[test]
    fn test_large_numbers_fall_back_to_digits() {
        assert_eq!(to_words(1_000_000), "1000000");
        assert_eq!(to_words(-1_000_000), "menos 1000000");
    }

    #[test]
    fn test_negative() {
        assert_eq!(to_words(-5), "menos cinco");
    }

    #[test]
    fn test_words_are_well_formed_across_range() {
        for n in 0..WORDS_LIMIT as i64 {
            let words = to_words(n);
            assert!(!words.is_empty(), "{} rendered empty", n);
            assert!(!words.contains("  "), "{} rendered '{}'", n, words);
            assert!(!words.chars().any(|c| c.is_ascii_digit()), "{} rendered '{}'", n, words);
            assert_eq!(words, words.trim());
        }
    }

    #[test]
    fn test_before_noun() {
        assert_eq!(to_words_before_noun(1), "un");
        assert_eq!(to_words_before_noun(21), "veintiún");
        assert_eq!(to_words_before_noun(41), "cuarenta y un");
        assert_eq!(to_words_before_noun(6), "seis");
        assert_eq!(to_words_before_noun(11), "once");
    }

    #[test]
    fn test_digits_to_words() {
        assert_eq!(digits_to_words("4"), "cuatro");
        assert_eq!(digits_to_words("007"), "siete");
        assert_eq!(digits_to_words("99999999999999999999"), "99999999999999999999");
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal(1), "primero");
        assert_eq!(ordinal(3), "tercero");
        assert_eq!(ordinal(7), "séptimo");
        assert_eq!(ordinal(10), "décimo");
        assert_eq!(ordinal(11), "11º");
    }

    #[test]
    fn test_tramo_count() {
        assert_eq!(tramo_count(2), "dos");
        assert_eq!(tramo_count(5), "cinco");
        assert_eq!(tramo_count(6), "seis");
        assert_eq!(tramo_count(21), "veintiuno");
    }
}

//! Abutter ("lindero") normalization.
//!
//! Rewrites the free text that follows `CON` in a boundary line into spoken
//! Spanish: unit codes are spelled out (`B-4` -> `B guion cuatro`), words are
//! lowercased except for a configurable acronym whitelist, and void spaces
//! (light wells, shafts) are rendered with the fixed `vacío de ...` idiom.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::numbers::digits_to_words;

/// Acronyms kept uppercase when no profile overrides them.
pub const DEFAULT_ACRONYMS: &[&str] = &["AC", "ACS", "EB", "PB", "E", "B"];

/// Alphabetic runs that stay uppercase in normalized abutter text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcronymSet {
    entries: BTreeSet<String>,
}

impl AcronymSet {
    pub fn new<I, S>(acronyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = acronyms
            .into_iter()
            .map(|a| a.as_ref().trim().to_uppercase())
            .filter(|a| !a.is_empty())
            .collect();
        Self { entries }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, run: &str) -> bool {
        self.entries.contains(&run.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AcronymSet {
    fn default() -> Self {
        Self::new(DEFAULT_ACRONYMS)
    }
}

fn leading_con() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:con(?:\s+|$))+").expect("valid leading-con regex"))
}

fn code_chunk() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid code-chunk regex"))
}

fn void_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)cubo\s+de\s+iluminaci[oó]n|cubo\s+de\s+luz|^cubo\s|vac[ií]o|shaft|hueco",
        )
        .expect("valid void-marker regex")
    })
}

/// Strip any number of leading `CON` tokens (case-insensitive).
pub fn strip_leading_con(text: &str) -> &str {
    let trimmed = text.trim();
    match leading_con().find(trimmed) {
        Some(m) => trimmed[m.end()..].trim_start(),
        None => trimmed,
    }
}

/// True when the abutter describes a void space rather than a neighbour.
pub fn is_void_space(raw: &str) -> bool {
    void_marker().is_match(strip_leading_con(raw))
}

/// Normalize raw abutter text for use after "con ".
pub fn transform_abutter(raw: &str, acronyms: &AcronymSet) -> String {
    let stripped = strip_leading_con(raw);
    let phrase = stripped
        .split_whitespace()
        .map(|chunk| transform_chunk(chunk, acronyms))
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if is_void_space(raw) {
        return void_phrase(&phrase);
    }
    phrase
}

/// Build `vacío de <phrase>` without doubling a leading `con` or `vacío`.
fn void_phrase(phrase: &str) -> String {
    let accented = phrase
        .split(' ')
        .map(restore_accent)
        .collect::<Vec<_>>()
        .join(" ");

    let mut rest = strip_leading_con(&accented);
    for prefix in ["vacío de ", "vacío"] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped.trim_start();
            break;
        }
    }

    if rest.is_empty() {
        "vacío".to_string()
    } else {
        format!("vacío de {}", rest)
    }
}

fn restore_accent(word: &str) -> &str {
    match word {
        "iluminacion" => "iluminación",
        "vacio" => "vacío",
        _ => word,
    }
}

/// Transform one whitespace-delimited chunk, keeping trailing punctuation.
fn transform_chunk(chunk: &str, acronyms: &AcronymSet) -> String {
    let body = chunk.trim_end_matches(|c: char| matches!(c, ',' | ';' | ':' | '.'));
    let punctuation = &chunk[body.len()..];
    if body.is_empty() {
        return String::new();
    }

    let upper = body.to_uppercase();
    let transformed = if upper.starts_with("EST_") || upper.starts_with("EST-") {
        let rest = match body.get(4..).unwrap_or("") {
            code if code_chunk().is_match(code) => transform_code(code, acronyms),
            other => other.to_lowercase(),
        };
        if rest.is_empty() {
            "estacionamiento".to_string()
        } else {
            format!("estacionamiento guion {}", rest)
        }
    } else if code_chunk().is_match(body) {
        transform_code(body, acronyms)
    } else {
        body.to_lowercase()
    };

    // Commas and semicolons separate phrases; a trailing dot is sentence noise.
    let kept = punctuation.trim_end_matches('.');
    format!("{}{}", transformed, kept)
}

/// Split a code-like sequence into alphabetic, numeric and punctuation runs.
///
/// `int.int` numbers read as `<int> punto <int>`, `-` reads `guion`, a bare
/// `.` reads `punto` and `_` is dropped.
fn transform_code(code: &str, acronyms: &AcronymSet) -> String {
    let chars: Vec<char> = code.chars().collect();
    let mut parts: Vec<String> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_alphabetic() {
                i += 1;
            }
            let run: String = chars[start..i].iter().collect();
            if acronyms.contains(&run) {
                parts.push(run.to_uppercase());
            } else {
                parts.push(run.to_lowercase());
            }
        } else if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let integer: String = chars[start..i].iter().collect();

            let has_fraction =
                i + 1 < chars.len() && chars[i] == '.' && chars[i + 1].is_ascii_digit();
            if has_fraction {
                let frac_start = i + 1;
                i = frac_start;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let fraction: String = chars[frac_start..i].iter().collect();
                parts.push(format!(
                    "{} punto {}",
                    digits_to_words(&integer),
                    digits_to_words(&fraction)
                ));
            } else {
                parts.push(digits_to_words(&integer));
            }
        } else {
            match c {
                '-' => parts.push("guion".to_string()),
                '.' => parts.push("punto".to_string()),
                _ => {}
            }
            i += 1;
        }
    }

    parts.join(" ")
}

//! Colindancias parsing.
//!
//! Turns OCR'd boundary text into [`DirectionGroup`]s. Lines are classified
//! first (surface annotation, direction header, body) and then fed through a
//! two-state accumulator: before the first header every line is dropped, after
//! it each recognised line appends a [`ParsedSegment`] to the group of the
//! current direction. Groups keep the order in which their direction first
//! appeared; nothing is ever re-sorted by compass convention.
//!
//! Parsing is permissive. Lines that cannot be understood are skipped, a
//! missing length is `None`, a missing `CON` yields an empty abutter.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::abutter::strip_leading_con;

/// Cardinal or vertical direction of a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Oeste,
    Norte,
    Este,
    Sur,
    Noroeste,
    Noreste,
    Sureste,
    Suroeste,
    Arriba,
    Abajo,
}

impl Direction {
    /// Map a header token to a direction. `SUPERIOR`/`INFERIOR` (optionally
    /// prefixed by `COLINDANCIA`) normalize to `Arriba`/`Abajo`.
    pub fn from_token(token: &str) -> Option<Self> {
        let normalized = token
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();

        match normalized.as_str() {
            "OESTE" => Some(Self::Oeste),
            "NORTE" => Some(Self::Norte),
            "ESTE" => Some(Self::Este),
            "SUR" => Some(Self::Sur),
            "NOROESTE" => Some(Self::Noroeste),
            "NORESTE" => Some(Self::Noreste),
            "SURESTE" => Some(Self::Sureste),
            "SUROESTE" => Some(Self::Suroeste),
            "ARRIBA" | "SUPERIOR" | "COLINDANCIA SUPERIOR" => Some(Self::Arriba),
            "ABAJO" | "INFERIOR" | "COLINDANCIA INFERIOR" => Some(Self::Abajo),
            _ => None,
        }
    }

    /// Label used at the start of a notarial clause.
    pub fn label(self) -> &'static str {
        match self {
            Self::Oeste => "al oeste",
            Self::Norte => "al norte",
            Self::Este => "al este",
            Self::Sur => "al sur",
            Self::Noroeste => "al noroeste",
            Self::Noreste => "al noreste",
            Self::Sureste => "al sureste",
            Self::Suroeste => "al suroeste",
            Self::Arriba => "en su colindancia superior",
            Self::Abajo => "en su colindancia inferior",
        }
    }

    /// Vertical boundaries may legitimately carry no measurement.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Arriba | Self::Abajo)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Oeste => "OESTE",
            Self::Norte => "NORTE",
            Self::Este => "ESTE",
            Self::Sur => "SUR",
            Self::Noroeste => "NOROESTE",
            Self::Noreste => "NORESTE",
            Self::Sureste => "SURESTE",
            Self::Suroeste => "SUROESTE",
            Self::Arriba => "ARRIBA",
            Self::Abajo => "ABAJO",
        };
        f.write_str(name)
    }
}

/// One boundary run within a direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSegment {
    /// Length in meters; `None` when the line carried no measurement.
    pub length_meters: Option<f64>,
    /// Text after the `CON` token, duplicated leading `CON`s removed.
    pub abutter_raw: String,
    /// Direction token exactly as it appeared in the header (`SUPERIOR`, `AL NORTE`, ...).
    pub original_direction: String,
    /// Position of this segment among all segments of the text.
    pub original_order: usize,
}

/// All segments sharing one direction, in appearance order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionGroup {
    pub direction: Direction,
    pub segments: Vec<ParsedSegment>,
    /// Index of the direction's first appearance among all groups.
    pub order: usize,
}

// ============================================================================
// Patterns
// ============================================================================

fn surface_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^superficie|\bm(?:\^?2|²)(?:\W|$)|\bmetros\s+cuadrados\b")
            .expect("valid surface regex")
    })
}

fn direction_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:al\s+|en\s+su\s+)?(colindancia\s+superior|colindancia\s+inferior|noroeste|noreste|sureste|suroeste|oeste|norte|este|sur|arriba|abajo|superior|inferior)\b\s*[:\-.,]?\s*",
        )
        .expect("valid direction header regex")
    })
}

fn length_after_en() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\ben\s+(\d+(?:[.,]\d+)?)\s*(?:m|mts?|ml|metros?)\b")
            .expect("valid EN-length regex")
    })
}

fn length_lc() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\blc\s*=\s*(\d+(?:[.,]\d+)?)").expect("valid Lc-length regex")
    })
}

fn length_bare() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:m|mts?|ml|metros?)\b")
            .expect("valid bare-length regex")
    })
}

fn con_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bcon\b").expect("valid CON regex"))
}

// ============================================================================
// Line classification
// ============================================================================

#[derive(Debug, PartialEq)]
enum Line<'a> {
    SurfaceAnnotation,
    Header {
        direction: Direction,
        token: &'a str,
        rest: &'a str,
    },
    Body(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if surface_line().is_match(line) {
        return Line::SurfaceAnnotation;
    }

    if let Some(caps) = direction_header().captures(line) {
        let (whole, token) = match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(token)) => (whole, token),
            _ => return Line::Body(line),
        };
        if let Some(direction) = Direction::from_token(token.as_str()) {
            return Line::Header {
                direction,
                token: line[..token.end()].trim(),
                rest: line[whole.end()..].trim(),
            };
        }
    }

    Line::Body(line)
}

// ============================================================================
// Segment extraction
// ============================================================================

/// Extract the boundary length from a line remainder. The first matching
/// form wins: `EN <num> m`, `Lc=<num>`, bare `<num> m`.
pub fn extract_length(text: &str) -> Option<f64> {
    [length_after_en(), length_lc(), length_bare()]
        .into_iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
}

/// Split a remainder into the text before `CON` and the abutter after it.
/// Returns `None` for the abutter when the line has no `CON` token.
fn split_abutter(text: &str) -> (&str, Option<String>) {
    match con_token().find(text) {
        Some(m) => {
            let abutter = strip_leading_con(&text[m.end()..])
                .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':') || c.is_whitespace())
                .to_string();
            (&text[..m.start()], Some(abutter))
        }
        None => (text, None),
    }
}

// ============================================================================
// Accumulator
// ============================================================================

enum State {
    AwaitingDirection,
    InDirection { direction: Direction, token: String },
}

#[derive(Default)]
struct Accumulator {
    groups: Vec<DirectionGroup>,
    segment_count: usize,
}

impl Accumulator {
    fn group_index(&mut self, direction: Direction) -> usize {
        if let Some(idx) = self.groups.iter().position(|g| g.direction == direction) {
            return idx;
        }
        let order = self.groups.len();
        self.groups.push(DirectionGroup {
            direction,
            segments: Vec::new(),
            order,
        });
        order
    }

    /// Append a segment parsed from `rest`. Returns false when the text
    /// carries neither a length nor a `CON` token.
    fn push_segment(&mut self, direction: Direction, token: &str, rest: &str) -> bool {
        let (before_con, abutter) = split_abutter(rest);
        let length_meters = extract_length(before_con).or_else(|| extract_length(rest));

        if length_meters.is_none() && abutter.is_none() {
            return false;
        }

        let idx = self.group_index(direction);
        self.groups[idx].segments.push(ParsedSegment {
            length_meters,
            abutter_raw: abutter.unwrap_or_default(),
            original_direction: token.to_string(),
            original_order: self.segment_count,
        });
        self.segment_count += 1;
        true
    }

    /// Close a direction whose lines produced no segment. The boundary still
    /// gets one segment with no length and an empty abutter, so it is never
    /// dropped from the paragraph.
    fn close_direction(&mut self, direction: Direction, token: &str) {
        let idx = self.group_index(direction);
        if !self.groups[idx].segments.is_empty() {
            return;
        }
        trace!("Direction {} has no readable boundary data", direction);
        self.groups[idx].segments.push(ParsedSegment {
            length_meters: None,
            abutter_raw: String::new(),
            original_direction: token.to_string(),
            original_order: self.segment_count,
        });
        self.segment_count += 1;
    }

    fn finish(mut self, state: State) -> Vec<DirectionGroup> {
        if let State::InDirection { direction, token } = state {
            self.close_direction(direction, &token);
        }
        self.groups.sort_by_key(|g| g.order);
        self.groups
    }
}

/// Parse a colindancias block into direction groups in first-appearance order.
pub fn parse_colindancias(text: &str) -> Vec<DirectionGroup> {
    let mut state = State::AwaitingDirection;
    let mut acc = Accumulator::default();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match classify(line) {
            Line::SurfaceAnnotation => {
                trace!("Skipping surface annotation: {}", line);
            }
            Line::Header {
                direction,
                token,
                rest,
            } => {
                if let State::InDirection {
                    direction: previous,
                    token: previous_token,
                } = &state
                {
                    if *previous != direction {
                        acc.close_direction(*previous, previous_token);
                    }
                }
                acc.group_index(direction);
                if !rest.is_empty() && !acc.push_segment(direction, token, rest) {
                    trace!("Header line without boundary data: {}", line);
                }
                state = State::InDirection {
                    direction,
                    token: token.to_string(),
                };
            }
            Line::Body(rest) => match &state {
                State::AwaitingDirection => {
                    trace!("Skipping line before any direction: {}", line);
                }
                State::InDirection { direction, token } => {
                    if !acc.push_segment(*direction, token, rest) {
                        trace!("Skipping unrecognized line: {}", line);
                    }
                }
            },
        }
    }

    acc.finish(state)
}

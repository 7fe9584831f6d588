//! Notarial paragraph assembly.
//!
//! Walks the parsed direction groups in first-appearance order and composes
//! one sentence: `"<header> <clause>; <clause>; y, <clause>."`.

use tracing::debug;

use crate::abutter::{transform_abutter, AcronymSet};
use crate::config::FormatterConfig;
use crate::error::FormatError;
use crate::header::format_unit_header;
use crate::measurements::format_meters;
use crate::numbers::{ordinal, tramo_count};
use crate::parser::{parse_colindancias, DirectionGroup, ParsedSegment};

/// Lengths below this are treated as "no measurement" on vertical boundaries.
const LENGTH_TOLERANCE: f64 = 0.001;

/// Formats colindancias text into notarial prose.
///
/// Holds no state between calls; a single instance can be shared across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    acronyms: AcronymSet,
    strict: bool,
}

impl Formatter {
    pub fn new(acronyms: AcronymSet) -> Self {
        Self {
            acronyms,
            strict: false,
        }
    }

    pub fn from_config(config: &FormatterConfig) -> Self {
        Self::new(config.acronym_set()).with_strict(config.strict)
    }

    /// Reject incomplete boundary data instead of rendering it.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Parse and render one unit. Only a strict formatter returns errors.
    pub fn notarialize(&self, colindancias: &str, unit_name: &str) -> Result<String, FormatError> {
        let groups = parse_colindancias(colindancias);
        self.render(&groups, unit_name)
    }

    /// Render already-parsed groups.
    pub fn render(&self, groups: &[DirectionGroup], unit_name: &str) -> Result<String, FormatError> {
        if self.strict {
            if let Some(issue) = self.validate(groups).into_iter().next() {
                return Err(issue);
            }
        }
        Ok(self.compose(groups, unit_name))
    }

    /// List every gap a strict formatter would reject, in sentence order.
    pub fn validate(&self, groups: &[DirectionGroup]) -> Vec<FormatError> {
        if groups.is_empty() {
            return vec![FormatError::NoBoundaries];
        }
        let mut ordered: Vec<&DirectionGroup> = groups.iter().collect();
        ordered.sort_by_key(|g| g.order);

        let mut issues = Vec::new();
        for group in ordered {
            if group.segments.is_empty() {
                issues.push(FormatError::EmptyDirection {
                    direction: group.direction,
                });
                continue;
            }
            for (idx, segment) in group.segments.iter().enumerate() {
                let tramo = idx + 1;
                if !group.direction.is_vertical() && segment.length_meters.is_none() {
                    issues.push(FormatError::MissingLength {
                        direction: group.direction,
                        tramo,
                    });
                }
                if transform_abutter(&segment.abutter_raw, &self.acronyms).is_empty() {
                    issues.push(FormatError::MissingAbutter {
                        direction: group.direction,
                        tramo,
                    });
                }
            }
        }
        issues
    }

    fn compose(&self, groups: &[DirectionGroup], unit_name: &str) -> String {
        let header = format_unit_header(unit_name);

        let mut ordered: Vec<&DirectionGroup> =
            groups.iter().filter(|g| !g.segments.is_empty()).collect();
        if ordered.is_empty() {
            debug!("No boundary groups for '{}'", unit_name);
            return format!("{} .", header);
        }
        ordered.sort_by_key(|g| g.order);

        let last = ordered.len() - 1;
        let clauses: Vec<String> = ordered
            .iter()
            .enumerate()
            .map(|(idx, group)| {
                let clause = self.clause(group);
                if idx == last {
                    format!("y, {}", clause)
                } else {
                    clause
                }
            })
            .collect();

        format!("{} {}.", header, clauses.join("; "))
    }

    fn clause(&self, group: &DirectionGroup) -> String {
        let label = group.direction.label();
        let vertical = group.direction.is_vertical();

        if let [segment] = group.segments.as_slice() {
            let abutter = self.abutter(segment);
            return match measured_length(segment, vertical) {
                Some(length) => format!("{}, en {}, con {}", label, format_meters(length), abutter),
                None => format!("{}, con {}", label, abutter),
            };
        }

        let tramos: Vec<String> = group
            .segments
            .iter()
            .enumerate()
            .map(|(idx, segment)| {
                let abutter = self.abutter(segment);
                let nth = ordinal(idx + 1);
                match measured_length(segment, vertical) {
                    Some(length) => format!("el {} de {}, con {}", nth, format_meters(length), abutter),
                    None => format!("el {}, con {}", nth, abutter),
                }
            })
            .collect();

        let body = match tramos.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{}, y {}", rest.join(", "), last),
            Some((last, _)) => last.clone(),
            None => String::new(),
        };

        format!("{}, en {} tramos, {}", label, tramo_count(tramos.len()), body)
    }

    fn abutter(&self, segment: &ParsedSegment) -> String {
        transform_abutter(&segment.abutter_raw, &self.acronyms)
    }
}

/// The length to print for a segment, or `None` when a vertical boundary has
/// no usable measurement. Horizontal boundaries without a length print zero.
fn measured_length(segment: &ParsedSegment, vertical: bool) -> Option<f64> {
    match segment.length_meters {
        Some(length) if !(vertical && length.abs() < LENGTH_TOLERANCE) => Some(length),
        Some(_) => None,
        None if vertical => None,
        None => Some(0.0),
    }
}

/// Format one unit with the default lenient formatter.
pub fn notarialize(colindancias: &str, unit_name: &str) -> String {
    Formatter::default().compose(&parse_colindancias(colindancias), unit_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_scenario() {
        let text = "OESTE EN 6.750 m CON UNIDAD B-4\nNORTE EN 8.500 m CON AREA COMUN AC-1";
        assert_eq!(
            notarialize(text, "UNIDAD B-2"),
            "Unidad B guion dos: al oeste, en seis metros setecientos cincuenta milímetros, \
             con unidad B guion cuatro; y, al norte, en ocho metros quinientos milímetros, \
             con area comun AC guion uno."
        );
    }

    #[test]
    fn test_empty_input_is_degenerate() {
        assert_eq!(notarialize("", "unidad_b-4"), "Unidad B guion cuatro: .");
        assert_eq!(
            notarialize("SIN DATOS\nSUPERFICIE 40 m2", "Local 3"),
            "Local 3 (tres): ."
        );
    }

    #[test]
    fn test_order_is_never_compass_canonical() {
        let text = "SUR EN 1.000 m CON CALLE\nNORTE EN 2.000 m CON UNIDAD 3\nOESTE EN 3.000 m CON UNIDAD 4";
        let out = notarialize(text, "Casa");
        let sur = out.find("al sur").unwrap();
        let norte = out.find("al norte").unwrap();
        let oeste = out.find("al oeste").unwrap();
        assert!(sur < norte && norte < oeste);
        assert!(out.contains("; y, al oeste"));
    }

    #[test]
    fn test_two_tramos() {
        let text = "NORTE EN 2.000 m CON PASILLO\nNORTE EN 1.500 m CON UNIDAD B-1";
        assert_eq!(
            notarialize(text, "Unidad B-2"),
            "Unidad B guion dos: y, al norte, en dos tramos, el primero de dos metros, \
             con pasillo, y el segundo de un metro quinientos milímetros, con unidad B guion uno."
        );
    }

    #[test]
    fn test_three_tramos() {
        let text = "ESTE:\nEN 1 m CON A1\nEN 2 m CON PATIO\nEN 3 m CON CALLE\nSUR EN 4 m CON LOTE 9";
        assert_eq!(
            notarialize(text, "Lote 8"),
            "Lote 8 (ocho): al este, en tres tramos, el primero de un metro, con a uno, \
             el segundo de dos metros, con patio, y el tercero de tres metros, con calle; \
             y, al sur, en cuatro metros, con lote nueve."
        );
    }

    #[test]
    fn test_vertical_without_measurement() {
        let text = "NORTE EN 5 m CON CALLE\nSUPERIOR CON LOSA DE AZOTEA\nINFERIOR CON UNIDAD A-2";
        assert_eq!(
            notarialize(text, "Unidad B-2"),
            "Unidad B guion dos: al norte, en cinco metros, con calle; \
             en su colindancia superior, con losa de azotea; \
             y, en su colindancia inferior, con unidad a guion dos."
        );
    }

    #[test]
    fn test_vertical_zero_length_omitted() {
        let text = "ARRIBA EN 0.000 m CON UNIDAD C-2\nARRIBA CON CUBO DE ILUMINACION";
        assert_eq!(
            notarialize(text, "Unidad B-2"),
            "Unidad B guion dos: y, en su colindancia superior, en dos tramos, \
             el primero, con unidad c guion dos, y el segundo, con vacío de cubo de iluminación."
        );
    }

    #[test]
    fn test_vertical_with_measurement_kept() {
        let text = "ABAJO EN 2.400 m CON ESTACIONAMIENTO";
        assert_eq!(
            notarialize(text, "Unidad 1"),
            "Unidad 1 (uno): y, en su colindancia inferior, en dos metros cuatrocientos \
             milímetros, con estacionamiento."
        );
    }

    #[test]
    fn test_missing_length_renders_zero() {
        let text = "ESTE CON JARDIN";
        assert_eq!(
            notarialize(text, "Casa"),
            "Casa: y, al este, en cero milímetros, con jardin."
        );
    }

    #[test]
    fn test_void_space_in_sentence() {
        let text = "NORTE EN 1.200 m CON CUBO DE ILUMINACION\nSUR EN 1.200 m CON EST_4";
        let out = notarialize(text, "Unidad");
        assert!(out.contains("con vacío de cubo de iluminación;"));
        assert!(out.ends_with("con estacionamiento guion cuatro."));
    }

    #[test]
    fn test_strict_rejects_missing_length() {
        let formatter = Formatter::default().with_strict(true);
        let err = formatter.notarialize("ESTE CON JARDIN", "Casa").unwrap_err();
        assert_eq!(
            err,
            FormatError::MissingLength {
                direction: crate::parser::Direction::Este,
                tramo: 1
            }
        );
    }

    #[test]
    fn test_strict_rejects_empty_input() {
        let formatter = Formatter::default().with_strict(true);
        assert_eq!(
            formatter.notarialize("", "Casa").unwrap_err(),
            FormatError::NoBoundaries
        );
    }

    #[test]
    fn test_strict_accepts_vertical_without_length() {
        let formatter = Formatter::default().with_strict(true);
        let out = formatter
            .notarialize("NORTE EN 5 m CON CALLE\nSUPERIOR CON AZOTEA", "Casa")
            .unwrap();
        assert!(out.ends_with("y, en su colindancia superior, con azotea."));
    }

    #[test]
    fn test_validate_lists_all_issues() {
        let formatter = Formatter::default();
        let groups = parse_colindancias("NORTE CON\nSUR EN 2 m\nESTE EN 1 m CON CALLE");
        let issues = formatter.validate(&groups);
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[2].to_string(), "SUR tramo 1: missing abutter");
    }

    #[test]
    fn test_direction_without_data_is_kept() {
        assert_eq!(
            notarialize("NORTE EN 5 m CON CALLE\nSUPERIOR: LOSA DE AZOTEA", "Casa"),
            "Casa: al norte, en cinco metros, con calle; y, en su colindancia superior, con ."
        );
        assert_eq!(
            notarialize("ESTE: JARDIN", "Casa"),
            "Casa: y, al este, en cero milímetros, con ."
        );
    }

    #[test]
    fn test_strict_rejects_direction_without_data() {
        let formatter = Formatter::default().with_strict(true);
        let err = formatter
            .notarialize("NORTE EN 5 m CON CALLE\nSUPERIOR: LOSA DE AZOTEA", "Casa")
            .unwrap_err();
        assert_eq!(
            err,
            FormatError::MissingAbutter {
                direction: crate::parser::Direction::Arriba,
                tramo: 1
            }
        );
        assert!(formatter.notarialize("ESTE: JARDIN", "Casa").is_err());
    }

    #[test]
    fn test_validate_reports_groups_without_segments() {
        let mut groups = parse_colindancias("NORTE EN 5 m CON CALLE\nSUR EN 1 m CON PATIO");
        groups[1].segments.clear();
        let issues = Formatter::default().validate(&groups);
        assert_eq!(
            issues,
            vec![FormatError::EmptyDirection {
                direction: crate::parser::Direction::Sur
            }]
        );
        assert_eq!(issues[0].to_string(), "SUR: no boundary data");
        assert!(Formatter::default()
            .with_strict(true)
            .render(&groups, "Casa")
            .is_err());
    }

    #[test]
    fn test_lenient_formatter_never_fails() {
        let formatter = Formatter::default();
        assert!(!formatter.is_strict());
        assert_eq!(formatter.notarialize("", "Casa").unwrap(), "Casa: .");
    }

    #[test]
    fn test_custom_acronyms() {
        let formatter = Formatter::new(AcronymSet::new(["LC"]));
        let out = formatter
            .notarialize("NORTE EN 1 m CON LOCAL LC-3", "Local")
            .unwrap();
        assert_eq!(out, "Local: y, al norte, en un metro, con local LC guion tres.");
    }

    #[test]
    fn test_render_sorts_by_order() {
        let mut groups = parse_colindancias("SUR EN 1 m CON A\nNORTE EN 1 m CON C");
        groups.reverse();
        let out = Formatter::default().render(&groups, "X").unwrap();
        assert!(out.find("al sur").unwrap() < out.find("al norte").unwrap());
    }
}

use thiserror::Error;

use crate::parser::Direction;

/// Incomplete boundary data reported by a strict [`Formatter`](crate::Formatter).
///
/// Lenient formatting never produces these; it renders the gaps instead
/// ("cero milímetros", an empty abutter, `<header> .`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("no boundary lines could be parsed")]
    NoBoundaries,

    #[error("{direction}: no boundary data")]
    EmptyDirection { direction: Direction },

    #[error("{direction} tramo {tramo}: missing length")]
    MissingLength { direction: Direction, tramo: usize },

    #[error("{direction} tramo {tramo}: missing abutter")]
    MissingAbutter { direction: Direction, tramo: usize },
}

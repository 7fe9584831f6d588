//! Notarial formatter - turns OCR'd colindancias into notarial Spanish prose.
//!
//! ```
//! let paragraph = notarial_formatter::notarialize(
//!     "OESTE EN 6.750 m CON UNIDAD B-4\nNORTE EN 8.500 m CON AREA COMUN AC-1",
//!     "UNIDAD B-2",
//! );
//! assert!(paragraph.starts_with("Unidad B guion dos: al oeste, en seis metros"));
//! ```

pub mod abutter;
pub mod assembler;
pub mod config;
pub mod error;
pub mod header;
pub mod measurements;
pub mod numbers;
pub mod parser;
pub mod schema;
pub mod store;
pub mod unit_table;

pub use abutter::{transform_abutter, AcronymSet};
pub use assembler::{notarialize, Formatter};
pub use config::{ConfigStore, FormatterConfig};
pub use error::FormatError;
pub use header::format_unit_header;
pub use measurements::format_meters;
pub use numbers::to_words;
pub use parser::{parse_colindancias, Direction, DirectionGroup, ParsedSegment};

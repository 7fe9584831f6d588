//! Request and record types exchanged with the calling layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;
use uuid::Uuid;

use crate::assembler::Formatter;
use crate::error::FormatError;
use crate::parser::{parse_colindancias, DirectionGroup};
use crate::store::NotarializationStore;

/// SHA-256 of the colindancias text, hex encoded.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// One unit to format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRequest {
    pub unit_name: String,
    pub colindancias: String,
}

/// Several units formatted with the same profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub units: Vec<UnitRequest>,
}

/// A produced notarial paragraph with its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Notarialization {
    pub id: String,
    pub unit_name: String,
    /// Profile used to format the unit.
    pub config: String,
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub paragraph: String,
    pub groups: Vec<DirectionGroup>,
}

impl Notarialization {
    /// Parse and format one unit. Fails only under a strict formatter.
    pub fn produce(
        formatter: &Formatter,
        config: &str,
        unit_name: &str,
        colindancias: &str,
    ) -> Result<Self, FormatError> {
        let groups = parse_colindancias(colindancias);
        let paragraph = formatter.render(&groups, unit_name)?;

        Ok(Self {
            id: format!("ntr_{}", Uuid::new_v4().simple()),
            unit_name: unit_name.to_string(),
            config: config.to_string(),
            content_hash: content_hash(colindancias),
            created_at: Utc::now(),
            paragraph,
            groups,
        })
    }
}

/// Outcome for one unit of a batch; exactly one of the two fields is set.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub index: usize,
    pub unit_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notarialization: Option<Notarialization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItem {
    pub fn from_result(
        index: usize,
        unit_name: &str,
        result: Result<Notarialization, FormatError>,
    ) -> Self {
        let (notarialization, error) = match result {
            Ok(n) => (Some(n), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            index,
            unit_name: unit_name.to_string(),
            notarialization,
            error,
        }
    }
}

/// Format `(index, unit_name, colindancias)` triples with one formatter.
///
/// Produced records are kept in `store`. A rejected unit is reported in its
/// own item and the remaining units are still formatted.
pub fn format_batch<'a>(
    formatter: &Formatter,
    config: &str,
    store: &NotarializationStore,
    units: impl IntoIterator<Item = (usize, &'a str, &'a str)>,
) -> Vec<BatchItem> {
    units
        .into_iter()
        .map(|(index, unit_name, colindancias)| {
            let result = Notarialization::produce(formatter, config, unit_name, colindancias);
            match &result {
                Ok(record) => {
                    store.insert(record.clone());
                }
                Err(e) => warn!("Unit '{}' rejected by '{}': {}", unit_name, config, e),
            }
            BatchItem::from_result(index, unit_name, result)
        })
        .collect()
}

//! Domain entities: core data structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::lineage::CopyKind;

/// Document as far as copy lineage is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyLineageRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Registry number of the underlying document, e.g. "12/QD-UBND"
    #[serde(default)]
    pub number: String,
    /// Fixed when the record is created
    #[serde(default)]
    pub copy_kind: CopyKind,
    /// For copies: id of the original at the root of the lineage
    #[serde(default)]
    pub original_id: Option<String>,
    /// Present on copies only
    #[serde(default)]
    pub copy: Option<CopyDetails>,
}

impl CopyLineageRecord {
    /// New original document.
    pub fn original(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            number: String::new(),
            copy_kind: CopyKind::Original,
            original_id: None,
            copy: None,
        }
    }
}

/// Registry details recorded when a copy is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyDetails {
    /// Yearly running number shared by all copy kinds
    pub copy_number: u32,
    /// e.g. "05/SY-UBND"
    pub symbol: String,
    pub copy_date: NaiveDate,
    pub copied_by: String,
    #[serde(default)]
    pub signing_title: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Only for extract copies
    #[serde(default)]
    pub extracted_content: Option<String>,
}

/// Record of a flat collection linked to its parent by id.
///
/// Album folders and category/sub-category templates both take this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchicalRecord {
    pub id: String,
    /// Absent or empty for top-level records
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub sort_key: i64,
    #[serde(default)]
    pub label: String,
}

impl HierarchicalRecord {
    pub fn new(
        id: impl Into<String>,
        parent_id: Option<&str>,
        sort_key: i64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(str::to_string),
            sort_key,
            label: label.into(),
        }
    }
}

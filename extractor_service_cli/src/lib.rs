pub mod batch;
pub mod chart;
pub mod extractor;
pub mod fetcher;
pub mod sheet;
pub mod utils;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a spreadsheet row. Numeric ids stay numbers on the wire.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RowId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Number(n) => write!(f, "{}", n),
            RowId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowId {
    fn from(n: i64) -> Self {
        RowId::Number(n)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        RowId::Text(s.to_string())
    }
}

/// One input row: an identifier and the URL to fetch.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SourceRow {
    pub id: RowId,
    pub url: String,
}

impl SourceRow {
    pub fn new(id: impl Into<RowId>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExtractedArticle {
    #[serde(rename = "url_id")]
    pub id: RowId,
    pub title: String,
    #[serde(rename = "text")]
    pub body: String,
}

/// Successful rows of one run, in input order.
pub type ExtractionBatch = Vec<ExtractedArticle>;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Which input collection a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// A single row from one source: field name → value.
///
/// Values other than the name are opaque to the engine and are carried
/// through to the output untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// One ordered input collection plus the field that holds each record's name.
#[derive(Debug, Clone)]
pub struct RecordSet {
    pub side: Side,
    pub name_field: String,
    /// Column order as read from the source; used by the sink for layout.
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl RecordSet {
    /// Build a set from in-memory records. Columns are the union of all
    /// record fields in sorted order.
    pub fn new(side: Side, name_field: impl Into<String>, records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = records
            .iter()
            .flat_map(|r| r.fields.keys().cloned())
            .collect();
        columns.sort();
        columns.dedup();
        Self {
            side,
            name_field: name_field.into(),
            columns,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Name of the record at `index`. A record without the name field, or
    /// whose name has no letter or digit (blank, whitespace, punctuation
    /// only), is malformed input.
    pub fn name_of(&self, index: usize) -> Result<&str, ReconError> {
        self.records
            .get(index)
            .and_then(|r| r.get(&self.name_field))
            .filter(|name| name.chars().any(char::is_alphanumeric))
            .ok_or_else(|| ReconError::MalformedRecord {
                side: self.side,
                index,
                field: self.name_field.clone(),
            })
    }

    /// Every record's name in input order. Fails on the first malformed record.
    pub fn names(&self) -> Result<Vec<&str>, ReconError> {
        (0..self.records.len()).map(|i| self.name_of(i)).collect()
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Selector output: winning pool index and its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub index: usize,
    pub score: u8,
}

/// A left record paired with the right record it best matched.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedPair {
    pub left_index: usize,
    pub right_index: usize,
    pub score: u8,
    pub left: Record,
    pub right: Record,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub left_total: usize,
    pub right_total: usize,
    pub matched: usize,
    pub unmatched_left: usize,
    /// Distinct right records that appear in at least one pair.
    pub right_claimed: usize,
    /// Right records paired with more than one left record.
    pub right_shared: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchMeta {
    pub config_name: String,
    pub cutoff: u8,
    pub metric: String,
    pub assignment: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchOutput {
    pub meta: MatchMeta,
    pub summary: MatchSummary,
    pub pairs: Vec<MatchedPair>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_of_reports_malformed_record() {
        let set = RecordSet::new(
            Side::Right,
            "company_name",
            vec![
                Record::from_iter([("company_name", "Acme")]),
                Record::from_iter([("industry", "Retail")]),
            ],
        );
        assert_eq!(set.name_of(0).unwrap(), "Acme");
        let err = set.names().unwrap_err();
        assert!(matches!(
            err,
            ReconError::MalformedRecord { side: Side::Right, index: 1, .. }
        ));
        assert_eq!(err.to_string(), "right record 1: name field 'company_name' is missing or blank");
    }

    #[test]
    fn blank_names_are_malformed() {
        let set = RecordSet::new(
            Side::Left,
            "name",
            vec![
                Record::from_iter([("name", "Acme")]),
                Record::from_iter([("name", "   ")]),
                Record::from_iter([("name", "-- & --")]),
                Record::from_iter([("name", "")]),
            ],
        );
        assert_eq!(set.name_of(0).unwrap(), "Acme");
        for index in 1..4 {
            assert!(matches!(
                set.name_of(index),
                Err(ReconError::MalformedRecord { side: Side::Left, index: i, .. }) if i == index
            ));
        }
    }

    #[test]
    fn columns_are_union_of_fields() {
        let set = RecordSet::new(
            Side::Left,
            "name",
            vec![
                Record::from_iter([("name", "a"), ("email", "x")]),
                Record::from_iter([("name", "b"), ("address", "y")]),
            ],
        );
        assert_eq!(set.columns, vec!["address", "email", "name"]);
    }

    #[test]
    fn pair_serializes_records_flat() {
        let pair = MatchedPair {
            left_index: 0,
            right_index: 2,
            score: 91,
            left: Record::from_iter([("company_name", "Globex, Inc."), ("email", "john@globex.example")]),
            right: Record::from_iter([("company_name", "Globex Incorporated")]),
        };
        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["score"], 91);
        assert_eq!(json["right_index"], 2);
        assert_eq!(json["left"]["email"], "john@globex.example");
        assert_eq!(json["right"]["company_name"], "Globex Incorporated");
        assert_eq!(serde_json::to_value(Side::Left).unwrap(), "left");
    }
}

use std::collections::HashSet;
use std::io::Write;

use crate::config::{OutputOrder, SourceConfig};
use crate::error::ReconError;
use crate::model::{MatchedPair, RecordSet};

pub const LEFT_NAME_HEADER: &str = "name_1";
pub const RIGHT_NAME_HEADER: &str = "name_2";
pub const SCORE_HEADER: &str = "similarity_score";

/// Column layout for flattened pair output.
///
/// Passthrough columns present on both sides get `_1` / `_2` suffixes.
#[derive(Debug, Clone)]
pub struct PairLayout {
    pub left_name: String,
    pub right_name: String,
    pub left_columns: Vec<String>,
    pub right_columns: Vec<String>,
}

impl PairLayout {
    /// Passthrough columns come from `source.passthrough`, or every non-name
    /// column of the record set in source order.
    ///
    /// Fails when two output columns would share a header, e.g. a passthrough
    /// column named `similarity_score`, or `address_1` next to a shared
    /// `address`.
    pub fn new(
        left: &RecordSet,
        left_source: &SourceConfig,
        right: &RecordSet,
        right_source: &SourceConfig,
    ) -> Result<Self, ReconError> {
        let layout = Self {
            left_name: left.name_field.clone(),
            right_name: right.name_field.clone(),
            left_columns: passthrough_columns(left, left_source),
            right_columns: passthrough_columns(right, right_source),
        };

        let mut seen = HashSet::new();
        for header in layout.headers() {
            if !seen.insert(header.clone()) {
                return Err(ReconError::ConfigValidation(format!(
                    "output column '{header}' would appear twice; rename or drop it from passthrough"
                )));
            }
        }
        Ok(layout)
    }

    pub fn headers(&self) -> Vec<String> {
        let left: HashSet<&str> = self.left_columns.iter().map(String::as_str).collect();
        let right: HashSet<&str> = self.right_columns.iter().map(String::as_str).collect();

        let mut headers = vec![
            LEFT_NAME_HEADER.to_string(),
            RIGHT_NAME_HEADER.to_string(),
            SCORE_HEADER.to_string(),
        ];
        headers.extend(self.left_columns.iter().map(|c| {
            if right.contains(c.as_str()) { format!("{c}_1") } else { c.clone() }
        }));
        headers.extend(self.right_columns.iter().map(|c| {
            if left.contains(c.as_str()) { format!("{c}_2") } else { c.clone() }
        }));
        headers
    }

    pub fn row(&self, pair: &MatchedPair) -> Vec<String> {
        let field = |record: &crate::model::Record, column: &str| {
            record.get(column).unwrap_or_default().to_string()
        };

        let mut row = vec![
            field(&pair.left, &self.left_name),
            field(&pair.right, &self.right_name),
            pair.score.to_string(),
        ];
        row.extend(self.left_columns.iter().map(|c| field(&pair.left, c)));
        row.extend(self.right_columns.iter().map(|c| field(&pair.right, c)));
        row
    }
}

fn passthrough_columns(set: &RecordSet, source: &SourceConfig) -> Vec<String> {
    match source.passthrough {
        Some(ref columns) => columns.clone(),
        None => set
            .columns
            .iter()
            .filter(|c| **c != set.name_field)
            .cloned()
            .collect(),
    }
}

/// Reorder pairs for output. Score order is a stable sort, so equal scores
/// stay in left input order.
pub fn order_pairs(pairs: &mut [MatchedPair], order: OutputOrder) {
    match order {
        OutputOrder::ScoreDesc => pairs.sort_by(|a, b| b.score.cmp(&a.score)),
        OutputOrder::Input => pairs.sort_by_key(|p| p.left_index),
    }
}

/// Write one CSV row per pair, header first.
pub fn write_pairs_csv<W: Write>(
    writer: W,
    pairs: &[MatchedPair],
    layout: &PairLayout,
) -> Result<(), ReconError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(layout.headers())?;
    for pair in pairs {
        writer.write_record(layout.row(pair))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Record, Side};

    fn sets() -> (RecordSet, RecordSet) {
        let left = RecordSet {
            side: Side::Left,
            name_field: "company_name".into(),
            columns: vec!["company_name".into(), "email".into(), "address".into()],
            records: vec![
                Record::from_iter([("company_name", "Acme Corp"), ("email", "a@x"), ("address", "1 Main")]),
                Record::from_iter([("company_name", "Globex"), ("email", "g@x"), ("address", "2 Side")]),
            ],
        };
        let right = RecordSet {
            side: Side::Right,
            name_field: "name".into(),
            columns: vec!["name".into(), "industry".into(), "address".into()],
            records: vec![Record::from_iter([
                ("name", "ACME Corporation"),
                ("industry", "Retail"),
                ("address", "1 Main Street"),
            ])],
        };
        (left, right)
    }

    fn pair(left: &RecordSet, right: &RecordSet, li: usize, ri: usize, score: u8) -> MatchedPair {
        MatchedPair {
            left_index: li,
            right_index: ri,
            score,
            left: left.records[li].clone(),
            right: right.records[ri].clone(),
        }
    }

    #[test]
    fn headers_suffix_shared_columns() {
        let (left, right) = sets();
        let layout = PairLayout::new(
            &left,
            &SourceConfig::new("l.csv", "company_name"),
            &right,
            &SourceConfig::new("r.csv", "name"),
        )
        .unwrap();
        assert_eq!(
            layout.headers(),
            vec![
                "name_1",
                "name_2",
                "similarity_score",
                "email",
                "address_1",
                "industry",
                "address_2"
            ]
        );
    }

    #[test]
    fn explicit_passthrough_limits_columns() {
        let (left, right) = sets();
        let mut right_source = SourceConfig::new("r.csv", "name");
        right_source.passthrough = Some(vec!["industry".into()]);
        let mut left_source = SourceConfig::new("l.csv", "company_name");
        left_source.passthrough = Some(vec!["address".into()]);
        let layout = PairLayout::new(&left, &left_source, &right, &right_source).unwrap();
        assert_eq!(
            layout.headers(),
            vec!["name_1", "name_2", "similarity_score", "address", "industry"]
        );
    }

    #[test]
    fn colliding_headers_are_rejected() {
        let (left, right) = sets();

        let mut left_source = SourceConfig::new("l.csv", "company_name");
        left_source.passthrough = Some(vec!["similarity_score".into()]);
        let err = PairLayout::new(&left, &left_source, &right, &SourceConfig::new("r.csv", "name"))
            .unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(ref m) if m.contains("'similarity_score'")));

        // left "address_1" next to "address" shared with the right side
        let mut left_source = SourceConfig::new("l.csv", "company_name");
        left_source.passthrough = Some(vec!["address".into(), "address_1".into()]);
        let err = PairLayout::new(&left, &left_source, &right, &SourceConfig::new("r.csv", "name"))
            .unwrap_err();
        assert!(err.to_string().contains("'address_1'"), "{err}");
    }

    #[test]
    fn write_csv_rows() {
        let (left, right) = sets();
        let layout = PairLayout::new(
            &left,
            &SourceConfig::new("l.csv", "company_name"),
            &right,
            &SourceConfig::new("r.csv", "name"),
        )
        .unwrap();
        let pairs = vec![pair(&left, &right, 0, 0, 100)];
        let mut buf = Vec::new();
        write_pairs_csv(&mut buf, &pairs, &layout).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "name_1,name_2,similarity_score,email,address_1,industry,address_2\n\
             Acme Corp,ACME Corporation,100,a@x,1 Main,Retail,1 Main Street\n"
        );
    }

    #[test]
    fn order_by_score_is_stable() {
        let (left, right) = sets();
        let mut pairs = vec![
            pair(&left, &right, 0, 0, 80),
            pair(&left, &right, 1, 0, 90),
            pair(&left, &right, 0, 0, 80),
        ];
        pairs[2].left_index = 2;
        order_pairs(&mut pairs, OutputOrder::ScoreDesc);
        let order: Vec<(usize, u8)> = pairs.iter().map(|p| (p.left_index, p.score)).collect();
        assert_eq!(order, vec![(1, 90), (0, 80), (2, 80)]);

        order_pairs(&mut pairs, OutputOrder::Input);
        let order: Vec<usize> = pairs.iter().map(|p| p.left_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }
}

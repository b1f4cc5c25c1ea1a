//! Console report for a finished match run.

use std::fmt::Write;

use fuzzyrecon_recon::model::{MatchOutput, MatchedPair, Record};
use fuzzyrecon_recon::sink::PairLayout;

use crate::util::{clip, label_width, pad_right};

const HEADER_RULE: usize = 120;
const PAIR_RULE: usize = 100;
const MAX_VALUE_WIDTH: usize = 96;

/// Render every pair as a block, then the summary statistics.
///
/// `left_label` / `right_label` name the two sources (usually file names).
/// Pairs are printed in the order given.
pub(crate) fn render_report(
    output: &MatchOutput,
    layout: &PairLayout,
    left_label: &str,
    right_label: &str,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Matching Results:");
    let _ = writeln!(out, "{}", "=".repeat(HEADER_RULE));

    for pair in &output.pairs {
        render_pair(&mut out, pair, layout, left_label, right_label);
    }
    if output.pairs.is_empty() {
        let _ = writeln!(out, "\nNo pairs reached cutoff {}.", output.meta.cutoff);
    }

    let s = &output.summary;
    let _ = writeln!(out, "\nSummary Statistics:");
    let _ = writeln!(out, "Total number of records in {left_label}: {}", s.left_total);
    let _ = writeln!(out, "Total number of records in {right_label}: {}", s.right_total);
    let _ = writeln!(out, "Number of matches found: {}", s.matched);
    let _ = writeln!(out, "Unmatched records in {left_label}: {}", s.unmatched_left);
    let _ = writeln!(out, "Records in {right_label} matched more than once: {}", s.right_shared);
    match (s.average_score, s.max_score, s.min_score) {
        (Some(avg), Some(max), Some(min)) => {
            let _ = writeln!(out, "Average similarity score: {avg:.2}%");
            let _ = writeln!(out, "Highest similarity score: {max}%");
            let _ = writeln!(out, "Lowest similarity score: {min}%");
        }
        _ => {
            let _ = writeln!(out, "Average similarity score: n/a");
        }
    }

    out
}

fn render_pair(
    out: &mut String,
    pair: &MatchedPair,
    layout: &PairLayout,
    left_label: &str,
    right_label: &str,
) {
    let name = |record: &Record, field: &str| record.get(field).unwrap_or_default().to_string();

    let _ = writeln!(out, "\nMatch Score: {}%", pair.score);
    let _ = writeln!(out, "{left_label}: {}", clip(&name(&pair.left, &layout.left_name), MAX_VALUE_WIDTH));
    render_fields(out, &pair.left, &layout.left_columns);
    let _ = writeln!(out, "{right_label}: {}", clip(&name(&pair.right, &layout.right_name), MAX_VALUE_WIDTH));
    render_fields(out, &pair.right, &layout.right_columns);
    let _ = writeln!(out, "{}", "-".repeat(PAIR_RULE));
}

fn render_fields(out: &mut String, record: &Record, columns: &[String]) {
    let width = label_width(columns.iter().map(String::as_str));
    for column in columns {
        let value = record.get(column).unwrap_or_default();
        let _ = writeln!(out, "  {}  {}", pad_right(column, width), clip(value, MAX_VALUE_WIDTH));
    }
}

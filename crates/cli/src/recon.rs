//! `fuzzyrecon` subcommands: config-driven and ad-hoc name matching.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};
use log::{debug, info};

use fuzzyrecon_recon::config::{Assignment, OutputOrder, ScorerConfig, SourceConfig};
use fuzzyrecon_recon::normalize::LegalSuffixes;
use fuzzyrecon_recon::pipeline::DEFAULT_CUTOFF;
use fuzzyrecon_recon::scorer::EditMetric;
use fuzzyrecon_recon::sink::{order_pairs, write_pairs_csv, PairLayout};
use fuzzyrecon_recon::source::load_csv_records;
use fuzzyrecon_recon::{MatchConfig, MatchedPair, RecordSet, Scorer, Side};

use crate::exit_codes::{EXIT_ERROR, EXIT_IO};
use crate::report::render_report;
use crate::CliError;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a match described by a TOML config file
    #[command(after_help = "\
Examples:
  fuzzyrecon run companies.match.toml
  fuzzyrecon run companies.match.toml --json
  fuzzyrecon run companies.match.toml --csv matched_results.csv -q")]
    Run {
        /// Path to the .match.toml config file
        config: PathBuf,

        /// Print the full result as JSON on stdout instead of the report
        #[arg(long)]
        json: bool,

        /// Write the JSON result to a file (overrides [output] json)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write matched pairs as CSV (overrides [output] csv)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Suppress the console report
        #[arg(long, short)]
        quiet: bool,
    },

    /// Match two CSV files directly, without a config file
    #[command(after_help = "\
Examples:
  fuzzyrecon match dataset1.csv dataset2.csv
  fuzzyrecon match dataset1.csv dataset2.csv --cutoff 80 --csv matched_results.csv
  fuzzyrecon match left.csv right.csv --left-name company --right-name name --exclusive")]
    Match {
        /// Left CSV file; every row looks for a partner on the right
        left: PathBuf,

        /// Right CSV file; the candidate pool
        right: PathBuf,

        /// Column holding the name on both sides
        #[arg(long, default_value = "company_name")]
        name_column: String,

        /// Name column of the left file (overrides --name-column)
        #[arg(long)]
        left_name: Option<String>,

        /// Name column of the right file (overrides --name-column)
        #[arg(long)]
        right_name: Option<String>,

        /// Minimum accepted score, 0 to 100 inclusive
        #[arg(long, default_value_t = DEFAULT_CUTOFF, allow_negative_numbers = true)]
        cutoff: i64,

        /// Edit distance behind the ratio
        #[arg(long, value_enum, default_value_t = MetricArg::Levenshtein)]
        metric: MetricArg,

        /// Treatment of legal suffixes such as Inc, Ltd, Corporation
        #[arg(long, value_enum, default_value_t = SuffixArg::Canonical)]
        legal_suffixes: SuffixArg,

        /// Keep punctuation when comparing names
        #[arg(long)]
        keep_punctuation: bool,

        /// Each right record may be claimed by at most one left record
        #[arg(long)]
        exclusive: bool,

        /// Score on a single thread
        #[arg(long)]
        sequential: bool,

        /// Write matched pairs as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the full result as JSON on stdout instead of the report
        #[arg(long)]
        json: bool,

        /// Pair order in the report and outputs
        #[arg(long, value_enum, default_value_t = OrderArg::ScoreDesc)]
        order: OrderArg,

        /// Suppress the console report
        #[arg(long, short)]
        quiet: bool,
    },

    /// Check a match config without running it
    #[command(after_help = "\
Examples:
  fuzzyrecon validate companies.match.toml")]
    Validate {
        /// Path to the .match.toml config file
        config: PathBuf,
    },

    /// Score two names and show their prepared forms
    #[command(after_help = "\
Examples:
  fuzzyrecon score \"Acme Corp\" \"ACME Corporation\"
  fuzzyrecon score \"Initech\" \"Initech LLC\" --legal-suffixes strip")]
    Score {
        a: String,
        b: String,

        #[arg(long, value_enum, default_value_t = MetricArg::Levenshtein)]
        metric: MetricArg,

        #[arg(long, value_enum, default_value_t = SuffixArg::Canonical)]
        legal_suffixes: SuffixArg,

        #[arg(long)]
        keep_punctuation: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MetricArg {
    Levenshtein,
    Indel,
}

impl From<MetricArg> for EditMetric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::Levenshtein => EditMetric::Levenshtein,
            MetricArg::Indel => EditMetric::Indel,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SuffixArg {
    Keep,
    Canonical,
    Strip,
}

impl From<SuffixArg> for LegalSuffixes {
    fn from(s: SuffixArg) -> Self {
        match s {
            SuffixArg::Keep => LegalSuffixes::Keep,
            SuffixArg::Canonical => LegalSuffixes::Canonical,
            SuffixArg::Strip => LegalSuffixes::Strip,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OrderArg {
    ScoreDesc,
    Input,
}

impl From<OrderArg> for OutputOrder {
    fn from(o: OrderArg) -> Self {
        match o {
            OrderArg::ScoreDesc => OutputOrder::ScoreDesc,
            OrderArg::Input => OutputOrder::Input,
        }
    }
}

pub fn cmd_recon(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Run { config, json, output, csv, quiet } => cmd_run(config, json, output, csv, quiet),
        Commands::Match {
            left,
            right,
            name_column,
            left_name,
            right_name,
            cutoff,
            metric,
            legal_suffixes,
            keep_punctuation,
            exclusive,
            sequential,
            csv,
            json,
            order,
            quiet,
        } => {
            let mut config = MatchConfig::new(
                SourceConfig::new(
                    left.to_string_lossy(),
                    left_name.unwrap_or_else(|| name_column.clone()),
                ),
                SourceConfig::new(right.to_string_lossy(), right_name.unwrap_or(name_column)),
            );
            config.name = "match".into();
            config.cutoff = cutoff;
            config.scorer.metric = metric.into();
            config.scorer.legal_suffixes = legal_suffixes.into();
            config.scorer.strip_punctuation = !keep_punctuation;
            config.matching.assignment = if exclusive { Assignment::Exclusive } else { Assignment::ManyToOne };
            config.matching.parallel = !sequential;
            config.output.order = order.into();
            config.validate()?;

            let outputs = Outputs { csv, json_file: None, json_stdout: json, quiet };
            execute(&config, Path::new("."), outputs)
        }
        Commands::Validate { config } => cmd_validate(config),
        Commands::Score { a, b, metric, legal_suffixes, keep_punctuation } => {
            cmd_score(&a, &b, metric, legal_suffixes, keep_punctuation)
        }
    }
}

/// Where results go. File paths here are taken as given (relative to the
/// working directory).
struct Outputs {
    csv: Option<PathBuf>,
    json_file: Option<PathBuf>,
    json_stdout: bool,
    quiet: bool,
}

fn read_config(path: &Path) -> Result<MatchConfig, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::new(EXIT_IO, format!("cannot read config {}: {e}", path.display())))?;
    Ok(MatchConfig::from_toml(&text)?)
}

fn config_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

fn cmd_run(
    config_path: PathBuf,
    json: bool,
    output: Option<PathBuf>,
    csv: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let base_dir = config_dir(&config_path);

    // Config paths are relative to the config file, flag paths to the cwd.
    let outputs = Outputs {
        csv: csv.or_else(|| config.output.csv.as_ref().map(|p| base_dir.join(p))),
        json_file: output.or_else(|| config.output.json.as_ref().map(|p| base_dir.join(p))),
        json_stdout: json,
        quiet,
    };

    execute(&config, base_dir, outputs)
}

fn load_source(side: Side, source: &SourceConfig, base_dir: &Path) -> Result<RecordSet, CliError> {
    let path = base_dir.join(&source.file);
    let data = std::fs::read_to_string(&path)
        .map_err(|e| CliError::new(EXIT_IO, format!("cannot read {}: {e}", path.display())))?;
    let set = load_csv_records(side, &data, source)?;
    debug!("loaded {} {side} records from {}", set.len(), path.display());
    Ok(set)
}

fn source_label(source: &SourceConfig) -> String {
    Path::new(&source.file)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.file.clone())
}

fn execute(config: &MatchConfig, base_dir: &Path, outputs: Outputs) -> Result<(), CliError> {
    let left = load_source(Side::Left, &config.left, base_dir)?;
    let right = load_source(Side::Right, &config.right, base_dir)?;

    let layout = PairLayout::new(&left, &config.left, &right, &config.right)?;
    let mut result = fuzzyrecon_recon::run(config, &left, &right)?;
    order_pairs(&mut result.pairs, config.output.order);

    if let Some(ref path) = outputs.csv {
        let file = File::create(path)
            .map_err(|e| CliError::new(EXIT_IO, format!("cannot write {}: {e}", path.display())))?;
        write_csv_output(BufWriter::new(file), path, &result.pairs, &layout)?;
        info!("wrote {} pairs to {}", result.pairs.len(), path.display());
        eprintln!("wrote {}", path.display());
    }

    let json = if outputs.json_file.is_some() || outputs.json_stdout {
        Some(
            serde_json::to_string_pretty(&result)
                .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?,
        )
    } else {
        None
    };

    if let (Some(path), Some(json)) = (&outputs.json_file, &json) {
        std::fs::write(path, json)
            .map_err(|e| CliError::new(EXIT_IO, format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {}", path.display());
    }

    match json {
        Some(json) if outputs.json_stdout => println!("{json}"),
        _ if !outputs.quiet => print!(
            "{}",
            render_report(&result, &layout, &source_label(&config.left), &source_label(&config.right))
        ),
        _ => {}
    }

    let s = &result.summary;
    eprintln!(
        "{}: {} of {} left records matched at cutoff {} ({} right records claimed)",
        result.meta.config_name, s.matched, s.left_total, result.meta.cutoff, s.right_claimed,
    );

    Ok(())
}

/// Write the pairs CSV. Any failure here is an output problem, not bad input.
fn write_csv_output<W: Write>(
    writer: W,
    path: &Path,
    pairs: &[MatchedPair],
    layout: &PairLayout,
) -> Result<(), CliError> {
    write_pairs_csv(writer, pairs, layout)
        .map_err(|e| CliError::new(EXIT_IO, format!("cannot write {}: {e}", path.display())))
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    println!(
        "ok: '{}' {} <-> {} (cutoff {}, {} metric, {} assignment)",
        config.name,
        config.left.file,
        config.right.file,
        config.cutoff,
        config.scorer.metric,
        config.matching.assignment,
    );
    Ok(())
}

fn cmd_score(
    a: &str,
    b: &str,
    metric: MetricArg,
    legal_suffixes: SuffixArg,
    keep_punctuation: bool,
) -> Result<(), CliError> {
    let mut scorer_config = ScorerConfig::default();
    scorer_config.metric = metric.into();
    scorer_config.legal_suffixes = legal_suffixes.into();
    scorer_config.strip_punctuation = !keep_punctuation;
    let scorer = scorer_config.build();

    let (pa, pb) = (scorer.prepare(a), scorer.prepare(b));
    println!("a:     {pa}");
    println!("b:     {pb}");
    println!("score: {}", scorer.compare(&pa, &pb));
    Ok(())
}

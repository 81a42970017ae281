use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reviewlens_analytics::{
    approval_map, channel_distribution, extract_rows, normalize, resolve_status, sort_reviews,
    timeseries_average, DashboardMetrics, IssueAnalyzer, KeywordMatch, LexiconScorer, RawRecord,
    SourceAdapter, SummaryPayload,
};
use reviewlens_common::{
    ApprovalMap, ApprovalRecord, Filters, FiltersPatch, ModerationStatus, Review, SortDirection,
    SortKey,
};

#[derive(Parser)]
#[command(name = "reviewlens", about = "Normalize and analyze guest review dumps")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print canonical reviews for a raw dump.
    Normalize {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Source::Hostaway)]
        source: Source,
        /// Google place id (google source only)
        #[arg(long, default_value = "unknown-place")]
        place_id: String,
        /// Listing name given to Google reviews
        #[arg(long, default_value = "Google Place")]
        place_name: String,
    },
    /// Print the recurring-issues report.
    Issues {
        file: PathBuf,
        #[arg(long, default_value_t = 3)]
        max_examples: usize,
        /// Match keywords on word boundaries instead of substrings
        #[arg(long)]
        word_boundary: bool,
    },
    /// Print the filtered, sorted dashboard with metrics.
    Dashboard {
        file: PathBuf,
        /// JSON file with approval rows, as an array or under `approvals`
        #[arg(long)]
        approvals: Option<PathBuf>,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = "date")]
        sort: String,
        #[arg(long, default_value = "desc")]
        dir: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Hostaway,
    Google,
}

#[derive(Args, Default)]
struct FilterArgs {
    #[arg(long)]
    property: Option<String>,
    #[arg(long)]
    channel: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    date_from: Option<String>,
    #[arg(long)]
    date_to: Option<String>,
    #[arg(long)]
    min_rating: Option<f64>,
}

impl FilterArgs {
    fn to_filters(&self) -> Result<Filters> {
        let patch = FiltersPatch {
            property: self.property.clone(),
            channel: self.channel.clone(),
            category: self.category.clone(),
            status: self.status.clone(),
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            min_rating: self.min_rating,
        };
        Ok(Filters::default().apply(&patch)?)
    }
}

#[derive(Serialize)]
struct DashboardRow {
    #[serde(flatten)]
    review: Review,
    moderation: ModerationStatus,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("reviewlens=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = run(cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run(command: Command) -> Result<Value> {
    match command {
        Command::Normalize {
            file,
            source,
            place_id,
            place_name,
        } => {
            let rows = read_rows(&file)?;
            let adapter = match source {
                Source::Hostaway => SourceAdapter::Hostaway,
                Source::Google => SourceAdapter::google(place_id, place_name),
            };
            Ok(serde_json::to_value(normalize_rows(rows, &adapter))?)
        }
        Command::Issues {
            file,
            max_examples,
            word_boundary,
        } => {
            let reviews = normalize_rows(read_rows(&file)?, &SourceAdapter::Hostaway);
            issues(&reviews, max_examples, word_boundary)
        }
        Command::Dashboard {
            file,
            approvals,
            filters,
            sort,
            dir,
        } => {
            let reviews = normalize_rows(read_rows(&file)?, &SourceAdapter::Hostaway);
            let approvals = match approvals {
                Some(path) => read_approvals(&path)?,
                None => ApprovalMap::new(),
            };
            let key: SortKey = sort.parse().map_err(|e: String| anyhow!(e))?;
            let direction: SortDirection = dir.parse().map_err(|e: String| anyhow!(e))?;
            dashboard(&reviews, &approvals, &filters.to_filters()?, key, direction)
        }
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn read_rows(path: &Path) -> Result<Vec<Value>> {
    let rows = extract_rows(&read_json(path)?);
    info!(file = %path.display(), rows = rows.len(), "Read raw rows");
    Ok(rows)
}

fn read_approvals(path: &Path) -> Result<ApprovalMap> {
    parse_approvals(read_json(path)?)
}

fn parse_approvals(dump: Value) -> Result<ApprovalMap> {
    let rows = match dump {
        Value::Object(mut map) => map.remove("approvals").unwrap_or(Value::Array(Vec::new())),
        other => other,
    };
    let records: Vec<ApprovalRecord> =
        serde_json::from_value(rows).context("Approvals must be a list of approval rows")?;
    Ok(approval_map(&records))
}

fn normalize_rows(rows: Vec<Value>, adapter: &SourceAdapter) -> Vec<Review> {
    let records: Vec<RawRecord> = rows
        .into_iter()
        .map(|row| RawRecord::new(adapter.clone(), row))
        .collect();
    normalize(&records)
}

fn issues(reviews: &[Review], max_examples: usize, word_boundary: bool) -> Result<Value> {
    let scorer = LexiconScorer::new();
    let keyword_match = if word_boundary {
        KeywordMatch::WordBoundary
    } else {
        KeywordMatch::Substring
    };
    let report = IssueAnalyzer::new(&scorer)
        .max_examples(max_examples)
        .keyword_match(keyword_match)
        .analyze(reviews);
    let payload = SummaryPayload::from_report(&report);

    Ok(serde_json::json!({
        "report": report,
        "summaryPayload": payload,
    }))
}

fn dashboard(
    reviews: &[Review],
    approvals: &ApprovalMap,
    filters: &Filters,
    key: SortKey,
    direction: SortDirection,
) -> Result<Value> {
    let filtered = reviewlens_analytics::filter_reviews(reviews, filters, approvals);
    let rows: Vec<DashboardRow> = sort_reviews(&filtered, key, direction, approvals)
        .into_iter()
        .map(|review| DashboardRow {
            moderation: resolve_status(&review.id, approvals),
            review,
        })
        .collect();

    Ok(serde_json::json!({
        "reviews": rows,
        "metrics": DashboardMetrics::compute(&filtered, approvals),
        "timeseries": timeseries_average(&filtered),
        "channels": channel_distribution(&filtered),
    }))
}

//! docscope command line
//!
//! Runs the analytics against a JSON snapshot of a document store and prints
//! the result as JSON or as a console report.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

use docscope::config::AnalysisConfig;
use docscope::core::StoreAnalytics;
use docscope::formatters::{
    format_compact_number, format_number_fr, format_percentage, FormatterConfig, HumanFormatter,
    JsonFormatter, ReportFormatter,
};
use docscope::logging::setup::{init_logging, LoggingConfig};
use docscope::logging::LogConfig;
use docscope::store::InMemoryStore;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON snapshot of the store
    #[arg(long, short)]
    snapshot: PathBuf,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Field holding document creation times
    #[arg(long, default_value = "createdAt")]
    timestamp_field: String,

    /// Log every store read and field result
    #[arg(long, short)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Human,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Root collections with their sizes
    Collections,
    /// Database totals, or size and growth of one collection
    Stats { collection: Option<String> },
    /// Daily document counts
    Trend { collection: Option<String> },
    /// Newest documents of a collection
    Recent {
        collection: String,
        #[arg(long)]
        limit: Option<usize>,
        /// Id of the last document of the previous page
        #[arg(long)]
        after: Option<String>,
    },
    /// Field statistics
    Fields {
        collection: String,
        field: Option<String>,
        #[arg(long)]
        sample: Option<usize>,
    },
    /// Semantic field patterns
    Patterns {
        collection: String,
        #[arg(long)]
        sample: Option<usize>,
    },
    /// Cross-collection relationships
    Relationships {
        collection: Option<String>,
        #[arg(long)]
        sample: Option<usize>,
        /// Print the relationship graph instead of the list
        #[arg(long)]
        graph: bool,
    },
    /// Nested collections
    Hierarchy {
        /// Print as a tree
        #[arg(long)]
        tree: bool,
    },
    /// Field statistics and patterns in one report
    Analyze {
        collection: String,
        #[arg(long)]
        sample: Option<usize>,
        /// Fields shown in the console report
        #[arg(long)]
        max_fields: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let logging = if args.verbose {
        LoggingConfig::development()
    } else {
        LoggingConfig::default().with_docscope_level(Level::WARN)
    };
    init_logging(logging.with_json_format(args.json_logs))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let store = InMemoryStore::from_path(&args.snapshot)
        .with_context(|| format!("failed to load snapshot {}", args.snapshot.display()))?;
    let config = AnalysisConfig::builder()
        .timestamp_field(args.timestamp_field.as_str())
        .log(if args.verbose {
            LogConfig::verbose()
        } else {
            LogConfig::default()
        })
        .build()?;
    let analytics = StoreAnalytics::new(store).with_config(config)?;
    let json = JsonFormatter::new();
    let human = args.format == OutputFormat::Human;

    let output = match args.command {
        Command::Collections => {
            let infos = analytics.collections_info().await?;
            if human {
                infos
                    .iter()
                    .map(|info| {
                        format!(
                            "{:<32} {:>12}",
                            info.name,
                            format_number_fr(info.document_count as f64)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            } else {
                json.format_value(&infos)?
            }
        }
        Command::Stats { collection: None } => {
            let stats = analytics.global_stats().await?;
            if human {
                format!(
                    "{} collections, {} documents",
                    stats.total_collections,
                    format_compact_number(stats.total_documents as f64)
                )
            } else {
                json.format_value(&stats)?
            }
        }
        Command::Stats {
            collection: Some(name),
        } => {
            let stats = analytics.collection_stats(&name).await?;
            if human {
                format!(
                    "{}: {} documents\n  today: {}\n  week: {}\n  month: {}\n  growth: {}",
                    stats.name,
                    format_number_fr(stats.document_count as f64),
                    format_number_fr(stats.today_count as f64),
                    format_number_fr(stats.week_count as f64),
                    format_number_fr(stats.month_count as f64),
                    format_percentage(stats.growth_percent as f64, true)
                )
            } else {
                json.format_value(&stats)?
            }
        }
        Command::Trend { collection: None } => json.format_value(&analytics.all_trends().await?)?,
        Command::Trend {
            collection: Some(name),
        } => json.format_value(&analytics.collection_trends(&name).await?)?,
        Command::Recent {
            collection,
            limit,
            after,
        } => {
            let documents = analytics
                .recent_documents(&collection, limit, after.as_deref())
                .await?;
            json.format_value(&documents)?
        }
        Command::Fields {
            collection,
            field: Some(field),
            sample,
        } => json.format_value(
            &analytics
                .field_statistics(&collection, &field, sample)
                .await?,
        )?,
        Command::Fields {
            collection,
            field: None,
            sample,
        } => json.format_value(&analytics.all_field_statistics(&collection, sample).await?)?,
        Command::Patterns { collection, sample } => {
            json.format_value(&analytics.collection_patterns(&collection, sample).await?)?
        }
        Command::Relationships {
            collection: Some(name),
            sample,
            ..
        } => json.format_value(&analytics.collection_relationships(&name, sample).await?)?,
        Command::Relationships {
            collection: None,
            sample,
            graph,
        } => {
            if graph {
                json.format_value(&analytics.relationship_graph(sample).await?)?
            } else {
                json.format_value(&analytics.all_relationships(sample).await?)?
            }
        }
        Command::Hierarchy { tree } => {
            if tree {
                json.format_value(&analytics.collection_tree().await?)?
            } else {
                json.format_value(&analytics.collection_hierarchy().await?)?
            }
        }
        Command::Analyze {
            collection,
            sample,
            max_fields,
        } => {
            let analysis = analytics.analyze_collection(&collection, sample).await?;
            if human {
                let mut config = FormatterConfig::default();
                if let Some(max) = max_fields {
                    config = config.with_max_fields(max);
                }
                HumanFormatter::with_config(config).format(&analysis)?
            } else {
                json.format(&analysis)?
            }
        }
    };

    println!("{output}");
    Ok(())
}

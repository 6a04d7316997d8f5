//! Command implementations for the EPR CLI.
//!
//! Provides subcommands for reading the plant's monthly environmental
//! report pages from the published spreadsheet and rendering them as
//! tables, CSV exports and charts.

use clap::Subcommand;
use epr_sheet::period::PeriodCode;

pub mod chart;
pub mod export;
pub mod report;
pub mod show;

#[derive(Subcommand)]
pub enum Command {
    /// List the report pages and metric rows in the embedded catalog
    Pages,

    /// Show a report page as a latest-period summary plus a table
    Show {
        /// Published spreadsheet document id
        #[arg(short = 'd', long, env = "EPR_DOC")]
        doc: String,

        /// Report page key (see `pages`)
        #[arg(short = 'p', long)]
        page: String,

        /// Inclusive period floor, e.g. 114.01 (default: January of the current ROC year)
        #[arg(short = 's', long)]
        since: Option<String>,

        /// Emit the series as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Export a report page's series to CSV
    Export {
        /// Published spreadsheet document id
        #[arg(short = 'd', long, env = "EPR_DOC")]
        doc: String,

        /// Report page key (see `pages`)
        #[arg(short = 'p', long)]
        page: String,

        /// Inclusive period floor, e.g. 114.01 (default: January of the current ROC year)
        #[arg(short = 's', long)]
        since: Option<String>,

        /// Output CSV path
        #[arg(short = 'o', long)]
        output: String,
    },

    /// Render a report page as a PNG line chart
    Chart {
        /// Published spreadsheet document id
        #[arg(short = 'd', long, env = "EPR_DOC")]
        doc: String,

        /// Report page key (see `pages`)
        #[arg(short = 'p', long)]
        page: String,

        /// Inclusive period floor, e.g. 114.01 (default: January of the current ROC year)
        #[arg(short = 's', long)]
        since: Option<String>,

        /// Chart a single metric by name (default: every metric on the page)
        #[arg(short = 'm', long)]
        metric: Option<String>,

        /// Output PNG path
        #[arg(short = 'o', long)]
        output: String,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Pages => show::run_pages(),
        Command::Show {
            doc,
            page,
            since,
            json,
        } => {
            let since = resolve_floor(since)?;
            show::run_show(&doc, &page, &since, json).await
        }
        Command::Export {
            doc,
            page,
            since,
            output,
        } => {
            let since = resolve_floor(since)?;
            export::run_export(&doc, &page, &since, &output).await
        }
        Command::Chart {
            doc,
            page,
            since,
            metric,
            output,
        } => {
            let since = resolve_floor(since)?;
            chart::run_chart(&doc, &page, metric.as_deref(), &since, &output).await
        }
    }
}

/// Normalize the user's floor to the canonical fixed-width form, or default
/// to January of the current ROC year. The extractor compares floors as
/// plain text, so the fixed-width form is what keeps ordering sane.
fn resolve_floor(since: Option<String>) -> anyhow::Result<String> {
    match since {
        Some(s) => Ok(PeriodCode::parse(&s)?.to_string()),
        None => Ok(report::default_floor()),
    }
}

//! CLI argument definitions for mwskit.
//!
//! Credentials and marketplace come from the environment
//! (`MWS_SELLER_ID`, `MWS_MARKETPLACE_ID`, `MWS_ACCESS_KEY_ID`,
//! `MWS_SECRET_ACCESS_KEY`, optional `MWS_AUTH_TOKEN`).
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sign` | Build and sign a request offline |
//! | `validate` | Check the configured credentials |
//! | `orders` | List orders created in a window |
//! | `feed` | Submit a feed or read its processing report |
//! | `report` | Request, poll and download reports |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `30000` | Transport timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! mwskit sign GetOrder -p AmazonOrderId.Id.1=111-2222222-3333333
//! mwskit orders --created-after 2024-05-01T00:00:00Z --all-pages --pretty
//! mwskit feed submit --feed-type _POST_FLAT_FILE_LISTINGS_DATA_ --file offers.txt --debug
//! mwskit report fetch 2291326454
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// mwskit - marketplace web service client
#[derive(Debug, Parser)]
#[command(
    name = "mwskit",
    author,
    version,
    about = "Signed-request client for the marketplace web service"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Transport timeout in milliseconds.
    #[arg(long, global = true, default_value_t = mwskit_core::client::DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build and sign a request without sending it.
    ///
    /// # Examples
    ///
    ///   mwskit sign ListOrders -p CreatedAfter=2024-05-01T00:00:00.000Z
    ///   mwskit sign GetOrder -p AmazonOrderId.Id.1=111 --timestamp 2024-01-01T00:00:00Z
    Sign(SignArgs),

    /// Check that the configured credentials are accepted.
    Validate,

    /// List orders created in a time window.
    Orders(OrdersArgs),

    /// Submit feeds and read processing reports.
    Feed(FeedArgs),

    /// Request, poll and download reports.
    Report(ReportArgs),
}

#[derive(Debug, Args)]
pub struct SignArgs {
    /// Operation name, e.g. `GetOrder`.
    pub operation: String,

    /// Request parameter as `Key=Value`; repeatable.
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// RFC 3339 timestamp to sign with instead of the current time.
    #[arg(long)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Args)]
pub struct OrdersArgs {
    /// Lower bound of the creation time (RFC 3339).
    #[arg(long)]
    pub created_after: String,

    /// Upper bound of the creation time (RFC 3339).
    #[arg(long)]
    pub created_before: Option<String>,

    /// Order status filter; repeatable. Defaults to Unshipped and PartiallyShipped.
    #[arg(long = "status")]
    pub statuses: Vec<String>,

    /// Follow continuation tokens until the listing is exhausted.
    #[arg(long, default_value_t = false)]
    pub all_pages: bool,
}

#[derive(Debug, Args)]
pub struct FeedArgs {
    #[command(subcommand)]
    pub command: FeedCommand,
}

#[derive(Debug, Subcommand)]
pub enum FeedCommand {
    /// Upload a pre-encoded feed file.
    Submit(FeedSubmitArgs),

    /// Fetch the processing report of a submission.
    Result {
        /// Feed submission id.
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct FeedSubmitArgs {
    /// Feed type, e.g. `_POST_INVENTORY_AVAILABILITY_DATA_`.
    #[arg(long)]
    pub feed_type: String,

    /// File whose bytes are uploaded unchanged.
    #[arg(long)]
    pub file: PathBuf,

    #[arg(long, default_value_t = false)]
    pub purge_and_replace: bool,

    /// Print the body instead of uploading it.
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(subcommand)]
    pub command: ReportCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Queue a report.
    Request {
        /// Report type, e.g. `_GET_MERCHANT_LISTINGS_DATA_`.
        report_type: String,

        /// Start of the reported period (RFC 3339).
        #[arg(long)]
        start: Option<String>,

        /// End of the reported period (RFC 3339).
        #[arg(long)]
        end: Option<String>,
    },

    /// Show the processing status of a report request.
    Status {
        /// Report request id.
        id: String,
    },

    /// Poll once and download the report when it is done.
    Fetch {
        /// Report request id.
        id: String,
    },
}

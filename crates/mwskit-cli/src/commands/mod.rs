mod feed;
mod orders;
mod report;
mod sign;
mod validate;

use std::time::Instant;

use mwskit_core::{ClientConfig, MwsClient, Timestamp};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::{Envelope, Meta};

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope, CliError> {
    let started = Instant::now();
    let config = ClientConfig::from_env()?;

    let (command, result) = match &cli.command {
        Command::Sign(args) => ("sign", sign::run(args, &config)?),
        Command::Validate => ("validate", validate::run(&client(config, cli)).await?),
        Command::Orders(args) => ("orders", orders::run(args, &client(config, cli)).await?),
        Command::Feed(args) => ("feed", feed::run(args, &client(config, cli)).await?),
        Command::Report(args) => ("report", report::run(args, &client(config, cli)).await?),
    };

    let CommandResult { data, warnings } = result;
    Ok(Envelope {
        meta: Meta {
            command,
            latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            warnings,
        },
        data,
    })
}

fn client(config: ClientConfig, cli: &Cli) -> MwsClient {
    MwsClient::new(config).with_timeout_ms(cli.timeout_ms)
}

fn parse_timestamp(flag: &str, raw: &str) -> Result<Timestamp, CliError> {
    Timestamp::parse(raw)
        .map_err(|error| CliError::InvalidArgument(format!("{flag} '{raw}': {error}")))
}

fn parse_optional_timestamp(flag: &str, raw: Option<&str>) -> Result<Option<Timestamp>, CliError> {
    raw.map(|value| parse_timestamp(flag, value)).transpose()
}

use mwskit_core::{endpoint, request, signing};
use mwskit_core::{ClientConfig, MwsError, RequestParameters, Timestamp};
use serde::Serialize;

use crate::cli::SignArgs;
use crate::error::CliError;

use super::{parse_optional_timestamp, CommandResult};

#[derive(Debug, Serialize)]
struct SignResponseData {
    operation: &'static str,
    url: String,
    string_to_sign: String,
    signature: Option<String>,
    parameters: Vec<(String, String)>,
}

/// Signs offline; nothing is sent.
pub fn run(args: &SignArgs, config: &ClientConfig) -> Result<CommandResult, CliError> {
    let parameters = parse_parameters(&args.params)?;
    let timestamp = parse_optional_timestamp("--timestamp", args.timestamp.as_deref())?
        .unwrap_or_else(Timestamp::now);

    let endpoint = endpoint::lookup(&args.operation)?;
    let signed = request::prepare(endpoint, parameters, None, config, timestamp)
        .map_err(MwsError::from)?;

    let data = SignResponseData {
        operation: signed.operation,
        url: signed.url(),
        // The canonical query skips the signature itself.
        string_to_sign: signing::string_to_sign(
            signed.method,
            signed.host,
            signed.path,
            &signed.parameters,
        ),
        signature: signed.signature().map(str::to_owned),
        parameters: signed.parameters.to_pairs(),
    };

    Ok(CommandResult::ok(serde_json::to_value(data)?))
}

fn parse_parameters(raw: &[String]) -> Result<RequestParameters, CliError> {
    let pairs = raw
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| {
                    CliError::InvalidArgument(format!("expected KEY=VALUE, got '{pair}'"))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RequestParameters::from_pairs(pairs).map_err(MwsError::from)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_split_on_first_equals() {
        let parameters = parse_parameters(&[String::from("NextToken=abc==")]).expect("valid pair");
        assert_eq!(parameters.get("NextToken"), Some("abc=="));
    }

    #[test]
    fn pair_without_key_is_rejected() {
        let error = parse_parameters(&[String::from("=value")]).expect_err("no key");
        assert!(matches!(error, CliError::InvalidArgument(_)));
    }

    #[test]
    fn signs_with_fixed_timestamp() {
        let config =
            ClientConfig::new("SELLER1", "ATVPDKIKX0DER", "AKID", "secret").expect("valid config");
        let args = SignArgs {
            operation: String::from("GetOrder"),
            params: vec![String::from("AmazonOrderId.Id.1=111-2222222-3333333")],
            timestamp: Some(String::from("2024-01-01T00:00:00Z")),
        };

        let result = run(&args, &config).expect("signed");

        assert_eq!(result.data["url"], "https://mws.amazonservices.com/Orders/2013-09-01");
        assert!(result.data["string_to_sign"]
            .as_str()
            .expect("string")
            .starts_with("POST\nmws.amazonservices.com\n/Orders/2013-09-01\n"));
        assert!(result.data["signature"].is_string());
    }
}

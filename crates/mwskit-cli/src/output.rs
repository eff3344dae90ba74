use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

/// Metadata attached to every command result.
#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub command: &'static str,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// JSON document written to stdout.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub meta: Meta,
    pub data: Value,
}

pub fn to_json(envelope: &Envelope, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(envelope)?
    } else {
        serde_json::to_string(envelope)?
    };
    Ok(json)
}

pub fn render(envelope: &Envelope, pretty: bool) -> Result<(), CliError> {
    println!("{}", to_json(envelope, pretty)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_warnings_are_omitted() {
        let envelope = Envelope {
            meta: Meta {
                command: "validate",
                latency_ms: 12,
                warnings: Vec::new(),
            },
            data: json!({ "valid": true }),
        };

        let rendered = to_json(&envelope, false).expect("serializable");

        assert_eq!(
            rendered,
            r#"{"meta":{"command":"validate","latency_ms":12},"data":{"valid":true}}"#
        );
    }
}

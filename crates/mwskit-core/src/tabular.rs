//! Tab-delimited feed and report codecs.
//!
//! Feed bodies start with a metadata line
//! (`TemplateType=<t>\tVersion=<v>[\tTemplateSignature=<s>]`) followed by the
//! field-name header, which product templates repeat on a second line. Only
//! product templates carry the `TemplateSignature` key, so its presence is
//! what marks the doubled header.
//! Report bodies are a plain header row followed by data rows.

use csv::{ReaderBuilder, StringRecord};
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{DecodeError, ValidationError};

/// One row keyed by header name, in header order.
pub type TabularRecord = IndexMap<String, String>;

/// First line of a flat-file feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateHeader {
    pub template_type: String,
    pub version: Option<String>,
    pub signature: Option<String>,
    /// Product templates declare their header row twice and always write
    /// `TemplateSignature`, empty when `signature` is `None`.
    pub doubled_header: bool,
}

impl TemplateHeader {
    pub fn product(
        template_type: impl Into<String>,
        version: Option<String>,
        signature: Option<String>,
    ) -> Self {
        Self {
            template_type: template_type.into(),
            version,
            signature,
            doubled_header: true,
        }
    }

    pub fn offer(template_type: impl Into<String>, version: Option<String>) -> Self {
        Self {
            template_type: template_type.into(),
            version,
            signature: None,
            doubled_header: false,
        }
    }

    fn metadata_fields(&self) -> Vec<String> {
        let mut fields = vec![
            format!("TemplateType={}", self.template_type),
            format!("Version={}", self.version.as_deref().unwrap_or_default()),
        ];
        if self.doubled_header {
            fields.push(format!(
                "TemplateSignature={}",
                self.signature.as_deref().unwrap_or_default()
            ));
        }
        fields
    }
}

/// Flat-file feed: a template header, the declared field order and uniform records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatFileFeed {
    pub header: TemplateHeader,
    pub fields: Vec<String>,
    pub records: Vec<TabularRecord>,
}

impl FlatFileFeed {
    pub fn new(header: TemplateHeader, fields: Vec<String>) -> Self {
        Self {
            header,
            fields,
            records: Vec::new(),
        }
    }

    /// Takes the field order from the first record.
    pub fn from_records(header: TemplateHeader, records: Vec<TabularRecord>) -> Self {
        let fields = records
            .first()
            .map(|record| record.keys().cloned().collect())
            .unwrap_or_default();
        Self {
            header,
            fields,
            records,
        }
    }

    pub fn push(&mut self, record: TabularRecord) {
        self.records.push(record);
    }

    /// Writes the metadata line, the header line(s) and one line per record.
    ///
    /// Cells are joined with tabs as they are; no quoting is ever applied.
    pub fn encode(&self) -> Result<String, ValidationError> {
        if self.fields.is_empty() {
            return Err(ValidationError::EmptyFieldList);
        }
        for metadata in self.header.metadata_fields() {
            ensure_cell("template header", &metadata)?;
        }
        for field in &self.fields {
            ensure_cell(field, field)?;
        }
        for (index, record) in self.records.iter().enumerate() {
            let uniform = record.len() == self.fields.len()
                && self.fields.iter().all(|field| record.contains_key(field));
            if !uniform {
                return Err(ValidationError::NonUniformRecords { index });
            }
            for (field, value) in record {
                ensure_cell(field, value)?;
            }
        }

        let header_line = self.fields.join("\t");
        let mut lines = vec![self.header.metadata_fields().join("\t"), header_line.clone()];
        if self.header.doubled_header {
            lines.push(header_line);
        }
        lines.extend(self.records.iter().map(|record| {
            self.fields
                .iter()
                .map(|field| record[field.as_str()].as_str())
                .collect::<Vec<_>>()
                .join("\t")
        }));

        let mut body = lines.join("\n");
        body.push('\n');
        Ok(body)
    }
}

fn ensure_cell(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.contains(['\t', '\r', '\n']) {
        return Err(ValidationError::InvalidTabularValue {
            field: field.to_owned(),
        });
    }
    Ok(())
}

/// Decodes a report body whose header row is the first line.
pub fn decode_report(text: &str) -> Result<Vec<TabularRecord>, DecodeError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = tab_reader().from_reader(text.as_bytes());
    let headers = reader.headers().map_err(read_error)?.clone();
    reader
        .records()
        .map(|row| row.map(|row| zip(&headers, &row)).map_err(read_error))
        .collect()
}

/// Inverse of [`FlatFileFeed::encode`].
///
/// Every line after the header is a record, blank ones included: a
/// single-column feed writes an empty cell as an empty line.
pub fn decode_flat_file(text: &str) -> Result<(TemplateHeader, Vec<TabularRecord>), DecodeError> {
    let mut lines = text
        .strip_suffix('\n')
        .unwrap_or(text)
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line));

    let mut template_type = None;
    let mut version = None;
    let mut signature = None;
    let mut doubled_header = false;
    for field in lines.next().unwrap_or_default().split('\t') {
        let (key, value) = field.split_once('=').unwrap_or((field, ""));
        let value = (!value.is_empty()).then(|| value.to_owned());
        match key {
            "TemplateType" => template_type = value,
            "Version" => version = value,
            "TemplateSignature" => {
                doubled_header = true;
                signature = value;
            }
            _ => {}
        }
    }
    let header = TemplateHeader {
        template_type: template_type.ok_or_else(|| DecodeError::MissingField {
            path: String::from("TemplateType"),
        })?,
        version,
        signature,
        doubled_header,
    };

    let Some(header_line) = lines.next() else {
        return Ok((header, Vec::new()));
    };
    let fields: Vec<&str> = header_line.split('\t').collect();

    let mut records = Vec::new();
    // Line 1 is the metadata line, line 2 the header.
    for (line, cells) in (3u64..).zip(lines.map(|line| line.split('\t').collect::<Vec<_>>())) {
        if cells.len() != fields.len() {
            return Err(DecodeError::TabularArity {
                line,
                expected: fields.len(),
                found: cells.len(),
            });
        }
        if doubled_header && line == 3 {
            if cells != fields {
                return Err(DecodeError::Tabular {
                    message: format!("line {line} must repeat the header of a product template"),
                });
            }
            continue;
        }
        records.push(
            fields
                .iter()
                .zip(cells)
                .map(|(name, value)| ((*name).to_owned(), value.to_owned()))
                .collect(),
        );
    }

    Ok((header, records))
}

fn tab_reader() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(true)
        .flexible(false);
    builder
}

fn zip(headers: &StringRecord, row: &StringRecord) -> TabularRecord {
    headers
        .iter()
        .zip(row.iter())
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .collect()
}

fn read_error(error: csv::Error) -> DecodeError {
    match error.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => DecodeError::TabularArity {
            line: pos.as_ref().map_or(0, |pos| pos.line()),
            expected: *expected_len as usize,
            found: *len as usize,
        },
        _ => DecodeError::Tabular {
            message: error.to_string(),
        },
    }
}

use quick_xml::escape::escape;

use crate::error::ValidationError;
use crate::value::{StructuredValue, ATTRIBUTES_KEY, VALUE_KEY};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Writes `value` as the content of a `<root>` document.
///
/// Lists are written as repeated sibling elements named after their key.
/// Attributes survive only as the `@attributes` entry of an object.
pub fn encode_document(root: &str, value: &StructuredValue) -> Result<String, ValidationError> {
    let mut out = String::from(DECLARATION);
    out.push('\n');
    write_element(&mut out, root, value)?;
    out.push('\n');
    Ok(out)
}

fn write_element(out: &mut String, name: &str, value: &StructuredValue) -> Result<(), ValidationError> {
    validate_name(name)?;

    match value {
        StructuredValue::List(items) => {
            for item in items {
                write_element(out, name, item)?;
            }
        }
        StructuredValue::Scalar(text) => write_leaf(out, name, None, text)?,
        StructuredValue::Attributes(_) => write_leaf(out, name, Some(value), "")?,
        StructuredValue::Object(map) => {
            let text = map.get(VALUE_KEY).and_then(StructuredValue::as_str).unwrap_or("");
            let children = map
                .iter()
                .filter(|(key, _)| key.as_str() != ATTRIBUTES_KEY && key.as_str() != VALUE_KEY)
                .collect::<Vec<_>>();

            if children.is_empty() {
                return write_leaf(out, name, map.get(ATTRIBUTES_KEY), text);
            }

            open_tag(out, name, map.get(ATTRIBUTES_KEY))?;
            out.push('>');
            for (key, child) in children {
                write_element(out, key, child)?;
            }
            out.push_str(&escape(text));
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
    Ok(())
}

fn write_leaf(
    out: &mut String,
    name: &str,
    attributes: Option<&StructuredValue>,
    text: &str,
) -> Result<(), ValidationError> {
    open_tag(out, name, attributes)?;
    if text.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        out.push_str(&escape(text));
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
    Ok(())
}

fn open_tag(
    out: &mut String,
    name: &str,
    attributes: Option<&StructuredValue>,
) -> Result<(), ValidationError> {
    out.push('<');
    out.push_str(name);
    if let Some(StructuredValue::Attributes(attributes)) = attributes {
        for (key, value) in attributes {
            validate_name(key)?;
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == ':');
    let valid_rest = chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'));

    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(ValidationError::InvalidElementName {
            name: name.to_owned(),
        })
    }
}

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

/// Reserved key holding an element's attributes.
pub const ATTRIBUTES_KEY: &str = "@attributes";
/// Reserved key holding the text of an element that also has attributes.
pub const VALUE_KEY: &str = "@value";

/// Tree form of a markup document.
///
/// Lists only ever come from repeated sibling elements in the source, so a
/// single child is an `Object` entry and never a one-element `List`. Use
/// [`StructuredValue::items`] where the upstream may return one or many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StructuredValue {
    Scalar(String),
    Attributes(BTreeMap<String, String>),
    Object(IndexMap<String, StructuredValue>),
    List(Vec<StructuredValue>),
}

impl Default for StructuredValue {
    fn default() -> Self {
        Self::Scalar(String::new())
    }
}

impl StructuredValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    pub fn object() -> Self {
        Self::Object(IndexMap::new())
    }

    /// Builder form of [`StructuredValue::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StructuredValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets an attribute, turning a scalar into `{@attributes, @value}`.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Scalar(text) = &self {
            let text = text.clone();
            self = Self::object();
            if !text.is_empty() {
                self.insert(VALUE_KEY, Self::Scalar(text));
            }
        }
        if let Self::Object(map) = &mut self {
            let entry = map
                .entry(ATTRIBUTES_KEY.to_owned())
                .or_insert_with(|| Self::Attributes(BTreeMap::new()));
            if let Self::Attributes(attributes) = entry {
                attributes.insert(name.into(), value.into());
            }
        }
        self
    }

    /// Inserts into an object. Non-object values are replaced by an object first.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StructuredValue>) {
        if !matches!(self, Self::Object(_)) {
            *self = Self::object();
        }
        if let Self::Object(map) = self {
            map.insert(key.into(), value.into());
        }
    }

    /// Text of a scalar, or of the `@value` of an attributed element.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(text) => Some(text),
            Self::Object(map) => map.get(VALUE_KEY).and_then(Self::as_str),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, StructuredValue>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&StructuredValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Follows a `/`-separated chain of object keys.
    pub fn path(&self, path: &str) -> Option<&StructuredValue> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.get(segment))
    }

    pub fn path_str(&self, path: &str) -> Option<&str> {
        self.path(path).and_then(Self::as_str)
    }

    pub fn attributes(&self) -> Option<&BTreeMap<String, String>> {
        match self.get(ATTRIBUTES_KEY) {
            Some(Self::Attributes(attributes)) => Some(attributes),
            _ => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes()
            .and_then(|attributes| attributes.get(name))
            .map(String::as_str)
    }

    /// Views the node as a sequence: a list yields its items, an empty scalar
    /// yields nothing, anything else is a one-element sequence.
    pub fn items(&self) -> &[StructuredValue] {
        match self {
            Self::List(items) => items,
            Self::Scalar(text) if text.is_empty() => &[],
            other => std::slice::from_ref(other),
        }
    }

    pub fn into_items(self) -> Vec<StructuredValue> {
        match self {
            Self::List(items) => items,
            Self::Scalar(text) if text.is_empty() => Vec::new(),
            other => vec![other],
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(text) => text.is_empty(),
            Self::Attributes(attributes) => attributes.is_empty(),
            Self::Object(map) => map.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    /// Drops direct object entries that are empty.
    pub fn prune_empty(self) -> Self {
        match self {
            Self::Object(map) => {
                Self::Object(map.into_iter().filter(|(_, v)| !v.is_empty()).collect())
            }
            other => other,
        }
    }
}

impl From<&str> for StructuredValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_owned())
    }
}

impl From<String> for StructuredValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<StructuredValue>> for StructuredValue {
    fn from(value: Vec<StructuredValue>) -> Self {
        Self::List(value)
    }
}

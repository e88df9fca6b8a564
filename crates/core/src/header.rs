use serde::{Deserialize, Serialize};
use std::fmt;

/// A header field value: the session id is coerced to a number when its
/// digits parse, everything else stays display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Number(n) => write!(f, "{n}"),
            HeaderValue::Text(s) => f.write_str(s),
        }
    }
}

/// Labeled fields pulled from the free text above the movement table.
/// Fields absent from the source are simply not present here; insertion
/// order is preserved for rendering as a one-row table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderSummary {
    fields: Vec<(String, HeaderValue)>,
}

impl HeaderSummary {
    /// Insert or replace by label; a replaced field keeps its position.
    pub fn insert(&mut self, label: impl Into<String>, value: HeaderValue) {
        let label = label.into();
        match self.fields.iter_mut().find(|(l, _)| *l == label) {
            Some((_, v)) => *v = value,
            None => self.fields.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&HeaderValue> {
        self.fields
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.fields.iter().map(|(l, v)| (l.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

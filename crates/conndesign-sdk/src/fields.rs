use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for FieldId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of the values currently selected in a graph.
///
/// Unset fields are absent, so [`Selection::get`] never yields an empty
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    values: BTreeMap<FieldId, String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: FieldId, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.values.remove(&field);
        } else {
            self.values.insert(field, value);
        }
    }
}

/// Computes the allowed values of one field from its upstream selection.
///
/// Implementations must be pure: the same upstream selection always yields
/// the same list.
pub trait ValueSource: Send + Sync + fmt::Debug {
    fn allowed_values(&self, upstream: &Selection) -> Vec<String>;
}

/// A fixed list, independent of any other field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticValues(Vec<String>);

impl StaticValues {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(values.into_iter().map(Into::into).collect())
    }
}

impl ValueSource for StaticValues {
    fn allowed_values(&self, _upstream: &Selection) -> Vec<String> {
        self.0.clone()
    }
}

/// A table keyed by the current value of one upstream field.
///
/// An unset key, or a key missing from the table, yields no values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedValues {
    key: FieldId,
    table: BTreeMap<String, Vec<String>>,
}

impl KeyedValues {
    pub fn new(key: impl Into<FieldId>) -> Self {
        Self {
            key: key.into(),
            table: BTreeMap::new(),
        }
    }

    pub fn with_entry<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table
            .insert(key.into(), values.into_iter().map(Into::into).collect());
        self
    }
}

impl ValueSource for KeyedValues {
    fn allowed_values(&self, upstream: &Selection) -> Vec<String> {
        upstream
            .get(self.key.as_str())
            .and_then(|key| self.table.get(key))
            .cloned()
            .unwrap_or_default()
    }
}

/// Declaration of one dropdown field.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub id: FieldId,
    pub label: String,
    pub depends_on: Vec<FieldId>,
    pub source: Arc<dyn ValueSource>,
    pub default: Option<String>,
    pub required: bool,
}

impl FieldDefinition {
    pub fn new(
        id: impl Into<FieldId>,
        label: impl Into<String>,
        source: impl ValueSource + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            depends_on: Vec::new(),
            source: Arc::new(source),
            default: None,
            required: true,
        }
    }

    pub fn depends_on(mut self, field: impl Into<FieldId>) -> Self {
        self.depends_on.push(field.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the field as informational: it does not feed the computation and
    /// does not count towards completeness.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn keyed_values_follow_upstream_key() {
        let source = KeyedValues::new("unit")
            .with_entry("Imperial Units", ["1/2 in.", "5/8 in."])
            .with_entry("Metric Units", ["16 mm"]);
        let mut selection = Selection::new();
        assert!(source.allowed_values(&selection).is_empty());

        selection.insert("unit".into(), "Metric Units");
        assert_eq!(source.allowed_values(&selection), vec!["16 mm".to_string()]);
    }

    #[test]
    fn empty_value_removes_selection_entry() {
        let mut selection = Selection::new();
        selection.insert("grade".into(), "A992");
        selection.insert("grade".into(), "");
        assert_eq!(selection.get("grade"), None);
    }
}

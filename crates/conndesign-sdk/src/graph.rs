use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::debug;

use crate::fields::{FieldDefinition, FieldId, Selection};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown field `{0}`")]
    UnknownField(FieldId),
    #[error("field `{field}` does not currently allow value `{value}`")]
    InvalidValue { field: FieldId, value: String },
    #[error("field `{0}` is declared more than once")]
    DuplicateField(FieldId),
    #[error("field `{field}` depends on `{dependency}`, which is not declared before it")]
    UnknownDependency { field: FieldId, dependency: FieldId },
}

/// Live state of one declared field.
#[derive(Debug, Clone)]
pub struct Field {
    definition: FieldDefinition,
    upstream: Vec<usize>,
    current: Option<String>,
    allowed: Vec<String>,
}

impl Field {
    pub fn id(&self) -> &FieldId {
        &self.definition.id
    }

    pub fn label(&self) -> &str {
        &self.definition.label
    }

    pub fn is_required(&self) -> bool {
        self.definition.required
    }

    pub fn depends_on(&self) -> &[FieldId] {
        &self.definition.depends_on
    }

    pub fn current_value(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn allowed_values(&self) -> &[String] {
        &self.allowed
    }

    fn allows(&self, value: &str) -> bool {
        self.allowed.iter().any(|allowed| allowed == value)
    }
}

/// Summary of what a single [`SelectionGraph::set_field`] call touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldChange {
    pub field: Option<FieldId>,
    /// Dependents whose allowed values were recomputed, in declared order.
    pub recomputed: Vec<FieldId>,
    /// Dependents whose selection was cleared because it left its allowed set.
    pub cleared: Vec<FieldId>,
}

impl FieldChange {
    /// True when the call left every field exactly as it was.
    pub fn is_noop(&self) -> bool {
        self.field.is_none()
    }
}

#[derive(Debug, Default)]
pub struct SelectionGraphBuilder {
    definitions: Vec<FieldDefinition>,
}

impl SelectionGraphBuilder {
    pub fn field(mut self, definition: FieldDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Validate the declarations and seed every field.
    ///
    /// A field may only depend on fields declared before it, which makes the
    /// declaration order a topological order. Each field starts on its
    /// default when that is allowed, otherwise on its first allowed value.
    pub fn build(self) -> Result<SelectionGraph, GraphError> {
        let mut graph = SelectionGraph {
            fields: Vec::with_capacity(self.definitions.len()),
            index: HashMap::new(),
        };
        for definition in self.definitions {
            if graph.index.contains_key(definition.id.as_str()) {
                return Err(GraphError::DuplicateField(definition.id));
            }
            let upstream = definition
                .depends_on
                .iter()
                .map(|dependency| {
                    graph
                        .index
                        .get(dependency.as_str())
                        .copied()
                        .ok_or_else(|| GraphError::UnknownDependency {
                            field: definition.id.clone(),
                            dependency: dependency.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let allowed = definition.source.allowed_values(&graph.selection());
            let current = definition
                .default
                .clone()
                .filter(|default| allowed.contains(default))
                .or_else(|| allowed.first().cloned());

            graph
                .index
                .insert(definition.id.as_str().to_string(), graph.fields.len());
            graph.fields.push(Field {
                definition,
                upstream,
                current,
                allowed,
            });
        }
        Ok(graph)
    }
}

/// A set of dropdown fields whose allowed values depend on each other.
///
/// The graph never holds a selection outside its field's allowed values:
/// whenever an upstream change removes a downstream field's current value,
/// that field is cleared and the invalidation carries on to its own
/// dependents within the same call.
#[derive(Debug, Clone)]
pub struct SelectionGraph {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl SelectionGraph {
    pub fn builder() -> SelectionGraphBuilder {
        SelectionGraphBuilder::default()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Result<&Field, GraphError> {
        self.position(name).map(|position| &self.fields[position])
    }

    pub fn current_value(&self, name: &str) -> Result<Option<&str>, GraphError> {
        self.field(name).map(Field::current_value)
    }

    pub fn allowed_values(&self, name: &str) -> Result<&[String], GraphError> {
        self.field(name).map(Field::allowed_values)
    }

    /// True when every required field has a value.
    pub fn is_complete(&self) -> bool {
        self.fields
            .iter()
            .filter(|field| field.is_required())
            .all(|field| field.current.is_some())
    }

    pub fn selection(&self) -> Selection {
        let mut selection = Selection::new();
        for field in &self.fields {
            if let Some(value) = &field.current {
                selection.insert(field.id().clone(), value.clone());
            }
        }
        selection
    }

    /// Select `value` on field `name`; an empty value clears the field.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<FieldChange, GraphError> {
        let position = self.position(name)?;
        let field = &mut self.fields[position];
        if !value.is_empty() && !field.allows(value) {
            return Err(GraphError::InvalidValue {
                field: field.id().clone(),
                value: value.to_string(),
            });
        }

        let next = (!value.is_empty()).then(|| value.to_string());
        if field.current == next {
            return Ok(FieldChange::default());
        }
        field.current = next;

        let mut change = FieldChange {
            field: Some(field.id().clone()),
            ..FieldChange::default()
        };
        let mut dirty = HashSet::from([position]);
        for downstream in position + 1..self.fields.len() {
            if !self.fields[downstream]
                .upstream
                .iter()
                .any(|upstream| dirty.contains(upstream))
            {
                continue;
            }
            let allowed = self.fields[downstream]
                .definition
                .source
                .allowed_values(&self.selection());
            let field = &mut self.fields[downstream];
            field.allowed = allowed;
            change.recomputed.push(field.id().clone());
            dirty.insert(downstream);

            let stale = field
                .current
                .as_deref()
                .map_or(false, |current| !field.allows(current));
            if stale {
                debug!(field = %field.id(), "clearing selection invalidated by upstream change");
                field.current = None;
                change.cleared.push(field.id().clone());
            }
        }
        Ok(change)
    }

    fn position(&self, name: &str) -> Result<usize, GraphError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownField(FieldId::new(name)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::fields::{KeyedValues, StaticValues};

    /// `region -> city -> street`, each level keyed by the one above.
    fn cascade() -> SelectionGraph {
        SelectionGraph::builder()
            .field(FieldDefinition::new(
                "region",
                "Region",
                StaticValues::new(["north", "south"]),
            ))
            .field(
                FieldDefinition::new(
                    "city",
                    "City",
                    KeyedValues::new("region")
                        .with_entry("north", ["oslo", "bergen"])
                        .with_entry("south", ["rome", "bergen"]),
                )
                .depends_on("region"),
            )
            .field(
                FieldDefinition::new(
                    "street",
                    "Street",
                    KeyedValues::new("city")
                        .with_entry("oslo", ["karl johan"])
                        .with_entry("bergen", ["bryggen"])
                        .with_entry("rome", ["via appia"]),
                )
                .depends_on("city"),
            )
            .field(
                FieldDefinition::new("note", "Note", StaticValues::new(["a", "b"])).optional(),
            )
            .build()
            .unwrap()
    }

    fn assert_no_dangling(graph: &SelectionGraph) {
        for field in graph.fields() {
            if let Some(current) = field.current_value() {
                assert!(
                    field.allowed_values().iter().any(|v| v == current),
                    "{} holds {current} outside {:?}",
                    field.id(),
                    field.allowed_values()
                );
            }
        }
    }

    #[test]
    fn build_seeds_first_allowed_values() {
        let graph = cascade();
        assert_eq!(graph.current_value("region").unwrap(), Some("north"));
        assert_eq!(graph.current_value("city").unwrap(), Some("oslo"));
        assert_eq!(graph.current_value("street").unwrap(), Some("karl johan"));
        assert!(graph.is_complete());
    }

    #[test]
    fn default_wins_over_first_value() {
        let graph = SelectionGraph::builder()
            .field(
                FieldDefinition::new("code", "Code", StaticValues::new(["13", "14", "15"]))
                    .with_default("14"),
            )
            .build()
            .unwrap();
        assert_eq!(graph.current_value("code").unwrap(), Some("14"));
    }

    #[test]
    fn forward_dependencies_are_rejected() {
        let err = SelectionGraph::builder()
            .field(
                FieldDefinition::new("a", "A", StaticValues::new(["x"])).depends_on("b"),
            )
            .field(FieldDefinition::new("b", "B", StaticValues::new(["y"])))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownDependency {
                field: "a".into(),
                dependency: "b".into()
            }
        );
    }

    #[test]
    fn duplicate_fields_are_rejected() {
        let err = SelectionGraph::builder()
            .field(FieldDefinition::new("a", "A", StaticValues::new(["x"])))
            .field(FieldDefinition::new("a", "A", StaticValues::new(["y"])))
            .build()
            .unwrap_err();
        assert_eq!(err, GraphError::DuplicateField("a".into()));
    }

    #[test]
    fn unknown_field_and_invalid_value_are_errors() {
        let mut graph = cascade();
        assert_eq!(
            graph.set_field("nope", "x").unwrap_err(),
            GraphError::UnknownField("nope".into())
        );
        assert_eq!(
            graph.set_field("city", "rome").unwrap_err(),
            GraphError::InvalidValue {
                field: "city".into(),
                value: "rome".into()
            }
        );
        assert_eq!(graph.current_value("city").unwrap(), Some("oslo"));
    }

    #[test]
    fn upstream_change_clears_two_levels_in_one_call() {
        let mut graph = cascade();
        let change = graph.set_field("region", "south").unwrap();

        assert_eq!(change.recomputed, vec![FieldId::from("city"), "street".into()]);
        assert_eq!(change.cleared, vec![FieldId::from("city"), "street".into()]);
        assert_eq!(graph.current_value("city").unwrap(), None);
        assert_eq!(graph.current_value("street").unwrap(), None);
        assert!(graph.allowed_values("street").unwrap().is_empty());
        assert!(!graph.is_complete());
        assert_no_dangling(&graph);
    }

    #[test]
    fn surviving_selection_is_kept() {
        let mut graph = cascade();
        graph.set_field("city", "bergen").unwrap();
        assert_eq!(graph.current_value("street").unwrap(), None);
        graph.set_field("street", "bryggen").unwrap();
        let change = graph.set_field("region", "south").unwrap();

        assert!(change.cleared.is_empty());
        assert_eq!(change.recomputed, vec![FieldId::from("city"), "street".into()]);
        assert_eq!(graph.current_value("city").unwrap(), Some("bergen"));
        assert_eq!(graph.current_value("street").unwrap(), Some("bryggen"));
    }

    #[test]
    fn setting_the_current_value_changes_nothing() {
        let mut graph = cascade();
        let before: Vec<_> = graph
            .fields()
            .iter()
            .map(|f| (f.current_value().map(str::to_string), f.allowed_values().to_vec()))
            .collect();
        let change = graph.set_field("region", "north").unwrap();
        let after: Vec<_> = graph
            .fields()
            .iter()
            .map(|f| (f.current_value().map(str::to_string), f.allowed_values().to_vec()))
            .collect();
        assert!(change.is_noop());
        assert_eq!(before, after);
    }

    #[test]
    fn optional_fields_do_not_affect_completeness() {
        let mut graph = cascade();
        graph.set_field("note", "").unwrap();
        assert!(graph.is_complete());
        graph.set_field("street", "").unwrap();
        assert!(!graph.is_complete());
    }

    fn event() -> impl Strategy<Value = (usize, usize)> {
        (0usize..4, 0usize..4)
    }

    proptest! {
        #[test]
        fn no_selection_ever_dangles(events in proptest::collection::vec(event(), 0..32)) {
            let mut graph = cascade();
            for (field, choice) in events {
                let name = graph.fields()[field].id().as_str().to_string();
                let allowed = graph.allowed_values(&name).unwrap().to_vec();
                // choice == allowed.len() exercises clearing the field
                let value = allowed.get(choice).cloned().unwrap_or_default();
                graph.set_field(&name, &value).unwrap();
                assert_no_dangling(&graph);
            }
        }
    }
}

//! Conjunctive field predicates for [`DocumentStore::query`](super::DocumentStore::query).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One condition on a top-level field. A missing field reads as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Clause {
    /// Field equals the value.
    Eq { field: String, value: Value },
    /// Field differs from the value.
    Ne { field: String, value: Value },
    /// Field is an array containing the value.
    Contains { field: String, value: Value },
}

impl Clause {
    /// Whether `document` satisfies this clause.
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            Clause::Eq { field, value } => field_value(document, field) == value,
            Clause::Ne { field, value } => field_value(document, field) != value,
            Clause::Contains { field, value } => document
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
        }
    }
}

/// A conjunction of clauses. The empty predicate matches every document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub clauses: Vec<Clause>,
}

impl Predicate {
    /// Match every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality clause.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Add an inequality clause.
    pub fn ne(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Ne {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Add an array-contains clause.
    pub fn contains(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Contains {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Whether `document` satisfies every clause.
    pub fn matches(&self, document: &Value) -> bool {
        self.clauses.iter().all(|clause| clause.matches(document))
    }
}

static NULL: Value = Value::Null;

fn field_value<'a>(document: &'a Value, field: &str) -> &'a Value {
    document.get(field).unwrap_or(&NULL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_predicate_matches_everything() {
        assert!(Predicate::all().matches(&json!({"id": "x"})));
    }

    #[test]
    fn test_conjunction() {
        let doc = json!({"artistId": "a1", "artshowId": "s1", "tags": ["x"]});

        assert!(Predicate::all().eq("artistId", "a1").eq("artshowId", "s1").matches(&doc));
        assert!(!Predicate::all().eq("artistId", "a1").eq("artshowId", "s2").matches(&doc));
        assert!(Predicate::all().contains("tags", "x").matches(&doc));
        assert!(!Predicate::all().contains("artistId", "a1").matches(&doc));
    }

    #[test]
    fn test_missing_field_is_null() {
        let doc = json!({"id": "x"});
        assert!(Predicate::all().eq("showStatus", Value::Null).matches(&doc));
        assert!(Predicate::all().ne("showStatus", "none").matches(&doc));
    }
}

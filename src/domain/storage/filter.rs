//! Document filters for scoped queries
//!
//! A filter is evaluated by the storage backend itself, so a scoped listing
//! never materializes documents outside the scope.

use serde_json::Value;

/// A predicate over a top-level field of a stored JSON document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFilter {
    /// String field equals the value
    Equals { field: &'static str, value: String },
    /// Array field contains the value
    Contains { field: &'static str, value: String },
    /// String field is one of the values; an empty set matches nothing
    In {
        field: &'static str,
        values: Vec<String>,
    },
}

impl DocumentFilter {
    pub fn equals(field: &'static str, value: impl Into<String>) -> Self {
        Self::Equals {
            field,
            value: value.into(),
        }
    }

    pub fn contains(field: &'static str, value: impl Into<String>) -> Self {
        Self::Contains {
            field,
            value: value.into(),
        }
    }

    pub fn one_of<I, S>(field: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::In {
            field,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The document field this filter inspects
    pub fn field(&self) -> &'static str {
        match self {
            Self::Equals { field, .. } | Self::Contains { field, .. } | Self::In { field, .. } => {
                field
            }
        }
    }

    /// Evaluate the filter against a serialized document
    pub fn matches(&self, document: &Value) -> bool {
        let Some(field_value) = document.get(self.field()) else {
            return false;
        };

        match self {
            Self::Equals { value, .. } => field_value.as_str() == Some(value.as_str()),
            Self::Contains { value, .. } => field_value
                .as_array()
                .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(value.as_str()))),
            Self::In { values, .. } => field_value
                .as_str()
                .is_some_and(|s| values.iter().any(|v| v == s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equals() {
        let doc = json!({ "team": "t-1" });
        assert!(DocumentFilter::equals("team", "t-1").matches(&doc));
        assert!(!DocumentFilter::equals("team", "t-2").matches(&doc));
    }

    #[test]
    fn test_contains_array_member() {
        let doc = json!({ "members": ["u-1", "u-2"] });
        assert!(DocumentFilter::contains("members", "u-2").matches(&doc));
        assert!(!DocumentFilter::contains("members", "u-3").matches(&doc));
    }

    #[test]
    fn test_contains_on_non_array_field() {
        let doc = json!({ "members": "u-1" });
        assert!(!DocumentFilter::contains("members", "u-1").matches(&doc));
    }

    #[test]
    fn test_one_of() {
        let doc = json!({ "team": "t-2" });
        assert!(DocumentFilter::one_of("team", ["t-1", "t-2"]).matches(&doc));
        assert!(!DocumentFilter::one_of("team", ["t-3"]).matches(&doc));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let doc = json!({ "team": "t-1" });
        assert!(!DocumentFilter::one_of("team", Vec::<String>::new()).matches(&doc));
    }

    #[test]
    fn test_missing_field() {
        let doc = json!({ "name": "x" });
        assert!(!DocumentFilter::equals("team", "t-1").matches(&doc));
    }
}

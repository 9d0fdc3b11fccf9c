//! Sorting
//!
//! Sort instructions carried by a paged request and their query-string
//! form: `&sort=Name,Age desc`.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDefinition {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortDefinition {
    /// Ascending sort on `field`
    pub fn new(field: impl Into<String>) -> Self {
        Self::with_direction(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::with_direction(field, SortDirection::Descending)
    }

    pub fn with_direction(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// `Name` or `Name desc`
impl fmt::Display for SortDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => f.write_str(&self.field),
            SortDirection::Descending => write!(f, "{} desc", self.field),
        }
    }
}

/// Ordered sort list; earlier entries take precedence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortDefinitions(Vec<SortDefinition>);

impl SortDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sort: SortDefinition) {
        self.0.push(sort);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SortDefinition> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `&sort=<a>,<b> desc`, or empty when there is nothing to sort by
    pub fn to_query_string(&self) -> String {
        let value = self
            .0
            .iter()
            .map(SortDefinition::to_string)
            .collect::<Vec<_>>()
            .join(",");

        if value.trim().is_empty() {
            String::new()
        } else {
            format!("&sort={value}")
        }
    }
}

impl From<Vec<SortDefinition>> for SortDefinitions {
    fn from(sorts: Vec<SortDefinition>) -> Self {
        Self(sorts)
    }
}

impl FromIterator<SortDefinition> for SortDefinitions {
    fn from_iter<I: IntoIterator<Item = SortDefinition>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SortDefinitions {
    type Item = &'a SortDefinition;
    type IntoIter = std::slice::Iter<'a, SortDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for SortDefinitions {
    type Item = SortDefinition;
    type IntoIter = std::vec::IntoIter<SortDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sorts_produce_nothing() {
        assert_eq!(SortDefinitions::new().to_query_string(), "");
    }

    #[test]
    fn test_single_sort() {
        let sorts = SortDefinitions::from(vec![SortDefinition::new("Name")]);
        assert_eq!(sorts.to_query_string(), "&sort=Name");
    }

    #[test]
    fn test_mixed_directions() {
        let sorts: SortDefinitions = [SortDefinition::new("Name"), SortDefinition::descending("Age")]
            .into_iter()
            .collect();
        assert_eq!(sorts.to_query_string(), "&sort=Name,Age desc");
    }

    #[test]
    fn test_blank_field_produces_nothing() {
        let sorts = SortDefinitions::from(vec![SortDefinition::new(" ")]);
        assert_eq!(sorts.to_query_string(), "");
    }

    #[test]
    fn test_json_shape() {
        let sorts = SortDefinitions::from(vec![SortDefinition::descending("Age")]);
        let json = serde_json::to_value(&sorts).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "field": "Age", "direction": "Descending" }])
        );

        let parsed: SortDefinition = serde_json::from_str(r#"{ "field": "Name" }"#).unwrap();
        assert_eq!(parsed.direction, SortDirection::Ascending);
    }
}

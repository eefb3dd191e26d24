//! Schema-fixed key/value storage.
//!
//! A `DefinedMap` has a restricted set of fields established at construction
//! that cannot be changed afterward. The data a field points to CAN be
//! updated. Every field carries a human-readable description, similar to a
//! docstring.

use crate::{Result, XrbError};
use std::collections::HashMap;
use std::fmt;

/// A map-like container with a frozen field set.
///
/// The field set, the descriptions, and the value keys are guaranteed to
/// stay identical for the container's lifetime: construction validates the
/// key sets once and every later operation relies on it.
///
/// # Example
///
/// ```
/// use xrb_core::DefinedMap;
///
/// let map = DefinedMap::new(
///     [("field1", 1), ("field2", 2)],
///     [
///         ("field1", "The first field, an integer."),
///         ("field2", "The second field, an integer."),
///     ],
/// ).unwrap();
///
/// assert_eq!(map.get("field1").unwrap(), &1);
/// assert!(map.get("field3").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DefinedMap<V> {
    /// Field names in construction order. This is the frozen schema and
    /// the iteration order.
    fields: Vec<String>,

    /// Human-readable description per field.
    descriptions: HashMap<String, String>,

    /// Current value per field.
    values: HashMap<String, V>,
}

impl<V> DefinedMap<V> {
    /// Create a new map from initial values and field descriptions.
    ///
    /// Both arguments are key/value pair collections. Fails with
    /// [`XrbError::SchemaMismatch`] if their key sets are not identical.
    /// Field order follows the order keys first appear in `values`.
    pub fn new<K, D, I, J>(values: I, descriptions: J) -> Result<Self>
    where
        K: Into<String>,
        D: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        J: IntoIterator<Item = (K, D)>,
    {
        let mut fields = Vec::new();
        let mut value_map = HashMap::new();
        for (key, value) in values {
            let key = key.into();
            if !value_map.contains_key(&key) {
                fields.push(key.clone());
            }
            value_map.insert(key, value);
        }

        let mut desc_map = HashMap::new();
        for (key, desc) in descriptions {
            let key = key.into();
            if !value_map.contains_key(&key) {
                return Err(XrbError::SchemaMismatch);
            }
            desc_map.insert(key, desc.into());
        }
        if desc_map.len() != value_map.len() {
            return Err(XrbError::SchemaMismatch);
        }

        Ok(Self {
            fields,
            descriptions: desc_map,
            values: value_map,
        })
    }

    /// Get the value stored in `field`.
    pub fn get(&self, field: &str) -> Result<&V> {
        self.values
            .get(field)
            .ok_or_else(|| XrbError::UnknownField(field.to_string()))
    }

    /// Set `field` to store `value`. Never creates a new field.
    pub fn set(&mut self, field: &str, value: V) -> Result<()> {
        match self.values.get_mut(field) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(XrbError::UnknownField(field.to_string())),
        }
    }

    /// Removal is categorically rejected: the field set is immutable.
    pub fn remove(&mut self, _field: &str) -> Result<V> {
        Err(XrbError::ImmutableSchema)
    }

    /// Get the description of `field`.
    pub fn describe(&self, field: &str) -> Result<&str> {
        self.descriptions
            .get(field)
            .map(String::as_str)
            .ok_or_else(|| XrbError::UnknownField(field.to_string()))
    }

    /// Check whether `field` is part of the frozen field set.
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in construction order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Iterate over (field, value) pairs in construction order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.fields.iter().map(move |f| {
            // fields and values share the same key set by construction
            (f.as_str(), &self.values[f])
        })
    }

    /// A string listing every field and its description, without values.
    /// Used for schema documentation output.
    pub fn fields_summary(&self) -> String {
        let entries: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("{} - {}", f, self.descriptions[f]))
            .collect();
        format!("DefinedMap fields\n{}", entries.join("\n"))
    }
}

impl<V: fmt::Display> fmt::Display for DefinedMap<V> {
    /// Full-detail form: every field with its description and current value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .fields
            .iter()
            .map(|field| {
                format!(
                    "{} - {}\n    {}",
                    field, self.descriptions[field], self.values[field]
                )
            })
            .collect();
        write!(f, "DefinedMap\n{}", entries.join("\n---\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DefinedMap<i32> {
        DefinedMap::new(
            [("field1", 1), ("field2", 2)],
            [
                ("field1", "The first field, an integer."),
                ("field2", "The second field, an integer."),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_get_and_set() {
        let mut map = sample();
        assert_eq!(map.get("field1").unwrap(), &1);
        map.set("field2", 42).unwrap();
        assert_eq!(map.get("field2").unwrap(), &42);
    }

    #[test]
    fn test_unknown_field() {
        let mut map = sample();
        assert!(matches!(map.get("field3"), Err(XrbError::UnknownField(_))));
        assert!(matches!(
            map.set("field3", 3),
            Err(XrbError::UnknownField(_))
        ));
        assert!(matches!(
            map.describe("field3"),
            Err(XrbError::UnknownField(_))
        ));
    }

    #[test]
    fn test_schema_mismatch() {
        let result = DefinedMap::new([("a", 1), ("b", 2)], [("a", "desc a")]);
        assert!(matches!(result, Err(XrbError::SchemaMismatch)));

        let result = DefinedMap::new([("a", 1)], [("a", "desc a"), ("b", "desc b")]);
        assert!(matches!(result, Err(XrbError::SchemaMismatch)));
    }

    #[test]
    fn test_remove_rejected() {
        let mut map = sample();
        assert!(matches!(map.remove("field1"), Err(XrbError::ImmutableSchema)));
        assert!(matches!(map.remove("nope"), Err(XrbError::ImmutableSchema)));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("field1").unwrap(), &1);
    }

    #[test]
    fn test_iteration_order_and_exactness() {
        let map = DefinedMap::new(
            [("z", 0), ("a", 1), ("m", 2)],
            [("z", "z"), ("a", "a"), ("m", "m")],
        )
        .unwrap();
        let fields: Vec<&str> = map.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["z", "a", "m"]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_describe() {
        let map = sample();
        assert_eq!(
            map.describe("field2").unwrap(),
            "The second field, an integer."
        );
    }

    #[test]
    fn test_display_forms() {
        let map = sample();
        let verbose = map.to_string();
        assert!(verbose.contains("field1 - The first field, an integer."));
        assert!(verbose.contains("    1"));
        assert!(verbose.contains("---"));

        let summary = map.fields_summary();
        assert!(summary.contains("field2 - The second field, an integer."));
        assert!(!summary.contains("    2"));
    }
}

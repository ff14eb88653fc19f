//! Update value types for precise partial-update semantics
//!
//! Distinguishes between "set to value", "clear", and "don't update" for
//! fields of an update request.

use serde::{Deserialize, Deserializer, Serialize};

/// Represents a precise update operation for one field
///
/// - `Set(T)`: Set the field to the specified value
/// - `Unset`: Clear the field (`null` in JSON)
/// - `NoChange`: Field was not provided
///
/// Use together with `#[serde(default)]` so that a missing key becomes `NoChange`:
///
/// ```rust
/// use serde::Deserialize;
/// use taskboard_domain::UpdateValue;
///
/// #[derive(Deserialize)]
/// struct Patch {
///     #[serde(default)]
///     description: UpdateValue<String>,
/// }
///
/// let patch: Patch = serde_json::from_str(r#"{"description": null}"#).unwrap();
/// assert_eq!(patch.description, UpdateValue::Unset);
/// let patch: Patch = serde_json::from_str("{}").unwrap();
/// assert_eq!(patch.description, UpdateValue::NoChange);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(untagged)]
pub enum UpdateValue<T> {
    /// Set the field to the specified value
    Set(T),
    /// Clear the field
    Unset,
    /// Do not modify the field
    #[default]
    NoChange,
}

impl<T> UpdateValue<T> {
    /// Check if this update represents a change
    pub fn is_change(&self) -> bool {
        !matches!(self, UpdateValue::NoChange)
    }

    /// Get the value if this is a Set operation
    pub fn value(&self) -> Option<&T> {
        match self {
            UpdateValue::Set(value) => Some(value),
            _ => None,
        }
    }

    /// Convert to Option<Option<T>>, where the outer None means "no change"
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            UpdateValue::Set(value) => Some(Some(value)),
            UpdateValue::Unset => Some(None),
            UpdateValue::NoChange => None,
        }
    }

    /// Map the inner value if this is a Set operation
    pub fn map<U, F>(self, f: F) -> UpdateValue<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            UpdateValue::Set(value) => UpdateValue::Set(f(value)),
            UpdateValue::Unset => UpdateValue::Unset,
            UpdateValue::NoChange => UpdateValue::NoChange,
        }
    }
}

impl<T> From<Option<T>> for UpdateValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => UpdateValue::Set(value),
            None => UpdateValue::Unset,
        }
    }
}

impl<'de, T> Deserialize<'de> for UpdateValue<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // 字段存在时才会调用这里；缺失字段由 #[serde(default)] 处理
        Option::<T>::deserialize(deserializer).map(UpdateValue::from)
    }
}

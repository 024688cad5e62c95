use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::core::TodoError;

/// Opaque record identifier. Backends hand these out; callers never parse them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Fresh random id. Random v4 UUIDs are never reissued after a delete.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TodoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
}

impl Todo {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: TodoId::generate(),
            text: text.into(),
            completed: false,
        }
    }

    /// Applies the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Body of `POST /api/todos`. `text` stays optional so a missing field
/// surfaces as a validation error instead of a framework rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTodo {
    #[serde(default)]
    pub text: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            text: None,
            completed: Some(completed),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            completed: None,
        }
    }

    pub fn validate(&self) -> Result<(), TodoError> {
        if let Some(text) = &self.text {
            validate_text(text)?;
        }
        Ok(())
    }
}

/// Blank text is rejected everywhere a todo's text is written.
pub fn validate_text(text: &str) -> Result<&str, TodoError> {
    if text.trim().is_empty() {
        return Err(TodoError::Validation("text must not be empty".into()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_todo_starts_incomplete() {
        let todo = Todo::new("buy milk");
        assert_eq!(todo.text, "buy milk");
        assert!(!todo.completed);
        assert!(!todo.id.as_str().is_empty());
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(TodoId::generate(), TodoId::generate());
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut todo = Todo::new("walk dog");
        todo.apply(&TodoPatch::completed(true));
        assert_eq!(todo.text, "walk dog");
        assert!(todo.completed);

        todo.apply(&TodoPatch::text("walk cat"));
        assert_eq!(todo.text, "walk cat");
        assert!(todo.completed);
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(matches!(validate_text(""), Err(TodoError::Validation(_))));
        assert!(matches!(validate_text("  \t"), Err(TodoError::Validation(_))));
        assert!(validate_text("ok").is_ok());
        assert!(TodoPatch::text(" ").validate().is_err());
        assert!(TodoPatch::completed(false).validate().is_ok());
    }

    #[test]
    fn todo_serializes_with_plain_string_id() {
        let todo = Todo {
            id: TodoId::from("X"),
            text: "buy milk".into(),
            completed: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "X", "text": "buy milk", "completed": false})
        );
    }

    #[test]
    fn patch_ignores_unknown_fields_and_allows_empty() {
        let patch: TodoPatch =
            serde_json::from_str(r#"{"completed": true, "color": "red"}"#).unwrap();
        assert_eq!(patch, TodoPatch::completed(true));
        let empty: TodoPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, TodoPatch::default());
    }
}

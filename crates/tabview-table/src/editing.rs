//! Inline row edit session
//!
//! At most one row is edited at a time. The session keeps a full backup of the row taken
//! when editing began plus a draft the user mutates; the canonical row is only written
//! on commit.

use tabview_core::{Row, RowId, Value};
use thiserror::Error;

use crate::config::EditingConfig;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("no row is being edited")]
    NotEditing,

    #[error("field '{0}' is not editable")]
    NotEditable(String),

    #[error("validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("failed to save row: {0}")]
    Save(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl EditError {
    /// Field that failed validation, if this is a validation error
    pub fn field(&self) -> Option<&str> {
        match self {
            EditError::Validation { field, .. } | EditError::NotEditable(field) => Some(field),
            _ => None,
        }
    }
}

/// Outcome of a `begin_edit` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginEdit {
    Started,
    /// Another row is already being edited; its session is untouched
    AlreadyEditing(RowId),
    /// Editing is absent or disabled in the configuration
    Disabled,
    NotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    row_id: RowId,
    backup: Row,
    draft: Row,
}

impl EditSession {
    pub fn new(row_id: RowId, row: &Row) -> Self {
        Self {
            row_id,
            backup: row.clone(),
            draft: row.clone(),
        }
    }

    pub fn row_id(&self) -> RowId {
        self.row_id
    }

    /// The row as it was when editing began
    pub fn backup(&self) -> &Row {
        &self.backup
    }

    /// In-progress values
    pub fn draft(&self) -> &Row {
        &self.draft
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.draft.set(field, value);
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.backup
    }

    /// Fields whose draft value differs from the backup
    pub fn changed_fields(&self) -> Vec<&str> {
        self.draft
            .iter()
            .filter(|(field, value)| self.backup.get(field) != Some(*value))
            .map(|(field, _)| field)
            .collect()
    }
}

/// Check every edit column in order, stopping at the first failure
pub fn validate_draft(config: &EditingConfig, draft: &Row) -> Result<(), EditError> {
    for column in &config.columns {
        let value = draft.value(&column.field);
        if column.required && value.is_blank() {
            return Err(EditError::Validation {
                field: column.field.clone(),
                message: format!("{} is required", column.field),
            });
        }
        if let Some(validator) = &column.validator {
            validator(value, draft).map_err(|message| EditError::Validation {
                field: column.field.clone(),
                message,
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditColumn;

    fn editing() -> EditingConfig {
        EditingConfig {
            enabled: true,
            columns: vec![
                EditColumn::new("name").required(),
                EditColumn::new("port").validator(|value, _| match value.as_i64() {
                    Some(port) if (1..=65535).contains(&port) => Ok(()),
                    _ => Err("port must be between 1 and 65535".to_string()),
                }),
            ],
            on_save: None,
            on_cancel: None,
        }
    }

    #[test]
    fn test_required_field_fails_first() {
        let draft = Row::new().with("name", "").with("port", 0);
        let err = validate_draft(&editing(), &draft).unwrap_err();
        assert_eq!(err.field(), Some("name"));
        assert_eq!(err.to_string(), "validation failed for 'name': name is required");
    }

    #[test]
    fn test_custom_validator_message() {
        let draft = Row::new().with("name", "edge-1").with("port", 70000);
        match validate_draft(&editing(), &draft) {
            Err(EditError::Validation { field, message }) => {
                assert_eq!(field, "port");
                assert_eq!(message, "port must be between 1 and 65535");
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let ok = Row::new().with("name", "edge-1").with("port", 443);
        assert!(validate_draft(&editing(), &ok).is_ok());
    }

    #[test]
    fn test_session_tracks_changes_against_backup() {
        let row = Row::new().with("name", "edge-1").with("port", 443);
        let mut session = EditSession::new(RowId(3), &row);
        assert!(!session.is_dirty());

        session.set("port", 8443);
        assert!(session.is_dirty());
        assert_eq!(session.changed_fields(), vec!["port"]);
        assert_eq!(session.backup(), &row);
        assert_eq!(session.row_id(), RowId(3));
    }
}

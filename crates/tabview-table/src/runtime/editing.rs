use tabview_core::Value;

use super::*;
use crate::editing::{BeginEdit, EditError, validate_draft};

impl TableRuntime {
    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn is_editing(&self, id: RowId) -> bool {
        self.edit.as_ref().is_some_and(|session| session.row_id() == id)
    }

    /// Open an edit session on a row
    ///
    /// A second `begin_edit` while a session is open is refused and leaves the open
    /// session (and its backup) untouched.
    pub fn begin_edit(&mut self, id: RowId) -> BeginEdit {
        if self.config.active_editing().is_none() {
            return BeginEdit::Disabled;
        }
        if let Some(session) = &self.edit {
            tracing::debug!(open = %session.row_id(), requested = %id, "edit already in progress");
            return BeginEdit::AlreadyEditing(session.row_id());
        }
        let Some(row) = self.row(id) else {
            return BeginEdit::NotFound;
        };

        self.edit = Some(EditSession::new(id, row));
        self.emit(TableEvent::EditStarted { row_id: id });
        BeginEdit::Started
    }

    /// Change one field of the draft; only configured edit columns are accepted
    pub fn update_edit_field(
        &mut self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<(), EditError> {
        let editable = self
            .config
            .active_editing()
            .is_some_and(|editing| editing.column(field).is_some());
        let session = self.edit.as_mut().ok_or(EditError::NotEditing)?;
        if !editable {
            return Err(EditError::NotEditable(field.to_string()));
        }
        session.set(field, value);
        Ok(())
    }

    /// Validate and write the draft back into the canonical row
    ///
    /// Validation or save failures keep the session open with its draft intact. A failed
    /// save restores the canonical row to its pre-edit values.
    pub fn commit_edit(&mut self) -> Result<RowId, EditError> {
        let editing = self.config.active_editing().ok_or(EditError::NotEditing)?;
        let session = self.edit.as_ref().ok_or(EditError::NotEditing)?;
        let row_id = session.row_id();

        validate_draft(editing, session.draft())?;

        let Some(row_index) = self.row_index(row_id) else {
            tracing::debug!(row = %row_id, "edited row no longer exists");
            self.edit = None;
            return Err(EditError::NotEditing);
        };

        let draft = session.draft().clone();
        let backup = session.backup().clone();
        let on_save = editing.on_save.clone();

        self.rows[row_index] = draft.clone();
        if let Some(save) = on_save {
            if let Err(e) = save(&draft, &backup) {
                tracing::warn!(row = %row_id, error = %format!("{:#}", e), "saving edited row failed");
                self.rows[row_index] = backup;
                return Err(EditError::Save(e.into()));
            }
        }

        self.edit = None;
        self.refresh_view();
        self.emit(TableEvent::EditSaved {
            row_id,
            row: draft,
            row_index,
        });
        Ok(row_id)
    }

    /// Drop the draft and restore the row's pre-edit values
    pub fn cancel_edit(&mut self) -> Result<RowId, EditError> {
        let session = self.edit.take().ok_or(EditError::NotEditing)?;
        let row_id = session.row_id();

        if let Some(row_index) = self.row_index(row_id) {
            self.rows[row_index] = session.backup().clone();
        }
        if let Some(cancel) = self.config.editing.as_ref().and_then(|e| e.on_cancel.clone()) {
            cancel(session.backup());
        }

        self.emit(TableEvent::EditCancelled { row_id });
        Ok(row_id)
    }
}

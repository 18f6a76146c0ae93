use anyhow::Result;

use super::*;
use crate::actions::{
    ActionOutcome, Availability, BulkAction, HeaderAction, RowAction, RowActionSlots,
    row_action_slots,
};

impl TableRuntime {
    /// Row actions visible for a row, split into inline buttons and overflow
    pub fn row_actions_for(&self, id: RowId) -> Option<RowActionSlots> {
        let row = self.row(id)?;
        Some(row_action_slots(
            &self.config.actions.row,
            row,
            &self.roles,
            self.config.actions.max_visible_actions,
        ))
    }

    /// Header actions the current viewer may see
    pub fn header_actions(&self) -> Vec<&HeaderAction> {
        self.config
            .actions
            .header
            .iter()
            .filter(|action| action.allowed_for(&self.roles))
            .collect()
    }

    /// Bulk actions the current viewer may see, with their availability for the selection
    pub fn bulk_actions(&self) -> Vec<(&BulkAction, Availability)> {
        let selected: Vec<Row> = self.selected_rows().into_iter().cloned().collect();
        self.config
            .actions
            .bulk
            .iter()
            .map(|action| (action, action.availability_for_selection(&selected, &self.roles)))
            .filter(|(_, availability)| *availability != Availability::Hidden)
            .collect()
    }

    /// Invoke a row action after re-checking its visibility, disablement and confirmation
    ///
    /// Handler errors are returned unchanged and no event is queued for them.
    pub fn invoke_row_action(&mut self, action_id: &str, id: RowId) -> Result<ActionOutcome> {
        let Some(action) = self.find_row_action(action_id) else {
            return Ok(ActionOutcome::NotFound);
        };
        let Some(row_index) = self.row_index(id) else {
            return Ok(ActionOutcome::NotFound);
        };
        let row = self.rows[row_index].clone();

        match action.availability_for_row(&row, &self.roles) {
            Availability::Available => {}
            other => {
                tracing::debug!(action = %action_id, row = %id, outcome = ?other, "row action refused");
                return Ok(other.into());
            }
        }
        if !self.confirmed(action.confirm.as_deref()) {
            return Ok(ActionOutcome::Cancelled);
        }

        (action.handler)(&row)?;
        self.emit(TableEvent::RowAction {
            action: action.id,
            row_id: id,
            row,
            row_index,
        });
        Ok(ActionOutcome::Invoked)
    }

    /// Invoke a bulk action over the rows of the current selection
    pub fn invoke_bulk_action(&mut self, action_id: &str) -> Result<ActionOutcome> {
        let Some(action) = self.find_bulk_action(action_id) else {
            return Ok(ActionOutcome::NotFound);
        };
        let selected: Vec<RowId> = self
            .selection
            .ids()
            .filter(|id| self.row_index(*id).is_some())
            .collect();
        let rows: Vec<Row> = selected
            .iter()
            .filter_map(|id| self.row(*id).cloned())
            .collect();

        match action.availability_for_selection(&rows, &self.roles) {
            Availability::Available => {}
            other => {
                tracing::debug!(action = %action_id, outcome = ?other, "bulk action refused");
                return Ok(other.into());
            }
        }
        if !self.confirmed(action.confirm.as_deref()) {
            return Ok(ActionOutcome::Cancelled);
        }

        (action.handler)(rows.as_slice())?;
        self.emit(TableEvent::BulkAction {
            action: action.id,
            selected,
            rows,
        });
        Ok(ActionOutcome::Invoked)
    }

    pub fn invoke_header_action(&mut self, action_id: &str) -> Result<ActionOutcome> {
        let Some(action) = self
            .config
            .actions
            .header
            .iter()
            .find(|action| action.id == action_id)
            .cloned()
        else {
            return Ok(ActionOutcome::NotFound);
        };
        if !action.allowed_for(&self.roles) {
            return Ok(ActionOutcome::Hidden);
        }
        if !self.confirmed(action.confirm.as_deref()) {
            return Ok(ActionOutcome::Cancelled);
        }

        (action.handler)()?;
        self.emit(TableEvent::HeaderAction { action: action.id });
        Ok(ActionOutcome::Invoked)
    }

    fn find_row_action(&self, action_id: &str) -> Option<RowAction> {
        self.config
            .actions
            .row
            .iter()
            .find(|action| action.id == action_id)
            .cloned()
    }

    fn find_bulk_action(&self, action_id: &str) -> Option<BulkAction> {
        self.config
            .actions
            .bulk
            .iter()
            .find(|action| action.id == action_id)
            .cloned()
    }

    fn confirmed(&self, message: Option<&str>) -> bool {
        match message {
            Some(message) => {
                let accepted = self.confirm.confirm(message);
                if !accepted {
                    tracing::debug!(prompt = %message, "action cancelled at confirmation");
                }
                accepted
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::ColumnDescriptor;

    fn config(log: Arc<Mutex<Vec<String>>>) -> TableConfig {
        let mut config = TableConfig::new(
            "devices",
            vec![
                ColumnDescriptor::new("name", "Name"),
                ColumnDescriptor::new("locked", "Locked"),
            ],
        );
        config.selection.enabled = true;

        let row_log = log.clone();
        let bulk_log = log.clone();
        config.actions.row = vec![
            RowAction::row("reboot", "Reboot", move |row| {
                row_log
                    .lock()
                    .unwrap()
                    .push(format!("reboot {}", row.value("name")));
                Ok(())
            })
            .disabled_when(|row| row.value("locked").as_bool() == Some(true)),
            RowAction::row("purge", "Purge", |_| Ok(()))
                .roles(["admin"])
                .confirm("Purge device?"),
            RowAction::row("fail", "Fail", |_| anyhow::bail!("device unreachable")),
        ];
        config.actions.bulk = vec![BulkAction::bulk("export", "Export", move |rows| {
            bulk_log.lock().unwrap().push(format!("export {}", rows.len()));
            Ok(())
        })];
        config.actions.header = vec![HeaderAction::header("add", "Add", || Ok(())).roles(["admin"])];
        config
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with("name", "edge-1").with("locked", false),
            Row::new().with("name", "edge-2").with("locked", true),
        ]
    }

    #[test]
    fn test_row_action_invoked_and_event_queued() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut runtime = TableRuntime::new(config(log.clone())).with_rows(rows());
        let id = runtime.row_id_at(0).unwrap();

        let outcome = runtime.invoke_row_action("reboot", id).unwrap();
        assert_eq!(outcome, ActionOutcome::Invoked);
        assert_eq!(*log.lock().unwrap(), vec!["reboot edge-1".to_string()]);
        assert!(matches!(
            runtime.drain_events().as_slice(),
            [TableEvent::RowAction { row_index: 0, .. }]
        ));
    }

    #[test]
    fn test_disabled_and_hidden_actions_are_not_invocable() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut runtime = TableRuntime::new(config(log.clone())).with_rows(rows());
        let locked = runtime.row_id_at(1).unwrap();

        assert_eq!(
            runtime.invoke_row_action("reboot", locked).unwrap(),
            ActionOutcome::Disabled
        );
        assert_eq!(
            runtime.invoke_row_action("purge", locked).unwrap(),
            ActionOutcome::Hidden
        );
        assert_eq!(
            runtime.invoke_row_action("missing", locked).unwrap(),
            ActionOutcome::NotFound
        );
        assert_eq!(
            runtime.invoke_header_action("add").unwrap(),
            ActionOutcome::Hidden
        );
        assert!(log.lock().unwrap().is_empty());
        assert!(runtime.drain_events().is_empty());
    }

    #[test]
    fn test_confirmation_can_cancel() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut runtime = TableRuntime::new(config(log))
            .with_rows(rows())
            .with_roles(["admin"])
            .with_confirm_prompt(|_: &str| false);
        let id = runtime.row_id_at(0).unwrap();

        assert_eq!(
            runtime.invoke_row_action("purge", id).unwrap(),
            ActionOutcome::Cancelled
        );
        assert!(runtime.drain_events().is_empty());
    }

    #[test]
    fn test_handler_errors_propagate() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut runtime = TableRuntime::new(config(log)).with_rows(rows());
        let id = runtime.row_id_at(0).unwrap();

        let err = runtime.invoke_row_action("fail", id).unwrap_err();
        assert_eq!(err.to_string(), "device unreachable");
        assert!(runtime.drain_events().is_empty());
    }

    #[test]
    fn test_bulk_action_needs_selection() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut runtime = TableRuntime::new(config(log.clone())).with_rows(rows());

        assert_eq!(
            runtime.invoke_bulk_action("export").unwrap(),
            ActionOutcome::Disabled
        );

        runtime.select_all();
        runtime.drain_events();
        assert_eq!(
            runtime.invoke_bulk_action("export").unwrap(),
            ActionOutcome::Invoked
        );
        assert_eq!(*log.lock().unwrap(), vec!["export 2".to_string()]);
        assert!(matches!(
            runtime.drain_events().as_slice(),
            [TableEvent::BulkAction { selected, .. }] if selected.len() == 2
        ));
    }

    #[test]
    fn test_row_actions_for_splits_overflow() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut config = config(log);
        config.actions.max_visible_actions = 1;
        let runtime = TableRuntime::new(config).with_rows(rows()).with_roles(["admin"]);
        let slots = runtime.row_actions_for(runtime.row_id_at(1).unwrap()).unwrap();

        assert_eq!(slots.inline, vec![("reboot".to_string(), false)]);
        assert_eq!(
            slots.overflow,
            vec![("purge".to_string(), true), ("fail".to_string(), true)]
        );
        assert_eq!(runtime.header_actions().len(), 1);
    }
}

//! Row, bulk and header action descriptors
//!
//! Actions are data: a label, optional predicates, an optional confirmation prompt and a
//! host-owned handler. Availability is evaluated on demand, so a hidden or disabled action
//! cannot be invoked even when its id is triggered programmatically.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tabview_core::Row;

use crate::config::roles_allow;

/// Predicate over a single row
pub type RowPredicate = Arc<dyn Fn(&Row) -> bool + Send + Sync>;
/// Handler of a row action
pub type RowHandler = Arc<dyn Fn(&Row) -> anyhow::Result<()> + Send + Sync>;
/// Handler of a bulk action, called with the selected rows
pub type BulkHandler = Arc<dyn Fn(&[Row]) -> anyhow::Result<()> + Send + Sync>;
/// Handler of a header action
pub type HeaderHandler = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

pub type RowAction = ActionDescriptor<RowHandler>;
pub type BulkAction = ActionDescriptor<BulkHandler>;
pub type HeaderAction = ActionDescriptor<HeaderHandler>;

/// An invocable command attached to the table
#[derive(Clone)]
pub struct ActionDescriptor<H> {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
    /// Roles allowed to see the action; empty means everyone
    pub roles: Vec<String>,
    /// Row-state visibility (row actions only)
    pub visible_when: Option<RowPredicate>,
    /// Row-state disablement; for bulk actions, any matching selected row disables it
    pub disabled_when: Option<RowPredicate>,
    /// Message shown by the confirmation prompt before invoking
    pub confirm: Option<String>,
    pub handler: H,
}

impl<H> ActionDescriptor<H> {
    fn with_handler(id: impl Into<String>, label: impl Into<String>, handler: H) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            roles: Vec::new(),
            visible_when: None,
            disabled_when: None,
            confirm: None,
            handler,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn visible_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.visible_when = Some(Arc::new(predicate));
        self
    }

    pub fn disabled_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.disabled_when = Some(Arc::new(predicate));
        self
    }

    pub fn confirm(mut self, message: impl Into<String>) -> Self {
        self.confirm = Some(message.into());
        self
    }

    pub fn allowed_for(&self, roles: &[String]) -> bool {
        roles_allow(&self.roles, roles)
    }

    /// Availability against a single row
    pub fn availability_for_row(&self, row: &Row, roles: &[String]) -> Availability {
        if !self.allowed_for(roles) {
            return Availability::Hidden;
        }
        if self.visible_when.as_ref().is_some_and(|visible| !visible(row)) {
            return Availability::Hidden;
        }
        if self.disabled_when.as_ref().is_some_and(|disabled| disabled(row)) {
            return Availability::Disabled;
        }
        Availability::Available
    }

    /// Availability against a selection; an empty selection disables the action
    pub fn availability_for_selection(&self, rows: &[Row], roles: &[String]) -> Availability {
        if !self.allowed_for(roles) {
            return Availability::Hidden;
        }
        if rows.is_empty() {
            return Availability::Disabled;
        }
        if let Some(disabled) = &self.disabled_when {
            if rows.iter().any(|row| disabled(row)) {
                return Availability::Disabled;
            }
        }
        Availability::Available
    }
}

impl RowAction {
    pub fn row<F>(id: impl Into<String>, label: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Row) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::with_handler(id, label, Arc::new(handler) as RowHandler)
    }
}

impl BulkAction {
    pub fn bulk<F>(id: impl Into<String>, label: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Row]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::with_handler(id, label, Arc::new(handler) as BulkHandler)
    }
}

impl HeaderAction {
    pub fn header<F>(id: impl Into<String>, label: impl Into<String>, handler: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::with_handler(id, label, Arc::new(handler) as HeaderHandler)
    }
}

impl<H> fmt::Debug for ActionDescriptor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("roles", &self.roles)
            .field("confirm", &self.confirm)
            .finish_non_exhaustive()
    }
}

/// Whether an action may currently be invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Hidden,
    Disabled,
}

/// Result of an invocation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Handler ran and the event was queued
    Invoked,
    /// Confirmation prompt declined
    Cancelled,
    /// Not visible for the row or the viewer's roles
    Hidden,
    Disabled,
    /// No action with that id, or the row does not resolve
    NotFound,
}

impl From<Availability> for ActionOutcome {
    fn from(availability: Availability) -> Self {
        match availability {
            Availability::Available => ActionOutcome::Invoked,
            Availability::Hidden => ActionOutcome::Hidden,
            Availability::Disabled => ActionOutcome::Disabled,
        }
    }
}

/// Synchronous confirmation port used before invoking actions that carry a prompt
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// Accepts every prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl ConfirmPrompt for AutoConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

impl<F> ConfirmPrompt for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// All action lists of a table
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    #[serde(skip)]
    pub row: Vec<RowAction>,
    #[serde(skip)]
    pub header: Vec<HeaderAction>,
    #[serde(skip)]
    pub bulk: Vec<BulkAction>,
    /// Row actions shown inline; the rest go to the overflow menu
    pub max_visible_actions: usize,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            row: Vec::new(),
            header: Vec::new(),
            bulk: Vec::new(),
            max_visible_actions: 3,
        }
    }
}

impl fmt::Debug for ActionsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionsConfig")
            .field("row", &self.row)
            .field("header", &self.header)
            .field("bulk", &self.bulk)
            .field("max_visible_actions", &self.max_visible_actions)
            .finish()
    }
}

/// Row actions visible for one row, split for rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowActionSlots {
    /// `(action id, enabled)` rendered as buttons
    pub inline: Vec<(String, bool)>,
    /// `(action id, enabled)` rendered in the overflow menu
    pub overflow: Vec<(String, bool)>,
}

/// Split the visible row actions of `row` by `max_visible`
pub fn row_action_slots(
    actions: &[RowAction],
    row: &Row,
    roles: &[String],
    max_visible: usize,
) -> RowActionSlots {
    let visible: Vec<(String, bool)> = actions
        .iter()
        .filter_map(|action| match action.availability_for_row(row, roles) {
            Availability::Hidden => None,
            Availability::Available => Some((action.id.clone(), true)),
            Availability::Disabled => Some((action.id.clone(), false)),
        })
        .collect();

    let split = visible.len().min(max_visible);
    let mut inline = visible;
    let overflow = inline.split_off(split);
    RowActionSlots { inline, overflow }
}

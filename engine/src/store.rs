//! Store - the builder session state container.
//!
//! The Store holds the live field list and the registry of published forms.
//! Every change goes through a [`Mutation`]; transitions are applied
//! synchronously and atomically, one event at a time.

use crate::{
    drag::{self, DragEndEvent},
    new_id, Error, FieldDefinition, FieldPatch, FieldType, FormDefinition, FormId, FormSession,
    Mutation, SavedForms,
};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Result of dispatching a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    /// Whether the builder state differs from before the dispatch
    pub changed: bool,
    /// Id of the form created by a publish
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<FormId>,
}

impl DispatchOutcome {
    fn changed(changed: bool) -> Self {
        Self {
            changed,
            published: None,
        }
    }
}

/// The builder state: ordered fields plus saved forms.
///
/// Transition methods take the state by value and return the next state.
/// Targets that do not exist leave the state unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderState {
    fields: Vec<FieldDefinition>,
    saved_forms: SavedForms,
}

impl BuilderState {
    /// Create an empty builder state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Live fields in render order.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn saved_forms(&self) -> &SavedForms {
        &self.saved_forms
    }

    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id() == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id() == id)
    }

    /// Append a default field of `field_type`.
    pub fn add_field(mut self, field_type: FieldType) -> Self {
        self.push_field(field_type);
        self
    }

    /// Merge `patch` onto the field with `id`.
    pub fn update_field(mut self, id: &str, patch: &FieldPatch) -> Self {
        self.edit_field(id, |f| Ok(f.apply_update(patch)));
        self
    }

    /// Drop the field with `id`.
    pub fn remove_field(mut self, id: &str) -> Self {
        self.drop_field(id);
        self
    }

    /// Move `active_id` to the slot held by `over_id`, shifting the fields
    /// in between by one.
    pub fn reorder_fields(mut self, active_id: &str, over_id: &str) -> Self {
        self.move_field(active_id, over_id);
        self
    }

    /// Snapshot the current fields under a fresh form id.
    pub fn publish_form(mut self) -> (Self, FormId) {
        let id = self.snapshot_fields();
        (self, id)
    }

    /// Apply any mutation, returning the next state and what happened.
    pub fn apply(mut self, mutation: &Mutation) -> (Self, DispatchOutcome) {
        let outcome = self.apply_in_place(mutation);
        (self, outcome)
    }

    pub(crate) fn apply_in_place(&mut self, mutation: &Mutation) -> DispatchOutcome {
        match mutation {
            Mutation::AddField { field_type } => {
                self.push_field(*field_type);
                DispatchOutcome::changed(true)
            }
            Mutation::UpdateField { id, patch } => {
                DispatchOutcome::changed(self.edit_field(id, |f| Ok(f.apply_update(patch))))
            }
            Mutation::RemoveField { id } => DispatchOutcome::changed(self.drop_field(id)),
            Mutation::ReorderFields { active_id, over_id } => {
                DispatchOutcome::changed(self.move_field(active_id, over_id))
            }
            Mutation::PublishForm => DispatchOutcome {
                changed: true,
                published: Some(self.snapshot_fields()),
            },
            Mutation::AddOption { field_id } => {
                DispatchOutcome::changed(self.edit_field(field_id, |f| Ok(f.add_option())))
            }
            Mutation::UpdateOption {
                field_id,
                option_id,
                patch,
            } => DispatchOutcome::changed(
                self.edit_field(field_id, |f| f.update_option(option_id, patch)),
            ),
            Mutation::RemoveOption {
                field_id,
                option_id,
            } => DispatchOutcome::changed(
                self.edit_field(field_id, |f| f.remove_option(option_id)),
            ),
            Mutation::DuplicateOption {
                field_id,
                option_id,
            } => DispatchOutcome::changed(
                self.edit_field(field_id, |f| f.duplicate_option(option_id)),
            ),
        }
    }

    fn push_field(&mut self, field_type: FieldType) {
        let field = FieldDefinition::new(field_type);
        tracing::trace!(field_id = %field.id(), %field_type, "field added");
        self.fields.push(field);
    }

    /// Replace a field with an edited copy. Returns whether it changed.
    fn edit_field<F>(&mut self, id: &str, edit: F) -> bool
    where
        F: FnOnce(&FieldDefinition) -> Result<FieldDefinition>,
    {
        let Some(index) = self.position(id) else {
            tracing::debug!(field_id = id, "edit of unknown field ignored");
            return false;
        };
        match edit(&self.fields[index]) {
            Ok(next) if next != self.fields[index] => {
                self.fields[index] = next;
                true
            }
            Ok(_) => false,
            Err(e) => {
                tracing::debug!(field_id = id, error = %e, "field edit ignored");
                false
            }
        }
    }

    fn drop_field(&mut self, id: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.id() != id);
        self.fields.len() != before
    }

    fn move_field(&mut self, active_id: &str, over_id: &str) -> bool {
        if active_id == over_id {
            return false;
        }
        let (Some(from), Some(to)) = (self.position(active_id), self.position(over_id)) else {
            return false;
        };
        let field = self.fields.remove(from);
        self.fields.insert(to, field);
        true
    }

    fn snapshot_fields(&mut self) -> FormId {
        let snapshot = FormDefinition::new(self.fields.clone());
        loop {
            let id = new_id();
            if self.saved_forms.insert(id.clone(), snapshot.clone()).is_ok() {
                tracing::debug!(form_id = %id, fields = snapshot.len(), "form published");
                return id;
            }
        }
    }
}

/// A builder session: the explicitly passed handle the interaction layer
/// dispatches into.
#[derive(Debug, Clone, Default)]
pub struct Store {
    state: BuilderState,
}

impl Store {
    /// Create a store with an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a session from an existing state.
    pub fn from_state(state: BuilderState) -> Self {
        Self { state }
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        self.state.fields()
    }

    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.state.field(id)
    }

    pub fn saved_forms(&self) -> &SavedForms {
        self.state.saved_forms()
    }

    /// A published form by id.
    pub fn published(&self, form_id: &str) -> Option<&FormDefinition> {
        self.state.saved_forms().get(form_id)
    }

    /// Apply a mutation to the session.
    pub fn dispatch(&mut self, mutation: Mutation) -> DispatchOutcome {
        let outcome = self.state.apply_in_place(&mutation);
        tracing::debug!(
            mutation = mutation.kind(),
            changed = outcome.changed,
            fields = self.state.fields.len(),
            "mutation dispatched"
        );
        outcome
    }

    /// Classify a finished drag gesture and dispatch the resulting mutation.
    ///
    /// Returns `None` when the gesture is a no-op; the state is then left
    /// exactly as it was.
    pub fn handle_drag_end(&mut self, event: &DragEndEvent) -> Option<DispatchOutcome> {
        match drag::resolve_event(event) {
            Some(mutation) => Some(self.dispatch(mutation)),
            None => {
                tracing::trace!("drag ended without a mutation");
                None
            }
        }
    }

    /// Snapshot the current fields, returning the new form id.
    pub fn publish(&mut self) -> FormId {
        self.state.snapshot_fields()
    }

    /// Start filling a published form.
    pub fn open_form(&self, form_id: &str) -> Result<FormSession> {
        let form = self
            .published(form_id)
            .ok_or_else(|| Error::FormNotFound(form_id.to_string()))?;
        Ok(FormSession::new(form_id, form.clone()))
    }

    /// Clear the builder list. Published forms are kept.
    pub fn reset(&mut self) {
        self.state.fields.clear();
    }

    /// Give up the session, returning its final state.
    pub fn into_state(self) -> BuilderState {
        self.state
    }
}

//! # Formwright Engine
//!
//! The form definition model, builder state machine and validation engine
//! behind the Formwright visual form builder.
//!
//! Users assemble a form by dragging field types onto a canvas, reordering
//! and configuring them, then publish it. Fillers complete the published form
//! and submit it for validation and storage.
//!
//! ## Design Principles
//!
//! - **No IO**: rendering, drag gestures and storage live outside the engine
//! - **Explicit state**: a [`Store`] handle is passed around, no globals
//! - **Closed mutations**: every change is a [`Mutation`] value
//! - **Structural invariants**: a field's type-specific attributes are a
//!   tagged union, so a `select` always has options and a `text` never does
//!
//! ## Core Concepts
//!
//! ### Fields
//!
//! A [`FieldDefinition`] is one configurable control: `text`, `textarea`,
//! `select`, `radio` or `checkbox`, created with type-specific defaults and
//! edited through [`FieldPatch`] merges.
//!
//! ### Builder
//!
//! The [`Store`] holds the ordered field list and the [`SavedForms`]
//! registry. Mutations:
//! - [`Mutation::AddField`] - append a default field
//! - [`Mutation::UpdateField`] - merge a patch onto a field
//! - [`Mutation::RemoveField`] - drop a field
//! - [`Mutation::ReorderFields`] - move a field to another field's slot
//! - [`Mutation::PublishForm`] - snapshot the fields under a fresh id
//!
//! ### Drag resolution
//!
//! [`drag::resolve`] turns "item X released over target Y" into an add, a
//! reorder, or nothing.
//!
//! ### Validation and submission
//!
//! [`validate`] checks submitted values against a field list. A
//! [`FormSession`] runs it before handing values to a
//! [`SubmissionEndpoint`].
//!
//! ## Quick Start
//!
//! ```rust
//! use formwright_engine::{
//!     DragEndEvent, DragSource, DropTarget, FieldPatch, FieldType, InputType, Mutation, Store,
//! };
//!
//! let mut store = Store::new();
//!
//! // 1. Drop a text field from the palette onto the canvas
//! let event = DragEndEvent::new(
//!     DragSource::Palette { field_type: FieldType::Text },
//!     Some(DropTarget::Canvas),
//! );
//! store.handle_drag_end(&event);
//!
//! // 2. Configure it
//! let id = store.fields()[0].id().clone();
//! store.dispatch(Mutation::update_field(
//!     id.clone(),
//!     FieldPatch::new().label("Email").required(true).input_type(InputType::Email),
//! ));
//!
//! // 3. Publish and fill it in
//! let form_id = store.dispatch(Mutation::PublishForm).published.unwrap();
//! let mut session = store.open_form(&form_id).unwrap();
//! session.set_value(id.clone(), "not-an-email");
//! let errors = session.validate();
//! assert_eq!(errors.get(&id), Some("Please enter a valid email address"));
//! ```
//!
//! ## FFI
//!
//! The [`ffi`] module exposes the builder and the validator to the rendering
//! layer through C-compatible functions. All data is exchanged as JSON
//! strings.

pub mod drag;
pub mod error;
pub mod ffi;
pub mod field;
pub mod operation;
pub mod snapshot;
pub mod store;
pub mod submission;
pub mod validate;

// Re-export main types at crate root
pub use drag::{DragEndEvent, DragItemData, DragSource, DropTarget, RawDragEnd, SourceKind};
pub use error::Error;
pub use field::{
    CheckboxKind, CheckboxMode, FieldDefinition, FieldKind, FieldOption, FieldPatch, FieldType,
    InputType, OptionPatch, PlaceholderRole,
};
pub use operation::Mutation;
pub use snapshot::{FormDefinition, SavedForms};
pub use store::{BuilderState, DispatchOutcome, Store};
pub use submission::{
    FormSession, SubmissionEndpoint, SubmissionPayload, SubmissionReceipt, SubmitOutcome,
    SubmitResponse,
};
pub use validate::{validate, FieldValue, FormValues, ValidationErrors};

/// Type aliases for clarity
pub type FieldId = String;
pub type OptionId = String;
pub type FormId = String;

/// Generate a fresh opaque identifier.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

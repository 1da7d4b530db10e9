//! Drag-interaction resolver.
//!
//! The gesture layer reports which item was released and over which target.
//! Two gestures look alike at that level: dragging a palette entry onto the
//! canvas (insert a new field) and dragging a canvas item onto another one
//! (reorder). [`resolve`] tells them apart:
//!
//! 1. No drop target: nothing happens.
//! 2. Palette item over the canvas container: add a field of its type.
//! 3. Canvas item over a different canvas item: reorder.
//! 4. Anything else: nothing happens.

use crate::{FieldId, FieldType, Mutation};
use serde::{Deserialize, Serialize};

/// Droppable id of the canvas container.
pub const CANVAS_DROP_ID: &str = "canvas";

/// Where a drag started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sourceKind", rename_all = "kebab-case")]
pub enum DragSource {
    /// A palette entry carrying a field type to insert.
    Palette {
        #[serde(rename = "fieldType")]
        field_type: FieldType,
    },
    /// An existing field on the canvas.
    CanvasItem {
        #[serde(rename = "fieldId")]
        field_id: FieldId,
    },
}

/// What a drag was released over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DropTarget {
    /// The canvas container itself.
    Canvas,
    /// An existing field on the canvas.
    Field(FieldId),
}

impl DropTarget {
    /// Map a droppable id to a target. The canvas id always means the
    /// container, never a field.
    pub fn from_id(id: &str) -> Self {
        DropTarget::from(id.to_string())
    }

    pub fn id(&self) -> &str {
        match self {
            DropTarget::Canvas => CANVAS_DROP_ID,
            DropTarget::Field(id) => id,
        }
    }
}

impl From<String> for DropTarget {
    fn from(id: String) -> Self {
        if id == CANVAS_DROP_ID {
            DropTarget::Canvas
        } else {
            DropTarget::Field(id)
        }
    }
}

impl From<DropTarget> for String {
    fn from(target: DropTarget) -> Self {
        match target {
            DropTarget::Canvas => CANVAS_DROP_ID.to_string(),
            DropTarget::Field(id) => id,
        }
    }
}

/// A finished drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEndEvent {
    pub active: DragSource,
    #[serde(default)]
    pub over: Option<DropTarget>,
}

impl DragEndEvent {
    pub fn new(active: DragSource, over: Option<DropTarget>) -> Self {
        Self { active, over }
    }
}

/// Kind of a drag source as reported by the gesture layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Palette,
    CanvasItem,
}

/// Untyped metadata attached to a draggable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragItemData {
    pub source_kind: SourceKind,
    #[serde(default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub field_id: Option<FieldId>,
}

impl DragItemData {
    /// Decode into a typed source. Incomplete metadata yields `None`.
    pub fn source(&self) -> Option<DragSource> {
        match self.source_kind {
            SourceKind::Palette => {
                let name = self.field_type.as_deref()?;
                match name.parse() {
                    Ok(field_type) => Some(DragSource::Palette { field_type }),
                    Err(e) => {
                        tracing::debug!(error = %e, "palette item with unusable type");
                        None
                    }
                }
            }
            SourceKind::CanvasItem => self
                .field_id
                .clone()
                .map(|field_id| DragSource::CanvasItem { field_id }),
        }
    }
}

/// A drag gesture exactly as the gesture layer reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDragEnd {
    pub active: DragItemData,
    #[serde(default)]
    pub over: Option<String>,
}

impl RawDragEnd {
    /// Decode into a typed event; `None` when the active item is unusable.
    pub fn into_event(self) -> Option<DragEndEvent> {
        let active = self.active.source()?;
        Some(DragEndEvent::new(
            active,
            self.over.map(DropTarget::from),
        ))
    }
}

/// Classify a drag gesture into at most one mutation.
pub fn resolve(active: &DragSource, over: Option<&DropTarget>) -> Option<Mutation> {
    let over = over?;
    match (active, over) {
        (DragSource::Palette { field_type }, DropTarget::Canvas) => {
            Some(Mutation::add_field(*field_type))
        }
        (DragSource::CanvasItem { field_id }, DropTarget::Field(over_id)) if field_id != over_id => {
            Some(Mutation::reorder_fields(field_id.clone(), over_id.clone()))
        }
        _ => None,
    }
}

/// [`resolve`] for a whole event.
pub fn resolve_event(event: &DragEndEvent) -> Option<Mutation> {
    resolve(&event.active, event.over.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn palette(field_type: FieldType) -> DragSource {
        DragSource::Palette { field_type }
    }

    fn item(id: &str) -> DragSource {
        DragSource::CanvasItem {
            field_id: id.to_string(),
        }
    }

    #[test]
    fn no_target_is_noop() {
        assert_eq!(resolve(&palette(FieldType::Text), None), None);
        assert_eq!(resolve(&item("f1"), None), None);
    }

    #[test]
    fn palette_over_canvas_adds() {
        let mutation = resolve(&palette(FieldType::Select), Some(&DropTarget::Canvas));
        assert_eq!(mutation, Some(Mutation::add_field(FieldType::Select)));
    }

    #[test]
    fn palette_over_field_is_noop() {
        let over = DropTarget::Field("f1".into());
        assert_eq!(resolve(&palette(FieldType::Radio), Some(&over)), None);
    }

    #[test]
    fn item_over_other_item_reorders() {
        let over = DropTarget::Field("f2".into());
        assert_eq!(
            resolve(&item("f1"), Some(&over)),
            Some(Mutation::reorder_fields("f1", "f2"))
        );
    }

    #[test]
    fn self_drop_is_noop() {
        let over = DropTarget::Field("f1".into());
        assert_eq!(resolve(&item("f1"), Some(&over)), None);
    }

    #[test]
    fn item_over_canvas_is_noop() {
        assert_eq!(resolve(&item("f1"), Some(&DropTarget::Canvas)), None);
    }

    #[test]
    fn drop_target_ids() {
        assert_eq!(DropTarget::from_id("canvas"), DropTarget::Canvas);
        assert_eq!(DropTarget::from_id("f9"), DropTarget::Field("f9".into()));
        assert_eq!(DropTarget::Canvas.id(), "canvas");
    }

    #[test]
    fn canvas_id_always_means_container() {
        let over: DropTarget = serde_json::from_value(json!("canvas")).unwrap();
        assert_eq!(over, DropTarget::from_id("canvas"));
        assert_eq!(over, DropTarget::Canvas);
        assert_eq!(resolve(&item("f1"), Some(&over)), None);
    }

    #[test]
    fn raw_event_decoding() {
        let raw: RawDragEnd = serde_json::from_value(json!({
            "active": {"sourceKind": "palette", "fieldType": "checkbox"},
            "over": "canvas"
        }))
        .unwrap();
        let event = raw.into_event().unwrap();
        assert_eq!(
            resolve_event(&event),
            Some(Mutation::add_field(FieldType::Checkbox))
        );

        let raw: RawDragEnd = serde_json::from_value(json!({
            "active": {"sourceKind": "canvas-item", "fieldId": "f2"},
            "over": null
        }))
        .unwrap();
        let event = raw.into_event().unwrap();
        assert_eq!(event.over, None);
        assert_eq!(resolve_event(&event), None);
    }

    #[test]
    fn incomplete_metadata_has_no_source() {
        let missing_type = DragItemData {
            source_kind: SourceKind::Palette,
            field_type: None,
            field_id: None,
        };
        assert_eq!(missing_type.source(), None);

        let unknown_type = DragItemData {
            source_kind: SourceKind::Palette,
            field_type: Some("slider".into()),
            field_id: None,
        };
        assert_eq!(unknown_type.source(), None);

        let missing_id = DragItemData {
            source_kind: SourceKind::CanvasItem,
            field_type: Some("text".into()),
            field_id: None,
        };
        assert_eq!(missing_id.source(), None);
    }

    #[test]
    fn typed_event_wire_shape() {
        let event = DragEndEvent::new(item("f1"), Some(DropTarget::Field("f2".into())));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "active": {"sourceKind": "canvas-item", "fieldId": "f1"},
                "over": "f2"
            })
        );
    }
}

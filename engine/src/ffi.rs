//! FFI layer for the rendering layer.
//!
//! This module provides C-compatible functions so a UI written in another
//! language can drive the builder. All data crosses the boundary as JSON
//! strings.
//!
//! # Memory Management
//!
//! - Strings returned by `formwright_*` functions are allocated by Rust
//! - Caller must free them with `formwright_string_free`
//! - Store pointers must be freed with `formwright_builder_free`
//!
//! # Error Handling
//!
//! Functions return JSON with either:
//! - `{"ok": <result>}` on success
//! - `{"error": "<message>"}` on failure

use crate::{
    validate, BuilderState, Error, FieldDefinition, FormValues, Mutation, RawDragEnd, Store,
};
use std::ffi::{c_char, CStr, CString};
use std::ptr;

/// Result wrapper for FFI responses.
#[derive(serde::Serialize)]
#[serde(untagged)]
enum FfiResult<T: serde::Serialize> {
    Ok { ok: T },
    Err { error: String },
}

impl<T: serde::Serialize> FfiResult<T> {
    fn ok(value: T) -> Self {
        FfiResult::Ok { ok: value }
    }

    fn err(message: impl Into<String>) -> Self {
        FfiResult::Err {
            error: message.into(),
        }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"serialization failed: {}"}}"#, e))
    }
}

/// Convert a Rust string to a C string pointer.
/// Caller must free with `formwright_string_free`.
fn to_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => c"{\"error\":\"string contained null bytes\"}"
            .to_owned()
            .into_raw(),
    }
}

fn error_json(message: impl Into<String>) -> *mut c_char {
    to_c_string(FfiResult::<()>::err(message).to_json())
}

/// Convert a C string pointer to a Rust string.
/// Returns None if pointer is null or invalid UTF-8.
unsafe fn from_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Parse a JSON argument, naming it in the error.
unsafe fn parse_arg<T: serde::de::DeserializeOwned>(
    ptr: *const c_char,
    what: &str,
) -> Result<T, String> {
    let s = from_c_string(ptr).ok_or_else(|| format!("invalid {} JSON", what))?;
    serde_json::from_str(&s).map_err(|e| format!("invalid {} JSON: {}", what, e))
}

// ============================================================================
// Builder Lifecycle
// ============================================================================

/// Create a new builder session.
///
/// # Arguments
/// - `state_json`: JSON of a previously exported builder state, or null for
///   an empty builder
///
/// # Returns
/// Pointer to Store, or null if `state_json` is not a valid state.
///
/// # Safety
/// - `state_json` must be a valid null-terminated C string or null
/// - Caller must free the returned pointer with `formwright_builder_free`
#[no_mangle]
pub unsafe extern "C" fn formwright_builder_new(state_json: *const c_char) -> *mut Store {
    if state_json.is_null() {
        return Box::into_raw(Box::new(Store::new()));
    }

    let state: BuilderState = match parse_arg(state_json, "state") {
        Ok(s) => s,
        Err(_) => return ptr::null_mut(),
    };

    Box::into_raw(Box::new(Store::from_state(state)))
}

/// Free a builder session.
///
/// # Safety
/// - `store` must be a valid pointer from `formwright_builder_new`
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn formwright_builder_free(store: *mut Store) {
    if !store.is_null() {
        drop(Box::from_raw(store));
    }
}

/// Free a string allocated by the engine.
///
/// # Safety
/// - `s` must be a valid pointer from a `formwright_*` function
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn formwright_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

// ============================================================================
// Builder Operations
// ============================================================================

/// Current builder state.
///
/// # Returns
/// JSON string: `{"ok": {"fields": [...], "savedForms": {...}}}` or
/// `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `formwright_builder_new` or null
/// - Caller must free the returned string with `formwright_string_free`
#[no_mangle]
pub unsafe extern "C" fn formwright_builder_state(store: *const Store) -> *mut c_char {
    match store.as_ref() {
        Some(s) => to_c_string(FfiResult::ok(s.state()).to_json()),
        None => error_json("null store pointer"),
    }
}

/// Dispatch a mutation.
///
/// # Arguments
/// - `store`: Store pointer
/// - `mutation_json`: JSON string of Mutation
///
/// # Returns
/// JSON string: `{"ok": DispatchOutcome}` or `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `formwright_builder_new` or null
/// - `mutation_json` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `formwright_string_free`
#[no_mangle]
pub unsafe extern "C" fn formwright_builder_dispatch(
    store: *mut Store,
    mutation_json: *const c_char,
) -> *mut c_char {
    let store = match store.as_mut() {
        Some(s) => s,
        None => return error_json("null store pointer"),
    };

    let mutation_str = match from_c_string(mutation_json) {
        Some(s) => s,
        None => return error_json("invalid mutation JSON"),
    };

    let mutation: Mutation = match serde_json::from_str(&mutation_str) {
        Ok(m) => m,
        Err(e) => return error_json(Error::InvalidMutation(e.to_string()).to_string()),
    };

    to_c_string(FfiResult::ok(store.dispatch(mutation)).to_json())
}

/// Report a finished drag gesture.
///
/// # Arguments
/// - `event_json`: `{"active": {"sourceKind": ..., "fieldType"?: ...,
///   "fieldId"?: ...}, "over": "canvas" | "<field id>" | null}`
///
/// # Returns
/// JSON string: `{"ok": DispatchOutcome}` when a mutation was dispatched,
/// `{"ok": null}` for a no-op gesture, or `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `formwright_builder_new` or null
/// - `event_json` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `formwright_string_free`
#[no_mangle]
pub unsafe extern "C" fn formwright_builder_drag_end(
    store: *mut Store,
    event_json: *const c_char,
) -> *mut c_char {
    let store = match store.as_mut() {
        Some(s) => s,
        None => return error_json("null store pointer"),
    };

    let raw: RawDragEnd = match parse_arg(event_json, "drag event") {
        Ok(r) => r,
        Err(e) => return error_json(e),
    };

    let outcome = raw
        .into_event()
        .and_then(|event| store.handle_drag_end(&event));
    to_c_string(FfiResult::ok(outcome).to_json())
}

/// Get a published form by id.
///
/// # Returns
/// JSON string: `{"ok": [fields...]}` or `{"ok": null}` or
/// `{"error": "message"}`
///
/// # Safety
/// - `store` must be a valid pointer from `formwright_builder_new` or null
/// - `form_id` must be a valid null-terminated C string or null
/// - Caller must free the returned string with `formwright_string_free`
#[no_mangle]
pub unsafe extern "C" fn formwright_builder_saved_form(
    store: *const Store,
    form_id: *const c_char,
) -> *mut c_char {
    let store = match store.as_ref() {
        Some(s) => s,
        None => return error_json("null store pointer"),
    };

    let form_id = match from_c_string(form_id) {
        Some(s) => s,
        None => return error_json("invalid form id"),
    };

    to_c_string(FfiResult::ok(store.published(&form_id)).to_json())
}

// ============================================================================
// Validation
// ============================================================================

/// Validate values against a field list.
///
/// # Arguments
/// - `fields_json`: JSON array of fields
/// - `values_json`: JSON object of values by field id
///
/// # Returns
/// JSON string: `{"ok": {"<field id>": "<message>", ...}}` (empty object
/// when valid) or `{"error": "message"}`
///
/// # Safety
/// - `fields_json` and `values_json` must be valid null-terminated C strings
///   or null
/// - Caller must free the returned string with `formwright_string_free`
#[no_mangle]
pub unsafe extern "C" fn formwright_validate(
    fields_json: *const c_char,
    values_json: *const c_char,
) -> *mut c_char {
    let fields: Vec<FieldDefinition> = match parse_arg(fields_json, "fields") {
        Ok(f) => f,
        Err(e) => return error_json(e),
    };

    let values: FormValues = match parse_arg(values_json, "values") {
        Ok(v) => v,
        Err(e) => return error_json(e),
    };

    to_c_string(FfiResult::ok(validate(&fields, &values)).to_json())
}

// ============================================================================
// Utility
// ============================================================================

/// Get the engine version.
#[no_mangle]
pub extern "C" fn formwright_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take_json(s: *mut c_char) -> serde_json::Value {
        let json = CStr::from_ptr(s).to_str().unwrap().to_string();
        formwright_string_free(s);
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn ffi_builder_lifecycle() {
        unsafe {
            let store = formwright_builder_new(ptr::null());
            assert!(!store.is_null());

            let add = CString::new(r#"{"type": "ADD_FIELD", "fieldType": "text"}"#).unwrap();
            let result = take_json(formwright_builder_dispatch(store, add.as_ptr()));
            assert_eq!(result["ok"]["changed"], true);

            let state = take_json(formwright_builder_state(store));
            assert_eq!(state["ok"]["fields"][0]["type"], "text");
            assert_eq!(state["ok"]["fields"][0]["label"], "text field");

            let publish = CString::new(r#"{"type": "PUBLISH_FORM"}"#).unwrap();
            let result = take_json(formwright_builder_dispatch(store, publish.as_ptr()));
            let form_id = result["ok"]["published"].as_str().unwrap().to_string();

            let id = CString::new(form_id).unwrap();
            let form = take_json(formwright_builder_saved_form(store, id.as_ptr()));
            assert_eq!(form["ok"].as_array().unwrap().len(), 1);

            formwright_builder_free(store);
        }
    }

    #[test]
    fn ffi_drag_end() {
        unsafe {
            let store = formwright_builder_new(ptr::null());

            let drop = CString::new(
                r#"{"active": {"sourceKind": "palette", "fieldType": "radio"}, "over": "canvas"}"#,
            )
            .unwrap();
            let result = take_json(formwright_builder_drag_end(store, drop.as_ptr()));
            assert_eq!(result["ok"]["changed"], true);

            let cancelled = CString::new(
                r#"{"active": {"sourceKind": "palette", "fieldType": "radio"}, "over": null}"#,
            )
            .unwrap();
            let result = take_json(formwright_builder_drag_end(store, cancelled.as_ptr()));
            assert!(result["ok"].is_null());

            assert_eq!((*store).fields().len(), 1);
            formwright_builder_free(store);
        }
    }

    #[test]
    fn ffi_resume_from_state() {
        unsafe {
            let state = CString::new(
                r#"{
                    "fields": [
                        {"id": "f1", "type": "textarea", "label": "Bio", "required": false,
                         "placeholder": "", "rows": 5}
                    ],
                    "savedForms": {}
                }"#,
            )
            .unwrap();
            let store = formwright_builder_new(state.as_ptr());
            assert!(!store.is_null());
            assert_eq!((*store).field("f1").unwrap().rows(), Some(5));
            formwright_builder_free(store);

            let broken = CString::new("not json").unwrap();
            assert!(formwright_builder_new(broken.as_ptr()).is_null());

            let empty_options = CString::new(
                r#"{"fields": [{"id": "f1", "type": "select", "options": []}], "savedForms": {}}"#,
            )
            .unwrap();
            assert!(formwright_builder_new(empty_options.as_ptr()).is_null());
        }
    }

    #[test]
    fn ffi_validate() {
        unsafe {
            let fields = CString::new(
                r#"[{"id": "f1", "type": "text", "label": "Name", "required": true}]"#,
            )
            .unwrap();
            let empty = CString::new("{}").unwrap();
            let result = take_json(formwright_validate(fields.as_ptr(), empty.as_ptr()));
            assert_eq!(result["ok"]["f1"], "Name is required");

            let filled = CString::new(r#"{"f1": "Ada"}"#).unwrap();
            let result = take_json(formwright_validate(fields.as_ptr(), filled.as_ptr()));
            assert_eq!(result["ok"], serde_json::json!({}));
        }
    }

    #[test]
    fn ffi_version() {
        unsafe {
            let version = formwright_version();
            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert_eq!(version_str, env!("CARGO_PKG_VERSION"));
        }
    }

    #[test]
    fn ffi_error_handling() {
        unsafe {
            // Null store pointer
            let state = take_json(formwright_builder_state(ptr::null()));
            assert!(state.get("error").is_some());

            // Invalid JSON
            let store = formwright_builder_new(ptr::null());
            let invalid = CString::new("not valid json").unwrap();
            let result = take_json(formwright_builder_dispatch(store, invalid.as_ptr()));
            assert!(result["error"].as_str().unwrap().contains("mutation"));

            // Unknown field type
            let unknown = CString::new(r#"{"type": "ADD_FIELD", "fieldType": "slider"}"#).unwrap();
            let result = take_json(formwright_builder_dispatch(store, unknown.as_ptr()));
            assert!(result.get("error").is_some());
            assert!((*store).fields().is_empty());

            formwright_builder_free(store);
        }
    }
}

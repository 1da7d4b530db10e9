//! Published form snapshots and the registry that holds them.
//!
//! A [`FormDefinition`] is an owned copy of the builder's field list taken at
//! publish time. Later builder mutations never reach it. [`SavedForms`] is
//! append-only: an id, once used, keeps its snapshot for the whole session.
//! Uses BTreeMap for deterministic serialization order.

use crate::{error::Result, Error, FieldDefinition, FormId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An ordered, immutable sequence of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormDefinition {
    fields: Vec<FieldDefinition>,
}

impl FormDefinition {
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        Self { fields }
    }

    /// Fields in render/tab order.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id() == id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<FieldDefinition>> for FormDefinition {
    fn from(fields: Vec<FieldDefinition>) -> Self {
        Self::new(fields)
    }
}

/// Registry of published forms by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedForms {
    forms: BTreeMap<FormId, FormDefinition>,
}

impl SavedForms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot under a new id. Existing entries are never replaced.
    pub fn insert(&mut self, id: impl Into<FormId>, form: FormDefinition) -> Result<()> {
        let id = id.into();
        if self.forms.contains_key(&id) {
            return Err(Error::FormAlreadyPublished(id));
        }
        self.forms.insert(id, form);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&FormDefinition> {
        self.forms.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.forms.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &FormId> {
        self.forms.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FormId, &FormDefinition)> {
        self.forms.iter()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

//! The two lookup tables an [`Nbt`][`crate::Nbt`] dispatches through.
//!
//! Both are append-only: a registration never replaces an earlier one, so a
//! given configuration always decodes and encodes the same way. Registering
//! needs `&mut`, so once an instance is shared between threads it can only
//! be read.
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::error::{Error, Result};
use crate::{Adapter, Converter, Nbt, Tag, TagKind, Value, ValueKind, END_ID};

/// Wire id to tag kind to [`Adapter`].
///
/// Id 0 always maps to [`TagKind::End`] and can not be registered, nor can
/// End be given another id.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    by_id: BTreeMap<u8, (TagKind, Arc<dyn Adapter>)>,
    by_kind: HashMap<TagKind, u8>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `id` to `kind` and its adapter. Fails if either the id or the
    /// kind is already taken.
    pub fn register(&mut self, id: u8, kind: TagKind, adapter: Arc<dyn Adapter>) -> Result<()> {
        if id == END_ID || kind == TagKind::End {
            return Err(Error::registration(format!(
                "id {} and {} are reserved for each other",
                END_ID,
                TagKind::End
            )));
        }
        if let Some((existing, _)) = self.by_id.get(&id) {
            return Err(Error::registration(format!(
                "id {} is already registered to {}",
                id, existing
            )));
        }
        if let Some(existing) = self.by_kind.get(&kind) {
            return Err(Error::registration(format!(
                "{} is already registered under id {}",
                kind, existing
            )));
        }

        self.insert(id, kind, adapter);
        Ok(())
    }

    pub(crate) fn insert(&mut self, id: u8, kind: TagKind, adapter: Arc<dyn Adapter>) {
        debug!("registering adapter for {} under id {}", kind, id);
        self.by_id.insert(id, (kind, adapter));
        self.by_kind.insert(kind, id);
    }

    /// The kind registered under `id`.
    pub fn kind_for(&self, id: u8) -> Result<TagKind> {
        if id == END_ID {
            return Ok(TagKind::End);
        }
        self.by_id
            .get(&id)
            .map(|(kind, _)| *kind)
            .ok_or_else(|| Error::invalid_tag(id))
    }

    /// The id `kind` is registered under.
    pub fn id_for(&self, kind: TagKind) -> Result<u8> {
        if kind == TagKind::End {
            return Ok(END_ID);
        }
        self.by_kind
            .get(&kind)
            .copied()
            .ok_or_else(|| Error::unregistered_kind(kind))
    }

    pub fn adapter_for_id(&self, id: u8) -> Result<&dyn Adapter> {
        self.by_id
            .get(&id)
            .map(|(_, adapter)| adapter.as_ref())
            .ok_or_else(|| Error::invalid_tag(id))
    }

    pub fn adapter_for_kind(&self, kind: TagKind) -> Result<&dyn Adapter> {
        let id = self.id_for(kind)?;
        self.adapter_for_id(id)
    }

    pub fn contains_id(&self, id: u8) -> bool {
        id == END_ID || self.by_id.contains_key(&id)
    }

    pub fn contains_kind(&self, kind: TagKind) -> bool {
        kind == TagKind::End || self.by_kind.contains_key(&kind)
    }

    /// Registered id and kind pairs in id order, End excluded.
    pub fn iter(&self) -> impl Iterator<Item = (u8, TagKind)> + '_ {
        self.by_id.iter().map(|(id, (kind, _))| (*id, *kind))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Tag kind to value kind to [`Converter`].
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    by_kind: HashMap<TagKind, (ValueKind, Arc<dyn Converter>)>,
    by_value: HashMap<ValueKind, TagKind>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `kind` to `value_kind` and its converter. Fails if either kind is
    /// already taken.
    pub fn register(
        &mut self,
        kind: TagKind,
        value_kind: ValueKind,
        converter: Arc<dyn Converter>,
    ) -> Result<()> {
        if kind == TagKind::End {
            return Err(Error::registration("TAG_End carries no value to convert"));
        }
        if let Some((existing, _)) = self.by_kind.get(&kind) {
            return Err(Error::registration(format!(
                "{} already converts to {}",
                kind, existing
            )));
        }
        if let Some(existing) = self.by_value.get(&value_kind) {
            return Err(Error::registration(format!(
                "{} already converts to {}",
                value_kind, existing
            )));
        }

        self.insert(kind, value_kind, converter);
        Ok(())
    }

    pub(crate) fn insert(&mut self, kind: TagKind, value_kind: ValueKind, converter: Arc<dyn Converter>) {
        debug!("registering converter between {} and {}", kind, value_kind);
        self.by_kind.insert(kind, (value_kind, converter));
        self.by_value.insert(value_kind, kind);
    }

    /// Convert `tag` with the converter registered for its kind.
    pub fn to_value(&self, tag: &Tag, nbt: &Nbt) -> Result<Value> {
        self.by_kind
            .get(&tag.kind())
            .ok_or_else(|| Error::registration(format!("no converter registered for {}", tag.kind())))?
            .1
            .to_value(tag, nbt)
    }

    /// Convert `value` with the converter registered for its kind.
    pub fn to_tag(&self, name: String, value: Value, nbt: &Nbt) -> Result<Tag> {
        let kind = self.kind_for_value(value.kind())?;
        self.by_kind
            .get(&kind)
            .ok_or_else(|| Error::registration(format!("no converter registered for {}", kind)))?
            .1
            .to_tag(name, value, nbt)
    }

    pub fn has_converter_for_tag(&self, kind: TagKind) -> bool {
        self.by_kind.contains_key(&kind)
    }

    pub fn has_converter_for_value(&self, kind: ValueKind) -> bool {
        self.by_value.contains_key(&kind)
    }

    pub fn value_kind_for(&self, kind: TagKind) -> Result<ValueKind> {
        self.by_kind
            .get(&kind)
            .map(|(value_kind, _)| *value_kind)
            .ok_or_else(|| Error::registration(format!("no converter registered for {}", kind)))
    }

    pub fn kind_for_value(&self, kind: ValueKind) -> Result<TagKind> {
        self.by_value
            .get(&kind)
            .copied()
            .ok_or_else(|| Error::registration(format!("no converter registered for {}", kind)))
    }

    pub fn len(&self) -> usize {
        self.by_kind.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.by_kind.iter().map(|(kind, (value, _))| (kind, value)))
            .finish()
    }
}

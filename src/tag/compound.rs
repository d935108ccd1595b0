use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use super::{ContainerId, ContainerKind, Payload, Tag};
use crate::error::{Error, Result};

/// A name to tag mapping. Every tag's name equals its key.
///
/// Insertion order is kept, so encoding is deterministic, but it does not
/// take part in equality.
#[derive(Debug)]
pub struct TagCompound {
    id: ContainerId,
    tags: IndexMap<String, Tag>,
}

impl TagCompound {
    pub fn new() -> Self {
        Self {
            id: ContainerId::next(),
            tags: IndexMap::new(),
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// Insert a tag under `key`, taking ownership of it and renaming it to
    /// `key`. A tag previously stored under the key is returned, detached.
    ///
    /// Fails if the tag already belongs to a container.
    pub fn insert(&mut self, key: impl Into<String>, mut tag: Tag) -> Result<Option<Tag>> {
        if tag.has_parent() {
            return Err(Error::already_parented(tag.kind()));
        }

        let key = key.into();
        *tag.name_mut() = key.clone();
        tag.attach(self.id, ContainerKind::Compound);
        Ok(self.tags.insert(key, tag).map(Tag::detach))
    }

    /// Insert a new tag holding `payload` under `key`.
    pub fn put(&mut self, key: impl Into<String>, payload: impl Into<Payload>) -> Result<Option<Tag>> {
        let key = key.into();
        let tag = Tag::new(key.clone(), payload);
        self.insert(key, tag)
    }

    /// Remove the tag stored under `key`, handing ownership back to the
    /// caller. The order of the remaining tags is kept.
    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.tags.shift_remove(key).map(Tag::detach)
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.tags.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Tag> {
        self.tags.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Tags in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Turn the compound into a named tag, e.g. to use it as a document root.
    pub fn into_tag(self, name: impl Into<String>) -> Tag {
        Tag::new(name, self)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for (key, tag) in &self.tags {
            if !tag.is_owned_by(self.id) {
                return Err(Error::ownership(format!(
                    "{} under {:?} was not inserted through the compound",
                    tag.kind(),
                    key
                )));
            }
            if tag.name() != key {
                return Err(Error::ownership(format!(
                    "tag named {:?} stored under key {:?}",
                    tag.name(),
                    key
                )));
            }
        }
        Ok(())
    }
}

macro_rules! typed_get {
    ($($fn:ident -> $t:ty = $accessor:ident),* $(,)?) => {
        impl TagCompound {
            $(
                pub fn $fn(&self, key: &str) -> Option<$t> {
                    self.get(key).and_then(Tag::$accessor)
                }
            )*
        }
    };
}

typed_get! {
    get_i8 -> i8 = as_i8,
    get_i16 -> i16 = as_i16,
    get_i32 -> i32 = as_i32,
    get_i64 -> i64 = as_i64,
    get_f32 -> f32 = as_f32,
    get_f64 -> f64 = as_f64,
    get_bool -> bool = as_bool,
    get_str -> &str = as_str,
    get_list -> &super::TagList = as_list,
    get_compound -> &TagCompound = as_compound,
}

impl Default for TagCompound {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TagCompound {
    fn clone(&self) -> Self {
        let id = ContainerId::next();
        let tags = self
            .tags
            .iter()
            .map(|(key, tag)| {
                let mut tag = tag.clone();
                tag.attach(id, ContainerKind::Compound);
                (key.clone(), tag)
            })
            .collect();

        Self { id, tags }
    }
}

impl PartialEq for TagCompound {
    fn eq(&self, other: &Self) -> bool {
        // IndexMap equality ignores order.
        self.tags == other.tags
    }
}

impl Eq for TagCompound {}

impl Hash for TagCompound {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent so it agrees with PartialEq.
        let sum = self.tags.values().fold(0u64, |acc, tag| {
            let mut hasher = DefaultHasher::new();
            tag.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });
        self.tags.len().hash(state);
        sum.hash(state);
    }
}

impl<'a> IntoIterator for &'a TagCompound {
    type Item = (&'a String, &'a Tag);
    type IntoIter = indexmap::map::Iter<'a, String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

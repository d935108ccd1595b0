use std::hash::{Hash, Hasher};

use super::{ContainerId, ContainerKind, Payload, Tag};
use crate::error::{Error, Result};
use crate::TagKind;

/// An ordered sequence of unnamed tags that all share one kind.
///
/// The element kind is either given up front with [`TagList::of`] or fixed by
/// the first tag added. Elements are always unnamed: adding a tag clears its
/// name, and renaming an element fails.
#[derive(Debug)]
pub struct TagList {
    id: ContainerId,
    element_kind: Option<TagKind>,
    tags: Vec<Tag>,
}

impl TagList {
    /// An empty list whose element kind will be set by the first tag added.
    pub fn new() -> Self {
        Self {
            id: ContainerId::next(),
            element_kind: None,
            tags: Vec::new(),
        }
    }

    /// An empty list of the given element kind. A list of End is refused.
    pub fn of(kind: TagKind) -> Result<Self> {
        Self::with_capacity(kind, 0)
    }

    pub(crate) fn with_capacity(kind: TagKind, capacity: usize) -> Result<Self> {
        if kind == TagKind::End {
            return Err(Error::ownership("can't create a list of TAG_End"));
        }
        Ok(Self {
            id: ContainerId::next(),
            element_kind: Some(kind),
            tags: Vec::with_capacity(capacity),
        })
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// The kind of every element, `None` for a list nothing was ever added to.
    pub fn element_kind(&self) -> Option<TagKind> {
        self.element_kind
    }

    /// Add a tag to the end of the list, taking ownership of it.
    ///
    /// Fails if the tag already belongs to a container, or if its kind
    /// differs from the list's element kind.
    pub fn add(&mut self, mut tag: Tag) -> Result<()> {
        if tag.has_parent() {
            return Err(Error::already_parented(tag.kind()));
        }

        match self.element_kind {
            Some(kind) if kind != tag.kind() => {
                return Err(Error::ownership(format!(
                    "can't add {} to a list of {}",
                    tag.kind(),
                    kind
                )));
            }
            Some(_) => {}
            None => self.element_kind = Some(tag.kind()),
        }

        tag.name_mut().clear();
        tag.attach(self.id, ContainerKind::List);
        self.tags.push(tag);
        Ok(())
    }

    /// Add an unnamed tag holding the payload.
    pub fn push(&mut self, payload: impl Into<Payload>) -> Result<()> {
        self.add(Tag::unnamed(payload))
    }

    /// Remove the tag at `index`, handing ownership back to the caller.
    pub fn remove(&mut self, index: usize) -> Option<Tag> {
        if index < self.tags.len() {
            Some(self.tags.remove(index).detach())
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.tags.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tag> {
        self.tags.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Drop every element. The element kind is kept.
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Check every element still points back at this list and has the
    /// element kind. Catches elements swapped in through [`TagList::get_mut`].
    pub(crate) fn validate(&self) -> Result<()> {
        for tag in &self.tags {
            if !tag.is_owned_by(self.id) {
                return Err(Error::ownership(format!(
                    "{} in list was not added through the list",
                    tag.kind()
                )));
            }
            if Some(tag.kind()) != self.element_kind {
                return Err(Error::ownership(format!(
                    "{} in a list of {:?}",
                    tag.kind(),
                    self.element_kind
                )));
            }
        }
        Ok(())
    }
}

impl Default for TagList {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TagList {
    fn clone(&self) -> Self {
        let id = ContainerId::next();
        let tags = self
            .tags
            .iter()
            .map(|tag| {
                let mut tag = tag.clone();
                tag.attach(id, ContainerKind::List);
                tag
            })
            .collect();

        Self {
            id,
            element_kind: self.element_kind,
            tags,
        }
    }
}

impl PartialEq for TagList {
    fn eq(&self, other: &Self) -> bool {
        self.element_kind == other.element_kind && self.tags == other.tags
    }
}

impl Eq for TagList {}

impl Hash for TagList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element_kind.hash(state);
        self.tags.hash(state);
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

impl IntoIterator for TagList {
    type Item = Tag;
    type IntoIter = std::iter::Map<std::vec::IntoIter<Tag>, fn(Tag) -> Tag>;

    /// Yields the elements detached from the list.
    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter().map(Tag::detach as fn(Tag) -> Tag)
    }
}

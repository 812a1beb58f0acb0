//! Index-addressed storage for named nodes.
//!
//! Named declarations may refer to themselves (directly or through a cycle),
//! so they are never built by value. A node gets its [`Id`] when it is
//! allocated, the id is cached, and only then is the node populated in place.
//! Two uses of the same declaration compare equal because they hold the same
//! id.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use serde::{Serialize, Serializer};

pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    fn new(raw: usize) -> Self {
        let raw = u32::try_from(raw).expect("arena overflow: more than u32::MAX nodes");
        Self { raw, _marker: PhantomData }
    }

    pub fn index(self) -> usize {
        self.raw as usize
    }
}

// Manual impls: derives would put bounds on `T`.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Id<T> {}
impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}
impl<T> Eq for Id<T> {}
impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state)
    }
}
impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.raw)
    }
}
impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.raw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Arena<T> {
    pub fn alloc(&mut self, item: T) -> Id<T> {
        let id = Id::new(self.items.len());
        self.items.push(item);
        id
    }

    pub fn get(&self, id: Id<T>) -> Option<&T> {
        self.items.get(id.index())
    }

    pub fn get_mut(&mut self, id: Id<T>) -> Option<&mut T> {
        self.items.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> {
        self.items.iter().enumerate().map(|(i, x)| (Id::new(i), x))
    }
}

impl<T> Index<Id<T>> for Arena<T> {
    type Output = T;
    fn index(&self, id: Id<T>) -> &T {
        &self.items[id.index()]
    }
}

impl<T> IndexMut<Id<T>> for Arena<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        &mut self.items[id.index()]
    }
}

/// Builder for nodes that have no meaningful empty state (a constant without
/// a type or value). The id is reserved first and the node filled later.
/// Every reservation is filled before its resolver returns `Ok`, so
/// [`Slots::finish`] only runs on complete slots.
#[derive(Debug)]
pub(crate) struct Slots<T> {
    items: Vec<Option<T>>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Slots<T> {
    pub(crate) fn reserve(&mut self) -> Id<T> {
        let id = Id::new(self.items.len());
        self.items.push(None);
        id
    }

    pub(crate) fn fill(&mut self, id: Id<T>, item: T) {
        self.items[id.index()] = Some(item);
    }

    /// Panics if a reservation was never filled.
    pub(crate) fn finish(self) -> Arena<T> {
        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(i, item)| item.unwrap_or_else(|| panic!("slot #{i} reserved but never filled")))
            .collect();
        Arena { items }
    }
}

//! Ordered and unique collections of identifiers.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Insertion-ordered list of ids. Duplicates are allowed unless added through
/// [`IdList::add_uniq`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdList<T>(Vec<T>);

impl<T> Default for IdList<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> IdList<T>
where
    T: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.0.get(index).copied()
    }

    pub fn has(&self, id: &T) -> bool {
        self.0.contains(id)
    }

    /// Position of the first occurrence of `id`.
    pub fn index(&self, id: &T) -> Option<usize> {
        self.0.iter().position(|e| e == id)
    }

    pub fn add(&mut self, ids: impl IntoIterator<Item = T>) {
        self.0.extend(ids);
    }

    /// Append only the ids not already present.
    pub fn add_uniq(&mut self, ids: impl IntoIterator<Item = T>) {
        for id in ids {
            if !self.has(&id) {
                self.0.push(id);
            }
        }
    }

    /// Insert at `index`; an index past the end appends.
    pub fn insert(&mut self, index: usize, ids: impl IntoIterator<Item = T>) {
        let at = index.min(self.0.len());
        let tail = self.0.split_off(at);
        self.0.extend(ids);
        self.0.extend(tail);
    }

    /// Remove every occurrence of each given id.
    pub fn delete(&mut self, ids: &[T]) {
        self.0.retain(|e| !ids.contains(e));
    }

    pub fn delete_at(&mut self, index: usize) -> Option<T> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    /// Move `id` to position `to`. A negative `to` removes it, a `to` past the
    /// end appends it. Unknown ids are ignored.
    pub fn move_to(&mut self, id: &T, to: isize) {
        if let Some(from) = self.index(id) {
            self.move_at(from, to);
        }
    }

    /// Same as [`IdList::move_to`], addressed by the current position.
    pub fn move_at(&mut self, from: usize, to: isize) {
        if from >= self.0.len() {
            return;
        }
        let e = self.0.remove(from);
        if to < 0 {
            return;
        }
        let at = (to as usize).min(self.0.len());
        self.0.insert(at, e);
    }

    pub fn reverse(&mut self) {
        self.0.reverse();
    }

    pub fn concat(&self, other: &IdList<T>) -> IdList<T> {
        let mut out = self.clone();
        out.add(other.iter().copied());
        out
    }

    /// Elements of `self` also present in `other`, in `self` order.
    pub fn intersect(&self, other: &[T]) -> IdList<T> {
        let wanted: HashSet<&T> = other.iter().collect();
        IdList(self.0.iter().filter(|e| wanted.contains(e)).copied().collect())
    }

    pub fn strings(&self) -> Vec<String>
    where
        T: core::fmt::Display,
    {
        self.0.iter().map(|e| e.to_string()).collect()
    }

    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.0.sort();
    }
}

impl<T> From<Vec<T>> for IdList<T> {
    fn from(value: Vec<T>) -> Self {
        Self(value)
    }
}

impl<T> FromIterator<T> for IdList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for IdList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a IdList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Insertion-ordered set of ids with constant-time membership checks.
#[derive(Debug, Clone)]
pub struct IdSet<T> {
    order: Vec<T>,
    members: HashSet<T>,
}

impl<T> Default for IdSet<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            members: HashSet::new(),
        }
    }
}

impl<T> IdSet<T>
where
    T: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the id was already present.
    pub fn add(&mut self, id: T) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    pub fn extend(&mut self, ids: impl IntoIterator<Item = T>) {
        for id in ids {
            self.add(id);
        }
    }

    pub fn has(&self, id: &T) -> bool {
        self.members.contains(id)
    }

    pub fn delete(&mut self, id: &T) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.order.retain(|e| e != id);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.order.iter()
    }

    pub fn to_list(&self) -> IdList<T> {
        IdList(self.order.clone())
    }
}

impl<T: PartialEq> PartialEq for IdSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl<T: Eq> Eq for IdSet<T> {}

impl<T> FromIterator<T> for IdSet<T>
where
    T: Copy + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

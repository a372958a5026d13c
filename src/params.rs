use std::ops::Index;
use std::slice;

use smallvec::SmallVec;

/// Slots kept inline before the buffer spills to the heap.
const INLINE_PARAMS: usize = 4;

/// A single URL parameter, consisting of a key and a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Param {
    key: String,
    value: String,
}

impl Param {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Parameter bindings written by a lookup, in path order.
///
/// The buffer is meant to be reused: [`Params::clear`] only resets the
/// length, the slot strings keep their capacity, so a pooled buffer stops
/// allocating once it has seen its largest route.
#[derive(Debug, Clone, Default)]
pub struct Params {
    slots: SmallVec<[Param; INLINE_PARAMS]>,
    len: usize,
}

impl Params {
    pub fn new() -> Self {
        Params::default()
    }

    /// Reserves `n` empty slots up front.
    pub fn with_capacity(n: usize) -> Self {
        Params {
            slots: (0..n).map(|_| Param::default()).collect(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
        }
    }

    /// Appends a binding, reusing a spare slot when there is one.
    pub fn push(&mut self, key: &str, value: &str) {
        self.push_joined(key, "", value);
    }

    // Writes `head` and `tail` back to back into one value.
    pub(crate) fn push_joined(&mut self, key: &str, head: &str, tail: &str) {
        if self.len == self.slots.len() {
            self.slots.push(Param::default());
        }
        let slot = &mut self.slots[self.len];
        slot.key.clear();
        slot.key.push_str(key);
        slot.value.clear();
        slot.value.push_str(head);
        slot.value.push_str(tail);
        self.len += 1;
    }

    /// Value of the first binding named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.iter().find(|p| p.key == key).map(Param::value)
    }

    pub fn iter(&self) -> slice::Iter<'_, Param> {
        self.slots[..self.len].iter()
    }

    /// `(key, value)` pairs, handy for comparisons.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.iter().map(|p| (p.key(), p.value())).collect()
    }
}

impl PartialEq for Params {
    fn eq(&self, other: &Self) -> bool {
        self.slots[..self.len] == other.slots[..other.len]
    }
}

impl Eq for Params {}

impl Index<usize> for Params {
    type Output = str;

    fn index(&self, i: usize) -> &str {
        &self.slots[..self.len][i].value
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_get() {
        let mut params = Params::new();
        params.push("user", "fundon");
        params.push("repo", "path-tree");
        params.push("user", "other");

        assert_eq!(params.len(), 3);
        assert_eq!(params.get("user"), Some("fundon"));
        assert_eq!(params.get("repo"), Some("path-tree"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(&params[1], "path-tree");

        params.clear();
        params.push_joined("rest", "/", "a/b");
        assert_eq!(params.pairs(), vec![("rest", "/a/b")]);
    }

    #[test]
    fn clear_hides_old_bindings() {
        let mut params = Params::with_capacity(2);
        assert!(params.is_empty());

        params.push("id", "1");
        params.clear();
        assert!(params.is_empty());
        assert_eq!(params.get("id"), None);
        assert_eq!(params.iter().count(), 0);

        params.push("name", "x");
        assert_eq!(params.pairs(), vec![("name", "x")]);
    }

    #[test]
    fn truncate_never_grows() {
        let mut params = Params::new();
        params.push("a", "1");
        params.push("b", "2");
        params.truncate(5);
        assert_eq!(params.len(), 2);
        params.truncate(1);
        assert_eq!(params.pairs(), vec![("a", "1")]);
    }

    #[test]
    fn equality_ignores_spare_slots() {
        let mut a = Params::with_capacity(8);
        let mut b = Params::new();
        a.push("x", "1");
        a.push("y", "2");
        a.truncate(1);
        b.push("x", "1");
        assert_eq!(a, b);
    }
}

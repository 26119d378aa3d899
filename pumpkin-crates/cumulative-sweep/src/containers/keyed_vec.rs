use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

/// Storage for values which belong to the identifiers of one kind (domains, propagators,
/// trailed integers); it can only be indexed by that kind of identifier.
#[derive(Clone, Debug)]
pub struct KeyedVec<Key, Value> {
    elements: Vec<Value>,
    key: PhantomData<Key>,
}

impl<Key, Value> Default for KeyedVec<Key, Value> {
    fn default() -> Self {
        KeyedVec {
            elements: Vec::new(),
            key: PhantomData,
        }
    }
}

impl<Key: StorageKey, Value> KeyedVec<Key, Value> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Stores `value` under the next free identifier, which is returned.
    pub fn push(&mut self, value: Value) -> Key {
        let key = Key::create_from_index(self.elements.len());
        self.elements.push(value);
        key
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Value> {
        self.elements.iter_mut()
    }

    /// Iterates over the values together with their identifiers.
    pub fn iter_enumerated(&self) -> impl Iterator<Item = (Key, &Value)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, value)| (Key::create_from_index(index), value))
    }
}

impl<Key: StorageKey, Value: Clone> KeyedVec<Key, Value> {
    /// Grows the storage with copies of `filler` until `key` is a valid index; existing values
    /// are left as they are.
    pub(crate) fn accomodate(&mut self, key: Key, filler: Value) {
        let required = key.index() + 1;
        if required > self.elements.len() {
            self.elements.resize(required, filler);
        }
    }
}

impl<Key: StorageKey, Value> Index<Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, key: Key) -> &Value {
        &self.elements[key.index()]
    }
}

impl<Key: StorageKey, Value> IndexMut<Key> for KeyedVec<Key, Value> {
    fn index_mut(&mut self, key: Key) -> &mut Value {
        &mut self.elements[key.index()]
    }
}

/// An identifier which is a position in a dense range `0..n`.
pub trait StorageKey: Copy {
    fn index(&self) -> usize;

    fn create_from_index(index: usize) -> Self;
}

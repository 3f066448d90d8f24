//! Open-addressed hash table keyed by terminated byte sequences
//!
//! Every table of the type system is a [`Store`]. A key is a sequence of
//! fixed-width elements ended by one element made only of zero bytes, so
//! multi-byte elements (such as encoded [`TypeId`](crate::TypeId)s) may contain
//! zero bytes of their own. The end of the slice also ends a key, and a
//! trailing partial element is ignored.
//!
//! The hash is the plain sum of the key bytes and collisions are resolved by
//! linear probing, so lookups degrade towards a scan of the table when many
//! keys share a byte sum. The table doubles once it is half full and never
//! shrinks.

/// Number of slots a fresh store starts with.
pub const INITIAL_CAPACITY: usize = 8;

/// Element width of name keys.
pub const NAME_WIDTH: usize = 1;

#[derive(Debug, Clone)]
struct Entry<V> {
    /// Logical key, terminator excluded
    key: Box<[u8]>,
    value: V,
}

/// Hash table from terminated byte-sequence keys to values.
///
/// `insert` does not look for an existing entry with the same key; callers
/// check with [`Store::find`] first when duplicates matter.
#[derive(Debug, Clone)]
pub struct Store<V> {
    /// Width in bytes of one key element
    width: usize,
    /// Number of times the table has doubled
    resizes: usize,
    entries: Vec<Entry<V>>,
    /// Open-addressed slots holding indices into `entries`
    slots: Vec<Option<usize>>,
}

impl<V> Store<V> {
    /// Create an empty store whose keys are made of `width`-byte elements.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero.
    pub fn new(width: usize) -> Self {
        assert!(width > 0, "key element width must be non-zero");
        Store {
            width,
            resizes: 0,
            entries: Vec::new(),
            slots: vec![None; INITIAL_CAPACITY],
        }
    }

    /// Width in bytes of one key element.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of times the table has been doubled.
    pub fn resizes(&self) -> usize {
        self.resizes
    }

    /// Insert `value` under `key`, growing the table first if it is half full.
    pub fn insert(&mut self, key: &[u8], value: V) -> &mut V {
        if self.entries.len() * 2 >= self.slots.len() {
            self.grow();
        }

        let key: Box<[u8]> = logical_key(key, self.width).into();
        let slot = free_slot(&self.slots, &key, self.width);
        let index = self.entries.len();
        self.slots[slot] = Some(index);
        self.entries.push(Entry { key, value });
        &mut self.entries[index].value
    }

    /// Get the value under `key`, inserting `default()` first if it is missing.
    pub fn get_or_insert_with(&mut self, key: &[u8], default: impl FnOnce() -> V) -> &mut V {
        match self.index_of(key) {
            Some(index) => &mut self.entries[index].value,
            None => self.insert(key, default()),
        }
    }

    /// Look up the value stored under `key`.
    pub fn find(&self, key: &[u8]) -> Option<&V> {
        let index = self.index_of(key)?;
        Some(&self.entries[index].value)
    }

    /// Look up the value stored under `key` for modification.
    pub fn find_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        let index = self.index_of(key)?;
        Some(&mut self.entries[index].value)
    }

    /// Check if an entry exists under `key`.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.index_of(key).is_some()
    }

    /// Iterate over `(key, value)` pairs in slot order.
    ///
    /// Keys are yielded without their terminator. Slot order depends on the
    /// hash and on the growth history, not on insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &V)> {
        self.slots.iter().flatten().map(move |&index| {
            let entry = &self.entries[index];
            (&*entry.key, &entry.value)
        })
    }

    /// Iterate over values in slot order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    fn grow(&mut self) {
        let capacity = self.slots.len() * 2;
        let old = std::mem::replace(&mut self.slots, vec![None; capacity]);
        for index in old.into_iter().flatten() {
            let slot = free_slot(&self.slots, &self.entries[index].key, self.width);
            self.slots[slot] = Some(index);
        }
        self.resizes += 1;
        log::trace!("store grew to {} slots ({} entries)", capacity, self.entries.len());
    }

    /// Index into `entries` of the entry stored under `key`.
    fn index_of(&self, key: &[u8]) -> Option<usize> {
        let capacity = self.slots.len();
        let mut slot = hash(key, self.width, capacity);

        // At least half the slots are empty, so the probe stops well before
        // it wraps around completely.
        for _ in 0..capacity {
            match self.slots[slot] {
                None => return None,
                Some(index) if keys_equal(&self.entries[index].key, key, self.width) => {
                    return Some(index)
                }
                Some(_) => slot = (slot + 1) % capacity,
            }
        }
        None
    }
}

/// Encode a name as a NUL-terminated key of [`NAME_WIDTH`] elements.
pub fn name_key(name: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(name.len() + 1);
    key.extend_from_slice(name.as_bytes());
    key.push(0);
    key
}

/// First empty slot on the probe sequence of `key`.
fn free_slot(slots: &[Option<usize>], key: &[u8], width: usize) -> usize {
    let capacity = slots.len();
    let mut slot = hash(key, width, capacity);
    while slots[slot].is_some() {
        slot = (slot + 1) % capacity;
    }
    slot
}

/// Elements of `key` up to (not including) the terminator.
fn elements(key: &[u8], width: usize) -> impl Iterator<Item = &[u8]> {
    key.chunks_exact(width)
        .take_while(|element| element.iter().any(|&byte| byte != 0))
}

fn logical_key(key: &[u8], width: usize) -> &[u8] {
    let len = elements(key, width).count() * width;
    &key[..len]
}

fn hash(key: &[u8], width: usize, capacity: usize) -> usize {
    let sum = elements(key, width)
        .flatten()
        .fold(0usize, |sum, &byte| sum.wrapping_add(byte as usize));
    sum % capacity
}

fn keys_equal(lhs: &[u8], rhs: &[u8], width: usize) -> bool {
    let mut lhs = elements(lhs, width);
    let mut rhs = elements(rhs, width);
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return true,
            (Some(a), Some(b)) if a == b => continue,
            _ => return false,
        }
    }
}

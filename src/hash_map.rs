use core::borrow::Borrow;
use core::convert::Infallible;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::error::Error;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// A hash map implemented using the linear-probing [`HashTable`] as the
/// underlying storage.
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash keys. The 64-bit hash is
/// folded to 32 bits and spread with Fibonacci hashing, so any reasonable
/// hasher works, including ones with poorly distributed low bits.
///
/// The map deliberately offers a narrow surface: there is no removal, no
/// iteration and no way to view the stored pairs. [`put`](Self::put) never
/// reports the value it replaced.
///
/// # Concurrency
///
/// The map performs no internal locking. Wrap it in a mutex or similar when
/// shared between threads.
#[derive(Clone)]
pub struct HashMap<K, V, S> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashMap")
            .field("len", &self.table.len())
            .field("capacity", &self.table.capacity())
            .finish()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash map with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use fib_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 32);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Returns the number of key-value pairs in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use fib_hash::DefaultHashBuilder;
    /// use fib_hash::HashMap;
    ///
    /// let mut map: HashMap<_, _, DefaultHashBuilder> = HashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.put(1, "a");
    /// map.put(1, "b");
    /// assert_eq!(map.len(), 1);
    /// # }
    /// ```
    #[doc(alias = "size")]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the map's buffer.
    ///
    /// The map grows eightfold once half of the slots are occupied, so at
    /// most `capacity() / 2` pairs fit before the next growth.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all elements and shrinks the map back to its initial capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use fib_hash::DefaultHashBuilder;
    /// use fib_hash::HashMap;
    ///
    /// let mut map: HashMap<_, _, DefaultHashBuilder> = HashMap::new();
    /// for i in 0..100 {
    ///     map.put(i, i * 2);
    /// }
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 32);
    /// assert_eq!(map.get(&1), None);
    /// # }
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Associates `value` with `key`.
    ///
    /// An existing value for an equal key is overwritten in place and
    /// dropped; the originally stored key is kept. Unlike most maps, this
    /// method always returns `None`, even when it replaced a value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use fib_hash::DefaultHashBuilder;
    /// use fib_hash::HashMap;
    ///
    /// let mut map: HashMap<_, _, DefaultHashBuilder> = HashMap::new();
    /// assert_eq!(map.put("O", "K"), None);
    /// assert_eq!(map.put("O", "k"), None);
    /// assert_eq!(map.get("O"), Some(&"k"));
    /// # }
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let hash_builder = &self.hash_builder;
        let hash = hash_builder.hash_one(&key);
        match self.table.entry(
            hash,
            |(k, _)| k == &key,
            |(k, _)| hash_builder.hash_one(k),
        ) {
            TableEntry::Occupied(mut entry) => entry.get_mut().1 = value,
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
            }
        }
        None
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but `Hash`
    /// and `Eq` on the borrowed form must match those for the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use fib_hash::DefaultHashBuilder;
    /// use fib_hash::HashMap;
    ///
    /// let mut map: HashMap<String, i32, DefaultHashBuilder> = HashMap::new();
    /// map.put("one".to_string(), 1);
    /// assert_eq!(map.get("one"), Some(&1));
    /// assert_eq!(map.get("two"), None);
    /// # }
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find(hash, |(k, _)| <K as Borrow<Q>>::borrow(k) == key)
            .map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_mut(hash, |(k, _)| <K as Borrow<Q>>::borrow(k) == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Would return a view of every key-value pair in the map.
    ///
    /// This map does not support viewing its pairs, so the call always fails
    /// with [`Error::Unsupported`], whether or not the map is empty. The `Ok`
    /// type is uninhabited.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use fib_hash::DefaultHashBuilder;
    /// use fib_hash::Error;
    /// use fib_hash::HashMap;
    ///
    /// let map: HashMap<i32, i32, DefaultHashBuilder> = HashMap::new();
    /// assert_eq!(
    ///     map.entries(),
    ///     Err(Error::Unsupported {
    ///         operation: "entries"
    ///     })
    /// );
    /// # }
    /// ```
    pub fn entries(&self) -> Result<Infallible, Error> {
        Err(Error::Unsupported {
            operation: "entries",
        })
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new hash map using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use fib_hash::HashMap;
    /// #
    /// # #[derive(Default)]
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, SimpleHasher> = HashMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

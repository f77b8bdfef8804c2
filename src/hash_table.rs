use alloc::vec::Vec;
use core::fmt::Debug;

/// Knuth's multiplicative constant: the fractional part of the golden ratio
/// scaled to 32 bits. Odd, so multiplication by it is a bijection on `u32`.
const MAGIC: u32 = 0x9E37_79B9;

/// Shift of a freshly created or cleared table, giving `2^(32 - 27) = 32`
/// slots.
pub const MAX_SHIFT: u32 = 27;

/// Smallest shift the table may grow to. A shift of zero addresses the full
/// 32-bit hash space, which does not fit in a 32-bit `usize`.
const MIN_SHIFT: u32 = if usize::BITS > 32 { 0 } else { 1 };

/// Half of the 31-bit range. Discarding `shift` low bits of it gives the
/// population at which the table grows, which is half the slot count.
const THRESHOLD: u32 = 0x7FFF_FFFF;

/// Number of additional hash bits retained on each growth, so the slot count
/// is multiplied by eight.
const GROWTH_STEP: u32 = 3;

#[inline(always)]
fn fold_hash(hash: u64) -> u32 {
    ((hash >> 32) as u32) ^ (hash as u32)
}

/// Maps a hash to its home slot: multiply by the golden-ratio constant and
/// keep the top `32 - shift` bits.
#[inline(always)]
fn slot_index(hash: u64, shift: u32) -> usize {
    (fold_hash(hash).wrapping_mul(MAGIC) >> shift) as usize
}

#[inline(always)]
fn slot_count(shift: u32) -> usize {
    1usize << (32 - shift)
}

#[inline(always)]
fn threshold(shift: u32) -> usize {
    (THRESHOLD >> shift) as usize
}

/// Steps one slot backward, wrapping from the first slot to the last.
#[inline(always)]
fn previous_slot(index: usize, len: usize) -> usize {
    if index == 0 { len - 1 } else { index - 1 }
}

fn empty_slots<V>(count: usize) -> Vec<Option<V>> {
    let mut slots = Vec::with_capacity(count);
    slots.resize_with(count, || None);
    slots
}

/// Walks the probe sequence starting at the home slot of `hash` and returns
/// the first empty slot. Only valid when no slot on that path holds an equal
/// value.
fn vacant_index<V>(slots: &[Option<V>], shift: u32, hash: u64) -> usize {
    let mut index = slot_index(hash, shift);
    while slots[index].is_some() {
        index = previous_slot(index, slots.len());
    }
    index
}

/// Low-level probe statistics for a [`HashTable`].
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Total number of slots allocated
    pub total_slots: usize,
    /// Population at which the table grows
    pub threshold: usize,
    /// Number of discarded low hash bits
    pub shift: u32,
    /// Load factor (populated / total_slots)
    pub load_factor: f64,
    /// Longest distance between an element and its home slot
    pub max_probe_length: usize,
    /// Mean distance between an element and its home slot
    pub mean_probe_length: f64,
    /// Total memory in bytes used by the slot buffer
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} slots ({:.2}% load factor)",
            self.populated,
            self.total_slots,
            self.load_factor * 100.0
        );
        println!("Growth: shift {}, threshold {}", self.shift, self.threshold);
        println!(
            "Probe length: max {}, mean {:.03}",
            self.max_probe_length, self.mean_probe_length
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// An open-addressing hash table using linear probing and Fibonacci hashing.
///
/// `HashTable<V>` stores values of type `V` in a single flat slot buffer.
/// Like other raw tables, it requires you to provide the hash value and an
/// equality predicate for each operation, plus a hasher for values already in
/// the table so it can redistribute them when it grows.
///
/// A value's home slot is the top `32 - shift` bits of its 32-bit hash
/// multiplied by the golden-ratio constant `0x9E3779B9`. Collisions probe
/// backward one slot at a time, wrapping around at the start of the buffer.
///
/// The table starts at 32 slots. Once the population reaches half the slot
/// count, it retains three more hash bits, so capacity grows eightfold. At a
/// shift of zero the table spans the whole hash space and cannot grow any
/// further; inserting past half of that capacity is an unsupported
/// limitation rather than an error the table reports. On 32-bit targets the
/// floor is a shift of one, since `2^32` slots cannot be addressed there.
///
/// The table has no internal synchronization. Share it across threads only
/// behind external locking.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use fib_hash::hash_table::Entry;
/// # use fib_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::new();
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123, |p| hash_id(p.id)) {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
///
/// assert_eq!(table.find(hash, |p| p.id == 123).map(|p| p.name.as_str()), Some("Alice"));
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    slots: Vec<Option<V>>,
    shift: u32,
    populated: usize,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::string::String;

        f.debug_struct("HashTable")
            .field(
                "popmap",
                &self
                    .slots
                    .chunks(16)
                    .map(|chunk| {
                        chunk
                            .iter()
                            .map(|slot| if slot.is_some() { '#' } else { '.' })
                            .collect::<String>()
                    })
                    .collect::<Vec<_>>(),
            )
            .field("shift", &self.shift)
            .field("populated", &self.populated)
            .field("capacity", &self.slots.len())
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with 32 slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fib_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::new();
    /// assert_eq!(table.capacity(), 32);
    /// assert!(table.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            slots: empty_slots(slot_count(MAX_SHIFT)),
            shift: MAX_SHIFT,
            populated: 0,
        }
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of elements in the table.
    ///
    /// The count is maintained on insertion and never recomputed by scanning
    /// the slots.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns the number of slots in the table, always a power of two.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of low hash bits currently discarded when
    /// computing a home slot.
    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// Removes all elements and shrinks the table back to its initial 32
    /// slots.
    ///
    /// This is the only operation that reduces the table's capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fib_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// for n in 0..100u64 {
    ///     table.entry(n, |&v| v == n, |&v| v).or_insert(n);
    /// }
    /// assert!(table.capacity() > 32);
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 32);
    /// ```
    pub fn clear(&mut self) {
        self.shift = MAX_SHIFT;
        self.slots = empty_slots(slot_count(MAX_SHIFT));
        self.populated = 0;
    }

    /// Walks the probe sequence for `hash`. Returns `Ok` with the index of the
    /// slot holding a value matching `eq`, or `Err` with the index of the
    /// first empty slot.
    ///
    /// Terminates because the table always keeps empty slots: growth is
    /// triggered at half occupancy.
    fn probe(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Result<usize, usize> {
        let mut index = slot_index(hash, self.shift);
        loop {
            match &self.slots[index] {
                None => return Err(index),
                Some(value) if eq(value) => return Ok(index),
                Some(_) => index = previous_slot(index, self.slots.len()),
            }
        }
    }

    /// Returns a reference to the value matching `eq`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fib_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(42, |&v: &u64| v == 7, |&v| v * 6).or_insert(7);
    ///
    /// assert_eq!(table.find(42, |&v| v == 7), Some(&7));
    /// assert_eq!(table.find(42, |&v| v == 8), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        self.probe(hash, eq)
            .ok()
            .and_then(|index| self.slots[index].as_ref())
    }

    /// Returns a mutable reference to the value matching `eq`, if any.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        match self.probe(hash, eq) {
            Ok(index) => self.slots[index].as_mut(),
            Err(_) => None,
        }
    }

    /// Gets the entry for the value matching `eq`, for in-place update or
    /// insertion.
    ///
    /// `hasher` must return the same hash that was passed in when each value
    /// now in the table was inserted. It is only called when the table grows.
    ///
    /// Looking up an entry never changes the table. Growth only happens in
    /// [`VacantEntry::insert`], after the new value brings the population to
    /// the threshold. Updating an occupied entry never causes growth.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fib_hash::hash_table::Entry;
    /// # use fib_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<(u64, &str)> = HashTable::new();
    ///
    /// match table.entry(1, |&(k, _)| k == 1, |&(k, _)| k) {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert((1, "one"));
    ///     }
    ///     Entry::Occupied(_) => unreachable!("Entry should be vacant"),
    /// }
    ///
    /// match table.entry(1, |&(k, _)| k == 1, |&(k, _)| k) {
    ///     Entry::Occupied(mut entry) => entry.get_mut().1 = "uno",
    ///     Entry::Vacant(_) => unreachable!("Entry should be occupied"),
    /// }
    ///
    /// assert_eq!(table.len(), 1);
    /// assert_eq!(table.find(1, |&(k, _)| k == 1), Some(&(1, "uno")));
    /// ```
    pub fn entry<H>(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
        hasher: H,
    ) -> Entry<'_, V, H>
    where
        H: Fn(&V) -> u64,
    {
        match self.probe(hash, eq) {
            Ok(index) => match &mut self.slots[index] {
                Some(value) => Entry::Occupied(OccupiedEntry { value }),
                None => unreachable!("probe reported an empty slot as occupied"),
            },
            Err(index) => Entry::Vacant(VacantEntry {
                table: self,
                index,
                hasher,
            }),
        }
    }

    /// Moves every value into a buffer eight times larger and returns the new
    /// index of the value that sat at `tracked`. Leaves the table untouched
    /// when it already spans the whole hash space.
    #[cold]
    #[inline(never)]
    fn grow(&mut self, hasher: impl Fn(&V) -> u64, tracked: usize) -> usize {
        let new_shift = self.shift.saturating_sub(GROWTH_STEP).max(MIN_SHIFT);
        if new_shift == self.shift {
            log::warn!(
                "hash table at shift {} cannot grow past {} slots; {} elements stored",
                self.shift,
                self.slots.len(),
                self.populated
            );
            return tracked;
        }

        let mut slots = empty_slots(slot_count(new_shift));
        let mut moved = tracked;
        for (old_index, slot) in self.slots.drain(..).enumerate() {
            if let Some(value) = slot {
                let index = vacant_index(&slots, new_shift, hasher(&value));
                if old_index == tracked {
                    moved = index;
                }
                slots[index] = Some(value);
            }
        }

        log::trace!(
            "hash table grew from shift {} to {} ({} slots, {} elements)",
            self.shift,
            new_shift,
            slots.len(),
            self.populated
        );

        self.shift = new_shift;
        self.slots = slots;
        moved
    }

    /// Computes a histogram of probe lengths for the current table state.
    ///
    /// Available with the `stats` feature.
    ///
    /// The probe length of a value is the number of backward steps between
    /// its home slot and the slot it occupies. Index `n` of the returned
    /// vector counts the values with probe length `n`; the vector is as long
    /// as the longest probe length plus one, and empty for an empty table.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self, hasher: impl Fn(&V) -> u64) -> Vec<usize> {
        let mut hist = Vec::new();
        let len = self.slots.len();

        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(value) = slot {
                let home = slot_index(hasher(value), self.shift);
                let distance = (home + len - index) % len;
                if hist.len() <= distance {
                    hist.resize(distance + 1, 0);
                }
                hist[distance] += 1;
            }
        }

        hist
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self, hasher: impl Fn(&V) -> u64) -> DebugStats {
        let hist = self.probe_histogram(hasher);
        let total_probe: usize = hist
            .iter()
            .enumerate()
            .map(|(distance, count)| distance * count)
            .sum();

        DebugStats {
            populated: self.populated,
            total_slots: self.slots.len(),
            threshold: threshold(self.shift),
            shift: self.shift,
            load_factor: self.populated as f64 / self.slots.len() as f64,
            max_probe_length: hist.len().saturating_sub(1),
            mean_probe_length: if self.populated == 0 {
                0.0
            } else {
                total_probe as f64 / self.populated as f64
            },
            total_bytes: self.slots.len() * core::mem::size_of::<Option<V>>(),
        }
    }

    /// Pretty-prints the probe-length histogram horizontally using stdout.
    ///
    /// Requires the `stats` and `std` features.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_probe_histogram(&self, hasher: impl Fn(&V) -> u64) {
        let hist = self.probe_histogram(hasher);
        let max = hist.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!("probe histogram ({} entries):", self.populated);
        for (distance, &count) in hist.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", distance, "█".repeat(width), count);
        }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V, H> {
    /// A vacant entry - no matching value is present in the table
    Vacant(VacantEntry<'a, V, H>),
    /// An occupied entry - a matching value is present in the table
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V, H> Entry<'a, V, H>
where
    H: Fn(&V) -> u64,
{
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }
}

/// A view into a vacant slot of a [`HashTable`].
///
/// Holds the hasher passed to [`HashTable::entry`] so that inserting can grow
/// the table.
pub struct VacantEntry<'a, V, H> {
    table: &'a mut HashTable<V>,
    index: usize,
    hasher: H,
}

impl<'a, V, H> VacantEntry<'a, V, H>
where
    H: Fn(&V) -> u64,
{
    /// Writes `value` into the slot and returns a mutable reference to it.
    ///
    /// If the population reaches the growth threshold, the table grows
    /// before this returns, and the reference points into the new buffer.
    pub fn insert(self, value: V) -> &'a mut V {
        let VacantEntry {
            table,
            mut index,
            hasher,
        } = self;

        table.slots[index] = Some(value);
        table.populated += 1;
        if table.populated >= threshold(table.shift) {
            index = table.grow(hasher, index);
        }

        match &mut table.slots[index] {
            Some(value) => value,
            None => unreachable!("inserted value missing after growth"),
        }
    }
}

/// A view into an occupied slot of a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    value: &'a mut V,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        self.value
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        self.value
    }

    /// Converts the entry into a mutable reference bound to the table's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        self.value
    }
}

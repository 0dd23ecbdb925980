use std::error::Error;

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::automaton::Automaton;
use super::key::{code_of, IntoKey, END_CODE, MAX_CODE};
use super::search::CommonPrefixIter;
use super::slot::Slot;

/// Largest slot index that fits the serialized `i32` fields.
const MAX_INDEX: usize = i32::MAX as usize;

/// Occupancy of a scanned stretch above which the free-slot hint jumps past it.
const DENSE_RATIO: f64 = 0.95;

type Key = SmallVec<[u8; 32]>;
type Codes = SmallVec<[usize; 8]>;

/// Tuning knobs for [`Builder`].
///
/// These only change the layout of the arrays, never the answers to queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Number of slots allocated before the first growth.
    pub initial_capacity: usize,
    /// Number of conflicting offsets the search inspects before it moves a
    /// smaller sibling group out of the way. `0` disables relocation.
    pub relocation_window: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            initial_capacity: 1024,
            relocation_window: 8,
        }
    }
}

/// Figures about the most recent build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of keys stored.
    pub keys: usize,
    /// Number of slots after trimming.
    pub size: usize,
    /// Number of slots allocated before trimming.
    pub capacity: usize,
    /// Number of sibling groups moved to resolve offset conflicts.
    pub relocations: usize,
}

/// Errors that can occur when building a double array.
#[derive(Debug, PartialEq)]
pub enum BuilderError {
    /// Keys were not provided in strictly ascending byte order.
    ///
    /// Contains the two keys that were out of order (previous key, current key).
    /// A repeated key is reported the same way.
    Order(Vec<u8>, Vec<u8>),
    /// More keys than ranks that fit the serialized format.
    TooManyKeys(usize),
    /// The arrays would need more slots than the serialized format can address.
    TooLarge(usize),
}

impl std::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuilderError::Order(k1, k2) => write!(
                f,
                "OrderError - {:?} came before {:?}",
                String::from_utf8_lossy(k1),
                String::from_utf8_lossy(k2)
            ),
            BuilderError::TooManyKeys(n) => write!(f, "TooManyKeys - {n} keys"),
            BuilderError::TooLarge(n) => write!(f, "TooLarge - {n} slots"),
        }
    }
}

impl Error for BuilderError {}

/// Keys `[begin, end)` share their first `depth` bytes and hang off `state`.
struct Task {
    begin: usize,
    end: usize,
    depth: usize,
    state: usize,
}

/// Working state of a single build.
struct BuilderCore<'k> {
    keys: &'k [Key],
    slots: Vec<Slot>,
    pending: Vec<Task>,
    /// Every slot below this index is taken, unless a dense stretch was skipped.
    next_free: usize,
    /// One past the highest slot ever written.
    high_water: usize,
    relocation_window: usize,
    relocations: usize,
}

impl<'k> BuilderCore<'k> {
    fn new(keys: &'k [Key], config: &BuilderConfig) -> Self {
        let mut slots = vec![Slot::Free; config.initial_capacity.clamp(1, MAX_INDEX + 1)];
        slots[0] = Slot::Root { offset: 0 };
        let mut pending = Vec::new();
        if !keys.is_empty() {
            pending.push(Task {
                begin: 0,
                end: keys.len(),
                depth: 0,
                state: 0,
            });
        }
        BuilderCore {
            keys,
            slots,
            pending,
            next_free: 1,
            high_water: 1,
            relocation_window: config.relocation_window,
            relocations: 0,
        }
    }

    fn run(&mut self) -> Result<(), BuilderError> {
        while let Some(task) = self.pending.pop() {
            self.expand(task)?;
        }
        Ok(())
    }

    /// Places the children of `task.state` and queues the inner ones.
    fn expand(&mut self, task: Task) -> Result<(), BuilderError> {
        let groups = self.partition(&task);
        let codes: Codes = groups.iter().map(|&(code, _, _)| code).collect();
        let offset = self.find_offset(&codes, Some(task.state), &[])?;
        self.slots[task.state] = self.slots[task.state].with_offset(offset as u32);

        let parent = task.state as u32;
        for &(code, begin, _) in &groups {
            let slot = if code == END_CODE {
                Slot::Leaf {
                    parent,
                    rank: begin as u32,
                }
            } else {
                Slot::Branch { parent, offset: 0 }
            };
            self.claim(offset + code, slot);
        }
        // Reversed so that the smallest code is expanded first.
        for &(code, begin, end) in groups.iter().rev() {
            if code != END_CODE {
                self.pending.push(Task {
                    begin,
                    end,
                    depth: task.depth + 1,
                    state: offset + code,
                });
            }
        }
        Ok(())
    }

    /// Splits the task's keys by their code at `task.depth`, in ascending code order.
    ///
    /// Returns `(code, begin, end)` per group. A key ending at `depth` sorts
    /// first and forms the [`END_CODE`] group.
    fn partition(&self, task: &Task) -> SmallVec<[(usize, usize, usize); 8]> {
        let mut groups = SmallVec::new();
        let mut begin = task.begin;
        while begin < task.end {
            let code = self.code_at(begin, task.depth);
            let mut end = begin + 1;
            while end < task.end && self.code_at(end, task.depth) == code {
                end += 1;
            }
            groups.push((code, begin, end));
            begin = end;
        }
        groups
    }

    #[inline]
    fn code_at(&self, index: usize, depth: usize) -> usize {
        self.keys[index]
            .get(depth)
            .map_or(END_CODE, |&byte| code_of(byte))
    }

    /// Finds the smallest offset, scanning from the free-slot hint, at which
    /// every code in `codes` lands on a free slot outside `blocked`.
    ///
    /// `current` is the state the group belongs to. When it is set and
    /// `relocation_window` candidates have failed, a smaller group that blocks
    /// one of them is moved away and that candidate is returned instead.
    fn find_offset(
        &mut self,
        codes: &[usize],
        current: Option<usize>,
        blocked: &[usize],
    ) -> Result<usize, BuilderError> {
        let (first, last) = match codes {
            [first, .., last] => (*first, *last),
            [only] => (*only, *only),
            [] => return Ok(0),
        };
        let start = self.next_free.max(first);
        let mut pos = start;
        let mut occupied = 0;
        let mut failed = 0;
        let mut candidate = None;
        loop {
            self.reserve(pos + 1)?;
            if !self.is_available(pos, blocked) {
                occupied += 1;
                pos += 1;
                continue;
            }
            let offset = pos - first;
            self.reserve(offset + last + 1)?;
            let mut conflicts = codes
                .iter()
                .map(|&code| offset + code)
                .filter(|&t| !self.is_available(t, blocked));
            let (conflict, more) = (conflicts.next(), conflicts.next());

            let Some(conflict) = conflict else {
                let scanned = (pos - start + 1) as f64;
                if start == self.next_free && occupied as f64 >= DENSE_RATIO * scanned {
                    self.next_free = pos;
                }
                return Ok(offset);
            };

            if let Some(current) = current {
                if failed < self.relocation_window {
                    failed += 1;
                    if candidate.is_none() && more.is_none() {
                        candidate = self
                            .relocatable(conflict, codes.len(), current)
                            .map(|owner| (offset, owner));
                    }
                    if failed == self.relocation_window {
                        if let Some((offset, owner)) = candidate {
                            self.move_group(owner, offset, codes)?;
                            return Ok(offset);
                        }
                    }
                }
            }
            pos += 1;
        }
    }

    /// Returns the owner of `slot` if its sibling group may be moved to make
    /// room for a group of `group_len` children of `current`.
    ///
    /// Only groups with strictly fewer children qualify, and never the group
    /// holding `current` itself.
    fn relocatable(&self, slot: usize, group_len: usize, current: usize) -> Option<usize> {
        let owner = self.slots[slot].parent()?;
        if Some(owner) == self.slots[current].parent() {
            return None;
        }
        (self.children_of(owner).len() < group_len).then_some(owner)
    }

    /// Codes of the transitions leaving `state`.
    fn children_of(&self, state: usize) -> Codes {
        let Some(offset) = self.slots[state].offset() else {
            return Codes::new();
        };
        (END_CODE..=MAX_CODE)
            .filter(|&code| {
                self.slots.get(offset + code).and_then(Slot::parent) == Some(state)
            })
            .collect()
    }

    /// Moves every child of `owner` to a fresh offset that avoids the slots
    /// the group `keep_codes` at `keep_offset` is about to claim.
    ///
    /// Grandchildren and queued tasks are re-pointed at the new ids, and the
    /// old slots are freed.
    fn move_group(
        &mut self,
        owner: usize,
        keep_offset: usize,
        keep_codes: &[usize],
    ) -> Result<(), BuilderError> {
        let Some(old_offset) = self.slots[owner].offset() else {
            return Ok(());
        };
        let moved = self.children_of(owner);
        let blocked: SmallVec<[usize; 8]> =
            keep_codes.iter().map(|&code| keep_offset + code).collect();
        let new_offset = self.find_offset(&moved, None, &blocked)?;

        for &code in &moved {
            let (from, to) = (old_offset + code, new_offset + code);
            let slot = self.slots[from];
            if let Some(child_offset) = slot.offset() {
                for grandchild in self.children_of(from) {
                    let g = child_offset + grandchild;
                    self.slots[g] = self.slots[g].with_parent(to as u32);
                }
            }
            self.claim(to, slot);
            self.slots[from] = Slot::Free;
            self.next_free = self.next_free.min(from);
            for task in self.pending.iter_mut().filter(|task| task.state == from) {
                task.state = to;
            }
        }
        self.slots[owner] = self.slots[owner].with_offset(new_offset as u32);
        self.relocations += 1;
        trace!(
            owner,
            from = old_offset,
            to = new_offset,
            children = moved.len(),
            "relocated sibling group"
        );
        Ok(())
    }

    #[inline]
    fn is_available(&self, index: usize, blocked: &[usize]) -> bool {
        self.slots[index].is_free() && !blocked.contains(&index)
    }

    fn claim(&mut self, index: usize, slot: Slot) {
        self.slots[index] = slot;
        self.high_water = self.high_water.max(index + 1);
        if index == self.next_free {
            while self.slots.get(self.next_free).is_some_and(|s| !s.is_free()) {
                self.next_free += 1;
            }
        }
    }

    /// Grows the slot array to at least `len` slots, doubling.
    fn reserve(&mut self, len: usize) -> Result<(), BuilderError> {
        if len > MAX_INDEX + 1 {
            return Err(BuilderError::TooLarge(len));
        }
        if len > self.slots.len() {
            let new_len = len.max(self.slots.len() * 2).min(MAX_INDEX + 1);
            self.slots.resize(new_len, Slot::Free);
        }
        Ok(())
    }

    fn stats(&self) -> BuildStats {
        BuildStats {
            keys: self.keys.len(),
            size: self.high_water,
            capacity: self.slots.len(),
            relocations: self.relocations,
        }
    }

    /// Trims unused trailing capacity and returns the finished automaton.
    fn finish(mut self) -> Automaton {
        self.slots.truncate(self.high_water);
        self.slots.shrink_to_fit();
        Automaton { slots: self.slots }
    }
}

/// Collects keys, checking that they are strictly ascending.
fn collect_sorted<K: IntoKey>(
    keys: impl IntoIterator<Item = K>,
) -> Result<Vec<Key>, BuilderError> {
    let mut collected: Vec<Key> = Vec::new();
    for key in keys {
        let key = key.collect_key();
        if let Some(prev) = collected.last() {
            if *prev >= key {
                return Err(BuilderError::Order(prev.to_vec(), key.to_vec()));
            }
        }
        collected.push(key);
    }
    if collected.len() > MAX_INDEX {
        return Err(BuilderError::TooManyKeys(collected.len()));
    }
    Ok(collected)
}

/// A builder for double-array tries.
///
/// Keys must be given in strictly ascending byte order. Each key is
/// identified by its rank, its 0-based position in that order; callers keep
/// their own rank-indexed storage for payloads.
///
/// The builder keeps the automaton it built and answers queries on it
/// directly, or hands it out with [`Builder::into_automaton`].
///
/// # Examples
///
/// ```
/// use libdarts::darts::Builder;
///
/// let mut builder = Builder::new();
/// builder.build(["以色列", "印加帝国", "印度", "印度尼西亚", "巴勒斯坦"]).unwrap();
/// assert_eq!(builder.exact_match_search("印度"), Some(2));
/// assert_eq!(builder.exact_match_search("印"), None);
/// assert_eq!(builder.common_prefix_search("印度尼西亚啊"), vec![2, 3]);
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    config: BuilderConfig,
    automaton: Automaton,
    stats: BuildStats,
}

impl Builder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Builder::default()
    }

    /// Creates a builder with the given configuration.
    pub fn with_config(config: BuilderConfig) -> Self {
        Builder {
            config,
            ..Builder::default()
        }
    }

    /// Returns the configuration of this builder.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Builds a double array from `keys`, replacing whatever was built before.
    ///
    /// The keys can be any type that implements [`IntoKey`], including `&str`,
    /// `String`, `&[u8]`, `Vec<u8>`, or fixed-size byte arrays.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::Order` if a key is not strictly greater than the
    /// previous one, and `TooManyKeys`/`TooLarge` if the result would not fit
    /// the serialized format. On error the builder holds an empty automaton.
    pub fn build<K: IntoKey>(
        &mut self,
        keys: impl IntoIterator<Item = K>,
    ) -> Result<(), BuilderError> {
        self.automaton = Automaton::root_only();
        self.stats = BuildStats::default();

        let keys = collect_sorted(keys)?;
        let mut core = BuilderCore::new(&keys, &self.config);
        core.run()?;
        self.stats = core.stats();
        self.automaton = core.finish();
        debug!(
            keys = self.stats.keys,
            size = self.stats.size,
            capacity = self.stats.capacity,
            relocations = self.stats.relocations,
            "built double array"
        );
        Ok(())
    }

    /// Figures about the most recent build.
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Returns the automaton built so far.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Consumes the builder and returns the automaton it built.
    pub fn into_automaton(self) -> Automaton {
        self.automaton
    }

    /// Returns the rank of `key` if it is one of the stored keys.
    #[inline]
    pub fn exact_match_search(&self, key: impl AsRef<[u8]>) -> Option<usize> {
        self.automaton.exact_match_search(key)
    }

    /// Returns the ranks of all stored keys that are prefixes of `text`,
    /// shortest first.
    pub fn common_prefix_search(&self, text: impl AsRef<[u8]>) -> Vec<usize> {
        self.automaton.common_prefix_search(text)
    }

    /// Returns an iterator over all stored keys that are prefixes of `text`.
    pub fn common_prefix_iter<'a, T>(&'a self, text: &'a T) -> CommonPrefixIter<'a, [Slot]>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        self.automaton.common_prefix_iter(text)
    }

    /// Serializes the built automaton. See [`Automaton::to_bytes`].
    pub fn to_bytes(&self) -> Vec<u8> {
        self.automaton.to_bytes()
    }
}

/// Builds a double array from an iterator of keys and returns the automaton.
///
/// Keys **must** be provided in strictly ascending byte order, or this
/// function will return an error.
///
/// # Examples
///
/// Building from byte sequences:
///
/// ```
/// use libdarts::darts::build_double_array;
///
/// let keys: Vec<Vec<u8>> = vec![vec![1, 2, 3], vec![1, 2, 4], vec![2, 3, 4]];
/// let da = build_double_array(keys).unwrap();
/// assert_eq!(da.exact_match_search([1, 2, 4]), Some(1));
/// assert_eq!(da.exact_match_search([1, 2, 5]), None);
/// ```
///
/// Building from strings:
///
/// ```
/// use libdarts::darts::build_double_array;
///
/// let da = build_double_array(["APPLE", "BANANA", "CHERRY"]).unwrap();
/// assert_eq!(da.exact_match_search("BANANA"), Some(1));
/// assert_eq!(da.exact_match_search("APRICOT"), None);
/// ```
pub fn build_double_array<K: IntoKey>(
    keys: impl IntoIterator<Item = K>,
) -> Result<Automaton, BuilderError> {
    let mut builder = Builder::new();
    builder.build(keys)?;
    Ok(builder.into_automaton())
}

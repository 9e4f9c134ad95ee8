use std::fmt;

use log::{debug, trace};

use crate::check;
use crate::error::{MapError, Result, EMPTY_TREE, RANK_OUT_OF_RANGE, UNORDERED_KEY};
use crate::print::print;
use crate::types::{default_comparator, LlrbNode};
use crate::util;

/// Ordered map backed by a left-leaning red-black tree.
///
/// Nodes live in a compact arena: it always holds exactly [`size`](Self::size)
/// nodes, and a delete moves the last node into the freed slot.
///
/// ```
/// use llrb_map::LlrbMap;
///
/// let mut map = LlrbMap::new();
/// map.put(5, "a").unwrap();
/// map.put(3, "b").unwrap();
/// map.put(8, "c").unwrap();
///
/// assert_eq!(map.get(&3), Ok(Some(&"b")));
/// assert_eq!(map.floor(&7), Some(&5));
/// assert_eq!(map.select(2), Ok(&8));
/// assert_eq!(map.keys(), vec![&3, &5, &8]);
/// ```
pub struct LlrbMap<K, V, C = fn(&K, &K) -> i32>
where
    C: Fn(&K, &K) -> i32,
{
    arena: Vec<LlrbNode<K, V>>,
    root: Option<u32>,
    comparator: C,
}

impl<K, V> LlrbMap<K, V, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    /// Empty map ordered by [`default_comparator`].
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<K>)
    }
}

impl<K, V> Default for LlrbMap<K, V, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> LlrbMap<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    /// Map ordered by `comparator`, which returns a negative number, zero or
    /// a positive number as the first key sorts before, equal to or after the
    /// second.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: Vec::new(),
            root: None,
            comparator,
        }
    }

    /// Number of keys.
    pub fn size(&self) -> usize {
        util::size(&self.arena, self.root)
    }

    /// Check if the map holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree: `-1` when empty, `0` for a single node.
    pub fn height(&self) -> isize {
        util::height(&self.arena, self.root)
    }

    fn check_key(&self, key: &K) -> Result<()> {
        if (self.comparator)(key, key) != 0 {
            debug!("rejecting key outside the total order");
            return Err(MapError::InvalidArgument(UNORDERED_KEY));
        }
        Ok(())
    }

    fn non_empty_root(&self) -> Result<u32> {
        self.root.ok_or_else(|| {
            debug!("operation requires a non-empty tree");
            MapError::InvalidState(EMPTY_TREE)
        })
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &K) -> Result<Option<&V>> {
        self.check_key(key)?;
        let idx = util::find(&self.arena, self.root, key, &self.comparator);
        Ok(idx.map(|i| &self.arena[i as usize].v))
    }

    /// Mutable value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Result<Option<&mut V>> {
        self.check_key(key)?;
        let idx = util::find(&self.arena, self.root, key, &self.comparator);
        Ok(match idx {
            Some(i) => Some(&mut self.arena[i as usize].v),
            None => None,
        })
    }

    /// Check if `key` is present.
    pub fn contains(&self, key: &K) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Insert `key`, or replace its value. Returns the replaced value.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.check_key(&key)?;
        let (root, replaced) = util::put(&mut self.arena, self.root, key, value, &self.comparator);
        self.set_root(Some(root));
        trace!(
            "put: size={} replaced={}",
            self.arena.len(),
            replaced.is_some()
        );
        Ok(replaced)
    }

    /// Insert every pair in order, stopping at the first rejected key.
    ///
    /// Pairs before the rejected one stay inserted.
    pub fn put_all<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) -> Result<()> {
        for (k, v) in iter {
            self.put(k, v)?;
        }
        Ok(())
    }

    /// Remove the smallest key.
    pub fn delete_min(&mut self) -> Result<(K, V)> {
        let root = self.non_empty_root()?;
        let removed = match (self.arena[root as usize].l, self.arena[root as usize].r) {
            (None, None) => {
                self.root = None;
                root
            }
            // Unreachable while the tree is left-leaning: a root without a
            // left child has no right child either.
            (None, Some(_)) => {
                let top = util::rotate_left(&mut self.arena, root);
                self.arena[top as usize].l = self.arena[root as usize].r;
                self.arena[top as usize].b = true;
                let top = util::balance(&mut self.arena, top);
                self.set_root(Some(top));
                root
            }
            _ => {
                self.redden_root(root);
                let (top, removed) = util::delete_min(&mut self.arena, root);
                self.set_root(top);
                removed
            }
        };
        let entry = self.release(removed);
        trace!("delete_min: size={}", self.arena.len());
        Ok(entry)
    }

    /// Remove the largest key.
    pub fn delete_max(&mut self) -> Result<(K, V)> {
        let root = self.non_empty_root()?;
        let removed = match (self.arena[root as usize].l, self.arena[root as usize].r) {
            (None, None) => {
                self.root = None;
                root
            }
            (Some(_), None) => {
                let top = util::rotate_right(&mut self.arena, root);
                self.arena[top as usize].r = self.arena[root as usize].l;
                self.arena[top as usize].b = true;
                let top = util::balance(&mut self.arena, top);
                self.set_root(Some(top));
                root
            }
            _ => {
                self.redden_root(root);
                let (top, removed) = util::delete_max(&mut self.arena, root);
                self.set_root(top);
                removed
            }
        };
        let entry = self.release(removed);
        trace!("delete_max: size={}", self.arena.len());
        Ok(entry)
    }

    /// Remove `key`. Returns its value, or `None` if it was absent.
    pub fn delete(&mut self, key: &K) -> Result<Option<V>> {
        self.check_key(key)?;
        let root = self.non_empty_root()?;
        if util::find(&self.arena, self.root, key, &self.comparator).is_none() {
            return Ok(None);
        }

        self.redden_root(root);
        let (top, removed) = util::delete_node(&mut self.arena, root, key, &self.comparator);
        self.set_root(top);
        let (_, value) = self.release(removed);
        trace!("delete: size={}", self.arena.len());
        Ok(Some(value))
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        trace!("clear: dropping {} nodes", self.arena.len());
        self.arena.clear();
        self.root = None;
    }

    /// Let the root's children borrow red when both are black.
    fn redden_root(&mut self, root: u32) {
        let n = &self.arena[root as usize];
        if !util::is_red(&self.arena, n.l) && !util::is_red(&self.arena, n.r) {
            self.arena[root as usize].b = false;
        }
    }

    fn set_root(&mut self, root: Option<u32>) {
        if let Some(r) = root {
            self.arena[r as usize].b = true;
        }
        self.root = root;
    }

    /// Drop the unlinked node at `idx`, moving the arena's last node into
    /// its slot.
    fn release(&mut self, idx: u32) -> (K, V) {
        let last = (self.arena.len() - 1) as u32;
        if idx != last {
            match util::parent_of(&self.arena, self.root, last, &self.comparator) {
                None => self.root = Some(idx),
                Some(p) => {
                    let parent = &mut self.arena[p as usize];
                    if parent.l == Some(last) {
                        parent.l = Some(idx);
                    } else {
                        parent.r = Some(idx);
                    }
                }
            }
        }
        let node = self.arena.swap_remove(idx as usize);
        (node.k, node.v)
    }

    /// Smallest key.
    pub fn min(&self) -> Option<&K> {
        self.root
            .map(|r| &self.arena[util::min(&self.arena, r) as usize].k)
    }

    /// Largest key.
    pub fn max(&self) -> Option<&K> {
        self.root
            .map(|r| &self.arena[util::max(&self.arena, r) as usize].k)
    }

    /// Largest key less than or equal to `key`.
    pub fn floor(&self, key: &K) -> Option<&K> {
        util::floor(&self.arena, self.root, key, &self.comparator).map(|i| &self.arena[i as usize].k)
    }

    /// Smallest key greater than or equal to `key`.
    pub fn ceiling(&self, key: &K) -> Option<&K> {
        util::ceiling(&self.arena, self.root, key, &self.comparator)
            .map(|i| &self.arena[i as usize].k)
    }

    /// Key with the given zero-based rank.
    pub fn select(&self, rank: usize) -> Result<&K> {
        self.non_empty_root()?;
        util::select(&self.arena, self.root, rank)
            .map(|i| &self.arena[i as usize].k)
            .ok_or(MapError::InvalidArgument(RANK_OUT_OF_RANGE))
    }

    /// Number of keys strictly less than `key`.
    pub fn rank(&self, key: &K) -> Result<usize> {
        self.non_empty_root()?;
        self.check_key(key)?;
        Ok(util::rank(&self.arena, self.root, key, &self.comparator))
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> Vec<&K> {
        match (self.min(), self.max()) {
            (Some(lo), Some(hi)) => self.keys_range(lo, hi),
            _ => Vec::new(),
        }
    }

    /// Keys within `[lo, hi]` in ascending order.
    pub fn keys_range(&self, lo: &K, hi: &K) -> Vec<&K> {
        let mut out = Vec::new();
        util::collect_keys(&self.arena, self.root, lo, hi, &self.comparator, &mut out);
        out
    }

    /// Number of keys within `[lo, hi]`.
    pub fn size_range(&self, lo: &K, hi: &K) -> usize {
        if self.is_empty() || (self.comparator)(lo, hi) > 0 {
            return 0;
        }
        let below_hi = util::rank(&self.arena, self.root, hi, &self.comparator);
        let below_lo = util::rank(&self.arena, self.root, lo, &self.comparator);
        let has_hi = util::find(&self.arena, self.root, hi, &self.comparator).is_some();
        below_hi - below_lo + usize::from(has_hi)
    }

    /// In-order `(key, value)` pairs.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.root)
    }

    /// Run the whole-tree consistency checks.
    pub fn check(&self) -> bool {
        self.assert_valid().is_ok()
    }

    /// Like [`check`](Self::check), naming the first violation.
    pub fn assert_valid(&self) -> std::result::Result<(), String> {
        check::assert_llrb_tree(&self.arena, self.root, &self.comparator)
    }
}

impl<K, V, C> LlrbMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Fn(&K, &K) -> i32,
{
    /// Render the tree shape, one node per line.
    pub fn print(&self) -> String {
        print(&self.arena, self.root, "")
    }
}

impl<K, V, C> Clone for LlrbMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Fn(&K, &K) -> i32 + Clone,
{
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.clone(),
            root: self.root,
            comparator: self.comparator.clone(),
        }
    }
}

impl<K, V, C> fmt::Debug for LlrbMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Fn(&K, &K) -> i32,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> Extend<(K, V)> for LlrbMap<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    /// # Panics
    ///
    /// Panics on a key outside the total order. Use
    /// [`LlrbMap::put_all`] to get the error instead.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        if let Err(err) = self.put_all(iter) {
            panic!("LlrbMap::extend: {err}");
        }
    }
}

impl<K, V> FromIterator<(K, V)> for LlrbMap<K, V, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    /// # Panics
    ///
    /// Panics on a key outside the total order, like [`Extend`].
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, C> IntoIterator for &'a LlrbMap<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over an [`LlrbMap`], driven by an explicit stack of
/// pending ancestors.
pub struct Iter<'a, K, V> {
    arena: &'a [LlrbNode<K, V>],
    stack: Vec<u32>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(arena: &'a [LlrbNode<K, V>], root: Option<u32>) -> Self {
        let mut iter = Self {
            arena,
            stack: Vec::new(),
            remaining: util::size(arena, root),
        };
        iter.push_left(root);
        iter
    }

    fn push_left(&mut self, mut node: Option<u32>) {
        while let Some(i) = node {
            self.stack.push(i);
            node = self.arena[i as usize].l;
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.stack.pop()?;
        let arena = self.arena;
        let n = &arena[i as usize];
        self.push_left(n.r);
        self.remaining -= 1;
        Some((&n.k, &n.v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

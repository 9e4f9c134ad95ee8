//! Node layout shared by the arena helpers.
//!
//! Nodes live in a [`Vec`]-backed arena owned by the map. Child links are
//! `Option<u32>` indices into that arena; an empty link stands for the
//! implicit BLACK, zero-sized leaf.

/// Left-leaning red-black tree node.
#[derive(Clone, Debug)]
pub struct LlrbNode<K, V> {
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub k: K,
    pub v: V,
    /// Node color: `true` = black, `false` = red.
    pub b: bool,
    /// Number of nodes in the subtree rooted here, this one included.
    pub n: usize,
}

impl<K, V> LlrbNode<K, V> {
    /// A detached red leaf.
    pub fn new(k: K, v: V) -> Self {
        Self {
            l: None,
            r: None,
            k,
            v,
            b: false,
            n: 1,
        }
    }

    pub fn is_black(&self) -> bool {
        self.b
    }

    pub fn is_red(&self) -> bool {
        !self.b
    }
}

/// Comparator for any `PartialOrd` key.
///
/// Keys that are not equal to themselves (`f64::NAN`) never compare as `0`,
/// which is how the map detects keys outside the total order.
pub fn default_comparator<K: PartialOrd>(a: &K, b: &K) -> i32 {
    if a == b {
        0
    } else if a < b {
        -1
    } else {
        1
    }
}
